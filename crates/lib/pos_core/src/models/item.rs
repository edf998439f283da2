//! Catalog items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A catalog entry from `m_barang`.
///
/// `Item::default()` is the zero value the item cache hands out when a lookup
/// finds nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub category_id: i64,
    pub brand_id: i64,
    pub code: String,
    pub name: String,
    pub length: f64,
    pub width: f64,
    pub initial_stock: f64,
    pub initial_area: f64,
    pub remark: String,
    pub created_by: String,
    pub updated_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
