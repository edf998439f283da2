//! Item catalog handlers, served from the warmed cache.

use axum::Json;
use axum::extract::{Path, State};

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{ItemListResponse, ItemResponse};

/// `GET /api/v1/items`: every cached item, ordered by name.
pub async fn list_items_handler(State(state): State<AppState>) -> Json<ItemListResponse> {
    Json(ItemListResponse {
        data: state.items.get_all(),
    })
}

/// `GET /api/v1/items/{id}`: one item; an unknown id yields an empty item.
pub async fn get_item_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ItemResponse>> {
    let id: i64 = id
        .parse()
        .map_err(|_| AppError::Validation("Invalid Item ID".into()))?;
    Ok(Json(ItemResponse {
        data: state.items.get_by_id(id).await,
    }))
}
