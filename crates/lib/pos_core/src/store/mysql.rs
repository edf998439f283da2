//! MySQL-backed stores over the legacy `m_user` / `m_barang` schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::mysql::{MySqlPool, MySqlRow};
use sqlx::Row;
use tracing::{debug, error};

use super::{CredentialStore, ItemStore, StoreError};
use crate::models::{Item, NewUser, User, UserStatus};

const USER_COLUMNS: &str = "id, nama, username, COALESCE(email, '') AS email, role, status, \
     created_by, updated_by, created_at, updated_at";

const ITEM_COLUMNS: &str = "id, kategori_id, merk_id, kode, nama, panjang, lebar, \
     initial_stok, initial_m2, keterangan, created_by, updated_by, created_at, updated_at";

/// Credential and item store backed by a MySQL pool.
#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

fn decode_err(e: sqlx::Error) -> StoreError {
    StoreError::Decode(e.to_string())
}

fn user_from_row(row: &MySqlRow) -> Result<User, StoreError> {
    let status: i64 = row.try_get("status").map_err(decode_err)?;
    Ok(User {
        id: row.try_get("id").map_err(decode_err)?,
        name: row.try_get("nama").map_err(decode_err)?,
        username: row.try_get("username").map_err(decode_err)?,
        email: row.try_get("email").map_err(decode_err)?,
        role: row.try_get("role").map_err(decode_err)?,
        status: UserStatus::try_from(status).map_err(StoreError::Decode)?,
        created_by: row.try_get("created_by").map_err(decode_err)?,
        updated_by: row.try_get("updated_by").map_err(decode_err)?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at").map_err(decode_err)?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at").map_err(decode_err)?,
    })
}

fn item_from_row(row: &MySqlRow) -> Result<Item, StoreError> {
    Ok(Item {
        id: row.try_get("id").map_err(decode_err)?,
        category_id: row.try_get("kategori_id").map_err(decode_err)?,
        brand_id: row.try_get("merk_id").map_err(decode_err)?,
        code: row.try_get("kode").map_err(decode_err)?,
        name: row.try_get("nama").map_err(decode_err)?,
        length: row.try_get("panjang").map_err(decode_err)?,
        width: row.try_get("lebar").map_err(decode_err)?,
        initial_stock: row.try_get("initial_stok").map_err(decode_err)?,
        initial_area: row.try_get("initial_m2").map_err(decode_err)?,
        remark: row.try_get("keterangan").map_err(decode_err)?,
        created_by: row.try_get("created_by").map_err(decode_err)?,
        updated_by: row.try_get("updated_by").map_err(decode_err)?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at").map_err(decode_err)?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at").map_err(decode_err)?,
    })
}

#[async_trait]
impl CredentialStore for MySqlStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM m_user WHERE username = ?"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn find_password_hash(&self, username: &str) -> Result<Option<String>, StoreError> {
        let hash = sqlx::query_scalar::<_, String>("SELECT password FROM m_user WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(hash)
    }

    async fn insert_user(&self, user: NewUser, password_hash: &str) -> Result<User, StoreError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "INSERT INTO m_user (nama, username, password, email, role, status, \
             created_by, updated_by, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&user.name)
        .bind(&user.username)
        .bind(password_hash)
        .bind(&user.email)
        .bind(&user.role)
        .bind(i64::from(user.status))
        .bind(&user.created_by)
        .bind(&user.updated_by)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&mut *tx)
        .await;

        let result = match result {
            Ok(r) => r,
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                debug!(username = %user.username, "insert_user: username already taken");
                return Err(StoreError::Duplicate(user.username));
            }
            Err(e) => {
                error!(username = %user.username, error = %e, "insert_user: insert failed");
                return Err(e.into());
            }
        };

        tx.commit().await?;

        let id = i64::try_from(result.last_insert_id())
            .map_err(|e| StoreError::Decode(format!("user id out of range: {e}")))?;
        Ok(user.into_user(id))
    }
}

#[async_trait]
impl ItemStore for MySqlStore {
    async fn query_all(&self) -> Result<Vec<Result<Item, StoreError>>, StoreError> {
        let rows = sqlx::query(&format!("SELECT {ITEM_COLUMNS} FROM m_barang"))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(item_from_row).collect())
    }

    async fn query_by_id(&self, id: i64) -> Result<Option<Item>, StoreError> {
        let row = sqlx::query(&format!("SELECT {ITEM_COLUMNS} FROM m_barang WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(item_from_row).transpose()
    }
}
