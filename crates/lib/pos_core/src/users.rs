//! User provisioning.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{error, info};

use crate::auth::password::{generate_password, hash_password};
use crate::models::{NewUser, User, UserStatus};
use crate::store::{CredentialStore, StoreError};

/// Provisioning errors.
#[derive(Debug, Error)]
pub enum UserError {
    #[error("{0}")]
    Validation(String),

    #[error("Username already exists: {0}")]
    Duplicate(String),

    #[error("Password hashing failed: {0}")]
    Hash(String),

    #[error("Store error: {0}")]
    StoreError(StoreError),
}

impl From<StoreError> for UserError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate(username) => UserError::Duplicate(username),
            other => UserError::StoreError(other),
        }
    }
}

/// Request to provision a user.
#[derive(Debug, Clone)]
pub struct CreateUser<'a> {
    pub name: &'a str,
    pub username: &'a str,
    pub email: &'a str,
    pub role: &'a str,
    /// Username of the operator creating the account.
    pub created_by: &'a str,
}

/// Creates user accounts with generated initial passwords.
pub struct UserService {
    store: Arc<dyn CredentialStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Create a user and return it with its generated plaintext password.
    ///
    /// The plaintext is returned exactly once; only its bcrypt hash is stored.
    pub async fn create_user(&self, req: CreateUser<'_>) -> Result<(User, String), UserError> {
        if [req.name, req.username, req.email, req.role]
            .iter()
            .any(|field| field.is_empty())
        {
            info!(
                display_name = req.name,
                username = req.username,
                email = req.email,
                role = req.role,
                "create_user: invalid parameter"
            );
            return Err(UserError::Validation("Invalid parameter".into()));
        }

        let password = generate_password();
        let hash = hash_password(&password).map_err(|e| UserError::Hash(e.to_string()))?;

        let now = Utc::now();
        let new_user = NewUser {
            name: req.name.to_string(),
            username: req.username.to_string(),
            email: req.email.to_string(),
            role: req.role.to_string(),
            status: UserStatus::Active,
            created_by: req.created_by.to_string(),
            updated_by: req.created_by.to_string(),
            created_at: now,
            updated_at: now,
        };

        let user = self.store.insert_user(new_user, &hash).await.map_err(|e| {
            error!(username = req.username, error = %e, "create_user: insert failed");
            UserError::from(e)
        })?;

        info!(username = %user.username, role = %user.role, id = user.id, "user created");
        Ok((user, password))
    }
}
