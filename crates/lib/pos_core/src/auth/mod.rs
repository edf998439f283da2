//! Authentication and authorization.
//!
//! Token issuance and verification, bcrypt password handling, the static
//! permission table, and the service that ties them to the credential store.

pub mod jwt;
pub mod password;
pub mod permissions;
pub mod service;

pub use jwt::{TokenCodec, TokenError};
pub use permissions::PermissionTable;
pub use service::AuthService;

use http::StatusCode;
use thiserror::Error;

use crate::store::StoreError;

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Empty token")]
    EmptyToken,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Signing error: {0}")]
    SigningError(String),

    #[error("Store error: {0}")]
    StoreError(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// HTTP status a transport should answer with for this error.
    pub fn status_hint(&self) -> StatusCode {
        match self {
            AuthError::EmptyToken
            | AuthError::InvalidToken(_)
            | AuthError::UserNotFound(_) => StatusCode::FORBIDDEN,
            AuthError::SigningError(_) | AuthError::StoreError(_) | AuthError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<TokenError> for AuthError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Empty => AuthError::EmptyToken,
            TokenError::Invalid(msg) => AuthError::InvalidToken(msg),
            TokenError::Signing(msg) => AuthError::SigningError(msg),
        }
    }
}
