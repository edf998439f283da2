//! Authentication domain models.

use http::StatusCode;
use serde::{Deserialize, Serialize};

use super::user::User;

/// Message shared by every credential failure, so callers cannot tell a
/// missing user from a wrong password.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid username/password";

/// Message returned for unexpected failures; carries no internal detail.
pub const INTERNAL_ERROR_MESSAGE: &str = "An error occurred while processing your request.";

/// Claims signed into every access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Display name of the subject.
    pub name: String,
    /// Username of the subject; used to resolve the user on each request.
    pub username: String,
    /// Expiry (unix timestamp, seconds).
    pub exp: i64,
}

/// Result of a login attempt.
///
/// Validation and credential failures are ordinary outcomes with
/// `success == false`; `status` is the HTTP status the transport should use.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginOutcome {
    pub success: bool,
    pub status: StatusCode,
    pub message: String,
    pub token: Option<String>,
    pub user: Option<User>,
}

impl LoginOutcome {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::failure(StatusCode::BAD_REQUEST, message)
    }

    pub fn invalid_credentials() -> Self {
        Self::failure(StatusCode::FORBIDDEN, INVALID_CREDENTIALS_MESSAGE)
    }

    pub fn internal_error() -> Self {
        Self::failure(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
    }

    pub fn success(token: String, user: User) -> Self {
        Self {
            success: true,
            status: StatusCode::OK,
            message: "OK".to_string(),
            token: Some(token),
            user: Some(user),
        }
    }

    fn failure(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            success: false,
            status,
            message: message.into(),
            token: None,
            user: None,
        }
    }
}
