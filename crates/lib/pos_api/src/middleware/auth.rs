//! Authentication middleware: access-token extraction and permission checks.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use pos_core::models::User;
use tracing::{debug, error};

use crate::AppState;
use crate::error::AppError;

/// Header carrying the access token.
pub const ACCESS_TOKEN_HEADER: &str = "x-access-token";

pub const MISSING_TOKEN_MESSAGE: &str = "Missing access token";
pub const NOT_AUTHORIZED_MESSAGE: &str = "NOT AUTHORIZED";
pub const PERMISSION_DENIED_MESSAGE: &str = "You don't have permission to access this resource";

/// The resolved caller, stored in request extensions.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

/// State for [`require_permission`]: the app plus the permission a route demands.
#[derive(Clone)]
pub struct PermissionGuard {
    state: AppState,
    permission: &'static str,
}

impl PermissionGuard {
    pub fn new(state: AppState, permission: &'static str) -> Self {
        Self { state, permission }
    }
}

/// Read the token from `x-access-token`, falling back to `Authorization: Bearer`.
fn extract_token(headers: &HeaderMap) -> Option<&str> {
    if let Some(token) = headers
        .get(ACCESS_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|t| !t.is_empty())
    {
        return Some(token);
    }
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Axum middleware: verifies the access token, resolves the user, and
/// injects `AuthenticatedUser` into request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_token(request.headers())
        .ok_or_else(|| AppError::Forbidden(MISSING_TOKEN_MESSAGE.into()))?
        .to_string();

    let user = state
        .auth
        .authenticate_token(&token)
        .await
        .map_err(|e| match AppError::from(e) {
            AppError::Forbidden(reason) => {
                debug!(reason = %reason, "access token rejected");
                AppError::Forbidden(NOT_AUTHORIZED_MESSAGE.into())
            }
            AppError::Internal(detail) => {
                error!(error = %detail, "failed to authenticate access token");
                AppError::Internal(detail)
            }
            other => other,
        })?;

    request.extensions_mut().insert(AuthenticatedUser(user));

    Ok(next.run(request).await)
}

/// Axum middleware: rejects callers whose role lacks the guarded permission.
///
/// Must run inside [`require_auth`].
pub async fn require_permission(
    State(guard): State<PermissionGuard>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(AuthenticatedUser(user)) = request.extensions().get::<AuthenticatedUser>() else {
        return Err(AppError::Forbidden(NOT_AUTHORIZED_MESSAGE.into()));
    };

    if !guard.state.auth.check_permission(user, guard.permission) {
        debug!(
            username = %user.username,
            role = %user.role,
            permission = guard.permission,
            "permission denied"
        );
        return Err(AppError::Forbidden(PERMISSION_DENIED_MESSAGE.into()));
    }

    Ok(next.run(request).await)
}
