//! User provisioning handler.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::{Extension, Json};
use pos_core::users::CreateUser;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{CreateUserRequest, CreateUserResponse};

/// `POST /api/v1/user`: create an account and return its generated password.
pub async fn create_user_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(operator)): Extension<AuthenticatedUser>,
    body: Result<Json<CreateUserRequest>, JsonRejection>,
) -> AppResult<Json<CreateUserResponse>> {
    let Json(body) = body.map_err(|_| AppError::Validation("Invalid parameter".into()))?;
    let (_, user_password) = state
        .users
        .create_user(CreateUser {
            name: &body.name,
            username: &body.username,
            email: &body.email,
            role: &body.role,
            created_by: &operator.username,
        })
        .await?;
    Ok(Json(CreateUserResponse { user_password }))
}
