//! Login handler.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use pos_core::models::LoginOutcome;
use tracing::{debug, error};

use crate::AppState;
use crate::models::{LoginRequest, LoginResponse};

/// `POST /api/v1/login`: authenticate with username + password.
///
/// Always answers with a [`LoginResponse`] body; the status comes from the
/// login outcome.
pub async fn login_handler(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => {
            debug!(error = %rejection, "unreadable login body");
            return (
                StatusCode::BAD_REQUEST,
                Json(LoginResponse::failure("Request can not be empty")),
            )
                .into_response();
        }
    };

    let outcome = match state.auth.login(&body.username, &body.password).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!(error = %e, "login failed");
            LoginOutcome::internal_error()
        }
    };
    (outcome.status, Json(LoginResponse::from(outcome))).into_response()
}
