//! # pos_api
//!
//! HTTP API library for the POS backend.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use pos_core::auth::permissions::{CREATE_USER, ITEM_DETAILS, LIST_ITEMS};
use pos_core::auth::{AuthService, PermissionTable};
use pos_core::items::ItemCache;
use pos_core::store::{CredentialStore, ItemStore};
use pos_core::users::UserService;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::handlers::{auth, hello, items, users};
use crate::middleware::auth::{PermissionGuard, require_auth, require_permission};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// API configuration.
    pub config: ApiConfig,
    pub auth: Arc<AuthService>,
    /// Warmed item catalog.
    pub items: Arc<ItemCache>,
    pub users: Arc<UserService>,
}

impl AppState {
    /// Wire the services over the given stores and warm the item cache.
    pub async fn build(
        config: ApiConfig,
        credentials: Arc<dyn CredentialStore>,
        item_store: Arc<dyn ItemStore>,
    ) -> Self {
        let auth = AuthService::new(
            credentials.clone(),
            config.token_codec(),
            PermissionTable::builtin(),
            config.login_duration(),
        );
        let items = ItemCache::warm(item_store).await;
        Self {
            config,
            auth: Arc::new(auth),
            items: Arc::new(items),
            users: Arc::new(UserService::new(credentials)),
        }
    }
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public routes (no auth required)
    let public = Router::new()
        .route(routes::GET_ROOT, get(hello::ready))
        .route(routes::POST_LOGIN, post(auth::login_handler));

    // Protected routes: authentication first, then the per-route permission
    let list_items = Router::new()
        .route(routes::GET_ITEMS, get(items::list_items_handler))
        .route_layer(from_fn_with_state(
            PermissionGuard::new(state.clone(), LIST_ITEMS),
            require_permission,
        ));
    let item_details = Router::new()
        .route(routes::GET_ITEMS_ID, get(items::get_item_handler))
        .route_layer(from_fn_with_state(
            PermissionGuard::new(state.clone(), ITEM_DETAILS),
            require_permission,
        ));
    let create_user = Router::new()
        .route(routes::POST_USER, post(users::create_user_handler))
        .route_layer(from_fn_with_state(
            PermissionGuard::new(state.clone(), CREATE_USER),
            require_permission,
        ));

    let protected = Router::new()
        .merge(list_items)
        .merge(item_details)
        .merge(create_user)
        .layer(from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
