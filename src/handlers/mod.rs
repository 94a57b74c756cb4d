//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, URL params, etc.)
//! 2. Delegates to the account service
//! 3. Returns HTTP response (JSON, status code)

/// Chart-of-accounts endpoints
pub mod accounts;
/// Service health endpoint
pub mod health;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::store::KeyValueStore;
use accounts::SharedService;

/// Build the application router around a shared service.
pub fn router<S: KeyValueStore>(service: SharedService<S>) -> Router {
    let api = Router::new()
        .route(
            "/api/v1/accounts",
            get(accounts::list_accounts::<S>).post(accounts::create_account::<S>),
        )
        .route(
            "/api/v1/accounts/{id}",
            get(accounts::get_account::<S>).delete(accounts::delete_account::<S>),
        )
        .route(
            "/api/v1/accounts/{id}/children",
            get(accounts::list_children::<S>),
        )
        .route("/api/v1/parent-options", get(accounts::parent_options::<S>))
        .route("/api/v1/code-suggestions", get(accounts::suggest_code::<S>));

    Router::new()
        // Public routes
        .route("/health", get(health::health_check::<S>))
        .merge(api)
        // Add distributed tracing middleware for observability
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}
