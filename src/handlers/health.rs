//! Health check endpoint for service monitoring.

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::accounts::SharedService;
use crate::{error::AppError, store::KeyValueStore};

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall service status
    pub status: String,

    /// Storage status
    pub storage: String,

    /// Number of accounts currently stored
    pub accounts: usize,

    /// Current server timestamp
    pub timestamp: DateTime<Utc>,
}

/// Health check handler.
///
/// Reads the stored collection, so an unreachable store surfaces as the
/// standard 500 error response.
///
/// # Response (200 OK)
///
/// ```json
/// {
///   "status": "healthy",
///   "storage": "connected",
///   "accounts": 12,
///   "timestamp": "2025-12-21T19:00:00Z"
/// }
/// ```
pub async fn health_check<S: KeyValueStore>(
    State(service): State<SharedService<S>>,
) -> Result<Json<HealthResponse>, AppError> {
    let accounts = service.load_all().await?.len();

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        storage: "connected".to_string(),
        accounts,
        timestamp: Utc::now(),
    }))
}
