//! Chart-of-accounts HTTP handlers.
//!
//! This module implements the account-related API endpoints:
//! - GET /api/v1/accounts - List accounts in code order, optionally filtered
//! - POST /api/v1/accounts - Validate and create an account
//! - GET /api/v1/accounts/{id} - Account detail with parent and children
//! - DELETE /api/v1/accounts/{id} - Validate and delete an account
//! - GET /api/v1/accounts/{id}/children - Direct children by code
//! - GET /api/v1/parent-options - Accounts that may receive children
//! - GET /api/v1/code-suggestions - Next available code

use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::account::{Account, AccountDetail, CodeSuggestion, CreateAccountRequest},
    services::account_service::AccountService,
    store::KeyValueStore,
};

/// Shared service handle injected into every handler.
pub type SharedService<S> = Arc<AccountService<S>>;

/// Query string for `GET /api/v1/accounts`.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    /// Case-insensitive match on code or name
    pub search: Option<String>,
}

/// Query string for `GET /api/v1/code-suggestions`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestParams {
    /// Requested parent; omitted for a new root
    pub parent_id: Option<Uuid>,
}

/// List accounts.
///
/// # Endpoint
///
/// `GET /api/v1/accounts?search=rent`
///
/// # Ordering
///
/// Accounts are returned in hierarchical code order (`1`, `1.2`, `1.10`, `2`).
pub async fn list_accounts<S: KeyValueStore>(
    State(service): State<SharedService<S>>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<Account>>, AppError> {
    let Query(params) = params?;
    let accounts = service.search(params.search.as_deref()).await?;
    Ok(Json(accounts))
}

/// Create a new account.
///
/// # Endpoint
///
/// `POST /api/v1/accounts`
///
/// # Request Body
///
/// ```json
/// {
///   "code": "1.1",
///   "name": "Sales",
///   "type": "receipt",
///   "acceptsEntries": true,
///   "parentId": "550e8400-e29b-41d4-a716-446655440000"
/// }
/// ```
///
/// # Response
///
/// - **Success (201 Created)**: Returns the created account
/// - **Error (400)**: Body is not a valid account request
/// - **Error (422)**: One or more rules failed; every `fieldErrors` entry names its field
pub async fn create_account<S: KeyValueStore>(
    State(service): State<SharedService<S>>,
    payload: Result<Json<CreateAccountRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Account>), AppError> {
    let Json(request) = payload?;

    let account = service.validate_and_create(request).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

/// Get an account with its parent, children and "add child" affordance.
///
/// # Response
///
/// - **Success (200 OK)**: Returns the account detail
/// - **Error (400)**: Id is not a UUID
/// - **Error (404)**: Account not found
pub async fn get_account<S: KeyValueStore>(
    State(service): State<SharedService<S>>,
    account_id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<AccountDetail>, AppError> {
    let Path(account_id) = account_id?;
    let detail = service.account_detail(account_id).await?;
    Ok(Json(detail))
}

/// Delete an account.
///
/// # Response
///
/// - **Success (204 No Content)**
/// - **Error (404)**: Account not found
/// - **Error (422)**: Account still has children
pub async fn delete_account<S: KeyValueStore>(
    State(service): State<SharedService<S>>,
    account_id: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(account_id) = account_id?;
    service.validate_and_delete(account_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Direct children of an account, in code order.
pub async fn list_children<S: KeyValueStore>(
    State(service): State<SharedService<S>>,
    account_id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Vec<Account>>, AppError> {
    let Path(account_id) = account_id?;
    let children = service.children(account_id).await?;
    Ok(Json(children))
}

/// Container accounts, for the parent picker.
pub async fn parent_options<S: KeyValueStore>(
    State(service): State<SharedService<S>>,
) -> Result<Json<Vec<Account>>, AppError> {
    let options = service.parent_options().await?;
    Ok(Json(options))
}

/// Suggest the next code.
///
/// # Endpoint
///
/// `GET /api/v1/code-suggestions?parentId=<uuid>`
///
/// # Response (200 OK)
///
/// Always 200, failures included: an empty `suggestedCode` with a `reason`
/// means nothing can be allocated. `parentChanged: true` means the requested
/// parent was full and the suggestion moved up the tree.
///
/// ```json
/// {
///   "suggestedCode": "1.6",
///   "suggestedParentId": "550e8400-e29b-41d4-a716-446655440000",
///   "parentChanged": true,
///   "reason": "parent container is full (999 children); suggesting next available code"
/// }
/// ```
pub async fn suggest_code<S: KeyValueStore>(
    State(service): State<SharedService<S>>,
    params: Result<Query<SuggestParams>, QueryRejection>,
) -> Result<Json<CodeSuggestion>, AppError> {
    let Query(params) = params?;
    let suggestion = service.suggest_code(params.parent_id).await?;
    Ok(Json(suggestion))
}
