//! Account data models and API request/response types.
//!
//! This module defines:
//! - `Account`: the persisted chart-of-accounts entry
//! - `CreateAccountRequest`: Request body for creating accounts
//! - `CodeSuggestion`: the allocator's answer for the account form
//! - `AccountDetail`: an account together with its structural neighbours

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::chart::address::CodeAddress;

/// Revenue vs. expenditure classification.
///
/// Children always carry the same type as their parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Receipt,
    Expense,
}

impl AccountType {
    /// Human-readable label used in error messages.
    pub fn label(self) -> &'static str {
        match self {
            AccountType::Receipt => "Receipt",
            AccountType::Expense => "Expense",
        }
    }
}

/// A single entry of the chart of accounts.
///
/// # Stored Shape
///
/// The whole collection is persisted as one JSON array under a single key:
///
/// ```json
/// {
///   "id": "550e8400-e29b-41d4-a716-446655440000",
///   "code": "1.2",
///   "name": "Office supplies",
///   "type": "expense",
///   "acceptsEntries": true,
///   "parentId": "660e8400-e29b-41d4-a716-446655440001",
///   "createdAt": "2025-12-20T10:00:00Z",
///   "updatedAt": "2025-12-20T10:00:00Z"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Unique identifier, never reused
    pub id: Uuid,

    /// Dotted-segment code, e.g. `1.2.3`
    ///
    /// This is the authoritative structural signal. Parent/child relations are
    /// derived from it, not from `parent_id`.
    pub code: String,

    /// Display name
    pub name: String,

    #[serde(rename = "type")]
    pub account_type: AccountType,

    /// `true` for posting (leaf) accounts, `false` for containers
    pub accepts_entries: bool,

    /// Cached reference to the parent account, kept consistent with `code` at creation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Uuid>,

    pub created_at: DateTime<Utc>,

    /// Equal to `created_at`; accounts are never edited in place
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Build a freshly created account from a validated request.
    ///
    /// The code is stored in canonical form (`01.002` becomes `1.2`).
    pub fn from_request(request: CreateAccountRequest) -> Self {
        let now = Utc::now();
        let code = request.code.trim();
        let code = code
            .parse::<CodeAddress>()
            .map_or_else(|_| code.to_string(), |address| address.to_string());
        Self {
            id: Uuid::new_v4(),
            code,
            name: request.name.trim().to_string(),
            account_type: request.account_type,
            accepts_entries: request.accepts_entries,
            parent_id: request.parent_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Request body for creating a new account.
///
/// # JSON Example
///
/// ```json
/// {
///   "code": "1.3",
///   "name": "Services",
///   "type": "receipt",
///   "acceptsEntries": true,
///   "parentId": "550e8400-e29b-41d4-a716-446655440000"
/// }
/// ```
///
/// # Validation
///
/// - `code`: Required, `999.999.999` shape, each segment in `[1, 999]`
/// - `name`: Required, any non-blank string
/// - `parentId`: Optional; when present the code must be a direct child of the parent's code
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    pub code: String,

    pub name: String,

    #[serde(rename = "type")]
    pub account_type: AccountType,

    pub accepts_entries: bool,

    #[serde(default)]
    pub parent_id: Option<Uuid>,
}

/// A rule violation tied to the request field that caused it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Result of asking the allocator for the next free code.
///
/// An empty `suggested_code` means no code could be allocated; `reason` then
/// says why and the caller must block submission.
///
/// # JSON Example
///
/// ```json
/// {
///   "suggestedCode": "2",
///   "parentChanged": true,
///   "reason": "parent container is full (999 children); suggesting next available code"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeSuggestion {
    pub suggested_code: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_parent_id: Option<Uuid>,

    pub parent_changed: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl CodeSuggestion {
    /// A usable code that keeps the requested parent.
    pub fn code(code: impl Into<String>, parent_id: Option<Uuid>) -> Self {
        Self {
            suggested_code: code.into(),
            suggested_parent_id: parent_id,
            parent_changed: false,
            reason: None,
        }
    }

    /// No code could be allocated.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            suggested_code: String::new(),
            suggested_parent_id: None,
            parent_changed: false,
            reason: Some(reason.into()),
        }
    }

    /// Mark the suggestion as relocated under `parent_id`.
    pub fn promoted(mut self, parent_id: Option<Uuid>, reason: impl Into<String>) -> Self {
        self.suggested_parent_id = parent_id;
        self.parent_changed = true;
        self.reason = Some(reason.into());
        self
    }

    pub fn is_failure(&self) -> bool {
        self.suggested_code.is_empty()
    }
}

/// Account together with its structural parent and direct children.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDetail {
    pub account: Account,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<Account>,

    pub children: Vec<Account>,

    /// Whether the "add child" affordance should be offered
    pub can_accept_more_children: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_serializes_with_stored_field_names() {
        let account = Account::from_request(CreateAccountRequest {
            code: " 01.002 ".to_string(),
            name: " Rent ".to_string(),
            account_type: AccountType::Expense,
            accepts_entries: true,
            parent_id: None,
        });

        let value = serde_json::to_value(&account).unwrap();
        assert_eq!(value["code"], "1.2");
        assert_eq!(value["name"], "Rent");
        assert_eq!(value["type"], "expense");
        assert_eq!(value["acceptsEntries"], true);
        assert!(value.get("parentId").is_none());
        assert_eq!(value["createdAt"], value["updatedAt"]);
    }

    #[test]
    fn create_request_accepts_missing_parent() {
        let request: CreateAccountRequest = serde_json::from_str(
            r#"{"code":"3","name":"Sales","type":"receipt","acceptsEntries":false}"#,
        )
        .unwrap();

        assert_eq!(request.account_type, AccountType::Receipt);
        assert!(request.parent_id.is_none());
    }

    #[test]
    fn failed_suggestion_has_empty_code_and_reason() {
        let suggestion = CodeSuggestion::failed("parent not found");
        assert!(suggestion.is_failure());
        assert!(!suggestion.parent_changed);
        assert_eq!(suggestion.reason.as_deref(), Some("parent not found"));
    }
}
