//! Creation and deletion rules for chart-of-accounts entries.
//!
//! Creation checks accumulate: every violated rule yields its own
//! [`FieldError`] so the form can flag all offending fields at once.

use super::address::{self, MAX_SEGMENT};
use super::query::TreeQuery;
use crate::models::account::{Account, CreateAccountRequest, FieldError};

pub const FIELD_NAME: &str = "name";
pub const FIELD_CODE: &str = "code";
pub const FIELD_TYPE: &str = "type";
pub const FIELD_PARENT: &str = "parentId";
pub const FIELD_ACCOUNT_CODE: &str = "accountCode";

/// Boundary input checks: non-blank name, `999.999.999` code shape, segment range.
///
/// These run before [`validate_creation`] so the engine only ever sees
/// well-formed codes.
pub fn validate_format(request: &CreateAccountRequest) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if request.name.trim().is_empty() {
        errors.push(FieldError::new(FIELD_NAME, "Name is required"));
    }

    if let Err(e) = address::check_format(&request.code) {
        errors.push(FieldError::new(FIELD_CODE, e.to_string()));
    }

    errors
}

/// Structural rules for a new account against the current collection.
pub fn validate_creation(request: &CreateAccountRequest, accounts: &[Account]) -> Vec<FieldError> {
    let query = TreeQuery::new(accounts);
    let mut errors = Vec::new();
    let code = request.code.trim();

    if request.name.trim().is_empty() {
        errors.push(FieldError::new(FIELD_NAME, "Name is required"));
    }

    if code.is_empty() {
        errors.push(FieldError::new(FIELD_CODE, "Code is required"));
    }

    if query.code_exists(code) {
        errors.push(FieldError::new(FIELD_CODE, "This code is already in use"));
    }

    let Some(parent_id) = request.parent_id else {
        return errors;
    };

    let Some(parent) = query.find_by_id(parent_id) else {
        errors.push(FieldError::new(FIELD_PARENT, "Parent account not found"));
        return errors;
    };

    if request.account_type != parent.account_type {
        errors.push(FieldError::new(
            FIELD_TYPE,
            format!(
                "Account must be of type \"{}\" like its parent",
                parent.account_type.label()
            ),
        ));
    }

    if parent.accepts_entries {
        errors.push(FieldError::new(
            FIELD_PARENT,
            "Cannot create a child of an account that accepts entries",
        ));
    }

    if !address::is_direct_child(code, &parent.code) {
        errors.push(FieldError::new(
            FIELD_CODE,
            format!("Code is not available under parent \"{}\"", parent.code),
        ));
    }

    let past_ceiling = address::parse(code)
        .ok()
        .and_then(|segments| segments.last().copied())
        .is_some_and(|last| last > MAX_SEGMENT);
    if query.is_full(&parent.code) && past_ceiling {
        errors.push(FieldError::new(
            FIELD_CODE,
            format!(
                "Parent account \"{}\" has reached the limit of {MAX_SEGMENT} children. Choose another parent.",
                parent.code
            ),
        ));
    }

    errors
}

/// Deletion is refused while the account still has direct children by code.
pub fn validate_deletion(code: &str, accounts: &[Account]) -> Option<FieldError> {
    if TreeQuery::new(accounts).has_children(code) {
        return Some(FieldError::new(
            FIELD_ACCOUNT_CODE,
            "Cannot delete an account that has children",
        ));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::query::tests::{account, container, leaf};
    use crate::models::account::AccountType;
    use uuid::Uuid;

    fn request(code: &str, parent: Option<&Account>) -> CreateAccountRequest {
        CreateAccountRequest {
            code: code.to_string(),
            name: "New account".to_string(),
            account_type: AccountType::Receipt,
            accepts_entries: true,
            parent_id: parent.map(|p| p.id),
        }
    }

    fn fields(errors: &[FieldError]) -> Vec<&str> {
        errors.iter().map(|e| e.field.as_str()).collect()
    }

    #[test]
    fn valid_root_and_child_pass() {
        let accounts = vec![container("1")];
        assert!(validate_creation(&request("2", None), &accounts).is_empty());
        assert!(validate_creation(&request("1.1", Some(&accounts[0])), &accounts).is_empty());
    }

    #[test]
    fn errors_accumulate() {
        let accounts = vec![container("1"), leaf("1.1")];
        let mut dto = request("1.1", None);
        dto.name = "   ".to_string();

        let errors = validate_creation(&dto, &accounts);
        assert_eq!(fields(&errors), vec![FIELD_NAME, FIELD_CODE]);
        assert_eq!(errors[1].message, "This code is already in use");
    }

    #[test]
    fn empty_code_is_reported() {
        let errors = validate_creation(&request("", None), &[]);
        assert_eq!(fields(&errors), vec![FIELD_CODE]);
    }

    #[test]
    fn missing_parent_stops_parent_checks() {
        let mut dto = request("9.9.9", None);
        dto.parent_id = Some(Uuid::new_v4());

        let errors = validate_creation(&dto, &[container("1")]);
        assert_eq!(fields(&errors), vec![FIELD_PARENT]);
    }

    #[test]
    fn child_type_must_match_parent() {
        for (parent_code, child_code) in [("1", "1.1"), ("2.3", "2.3.7"), ("4", "4.999")] {
            let parent = account(parent_code, false, AccountType::Expense);
            let accounts = vec![parent.clone()];

            let errors = validate_creation(&request(child_code, Some(&parent)), &accounts);
            assert_eq!(fields(&errors), vec![FIELD_TYPE], "{parent_code} -> {child_code}");
        }
    }

    #[test]
    fn posting_account_cannot_be_parent() {
        let accounts = vec![leaf("1")];
        let errors = validate_creation(&request("1.1", Some(&accounts[0])), &accounts);

        assert_eq!(fields(&errors), vec![FIELD_PARENT]);
    }

    #[test]
    fn code_must_be_direct_child_of_parent() {
        let accounts = vec![container("1"), container("1.1")];
        let parent = &accounts[0];

        for code in ["2.1", "1.1.1", "1"] {
            let errors = validate_creation(&request(code, Some(parent)), &accounts);
            assert!(
                errors.iter().any(|e| e.field == FIELD_CODE),
                "{code} should be rejected"
            );
        }
    }

    #[test]
    fn full_parent_rejects_codes_past_the_ceiling() {
        let accounts = vec![container("1"), leaf("1.999")];
        let errors = validate_creation(&request("1.1000", Some(&accounts[0])), &accounts);

        assert!(errors.iter().any(|e| e.message.contains("limit of 999")));
    }

    #[test]
    fn full_parent_still_allows_filling_a_gap() {
        let accounts = vec![container("1"), leaf("1.999")];
        let errors = validate_creation(&request("1.5", Some(&accounts[0])), &accounts);
        assert!(errors.is_empty());
    }

    #[test]
    fn deletion_guarded_by_children() {
        let accounts = vec![container("1"), leaf("1.1")];

        let error = validate_deletion("1", &accounts).unwrap();
        assert_eq!(error.field, FIELD_ACCOUNT_CODE);
        assert!(validate_deletion("1.1", &accounts).is_none());
    }

    #[test]
    fn format_checks_name_and_code_shape() {
        let mut dto = request("1.0", None);
        dto.name = String::new();

        let errors = validate_format(&dto);
        assert_eq!(fields(&errors), vec![FIELD_NAME, FIELD_CODE]);
        assert!(validate_format(&request("12.3", None)).is_empty());
    }
}
