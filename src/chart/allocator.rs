//! Next-code suggestion with overflow promotion.
//!
//! # Algorithm
//!
//! 1. Without a parent, suggest the next free root (`max root + 1`).
//! 2. With a parent, suggest `parent.(last child + 1)`, or `parent.1` for the
//!    first child.
//! 3. When the parent's last child already sits on segment 999, the new
//!    account cannot fit there. It is promoted to become the next sibling of
//!    the parent one level up, repeating while ancestors are full. A full root
//!    container falls back to step 1.
//!
//! Every promotion is reported through `parent_changed` and `reason` so the
//! caller can warn the user that the requested parent was abandoned.

use uuid::Uuid;

use super::address::{CodeAddress, MAX_ROOT_ACCOUNTS, MAX_SEGMENT};
use super::query::TreeQuery;
use crate::models::account::{Account, CodeSuggestion};

pub const REASON_ROOT_LIMIT: &str = "root limit reached (maximum 999)";
pub const REASON_PARENT_NOT_FOUND: &str = "parent not found";
pub const REASON_ANCESTOR_NOT_FOUND: &str = "ancestor lookup failed";
pub const REASON_PARENT_FULL: &str =
    "parent container is full (999 children); suggesting next available code";

/// Suggest a code for a new account under `parent_id` (or a new root).
pub fn suggest_code(parent_id: Option<Uuid>, accounts: &[Account]) -> CodeSuggestion {
    let query = TreeQuery::new(accounts);

    let Some(parent_id) = parent_id else {
        return next_root(&query);
    };

    let Some(parent) = query.find_by_id(parent_id) else {
        return CodeSuggestion::failed(REASON_PARENT_NOT_FOUND);
    };

    match parent.code.parse::<CodeAddress>() {
        Ok(container) => next_child(&query, &container, parent.id),
        Err(_) => CodeSuggestion::failed(REASON_PARENT_NOT_FOUND),
    }
}

fn next_root(query: &TreeQuery<'_>) -> CodeSuggestion {
    let Some(max) = query.max_root() else {
        return CodeSuggestion::code("1", None);
    };

    match max.checked_add(1).filter(|next| *next <= MAX_ROOT_ACCOUNTS) {
        Some(next) => CodeSuggestion::code(CodeAddress::root(next).to_string(), None),
        None => CodeSuggestion::failed(REASON_ROOT_LIMIT),
    }
}

/// Next free position under `container`, promoting upwards when it is full.
///
/// Recursion depth is bounded by the depth of `container`.
fn next_child(query: &TreeQuery<'_>, container: &CodeAddress, container_id: Uuid) -> CodeSuggestion {
    let container_code = container.to_string();

    let last = query
        .max_direct_child(&container_code)
        .and_then(|child| child.code.parse::<CodeAddress>().ok())
        .map(|child| child.last());

    match last {
        None => CodeSuggestion::code(container.child(1).to_string(), Some(container_id)),
        Some(last) if last < MAX_SEGMENT => {
            CodeSuggestion::code(container.child(last + 1).to_string(), Some(container_id))
        }
        Some(_) => promote(query, container),
    }
}

fn promote(query: &TreeQuery<'_>, container: &CodeAddress) -> CodeSuggestion {
    let Some(grandparent) = container.parent() else {
        tracing::debug!(container = %container, "root container is full, falling back to a new root");
        let root = next_root(query);
        if root.is_failure() {
            return root;
        }
        return root.promoted(None, REASON_PARENT_FULL);
    };

    let Some(grandparent_account) = query.find_by_code(&grandparent.to_string()) else {
        return CodeSuggestion::failed(REASON_ANCESTOR_NOT_FOUND);
    };

    tracing::debug!(container = %container, grandparent = %grandparent, "container is full, promoting");

    let suggestion = next_child(query, &grandparent, grandparent_account.id);
    if suggestion.is_failure() {
        return suggestion;
    }
    if suggestion.parent_changed {
        // A deeper promotion already picked the right parent.
        return suggestion;
    }
    suggestion.promoted(Some(grandparent_account.id), REASON_PARENT_FULL)
}
