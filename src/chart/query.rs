//! Read-only structural queries over a flat account snapshot.
//!
//! The tree is never stored. Every relation is recomputed from codes, so a
//! stale `parent_id` cannot produce a dangling or cyclic edge.

use uuid::Uuid;

use super::address::{self, CodeAddress, MAX_SEGMENT};
use crate::models::account::Account;

/// Queries over a borrowed account collection.
#[derive(Debug, Clone, Copy)]
pub struct TreeQuery<'a> {
    accounts: &'a [Account],
}

impl<'a> TreeQuery<'a> {
    pub fn new(accounts: &'a [Account]) -> Self {
        Self { accounts }
    }

    pub fn find_by_id(&self, id: Uuid) -> Option<&'a Account> {
        self.accounts.iter().find(|account| account.id == id)
    }

    /// Lookup by tree address, so `01.002` finds the account stored as `1.2`.
    /// Unparsable input falls back to an exact string match.
    pub fn find_by_code(&self, code: &str) -> Option<&'a Account> {
        let Ok(target) = code.trim().parse::<CodeAddress>() else {
            return self.accounts.iter().find(|account| account.code == code);
        };
        self.accounts
            .iter()
            .find(|account| account.code.parse::<CodeAddress>().is_ok_and(|c| c == target))
    }

    pub fn code_exists(&self, code: &str) -> bool {
        self.find_by_code(code).is_some()
    }

    /// All accounts whose code is a direct child of `parent_code`.
    pub fn direct_children(&self, parent_code: &str) -> Vec<&'a Account> {
        self.accounts
            .iter()
            .filter(|account| address::is_direct_child(&account.code, parent_code))
            .collect()
    }

    /// Direct child with the numerically largest last segment.
    pub fn max_direct_child(&self, parent_code: &str) -> Option<&'a Account> {
        self.direct_children(parent_code)
            .into_iter()
            .filter_map(|account| {
                let code = account.code.parse::<CodeAddress>().ok()?;
                Some((code.last(), account))
            })
            .max_by_key(|(last, _)| *last)
            .map(|(_, account)| account)
    }

    pub fn has_children(&self, code: &str) -> bool {
        self.accounts
            .iter()
            .any(|account| address::is_direct_child(&account.code, code))
    }

    /// A container whose highest child already sits on the segment ceiling.
    pub fn is_full(&self, code: &str) -> bool {
        self.max_direct_child(code)
            .and_then(|child| child.code.parse::<CodeAddress>().ok())
            .is_some_and(|child| child.last() == MAX_SEGMENT)
    }

    /// Whether `account` may be offered an "add child" action.
    pub fn can_accept_more_children(&self, account: &Account) -> bool {
        !account.accepts_entries && !self.is_full(&account.code)
    }

    /// Single-segment accounts.
    pub fn roots(&self) -> Vec<&'a Account> {
        self.accounts
            .iter()
            .filter(|account| {
                account
                    .code
                    .parse::<CodeAddress>()
                    .is_ok_and(|code| code.is_root())
            })
            .collect()
    }

    /// Largest root segment in use, `None` when there are no roots.
    pub fn max_root(&self) -> Option<u32> {
        self.roots()
            .into_iter()
            .filter_map(|account| account.code.parse::<CodeAddress>().ok())
            .map(|code| code.last())
            .max()
    }

    /// Structural parent, looked up by code.
    pub fn parent_of(&self, account: &Account) -> Option<&'a Account> {
        let parent_code = address::parent_of(&account.code)?;
        self.find_by_code(&parent_code)
    }

    /// Every account in hierarchical code order.
    pub fn sorted(&self) -> Vec<&'a Account> {
        let mut accounts: Vec<_> = self.accounts.iter().collect();
        sort_by_code(&mut accounts);
        accounts
    }

    /// Accounts that may receive children (parent picker candidates).
    pub fn containers(&self) -> Vec<&'a Account> {
        self.sorted()
            .into_iter()
            .filter(|account| !account.accepts_entries)
            .collect()
    }

    /// Case-insensitive substring match on code or name. Blank queries match all.
    pub fn search(&self, query: &str) -> Vec<&'a Account> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.sorted();
        }
        self.sorted()
            .into_iter()
            .filter(|account| {
                account.code.to_lowercase().contains(&query)
                    || account.name.to_lowercase().contains(&query)
            })
            .collect()
    }
}

/// Sort by parsed code; unparsable codes go last in string order.
pub fn sort_by_code(accounts: &mut [&Account]) {
    accounts.sort_by(|a, b| {
        let left = a.code.parse::<CodeAddress>().ok();
        let right = b.code.parse::<CodeAddress>().ok();
        match (left, right) {
            (Some(left), Some(right)) => left.cmp(&right),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.code.cmp(&b.code),
        }
    });
}
