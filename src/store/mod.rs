//! Persistence collaborator.
//!
//! The whole account collection lives under a single key and is always read
//! and written in full. A write replaces the previous collection; there is no
//! merge and no version token, so concurrent writers from different processes
//! follow last-writer-wins.

use std::future::Future;

use crate::{error::AppError, models::account::Account};

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Key-value storage for account collections.
pub trait KeyValueStore: Send + Sync + 'static {
    /// Collection stored under `key`, `None` if nothing was ever written.
    fn get(&self, key: &str)
    -> impl Future<Output = Result<Option<Vec<Account>>, AppError>> + Send;

    /// Replace the collection stored under `key`.
    fn set(&self, key: &str, accounts: &[Account])
    -> impl Future<Output = Result<(), AppError>> + Send;
}
