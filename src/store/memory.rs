use std::{collections::HashMap, sync::Arc};

use tokio::sync::RwLock;

use super::KeyValueStore;
use crate::{error::AppError, models::account::Account};

/// Process-local store, used when no database is configured and in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, Vec<Account>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<Account>>, AppError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, accounts: &[Account]) -> Result<(), AppError> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), accounts.to_vec());
        Ok(())
    }
}
