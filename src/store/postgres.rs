use sqlx::types::Json;

use super::KeyValueStore;
use crate::{db::DbPool, error::AppError, models::account::Account};

/// PostgreSQL-backed store.
///
/// # Database Table
///
/// Maps to the `kv_store` table: one row per key, the collection kept as a
/// JSONB array in `value`.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl KeyValueStore for PgStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<Account>>, AppError> {
        let value = sqlx::query_scalar::<_, Json<Vec<Account>>>(
            "SELECT value FROM kv_store WHERE key = $1",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(value.map(|Json(accounts)| accounts))
    }

    async fn set(&self, key: &str, accounts: &[Account]) -> Result<(), AppError> {
        // Single statement, so the replacement is atomic.
        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (key) DO UPDATE
            SET value = EXCLUDED.value,
                updated_at = NOW()
            "#,
        )
        .bind(key)
        .bind(Json(accounts))
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
