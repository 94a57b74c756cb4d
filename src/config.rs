//! Application configuration management.
//!
//! Configuration is read from environment variables (optionally seeded from a
//! `.env` file) and deserialized with `envy`.

use serde::Deserialize;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `DATABASE_URL` (optional): PostgreSQL connection string. Without it the
///   accounts live in process memory and are lost on restart.
/// - `DATABASE_MAX_CONNECTIONS` (optional): pool size, defaults to 5
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 3000
/// - `STORAGE_KEY` (optional): key the account collection is stored under
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database_url: Option<String>,

    #[serde(default = "default_max_connections")]
    pub database_max_connections: u32,

    #[serde(default = "default_port")]
    pub server_port: u16,

    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

fn default_max_connections() -> u32 {
    5
}

fn default_port() -> u16 {
    3000
}

fn default_storage_key() -> String {
    "@chart_of_accounts:accounts".to_string()
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if an environment variable value cannot be parsed into
    /// the expected type (e.g. a non-numeric `SERVER_PORT`).
    pub fn from_env() -> Result<Self, envy::Error> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        Self::from_vars(std::env::vars())
    }

    /// Build configuration from explicit key/value pairs.
    pub fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, Config>(vars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_unset() {
        let config = Config::from_vars(Vec::new()).unwrap();

        assert!(config.database_url.is_none());
        assert_eq!(config.database_max_connections, 5);
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.storage_key, "@chart_of_accounts:accounts");
    }

    #[test]
    fn reads_upper_case_variables() {
        let config = Config::from_vars(vec![
            ("DATABASE_URL".to_string(), "postgres://localhost/coa".to_string()),
            ("SERVER_PORT".to_string(), "8080".to_string()),
            ("STORAGE_KEY".to_string(), "tenant-a".to_string()),
        ])
        .unwrap();

        assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/coa"));
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.storage_key, "tenant-a");
    }

    #[test]
    fn rejects_non_numeric_port() {
        let result = Config::from_vars(vec![("SERVER_PORT".to_string(), "http".to_string())]);
        assert!(result.is_err());
    }
}
