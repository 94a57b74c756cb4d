//! Chart of Accounts Service - Main Application Entry Point
//!
//! A REST API for managing a chart of accounts: a tree of typed ledger
//! accounts addressed by dotted codes such as `1.2.3`. The service suggests
//! the next free code (promoting to an ancestor level when a container is
//! full) and enforces the structural rules on creation and deletion.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Engine**: pure functions over the account snapshot (`chart`)
//! - **Storage**: one JSON collection under a single key, in PostgreSQL via
//!   sqlx or in process memory
//! - **Format**: JSON requests/responses
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Pick the store (PostgreSQL when `DATABASE_URL` is set, memory otherwise)
//! 3. Run database migrations
//! 4. Build HTTP router with routes and middleware
//! 5. Start server on configured port

mod chart;
mod config;
mod db;
mod error;
mod handlers;
mod models;
mod services;
mod store;

use std::sync::Arc;

use axum::Router;
use tracing_subscriber::EnvFilter;

use services::account_service::AccountService;
use store::{MemoryStore, PgStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with tracing subscriber. Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = config::Config::from_env()?;
    tracing::info!(key = %config.storage_key, "Configuration loaded");

    let app: Router = match config.database_url.as_deref() {
        Some(database_url) => {
            let pool = db::create_pool(database_url, config.database_max_connections).await?;
            tracing::info!("Database pool created");

            db::run_migrations(&pool).await?;
            tracing::info!("Database migrations complete");

            let service = AccountService::new(PgStore::new(pool), config.storage_key.clone());
            handlers::router(Arc::new(service))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, accounts are kept in memory only");
            let service = AccountService::new(MemoryStore::new(), config.storage_key.clone());
            handlers::router(Arc::new(service))
        }
    };

    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
