//! Business logic services.
//!
//! Services wire the pure chart engine to storage. HTTP handlers only talk to
//! services.

pub mod account_service;
