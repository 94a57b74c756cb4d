//! Data models shared by the engine, the store and the HTTP layer.

/// Chart-of-accounts entry, requests and suggestion types
pub mod account;
