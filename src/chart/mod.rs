//! Hierarchical code engine.
//!
//! Pure functions over an in-memory account snapshot: no I/O and no shared
//! state, so every call can be reasoned about from its arguments alone.

pub mod address;
pub mod allocator;
pub mod query;
pub mod validator;
