//! Environment-driven configuration.
//!
//! Each concern has its own `from_env()` struct, assembled into
//! [`crate::state::AppState`] at startup.

pub mod cors;
pub mod database;
pub mod jwt;
