//! Shared utilities.
//!
//! - [`errors`]: Application error types and handling
//! - [`jwt`]: Session token creation and verification
//! - [`password`]: Password hashing and verification

pub mod errors;
pub mod jwt;
pub mod password;
