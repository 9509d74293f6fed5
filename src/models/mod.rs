//! Shared domain types: strongly-typed ids and enums.

pub mod enums;
pub mod ids;
