//! Student authentication: login, session tokens, profile resolution.

pub mod controller;
pub mod model;
pub mod router;
pub mod service;
