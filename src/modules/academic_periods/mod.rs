//! Named academic periods (terms, breaks) tracked alongside academic years.

pub mod controller;
pub mod model;
pub mod router;
pub mod service;
