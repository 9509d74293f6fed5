//! Course directory: global code uniqueness, eligibility listing.

pub mod controller;
pub mod model;
pub mod router;
pub mod service;
