//! Student records: admin-managed CRUD, matric assignment, password resets.

pub mod controller;
pub mod model;
pub mod router;
pub mod service;
