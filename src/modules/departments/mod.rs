//! Department directory: codes, program levels, matric number generation.

pub mod controller;
pub mod matric;
pub mod model;
pub mod router;
pub mod service;
