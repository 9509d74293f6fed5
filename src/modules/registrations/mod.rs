//! Course registration: per-semester selection, unit cap, tuple-keyed upsert.

pub mod controller;
pub mod model;
pub mod router;
pub mod service;
