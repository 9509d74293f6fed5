//! Academic year management: sessions, active semesters, level promotion.

pub mod controller;
pub mod model;
pub mod router;
pub mod service;
