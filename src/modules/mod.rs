pub mod academic_periods;
pub mod academic_years;
pub mod auth;
pub mod courses;
pub mod departments;
pub mod registrations;
pub mod students;
