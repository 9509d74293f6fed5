use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::enums::{CourseStatus, StudyLevel};
use crate::models::ids::{AcademicYearId, CourseId};

/// Course entity. A course belongs to exactly one
/// department/level/year/semester combination; its code is unique across the
/// whole directory, not scoped to the department.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Course {
    pub id: CourseId,
    /// Globally unique course code, e.g. "COM101"
    pub code: String,
    pub title: String,
    /// Credit weight summed toward the registration cap
    pub unit: i32,
    pub status: CourseStatus,
    /// Owning department name, matched exactly during eligibility lookups
    pub department: String,
    pub level: StudyLevel,
    /// 1 or 2
    pub semester: i32,
    pub academic_year_id: AcademicYearId,
    pub description: Option<String>,
    pub prerequisites: Vec<CourseId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCourseDto {
    #[validate(length(min = 1, max = 20, message = "code is required"))]
    pub code: String,
    #[validate(length(min = 1, max = 200, message = "title is required"))]
    pub title: String,
    #[validate(range(min = 1, message = "unit must be a positive integer"))]
    pub unit: i32,
    pub status: CourseStatus,
    #[validate(length(min = 1, max = 100, message = "department is required"))]
    pub department: String,
    pub level: StudyLevel,
    #[validate(range(min = 1, max = 2, message = "semester must be 1 or 2"))]
    pub semester: i32,
    pub academic_year_id: AcademicYearId,
    pub description: Option<String>,
    #[serde(default)]
    pub prerequisites: Vec<CourseId>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateCourseDto {
    #[validate(length(min = 1, max = 20, message = "code is required"))]
    pub code: Option<String>,
    #[validate(length(min = 1, max = 200, message = "title is required"))]
    pub title: Option<String>,
    #[validate(range(min = 1, message = "unit must be a positive integer"))]
    pub unit: Option<i32>,
    pub status: Option<CourseStatus>,
    #[validate(length(min = 1, max = 100, message = "department is required"))]
    pub department: Option<String>,
    pub level: Option<StudyLevel>,
    #[validate(range(min = 1, max = 2, message = "semester must be 1 or 2"))]
    pub semester: Option<i32>,
    pub academic_year_id: Option<AcademicYearId>,
    pub description: Option<String>,
    pub prerequisites: Option<Vec<CourseId>>,
}

/// Query filter for the eligibility listing used by registration.
#[derive(Debug, Clone, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct EligibleCoursesQuery {
    pub department: String,
    pub level: StudyLevel,
    pub academic_year_id: AcademicYearId,
}
