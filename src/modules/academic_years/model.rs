//! Academic year models and DTOs.
//!
//! An academic year carries the state that gates student registration: which
//! semester is open per program track, and which level each track currently
//! sits at.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::enums::{Program, Semester, StudyLevel};
use crate::models::ids::AcademicYearId;

/// Academic year entity (e.g. session "2024/2025").
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AcademicYear {
    pub id: AcademicYearId,
    /// Session label, e.g. "2024/2025"
    pub session: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Semester currently open for ND registration, if any
    pub nd_active_semester: Option<Semester>,
    /// Semester currently open for HND registration, if any
    pub hnd_active_semester: Option<Semester>,
    pub nd_current_level: StudyLevel,
    pub hnd_current_level: StudyLevel,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a new academic year.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateAcademicYearDto {
    /// Session label (e.g. "2024/2025")
    #[validate(length(min = 1, max = 20, message = "session is required"))]
    pub session: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// DTO for updating an academic year's session or dates.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateAcademicYearDto {
    #[validate(length(min = 1, max = 20, message = "session is required"))]
    pub session: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// DTO for overwriting a program track's active semester.
///
/// `semester: null` closes registration for the track. The overwrite is
/// unconditional; there is no check that the previous semester was closed out.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SetActiveSemesterDto {
    pub program: Program,
    pub semester: Option<Semester>,
}

/// DTO for promoting a program track's current level.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PromoteLevelDto {
    pub program: Program,
}
