use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::enums::{CourseStatus, Semester};
use crate::models::ids::{AcademicYearId, CourseId, RegistrationId, StudentId};
use crate::modules::academic_years::model::AcademicYear;
use crate::modules::courses::model::Course;
use crate::modules::students::model::StudentResponse;
use crate::utils::errors::AppError;

/// Hard cap on summed units per registration. Applies to the total
/// regardless of core/elective split.
pub const MAX_UNITS: i32 = 24;

/// Persisted registration record. At most one exists per
/// (student, academic year, semester); edits replace the course list
/// wholesale.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Registration {
    pub id: RegistrationId,
    pub student_id: StudentId,
    pub academic_year_id: AcademicYearId,
    pub semester: Semester,
    pub courses: Vec<CourseId>,
    pub registration_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Everything the registration flow needs, resolved up front and threaded
/// through explicitly.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RegistrationContext {
    pub student: StudentResponse,
    pub academic_year: AcademicYear,
    /// Semester currently open for the student's program track, if any
    pub active_semester: Option<Semester>,
    /// Courses matching the student's department/level/year, all semesters
    pub eligible_courses: Vec<Course>,
    pub current_registration: Option<Registration>,
}

/// Unit breakdown of a selection. Derived, recomputed on every change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct UnitSummary {
    pub total_units: i32,
    pub core_units: i32,
    pub elective_units: i32,
}

/// An in-progress course selection. Toggling an already-selected course
/// removes it; adding is refused once the total would pass [`MAX_UNITS`].
#[derive(Debug, Clone, Default)]
pub struct CourseSelection {
    courses: Vec<Course>,
}

impl CourseSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn course_ids(&self) -> Vec<CourseId> {
        self.courses.iter().map(|c| c.id).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    /// Add the course, or remove it if already selected. An addition that
    /// would push the total past the cap is rejected and the selection is
    /// left unchanged.
    pub fn toggle(&mut self, course: Course) -> Result<(), AppError> {
        if let Some(position) = self.courses.iter().position(|c| c.id == course.id) {
            self.courses.remove(position);
            return Ok(());
        }

        let projected = self.summary().total_units + course.unit;
        if projected > MAX_UNITS {
            return Err(AppError::unprocessable(anyhow::anyhow!(
                "Adding {} ({} units) would exceed the {MAX_UNITS} unit limit",
                course.code,
                course.unit
            )));
        }

        self.courses.push(course);
        Ok(())
    }

    pub fn summary(&self) -> UnitSummary {
        let mut summary = UnitSummary {
            total_units: 0,
            core_units: 0,
            elective_units: 0,
        };
        for course in &self.courses {
            summary.total_units += course.unit;
            match course.status {
                CourseStatus::Core => summary.core_units += course.unit,
                CourseStatus::Elective => summary.elective_units += course.unit,
            }
        }
        summary
    }
}

/// Submission payload: the full replacement course list.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SubmitRegistrationDto {
    #[validate(length(min = 1, message = "at least one course must be selected"))]
    pub courses: Vec<CourseId>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::StudyLevel;
    use axum::http::StatusCode;

    fn course(code: &str, unit: i32, status: CourseStatus) -> Course {
        Course {
            id: CourseId::new(),
            code: code.to_string(),
            title: format!("Course {code}"),
            unit,
            status,
            department: "Computer Science".to_string(),
            level: StudyLevel::ND1,
            semester: 1,
            academic_year_id: AcademicYearId::new(),
            description: None,
            prerequisites: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_toggle_adds_and_removes() {
        let mut selection = CourseSelection::new();
        let com101 = course("COM101", 3, CourseStatus::Core);

        selection.toggle(com101.clone()).unwrap();
        assert_eq!(selection.courses().len(), 1);

        selection.toggle(com101).unwrap();
        assert!(selection.is_empty());
    }

    #[test]
    fn test_toggle_enforces_unit_cap() {
        let mut selection = CourseSelection::new();
        selection.toggle(course("A", 10, CourseStatus::Core)).unwrap();
        selection.toggle(course("B", 10, CourseStatus::Core)).unwrap();

        // Third 10-unit course would reach 30, past the cap of 24
        let err = selection
            .toggle(course("C", 10, CourseStatus::Core))
            .unwrap_err();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);

        // Selection unchanged by the rejected toggle
        assert_eq!(selection.courses().len(), 2);
        assert_eq!(selection.summary().total_units, 20);
    }

    #[test]
    fn test_toggle_allows_exactly_the_cap() {
        let mut selection = CourseSelection::new();
        selection.toggle(course("A", 12, CourseStatus::Core)).unwrap();
        selection.toggle(course("B", 12, CourseStatus::Core)).unwrap();
        assert_eq!(selection.summary().total_units, MAX_UNITS);
    }

    #[test]
    fn test_summary_partitions_by_status() {
        let mut selection = CourseSelection::new();
        selection.toggle(course("A", 4, CourseStatus::Core)).unwrap();
        selection.toggle(course("B", 3, CourseStatus::Core)).unwrap();
        selection
            .toggle(course("C", 2, CourseStatus::Elective))
            .unwrap();

        assert_eq!(
            selection.summary(),
            UnitSummary {
                total_units: 9,
                core_units: 7,
                elective_units: 2,
            }
        );
    }

    #[test]
    fn test_removal_after_cap_frees_room() {
        let mut selection = CourseSelection::new();
        let a = course("A", 12, CourseStatus::Core);
        selection.toggle(a.clone()).unwrap();
        selection.toggle(course("B", 12, CourseStatus::Core)).unwrap();

        assert!(selection.toggle(course("C", 1, CourseStatus::Core)).is_err());

        // Deselect A, then C fits
        selection.toggle(a).unwrap();
        selection.toggle(course("C", 1, CourseStatus::Core)).unwrap();
        assert_eq!(selection.summary().total_units, 13);
    }
}
