use sqlx::PgPool;
use tracing::instrument;

use crate::models::enums::{Program, Semester};
use crate::models::ids::StudentId;
use crate::modules::academic_years::model::AcademicYear;
use crate::modules::academic_years::service::AcademicYearService;
use crate::modules::courses::service::CourseService;
use crate::modules::registrations::model::{
    CourseSelection, MAX_UNITS, Registration, RegistrationContext, SubmitRegistrationDto,
};
use crate::modules::students::service::StudentService;
use crate::utils::errors::AppError;

const REGISTRATION_COLUMNS: &str = "id, student_id, academic_year_id, semester, courses, \
     registration_date, created_at, updated_at";

pub struct RegistrationService;

impl RegistrationService {
    fn active_semester_for(year: &AcademicYear, program: Program) -> Option<Semester> {
        match program {
            Program::ND => year.nd_active_semester,
            Program::HND => year.hnd_active_semester,
        }
    }

    /// Resolve everything a registration session needs: the student, their
    /// academic year, the semester open for their program track, the courses
    /// they may pick from, and any registration already on file for the
    /// tuple.
    #[instrument(skip(db))]
    pub async fn load_context(
        db: &PgPool,
        student_id: StudentId,
    ) -> Result<RegistrationContext, AppError> {
        let student = StudentService::get_student_by_id(db, student_id).await?;
        let year = AcademicYearService::get_year_by_id(db, student.academic_year_id).await?;

        let active_semester = Self::active_semester_for(&year, student.level.program());

        let eligible_courses = CourseService::list_eligible_courses(
            db,
            &student.department,
            student.level,
            student.academic_year_id,
        )
        .await?;

        let current_registration = match active_semester {
            Some(semester) => {
                Self::find_registration(db, student_id, &year, semester).await?
            }
            None => None,
        };

        Ok(RegistrationContext {
            student: student.into(),
            academic_year: year,
            active_semester,
            eligible_courses,
            current_registration,
        })
    }

    async fn find_registration(
        db: &PgPool,
        student_id: StudentId,
        year: &AcademicYear,
        semester: Semester,
    ) -> Result<Option<Registration>, AppError> {
        let registration = sqlx::query_as::<_, Registration>(&format!(
            "SELECT {REGISTRATION_COLUMNS} FROM course_registrations
             WHERE student_id = $1 AND academic_year_id = $2 AND semester = $3"
        ))
        .bind(student_id)
        .bind(year.id)
        .bind(semester)
        .fetch_optional(db)
        .await?;

        Ok(registration)
    }

    /// Validate and commit a selection for the student's open semester.
    ///
    /// The selection must be non-empty, every course must be in the
    /// student's eligible set for the active semester, and the summed units
    /// must stay within [`MAX_UNITS`]. The write is an upsert keyed by the
    /// (student, year, semester) tuple, so a resubmission replaces the
    /// course list instead of adding a second record, even under concurrent
    /// submitters.
    #[instrument(skip(db, dto))]
    pub async fn submit(
        db: &PgPool,
        student_id: StudentId,
        dto: SubmitRegistrationDto,
    ) -> Result<Registration, AppError> {
        if dto.courses.is_empty() {
            return Err(AppError::unprocessable(anyhow::anyhow!(
                "No courses selected"
            )));
        }

        let student = StudentService::get_student_by_id(db, student_id).await?;
        let year = AcademicYearService::get_year_by_id(db, student.academic_year_id).await?;

        let program = student.level.program();
        let Some(semester) = Self::active_semester_for(&year, program) else {
            return Err(AppError::unprocessable(anyhow::anyhow!(
                "Registration is not open for the {program} program"
            )));
        };

        let eligible = CourseService::list_eligible_courses(
            db,
            &student.department,
            student.level,
            student.academic_year_id,
        )
        .await?;

        let mut selection = CourseSelection::new();
        for course_id in &dto.courses {
            let course = eligible
                .iter()
                .find(|c| c.id == *course_id && c.semester == semester.number())
                .cloned()
                .ok_or_else(|| {
                    AppError::unprocessable(anyhow::anyhow!(
                        "Course {course_id} is not available to you this semester"
                    ))
                })?;
            selection.toggle(course)?;
        }

        // A duplicate id in the payload toggles the course back off; what
        // gets stored is the selection as settled, not the raw payload.
        if selection.is_empty() {
            return Err(AppError::unprocessable(anyhow::anyhow!(
                "No courses selected"
            )));
        }

        let summary = selection.summary();
        if summary.total_units > MAX_UNITS {
            return Err(AppError::unprocessable(anyhow::anyhow!(
                "Selected courses total {} units, above the {MAX_UNITS} unit limit",
                summary.total_units
            )));
        }

        let registration = sqlx::query_as::<_, Registration>(&format!(
            "INSERT INTO course_registrations (student_id, academic_year_id, semester, courses)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT ON CONSTRAINT unique_registration_tuple
             DO UPDATE SET courses = EXCLUDED.courses,
                           registration_date = NOW(),
                           updated_at = NOW()
             RETURNING {REGISTRATION_COLUMNS}"
        ))
        .bind(student_id)
        .bind(year.id)
        .bind(semester)
        .bind(selection.course_ids())
        .fetch_one(db)
        .await?;

        Ok(registration)
    }
}
