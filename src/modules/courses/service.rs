use sqlx::PgPool;
use tracing::instrument;

use crate::models::enums::StudyLevel;
use crate::models::ids::{AcademicYearId, CourseId};
use crate::modules::courses::model::{Course, CreateCourseDto, UpdateCourseDto};
use crate::utils::errors::AppError;

const COURSE_COLUMNS: &str = "id, code, title, unit, status, department, level, semester, \
     academic_year_id, description, prerequisites, created_at, updated_at";

pub struct CourseService;

impl CourseService {
    /// Create a course. The code must be unique across all courses,
    /// regardless of department or year.
    #[instrument(skip(db))]
    pub async fn create_course(db: &PgPool, dto: CreateCourseDto) -> Result<Course, AppError> {
        let code = dto.code.trim().to_string();

        let course = sqlx::query_as::<_, Course>(&format!(
            "INSERT INTO courses
             (code, title, unit, status, department, level, semester,
              academic_year_id, description, prerequisites)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COURSE_COLUMNS}"
        ))
        .bind(&code)
        .bind(dto.title.trim())
        .bind(dto.unit)
        .bind(dto.status)
        .bind(dto.department.trim())
        .bind(dto.level)
        .bind(dto.semester)
        .bind(dto.academic_year_id)
        .bind(&dto.description)
        .bind(&dto.prerequisites)
        .fetch_one(db)
        .await
        .map_err(|e| Self::map_duplicate_code(e, &code))?;

        Ok(course)
    }

    fn map_duplicate_code(e: sqlx::Error, code: &str) -> AppError {
        if let sqlx::Error::Database(db_err) = &e
            && db_err.is_unique_violation()
        {
            return AppError::bad_request(anyhow::anyhow!(
                "A course with code {code} already exists"
            ));
        }
        AppError::database(e)
    }

    #[instrument(skip(db))]
    pub async fn get_courses(db: &PgPool) -> Result<Vec<Course>, AppError> {
        let courses = sqlx::query_as::<_, Course>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses ORDER BY code"
        ))
        .fetch_all(db)
        .await?;

        Ok(courses)
    }

    #[instrument(skip(db))]
    pub async fn get_course_by_id(db: &PgPool, course_id: CourseId) -> Result<Course, AppError> {
        let course = sqlx::query_as::<_, Course>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses WHERE id = $1"
        ))
        .bind(course_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Course not found")))?;

        Ok(course)
    }

    /// Courses a student in the given department/level/year may register.
    /// Exact-match filter on all three fields; no semester filter here, the
    /// registration flow narrows by active semester afterwards.
    #[instrument(skip(db))]
    pub async fn list_eligible_courses(
        db: &PgPool,
        department: &str,
        level: StudyLevel,
        academic_year_id: AcademicYearId,
    ) -> Result<Vec<Course>, AppError> {
        let courses = sqlx::query_as::<_, Course>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses
             WHERE department = $1 AND level = $2 AND academic_year_id = $3
             ORDER BY code"
        ))
        .bind(department)
        .bind(level)
        .bind(academic_year_id)
        .fetch_all(db)
        .await?;

        Ok(courses)
    }

    #[instrument(skip(db))]
    pub async fn update_course(
        db: &PgPool,
        course_id: CourseId,
        dto: UpdateCourseDto,
    ) -> Result<Course, AppError> {
        let existing = Self::get_course_by_id(db, course_id).await?;

        let code = dto.code.map(|c| c.trim().to_string()).unwrap_or(existing.code);
        let title = dto.title.map(|t| t.trim().to_string()).unwrap_or(existing.title);
        let unit = dto.unit.unwrap_or(existing.unit);
        let status = dto.status.unwrap_or(existing.status);
        let department = dto
            .department
            .map(|d| d.trim().to_string())
            .unwrap_or(existing.department);
        let level = dto.level.unwrap_or(existing.level);
        let semester = dto.semester.unwrap_or(existing.semester);
        let academic_year_id = dto.academic_year_id.unwrap_or(existing.academic_year_id);
        let description = dto.description.or(existing.description);
        let prerequisites = dto.prerequisites.unwrap_or(existing.prerequisites);

        let course = sqlx::query_as::<_, Course>(&format!(
            "UPDATE courses
             SET code = $1, title = $2, unit = $3, status = $4, department = $5,
                 level = $6, semester = $7, academic_year_id = $8, description = $9,
                 prerequisites = $10, updated_at = NOW()
             WHERE id = $11
             RETURNING {COURSE_COLUMNS}"
        ))
        .bind(&code)
        .bind(&title)
        .bind(unit)
        .bind(status)
        .bind(&department)
        .bind(level)
        .bind(semester)
        .bind(academic_year_id)
        .bind(&description)
        .bind(&prerequisites)
        .bind(course_id)
        .fetch_one(db)
        .await
        .map_err(|e| Self::map_duplicate_code(e, &code))?;

        Ok(course)
    }

    #[instrument(skip(db))]
    pub async fn delete_course(db: &PgPool, course_id: CourseId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(course_id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Course not found")));
        }

        Ok(())
    }
}
