use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::instrument;

use crate::models::enums::Program;
use crate::models::ids::AcademicYearId;
use crate::modules::academic_years::model::{
    AcademicYear, CreateAcademicYearDto, SetActiveSemesterDto, UpdateAcademicYearDto,
};
use crate::utils::errors::AppError;

const YEAR_COLUMNS: &str = "id, session, start_date, end_date, nd_active_semester, \
     hnd_active_semester, nd_current_level, hnd_current_level, created_at, updated_at";

pub struct AcademicYearService;

impl AcademicYearService {
    /// The governing overlap test: an endpoint of the candidate falls within
    /// an existing range, bounds inclusive. A candidate that fully contains
    /// an existing range without sharing an endpoint passes this test.
    pub(crate) fn endpoint_falls_within(
        candidate_start: NaiveDate,
        candidate_end: NaiveDate,
        existing_start: NaiveDate,
        existing_end: NaiveDate,
    ) -> bool {
        (candidate_start >= existing_start && candidate_start <= existing_end)
            || (candidate_end >= existing_start && candidate_end <= existing_end)
    }

    /// Validate candidate dates against ordering and the non-overlap
    /// invariant, excluding the record under edit if any.
    async fn validate_year_dates(
        db: &PgPool,
        start_date: NaiveDate,
        end_date: NaiveDate,
        exclude_year_id: Option<AcademicYearId>,
    ) -> Result<(), AppError> {
        if start_date >= end_date {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "End date must be after start date"
            )));
        }

        let existing_years = sqlx::query_as::<_, AcademicYear>(&format!(
            "SELECT {YEAR_COLUMNS} FROM academic_years"
        ))
        .fetch_all(db)
        .await?;

        for year in existing_years {
            if let Some(exclude_id) = exclude_year_id
                && year.id == exclude_id
            {
                continue;
            }

            if Self::endpoint_falls_within(start_date, end_date, year.start_date, year.end_date) {
                return Err(AppError::bad_request(anyhow::anyhow!(
                    "This year overlaps with existing academic year {} ({} to {})",
                    year.session,
                    year.start_date,
                    year.end_date
                )));
            }
        }

        Ok(())
    }

    /// Create a new academic year. Tracks start at ND1/HND1 with no active
    /// semester.
    #[instrument(skip(db))]
    pub async fn create_year(
        db: &PgPool,
        dto: CreateAcademicYearDto,
    ) -> Result<AcademicYear, AppError> {
        Self::validate_year_dates(db, dto.start_date, dto.end_date, None).await?;

        let year = sqlx::query_as::<_, AcademicYear>(&format!(
            "INSERT INTO academic_years (session, start_date, end_date)
             VALUES ($1, $2, $3)
             RETURNING {YEAR_COLUMNS}"
        ))
        .bind(&dto.session)
        .bind(dto.start_date)
        .bind(dto.end_date)
        .fetch_one(db)
        .await?;

        Ok(year)
    }

    /// List all academic years, most recent first.
    #[instrument(skip(db))]
    pub async fn get_years(db: &PgPool) -> Result<Vec<AcademicYear>, AppError> {
        let years = sqlx::query_as::<_, AcademicYear>(&format!(
            "SELECT {YEAR_COLUMNS} FROM academic_years ORDER BY start_date DESC"
        ))
        .fetch_all(db)
        .await?;

        Ok(years)
    }

    #[instrument(skip(db))]
    pub async fn get_year_by_id(
        db: &PgPool,
        year_id: AcademicYearId,
    ) -> Result<AcademicYear, AppError> {
        let year = sqlx::query_as::<_, AcademicYear>(&format!(
            "SELECT {YEAR_COLUMNS} FROM academic_years WHERE id = $1"
        ))
        .bind(year_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Academic year not found")))?;

        Ok(year)
    }

    /// Update session label or dates. Date changes re-run the overlap check
    /// with this year excluded.
    #[instrument(skip(db))]
    pub async fn update_year(
        db: &PgPool,
        year_id: AcademicYearId,
        dto: UpdateAcademicYearDto,
    ) -> Result<AcademicYear, AppError> {
        let existing = Self::get_year_by_id(db, year_id).await?;

        let session = dto.session.unwrap_or(existing.session);
        let start_date = dto.start_date.unwrap_or(existing.start_date);
        let end_date = dto.end_date.unwrap_or(existing.end_date);

        Self::validate_year_dates(db, start_date, end_date, Some(year_id)).await?;

        let year = sqlx::query_as::<_, AcademicYear>(&format!(
            "UPDATE academic_years
             SET session = $1, start_date = $2, end_date = $3, updated_at = NOW()
             WHERE id = $4
             RETURNING {YEAR_COLUMNS}"
        ))
        .bind(&session)
        .bind(start_date)
        .bind(end_date)
        .bind(year_id)
        .fetch_one(db)
        .await?;

        Ok(year)
    }

    #[instrument(skip(db))]
    pub async fn delete_year(db: &PgPool, year_id: AcademicYearId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM academic_years WHERE id = $1")
            .bind(year_id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Academic year not found")));
        }

        Ok(())
    }

    /// Unconditionally overwrite the active semester for one program track.
    ///
    /// Registration eligibility for that track pivots to the new value
    /// immediately; passing `None` closes registration.
    #[instrument(skip(db))]
    pub async fn set_active_semester(
        db: &PgPool,
        year_id: AcademicYearId,
        dto: SetActiveSemesterDto,
    ) -> Result<AcademicYear, AppError> {
        let column = match dto.program {
            Program::ND => "nd_active_semester",
            Program::HND => "hnd_active_semester",
        };

        let year = sqlx::query_as::<_, AcademicYear>(&format!(
            "UPDATE academic_years
             SET {column} = $1, updated_at = NOW()
             WHERE id = $2
             RETURNING {YEAR_COLUMNS}"
        ))
        .bind(dto.semester)
        .bind(year_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Academic year not found")))?;

        Ok(year)
    }

    /// Flip the current level for one program track (ND1<->ND2, HND1<->HND2).
    /// Repeated calls oscillate; this mirrors the admin console's promote
    /// action rather than a monotonic progression.
    #[instrument(skip(db))]
    pub async fn promote_level(
        db: &PgPool,
        year_id: AcademicYearId,
        program: Program,
    ) -> Result<AcademicYear, AppError> {
        let existing = Self::get_year_by_id(db, year_id).await?;

        let (column, new_level) = match program {
            Program::ND => ("nd_current_level", existing.nd_current_level.promoted()),
            Program::HND => ("hnd_current_level", existing.hnd_current_level.promoted()),
        };

        let year = sqlx::query_as::<_, AcademicYear>(&format!(
            "UPDATE academic_years
             SET {column} = $1, updated_at = NOW()
             WHERE id = $2
             RETURNING {YEAR_COLUMNS}"
        ))
        .bind(new_level)
        .bind(year_id)
        .fetch_one(db)
        .await?;

        Ok(year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use crate::models::enums::{Semester, StudyLevel};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn year_dto(session: &str, start: NaiveDate, end: NaiveDate) -> CreateAcademicYearDto {
        CreateAcademicYearDto {
            session: session.to_string(),
            start_date: start,
            end_date: end,
        }
    }

    #[test]
    fn test_endpoint_overlap_rule() {
        let (s, e) = (ymd(2024, 1, 1), ymd(2024, 6, 1));
        // Start endpoint inside
        assert!(AcademicYearService::endpoint_falls_within(
            ymd(2024, 5, 1),
            ymd(2024, 8, 1),
            s,
            e
        ));
        // End endpoint inside
        assert!(AcademicYearService::endpoint_falls_within(
            ymd(2023, 10, 1),
            ymd(2024, 2, 1),
            s,
            e
        ));
        // Shared endpoint counts (inclusive bounds)
        assert!(AcademicYearService::endpoint_falls_within(
            ymd(2024, 6, 1),
            ymd(2024, 12, 1),
            s,
            e
        ));
        // Disjoint
        assert!(!AcademicYearService::endpoint_falls_within(
            ymd(2024, 7, 1),
            ymd(2024, 12, 1),
            s,
            e
        ));
        // Known gap: full containment with no shared endpoint passes
        assert!(!AcademicYearService::endpoint_falls_within(
            ymd(2023, 12, 1),
            ymd(2024, 7, 1),
            s,
            e
        ));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_year_success(pool: PgPool) {
        let year = AcademicYearService::create_year(
            &pool,
            year_dto("2024/2025", ymd(2024, 1, 1), ymd(2024, 6, 1)),
        )
        .await
        .unwrap();

        assert_eq!(year.session, "2024/2025");
        assert_eq!(year.nd_current_level, StudyLevel::ND1);
        assert_eq!(year.hnd_current_level, StudyLevel::HND1);
        assert!(year.nd_active_semester.is_none());
        assert!(year.hnd_active_semester.is_none());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_year_rejects_inverted_dates(pool: PgPool) {
        let result = AcademicYearService::create_year(
            &pool,
            year_dto("2024/2025", ymd(2024, 6, 1), ymd(2024, 1, 1)),
        )
        .await;

        let err = result.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_year_rejects_overlap(pool: PgPool) {
        AcademicYearService::create_year(
            &pool,
            year_dto("2024/2025", ymd(2024, 1, 1), ymd(2024, 6, 1)),
        )
        .await
        .unwrap();

        let result = AcademicYearService::create_year(
            &pool,
            year_dto("2024/2025 B", ymd(2024, 5, 1), ymd(2024, 8, 1)),
        )
        .await;

        let err = result.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.error.to_string().contains("overlaps"));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_year_accepts_disjoint(pool: PgPool) {
        AcademicYearService::create_year(
            &pool,
            year_dto("2024/2025", ymd(2024, 1, 1), ymd(2024, 6, 1)),
        )
        .await
        .unwrap();

        let result = AcademicYearService::create_year(
            &pool,
            year_dto("2025/2026", ymd(2024, 7, 1), ymd(2024, 12, 1)),
        )
        .await;

        assert!(result.is_ok());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_update_year_excludes_self_from_overlap(pool: PgPool) {
        let year = AcademicYearService::create_year(
            &pool,
            year_dto("2024/2025", ymd(2024, 1, 1), ymd(2024, 6, 1)),
        )
        .await
        .unwrap();

        // Shrinking within its own range would collide with itself if the
        // record under edit were not excluded.
        let updated = AcademicYearService::update_year(
            &pool,
            year.id,
            UpdateAcademicYearDto {
                session: None,
                start_date: Some(ymd(2024, 2, 1)),
                end_date: Some(ymd(2024, 5, 1)),
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.start_date, ymd(2024, 2, 1));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_set_active_semester_overwrites(pool: PgPool) {
        let year = AcademicYearService::create_year(
            &pool,
            year_dto("2024/2025", ymd(2024, 1, 1), ymd(2024, 6, 1)),
        )
        .await
        .unwrap();

        let year = AcademicYearService::set_active_semester(
            &pool,
            year.id,
            SetActiveSemesterDto {
                program: Program::ND,
                semester: Some(Semester::First),
            },
        )
        .await
        .unwrap();
        assert_eq!(year.nd_active_semester, Some(Semester::First));
        assert!(year.hnd_active_semester.is_none());

        // Overwrite is unconditional, including clearing
        let year = AcademicYearService::set_active_semester(
            &pool,
            year.id,
            SetActiveSemesterDto {
                program: Program::ND,
                semester: None,
            },
        )
        .await
        .unwrap();
        assert!(year.nd_active_semester.is_none());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_promote_level_oscillates(pool: PgPool) {
        let year = AcademicYearService::create_year(
            &pool,
            year_dto("2024/2025", ymd(2024, 1, 1), ymd(2024, 6, 1)),
        )
        .await
        .unwrap();

        let year = AcademicYearService::promote_level(&pool, year.id, Program::ND)
            .await
            .unwrap();
        assert_eq!(year.nd_current_level, StudyLevel::ND2);
        assert_eq!(year.hnd_current_level, StudyLevel::HND1);

        let year = AcademicYearService::promote_level(&pool, year.id, Program::ND)
            .await
            .unwrap();
        assert_eq!(year.nd_current_level, StudyLevel::ND1);
    }
}
