use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::instrument;

use crate::models::ids::AcademicPeriodId;
use crate::modules::academic_periods::model::{
    AcademicPeriod, CreateAcademicPeriodDto, UpdateAcademicPeriodDto,
};
use crate::modules::academic_years::service::AcademicYearService;
use crate::utils::errors::AppError;

const PERIOD_COLUMNS: &str = "id, name, session, start_date, end_date, created_at, updated_at";

pub struct AcademicPeriodService;

impl AcademicPeriodService {
    /// Same endpoint-inclusive overlap rule as academic years, checked only
    /// against other periods.
    async fn validate_period_dates(
        db: &PgPool,
        start_date: NaiveDate,
        end_date: NaiveDate,
        exclude_period_id: Option<AcademicPeriodId>,
    ) -> Result<(), AppError> {
        if start_date >= end_date {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "End date must be after start date"
            )));
        }

        let existing_periods = sqlx::query_as::<_, AcademicPeriod>(&format!(
            "SELECT {PERIOD_COLUMNS} FROM academic_periods"
        ))
        .fetch_all(db)
        .await?;

        for period in existing_periods {
            if let Some(exclude_id) = exclude_period_id
                && period.id == exclude_id
            {
                continue;
            }

            if AcademicYearService::endpoint_falls_within(
                start_date,
                end_date,
                period.start_date,
                period.end_date,
            ) {
                return Err(AppError::bad_request(anyhow::anyhow!(
                    "This period overlaps with existing period {} ({} to {})",
                    period.name,
                    period.start_date,
                    period.end_date
                )));
            }
        }

        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn create_period(
        db: &PgPool,
        dto: CreateAcademicPeriodDto,
    ) -> Result<AcademicPeriod, AppError> {
        Self::validate_period_dates(db, dto.start_date, dto.end_date, None).await?;

        let period = sqlx::query_as::<_, AcademicPeriod>(&format!(
            "INSERT INTO academic_periods (name, session, start_date, end_date)
             VALUES ($1, $2, $3, $4)
             RETURNING {PERIOD_COLUMNS}"
        ))
        .bind(&dto.name)
        .bind(&dto.session)
        .bind(dto.start_date)
        .bind(dto.end_date)
        .fetch_one(db)
        .await?;

        Ok(period)
    }

    /// List all periods, most recent first.
    #[instrument(skip(db))]
    pub async fn get_periods(db: &PgPool) -> Result<Vec<AcademicPeriod>, AppError> {
        let periods = sqlx::query_as::<_, AcademicPeriod>(&format!(
            "SELECT {PERIOD_COLUMNS} FROM academic_periods ORDER BY start_date DESC"
        ))
        .fetch_all(db)
        .await?;

        Ok(periods)
    }

    #[instrument(skip(db))]
    pub async fn get_period_by_id(
        db: &PgPool,
        period_id: AcademicPeriodId,
    ) -> Result<AcademicPeriod, AppError> {
        let period = sqlx::query_as::<_, AcademicPeriod>(&format!(
            "SELECT {PERIOD_COLUMNS} FROM academic_periods WHERE id = $1"
        ))
        .bind(period_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Academic period not found")))?;

        Ok(period)
    }

    #[instrument(skip(db))]
    pub async fn update_period(
        db: &PgPool,
        period_id: AcademicPeriodId,
        dto: UpdateAcademicPeriodDto,
    ) -> Result<AcademicPeriod, AppError> {
        let existing = Self::get_period_by_id(db, period_id).await?;

        let name = dto.name.unwrap_or(existing.name);
        let session = dto.session.unwrap_or(existing.session);
        let start_date = dto.start_date.unwrap_or(existing.start_date);
        let end_date = dto.end_date.unwrap_or(existing.end_date);

        Self::validate_period_dates(db, start_date, end_date, Some(period_id)).await?;

        let period = sqlx::query_as::<_, AcademicPeriod>(&format!(
            "UPDATE academic_periods
             SET name = $1, session = $2, start_date = $3, end_date = $4, updated_at = NOW()
             WHERE id = $5
             RETURNING {PERIOD_COLUMNS}"
        ))
        .bind(&name)
        .bind(&session)
        .bind(start_date)
        .bind(end_date)
        .bind(period_id)
        .fetch_one(db)
        .await?;

        Ok(period)
    }

    #[instrument(skip(db))]
    pub async fn delete_period(db: &PgPool, period_id: AcademicPeriodId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM academic_periods WHERE id = $1")
            .bind(period_id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!(
                "Academic period not found"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn period_dto(name: &str, start: NaiveDate, end: NaiveDate) -> CreateAcademicPeriodDto {
        CreateAcademicPeriodDto {
            name: name.to_string(),
            session: "2024/2025".to_string(),
            start_date: start,
            end_date: end,
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_period_success(pool: PgPool) {
        let period = AcademicPeriodService::create_period(
            &pool,
            period_dto("First Semester", ymd(2024, 9, 1), ymd(2024, 12, 20)),
        )
        .await
        .unwrap();

        assert_eq!(period.name, "First Semester");
        assert_eq!(period.session, "2024/2025");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_period_rejects_overlap(pool: PgPool) {
        AcademicPeriodService::create_period(
            &pool,
            period_dto("First Semester", ymd(2024, 9, 1), ymd(2024, 12, 20)),
        )
        .await
        .unwrap();

        let result = AcademicPeriodService::create_period(
            &pool,
            period_dto("Second Semester", ymd(2024, 12, 1), ymd(2025, 4, 1)),
        )
        .await;

        let err = result.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.error.to_string().contains("overlaps"));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_periods_do_not_collide_with_years(pool: PgPool) {
        // Academic years and periods enforce the overlap rule against their
        // own table only, so identical ranges can coexist across the two.
        use crate::modules::academic_years::model::CreateAcademicYearDto;

        AcademicYearService::create_year(
            &pool,
            CreateAcademicYearDto {
                session: "2024/2025".to_string(),
                start_date: ymd(2024, 9, 1),
                end_date: ymd(2025, 7, 31),
            },
        )
        .await
        .unwrap();

        let result = AcademicPeriodService::create_period(
            &pool,
            period_dto("First Semester", ymd(2024, 9, 1), ymd(2024, 12, 20)),
        )
        .await;

        assert!(result.is_ok());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_update_period_excludes_self_from_overlap(pool: PgPool) {
        let period = AcademicPeriodService::create_period(
            &pool,
            period_dto("First Semester", ymd(2024, 9, 1), ymd(2024, 12, 20)),
        )
        .await
        .unwrap();

        let updated = AcademicPeriodService::update_period(
            &pool,
            period.id,
            UpdateAcademicPeriodDto {
                name: Some("First Semester (revised)".to_string()),
                session: None,
                start_date: Some(ymd(2024, 9, 15)),
                end_date: Some(ymd(2024, 12, 10)),
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.name, "First Semester (revised)");
        assert_eq!(updated.start_date, ymd(2024, 9, 15));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_delete_missing_period(pool: PgPool) {
        let err = AcademicPeriodService::delete_period(&pool, AcademicPeriodId::new())
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }
}
