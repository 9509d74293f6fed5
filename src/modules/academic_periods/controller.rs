use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use crate::models::ids::AcademicPeriodId;
use crate::modules::academic_periods::model::{
    AcademicPeriod, CreateAcademicPeriodDto, UpdateAcademicPeriodDto,
};
use crate::modules::academic_periods::service::AcademicPeriodService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

/// Create a new academic period
#[utoipa::path(
    post,
    path = "/api/academic-periods",
    request_body = CreateAcademicPeriodDto,
    responses(
        (status = 201, description = "Academic period created successfully", body = AcademicPeriod),
        (status = 400, description = "Invalid dates or overlap with an existing period"),
        (status = 422, description = "Validation error")
    ),
    tag = "Academic Periods"
)]
#[instrument(skip(state))]
pub async fn create_academic_period(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateAcademicPeriodDto>,
) -> Result<(StatusCode, Json<AcademicPeriod>), AppError> {
    let period = AcademicPeriodService::create_period(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(period)))
}

/// List all academic periods
#[utoipa::path(
    get,
    path = "/api/academic-periods",
    responses(
        (status = 200, description = "List of academic periods", body = [AcademicPeriod])
    ),
    tag = "Academic Periods"
)]
#[instrument(skip(state))]
pub async fn get_academic_periods(
    State(state): State<AppState>,
) -> Result<Json<Vec<AcademicPeriod>>, AppError> {
    let periods = AcademicPeriodService::get_periods(&state.db).await?;
    Ok(Json(periods))
}

/// Get an academic period by ID
#[utoipa::path(
    get,
    path = "/api/academic-periods/{id}",
    params(("id" = Uuid, Path, description = "Academic period ID")),
    responses(
        (status = 200, description = "Academic period details", body = AcademicPeriod),
        (status = 404, description = "Academic period not found")
    ),
    tag = "Academic Periods"
)]
#[instrument(skip(state))]
pub async fn get_academic_period_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AcademicPeriod>, AppError> {
    let period =
        AcademicPeriodService::get_period_by_id(&state.db, AcademicPeriodId::from(id)).await?;
    Ok(Json(period))
}

/// Update an academic period
#[utoipa::path(
    put,
    path = "/api/academic-periods/{id}",
    params(("id" = Uuid, Path, description = "Academic period ID")),
    request_body = UpdateAcademicPeriodDto,
    responses(
        (status = 200, description = "Academic period updated successfully", body = AcademicPeriod),
        (status = 400, description = "Invalid dates or overlap with an existing period"),
        (status = 404, description = "Academic period not found")
    ),
    tag = "Academic Periods"
)]
#[instrument(skip(state))]
pub async fn update_academic_period(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateAcademicPeriodDto>,
) -> Result<Json<AcademicPeriod>, AppError> {
    let period =
        AcademicPeriodService::update_period(&state.db, AcademicPeriodId::from(id), dto).await?;
    Ok(Json(period))
}

/// Delete an academic period
#[utoipa::path(
    delete,
    path = "/api/academic-periods/{id}",
    params(("id" = Uuid, Path, description = "Academic period ID")),
    responses(
        (status = 204, description = "Academic period deleted successfully"),
        (status = 404, description = "Academic period not found")
    ),
    tag = "Academic Periods"
)]
#[instrument(skip(state))]
pub async fn delete_academic_period(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    AcademicPeriodService::delete_period(&state.db, AcademicPeriodId::from(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
