use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use crate::models::ids::AcademicYearId;
use crate::modules::academic_years::model::{
    AcademicYear, CreateAcademicYearDto, PromoteLevelDto, SetActiveSemesterDto,
    UpdateAcademicYearDto,
};
use crate::modules::academic_years::service::AcademicYearService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

/// Create a new academic year
#[utoipa::path(
    post,
    path = "/api/academic-years",
    request_body = CreateAcademicYearDto,
    responses(
        (status = 201, description = "Academic year created successfully", body = AcademicYear),
        (status = 400, description = "Invalid dates or overlap with an existing year"),
        (status = 422, description = "Validation error")
    ),
    tag = "Academic Years"
)]
#[instrument(skip(state))]
pub async fn create_academic_year(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateAcademicYearDto>,
) -> Result<(StatusCode, Json<AcademicYear>), AppError> {
    let year = AcademicYearService::create_year(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(year)))
}

/// List all academic years
#[utoipa::path(
    get,
    path = "/api/academic-years",
    responses(
        (status = 200, description = "List of academic years", body = [AcademicYear])
    ),
    tag = "Academic Years"
)]
#[instrument(skip(state))]
pub async fn get_academic_years(
    State(state): State<AppState>,
) -> Result<Json<Vec<AcademicYear>>, AppError> {
    let years = AcademicYearService::get_years(&state.db).await?;
    Ok(Json(years))
}

/// Get an academic year by ID
#[utoipa::path(
    get,
    path = "/api/academic-years/{id}",
    params(("id" = Uuid, Path, description = "Academic year ID")),
    responses(
        (status = 200, description = "Academic year details", body = AcademicYear),
        (status = 404, description = "Academic year not found")
    ),
    tag = "Academic Years"
)]
#[instrument(skip(state))]
pub async fn get_academic_year_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AcademicYear>, AppError> {
    let year = AcademicYearService::get_year_by_id(&state.db, AcademicYearId::from(id)).await?;
    Ok(Json(year))
}

/// Update an academic year
#[utoipa::path(
    put,
    path = "/api/academic-years/{id}",
    params(("id" = Uuid, Path, description = "Academic year ID")),
    request_body = UpdateAcademicYearDto,
    responses(
        (status = 200, description = "Academic year updated successfully", body = AcademicYear),
        (status = 400, description = "Invalid dates or overlap with an existing year"),
        (status = 404, description = "Academic year not found")
    ),
    tag = "Academic Years"
)]
#[instrument(skip(state))]
pub async fn update_academic_year(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateAcademicYearDto>,
) -> Result<Json<AcademicYear>, AppError> {
    let year =
        AcademicYearService::update_year(&state.db, AcademicYearId::from(id), dto).await?;
    Ok(Json(year))
}

/// Delete an academic year
#[utoipa::path(
    delete,
    path = "/api/academic-years/{id}",
    params(("id" = Uuid, Path, description = "Academic year ID")),
    responses(
        (status = 204, description = "Academic year deleted successfully"),
        (status = 404, description = "Academic year not found")
    ),
    tag = "Academic Years"
)]
#[instrument(skip(state))]
pub async fn delete_academic_year(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    AcademicYearService::delete_year(&state.db, AcademicYearId::from(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Set (or clear) the active semester for a program track
#[utoipa::path(
    put,
    path = "/api/academic-years/{id}/active-semester",
    params(("id" = Uuid, Path, description = "Academic year ID")),
    request_body = SetActiveSemesterDto,
    responses(
        (status = 200, description = "Active semester updated", body = AcademicYear),
        (status = 404, description = "Academic year not found")
    ),
    tag = "Academic Years"
)]
#[instrument(skip(state))]
pub async fn set_active_semester(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(dto): Json<SetActiveSemesterDto>,
) -> Result<Json<AcademicYear>, AppError> {
    let year =
        AcademicYearService::set_active_semester(&state.db, AcademicYearId::from(id), dto).await?;
    Ok(Json(year))
}

/// Promote a program track's current level (binary flip)
#[utoipa::path(
    post,
    path = "/api/academic-years/{id}/promote-level",
    params(("id" = Uuid, Path, description = "Academic year ID")),
    request_body = PromoteLevelDto,
    responses(
        (status = 200, description = "Level promoted", body = AcademicYear),
        (status = 404, description = "Academic year not found")
    ),
    tag = "Academic Years"
)]
#[instrument(skip(state))]
pub async fn promote_level(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(dto): Json<PromoteLevelDto>,
) -> Result<Json<AcademicYear>, AppError> {
    let year =
        AcademicYearService::promote_level(&state.db, AcademicYearId::from(id), dto.program)
            .await?;
    Ok(Json(year))
}
