use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use crate::middleware::auth::AuthStudent;
use crate::modules::registrations::model::{
    Registration, RegistrationContext, SubmitRegistrationDto,
};
use crate::modules::registrations::service::RegistrationService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

/// Load the authenticated student's registration context
#[utoipa::path(
    get,
    path = "/api/registrations/context",
    responses(
        (status = 200, description = "Registration context", body = RegistrationContext),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Student or academic year not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Registrations"
)]
#[instrument(skip(state, auth))]
pub async fn get_registration_context(
    State(state): State<AppState>,
    auth: AuthStudent,
) -> Result<Json<RegistrationContext>, AppError> {
    let student_id = auth.student_id()?;
    let context = RegistrationService::load_context(&state.db, student_id).await?;
    Ok(Json(context))
}

/// Submit (or replace) the authenticated student's course registration
#[utoipa::path(
    post,
    path = "/api/registrations",
    request_body = SubmitRegistrationDto,
    responses(
        (status = 201, description = "Registration recorded", body = Registration),
        (status = 401, description = "Missing or invalid token"),
        (status = 422, description = "Selection rejected")
    ),
    security(("bearer_auth" = [])),
    tag = "Registrations"
)]
#[instrument(skip(state, auth, dto))]
pub async fn submit_registration(
    State(state): State<AppState>,
    auth: AuthStudent,
    ValidatedJson(dto): ValidatedJson<SubmitRegistrationDto>,
) -> Result<(StatusCode, Json<Registration>), AppError> {
    let student_id = auth.student_id()?;
    let registration = RegistrationService::submit(&state.db, student_id, dto).await?;
    Ok((StatusCode::CREATED, Json(registration)))
}
