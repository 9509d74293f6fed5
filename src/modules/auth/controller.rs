use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::instrument;

use crate::middleware::auth::AuthStudent;
use crate::modules::auth::model::{LoginRequest, TokenResponse};
use crate::modules::auth::service::AuthService;
use crate::modules::students::model::StudentResponse;
use crate::modules::students::service::StudentService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

/// Student login with matric number or email
#[utoipa::path(
    post,
    path = "/login/student",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 401, description = "Unknown identifier or wrong password"),
        (status = 500, description = "Unexpected failure")
    ),
    tag = "Auth"
)]
#[instrument(skip(state, dto))]
pub async fn login_student(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Response {
    // Login error bodies use a `message` field, unlike the `error` shape the
    // rest of the API emits; the student portal's login form reads `message`.
    match AuthService::login(&state.db, &state.jwt_config, &dto.identifier, &dto.password).await {
        Ok(token) => (StatusCode::OK, Json(TokenResponse { token })).into_response(),
        Err(err) if err.status == StatusCode::UNAUTHORIZED => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": err.error.to_string() })),
        )
            .into_response(),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "message": "Login failed",
                "error": err.error.to_string(),
            })),
        )
            .into_response(),
    }
}

/// Fetch the authenticated student's profile
#[utoipa::path(
    get,
    path = "/login/student/profile",
    responses(
        (status = 200, description = "Student profile", body = StudentResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Token resolves to no student record")
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
#[instrument(skip(state, auth))]
pub async fn get_student_profile(
    State(state): State<AppState>,
    auth: AuthStudent,
) -> Result<Json<StudentResponse>, AppError> {
    let student_id = auth.student_id()?;
    let student = StudentService::get_student_by_id(&state.db, student_id).await?;
    Ok(Json(student.into()))
}
