use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use crate::models::ids::StudentId;
use crate::modules::students::model::{
    CreateStudentDto, ResetPasswordDto, StudentResponse, StudentSearchQuery, UpdateStudentDto,
};
use crate::modules::students::service::StudentService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

/// Create a new student
#[utoipa::path(
    post,
    path = "/api/students",
    request_body = CreateStudentDto,
    responses(
        (status = 201, description = "Student created successfully", body = StudentResponse),
        (status = 404, description = "Department or academic year not found"),
        (status = 422, description = "Validation error")
    ),
    tag = "Students"
)]
#[instrument(skip(state, dto))]
pub async fn create_student(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateStudentDto>,
) -> Result<(StatusCode, Json<StudentResponse>), AppError> {
    let student = StudentService::create_student(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(student.into())))
}

/// List students, optionally filtered by a search term
#[utoipa::path(
    get,
    path = "/api/students",
    params(StudentSearchQuery),
    responses(
        (status = 200, description = "List of students", body = [StudentResponse])
    ),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn get_students(
    State(state): State<AppState>,
    Query(query): Query<StudentSearchQuery>,
) -> Result<Json<Vec<StudentResponse>>, AppError> {
    let students = StudentService::get_students(&state.db, query.q.as_deref()).await?;
    Ok(Json(students.into_iter().map(Into::into).collect()))
}

/// Get a student by ID
#[utoipa::path(
    get,
    path = "/api/students/{id}",
    params(("id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student details", body = StudentResponse),
        (status = 404, description = "Student not found")
    ),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn get_student_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<StudentResponse>, AppError> {
    let student = StudentService::get_student_by_id(&state.db, StudentId::from(id)).await?;
    Ok(Json(student.into()))
}

/// Update a student's profile fields
#[utoipa::path(
    put,
    path = "/api/students/{id}",
    params(("id" = Uuid, Path, description = "Student ID")),
    request_body = UpdateStudentDto,
    responses(
        (status = 200, description = "Student updated successfully", body = StudentResponse),
        (status = 404, description = "Student not found")
    ),
    tag = "Students"
)]
#[instrument(skip(state, dto))]
pub async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateStudentDto>,
) -> Result<Json<StudentResponse>, AppError> {
    let student = StudentService::update_student(&state.db, StudentId::from(id), dto).await?;
    Ok(Json(student.into()))
}

/// Reset a student's password (default restores lowercase surname)
#[utoipa::path(
    put,
    path = "/api/students/{id}/password",
    params(("id" = Uuid, Path, description = "Student ID")),
    request_body = ResetPasswordDto,
    responses(
        (status = 204, description = "Password reset"),
        (status = 404, description = "Student not found")
    ),
    tag = "Students"
)]
#[instrument(skip(state, dto))]
pub async fn reset_student_password(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<ResetPasswordDto>,
) -> Result<StatusCode, AppError> {
    StudentService::reset_password(&state.db, StudentId::from(id), dto).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a student
#[utoipa::path(
    delete,
    path = "/api/students/{id}",
    params(("id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 204, description = "Student deleted successfully"),
        (status = 404, description = "Student not found")
    ),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn delete_student(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    StudentService::delete_student(&state.db, StudentId::from(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
