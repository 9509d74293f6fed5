use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::models::ids::StudentId;
use crate::modules::auth::model::Claims;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::verify_token;

/// Extractor that validates the bearer token and resolves the authenticated
/// student's identity. Missing, malformed and failed-verification tokens all
/// reject with the same Unauthorized error.
#[derive(Debug, Clone)]
pub struct AuthStudent(pub Claims);

impl AuthStudent {
    /// The student id carried in the token's `sub` claim.
    pub fn student_id(&self) -> Result<StudentId, AppError> {
        self.0
            .sub
            .parse()
            .map_err(|_| AppError::unauthorized("Invalid student ID in token"))
    }

    pub fn email(&self) -> &str {
        &self.0.email
    }
}

impl FromRequestParts<AppState> for AuthStudent {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::unauthorized("Invalid authorization header format"))?;

        let claims = verify_token(token, &state.jwt_config)?;

        Ok(AuthStudent(claims))
    }
}
