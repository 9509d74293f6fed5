use sqlx::PgPool;
use tracing::instrument;

use crate::config::jwt::JwtConfig;
use crate::modules::students::service::StudentService;
use crate::utils::errors::AppError;
use crate::utils::jwt::create_session_token;
use crate::utils::password::verify_password;

pub struct AuthService;

impl AuthService {
    /// Authenticate a student and mint a session token.
    ///
    /// The identifier resolves against matric numbers first and falls back
    /// to email; an unknown identifier and a wrong password both return the
    /// same Unauthorized error.
    #[instrument(skip(db, jwt_config, password))]
    pub async fn login(
        db: &PgPool,
        jwt_config: &JwtConfig,
        identifier: &str,
        password: &str,
    ) -> Result<String, AppError> {
        let student = StudentService::find_by_identifier(db, identifier)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid matric number/email or password"))?;

        if !verify_password(password, &student.password)? {
            return Err(AppError::unauthorized(
                "Invalid matric number/email or password",
            ));
        }

        create_session_token(student.id, &student.email, jwt_config)
    }
}
