use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

use crate::config::jwt::JwtConfig;
use crate::models::ids::StudentId;
use crate::modules::auth::model::Claims;
use crate::utils::errors::AppError;

/// Create a signed session token for a student. Claims carry the student id
/// and email; expiry defaults to one day.
pub fn create_session_token(
    student_id: StudentId,
    email: &str,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp();
    let exp = now + jwt_config.token_expiry;

    let claims = Claims {
        sub: student_id.to_string(),
        email: email.to_string(),
        exp: exp as usize,
        iat: now as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to create token: {}", e)))
}

/// Verify a session token. Expired, malformed and badly-signed tokens all
/// collapse to the same Unauthorized error; no distinction is surfaced.
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::unauthorized("Invalid or expired token"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str) -> JwtConfig {
        JwtConfig {
            secret: secret.to_string(),
            token_expiry: 86400,
        }
    }

    #[test]
    fn test_token_round_trip() {
        let jwt_config = config("secret-a");
        let student_id = StudentId::new();

        let token = create_session_token(student_id, "ada@example.com", &jwt_config).unwrap();
        let claims = verify_token(&token, &jwt_config).unwrap();

        assert_eq!(claims.sub, student_id.to_string());
        assert_eq!(claims.email, "ada@example.com");
        assert_eq!(claims.exp - claims.iat, 86400);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token =
            create_session_token(StudentId::new(), "ada@example.com", &config("secret-a")).unwrap();

        let err = verify_token(&token, &config("secret-b")).unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(verify_token("not-a-token", &config("secret-a")).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let jwt_config = JwtConfig {
            secret: "secret-a".to_string(),
            token_expiry: -3600,
        };
        let token =
            create_session_token(StudentId::new(), "ada@example.com", &jwt_config).unwrap();
        assert!(verify_token(&token, &jwt_config).is_err());
    }
}
