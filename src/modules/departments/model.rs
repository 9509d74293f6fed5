use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::enums::Program;
use crate::models::ids::DepartmentId;

/// Department entity. Codes are stored uppercase and are globally unique.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Department {
    pub id: DepartmentId,
    pub name: String,
    /// Short uppercase code, e.g. "CS"
    pub code: String,
    /// Program track the department admits into
    pub level: Program,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateDepartmentDto {
    #[validate(length(min = 1, max = 100, message = "name is required"))]
    pub name: String,
    /// Uppercased before storage
    #[validate(length(min = 1, max = 10, message = "code is required"))]
    pub code: String,
    pub level: Program,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateDepartmentDto {
    #[validate(length(min = 1, max = 100, message = "name is required"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 10, message = "code is required"))]
    pub code: Option<String>,
    pub level: Option<Program>,
}
