use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::enums::{Program, StudyLevel};
use crate::models::ids::{AcademicYearId, DepartmentId, StudentId};

/// Student entity. The password column is a bcrypt hash and never leaves the
/// service layer; [`StudentResponse`] is the outward shape.
#[derive(Debug, Clone, FromRow)]
pub struct Student {
    pub id: StudentId,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub surname: String,
    pub dob: NaiveDate,
    pub email: String,
    pub phone_number: String,
    pub gender: String,
    pub marital_status: String,
    pub permanent_address: String,
    pub department: String,
    pub academic_year_id: AcademicYearId,
    pub level: StudyLevel,
    pub program_type: Program,
    /// Assigned once at creation, never regenerated
    pub matric_number: String,
    pub password: String,
    pub photo_url: Option<String>,
    /// Lowercase tokens for admin search
    pub search_tokens: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Student shape returned by the API, without the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StudentResponse {
    pub id: StudentId,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub surname: String,
    pub dob: NaiveDate,
    pub email: String,
    pub phone_number: String,
    pub gender: String,
    pub marital_status: String,
    pub permanent_address: String,
    pub department: String,
    pub academic_year_id: AcademicYearId,
    pub level: StudyLevel,
    pub program_type: Program,
    pub matric_number: String,
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Student> for StudentResponse {
    fn from(student: Student) -> Self {
        Self {
            id: student.id,
            first_name: student.first_name,
            middle_name: student.middle_name,
            surname: student.surname,
            dob: student.dob,
            email: student.email,
            phone_number: student.phone_number,
            gender: student.gender,
            marital_status: student.marital_status,
            permanent_address: student.permanent_address,
            department: student.department,
            academic_year_id: student.academic_year_id,
            level: student.level,
            program_type: student.program_type,
            matric_number: student.matric_number,
            photo_url: student.photo_url,
            created_at: student.created_at,
            updated_at: student.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateStudentDto {
    #[validate(length(min = 1, max = 100, message = "first name is required"))]
    pub first_name: String,
    pub middle_name: Option<String>,
    #[validate(length(min = 1, max = 100, message = "surname is required"))]
    pub surname: String,
    pub dob: NaiveDate,
    #[validate(email(message = "email must be valid"))]
    pub email: String,
    #[validate(length(min = 1, max = 30, message = "phone number is required"))]
    pub phone_number: String,
    #[validate(length(min = 1, max = 20, message = "gender is required"))]
    pub gender: String,
    #[validate(length(min = 1, max = 20, message = "marital status is required"))]
    pub marital_status: String,
    #[validate(length(min = 1, max = 300, message = "permanent address is required"))]
    pub permanent_address: String,
    /// Department the student is admitted into; drives the matric prefix
    pub department_id: DepartmentId,
    pub academic_year_id: AcademicYearId,
    pub level: StudyLevel,
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateStudentDto {
    #[validate(length(min = 1, max = 100, message = "first name is required"))]
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    #[validate(length(min = 1, max = 100, message = "surname is required"))]
    pub surname: Option<String>,
    pub dob: Option<NaiveDate>,
    #[validate(email(message = "email must be valid"))]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 30, message = "phone number is required"))]
    pub phone_number: Option<String>,
    pub gender: Option<String>,
    pub marital_status: Option<String>,
    pub permanent_address: Option<String>,
    pub level: Option<StudyLevel>,
    pub photo_url: Option<String>,
}

/// Admin password reset. Omitting `password` restores the default
/// (lowercase surname).
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ResetPasswordDto {
    #[validate(length(min = 4, max = 100, message = "password must be at least 4 characters"))]
    pub password: Option<String>,
}

/// Admin search over the token index.
#[derive(Debug, Clone, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct StudentSearchQuery {
    pub q: Option<String>,
}
