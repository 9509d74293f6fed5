use sqlx::PgPool;
use tracing::{instrument, warn};

use crate::models::ids::StudentId;
use crate::modules::academic_years::service::AcademicYearService;
use crate::modules::departments::matric::{
    MAX_GENERATION_ATTEMPTS, matric_candidate, matric_prefix,
};
use crate::modules::departments::service::DepartmentService;
use crate::modules::students::model::{
    CreateStudentDto, ResetPasswordDto, Student, UpdateStudentDto,
};
use crate::utils::errors::AppError;
use crate::utils::password::hash_password;

const STUDENT_COLUMNS: &str = "id, first_name, middle_name, surname, dob, email, phone_number, \
     gender, marital_status, permanent_address, department, academic_year_id, level, \
     program_type, matric_number, password, photo_url, search_tokens, created_at, updated_at";

pub struct StudentService;

impl StudentService {
    /// Lowercase token index for admin search, built from the fields an
    /// admin is likely to search by.
    fn build_search_tokens(student_fields: &[&str]) -> Vec<String> {
        let mut tokens: Vec<String> = student_fields
            .iter()
            .flat_map(|field| field.split_whitespace())
            .map(|token| token.to_lowercase())
            .collect();
        tokens.sort();
        tokens.dedup();
        tokens
    }

    /// Create a student. The matric number is generated here, once; an
    /// insert conflicting on the matric unique constraint retries with a
    /// fresh suffix up to [`MAX_GENERATION_ATTEMPTS`] times, so two
    /// near-simultaneous creates cannot both keep the same number.
    #[instrument(skip(db, dto), fields(email = %dto.email))]
    pub async fn create_student(db: &PgPool, dto: CreateStudentDto) -> Result<Student, AppError> {
        let department = DepartmentService::get_department_by_id(db, dto.department_id).await?;
        let year = AcademicYearService::get_year_by_id(db, dto.academic_year_id).await?;

        let program = dto.level.program();
        let prefix = matric_prefix(&year.session, &department.code, program);

        // Default credential is the lowercase surname, hashed at rest.
        let default_password = dto.surname.trim().to_lowercase();
        let password_hash = hash_password(&default_password)?;

        for attempt in 0..MAX_GENERATION_ATTEMPTS {
            // ThreadRng is not Send, so it must not live across an await
            let matric_number = {
                let mut rng = rand::thread_rng();
                matric_candidate(&prefix, &mut rng)
            };

            let search_tokens = Self::build_search_tokens(&[
                &dto.first_name,
                dto.middle_name.as_deref().unwrap_or(""),
                &dto.surname,
                &dto.email,
                &matric_number,
                &department.name,
            ]);

            let result = sqlx::query_as::<_, Student>(&format!(
                "INSERT INTO students
                 (first_name, middle_name, surname, dob, email, phone_number, gender,
                  marital_status, permanent_address, department, academic_year_id, level,
                  program_type, matric_number, password, photo_url, search_tokens)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
                 RETURNING {STUDENT_COLUMNS}"
            ))
            .bind(dto.first_name.trim())
            .bind(&dto.middle_name)
            .bind(dto.surname.trim())
            .bind(dto.dob)
            .bind(dto.email.trim())
            .bind(dto.phone_number.trim())
            .bind(&dto.gender)
            .bind(&dto.marital_status)
            .bind(&dto.permanent_address)
            .bind(&department.name)
            .bind(dto.academic_year_id)
            .bind(dto.level)
            .bind(program)
            .bind(&matric_number)
            .bind(&password_hash)
            .bind(&dto.photo_url)
            .bind(&search_tokens)
            .fetch_one(db)
            .await;

            match result {
                Ok(student) => return Ok(student),
                Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                    warn!(attempt, %matric_number, "matric number collision, retrying");
                    continue;
                }
                Err(e) => return Err(AppError::database(e)),
            }
        }

        Err(AppError::internal(anyhow::anyhow!(
            "Could not assign a unique matric number for prefix {prefix} after {MAX_GENERATION_ATTEMPTS} attempts"
        )))
    }

    /// List students, optionally filtered by a search token. The token is
    /// matched exactly against the lowercase index.
    #[instrument(skip(db))]
    pub async fn get_students(
        db: &PgPool,
        search: Option<&str>,
    ) -> Result<Vec<Student>, AppError> {
        let students = match search {
            Some(term) if !term.trim().is_empty() => {
                sqlx::query_as::<_, Student>(&format!(
                    "SELECT {STUDENT_COLUMNS} FROM students
                     WHERE $1 = ANY(search_tokens)
                     ORDER BY surname, first_name"
                ))
                .bind(term.trim().to_lowercase())
                .fetch_all(db)
                .await?
            }
            _ => {
                sqlx::query_as::<_, Student>(&format!(
                    "SELECT {STUDENT_COLUMNS} FROM students ORDER BY surname, first_name"
                ))
                .fetch_all(db)
                .await?
            }
        };

        Ok(students)
    }

    #[instrument(skip(db))]
    pub async fn get_student_by_id(
        db: &PgPool,
        student_id: StudentId,
    ) -> Result<Student, AppError> {
        let student = sqlx::query_as::<_, Student>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE id = $1"
        ))
        .bind(student_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Student not found")))?;

        Ok(student)
    }

    /// Look up by matric number first, then by email. The fallback order is
    /// part of the login contract: a matric match always wins.
    #[instrument(skip(db))]
    pub async fn find_by_identifier(
        db: &PgPool,
        identifier: &str,
    ) -> Result<Option<Student>, AppError> {
        let by_matric = sqlx::query_as::<_, Student>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE matric_number = $1"
        ))
        .bind(identifier)
        .fetch_optional(db)
        .await?;

        if by_matric.is_some() {
            return Ok(by_matric);
        }

        let by_email = sqlx::query_as::<_, Student>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE email = $1 LIMIT 1"
        ))
        .bind(identifier)
        .fetch_optional(db)
        .await?;

        Ok(by_email)
    }

    /// Update mutable profile fields. The matric number and program track
    /// are immutable; the search index is rebuilt from the merged record.
    #[instrument(skip(db, dto))]
    pub async fn update_student(
        db: &PgPool,
        student_id: StudentId,
        dto: UpdateStudentDto,
    ) -> Result<Student, AppError> {
        let existing = Self::get_student_by_id(db, student_id).await?;

        let first_name = dto.first_name.unwrap_or(existing.first_name);
        let middle_name = dto.middle_name.or(existing.middle_name);
        let surname = dto.surname.unwrap_or(existing.surname);
        let dob = dto.dob.unwrap_or(existing.dob);
        let email = dto.email.unwrap_or(existing.email);
        let phone_number = dto.phone_number.unwrap_or(existing.phone_number);
        let gender = dto.gender.unwrap_or(existing.gender);
        let marital_status = dto.marital_status.unwrap_or(existing.marital_status);
        let permanent_address = dto.permanent_address.unwrap_or(existing.permanent_address);
        let level = dto.level.unwrap_or(existing.level);
        let photo_url = dto.photo_url.or(existing.photo_url);

        let search_tokens = Self::build_search_tokens(&[
            &first_name,
            middle_name.as_deref().unwrap_or(""),
            &surname,
            &email,
            &existing.matric_number,
            &existing.department,
        ]);

        let student = sqlx::query_as::<_, Student>(&format!(
            "UPDATE students
             SET first_name = $1, middle_name = $2, surname = $3, dob = $4, email = $5,
                 phone_number = $6, gender = $7, marital_status = $8, permanent_address = $9,
                 level = $10, photo_url = $11, search_tokens = $12, updated_at = NOW()
             WHERE id = $13
             RETURNING {STUDENT_COLUMNS}"
        ))
        .bind(&first_name)
        .bind(&middle_name)
        .bind(&surname)
        .bind(dob)
        .bind(&email)
        .bind(&phone_number)
        .bind(&gender)
        .bind(&marital_status)
        .bind(&permanent_address)
        .bind(level)
        .bind(&photo_url)
        .bind(&search_tokens)
        .bind(student_id)
        .fetch_one(db)
        .await?;

        Ok(student)
    }

    /// Reset a student's password. With no explicit password the default
    /// (lowercase surname) is restored.
    #[instrument(skip(db, dto))]
    pub async fn reset_password(
        db: &PgPool,
        student_id: StudentId,
        dto: ResetPasswordDto,
    ) -> Result<(), AppError> {
        let student = Self::get_student_by_id(db, student_id).await?;

        let new_password = match dto.password {
            Some(password) => password,
            None => student.surname.to_lowercase(),
        };
        let password_hash = hash_password(&new_password)?;

        sqlx::query("UPDATE students SET password = $1, updated_at = NOW() WHERE id = $2")
            .bind(&password_hash)
            .bind(student_id)
            .execute(db)
            .await?;

        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn delete_student(db: &PgPool, student_id: StudentId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(student_id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Student not found")));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::{Program, StudyLevel};
    use crate::models::ids::{AcademicYearId, DepartmentId};
    use crate::modules::academic_years::model::CreateAcademicYearDto;
    use crate::modules::departments::model::CreateDepartmentDto;
    use crate::utils::password::verify_password;
    use axum::http::StatusCode;
    use chrono::NaiveDate;

    async fn seed_year(pool: &PgPool) -> AcademicYearId {
        AcademicYearService::create_year(
            pool,
            CreateAcademicYearDto {
                session: "2024/2025".to_string(),
                start_date: NaiveDate::from_ymd_opt(2024, 9, 1).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2025, 7, 31).unwrap(),
            },
        )
        .await
        .unwrap()
        .id
    }

    async fn seed_department(pool: &PgPool) -> DepartmentId {
        DepartmentService::create_department(
            pool,
            CreateDepartmentDto {
                name: "Computer Science".to_string(),
                code: "CS".to_string(),
                level: Program::ND,
            },
        )
        .await
        .unwrap()
        .id
    }

    fn student_dto(
        surname: &str,
        email: &str,
        department_id: DepartmentId,
        year_id: AcademicYearId,
    ) -> CreateStudentDto {
        CreateStudentDto {
            first_name: "Ada".to_string(),
            middle_name: None,
            surname: surname.to_string(),
            dob: NaiveDate::from_ymd_opt(2004, 3, 15).unwrap(),
            email: email.to_string(),
            phone_number: "08012345678".to_string(),
            gender: "Female".to_string(),
            marital_status: "Single".to_string(),
            permanent_address: "12 College Road".to_string(),
            department_id,
            academic_year_id: year_id,
            level: StudyLevel::ND1,
            photo_url: None,
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_student_assigns_matric_and_hashes_default_password(pool: PgPool) {
        let year_id = seed_year(&pool).await;
        let dept_id = seed_department(&pool).await;

        let student = StudentService::create_student(
            &pool,
            student_dto("Okafor", "ada@example.com", dept_id, year_id),
        )
        .await
        .unwrap();

        assert!(student.matric_number.starts_with("24/CS/"));
        let suffix: u32 = student
            .matric_number
            .rsplit('/')
            .next()
            .unwrap()
            .parse()
            .unwrap();
        assert!((1000..=9999).contains(&suffix));

        assert_eq!(student.program_type, Program::ND);
        // Default password is the lowercase surname, stored hashed
        assert_ne!(student.password, "okafor");
        assert!(verify_password("okafor", &student.password).unwrap());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_search_tokens_are_lowercase(pool: PgPool) {
        let year_id = seed_year(&pool).await;
        let dept_id = seed_department(&pool).await;

        let student = StudentService::create_student(
            &pool,
            student_dto("Okafor", "ada@example.com", dept_id, year_id),
        )
        .await
        .unwrap();

        assert!(student.search_tokens.contains(&"ada".to_string()));
        assert!(student.search_tokens.contains(&"okafor".to_string()));
        assert!(
            student
                .search_tokens
                .contains(&student.matric_number.to_lowercase())
        );

        let found = StudentService::get_students(&pool, Some("OKAFOR"))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);

        let missed = StudentService::get_students(&pool, Some("nobody"))
            .await
            .unwrap();
        assert!(missed.is_empty());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_find_by_identifier_prefers_matric(pool: PgPool) {
        let year_id = seed_year(&pool).await;
        let dept_id = seed_department(&pool).await;

        let first = StudentService::create_student(
            &pool,
            student_dto("Okafor", "ada@example.com", dept_id, year_id),
        )
        .await
        .unwrap();

        // Second student whose email equals the first student's matric number
        let second = StudentService::create_student(
            &pool,
            student_dto("Bello", &format!("{}@example.com", first.id), dept_id, year_id),
        )
        .await
        .unwrap();
        sqlx::query("UPDATE students SET email = $1 WHERE id = $2")
            .bind(&first.matric_number)
            .bind(second.id)
            .execute(&pool)
            .await
            .unwrap();

        let resolved = StudentService::find_by_identifier(&pool, &first.matric_number)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resolved.id, first.id);

        let by_email = StudentService::find_by_identifier(&pool, "ada@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id, first.id);

        let missing = StudentService::find_by_identifier(&pool, "unknown")
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_update_preserves_matric_number(pool: PgPool) {
        let year_id = seed_year(&pool).await;
        let dept_id = seed_department(&pool).await;

        let student = StudentService::create_student(
            &pool,
            student_dto("Okafor", "ada@example.com", dept_id, year_id),
        )
        .await
        .unwrap();
        let original_matric = student.matric_number.clone();

        let updated = StudentService::update_student(
            &pool,
            student.id,
            UpdateStudentDto {
                first_name: None,
                middle_name: None,
                surname: Some("Okafor-Eze".to_string()),
                dob: None,
                email: None,
                phone_number: None,
                gender: None,
                marital_status: None,
                permanent_address: None,
                level: None,
                photo_url: None,
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.matric_number, original_matric);
        assert_eq!(updated.surname, "Okafor-Eze");
        assert!(updated.search_tokens.contains(&"okafor-eze".to_string()));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_reset_password_defaults_to_surname(pool: PgPool) {
        let year_id = seed_year(&pool).await;
        let dept_id = seed_department(&pool).await;

        let student = StudentService::create_student(
            &pool,
            student_dto("Okafor", "ada@example.com", dept_id, year_id),
        )
        .await
        .unwrap();

        StudentService::reset_password(
            &pool,
            student.id,
            ResetPasswordDto {
                password: Some("new-secret".to_string()),
            },
        )
        .await
        .unwrap();
        let student = StudentService::get_student_by_id(&pool, student.id)
            .await
            .unwrap();
        assert!(verify_password("new-secret", &student.password).unwrap());

        StudentService::reset_password(&pool, student.id, ResetPasswordDto { password: None })
            .await
            .unwrap();
        let student = StudentService::get_student_by_id(&pool, student.id)
            .await
            .unwrap();
        assert!(verify_password("okafor", &student.password).unwrap());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_delete_missing_student(pool: PgPool) {
        let err = StudentService::delete_student(&pool, StudentId::new())
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }
}
