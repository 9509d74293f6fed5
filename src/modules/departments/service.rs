use sqlx::PgPool;
use tracing::instrument;

use crate::models::ids::DepartmentId;
use crate::modules::departments::model::{CreateDepartmentDto, Department, UpdateDepartmentDto};
use crate::utils::errors::AppError;

const DEPARTMENT_COLUMNS: &str = "id, name, code, level, created_at, updated_at";

pub struct DepartmentService;

impl DepartmentService {
    /// Create a department. The code is uppercased before storage and must
    /// not collide with an existing code; the unique index is the final
    /// arbiter under concurrent creates.
    #[instrument(skip(db))]
    pub async fn create_department(
        db: &PgPool,
        dto: CreateDepartmentDto,
    ) -> Result<Department, AppError> {
        let code = dto.code.trim().to_uppercase();

        let department = sqlx::query_as::<_, Department>(&format!(
            "INSERT INTO departments (name, code, level)
             VALUES ($1, $2, $3)
             RETURNING {DEPARTMENT_COLUMNS}"
        ))
        .bind(dto.name.trim())
        .bind(&code)
        .bind(dto.level)
        .fetch_one(db)
        .await
        .map_err(|e| Self::map_duplicate_code(e, &code))?;

        Ok(department)
    }

    fn map_duplicate_code(e: sqlx::Error, code: &str) -> AppError {
        if let sqlx::Error::Database(db_err) = &e
            && db_err.is_unique_violation()
        {
            return AppError::bad_request(anyhow::anyhow!(
                "A department with code {code} already exists"
            ));
        }
        AppError::database(e)
    }

    #[instrument(skip(db))]
    pub async fn get_departments(db: &PgPool) -> Result<Vec<Department>, AppError> {
        let departments = sqlx::query_as::<_, Department>(&format!(
            "SELECT {DEPARTMENT_COLUMNS} FROM departments ORDER BY name"
        ))
        .fetch_all(db)
        .await?;

        Ok(departments)
    }

    #[instrument(skip(db))]
    pub async fn get_department_by_id(
        db: &PgPool,
        department_id: DepartmentId,
    ) -> Result<Department, AppError> {
        let department = sqlx::query_as::<_, Department>(&format!(
            "SELECT {DEPARTMENT_COLUMNS} FROM departments WHERE id = $1"
        ))
        .bind(department_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Department not found")))?;

        Ok(department)
    }

    #[instrument(skip(db))]
    pub async fn update_department(
        db: &PgPool,
        department_id: DepartmentId,
        dto: UpdateDepartmentDto,
    ) -> Result<Department, AppError> {
        let existing = Self::get_department_by_id(db, department_id).await?;

        let name = dto.name.map(|n| n.trim().to_string()).unwrap_or(existing.name);
        let code = dto
            .code
            .map(|c| c.trim().to_uppercase())
            .unwrap_or(existing.code);
        let level = dto.level.unwrap_or(existing.level);

        let department = sqlx::query_as::<_, Department>(&format!(
            "UPDATE departments
             SET name = $1, code = $2, level = $3, updated_at = NOW()
             WHERE id = $4
             RETURNING {DEPARTMENT_COLUMNS}"
        ))
        .bind(&name)
        .bind(&code)
        .bind(level)
        .bind(department_id)
        .fetch_one(db)
        .await
        .map_err(|e| Self::map_duplicate_code(e, &code))?;

        Ok(department)
    }

    #[instrument(skip(db))]
    pub async fn delete_department(
        db: &PgPool,
        department_id: DepartmentId,
    ) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM departments WHERE id = $1")
            .bind(department_id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Department not found")));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::Program;
    use axum::http::StatusCode;

    fn dept_dto(name: &str, code: &str, level: Program) -> CreateDepartmentDto {
        CreateDepartmentDto {
            name: name.to_string(),
            code: code.to_string(),
            level,
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_department_uppercases_code(pool: PgPool) {
        let department = DepartmentService::create_department(
            &pool,
            dept_dto("Computer Science", "cs", Program::ND),
        )
        .await
        .unwrap();

        assert_eq!(department.code, "CS");
        assert_eq!(department.level, Program::ND);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_department_rejects_duplicate_code(pool: PgPool) {
        DepartmentService::create_department(
            &pool,
            dept_dto("Computer Science", "CS", Program::ND),
        )
        .await
        .unwrap();

        // Lowercase input collides after uppercasing
        let err = DepartmentService::create_department(
            &pool,
            dept_dto("Cyber Security", "cs", Program::HND),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.error.to_string().contains("already exists"));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_update_department_code_collision(pool: PgPool) {
        DepartmentService::create_department(
            &pool,
            dept_dto("Computer Science", "CS", Program::ND),
        )
        .await
        .unwrap();
        let acc = DepartmentService::create_department(
            &pool,
            dept_dto("Accountancy", "ACC", Program::ND),
        )
        .await
        .unwrap();

        let err = DepartmentService::update_department(
            &pool,
            acc.id,
            UpdateDepartmentDto {
                name: None,
                code: Some("CS".to_string()),
                level: None,
            },
        )
        .await
        .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_delete_missing_department(pool: PgPool) {
        let err = DepartmentService::delete_department(&pool, DepartmentId::new())
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }
}
