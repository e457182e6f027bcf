use async_trait::async_trait;
use sqlx::types::Uuid;
use sqlx::PgPool;

use super::{DbResult, StudentDirectory};
use crate::db::models::Student;

const STUDENT_COLUMNS: &str =
    "id, matriculation, first_name, last_name, email, enrolled_on, active, created_at, updated_at";

#[derive(Clone)]
pub struct PgStudentRepository {
    pool: PgPool,
}

impl PgStudentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StudentDirectory for PgStudentRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<Student>> {
        let student = sqlx::query_as::<_, Student>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(student)
    }

    async fn find_by_matriculation(&self, matriculation: &str) -> DbResult<Option<Student>> {
        let student = sqlx::query_as::<_, Student>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE matriculation = $1"
        ))
        .bind(matriculation)
        .fetch_optional(&self.pool)
        .await?;
        Ok(student)
    }

    async fn find_by_email(&self, email: &str) -> DbResult<Option<Student>> {
        // Case-insensitive, backed by students_email_lower_key.
        let student = sqlx::query_as::<_, Student>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE lower(email) = lower($1)"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(student)
    }
}
