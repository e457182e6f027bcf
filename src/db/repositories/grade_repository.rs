use async_trait::async_trait;
use sqlx::types::Uuid;
use sqlx::PgPool;

use super::{DbResult, GradeStore};
use crate::db::models::{Grade, GradeUpdate, NewGrade};

const GRADE_COLUMNS: &str =
    "id, student_id, course_id, value, remarks, graded_at, created_at, updated_at";

#[derive(Clone)]
pub struct PgGradeRepository {
    pool: PgPool,
}

impl PgGradeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GradeStore for PgGradeRepository {
    async fn find_all(&self) -> DbResult<Vec<Grade>> {
        let rows = sqlx::query_as::<_, Grade>(&format!("SELECT {GRADE_COLUMNS} FROM grades"))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<Grade>> {
        let row = sqlx::query_as::<_, Grade>(&format!(
            "SELECT {GRADE_COLUMNS} FROM grades WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find_by_student(&self, student_id: Uuid) -> DbResult<Vec<Grade>> {
        let rows = sqlx::query_as::<_, Grade>(&format!(
            "SELECT {GRADE_COLUMNS} FROM grades WHERE student_id = $1"
        ))
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_by_course(&self, course_id: Uuid) -> DbResult<Vec<Grade>> {
        let rows = sqlx::query_as::<_, Grade>(&format!(
            "SELECT {GRADE_COLUMNS} FROM grades WHERE course_id = $1"
        ))
        .bind(course_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn insert(&self, grade: &NewGrade) -> DbResult<Grade> {
        let row = sqlx::query_as::<_, Grade>(&format!(
            r#"
            INSERT INTO grades (student_id, course_id, value, remarks, graded_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {GRADE_COLUMNS}
            "#
        ))
        .bind(grade.student_id)
        .bind(grade.course_id)
        .bind(grade.value)
        .bind(&grade.remarks)
        .bind(grade.graded_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(&self, update: &GradeUpdate) -> DbResult<Option<Grade>> {
        let row = sqlx::query_as::<_, Grade>(&format!(
            r#"
            UPDATE grades
            SET
                student_id = $1,
                course_id = $2,
                value = $3,
                remarks = $4,
                updated_at = NOW()
            WHERE id = $5
            RETURNING {GRADE_COLUMNS}
            "#
        ))
        .bind(update.student_id)
        .bind(update.course_id)
        .bind(update.value)
        .bind(&update.remarks)
        .bind(update.id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM grades WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
