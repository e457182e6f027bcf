use async_trait::async_trait;
use sqlx::types::Uuid;
use sqlx::PgPool;

use super::{DbResult, EnrollmentStore};
use crate::db::models::{Enrollment, EnrollmentStatus, NewEnrollment};

const ENROLLMENT_COLUMNS: &str =
    "id, student_id, course_id, enrolled_at, status, created_at, updated_at";

#[derive(Clone)]
pub struct PgEnrollmentRepository {
    pool: PgPool,
}

impl PgEnrollmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EnrollmentStore for PgEnrollmentRepository {
    async fn find_all(&self) -> DbResult<Vec<Enrollment>> {
        let rows = sqlx::query_as::<_, Enrollment>(&format!(
            "SELECT {ENROLLMENT_COLUMNS} FROM enrollments"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<Enrollment>> {
        let row = sqlx::query_as::<_, Enrollment>(&format!(
            "SELECT {ENROLLMENT_COLUMNS} FROM enrollments WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find_by_student_and_course(
        &self,
        student_id: Uuid,
        course_id: Uuid,
    ) -> DbResult<Option<Enrollment>> {
        let row = sqlx::query_as::<_, Enrollment>(&format!(
            "SELECT {ENROLLMENT_COLUMNS} FROM enrollments WHERE student_id = $1 AND course_id = $2"
        ))
        .bind(student_id)
        .bind(course_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find_by_student(&self, student_id: Uuid) -> DbResult<Vec<Enrollment>> {
        let rows = sqlx::query_as::<_, Enrollment>(&format!(
            "SELECT {ENROLLMENT_COLUMNS} FROM enrollments WHERE student_id = $1"
        ))
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_by_course(&self, course_id: Uuid) -> DbResult<Vec<Enrollment>> {
        let rows = sqlx::query_as::<_, Enrollment>(&format!(
            "SELECT {ENROLLMENT_COLUMNS} FROM enrollments WHERE course_id = $1"
        ))
        .bind(course_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_by_status(&self, status: EnrollmentStatus) -> DbResult<Vec<Enrollment>> {
        let rows = sqlx::query_as::<_, Enrollment>(&format!(
            "SELECT {ENROLLMENT_COLUMNS} FROM enrollments WHERE status = $1"
        ))
        .bind(status)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn insert(&self, enrollment: &NewEnrollment) -> DbResult<Enrollment> {
        let row = sqlx::query_as::<_, Enrollment>(&format!(
            r#"
            INSERT INTO enrollments (student_id, course_id, enrolled_at, status)
            VALUES ($1, $2, $3, $4)
            RETURNING {ENROLLMENT_COLUMNS}
            "#
        ))
        .bind(enrollment.student_id)
        .bind(enrollment.course_id)
        .bind(enrollment.enrolled_at)
        .bind(enrollment.status)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_status(
        &self,
        id: Uuid,
        from: EnrollmentStatus,
        to: EnrollmentStatus,
    ) -> DbResult<Option<Enrollment>> {
        let row = sqlx::query_as::<_, Enrollment>(&format!(
            r#"
            UPDATE enrollments
            SET status = $1, updated_at = NOW()
            WHERE id = $2 AND status = $3
            RETURNING {ENROLLMENT_COLUMNS}
            "#
        ))
        .bind(to)
        .bind(id)
        .bind(from)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM enrollments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
