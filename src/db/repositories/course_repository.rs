use async_trait::async_trait;
use sqlx::types::Uuid;
use sqlx::PgPool;

use super::{CourseDirectory, DbResult};
use crate::db::models::Course;

const COURSE_COLUMNS: &str =
    "id, code, title, description, credits, hours, trainer_id, active, created_at, updated_at";

#[derive(Clone)]
pub struct PgCourseRepository {
    pool: PgPool,
}

impl PgCourseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CourseDirectory for PgCourseRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<Course>> {
        let course = sqlx::query_as::<_, Course>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(course)
    }

    async fn find_by_code(&self, code: &str) -> DbResult<Option<Course>> {
        let course = sqlx::query_as::<_, Course>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses WHERE code = $1"
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;
        Ok(course)
    }
}
