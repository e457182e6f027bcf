pub mod enrollments;
pub mod grades;
pub mod me;

use sqlx::types::Uuid;

use crate::app_state::AppState;
use crate::db::models::{Course, Student};
use crate::error::{AppError, AppResult};

pub(crate) async fn find_student(state: &AppState, id: Uuid) -> AppResult<Student> {
    state
        .students
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("student {id}")))
}

pub(crate) async fn find_course(state: &AppState, id: Uuid) -> AppResult<Course> {
    state
        .courses
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("course {id}")))
}
