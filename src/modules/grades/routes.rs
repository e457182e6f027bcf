use axum::{routing::get, Router};

use super::handlers::{
    course_average, create_grade, delete_grade, get_grade, list_course_grades, list_grades,
    list_student_grades, student_average, update_grade,
};
use crate::app_state::AppState;

pub fn grade_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_grades).post(create_grade))
        .route(
            "/{id}",
            get(get_grade).put(update_grade).delete(delete_grade),
        )
        .route("/student/{student_id}", get(list_student_grades))
        .route("/student/{student_id}/average", get(student_average))
        .route("/course/{course_id}", get(list_course_grades))
        .route("/course/{course_id}/average", get(course_average))
}
