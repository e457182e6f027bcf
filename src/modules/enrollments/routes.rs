use axum::{
    routing::{get, put},
    Router,
};

use super::handlers::{
    cancel_enrollment, create_enrollment, delete_enrollment, get_enrollment,
    list_active_enrollments, list_course_enrollments, list_enrollments, list_student_enrollments,
};
use crate::app_state::AppState;

pub fn enrollment_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_enrollments).post(create_enrollment))
        .route("/active", get(list_active_enrollments))
        .route("/{id}", get(get_enrollment).delete(delete_enrollment))
        .route("/{id}/cancel", put(cancel_enrollment))
        .route("/student/{student_id}", get(list_student_enrollments))
        .route("/course/{course_id}", get(list_course_enrollments))
}
