use axum::{routing::get, Router};

use super::handlers::{my_enrollments, my_grades, my_profile, my_summary};
use crate::app_state::AppState;

pub fn me_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(my_profile))
        .route("/enrollments", get(my_enrollments))
        .route("/grades", get(my_grades))
        .route("/summary", get(my_summary))
}
