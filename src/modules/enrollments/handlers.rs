use axum::{extract::State, http::StatusCode, Json};
use sqlx::types::Uuid;
use validator::Validate;

use crate::app_state::AppState;
use crate::db::models::{Enrollment, EnrollmentRequest};
use crate::error::{AppError, AppResult};
use crate::middleware::{AppJson, AppPath};
use crate::modules::{find_course, find_student};
use crate::services::{AccessPolicy, Action, Caller};

pub async fn list_enrollments(
    State(state): State<AppState>,
    caller: Caller,
) -> AppResult<Json<Vec<Enrollment>>> {
    AccessPolicy::authorize(&caller, Action::ListAllEnrollments)?;
    Ok(Json(state.enrollments.list_all().await?))
}

pub async fn list_active_enrollments(
    State(state): State<AppState>,
    caller: Caller,
) -> AppResult<Json<Vec<Enrollment>>> {
    AccessPolicy::authorize(&caller, Action::ListActiveEnrollments)?;
    Ok(Json(state.enrollments.list_active().await?))
}

pub async fn create_enrollment(
    State(state): State<AppState>,
    caller: Caller,
    AppJson(payload): AppJson<EnrollmentRequest>,
) -> AppResult<(StatusCode, Json<Enrollment>)> {
    AccessPolicy::authorize(&caller, Action::ManageEnrollments)?;
    payload.validate()?;
    let (Some(student_id), Some(course_id)) = (payload.student_id, payload.course_id) else {
        return Err(AppError::Validation(
            "student_id and course_id are required".to_string(),
        ));
    };

    let student = find_student(&state, student_id).await?;
    let course = find_course(&state, course_id).await?;
    let enrollment = state.enrollments.create(&student, &course).await?;

    Ok((StatusCode::CREATED, Json(enrollment)))
}

pub async fn get_enrollment(
    State(state): State<AppState>,
    caller: Caller,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<Enrollment>> {
    let enrollment = state.enrollments.get(id).await?;
    AccessPolicy::authorize(&caller, Action::ReadStudentEnrollments(enrollment.student_id))?;
    Ok(Json(enrollment))
}

pub async fn cancel_enrollment(
    State(state): State<AppState>,
    caller: Caller,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<Enrollment>> {
    AccessPolicy::authorize(&caller, Action::ManageEnrollments)?;
    Ok(Json(state.enrollments.cancel(id).await?))
}

pub async fn delete_enrollment(
    State(state): State<AppState>,
    caller: Caller,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<StatusCode> {
    AccessPolicy::authorize(&caller, Action::ManageEnrollments)?;
    state.enrollments.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_student_enrollments(
    State(state): State<AppState>,
    caller: Caller,
    AppPath(student_id): AppPath<Uuid>,
) -> AppResult<Json<Vec<Enrollment>>> {
    AccessPolicy::authorize(&caller, Action::ReadStudentEnrollments(student_id))?;
    let student = find_student(&state, student_id).await?;
    Ok(Json(state.enrollments.list_by_student(&student).await?))
}

pub async fn list_course_enrollments(
    State(state): State<AppState>,
    caller: Caller,
    AppPath(course_id): AppPath<Uuid>,
) -> AppResult<Json<Vec<Enrollment>>> {
    AccessPolicy::authorize(&caller, Action::ReadCourseEnrollments)?;
    let course = find_course(&state, course_id).await?;
    Ok(Json(state.enrollments.list_by_course(&course).await?))
}
