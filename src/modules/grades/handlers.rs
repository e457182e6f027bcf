use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use sqlx::types::Uuid;
use validator::Validate;

use crate::app_state::AppState;
use crate::db::models::{Grade, GradeRequest, GradeUpdate};
use crate::error::{AppError, AppResult};
use crate::middleware::{AppJson, AppPath};
use crate::modules::{find_course, find_student};
use crate::services::{AccessPolicy, Action, Caller};

#[derive(Debug, Serialize)]
pub struct StudentAverage {
    pub student_id: Uuid,
    pub average: f64,
}

#[derive(Debug, Serialize)]
pub struct CourseAverage {
    pub course_id: Uuid,
    pub average: f64,
}

/// Validated fields of a [`GradeRequest`].
struct GradeFields {
    student_id: Uuid,
    course_id: Uuid,
    value: f64,
    remarks: Option<String>,
}

fn grade_fields(payload: GradeRequest) -> AppResult<GradeFields> {
    payload.validate()?;
    match (payload.student_id, payload.course_id, payload.value) {
        (Some(student_id), Some(course_id), Some(value)) => Ok(GradeFields {
            student_id,
            course_id,
            value,
            remarks: payload.remarks,
        }),
        _ => Err(AppError::Validation(
            "student_id, course_id and value are required".to_string(),
        )),
    }
}

pub async fn list_grades(
    State(state): State<AppState>,
    caller: Caller,
) -> AppResult<Json<Vec<Grade>>> {
    AccessPolicy::authorize(&caller, Action::ListAllGrades)?;
    Ok(Json(state.grades.list_all().await?))
}

pub async fn create_grade(
    State(state): State<AppState>,
    caller: Caller,
    AppJson(payload): AppJson<GradeRequest>,
) -> AppResult<(StatusCode, Json<Grade>)> {
    AccessPolicy::authorize(&caller, Action::WriteGrades)?;
    let fields = grade_fields(payload)?;

    let student = find_student(&state, fields.student_id).await?;
    let course = find_course(&state, fields.course_id).await?;
    let grade = state
        .grades
        .create(&student, &course, fields.value, fields.remarks)
        .await?;

    Ok((StatusCode::CREATED, Json(grade)))
}

pub async fn get_grade(
    State(state): State<AppState>,
    caller: Caller,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<Grade>> {
    let grade = state.grades.get(id).await?;
    AccessPolicy::authorize(&caller, Action::ReadStudentGrades(grade.student_id))?;
    Ok(Json(grade))
}

pub async fn update_grade(
    State(state): State<AppState>,
    caller: Caller,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<GradeRequest>,
) -> AppResult<Json<Grade>> {
    AccessPolicy::authorize(&caller, Action::WriteGrades)?;
    let fields = grade_fields(payload)?;

    let student = find_student(&state, fields.student_id).await?;
    let course = find_course(&state, fields.course_id).await?;
    let grade = state
        .grades
        .update(GradeUpdate {
            id,
            student_id: student.id,
            course_id: course.id,
            value: fields.value,
            remarks: fields.remarks,
        })
        .await?;

    Ok(Json(grade))
}

pub async fn delete_grade(
    State(state): State<AppState>,
    caller: Caller,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<StatusCode> {
    AccessPolicy::authorize(&caller, Action::DeleteGrades)?;
    state.grades.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_student_grades(
    State(state): State<AppState>,
    caller: Caller,
    AppPath(student_id): AppPath<Uuid>,
) -> AppResult<Json<Vec<Grade>>> {
    AccessPolicy::authorize(&caller, Action::ReadStudentGrades(student_id))?;
    let student = find_student(&state, student_id).await?;
    Ok(Json(state.grades.list_by_student(&student).await?))
}

pub async fn student_average(
    State(state): State<AppState>,
    caller: Caller,
    AppPath(student_id): AppPath<Uuid>,
) -> AppResult<Json<StudentAverage>> {
    AccessPolicy::authorize(&caller, Action::ReadStudentGrades(student_id))?;
    let student = find_student(&state, student_id).await?;
    let average = state.grades.average_for_student(&student).await?;
    Ok(Json(StudentAverage {
        student_id,
        average,
    }))
}

pub async fn list_course_grades(
    State(state): State<AppState>,
    caller: Caller,
    AppPath(course_id): AppPath<Uuid>,
) -> AppResult<Json<Vec<Grade>>> {
    AccessPolicy::authorize(&caller, Action::ReadCourseGrades)?;
    let course = find_course(&state, course_id).await?;
    Ok(Json(state.grades.list_by_course(&course).await?))
}

pub async fn course_average(
    State(state): State<AppState>,
    caller: Caller,
    AppPath(course_id): AppPath<Uuid>,
) -> AppResult<Json<CourseAverage>> {
    AccessPolicy::authorize(&caller, Action::ReadCourseGrades)?;
    let course = find_course(&state, course_id).await?;
    let average = state.grades.average_for_course(&course).await?;
    Ok(Json(CourseAverage { course_id, average }))
}
