//! Views of the authenticated caller's own records.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::app_state::AppState;
use crate::db::models::{Enrollment, Grade, Student};
use crate::error::AppResult;
use crate::services::grading_manager::mean;
use crate::services::{AccessPolicy, Action, Caller, Principal};

#[derive(Debug, Serialize)]
pub struct Profile {
    #[serde(flatten)]
    pub principal: Principal,
    pub student: Option<Student>,
}

#[derive(Debug, Serialize)]
pub struct AcademicSummary {
    pub student: Student,
    pub enrollments: Vec<Enrollment>,
    pub grades: Vec<Grade>,
    pub enrollment_count: usize,
    pub grade_count: usize,
    pub average: f64,
}

pub async fn my_profile(caller: Caller) -> AppResult<Json<Profile>> {
    AccessPolicy::authorize(&caller, Action::ReadProfile)?;
    Ok(Json(Profile {
        principal: caller.principal().clone(),
        student: caller.student().cloned(),
    }))
}

pub async fn my_enrollments(
    State(state): State<AppState>,
    caller: Caller,
) -> AppResult<Json<Vec<Enrollment>>> {
    AccessPolicy::authorize(&caller, Action::ReadOwnRecords)?;
    let student = caller.require_student()?;
    Ok(Json(state.enrollments.list_by_student(student).await?))
}

pub async fn my_grades(
    State(state): State<AppState>,
    caller: Caller,
) -> AppResult<Json<Vec<Grade>>> {
    AccessPolicy::authorize(&caller, Action::ReadOwnRecords)?;
    let student = caller.require_student()?;
    Ok(Json(state.grades.list_by_student(student).await?))
}

/// Enrollments, grades and overall average in one payload.
pub async fn my_summary(
    State(state): State<AppState>,
    caller: Caller,
) -> AppResult<Json<AcademicSummary>> {
    AccessPolicy::authorize(&caller, Action::ReadOwnRecords)?;
    let student = caller.require_student()?;

    let enrollments = state.enrollments.list_by_student(student).await?;
    let grades = state.grades.list_by_student(student).await?;
    let average = mean(&grades);

    Ok(Json(AcademicSummary {
        student: student.clone(),
        enrollment_count: enrollments.len(),
        grade_count: grades.len(),
        enrollments,
        grades,
        average,
    }))
}
