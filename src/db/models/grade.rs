use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use time::OffsetDateTime;
use validator::Validate;

/// A student's mark for one course. `value` carries no range check.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
pub struct Grade {
    pub id: Uuid,
    pub student_id: Uuid,
    pub course_id: Uuid,
    pub value: f64,
    pub remarks: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub graded_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewGrade {
    pub student_id: Uuid,
    pub course_id: Uuid,
    pub value: f64,
    pub remarks: Option<String>,
    pub graded_at: OffsetDateTime,
}

/// Full overwrite of an existing grade, keyed by `id`.
#[derive(Debug, Clone, PartialEq)]
pub struct GradeUpdate {
    pub id: Uuid,
    pub student_id: Uuid,
    pub course_id: Uuid,
    pub value: f64,
    pub remarks: Option<String>,
}

/// Body of `POST /api/grades` and `PUT /api/grades/{id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct GradeRequest {
    #[validate(required(message = "student_id is required"))]
    pub student_id: Option<Uuid>,
    #[validate(required(message = "course_id is required"))]
    pub course_id: Option<Uuid>,
    #[validate(required(message = "value is required"))]
    pub value: Option<f64>,
    #[validate(length(max = 500))]
    pub remarks: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remarks_are_capped() {
        let req = GradeRequest {
            student_id: Some(Uuid::new_v4()),
            course_id: Some(Uuid::new_v4()),
            value: Some(14.5),
            remarks: Some("x".repeat(501)),
        };
        assert!(req.validate().unwrap_err().field_errors().contains_key("remarks"));
    }

    #[test]
    fn out_of_range_values_pass_validation() {
        let req = GradeRequest {
            student_id: Some(Uuid::new_v4()),
            course_id: Some(Uuid::new_v4()),
            value: Some(-42.0),
            remarks: None,
        };
        assert!(req.validate().is_ok());
    }
}
