use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use time::OffsetDateTime;
use validator::Validate;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "enrollment_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnrollmentStatus {
    #[default]
    Active,
    Cancelled,
    /// Set by processes outside this service only.
    Completed,
}

impl EnrollmentStatus {
    /// Whether `self -> next` is a legal lifecycle move. Staying in place is not a move.
    pub fn can_transition_to(self, next: EnrollmentStatus) -> bool {
        matches!(
            (self, next),
            (EnrollmentStatus::Active, EnrollmentStatus::Cancelled)
                | (EnrollmentStatus::Active, EnrollmentStatus::Completed)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: Uuid,
    pub student_id: Uuid,
    pub course_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub enrolled_at: OffsetDateTime,
    pub status: EnrollmentStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEnrollment {
    pub student_id: Uuid,
    pub course_id: Uuid,
    pub enrolled_at: OffsetDateTime,
    pub status: EnrollmentStatus,
}

/// Body of `POST /api/enrollments`.
#[derive(Debug, Deserialize, Validate)]
pub struct EnrollmentRequest {
    #[validate(required(message = "student_id is required"))]
    pub student_id: Option<Uuid>,
    #[validate(required(message = "course_id is required"))]
    pub course_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_active_enrollments_move() {
        use EnrollmentStatus::*;

        assert!(Active.can_transition_to(Cancelled));
        assert!(Active.can_transition_to(Completed));
        assert!(!Cancelled.can_transition_to(Active));
        assert!(!Cancelled.can_transition_to(Completed));
        assert!(!Completed.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Cancelled));
    }

    #[test]
    fn status_serializes_upper_case() {
        let json = serde_json::to_string(&EnrollmentStatus::Cancelled).unwrap();
        assert_eq!(json, "\"CANCELLED\"");
        assert_eq!(EnrollmentStatus::default(), EnrollmentStatus::Active);
    }

    #[test]
    fn request_requires_both_references() {
        let req = EnrollmentRequest {
            student_id: Some(Uuid::new_v4()),
            course_id: None,
        };
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("course_id"));
    }
}
