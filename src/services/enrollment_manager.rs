use std::sync::Arc;

use sqlx::types::Uuid;
use time::OffsetDateTime;
use tracing::{debug, info, instrument, warn};

use crate::db::models::{Course, Enrollment, EnrollmentStatus, NewEnrollment, Student};
use crate::db::repositories::EnrollmentStore;
use crate::db::DatabaseError;
use crate::error::{AppError, AppResult};

/// Owns the student/course enrollment relationship and its status lifecycle.
pub struct EnrollmentManager {
    store: Arc<dyn EnrollmentStore>,
}

impl EnrollmentManager {
    pub fn new(store: Arc<dyn EnrollmentStore>) -> Self {
        Self { store }
    }

    pub async fn list_all(&self) -> AppResult<Vec<Enrollment>> {
        Ok(self.store.find_all().await?)
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Enrollment> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Enrolls `student` in `course` as `ACTIVE`, dated now.
    ///
    /// The lookup before the insert is only a fast path; the unique constraint on
    /// (student, course) decides concurrent attempts, and both outcomes are reported
    /// as [`AppError::Conflict`].
    #[instrument(skip_all, fields(student_id = %student.id, course_id = %course.id))]
    pub async fn create(&self, student: &Student, course: &Course) -> AppResult<Enrollment> {
        if let Some(existing) = self
            .store
            .find_by_student_and_course(student.id, course.id)
            .await?
        {
            info!(enrollment_id = %existing.id, "Enrollment already exists");
            return Err(duplicate(student, course));
        }

        let new_enrollment = NewEnrollment {
            student_id: student.id,
            course_id: course.id,
            enrolled_at: OffsetDateTime::now_utc(),
            status: EnrollmentStatus::Active,
        };

        match self.store.insert(&new_enrollment).await {
            Ok(enrollment) => {
                info!(enrollment_id = %enrollment.id, "Enrollment created");
                Ok(enrollment)
            }
            Err(DatabaseError::Duplicate) => {
                warn!("Concurrent enrollment won the race on the unique constraint");
                Err(duplicate(student, course))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Moves an enrollment to `CANCELLED`. Cancelling a cancelled enrollment is a no-op;
    /// a completed one cannot be cancelled.
    ///
    /// The store only applies the change if the status is still the one read here, so a
    /// concurrent completion is never overwritten.
    #[instrument(skip(self))]
    pub async fn cancel(&self, id: Uuid) -> AppResult<Enrollment> {
        let enrollment = self.get(id).await?;
        let from = enrollment.status;
        if let Some(settled) = settled_cancel(enrollment)? {
            return Ok(settled);
        }

        match self
            .store
            .update_status(id, from, EnrollmentStatus::Cancelled)
            .await?
        {
            Some(cancelled) => {
                info!("Enrollment cancelled");
                Ok(cancelled)
            }
            None => {
                warn!("Enrollment status changed while cancelling");
                let current = self.get(id).await?;
                let status = current.status;
                settled_cancel(current)?.ok_or_else(|| cannot_cancel(id, status))
            }
        }
    }

    /// Hard delete. Unknown ids are ignored.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        match self.store.delete(id).await? {
            0 => debug!("No enrollment to delete"),
            _ => info!("Enrollment deleted"),
        }
        Ok(())
    }

    pub async fn list_by_student(&self, student: &Student) -> AppResult<Vec<Enrollment>> {
        Ok(self.store.find_by_student(student.id).await?)
    }

    pub async fn list_by_course(&self, course: &Course) -> AppResult<Vec<Enrollment>> {
        Ok(self.store.find_by_course(course.id).await?)
    }

    pub async fn list_active(&self) -> AppResult<Vec<Enrollment>> {
        Ok(self.store.find_by_status(EnrollmentStatus::Active).await?)
    }
}

/// Resolves a cancel request without touching the store: `Some` when the enrollment is
/// already cancelled, `None` when it still has to move.
fn settled_cancel(enrollment: Enrollment) -> AppResult<Option<Enrollment>> {
    match enrollment.status {
        EnrollmentStatus::Cancelled => {
            debug!("Enrollment already cancelled");
            Ok(Some(enrollment))
        }
        status if status.can_transition_to(EnrollmentStatus::Cancelled) => Ok(None),
        status => Err(cannot_cancel(enrollment.id, status)),
    }
}

fn cannot_cancel(id: Uuid, status: EnrollmentStatus) -> AppError {
    AppError::Conflict(format!(
        "enrollment {id} is {status:?} and cannot be cancelled"
    ))
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("enrollment {id}"))
}

fn duplicate(student: &Student, course: &Course) -> AppError {
    AppError::Conflict(format!(
        "student {} is already enrolled in course {}",
        student.matriculation, course.code
    ))
}
