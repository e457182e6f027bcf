//! Persistence seams. Managers and the access policy only see these traits; the
//! `Pg*` types are the production implementations.

mod course_repository;
mod enrollment_repository;
mod grade_repository;
mod student_repository;

use async_trait::async_trait;
use sqlx::types::Uuid;

use crate::db::models::{
    Course, Enrollment, EnrollmentStatus, Grade, GradeUpdate, NewEnrollment, NewGrade, Student,
};
use crate::db::DatabaseError;

pub use course_repository::PgCourseRepository;
pub use enrollment_repository::PgEnrollmentRepository;
pub use grade_repository::PgGradeRepository;
pub use student_repository::PgStudentRepository;

pub type DbResult<T> = Result<T, DatabaseError>;

/// Read-only student identity lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StudentDirectory: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<Student>>;
    async fn find_by_matriculation(&self, matriculation: &str) -> DbResult<Option<Student>>;
    async fn find_by_email(&self, email: &str) -> DbResult<Option<Student>>;
}

/// Read-only course identity lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CourseDirectory: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<Course>>;
    async fn find_by_code(&self, code: &str) -> DbResult<Option<Course>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EnrollmentStore: Send + Sync {
    async fn find_all(&self) -> DbResult<Vec<Enrollment>>;
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<Enrollment>>;
    async fn find_by_student_and_course(
        &self,
        student_id: Uuid,
        course_id: Uuid,
    ) -> DbResult<Option<Enrollment>>;
    async fn find_by_student(&self, student_id: Uuid) -> DbResult<Vec<Enrollment>>;
    async fn find_by_course(&self, course_id: Uuid) -> DbResult<Vec<Enrollment>>;
    async fn find_by_status(&self, status: EnrollmentStatus) -> DbResult<Vec<Enrollment>>;
    /// Fails with [`DatabaseError::Duplicate`] when the (student, course) pair exists.
    async fn insert(&self, enrollment: &NewEnrollment) -> DbResult<Enrollment>;
    /// Moves `id` from `from` to `to`. `None` when the row is gone or no longer in `from`.
    async fn update_status(
        &self,
        id: Uuid,
        from: EnrollmentStatus,
        to: EnrollmentStatus,
    ) -> DbResult<Option<Enrollment>>;
    /// Returns the number of rows removed.
    async fn delete(&self, id: Uuid) -> DbResult<u64>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GradeStore: Send + Sync {
    async fn find_all(&self) -> DbResult<Vec<Grade>>;
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<Grade>>;
    async fn find_by_student(&self, student_id: Uuid) -> DbResult<Vec<Grade>>;
    async fn find_by_course(&self, course_id: Uuid) -> DbResult<Vec<Grade>>;
    /// Fails with [`DatabaseError::Duplicate`] when the (student, course) pair is already graded.
    async fn insert(&self, grade: &NewGrade) -> DbResult<Grade>;
    /// `None` when no grade has `update.id`.
    async fn update(&self, update: &GradeUpdate) -> DbResult<Option<Grade>>;
    async fn delete(&self, id: Uuid) -> DbResult<u64>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryStore;

    #[tokio::test]
    async fn course_directory_finds_by_id_and_code() {
        let store = MemoryStore::new();
        let rust = store.add_course("RUST-101");
        store.add_course("SQL-201");
        let directory: &dyn CourseDirectory = &store;

        let by_code = directory.find_by_code("RUST-101").await.unwrap();
        assert_eq!(by_code.map(|c| c.id), Some(rust.id));
        let by_id = directory.find_by_id(rust.id).await.unwrap();
        assert_eq!(by_id.map(|c| c.code), Some("RUST-101".to_string()));
        assert!(directory.find_by_code("NET-301").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn student_directory_keeps_email_as_given() {
        let store = MemoryStore::new();
        let saleh = store.add_student("E001", "Saleh@Center.test");
        let directory: &dyn StudentDirectory = &store;

        let found = directory.find_by_email("SALEH@center.TEST").await.unwrap().unwrap();
        assert_eq!(found.id, saleh.id);
        assert_eq!(found.email, "Saleh@Center.test");
        assert!(directory.find_by_matriculation("e001").await.unwrap().is_none());
    }
}
