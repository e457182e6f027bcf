use std::sync::Arc;

use sqlx::types::Uuid;
use time::OffsetDateTime;
use tracing::{debug, info, instrument};

use crate::db::models::{Course, Grade, GradeUpdate, NewGrade, Student};
use crate::db::repositories::GradeStore;
use crate::db::DatabaseError;
use crate::error::{AppError, AppResult};

/// Owns the single grade per (student, course) pair and the averages derived from it.
///
/// Grades are not tied to an enrollment: a pair can be graded whatever its enrollment
/// status, or without an enrollment at all.
pub struct GradingManager {
    store: Arc<dyn GradeStore>,
}

impl GradingManager {
    pub fn new(store: Arc<dyn GradeStore>) -> Self {
        Self { store }
    }

    pub async fn list_all(&self) -> AppResult<Vec<Grade>> {
        Ok(self.store.find_all().await?)
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Grade> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("grade {id}")))
    }

    /// Records a grade dated now. Uniqueness is left to the store.
    #[instrument(skip_all, fields(student_id = %student.id, course_id = %course.id, value = value))]
    pub async fn create(
        &self,
        student: &Student,
        course: &Course,
        value: f64,
        remarks: Option<String>,
    ) -> AppResult<Grade> {
        let new_grade = NewGrade {
            student_id: student.id,
            course_id: course.id,
            value,
            remarks,
            graded_at: OffsetDateTime::now_utc(),
        };

        match self.store.insert(&new_grade).await {
            Ok(grade) => {
                info!(grade_id = %grade.id, "Grade recorded");
                Ok(grade)
            }
            Err(DatabaseError::Duplicate) => {
                info!("Grade already recorded for this pair");
                Err(AppError::Conflict(format!(
                    "student {} already has a grade for course {}",
                    student.matriculation, course.code
                )))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Overwrites every mutable field of an existing grade.
    #[instrument(skip_all, fields(grade_id = %update.id))]
    pub async fn update(&self, update: GradeUpdate) -> AppResult<Grade> {
        match self.store.update(&update).await {
            Ok(Some(grade)) => {
                info!("Grade updated");
                Ok(grade)
            }
            Ok(None) => Err(AppError::NotFound(format!("grade {}", update.id))),
            Err(DatabaseError::Duplicate) => Err(AppError::Conflict(format!(
                "student {} already has a grade for course {}",
                update.student_id, update.course_id
            ))),
            Err(err) => Err(err.into()),
        }
    }

    /// Hard delete without an existence check.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let removed = self.store.delete(id).await?;
        debug!(removed, "Grade delete");
        Ok(())
    }

    pub async fn list_by_student(&self, student: &Student) -> AppResult<Vec<Grade>> {
        Ok(self.store.find_by_student(student.id).await?)
    }

    pub async fn list_by_course(&self, course: &Course) -> AppResult<Vec<Grade>> {
        Ok(self.store.find_by_course(course.id).await?)
    }

    pub async fn average_for_student(&self, student: &Student) -> AppResult<f64> {
        let grades = self.store.find_by_student(student.id).await?;
        Ok(mean(&grades))
    }

    pub async fn average_for_course(&self, course: &Course) -> AppResult<f64> {
        let grades = self.store.find_by_course(course.id).await?;
        Ok(mean(&grades))
    }
}

/// Arithmetic mean of the grade values, `0.0` for no grades.
pub fn mean(grades: &[Grade]) -> f64 {
    if grades.is_empty() {
        return 0.0;
    }
    grades.iter().map(|g| g.value).sum::<f64>() / grades.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryStore;
    use crate::db::repositories::MockGradeStore;

    fn setup() -> (Arc<MemoryStore>, GradingManager) {
        let store = Arc::new(MemoryStore::new());
        let manager = GradingManager::new(store.clone());
        (store, manager)
    }

    #[tokio::test]
    async fn average_without_grades_is_zero() {
        let (store, manager) = setup();
        let student = store.add_student("E001", "a@center.test");
        let course = store.add_course("RUST-101");

        assert_eq!(manager.average_for_student(&student).await.unwrap(), 0.0);
        assert_eq!(manager.average_for_course(&course).await.unwrap(), 0.0);
    }

    #[tokio::test]
    async fn student_average_spans_all_courses() {
        let (store, manager) = setup();
        let student = store.add_student("E001", "a@center.test");
        for (code, value) in [("RUST-101", 12.0), ("SQL-201", 16.0), ("NET-301", 8.0)] {
            let course = store.add_course(code);
            manager.create(&student, &course, value, None).await.unwrap();
        }

        assert_eq!(manager.average_for_student(&student).await.unwrap(), 12.0);
    }

    #[tokio::test]
    async fn course_average_spans_all_students() {
        let (store, manager) = setup();
        let course = store.add_course("RUST-101");
        let alice = store.add_student("E001", "alice@center.test");
        let bob = store.add_student("E002", "bob@center.test");
        manager.create(&alice, &course, 10.0, None).await.unwrap();
        manager.create(&bob, &course, 15.0, None).await.unwrap();

        assert_eq!(manager.average_for_course(&course).await.unwrap(), 12.5);
    }

    #[tokio::test]
    async fn duplicate_grade_conflicts_and_keeps_original() {
        let (store, manager) = setup();
        let student = store.add_student("E001", "a@center.test");
        let course = store.add_course("RUST-101");
        let original = manager
            .create(&student, &course, 14.0, Some("solid".to_string()))
            .await
            .unwrap();

        let second = manager.create(&student, &course, 6.0, None).await;
        assert!(matches!(second, Err(AppError::Conflict(_))));

        let kept = manager.get(original.id).await.unwrap();
        assert_eq!(kept, original);
        assert_eq!(store.grade_count(), 1);
    }

    #[tokio::test]
    async fn values_are_not_range_checked() {
        let (store, manager) = setup();
        let student = store.add_student("E001", "a@center.test");
        let course = store.add_course("RUST-101");

        let grade = manager.create(&student, &course, 250.0, None).await.unwrap();
        assert_eq!(grade.value, 250.0);
    }

    #[tokio::test]
    async fn updating_unknown_grade_is_not_found() {
        let (store, manager) = setup();
        let student = store.add_student("E001", "a@center.test");
        let course = store.add_course("RUST-101");

        let result = manager
            .update(GradeUpdate {
                id: Uuid::new_v4(),
                student_id: student.id,
                course_id: course.id,
                value: 10.0,
                remarks: None,
            })
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn update_overwrites_value_and_remarks() {
        let (store, manager) = setup();
        let student = store.add_student("E001", "a@center.test");
        let course = store.add_course("RUST-101");
        let grade = manager
            .create(&student, &course, 9.0, Some("retake".to_string()))
            .await
            .unwrap();

        let updated = manager
            .update(GradeUpdate {
                id: grade.id,
                student_id: student.id,
                course_id: course.id,
                value: 13.5,
                remarks: None,
            })
            .await
            .unwrap();

        assert_eq!(updated.value, 13.5);
        assert_eq!(updated.remarks, None);
        assert_eq!(updated.graded_at, grade.graded_at);
    }

    #[tokio::test]
    async fn moving_a_grade_onto_a_graded_pair_conflicts() {
        let (store, manager) = setup();
        let student = store.add_student("E001", "a@center.test");
        let rust = store.add_course("RUST-101");
        let sql = store.add_course("SQL-201");
        manager.create(&student, &rust, 11.0, None).await.unwrap();
        let sql_grade = manager.create(&student, &sql, 12.0, None).await.unwrap();

        let result = manager
            .update(GradeUpdate {
                id: sql_grade.id,
                student_id: student.id,
                course_id: rust.id,
                value: 12.0,
                remarks: None,
            })
            .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn delete_does_not_look_up_first() {
        let mut mock = MockGradeStore::new();
        mock.expect_find_by_id().never();
        mock.expect_delete().times(1).returning(|_| Ok(0));

        let manager = GradingManager::new(Arc::new(mock));
        assert!(manager.delete(Uuid::new_v4()).await.is_ok());
    }

    #[tokio::test]
    async fn grading_does_not_require_enrollment() {
        let (store, manager) = setup();
        let student = store.add_student("E001", "a@center.test");
        let course = store.add_course("RUST-101");

        assert!(manager.create(&student, &course, 10.0, None).await.is_ok());
        assert_eq!(store.enrollment_count(), 0);
    }
}
