//! In-process store used by unit and router tests. Enforces the same
//! (student, course) uniqueness the database schema does.

use std::sync::Mutex;

use async_trait::async_trait;
use sqlx::types::Uuid;
use time::OffsetDateTime;

use crate::db::models::{
    Course, Enrollment, EnrollmentStatus, Grade, GradeUpdate, NewEnrollment, NewGrade, Student,
};
use crate::db::repositories::{CourseDirectory, DbResult, EnrollmentStore, GradeStore, StudentDirectory};
use crate::db::DatabaseError;

#[derive(Default)]
pub struct MemoryStore {
    students: Mutex<Vec<Student>>,
    courses: Mutex<Vec<Course>>,
    enrollments: Mutex<Vec<Enrollment>>,
    grades: Mutex<Vec<Grade>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_student(&self, matriculation: &str, email: &str) -> Student {
        let now = OffsetDateTime::now_utc();
        let student = Student {
            id: Uuid::new_v4(),
            matriculation: matriculation.to_string(),
            first_name: "Test".to_string(),
            last_name: matriculation.to_string(),
            email: email.to_string(),
            enrolled_on: now,
            active: true,
            created_at: now,
            updated_at: now,
        };
        self.students.lock().unwrap().push(student.clone());
        student
    }

    pub fn add_course(&self, code: &str) -> Course {
        let now = OffsetDateTime::now_utc();
        let course = Course {
            id: Uuid::new_v4(),
            code: code.to_string(),
            title: format!("Course {code}"),
            description: None,
            credits: 3,
            hours: 30,
            trainer_id: Uuid::new_v4(),
            active: true,
            created_at: now,
            updated_at: now,
        };
        self.courses.lock().unwrap().push(course.clone());
        course
    }

    /// Forces a status the service itself never produces, e.g. `Completed`.
    pub fn set_status(&self, id: Uuid, status: EnrollmentStatus) {
        let mut enrollments = self.enrollments.lock().unwrap();
        if let Some(enrollment) = enrollments.iter_mut().find(|e| e.id == id) {
            enrollment.status = status;
        }
    }

    pub fn enrollment_count(&self) -> usize {
        self.enrollments.lock().unwrap().len()
    }

    pub fn grade_count(&self) -> usize {
        self.grades.lock().unwrap().len()
    }
}

#[async_trait]
impl StudentDirectory for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<Student>> {
        Ok(self.students.lock().unwrap().iter().find(|s| s.id == id).cloned())
    }

    async fn find_by_matriculation(&self, matriculation: &str) -> DbResult<Option<Student>> {
        Ok(self
            .students
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.matriculation == matriculation)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> DbResult<Option<Student>> {
        Ok(self
            .students
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.email.to_lowercase() == email.to_lowercase())
            .cloned())
    }
}

#[async_trait]
impl CourseDirectory for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<Course>> {
        Ok(self.courses.lock().unwrap().iter().find(|c| c.id == id).cloned())
    }

    async fn find_by_code(&self, code: &str) -> DbResult<Option<Course>> {
        Ok(self.courses.lock().unwrap().iter().find(|c| c.code == code).cloned())
    }
}

#[async_trait]
impl EnrollmentStore for MemoryStore {
    async fn find_all(&self) -> DbResult<Vec<Enrollment>> {
        Ok(self.enrollments.lock().unwrap().clone())
    }

    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<Enrollment>> {
        Ok(self.enrollments.lock().unwrap().iter().find(|e| e.id == id).cloned())
    }

    async fn find_by_student_and_course(
        &self,
        student_id: Uuid,
        course_id: Uuid,
    ) -> DbResult<Option<Enrollment>> {
        Ok(self
            .enrollments
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.student_id == student_id && e.course_id == course_id)
            .cloned())
    }

    async fn find_by_student(&self, student_id: Uuid) -> DbResult<Vec<Enrollment>> {
        Ok(self
            .enrollments
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.student_id == student_id)
            .cloned()
            .collect())
    }

    async fn find_by_course(&self, course_id: Uuid) -> DbResult<Vec<Enrollment>> {
        Ok(self
            .enrollments
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.course_id == course_id)
            .cloned()
            .collect())
    }

    async fn find_by_status(&self, status: EnrollmentStatus) -> DbResult<Vec<Enrollment>> {
        Ok(self
            .enrollments
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.status == status)
            .cloned()
            .collect())
    }

    async fn insert(&self, new: &NewEnrollment) -> DbResult<Enrollment> {
        let mut enrollments = self.enrollments.lock().unwrap();
        if enrollments
            .iter()
            .any(|e| e.student_id == new.student_id && e.course_id == new.course_id)
        {
            return Err(DatabaseError::Duplicate);
        }
        let now = OffsetDateTime::now_utc();
        let enrollment = Enrollment {
            id: Uuid::new_v4(),
            student_id: new.student_id,
            course_id: new.course_id,
            enrolled_at: new.enrolled_at,
            status: new.status,
            created_at: now,
            updated_at: now,
        };
        enrollments.push(enrollment.clone());
        Ok(enrollment)
    }

    async fn update_status(
        &self,
        id: Uuid,
        from: EnrollmentStatus,
        to: EnrollmentStatus,
    ) -> DbResult<Option<Enrollment>> {
        let mut enrollments = self.enrollments.lock().unwrap();
        Ok(enrollments.iter_mut().find(|e| e.id == id && e.status == from).map(|e| {
            e.status = to;
            e.updated_at = OffsetDateTime::now_utc();
            e.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> DbResult<u64> {
        let mut enrollments = self.enrollments.lock().unwrap();
        let before = enrollments.len();
        enrollments.retain(|e| e.id != id);
        Ok((before - enrollments.len()) as u64)
    }
}

#[async_trait]
impl GradeStore for MemoryStore {
    async fn find_all(&self) -> DbResult<Vec<Grade>> {
        Ok(self.grades.lock().unwrap().clone())
    }

    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<Grade>> {
        Ok(self.grades.lock().unwrap().iter().find(|g| g.id == id).cloned())
    }

    async fn find_by_student(&self, student_id: Uuid) -> DbResult<Vec<Grade>> {
        Ok(self
            .grades
            .lock()
            .unwrap()
            .iter()
            .filter(|g| g.student_id == student_id)
            .cloned()
            .collect())
    }

    async fn find_by_course(&self, course_id: Uuid) -> DbResult<Vec<Grade>> {
        Ok(self
            .grades
            .lock()
            .unwrap()
            .iter()
            .filter(|g| g.course_id == course_id)
            .cloned()
            .collect())
    }

    async fn insert(&self, new: &NewGrade) -> DbResult<Grade> {
        let mut grades = self.grades.lock().unwrap();
        if grades
            .iter()
            .any(|g| g.student_id == new.student_id && g.course_id == new.course_id)
        {
            return Err(DatabaseError::Duplicate);
        }
        let now = OffsetDateTime::now_utc();
        let grade = Grade {
            id: Uuid::new_v4(),
            student_id: new.student_id,
            course_id: new.course_id,
            value: new.value,
            remarks: new.remarks.clone(),
            graded_at: new.graded_at,
            created_at: now,
            updated_at: now,
        };
        grades.push(grade.clone());
        Ok(grade)
    }

    async fn update(&self, update: &GradeUpdate) -> DbResult<Option<Grade>> {
        let mut grades = self.grades.lock().unwrap();
        if !grades.iter().any(|g| g.id == update.id) {
            return Ok(None);
        }
        if grades.iter().any(|g| {
            g.id != update.id && g.student_id == update.student_id && g.course_id == update.course_id
        }) {
            return Err(DatabaseError::Duplicate);
        }
        Ok(grades.iter_mut().find(|g| g.id == update.id).map(|g| {
            g.student_id = update.student_id;
            g.course_id = update.course_id;
            g.value = update.value;
            g.remarks = update.remarks.clone();
            g.updated_at = OffsetDateTime::now_utc();
            g.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> DbResult<u64> {
        let mut grades = self.grades.lock().unwrap();
        let before = grades.len();
        grades.retain(|g| g.id != id);
        Ok((before - grades.len()) as u64)
    }
}
