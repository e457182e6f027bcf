use std::sync::Arc;

use sqlx::PgPool;

use crate::config;
use crate::db::repositories::{
    CourseDirectory, PgCourseRepository, PgEnrollmentRepository, PgGradeRepository,
    PgStudentRepository, StudentDirectory,
};
use crate::services::{EnrollmentManager, GradingManager};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub env: config::Config,
    pub students: Arc<dyn StudentDirectory>,
    pub courses: Arc<dyn CourseDirectory>,
    pub enrollments: Arc<EnrollmentManager>,
    pub grades: Arc<GradingManager>,
}

impl AppState {
    /// Wires every collaborator to the same Postgres pool.
    pub fn new(db: PgPool, env: config::Config) -> Self {
        Self {
            students: Arc::new(PgStudentRepository::new(db.clone())),
            courses: Arc::new(PgCourseRepository::new(db.clone())),
            enrollments: Arc::new(EnrollmentManager::new(Arc::new(
                PgEnrollmentRepository::new(db.clone()),
            ))),
            grades: Arc::new(GradingManager::new(Arc::new(PgGradeRepository::new(
                db.clone(),
            )))),
            db,
            env,
        }
    }
}
