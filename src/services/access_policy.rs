//! Role-scoped authorization over enrollments and grades.
//!
//! The caller is always passed in explicitly: handlers build a [`Principal`] from the
//! request, resolve it into a [`Caller`] once, then ask [`AccessPolicy::authorize`]
//! about each action they are about to perform.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use tracing::{debug, instrument, warn};

use crate::db::models::Student;
use crate::db::repositories::StudentDirectory;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    /// Trainer.
    Formateur,
    /// Student.
    Etudiant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Formateur => "FORMATEUR",
            Role::Etudiant => "ETUDIANT",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    /// Accepts `ADMIN`, `role_admin`, `Role_Formateur`, ...
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        let name = upper.strip_prefix("ROLE_").unwrap_or(&upper);
        match name {
            "ADMIN" => Ok(Role::Admin),
            "FORMATEUR" => Ok(Role::Formateur),
            "ETUDIANT" => Ok(Role::Etudiant),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// The authenticated caller as the upstream authentication layer described it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    /// Login name; for students this is normally their email.
    pub name: String,
    pub role: Role,
}

impl Principal {
    /// Builds a principal from raw claims. Only the first entry of a comma-separated
    /// role claim is considered.
    pub fn from_claims(name: &str, role_claim: &str) -> AppResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Authentication("empty principal name".to_string()));
        }

        let first = role_claim.split(',').next().unwrap_or_default();
        let role = first.parse::<Role>().map_err(AppError::Authentication)?;

        Ok(Self {
            name: name.to_string(),
            role,
        })
    }
}

/// A principal together with its student record, when it has one.
#[derive(Debug, Clone)]
pub struct Caller {
    principal: Principal,
    student: Option<Student>,
}

impl Caller {
    pub fn new(principal: Principal, student: Option<Student>) -> Self {
        Self { principal, student }
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    pub fn role(&self) -> Role {
        self.principal.role
    }

    pub fn student(&self) -> Option<&Student> {
        self.student.as_ref()
    }

    pub fn student_id(&self) -> Option<Uuid> {
        self.student.as_ref().map(|s| s.id)
    }

    /// The caller's own student record, for endpoints that only make sense for students.
    pub fn require_student(&self) -> AppResult<&Student> {
        self.student.as_ref().ok_or_else(|| {
            AppError::NotFound(format!("no student record for {}", self.principal.name))
        })
    }
}

/// Everything a handler may ask permission for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ListAllEnrollments,
    ListActiveEnrollments,
    /// Create, cancel or delete an enrollment.
    ManageEnrollments,
    ReadStudentEnrollments(Uuid),
    ReadCourseEnrollments,
    ListAllGrades,
    /// Create or update a grade.
    WriteGrades,
    DeleteGrades,
    ReadStudentGrades(Uuid),
    ReadCourseGrades,
    /// The `/api/me` views of a student's own records.
    ReadOwnRecords,
    ReadProfile,
}

pub struct AccessPolicy;

impl AccessPolicy {
    /// Attaches the caller's student record. Only students are looked up: first by
    /// email, then by matriculation number, both against the principal name.
    #[instrument(level = "debug", skip_all, fields(principal = %principal.name, role = %principal.role))]
    pub async fn resolve_caller(
        principal: Principal,
        students: &dyn StudentDirectory,
    ) -> AppResult<Caller> {
        let student = match principal.role {
            Role::Admin | Role::Formateur => None,
            Role::Etudiant => match students.find_by_email(&principal.name).await? {
                Some(student) => Some(student),
                None => {
                    debug!("No student with this email, trying matriculation");
                    students.find_by_matriculation(&principal.name).await?
                }
            },
        };

        if principal.role == Role::Etudiant && student.is_none() {
            warn!("Student principal has no directory record");
        }

        Ok(Caller::new(principal, student))
    }

    /// Permits or rejects `action` for `caller` with [`AppError::Authorization`].
    pub fn authorize(caller: &Caller, action: Action) -> AppResult<()> {
        if Self::permits(caller, action) {
            Ok(())
        } else {
            warn!(
                principal = %caller.principal.name,
                role = %caller.role(),
                ?action,
                "Access denied"
            );
            Err(AppError::Authorization(format!(
                "{} may not perform {:?}",
                caller.role(),
                action
            )))
        }
    }

    pub fn permits(caller: &Caller, action: Action) -> bool {
        match caller.role() {
            Role::Admin => match action {
                Action::ReadOwnRecords => false,
                Action::ListAllEnrollments
                | Action::ListActiveEnrollments
                | Action::ManageEnrollments
                | Action::ReadStudentEnrollments(_)
                | Action::ReadCourseEnrollments
                | Action::ListAllGrades
                | Action::WriteGrades
                | Action::DeleteGrades
                | Action::ReadStudentGrades(_)
                | Action::ReadCourseGrades
                | Action::ReadProfile => true,
            },
            // Trainers are not checked against the courses they teach.
            Role::Formateur => match action {
                Action::WriteGrades
                | Action::ReadStudentEnrollments(_)
                | Action::ReadStudentGrades(_)
                | Action::ReadCourseEnrollments
                | Action::ReadCourseGrades
                | Action::ReadProfile => true,
                Action::ListAllEnrollments
                | Action::ListActiveEnrollments
                | Action::ManageEnrollments
                | Action::ListAllGrades
                | Action::DeleteGrades
                | Action::ReadOwnRecords => false,
            },
            Role::Etudiant => match action {
                Action::ReadStudentEnrollments(student_id)
                | Action::ReadStudentGrades(student_id) => caller.student_id() == Some(student_id),
                Action::ReadOwnRecords | Action::ReadProfile => true,
                Action::ListAllEnrollments
                | Action::ListActiveEnrollments
                | Action::ManageEnrollments
                | Action::ReadCourseEnrollments
                | Action::ListAllGrades
                | Action::WriteGrades
                | Action::DeleteGrades
                | Action::ReadCourseGrades => false,
            },
        }
    }
}
