pub mod access_policy;
pub mod enrollment_manager;
pub mod grading_manager;

pub use access_policy::{AccessPolicy, Action, Caller, Principal, Role};
pub use enrollment_manager::EnrollmentManager;
pub use grading_manager::GradingManager;
