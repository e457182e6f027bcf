pub mod auth;
pub mod extract;
pub mod tracing;

pub use self::extract::{AppJson, AppPath};
pub use self::tracing::observability_middleware;
