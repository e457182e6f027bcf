mod course;
mod enrollment;
mod grade;
mod student;

pub use course::*;
pub use enrollment::*;
pub use grade::*;
pub use student::*;
