//! Data models for the progress engine

pub mod attempt;
pub mod course;
pub mod record;
pub mod student;

pub use attempt::{Attempt, AttemptCorrection, Grade, Semester, MAX_MARKS};
pub use course::Course;
pub use record::{AttemptKind, CourseRecord, MAX_RETAKES_PER_COURSE};
pub use student::Student;
