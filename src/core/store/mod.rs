//! Persistence collaborators
//!
//! The engine reaches its document store only through [`Persistence`]. Saves
//! are optimistic: a student is written only if the stored version still
//! equals the version it was loaded at, otherwise the save fails with
//! `ConcurrentModification` and nothing is written.

pub mod json;
pub mod memory;

pub use json::JsonStore;
pub use memory::MemoryStore;

use crate::core::error::EngineResult;
use crate::core::models::{Course, Student};

/// Document store holding students and the course catalog
pub trait Persistence {
    /// Load a student by id
    ///
    /// # Errors
    /// `NotFound` if no such student exists, `Storage` on I/O failure
    fn load_student(&self, id: &str) -> EngineResult<Student>;

    /// Load a catalog course by id
    ///
    /// # Errors
    /// `NotFound` if no such course exists, `Storage` on I/O failure
    fn load_course(&self, id: &str) -> EngineResult<Course>;

    /// All catalog courses in catalog order
    ///
    /// # Errors
    /// `Storage` or `InvalidCatalog` if the catalog cannot be read
    fn list_courses(&self) -> EngineResult<Vec<Course>>;

    /// Save a student if nobody else saved it since it was loaded
    ///
    /// Returns the new version.
    ///
    /// # Errors
    /// `ConcurrentModification` if the stored version differs from
    /// `student.version`, `NotFound` if the student was never created
    fn save_student(&self, student: &Student) -> EngineResult<u64>;

    /// Enrol a new student
    ///
    /// # Errors
    /// `AlreadyExists` if the id is taken
    fn create_student(&self, student: Student) -> EngineResult<Student>;

    /// All students, ordered by id
    ///
    /// # Errors
    /// `Storage` on I/O failure
    fn list_students(&self) -> EngineResult<Vec<Student>>;
}
