//! Caller-facing operations over a [`Persistence`] store
//!
//! Each mutation loads one student and the catalog, applies a validator
//! transition (which recomputes GPA), and saves the student with a version
//! check. A lost race surfaces as `ConcurrentModification`; the service never
//! retries on its own.

use crate::core::catalog::Catalog;
use crate::core::engine::{self, Gpa, ProgressSummary};
use crate::core::error::EngineResult;
use crate::core::models::{Attempt, AttemptCorrection, Course, CourseRecord, Student};
use crate::core::store::Persistence;

/// Progress engine bound to a store
#[derive(Debug)]
pub struct ProgressService<P> {
    store: P,
}

impl<P: Persistence> ProgressService<P> {
    /// Create a service over a store
    #[must_use]
    pub const fn new(store: P) -> Self {
        Self { store }
    }

    /// The underlying store
    #[must_use]
    pub const fn store(&self) -> &P {
        &self.store
    }

    /// Load and validate the catalog
    ///
    /// # Errors
    /// Propagates store and catalog validation errors
    pub fn catalog(&self) -> EngineResult<Catalog> {
        Catalog::new(self.store.list_courses()?)
    }

    /// Run one read-modify-write against a student
    ///
    /// `action` is logged once the save has gone through.
    fn mutate<T>(
        &self,
        student_id: &str,
        action: &str,
        op: impl FnOnce(&mut Student, &Catalog) -> EngineResult<T>,
    ) -> EngineResult<T> {
        let catalog = self.catalog()?;
        let mut student = self.store.load_student(student_id)?;
        let out = op(&mut student, &catalog)?;
        let version = self.store.save_student(&student)?;
        crate::info!(
            target: "service",
            "{action} for student '{student_id}' (version {version}, GPA {:.2})",
            student.gpa
        );
        Ok(out)
    }

    /// Enrol a new student
    ///
    /// # Errors
    /// `AlreadyExists` if the id is taken
    pub fn enroll_student(&self, student: Student) -> EngineResult<Student> {
        self.store.create_student(student)
    }

    /// Load a student
    ///
    /// # Errors
    /// `NotFound` if the student does not exist
    pub fn get_student(&self, student_id: &str) -> EngineResult<Student> {
        self.store.load_student(student_id)
    }

    /// All enrolled students, ordered by id
    ///
    /// # Errors
    /// `Storage` on I/O failure
    pub fn list_students(&self) -> EngineResult<Vec<Student>> {
        self.store.list_students()
    }

    /// Record the original attempt at a course
    ///
    /// # Errors
    /// `NotFound`, `DuplicateAssignment`, `InvalidAttemptData`,
    /// `PrerequisiteNotMet` or `ConcurrentModification`
    pub fn assign_original_course(
        &self,
        student_id: &str,
        course_id: &str,
        attempt: Attempt,
    ) -> EngineResult<CourseRecord> {
        let action = format!("Assigned '{course_id}'");
        self.mutate(student_id, &action, |student, catalog| {
            engine::assign_original(student, catalog, course_id, attempt)
        })
    }

    /// Append a retake attempt
    ///
    /// # Errors
    /// `NotFound`, `InvalidAttemptData`, `NoOriginalRecord`,
    /// `RetakeLimitExceeded` or `ConcurrentModification`
    pub fn append_retake(
        &self,
        student_id: &str,
        course_id: &str,
        attempt: Attempt,
    ) -> EngineResult<CourseRecord> {
        let action = format!("Recorded retake of '{course_id}'");
        self.mutate(student_id, &action, |student, catalog| {
            engine::append_retake(student, catalog, course_id, attempt)
        })
    }

    /// Correct fields of the original attempt
    ///
    /// # Errors
    /// `NotFound`, `NoOriginalRecord`, `InvalidAttemptData` or
    /// `ConcurrentModification`
    pub fn correct_original(
        &self,
        student_id: &str,
        course_id: &str,
        correction: &AttemptCorrection,
    ) -> EngineResult<CourseRecord> {
        let action = format!("Corrected original attempt of '{course_id}'");
        self.mutate(student_id, &action, |student, catalog| {
            engine::correct_original(student, catalog, course_id, correction)
        })
    }

    /// Delete a course record and all its attempts
    ///
    /// # Errors
    /// `NotFound` or `ConcurrentModification`
    pub fn delete_course_record(&self, student_id: &str, course_id: &str) -> EngineResult<()> {
        let action = format!("Deleted record '{course_id}'");
        self.mutate(student_id, &action, |student, catalog| {
            engine::delete_record(student, catalog, course_id).map(|_| ())
        })
    }

    /// Current GPA, derived from the student's records
    ///
    /// # Errors
    /// `NotFound` if the student does not exist
    pub fn get_gpa(&self, student_id: &str) -> EngineResult<Gpa> {
        let catalog = self.catalog()?;
        let student = self.store.load_student(student_id)?;
        Ok(engine::compute_gpa(&student.records, &catalog))
    }

    /// Courses the student may still work towards, in catalog order
    ///
    /// # Errors
    /// `NotFound` if the student does not exist
    pub fn get_remaining_courses(&self, student_id: &str) -> EngineResult<Vec<Course>> {
        let catalog = self.catalog()?;
        let student = self.store.load_student(student_id)?;
        Ok(engine::remaining_courses(&student, &catalog)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Whether the student's total retakes are below the continuation cap
    ///
    /// # Errors
    /// `NotFound` if the student does not exist
    pub fn get_continuation_eligibility(&self, student_id: &str) -> EngineResult<bool> {
        let student = self.store.load_student(student_id)?;
        Ok(engine::continuation_eligible(&student))
    }

    /// Full derived progress view for profile, progress and transcript readers
    ///
    /// # Errors
    /// `NotFound` if the student does not exist
    pub fn get_progress(&self, student_id: &str) -> EngineResult<ProgressSummary> {
        let catalog = self.catalog()?;
        let student = self.store.load_student(student_id)?;
        Ok(ProgressSummary::build(&student, &catalog))
    }
}
