//! Assignment validation: the per-course record state machine
//!
//! Each (student, course) pair moves through `Unassigned -> Assigned ->
//! RetakeExhausted`. Every accepted transition mutates the student's records
//! and recomputes the cached GPA before returning, so the caller can persist
//! the student as-is. A rejected transition leaves the student untouched.

use super::gpa::refresh_gpa;
use super::resolver::first_unmet_prerequisite;
use crate::core::catalog::Catalog;
use crate::core::error::{EngineError, EngineResult, Entity};
use crate::core::models::{
    Attempt, AttemptCorrection, CourseRecord, Student, MAX_RETAKES_PER_COURSE,
};
use serde::Serialize;
use std::fmt;

/// Assignment state of one course for one student
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecordState {
    /// No record exists
    Unassigned,
    /// A record exists and may take further retakes
    Assigned,
    /// A record exists and its retake allowance is used up
    RetakeExhausted,
}

impl fmt::Display for RecordState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unassigned => write!(f, "unassigned"),
            Self::Assigned => write!(f, "assigned"),
            Self::RetakeExhausted => write!(f, "retake-exhausted"),
        }
    }
}

/// Current state of a course for a student
#[must_use]
pub fn record_state(student: &Student, course_id: &str) -> RecordState {
    match student.record(course_id) {
        None => RecordState::Unassigned,
        Some(record) if record.retakes_exhausted() => RecordState::RetakeExhausted,
        Some(_) => RecordState::Assigned,
    }
}

/// Record an original attempt, creating the course record
///
/// # Errors
/// - `NotFound` if the course is not in the catalog
/// - `DuplicateAssignment` if the student already holds a record for it
/// - `InvalidAttemptData` if marks are out of range
/// - `PrerequisiteNotMet` naming the first unpassed prerequisite in catalog order
pub fn assign_original(
    student: &mut Student,
    catalog: &Catalog,
    course_id: &str,
    attempt: Attempt,
) -> EngineResult<CourseRecord> {
    let course = catalog.get_course(course_id)?;

    if student.has_record(course_id) {
        return Err(reject(EngineError::DuplicateAssignment {
            student_id: student.id.clone(),
            course_id: course_id.to_string(),
        }));
    }

    attempt.validate().map_err(reject)?;

    if let Some(missing) = first_unmet_prerequisite(student, catalog, course_id) {
        return Err(reject(EngineError::PrerequisiteNotMet {
            course_id: course_id.to_string(),
            missing_prerequisite: missing.code.clone(),
        }));
    }

    let record = CourseRecord::new(course.code.clone(), attempt);
    student.records.push(record.clone());
    refresh_gpa(student, catalog);

    crate::debug!(
        target: "validator",
        "Accepted original attempt at '{course_id}' for student '{}' ({} {})",
        student.id,
        record.original.marks,
        record.original.grade
    );
    Ok(record)
}

/// Append a retake attempt to an existing record
///
/// # Errors
/// - `NotFound` if the course is not in the catalog
/// - `InvalidAttemptData` if marks are out of range
/// - `NoOriginalRecord` if the student has no record for the course
/// - `RetakeLimitExceeded` if the record already holds two retakes
pub fn append_retake(
    student: &mut Student,
    catalog: &Catalog,
    course_id: &str,
    attempt: Attempt,
) -> EngineResult<CourseRecord> {
    catalog.get_course(course_id)?;
    attempt.validate().map_err(reject)?;

    let record = student.record_mut(course_id).ok_or_else(|| {
        reject(EngineError::NoOriginalRecord {
            course_id: course_id.to_string(),
        })
    })?;

    if record.retakes_exhausted() {
        return Err(reject(EngineError::RetakeLimitExceeded {
            course_id: course_id.to_string(),
            retakes: record.retake_count(),
            limit: MAX_RETAKES_PER_COURSE,
        }));
    }

    record.retakes.push(attempt);
    let record = record.clone();
    refresh_gpa(student, catalog);

    crate::debug!(
        target: "validator",
        "Accepted retake {}/{MAX_RETAKES_PER_COURSE} of '{course_id}' for student '{}'",
        record.retake_count(),
        student.id
    );
    Ok(record)
}

/// Correct fields of the original attempt in place
///
/// Retakes are left untouched and prerequisites are not re-checked.
///
/// # Errors
/// - `NoOriginalRecord` if the student has no record for the course
/// - `InvalidAttemptData` if the corrected marks are out of range
pub fn correct_original(
    student: &mut Student,
    catalog: &Catalog,
    course_id: &str,
    correction: &AttemptCorrection,
) -> EngineResult<CourseRecord> {
    let record = student.record_mut(course_id).ok_or_else(|| {
        reject(EngineError::NoOriginalRecord {
            course_id: course_id.to_string(),
        })
    })?;

    let corrected = correction.apply(&record.original);
    corrected.validate().map_err(reject)?;

    record.original = corrected;
    let record = record.clone();
    refresh_gpa(student, catalog);

    crate::debug!(
        target: "validator",
        "Accepted correction of '{course_id}' for student '{}'",
        student.id
    );
    Ok(record)
}

/// Delete a course record with all its attempts
///
/// # Errors
/// Returns `NotFound` if the student has no record for the course
pub fn delete_record(
    student: &mut Student,
    catalog: &Catalog,
    course_id: &str,
) -> EngineResult<CourseRecord> {
    let position = student
        .records
        .iter()
        .position(|r| r.course_id == course_id)
        .ok_or_else(|| {
            reject(EngineError::NotFound {
                entity: Entity::CourseRecord,
                id: course_id.to_string(),
            })
        })?;

    let removed = student.records.remove(position);
    refresh_gpa(student, catalog);

    crate::debug!(
        target: "validator",
        "Accepted deletion of '{course_id}' with {} retakes for student '{}'",
        removed.retake_count(),
        student.id
    );
    Ok(removed)
}

fn reject(err: EngineError) -> EngineError {
    crate::debug!(target: "validator", "Rejected: {err}");
    err
}
