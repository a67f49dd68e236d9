//! Engine error taxonomy.
//!
//! Every rejection the engine produces is a typed business-rule error that
//! the caller surfaces as an actionable message. Only
//! [`EngineError::ConcurrentModification`] is worth retrying, after the
//! caller re-reads the student and resubmits.

use std::fmt;
use thiserror::Error;

/// Result alias used throughout the engine.
pub type EngineResult<T> = Result<T, EngineError>;

/// Kind of entity named by a [`EngineError::NotFound`] or
/// [`EngineError::AlreadyExists`] error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    /// A student document
    Student,
    /// A catalog course
    Course,
    /// A student's record for one course
    CourseRecord,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Student => write!(f, "student"),
            Self::Course => write!(f, "course"),
            Self::CourseRecord => write!(f, "course record"),
        }
    }
}

/// Errors returned by the engine and its persistence collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A student, course or course record does not exist.
    #[error("{entity} '{id}' not found")]
    NotFound {
        /// Kind of entity looked up
        entity: Entity,
        /// Identifier that was not found
        id: String,
    },

    /// An entity with this identity already exists.
    #[error("{entity} '{id}' already exists")]
    AlreadyExists {
        /// Kind of entity created
        entity: Entity,
        /// Identifier already in use
        id: String,
    },

    /// The student already holds a record for this course.
    #[error("student '{student_id}' already has a record for course '{course_id}'")]
    DuplicateAssignment {
        /// Student holding the record
        student_id: String,
        /// Course already recorded
        course_id: String,
    },

    /// A prerequisite of the course has not been passed.
    #[error(
        "cannot assign '{course_id}': prerequisite '{missing_prerequisite}' has not been passed"
    )]
    PrerequisiteNotMet {
        /// Course being assigned
        course_id: String,
        /// First unpassed prerequisite in catalog order
        missing_prerequisite: String,
    },

    /// A retake or correction targets a course with no original attempt.
    #[error("no original attempt is recorded for course '{course_id}'")]
    NoOriginalRecord {
        /// Course without a record
        course_id: String,
    },

    /// The course has used up its retake allowance.
    #[error("course '{course_id}' already has {retakes} retake attempts (limit {limit})")]
    RetakeLimitExceeded {
        /// Course whose retakes are used up
        course_id: String,
        /// Retakes already recorded
        retakes: usize,
        /// Retakes allowed per course
        limit: usize,
    },

    /// Marks out of range or an unrecognized letter grade.
    #[error("invalid attempt data: {reason}")]
    InvalidAttemptData {
        /// What was wrong with the attempt
        reason: String,
    },

    /// Another writer saved the student first.
    #[error(
        "student '{student_id}' was modified concurrently (expected version {expected_version}, found {found_version})"
    )]
    ConcurrentModification {
        /// Student being saved
        student_id: String,
        /// Version the caller loaded
        expected_version: u64,
        /// Version found in the store
        found_version: u64,
    },

    /// The course catalog failed validation.
    #[error("invalid course catalog: {}", .0.join("; "))]
    InvalidCatalog(Vec<String>),

    /// Report template rendering failed.
    #[error("render error: {0}")]
    Render(String),

    /// The underlying store failed.
    #[error("storage error: {0}")]
    Storage(String),
}

impl EngineError {
    /// Returns `true` if the caller may re-read and resubmit the operation.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::ConcurrentModification { .. })
    }

    /// Shorthand for a missing student.
    pub fn student_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: Entity::Student,
            id: id.into(),
        }
    }

    /// Shorthand for a missing catalog course.
    pub fn course_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: Entity::Course,
            id: id.into(),
        }
    }

    /// Shorthand for invalid attempt input.
    pub fn invalid_attempt(reason: impl Into<String>) -> Self {
        Self::InvalidAttemptData {
            reason: reason.into(),
        }
    }
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<askama::Error> for EngineError {
    fn from(err: askama::Error) -> Self {
        Self::Render(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_concurrent_modification_is_retryable() {
        let conflict = EngineError::ConcurrentModification {
            student_id: "s1".to_string(),
            expected_version: 2,
            found_version: 3,
        };
        assert!(conflict.is_retryable());
        assert!(!EngineError::student_not_found("s1").is_retryable());
        assert!(!EngineError::RetakeLimitExceeded {
            course_id: "CS101".to_string(),
            retakes: 2,
            limit: 2,
        }
        .is_retryable());
    }

    #[test]
    fn test_messages_carry_context() {
        let err = EngineError::PrerequisiteNotMet {
            course_id: "CS201".to_string(),
            missing_prerequisite: "CS101".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("CS201"));
        assert!(msg.contains("CS101"));

        let err = EngineError::RetakeLimitExceeded {
            course_id: "MATH110".to_string(),
            retakes: 2,
            limit: 2,
        };
        assert!(err.to_string().contains("2 retake attempts"));

        let err = EngineError::course_not_found("PHYS9");
        assert_eq!(err.to_string(), "course 'PHYS9' not found");
    }

    #[test]
    fn test_catalog_errors_are_joined() {
        let err = EngineError::InvalidCatalog(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(err.to_string(), "invalid course catalog: a; b");
    }
}
