//! Course record model: one per student and course

use super::Attempt;
use serde::{Deserialize, Serialize};

/// Maximum number of retake attempts a course record may hold.
pub const MAX_RETAKES_PER_COURSE: usize = 2;

/// Position of an attempt within its course record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttemptKind {
    /// The first recorded attempt
    Original,
    /// A later attempt; the index is zero-based within the retakes
    Retake(usize),
}

impl AttemptKind {
    /// Sequence number of the attempt within the record (original is 0)
    #[must_use]
    pub const fn sequence(self) -> usize {
        match self {
            Self::Original => 0,
            Self::Retake(index) => index + 1,
        }
    }

    /// Whether this is a retake attempt
    #[must_use]
    pub const fn is_retake(self) -> bool {
        matches!(self, Self::Retake(_))
    }
}

/// A student's history with one course: the original attempt plus retakes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseRecord {
    /// Code of the course this record belongs to
    pub course_id: String,

    /// The first recorded attempt
    pub original: Attempt,

    /// Retake attempts in the order they were appended
    #[serde(default)]
    pub retakes: Vec<Attempt>,
}

impl CourseRecord {
    /// Create a record holding only the original attempt
    #[must_use]
    pub const fn new(course_id: String, original: Attempt) -> Self {
        Self {
            course_id,
            original,
            retakes: Vec::new(),
        }
    }

    /// Number of retakes recorded
    #[must_use]
    pub fn retake_count(&self) -> usize {
        self.retakes.len()
    }

    /// Whether the retake allowance is used up
    #[must_use]
    pub fn retakes_exhausted(&self) -> bool {
        self.retakes.len() >= MAX_RETAKES_PER_COURSE
    }

    /// All attempts, original first, tagged with their position
    pub fn attempts(&self) -> impl Iterator<Item = (AttemptKind, &Attempt)> {
        std::iter::once((AttemptKind::Original, &self.original)).chain(
            self.retakes
                .iter()
                .enumerate()
                .map(|(index, attempt)| (AttemptKind::Retake(index), attempt)),
        )
    }
}
