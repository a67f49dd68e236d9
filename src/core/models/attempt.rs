//! Attempt model: marks, letter grade and when a course was taken

use crate::core::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Highest mark an attempt may carry.
pub const MAX_MARKS: i32 = 100;

/// Letter grade recorded against an attempt
///
/// Grade points follow the fixed scale A=5 down to F=0. `N/A` carries no
/// grade point and the attempt is ignored for GPA purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    /// Grade A (5 points)
    A,
    /// Grade B (4 points)
    B,
    /// Grade C (3 points)
    C,
    /// Grade D (2 points)
    D,
    /// Grade E (1 point, failing)
    E,
    /// Grade F (0 points, failing)
    F,
    /// Not applicable; does not participate in GPA
    #[serde(rename = "N/A")]
    NotApplicable,
}

impl Grade {
    /// Grade-point value, or `None` for `N/A`
    #[must_use]
    pub const fn grade_point(self) -> Option<u32> {
        match self {
            Self::A => Some(5),
            Self::B => Some(4),
            Self::C => Some(3),
            Self::D => Some(2),
            Self::E => Some(1),
            Self::F => Some(0),
            Self::NotApplicable => None,
        }
    }

    /// Whether the grade is in the passing set {A, B, C, D}
    #[must_use]
    pub const fn is_passing(self) -> bool {
        matches!(self, Self::A | Self::B | Self::C | Self::D)
    }

    /// Whether an attempt with this grade takes part in GPA
    #[must_use]
    pub const fn counts_toward_gpa(self) -> bool {
        !matches!(self, Self::NotApplicable)
    }

    /// Canonical string form
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::E => "E",
            Self::F => "F",
            Self::NotApplicable => "N/A",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Grade {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(Self::A),
            "B" => Ok(Self::B),
            "C" => Ok(Self::C),
            "D" => Ok(Self::D),
            "E" => Ok(Self::E),
            "F" => Ok(Self::F),
            "N/A" => Ok(Self::NotApplicable),
            _ => Err(EngineError::invalid_attempt(format!(
                "unrecognized letter grade '{s}'"
            ))),
        }
    }
}

/// Academic term in which a course is offered or taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Semester {
    /// First term of the academic year
    #[serde(rename = "term-1")]
    Term1,
    /// Second term of the academic year
    #[serde(rename = "term-2")]
    Term2,
    /// Third term of the academic year
    #[serde(rename = "term-3")]
    Term3,
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Term1 => write!(f, "term-1"),
            Self::Term2 => write!(f, "term-2"),
            Self::Term3 => write!(f, "term-3"),
        }
    }
}

impl FromStr for Semester {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "term-1" | "term1" | "1" => Ok(Self::Term1),
            "term-2" | "term2" | "2" => Ok(Self::Term2),
            "term-3" | "term3" | "3" => Ok(Self::Term3),
            _ => Err(EngineError::invalid_attempt(format!(
                "unrecognized semester '{s}'"
            ))),
        }
    }
}

/// One sitting of a course by a student
///
/// Marks and letter grade are recorded as supplied; no consistency check is
/// made between them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attempt {
    /// Marks obtained (0-100)
    pub marks: i32,
    /// Letter grade awarded
    pub grade: Grade,
    /// Calendar year the attempt was taken
    pub year: i32,
    /// Term the attempt was taken
    pub semester: Semester,
}

impl Attempt {
    /// Create a new attempt
    #[must_use]
    pub const fn new(marks: i32, grade: Grade, year: i32, semester: Semester) -> Self {
        Self {
            marks,
            grade,
            year,
            semester,
        }
    }

    /// When the attempt was taken, ordered chronologically
    #[must_use]
    pub const fn taken_at(&self) -> (i32, Semester) {
        (self.year, self.semester)
    }

    /// Check that the marks are within range
    ///
    /// # Errors
    /// Returns `InvalidAttemptData` when marks fall outside `0..=100`
    pub fn validate(&self) -> EngineResult<()> {
        if (0..=MAX_MARKS).contains(&self.marks) {
            Ok(())
        } else {
            Err(EngineError::invalid_attempt(format!(
                "marks {} outside 0..={MAX_MARKS}",
                self.marks
            )))
        }
    }
}

/// Partial update of an original attempt's fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptCorrection {
    /// Replacement marks
    pub marks: Option<i32>,
    /// Replacement letter grade
    pub grade: Option<Grade>,
    /// Replacement year
    pub year: Option<i32>,
    /// Replacement term
    pub semester: Option<Semester>,
}

impl AttemptCorrection {
    /// Whether the correction changes nothing
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.marks.is_none()
            && self.grade.is_none()
            && self.year.is_none()
            && self.semester.is_none()
    }

    /// Produce the corrected attempt, leaving untouched fields as they were
    #[must_use]
    pub fn apply(&self, attempt: &Attempt) -> Attempt {
        Attempt {
            marks: self.marks.unwrap_or(attempt.marks),
            grade: self.grade.unwrap_or(attempt.grade),
            year: self.year.unwrap_or(attempt.year),
            semester: self.semester.unwrap_or(attempt.semester),
        }
    }
}
