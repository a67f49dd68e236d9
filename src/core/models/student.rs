//! Student model

use super::CourseRecord;
use serde::{Deserialize, Serialize};

/// A student document: enrollment metadata, course records and cached GPA
///
/// `gpa` is derived from `records` and is recomputed on every record
/// mutation before the document is saved. `version` is bumped by the store
/// on each successful save and is used to reject concurrent writers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    /// Student identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Programme the student is enrolled in
    #[serde(default)]
    pub program: String,

    /// Year of enrollment
    pub enrollment_year: i32,

    /// Course records, at most one per course
    #[serde(default)]
    pub records: Vec<CourseRecord>,

    /// Cached GPA at full precision
    #[serde(default)]
    pub gpa: f64,

    /// Document version for optimistic concurrency
    #[serde(default)]
    pub version: u64,
}

impl Student {
    /// Create a new student with no records
    #[must_use]
    pub const fn new(id: String, name: String, program: String, enrollment_year: i32) -> Self {
        Self {
            id,
            name,
            program,
            enrollment_year,
            records: Vec::new(),
            gpa: 0.0,
            version: 0,
        }
    }

    /// Get the record for a course
    #[must_use]
    pub fn record(&self, course_id: &str) -> Option<&CourseRecord> {
        self.records.iter().find(|r| r.course_id == course_id)
    }

    /// Get a mutable reference to the record for a course
    pub fn record_mut(&mut self, course_id: &str) -> Option<&mut CourseRecord> {
        self.records.iter_mut().find(|r| r.course_id == course_id)
    }

    /// Whether the student holds a record for a course
    #[must_use]
    pub fn has_record(&self, course_id: &str) -> bool {
        self.record(course_id).is_some()
    }

    /// Sum of retake attempts across all records
    #[must_use]
    pub fn total_retakes(&self) -> usize {
        self.records.iter().map(CourseRecord::retake_count).sum()
    }
}
