//! Course model

use super::Semester;
use serde::{Deserialize, Serialize};

/// Represents a course in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// Unique course code, also used as its identity (e.g., "CS201")
    pub code: String,

    /// Course title (e.g., "Data Structures")
    pub title: String,

    /// Credit weight
    pub credits: u32,

    /// Term in which the course is offered
    pub semester: Semester,

    /// Year tier of the offering (1-4)
    pub year_tier: u8,

    /// Prerequisites - stored as course codes (e.g., "CS101")
    #[serde(default)]
    pub prerequisites: Vec<String>,
}

impl Course {
    /// Create a new course
    ///
    /// # Arguments
    /// * `code` - Unique course code
    /// * `title` - Course title
    /// * `credits` - Credit weight
    /// * `semester` - Offering term
    /// * `year_tier` - Offering year tier
    #[must_use]
    pub const fn new(
        code: String,
        title: String,
        credits: u32,
        semester: Semester,
        year_tier: u8,
    ) -> Self {
        Self {
            code,
            title,
            credits,
            semester,
            year_tier,
            prerequisites: Vec::new(),
        }
    }

    /// Get the course id used for lookups
    #[must_use]
    pub fn id(&self) -> &str {
        &self.code
    }

    /// Add a prerequisite by course code
    ///
    /// # Returns
    /// `false` if the prerequisite is the course itself or is already present
    pub fn add_prerequisite(&mut self, prereq_code: String) -> bool {
        if prereq_code == self.code || self.prerequisites.contains(&prereq_code) {
            return false;
        }
        self.prerequisites.push(prereq_code);
        true
    }

    /// Builder-style variant of [`add_prerequisite`](Self::add_prerequisite)
    #[must_use]
    pub fn with_prerequisite(mut self, prereq_code: &str) -> Self {
        self.add_prerequisite(prereq_code.to_string());
        self
    }
}
