//! Course catalog: read-only lookup of courses and prerequisite edges
//!
//! The catalog keeps courses in the order they were declared. That order is
//! the deterministic evaluation order for prerequisite checks and for
//! remaining-course listings. Prerequisite edges are indexed in both
//! directions so a course can report what it unlocks.

use crate::core::error::{EngineError, EngineResult};
use crate::core::models::Course;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};
use std::fs;
use std::path::Path;

/// Lowest offering year tier.
pub const MIN_YEAR_TIER: u8 = 1;
/// Highest offering year tier.
pub const MAX_YEAR_TIER: u8 = 4;

/// On-disk catalog document: a list of `[[courses]]` tables
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogDocument {
    /// Courses in declaration order
    #[serde(default)]
    pub courses: Vec<Course>,
}

/// Validated, indexed course catalog
#[derive(Debug, Clone)]
pub struct Catalog {
    /// Courses in catalog order
    courses: Vec<Course>,

    /// Maps course code -> position in `courses`
    index: HashMap<String, usize>,

    /// Maps course code -> codes of courses that list it as a prerequisite
    dependents: HashMap<String, Vec<String>>,
}

impl Catalog {
    /// Build a catalog from courses in catalog order
    ///
    /// # Errors
    /// Returns `InvalidCatalog` listing every problem found: duplicate codes,
    /// zero credits, year tiers outside 1-4, self-referencing or unknown
    /// prerequisites.
    pub fn new(courses: Vec<Course>) -> EngineResult<Self> {
        let mut problems = Vec::new();
        let mut index = HashMap::with_capacity(courses.len());

        for (position, course) in courses.iter().enumerate() {
            if index.insert(course.code.clone(), position).is_some() {
                problems.push(format!("Course '{}': duplicate course code", course.code));
            }
            if course.credits == 0 {
                problems.push(format!("Course '{}': credits must be positive", course.code));
            }
            if !(MIN_YEAR_TIER..=MAX_YEAR_TIER).contains(&course.year_tier) {
                problems.push(format!(
                    "Course '{}': year tier {} outside {MIN_YEAR_TIER}-{MAX_YEAR_TIER}",
                    course.code, course.year_tier
                ));
            }
        }

        let mut dependents: HashMap<String, Vec<String>> = HashMap::new();
        for course in &courses {
            let mut seen = HashSet::new();
            for prereq in &course.prerequisites {
                if !seen.insert(prereq) {
                    continue;
                }
                if *prereq == course.code {
                    problems.push(format!(
                        "Course '{}': course lists itself as a prerequisite",
                        course.code
                    ));
                } else if !index.contains_key(prereq) {
                    problems.push(format!(
                        "Course '{}': prerequisite '{}' not found",
                        course.code, prereq
                    ));
                } else {
                    dependents
                        .entry(prereq.clone())
                        .or_default()
                        .push(course.code.clone());
                }
            }
        }

        if !problems.is_empty() {
            return Err(EngineError::InvalidCatalog(problems));
        }

        let catalog = Self {
            courses,
            index,
            dependents,
        };

        if let Some(cyclic) = catalog.cyclic_courses() {
            crate::warn!(
                target: "catalog",
                "Prerequisite cycle involving: {}",
                cyclic.join(", ")
            );
        }

        crate::debug!(target: "catalog", "Catalog built with {} courses", catalog.len());
        Ok(catalog)
    }

    /// Parse a TOML catalog document into courses without validating them
    ///
    /// # Errors
    /// Returns `InvalidCatalog` if the TOML cannot be parsed
    pub fn parse_courses(toml_str: &str) -> EngineResult<Vec<Course>> {
        let document: CatalogDocument = toml::from_str(toml_str)
            .map_err(|e| EngineError::InvalidCatalog(vec![e.to_string()]))?;
        Ok(document.courses)
    }

    /// Build a validated catalog from a TOML string
    ///
    /// # Errors
    /// Returns `InvalidCatalog` if the TOML cannot be parsed or fails validation
    pub fn from_toml(toml_str: &str) -> EngineResult<Self> {
        Self::new(Self::parse_courses(toml_str)?)
    }

    /// Load and validate a catalog file
    ///
    /// # Errors
    /// Returns `Storage` if the file cannot be read, or `InvalidCatalog`
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            EngineError::Storage(format!(
                "failed to read catalog {}: {e}",
                path.as_ref().display()
            ))
        })?;
        Self::from_toml(&content)
    }

    /// Look up a course by id (its code)
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Course> {
        self.index.get(id).map(|&position| &self.courses[position])
    }

    /// Get a course by id
    ///
    /// # Errors
    /// Returns `NotFound` if no course has this code
    pub fn get_course(&self, id: &str) -> EngineResult<&Course> {
        self.find(id)
            .ok_or_else(|| EngineError::course_not_found(id))
    }

    /// Prerequisites of a course, in catalog order
    ///
    /// # Errors
    /// Returns `NotFound` if no course has this code
    pub fn prerequisites_of(&self, id: &str) -> EngineResult<Vec<&Course>> {
        let course = self.get_course(id)?;
        let mut prereqs: Vec<&Course> = course
            .prerequisites
            .iter()
            .filter_map(|code| self.find(code))
            .collect();
        prereqs.sort_by_key(|c| self.position(&c.code));
        Ok(prereqs)
    }

    /// Courses that list the given course as a prerequisite, in catalog order
    #[must_use]
    pub fn dependents_of(&self, id: &str) -> Vec<&Course> {
        let mut unlocked: Vec<&Course> = self
            .dependents
            .get(id)
            .map(|codes| codes.iter().filter_map(|code| self.find(code)).collect())
            .unwrap_or_default();
        unlocked.sort_by_key(|c| self.position(&c.code));
        unlocked
    }

    /// All courses in catalog order
    #[must_use]
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// Number of courses
    #[must_use]
    pub fn len(&self) -> usize {
        self.courses.len()
    }

    /// Whether the catalog has no courses
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    /// Courses that cannot be topologically ordered, if any
    ///
    /// Runs Kahn's algorithm over the prerequisite edges. Anything left
    /// unvisited sits on a cycle or behind one. Cycles are reported, not
    /// rejected.
    #[must_use]
    pub fn cyclic_courses(&self) -> Option<Vec<String>> {
        let mut indegree: HashMap<&str, usize> = self
            .courses
            .iter()
            .map(|c| {
                let distinct: HashSet<&String> = c.prerequisites.iter().collect();
                (c.code.as_str(), distinct.len())
            })
            .collect();

        let mut queue: VecDeque<&str> = self
            .courses
            .iter()
            .map(|c| c.code.as_str())
            .filter(|code| indegree.get(code).copied().unwrap_or(0) == 0)
            .collect();

        let mut visited = 0;
        while let Some(code) = queue.pop_front() {
            visited += 1;
            for child in self.dependents_of(code) {
                if let Some(entry) = indegree.get_mut(child.code.as_str()) {
                    *entry = entry.saturating_sub(1);
                    if *entry == 0 {
                        queue.push_back(child.code.as_str());
                    }
                }
            }
        }

        if visited == self.courses.len() {
            return None;
        }

        Some(
            self.courses
                .iter()
                .filter(|c| indegree.get(c.code.as_str()).copied().unwrap_or(0) > 0)
                .map(|c| c.code.clone())
                .collect(),
        )
    }

    fn position(&self, code: &str) -> usize {
        self.index.get(code).copied().unwrap_or(usize::MAX)
    }
}

impl std::fmt::Display for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Course catalog ({} courses):", self.courses.len())?;
        writeln!(f)?;

        for course in &self.courses {
            let prereqs = if course.prerequisites.is_empty() {
                "(no prerequisites)".to_string()
            } else {
                course.prerequisites.join(", ")
            };
            writeln!(
                f,
                "  {:<10} Y{} {:<7} {:>2} cr  {} → {prereqs}",
                course.code, course.year_tier, course.semester, course.credits, course.title
            )?;
        }

        Ok(())
    }
}
