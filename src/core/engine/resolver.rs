//! Eligibility and remaining-courses resolution
//!
//! Everything here is a pure read over a student snapshot and the catalog.
//! Nothing is cached or persisted; each call reflects the current records.

use super::aggregate::{best_attempt, is_passed};
use super::gpa::{compute_gpa, Gpa};
use super::validator::{record_state, RecordState};
use crate::core::catalog::Catalog;
use crate::core::models::{Course, Grade, Student};
use serde::Serialize;

/// Total retakes across all courses at which continuation is refused.
pub const CONTINUATION_RETAKE_CAP: usize = 3;

/// First prerequisite of a course, in catalog order, that the student has not passed
///
/// Returns `None` when every prerequisite is passed or the course is unknown.
#[must_use]
pub fn first_unmet_prerequisite<'c>(
    student: &Student,
    catalog: &'c Catalog,
    course_id: &str,
) -> Option<&'c Course> {
    catalog
        .prerequisites_of(course_id)
        .ok()?
        .into_iter()
        .find(|prereq| !student.record(&prereq.code).is_some_and(is_passed))
}

/// Courses the student may still work towards, in catalog order
///
/// A course is included when the student holds a record for it whose best
/// attempt is not passing, or holds no record and has passed every
/// prerequisite. Records whose retakes are exhausted are still listed.
#[must_use]
pub fn remaining_courses<'c>(student: &Student, catalog: &'c Catalog) -> Vec<&'c Course> {
    catalog
        .courses()
        .iter()
        .filter(|course| match student.record(&course.code) {
            Some(record) => !is_passed(record),
            None => first_unmet_prerequisite(student, catalog, &course.code).is_none(),
        })
        .collect()
}

/// Total retake attempts across all of a student's records
#[must_use]
pub fn total_retakes(student: &Student) -> usize {
    student.total_retakes()
}

/// Whether the student may continue: fewer than three retakes in total
#[must_use]
pub fn continuation_eligible(student: &Student) -> bool {
    total_retakes(student) < CONTINUATION_RETAKE_CAP
}

/// One course record as a reader sees it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseStanding {
    /// Course code
    pub course_id: String,
    /// Course title, empty if the course left the catalog
    pub title: String,
    /// Credit weight, zero if the course left the catalog
    pub credits: u32,
    /// Displayed marks of the best attempt
    pub marks: Option<i32>,
    /// Grade of the best attempt
    pub grade: Option<Grade>,
    /// Whether the best attempt passes
    pub passed: bool,
    /// Retakes recorded
    pub retakes: usize,
    /// Assignment state of the record
    pub state: RecordState,
}

/// Derived academic progress for one student
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressSummary {
    /// Student identifier
    pub student_id: String,
    /// Student name
    pub name: String,
    /// GPA at full precision
    pub gpa: Gpa,
    /// Per-course standing in catalog order, then unknown courses
    pub courses: Vec<CourseStanding>,
    /// Codes of remaining courses
    pub remaining: Vec<String>,
    /// Total retakes across courses
    pub total_retakes: usize,
    /// Continuation verdict
    pub continuation_eligible: bool,
}

impl ProgressSummary {
    /// Derive the summary from a student snapshot
    #[must_use]
    pub fn build(student: &Student, catalog: &Catalog) -> Self {
        let mut records: Vec<_> = student.records.iter().collect();
        records.sort_by_key(|r| {
            catalog
                .courses()
                .iter()
                .position(|c| c.code == r.course_id)
                .unwrap_or(usize::MAX)
        });

        let courses = records
            .into_iter()
            .map(|record| {
                let course = catalog.find(&record.course_id);
                let best = best_attempt(record);
                CourseStanding {
                    course_id: record.course_id.clone(),
                    title: course.map(|c| c.title.clone()).unwrap_or_default(),
                    credits: course.map_or(0, |c| c.credits),
                    marks: best.map(|b| b.display_marks()),
                    grade: best.map(|b| b.grade()),
                    passed: best.is_some_and(|b| b.is_passing()),
                    retakes: record.retake_count(),
                    state: record_state(student, &record.course_id),
                }
            })
            .collect();

        Self {
            student_id: student.id.clone(),
            name: student.name.clone(),
            gpa: compute_gpa(&student.records, catalog),
            courses,
            remaining: remaining_courses(student, catalog)
                .into_iter()
                .map(|c| c.code.clone())
                .collect(),
            total_retakes: total_retakes(student),
            continuation_eligible: continuation_eligible(student),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{Attempt, CourseRecord, Semester};

    fn catalog() -> Catalog {
        Catalog::new(vec![
            Course::new("CS101".into(), "Programming".into(), 4, Semester::Term1, 1),
            Course::new("MATH101".into(), "Calculus".into(), 3, Semester::Term1, 1),
            Course::new("CS201".into(), "Data Structures".into(), 4, Semester::Term2, 2)
                .with_prerequisite("CS101"),
            Course::new("CS301".into(), "Algorithms".into(), 4, Semester::Term1, 3)
                .with_prerequisite("CS201")
                .with_prerequisite("MATH101"),
        ])
        .unwrap()
    }

    fn attempt(marks: i32, grade: Grade) -> Attempt {
        Attempt::new(marks, grade, 2024, Semester::Term1)
    }

    fn student_with(records: Vec<CourseRecord>) -> Student {
        let mut s = Student::new("s1".into(), "Sam".into(), String::new(), 2024);
        s.records = records;
        s
    }

    fn ids(courses: &[&Course]) -> Vec<String> {
        courses.iter().map(|c| c.code.clone()).collect()
    }

    #[test]
    fn test_fresh_student_sees_courses_without_prerequisites() {
        let catalog = catalog();
        let student = student_with(vec![]);
        assert_eq!(
            ids(&remaining_courses(&student, &catalog)),
            vec!["CS101", "MATH101"]
        );
    }

    #[test]
    fn test_passing_unlocks_dependents_and_drops_passed_course() {
        let catalog = catalog();
        let student = student_with(vec![CourseRecord::new("CS101".into(), attempt(60, Grade::C))]);
        assert_eq!(
            ids(&remaining_courses(&student, &catalog)),
            vec!["MATH101", "CS201"]
        );
    }

    #[test]
    fn test_failed_course_remains_even_when_exhausted() {
        let catalog = catalog();
        let mut record = CourseRecord::new("CS101".into(), attempt(30, Grade::F));
        record.retakes.push(attempt(35, Grade::F));
        record.retakes.push(attempt(40, Grade::E));
        assert!(record.retakes_exhausted());

        let student = student_with(vec![record]);
        let remaining = ids(&remaining_courses(&student, &catalog));
        assert!(remaining.contains(&"CS101".to_string()));
        assert!(!remaining.contains(&"CS201".to_string()));
    }

    #[test]
    fn test_not_applicable_only_record_remains() {
        let catalog = catalog();
        let student = student_with(vec![CourseRecord::new(
            "MATH101".into(),
            attempt(0, Grade::NotApplicable),
        )]);
        assert!(ids(&remaining_courses(&student, &catalog)).contains(&"MATH101".to_string()));
    }

    #[test]
    fn test_first_unmet_prerequisite_in_catalog_order() {
        let catalog = catalog();
        let student = student_with(vec![]);
        let missing = first_unmet_prerequisite(&student, &catalog, "CS301").unwrap();
        assert_eq!(missing.code, "MATH101");

        let student = student_with(vec![CourseRecord::new("MATH101".into(), attempt(70, Grade::B))]);
        let missing = first_unmet_prerequisite(&student, &catalog, "CS301").unwrap();
        assert_eq!(missing.code, "CS201");
    }

    #[test]
    fn test_continuation_threshold() {
        let mut a = CourseRecord::new("CS101".into(), attempt(30, Grade::F));
        a.retakes.push(attempt(35, Grade::F));
        a.retakes.push(attempt(40, Grade::F));
        let mut b = CourseRecord::new("MATH101".into(), attempt(30, Grade::F));

        let student = student_with(vec![a.clone(), b.clone()]);
        assert_eq!(total_retakes(&student), 2);
        assert!(continuation_eligible(&student));

        b.retakes.push(attempt(60, Grade::C));
        let student = student_with(vec![a, b]);
        assert_eq!(total_retakes(&student), 3);
        assert!(!continuation_eligible(&student));
    }

    #[test]
    fn test_progress_summary() {
        let catalog = catalog();
        let mut cs101 = CourseRecord::new("CS101".into(), attempt(40, Grade::F));
        cs101.retakes.push(attempt(72, Grade::B));
        let student = student_with(vec![
            CourseRecord::new("MATH101".into(), attempt(55, Grade::D)),
            cs101,
        ]);

        let summary = ProgressSummary::build(&student, &catalog);
        assert_eq!(summary.courses.len(), 2);
        assert_eq!(summary.courses[0].course_id, "CS101");
        assert_eq!(summary.courses[0].marks, Some(50));
        assert_eq!(summary.courses[0].grade, Some(Grade::B));
        assert_eq!(summary.courses[0].state, RecordState::Assigned);
        assert!(summary.courses[1].passed);
        assert_eq!(summary.remaining, vec!["CS201"]);
        assert_eq!(summary.total_retakes, 1);
        assert!(summary.continuation_eligible);
        // B x 4 + D x 3 = 22 / 7
        assert_eq!(summary.gpa.to_string(), "3.14");
    }
}
