//! GPA calculation over best attempts

use super::aggregate::best_attempt;
use crate::core::catalog::Catalog;
use crate::core::models::{CourseRecord, Student};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A credit-weighted grade-point average in `[0, 5]`
///
/// Held at full precision; only [`Display`](fmt::Display) and
/// [`rounded`](Self::rounded) round to two places.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Gpa(f64);

impl Gpa {
    /// GPA of a student with no counted courses
    pub const ZERO: Self = Self(0.0);

    /// Full-precision value
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Value rounded to two decimal places
    #[must_use]
    pub fn rounded(self) -> f64 {
        (self.0 * 100.0).round() / 100.0
    }
}

impl fmt::Display for Gpa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Points and credits accumulated over counted records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GpaTally {
    /// Sum of grade point times credits
    pub points: u64,
    /// Sum of credits of counted courses
    pub credits: u64,
}

impl GpaTally {
    /// Fold the tally into a GPA; zero credits yields zero
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn gpa(self) -> Gpa {
        if self.credits == 0 {
            Gpa::ZERO
        } else {
            Gpa(self.points as f64 / self.credits as f64)
        }
    }
}

/// Accumulate points and credits for every record with a best attempt
///
/// Records whose course is missing from the catalog have no credit weight
/// and are skipped.
#[must_use]
pub fn tally(records: &[CourseRecord], catalog: &Catalog) -> GpaTally {
    let mut tally = GpaTally::default();

    for record in records {
        let Some(best) = best_attempt(record) else {
            continue;
        };
        let Some(course) = catalog.find(&record.course_id) else {
            crate::warn!(
                target: "gpa",
                "Record for unknown course '{}' skipped",
                record.course_id
            );
            continue;
        };
        let Some(point) = best.grade().grade_point() else {
            continue;
        };
        let credits = u64::from(course.credits);
        tally.points += u64::from(point) * credits;
        tally.credits += credits;
    }

    tally
}

/// Compute the GPA of a set of course records
#[must_use]
pub fn compute_gpa(records: &[CourseRecord], catalog: &Catalog) -> Gpa {
    tally(records, catalog).gpa()
}

/// Recompute and cache a student's GPA
///
/// Called after every record mutation, before the student is persisted.
pub fn refresh_gpa(student: &mut Student, catalog: &Catalog) -> Gpa {
    let gpa = compute_gpa(&student.records, catalog);
    crate::debug!(
        target: "gpa",
        "Student '{}' GPA recomputed: {} -> {gpa}",
        student.id,
        Gpa(student.gpa)
    );
    student.gpa = gpa.value();
    gpa
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{Attempt, Course, Grade, Semester};

    fn catalog() -> Catalog {
        Catalog::new(vec![
            Course::new("CS101".into(), "Programming".into(), 4, Semester::Term1, 1),
            Course::new("MATH101".into(), "Calculus".into(), 3, Semester::Term1, 1),
            Course::new("ENG101".into(), "Writing".into(), 2, Semester::Term2, 1),
        ])
        .unwrap()
    }

    fn record(course: &str, marks: i32, grade: Grade) -> CourseRecord {
        CourseRecord::new(
            course.to_string(),
            Attempt::new(marks, grade, 2024, Semester::Term1),
        )
    }

    #[test]
    fn test_empty_records_give_zero() {
        assert_eq!(compute_gpa(&[], &catalog()), Gpa::ZERO);
    }

    #[test]
    fn test_credit_weighted_average() {
        // A (5) x 4 credits + C (3) x 3 credits = 29 / 7
        let records = vec![record("CS101", 85, Grade::A), record("MATH101", 60, Grade::C)];
        let gpa = compute_gpa(&records, &catalog());
        assert!((gpa.value() - 29.0 / 7.0).abs() < f64::EPSILON);
        assert_eq!(gpa.to_string(), "4.14");
        assert!((gpa.rounded() - 4.14).abs() < f64::EPSILON);
    }

    #[test]
    fn test_failing_grades_count_with_zero_points() {
        let records = vec![record("CS101", 85, Grade::A), record("MATH101", 20, Grade::F)];
        let t = tally(&records, &catalog());
        assert_eq!(t, GpaTally { points: 20, credits: 7 });
    }

    #[test]
    fn test_not_applicable_records_do_not_count() {
        let records = vec![
            record("CS101", 70, Grade::B),
            record("ENG101", 0, Grade::NotApplicable),
        ];
        let gpa = compute_gpa(&records, &catalog());
        assert!((gpa.value() - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_grade_point_tie_break_contributes_five_points() {
        let mut r = record("CS101", 80, Grade::B);
        r.retakes
            .push(Attempt::new(80, Grade::A, 2024, Semester::Term2));
        let t = tally(&[r], &catalog());
        assert_eq!(t.points, 5 * 4);
    }

    #[test]
    fn test_unknown_course_is_skipped() {
        let records = vec![record("CS101", 70, Grade::B), record("BIO999", 90, Grade::A)];
        let t = tally(&records, &catalog());
        assert_eq!(t.credits, 4);
    }

    #[test]
    fn test_refresh_caches_full_precision() {
        let mut student = Student::new("s1".into(), "Sam".into(), String::new(), 2024);
        student.records = vec![
            record("CS101", 85, Grade::A),
            record("MATH101", 60, Grade::C),
            record("ENG101", 55, Grade::D),
        ];
        let gpa = refresh_gpa(&mut student, &catalog());
        assert!((student.gpa - 33.0 / 9.0).abs() < f64::EPSILON);
        assert!((gpa.value() - student.gpa).abs() < f64::EPSILON);
    }
}
