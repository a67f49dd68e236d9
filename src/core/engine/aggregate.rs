//! Best-attempt selection for a course record

use crate::core::models::{Attempt, AttemptKind, CourseRecord, Grade};
use std::cmp::Reverse;

/// Displayed marks are capped at this value when the best attempt is a retake.
pub const RETAKE_DISPLAY_MARKS_CAP: i32 = 50;

/// The attempt chosen to represent a course record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BestAttempt<'a> {
    /// Where the attempt sits in its record
    pub kind: AttemptKind,
    /// The attempt itself
    pub attempt: &'a Attempt,
}

impl BestAttempt<'_> {
    /// Letter grade of the best attempt
    #[must_use]
    pub const fn grade(&self) -> Grade {
        self.attempt.grade
    }

    /// Whether the best attempt is in the passing set
    #[must_use]
    pub const fn is_passing(&self) -> bool {
        self.attempt.grade.is_passing()
    }

    /// Marks as they should be shown to a reader
    ///
    /// A retake scoring above the cap is displayed at the cap. The grade,
    /// and therefore GPA, is unaffected.
    #[must_use]
    pub fn display_marks(&self) -> i32 {
        if self.kind.is_retake() {
            self.attempt.marks.min(RETAKE_DISPLAY_MARKS_CAP)
        } else {
            self.attempt.marks
        }
    }
}

/// Select the attempt that represents a record in GPA
///
/// `N/A` attempts are ignored; `None` means the course does not count.
/// Among the rest the highest marks win, then the higher grade point, then
/// the earliest taken (year, then term), then the earliest appended.
#[must_use]
pub fn best_attempt(record: &CourseRecord) -> Option<BestAttempt<'_>> {
    record
        .attempts()
        .filter(|(_, attempt)| attempt.grade.counts_toward_gpa())
        .max_by_key(|(kind, attempt)| {
            (
                attempt.marks,
                attempt.grade.grade_point(),
                Reverse(attempt.taken_at()),
                Reverse(kind.sequence()),
            )
        })
        .map(|(kind, attempt)| BestAttempt { kind, attempt })
}

/// Whether the record's best attempt is passing
#[must_use]
pub fn is_passed(record: &CourseRecord) -> bool {
    best_attempt(record).is_some_and(|best| best.is_passing())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::Semester;

    fn record(original: Attempt, retakes: Vec<Attempt>) -> CourseRecord {
        let mut r = CourseRecord::new("CS101".to_string(), original);
        r.retakes = retakes;
        r
    }

    fn at(marks: i32, grade: Grade, year: i32, semester: Semester) -> Attempt {
        Attempt::new(marks, grade, year, semester)
    }

    #[test]
    fn test_highest_marks_wins() {
        let r = record(
            at(40, Grade::F, 2023, Semester::Term1),
            vec![
                at(45, Grade::F, 2023, Semester::Term2),
                at(65, Grade::C, 2024, Semester::Term1),
            ],
        );
        let best = best_attempt(&r).unwrap();
        assert_eq!(best.kind, AttemptKind::Retake(1));
        assert_eq!(best.attempt.marks, 65);
        assert_eq!(best.grade(), Grade::C);
        assert!(is_passed(&r));
    }

    #[test]
    fn test_marks_tie_broken_by_grade_point() {
        let r = record(
            at(80, Grade::B, 2023, Semester::Term1),
            vec![at(80, Grade::A, 2024, Semester::Term1)],
        );
        let best = best_attempt(&r).unwrap();
        assert_eq!(best.grade(), Grade::A);
    }

    #[test]
    fn test_full_tie_prefers_earliest_taken() {
        // Appended out of chronological order: the earlier sitting still wins
        let r = record(
            at(70, Grade::B, 2024, Semester::Term2),
            vec![at(70, Grade::B, 2024, Semester::Term1)],
        );
        let best = best_attempt(&r).unwrap();
        assert_eq!(best.kind, AttemptKind::Retake(0));
    }

    #[test]
    fn test_identical_attempts_prefer_original() {
        let same = at(70, Grade::B, 2024, Semester::Term1);
        let r = record(same.clone(), vec![same]);
        assert_eq!(best_attempt(&r).unwrap().kind, AttemptKind::Original);
    }

    #[test]
    fn test_not_applicable_attempts_are_ignored() {
        let r = record(
            at(95, Grade::NotApplicable, 2023, Semester::Term1),
            vec![at(55, Grade::C, 2023, Semester::Term2)],
        );
        let best = best_attempt(&r).unwrap();
        assert_eq!(best.attempt.marks, 55);
    }

    #[test]
    fn test_all_not_applicable_yields_none() {
        let r = record(at(60, Grade::NotApplicable, 2023, Semester::Term1), vec![]);
        assert!(best_attempt(&r).is_none());
        assert!(!is_passed(&r));
    }

    #[test]
    fn test_display_marks_capped_for_retake_only() {
        let r = record(
            at(30, Grade::F, 2023, Semester::Term1),
            vec![at(78, Grade::B, 2023, Semester::Term2)],
        );
        let best = best_attempt(&r).unwrap();
        assert_eq!(best.display_marks(), RETAKE_DISPLAY_MARKS_CAP);
        assert_eq!(best.grade(), Grade::B);

        let r = record(at(78, Grade::B, 2023, Semester::Term1), vec![]);
        assert_eq!(best_attempt(&r).unwrap().display_marks(), 78);

        let r = record(
            at(30, Grade::F, 2023, Semester::Term1),
            vec![at(48, Grade::E, 2023, Semester::Term2)],
        );
        assert_eq!(best_attempt(&r).unwrap().display_marks(), 48);
    }
}
