//! End-to-end progress scenarios through `ProgressService`

use academic_progress::core::engine::{best_attempt, compute_gpa, Gpa};
use academic_progress::core::models::{
    Attempt, AttemptCorrection, Course, Grade, Semester, Student,
};
use academic_progress::core::store::MemoryStore;
use academic_progress::{EngineError, Entity, Persistence, ProgressService};

fn course(code: &str, credits: u32, prereqs: &[&str]) -> Course {
    prereqs.iter().fold(
        Course::new(code.into(), format!("{code} title"), credits, Semester::Term1, 1),
        |c, p| c.with_prerequisite(p),
    )
}

fn attempt(marks: i32, grade: Grade) -> Attempt {
    Attempt::new(marks, grade, 2024, Semester::Term1)
}

/// CS101 -> CS201 -> CS301, plus an independent MA101
fn service() -> ProgressService<MemoryStore> {
    let service = ProgressService::new(MemoryStore::new(vec![
        course("CS101", 4, &[]),
        course("MA101", 3, &[]),
        course("CS201", 4, &["CS101"]),
        course("CS301", 3, &["CS201", "MA101"]),
    ]));
    service
        .enroll_student(Student::new("s1".into(), "Ada".into(), "CS".into(), 2024))
        .expect("enroll");
    service
}

#[test]
fn prerequisite_gates_assignment_until_passed() {
    let service = service();

    let err = service
        .assign_original_course("s1", "CS201", attempt(70, Grade::B))
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::PrerequisiteNotMet {
            course_id: "CS201".into(),
            missing_prerequisite: "CS101".into(),
        }
    );
    assert!(service.get_student("s1").unwrap().records.is_empty());

    service
        .assign_original_course("s1", "CS101", attempt(60, Grade::C))
        .unwrap();
    let record = service
        .assign_original_course("s1", "CS201", attempt(70, Grade::B))
        .unwrap();
    assert_eq!(record.course_id, "CS201");
    assert!(record.retakes.is_empty());
}

#[test]
fn failed_prerequisite_does_not_unlock() {
    let service = service();
    service
        .assign_original_course("s1", "CS101", attempt(30, Grade::E))
        .unwrap();

    let err = service
        .assign_original_course("s1", "CS201", attempt(70, Grade::B))
        .unwrap_err();
    assert!(matches!(err, EngineError::PrerequisiteNotMet { .. }));
}

#[test]
fn first_unmet_prerequisite_follows_catalog_order() {
    let service = service();

    // CS301 declares CS201 first, but MA101 comes first in the catalog
    let err = service
        .assign_original_course("s1", "CS301", attempt(80, Grade::A))
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::PrerequisiteNotMet {
            course_id: "CS301".into(),
            missing_prerequisite: "MA101".into(),
        }
    );
}

#[test]
fn best_of_three_then_retake_limit() {
    let service = service();
    service
        .assign_original_course("s1", "CS101", attempt(40, Grade::F))
        .unwrap();
    service
        .append_retake("s1", "CS101", attempt(45, Grade::F))
        .unwrap();
    let record = service
        .append_retake("s1", "CS101", attempt(65, Grade::C))
        .unwrap();

    let best = best_attempt(&record).unwrap();
    assert_eq!(best.attempt.marks, 65);
    assert_eq!(best.grade(), Grade::C);

    let err = service
        .append_retake("s1", "CS101", attempt(90, Grade::A))
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::RetakeLimitExceeded {
            course_id: "CS101".into(),
            retakes: 2,
            limit: 2,
        }
    );
    assert_eq!(
        service.get_student("s1").unwrap().records[0].retakes.len(),
        2
    );
}

#[test]
fn duplicate_assignment_is_rejected() {
    let service = service();
    service
        .assign_original_course("s1", "CS101", attempt(40, Grade::F))
        .unwrap();
    let err = service
        .assign_original_course("s1", "CS101", attempt(90, Grade::A))
        .unwrap_err();
    assert!(matches!(err, EngineError::DuplicateAssignment { .. }));
    assert_eq!(service.get_student("s1").unwrap().records.len(), 1);
}

#[test]
fn retake_without_original_is_rejected() {
    let service = service();
    let err = service
        .append_retake("s1", "CS101", attempt(50, Grade::D))
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::NoOriginalRecord {
            course_id: "CS101".into()
        }
    );
}

#[test]
fn out_of_range_marks_are_rejected() {
    let service = service();
    for marks in [-1, 101] {
        let err = service
            .assign_original_course("s1", "CS101", attempt(marks, Grade::A))
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidAttemptData { .. }));
    }
    assert!(service.get_student("s1").unwrap().records.is_empty());
}

#[test]
fn unknown_student_and_course() {
    let service = service();
    assert_eq!(
        service
            .assign_original_course("nobody", "CS101", attempt(50, Grade::D))
            .unwrap_err(),
        EngineError::NotFound {
            entity: Entity::Student,
            id: "nobody".into()
        }
    );
    assert_eq!(
        service
            .assign_original_course("s1", "XX999", attempt(50, Grade::D))
            .unwrap_err(),
        EngineError::NotFound {
            entity: Entity::Course,
            id: "XX999".into()
        }
    );
}

#[test]
fn continuation_turns_off_at_three_retakes() {
    let service = service();
    service
        .assign_original_course("s1", "CS101", attempt(20, Grade::F))
        .unwrap();
    service
        .assign_original_course("s1", "MA101", attempt(20, Grade::F))
        .unwrap();
    service
        .append_retake("s1", "CS101", attempt(30, Grade::F))
        .unwrap();
    service
        .append_retake("s1", "CS101", attempt(35, Grade::F))
        .unwrap();
    assert!(service.get_continuation_eligibility("s1").unwrap());

    service
        .append_retake("s1", "MA101", attempt(70, Grade::B))
        .unwrap();
    assert!(!service.get_continuation_eligibility("s1").unwrap());

    // Deleting a record gives its retakes back
    service.delete_course_record("s1", "MA101").unwrap();
    assert!(service.get_continuation_eligibility("s1").unwrap());
}

#[test]
fn grade_point_breaks_marks_tie() {
    let service = service();
    service
        .assign_original_course("s1", "CS101", attempt(80, Grade::B))
        .unwrap();
    service
        .append_retake("s1", "CS101", attempt(80, Grade::A))
        .unwrap();

    assert_eq!(service.get_gpa("s1").unwrap().value(), 5.0);
}

#[test]
fn gpa_weights_by_credits() {
    let service = service();
    service
        .assign_original_course("s1", "CS101", attempt(85, Grade::A))
        .unwrap();
    service
        .assign_original_course("s1", "MA101", attempt(55, Grade::C))
        .unwrap();

    // (5 * 4 + 3 * 3) / 7
    let gpa = service.get_gpa("s1").unwrap();
    assert!((gpa.value() - 29.0 / 7.0).abs() < 1e-12);
    assert_eq!(gpa.to_string(), "4.14");
    assert_eq!(service.get_student("s1").unwrap().gpa, gpa.value());
}

#[test]
fn not_applicable_attempts_do_not_count() {
    let service = service();
    service
        .assign_original_course("s1", "CS101", attempt(0, Grade::NotApplicable))
        .unwrap();
    service
        .assign_original_course("s1", "MA101", attempt(60, Grade::B))
        .unwrap();

    assert_eq!(service.get_gpa("s1").unwrap().value(), 4.0);
}

#[test]
fn gpa_is_idempotent_and_survives_json() {
    let service = service();
    service
        .assign_original_course("s1", "CS101", attempt(85, Grade::A))
        .unwrap();
    service
        .assign_original_course("s1", "MA101", attempt(45, Grade::E))
        .unwrap();

    let first = service.get_gpa("s1").unwrap();
    let second = service.get_gpa("s1").unwrap();
    assert_eq!(first, second);

    let student = service.get_student("s1").unwrap();
    let json = serde_json::to_string(&student).unwrap();
    let restored: Student = serde_json::from_str(&json).unwrap();
    assert_eq!(restored.gpa, first.value());

    let catalog = service.catalog().unwrap();
    assert_eq!(compute_gpa(&restored.records, &catalog), first);

    let gpa: Gpa = serde_json::from_str(&serde_json::to_string(&first).unwrap()).unwrap();
    assert_eq!(gpa, first);
}

#[test]
fn correction_updates_original_and_gpa() {
    let service = service();
    service
        .assign_original_course("s1", "CS101", attempt(40, Grade::F))
        .unwrap();
    service
        .append_retake("s1", "CS101", attempt(45, Grade::F))
        .unwrap();
    assert_eq!(service.get_gpa("s1").unwrap(), Gpa::ZERO);

    let record = service
        .correct_original(
            "s1",
            "CS101",
            &AttemptCorrection {
                marks: Some(75),
                grade: Some(Grade::B),
                ..AttemptCorrection::default()
            },
        )
        .unwrap();
    assert_eq!(record.original.marks, 75);
    assert_eq!(record.retakes.len(), 1);
    assert_eq!(service.get_gpa("s1").unwrap().value(), 4.0);

    let err = service
        .correct_original(
            "s1",
            "CS101",
            &AttemptCorrection {
                marks: Some(120),
                ..AttemptCorrection::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAttemptData { .. }));
}

#[test]
fn delete_missing_record_is_not_found() {
    let service = service();
    assert_eq!(
        service.delete_course_record("s1", "CS101").unwrap_err(),
        EngineError::NotFound {
            entity: Entity::CourseRecord,
            id: "CS101".into()
        }
    );
}

#[test]
fn remaining_courses_track_progress() {
    let service = service();
    let codes = |service: &ProgressService<MemoryStore>| -> Vec<String> {
        service
            .get_remaining_courses("s1")
            .unwrap()
            .into_iter()
            .map(|c| c.code)
            .collect()
    };

    assert_eq!(codes(&service), vec!["CS101", "MA101"]);

    service
        .assign_original_course("s1", "CS101", attempt(90, Grade::A))
        .unwrap();
    service
        .assign_original_course("s1", "MA101", attempt(30, Grade::F))
        .unwrap();
    assert_eq!(codes(&service), vec!["MA101", "CS201"]);

    // Exhausted retakes stay listed
    service
        .append_retake("s1", "MA101", attempt(31, Grade::F))
        .unwrap();
    service
        .append_retake("s1", "MA101", attempt(32, Grade::F))
        .unwrap();
    assert_eq!(codes(&service), vec!["MA101", "CS201"]);
}

#[test]
fn progress_summary_reflects_records() {
    let service = service();
    service
        .assign_original_course("s1", "CS101", attempt(40, Grade::F))
        .unwrap();
    service
        .append_retake("s1", "CS101", attempt(88, Grade::A))
        .unwrap();

    let summary = service.get_progress("s1").unwrap();
    assert_eq!(summary.total_retakes, 1);
    assert!(summary.continuation_eligible);
    assert_eq!(summary.courses.len(), 1);
    assert_eq!(summary.courses[0].marks, Some(50));
    assert!(summary.courses[0].passed);
    assert_eq!(summary.remaining, vec!["MA101", "CS201"]);

    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["gpa"], serde_json::json!(5.0));
    assert_eq!(json["courses"][0]["state"], "assigned");
}

#[test]
fn stale_writer_loses() {
    let service = service();
    let store = service.store();

    let mut first = store.load_student("s1").unwrap();
    let mut second = store.load_student("s1").unwrap();

    first.name = "Ada L.".into();
    assert_eq!(store.save_student(&first).unwrap(), 1);

    second.name = "Ada K.".into();
    let err = store.save_student(&second).unwrap_err();
    assert_eq!(
        err,
        EngineError::ConcurrentModification {
            student_id: "s1".into(),
            expected_version: 0,
            found_version: 1,
        }
    );
    assert!(err.is_retryable());
    assert_eq!(store.load_student("s1").unwrap().name, "Ada L.");
}

#[test]
fn enrolling_twice_fails() {
    let service = service();
    let err = service
        .enroll_student(Student::new("s1".into(), "Other".into(), String::new(), 2025))
        .unwrap_err();
    assert!(matches!(err, EngineError::AlreadyExists { .. }));
}
