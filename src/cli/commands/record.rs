//! Record command handler: assign, retake, correct, delete

use super::{check, Service};
use crate::args::RecordSubcommand;
use academic_progress::core::models::{AttemptCorrection, CourseRecord};
use academic_progress::verbose;

/// Dispatch record subcommands
pub fn run(subcommand: RecordSubcommand, service: &Service) {
    match subcommand {
        RecordSubcommand::Assign {
            student,
            course,
            attempt,
        } => {
            let record = check(service.assign_original_course(&student, &course, attempt.into()));
            println!("✓ Assigned {course} to {student}");
            print_record(&record);
        }
        RecordSubcommand::Retake {
            student,
            course,
            attempt,
        } => {
            let record = check(service.append_retake(&student, &course, attempt.into()));
            println!(
                "✓ Recorded retake {} of {course} for {student}",
                record.retake_count()
            );
            print_record(&record);
        }
        RecordSubcommand::Correct {
            student,
            course,
            correction,
        } => {
            let correction = AttemptCorrection::from(correction);
            if correction.is_empty() {
                eprintln!("✗ Nothing to correct: pass at least one of --marks, --grade, --year, --semester");
                std::process::exit(1);
            }
            let record = check(service.correct_original(&student, &course, &correction));
            println!("✓ Corrected original attempt of {course} for {student}");
            print_record(&record);
        }
        RecordSubcommand::Delete { student, course } => {
            check(service.delete_course_record(&student, &course));
            println!("✓ Deleted {course} record for {student}");
        }
    }
}

fn print_record(record: &CourseRecord) {
    for (kind, attempt) in record.attempts() {
        verbose!(
            "  #{} {:>3} {} ({} {})",
            kind.sequence(),
            attempt.marks,
            attempt.grade,
            attempt.year,
            attempt.semester
        );
    }
}
