//! Student command handler

use super::{check, Service};
use crate::args::StudentSubcommand;
use academic_progress::core::engine::{best_attempt, record_state};
use academic_progress::core::models::Student;

/// Dispatch student subcommands
pub fn run(subcommand: StudentSubcommand, service: &Service) {
    match subcommand {
        StudentSubcommand::Add {
            id,
            name,
            program,
            year,
        } => {
            let student = check(service.enroll_student(Student::new(id, name, program, year)));
            println!("✓ Enrolled {} ({})", student.name, student.id);
        }
        StudentSubcommand::List => {
            let students = check(service.list_students());
            if students.is_empty() {
                println!("No students enrolled");
                return;
            }
            for student in students {
                println!(
                    "{:<12} {:<24} GPA {:.2}  records {}",
                    student.id,
                    student.name,
                    student.gpa,
                    student.records.len()
                );
            }
        }
        StudentSubcommand::Show { id } => show(&check(service.get_student(&id))),
    }
}

fn show(student: &Student) {
    println!("{} ({})", student.name, student.id);
    if !student.program.is_empty() {
        println!("  Program:  {}", student.program);
    }
    println!("  Enrolled: {}", student.enrollment_year);
    println!("  GPA:      {:.2}", student.gpa);
    println!("  Version:  {}", student.version);

    if student.records.is_empty() {
        println!("\n  No course records");
        return;
    }

    println!();
    for record in &student.records {
        let state = record_state(student, &record.course_id);
        println!("  {} [{state}]", record.course_id);
        for (kind, attempt) in record.attempts() {
            let label = if kind.is_retake() { "retake" } else { "original" };
            println!(
                "    {label:<9} {:>3} {:<3} {} {}",
                attempt.marks, attempt.grade, attempt.year, attempt.semester
            );
        }
        if let Some(best) = best_attempt(record) {
            println!("    best      {:>3} {}", best.display_marks(), best.grade());
        }
    }
}
