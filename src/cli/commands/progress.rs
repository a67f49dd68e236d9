//! Progress command handler

use super::{check, Service};
use academic_progress::core::engine::CONTINUATION_RETAKE_CAP;

/// Print GPA, remaining courses and continuation eligibility
pub fn run(student_id: &str, json: bool, service: &Service) {
    let summary = check(service.get_progress(student_id));

    if json {
        match serde_json::to_string_pretty(&summary) {
            Ok(out) => println!("{out}"),
            Err(e) => {
                eprintln!("✗ Failed to serialize progress: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    println!("\n=== Progress: {} ({}) ===\n", summary.name, summary.student_id);
    println!("GPA:          {}", summary.gpa);
    println!(
        "Retakes:      {} (continuation refused at {CONTINUATION_RETAKE_CAP})",
        summary.total_retakes
    );
    println!(
        "Continuation: {}",
        if summary.continuation_eligible {
            "eligible"
        } else {
            "not eligible"
        }
    );

    if !summary.courses.is_empty() {
        println!("\nCourses:");
        for standing in &summary.courses {
            let marks = standing
                .marks
                .map_or_else(|| "-".to_string(), |m| m.to_string());
            let grade = standing
                .grade
                .map_or_else(|| "-".to_string(), |g| g.to_string());
            println!(
                "  {:<10} {:>3} {:<3} retakes {} [{}]",
                standing.course_id, marks, grade, standing.retakes, standing.state
            );
        }
    }

    if summary.remaining.is_empty() {
        println!("\nRemaining:    none");
    } else {
        println!("\nRemaining:    {}", summary.remaining.join(", "));
    }
}
