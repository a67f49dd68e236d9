//! Report command handler

use super::{check, Service};
use academic_progress::config::Config;
use academic_progress::core::report::ProgressReport;
use std::path::{Path, PathBuf};

/// Render a student's progress report to Markdown
///
/// Writes to `output` if given, otherwise to
/// `<reports_dir>/<student>_progress.md`.
pub fn run(student_id: &str, output: Option<&Path>, config: &Config, service: &Service) {
    let catalog = check(service.catalog());
    let summary = check(service.get_progress(student_id));
    let report = ProgressReport::from_summary(&summary, &catalog);

    let path = output.map_or_else(
        || PathBuf::from(&config.paths.reports_dir).join(format!("{student_id}_progress.md")),
        Path::to_path_buf,
    );

    check(report.write_to(&path));
    println!("✓ Report generated: {}", path.display());
}
