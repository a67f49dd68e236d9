//! Markdown progress report rendered from a [`ProgressSummary`]

use crate::core::catalog::Catalog;
use crate::core::engine::{ProgressSummary, CONTINUATION_RETAKE_CAP};
use crate::core::error::EngineResult;
use askama::Template;
use std::fs;
use std::path::Path;

/// One row of the course table
#[derive(Debug, Clone)]
pub struct ReportRow {
    /// Course code
    pub code: String,
    /// Course title
    pub title: String,
    /// Credit weight
    pub credits: u32,
    /// Displayed marks of the best attempt, or "-"
    pub marks: String,
    /// Grade of the best attempt, or "-"
    pub grade: String,
    /// Retakes recorded
    pub retakes: usize,
    /// "passed", "in progress" or "retakes exhausted"
    pub status: &'static str,
}

/// A course still open to the student
#[derive(Debug, Clone)]
pub struct RemainingRow {
    /// Course code
    pub code: String,
    /// Course title
    pub title: String,
}

/// Template context for the progress report
#[derive(Debug, Clone, Template)]
#[template(path = "progress_report.md")]
pub struct ProgressReport {
    /// Student identifier
    pub student_id: String,
    /// Student name
    pub name: String,
    /// GPA rounded for display
    pub gpa: String,
    /// Credits that counted toward GPA
    pub credits_counted: u32,
    /// Retakes across all courses
    pub total_retakes: usize,
    /// Retake total at which continuation is refused
    pub retake_cap: usize,
    /// "eligible" or "not eligible"
    pub continuation: &'static str,
    /// Course table rows
    pub rows: Vec<ReportRow>,
    /// Remaining courses
    pub remaining: Vec<RemainingRow>,
}

impl ProgressReport {
    /// Build the report context from a summary
    #[must_use]
    pub fn from_summary(summary: &ProgressSummary, catalog: &Catalog) -> Self {
        let rows: Vec<ReportRow> = summary
            .courses
            .iter()
            .map(|standing| ReportRow {
                code: standing.course_id.clone(),
                title: standing.title.clone(),
                credits: standing.credits,
                marks: standing
                    .marks
                    .map_or_else(|| "-".to_string(), |m| m.to_string()),
                grade: standing
                    .grade
                    .map_or_else(|| "-".to_string(), |g| g.to_string()),
                retakes: standing.retakes,
                status: if standing.passed {
                    "passed"
                } else if standing.state == crate::core::engine::RecordState::RetakeExhausted {
                    "retakes exhausted"
                } else {
                    "in progress"
                },
            })
            .collect();

        let credits_counted = summary
            .courses
            .iter()
            .filter(|s| s.grade.is_some_and(crate::core::models::Grade::counts_toward_gpa))
            .map(|s| s.credits)
            .sum();

        let remaining = summary
            .remaining
            .iter()
            .map(|code| RemainingRow {
                code: code.clone(),
                title: catalog
                    .find(code)
                    .map(|c| c.title.clone())
                    .unwrap_or_default(),
            })
            .collect();

        Self {
            student_id: summary.student_id.clone(),
            name: summary.name.clone(),
            gpa: summary.gpa.to_string(),
            credits_counted,
            total_retakes: summary.total_retakes,
            retake_cap: CONTINUATION_RETAKE_CAP,
            continuation: if summary.continuation_eligible {
                "eligible"
            } else {
                "not eligible"
            },
            rows,
            remaining,
        }
    }

    /// Render the report to Markdown
    ///
    /// # Errors
    /// Returns `Render` if the template fails
    pub fn to_markdown(&self) -> EngineResult<String> {
        Ok(self.render()?)
    }

    /// Render the report and write it to a file
    ///
    /// # Errors
    /// Returns `Render` or `Storage` on failure
    pub fn write_to(&self, path: &Path) -> EngineResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, self.to_markdown()?)?;
        crate::info!(target: "report", "Progress report written to {}", path.display());
        Ok(())
    }
}
