//! CLI argument definitions for `progress`

use clap::{builder::BoolishValueParser, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use academic_progress::config::ConfigOverrides;
use academic_progress::core::models::{Attempt, AttemptCorrection, Grade, Semester};
use academic_progress::logger::Level;

/// CLI log level argument
///
/// Converts to lowercase strings for config storage and to `logger::Level`
/// for runtime use.
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevelArg {
    /// Error-level logging
    Error,
    /// Warning-level logging
    Warn,
    /// Info-level logging
    Info,
    /// Debug-level logging
    Debug,
}

impl From<LogLevelArg> for Level {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
        }
    }
}

impl std::fmt::Display for LogLevelArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let as_str = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        };
        write!(f, "{as_str}")
    }
}

fn parse_grade(value: &str) -> Result<Grade, String> {
    value.parse::<Grade>().map_err(|e| e.to_string())
}

fn parse_semester(value: &str) -> Result<Semester, String> {
    value.parse::<Semester>().map_err(|e| e.to_string())
}

/// Fields of one attempt
#[derive(Debug, Clone, Args)]
pub struct AttemptArgs {
    /// Marks obtained (0-100)
    #[arg(long, allow_negative_numbers = true)]
    pub marks: i32,

    /// Letter grade (A, B, C, D, E, F or N/A)
    #[arg(long, value_parser = parse_grade)]
    pub grade: Grade,

    /// Year the attempt was taken
    #[arg(long)]
    pub year: i32,

    /// Term the attempt was taken (term-1, term-2, term-3)
    #[arg(long, value_parser = parse_semester)]
    pub semester: Semester,
}

impl From<AttemptArgs> for Attempt {
    fn from(args: AttemptArgs) -> Self {
        Self::new(args.marks, args.grade, args.year, args.semester)
    }
}

/// Fields of the original attempt to correct; omitted fields are kept
#[derive(Debug, Clone, Args)]
pub struct CorrectionArgs {
    /// Corrected marks
    #[arg(long, allow_negative_numbers = true)]
    pub marks: Option<i32>,

    /// Corrected letter grade
    #[arg(long, value_parser = parse_grade)]
    pub grade: Option<Grade>,

    /// Corrected year
    #[arg(long)]
    pub year: Option<i32>,

    /// Corrected term
    #[arg(long, value_parser = parse_semester)]
    pub semester: Option<Semester>,
}

impl From<CorrectionArgs> for AttemptCorrection {
    fn from(args: CorrectionArgs) -> Self {
        Self {
            marks: args.marks,
            grade: args.grade,
            year: args.year,
            semester: args.semester,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Display configuration values.
    ///
    /// If a KEY is provided, displays only that configuration value.
    Get {
        /// Optional configuration key to display (e.g., `level`, `data_dir`)
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },
    /// Set a configuration value.
    Set {
        /// Configuration key to set
        #[arg(value_name = "KEY")]
        key: String,
        /// Value to set
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Unset a configuration value.
    Unset {
        /// Configuration key to unset
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Reset configuration to defaults (requires confirmation).
    Reset,
}

#[derive(Debug, Subcommand)]
pub enum CatalogSubcommand {
    /// List every course with its prerequisites.
    List,
    /// Show one course and the courses it unlocks.
    Show {
        /// Course code
        #[arg(value_name = "CODE")]
        code: String,
    },
    /// Validate the catalog and report prerequisite cycles.
    Check,
}

#[derive(Debug, Subcommand)]
pub enum StudentSubcommand {
    /// Enrol a new student.
    Add {
        /// Student id (letters, digits, '-' and '_')
        #[arg(value_name = "ID")]
        id: String,
        /// Student name
        #[arg(long)]
        name: String,
        /// Programme of study
        #[arg(long, default_value = "")]
        program: String,
        /// Year of enrollment
        #[arg(long)]
        year: i32,
    },
    /// List enrolled students.
    List,
    /// Show a student's records.
    Show {
        /// Student id
        #[arg(value_name = "ID")]
        id: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum RecordSubcommand {
    /// Record the original attempt at a course (checks prerequisites).
    Assign {
        /// Student id
        #[arg(value_name = "STUDENT")]
        student: String,
        /// Course code
        #[arg(value_name = "COURSE")]
        course: String,
        #[command(flatten)]
        attempt: AttemptArgs,
    },
    /// Append a retake attempt (at most two per course).
    Retake {
        /// Student id
        #[arg(value_name = "STUDENT")]
        student: String,
        /// Course code
        #[arg(value_name = "COURSE")]
        course: String,
        #[command(flatten)]
        attempt: AttemptArgs,
    },
    /// Correct fields of the original attempt.
    Correct {
        /// Student id
        #[arg(value_name = "STUDENT")]
        student: String,
        /// Course code
        #[arg(value_name = "COURSE")]
        course: String,
        #[command(flatten)]
        correction: CorrectionArgs,
    },
    /// Delete a course record with all its attempts.
    Delete {
        /// Student id
        #[arg(value_name = "STUDENT")]
        student: String,
        /// Course code
        #[arg(value_name = "COURSE")]
        course: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    ///
    /// If no subcommand is provided, displays all configuration values.
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
    /// Inspect the course catalog.
    Catalog {
        #[command(subcommand)]
        subcommand: CatalogSubcommand,
    },
    /// Manage students.
    Student {
        #[command(subcommand)]
        subcommand: StudentSubcommand,
    },
    /// Assign, retake, correct or delete course records.
    Record {
        #[command(subcommand)]
        subcommand: RecordSubcommand,
    },
    /// Show GPA, remaining courses and continuation eligibility.
    Progress {
        /// Student id
        #[arg(value_name = "STUDENT")]
        student: String,
        /// Print the progress summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write a Markdown progress report.
    Report {
        /// Student id
        #[arg(value_name = "STUDENT")]
        student: String,
        /// Output file path (defaults to `<reports_dir>/<student>_progress.md`)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

#[derive(Parser, Debug)]
#[command(
    name = "progress",
    about = "Academic progress and eligibility engine",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    /// Set the runtime log level (error|warn|info|debug). Falls back to config if omitted.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Enable verbose output (runtime only)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Enable debug-level logging and runtime debug flag (shorthand)
    #[arg(long = "debug")]
    pub debug_flag: bool,

    /// Write runtime logs to a file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    // --- Config overrides ---
    /// Override config logging level
    #[arg(long = "config-level", value_enum)]
    pub config_level: Option<LogLevelArg>,

    /// Override config verbose flag (true/false)
    #[arg(long = "config-verbose", value_parser = BoolishValueParser::new())]
    pub config_verbose: Option<bool>,

    /// Override the student data directory
    #[arg(long = "data-dir", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Override the course catalog file
    #[arg(long = "catalog-file", value_name = "FILE")]
    pub catalog_file: Option<PathBuf>,

    /// Override the reports output directory
    #[arg(long = "reports-dir", value_name = "DIR")]
    pub reports_dir: Option<PathBuf>,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Convert CLI flags into config overrides
    ///
    /// `None` means the config value is kept.
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        let path_string = |p: &PathBuf| p.to_string_lossy().to_string();
        ConfigOverrides {
            level: self.config_level.map(|lvl| lvl.to_string()),
            file: self.log_file.as_ref().map(path_string),
            verbose: self.config_verbose,
            data_dir: self.data_dir.as_ref().map(path_string),
            catalog_file: self.catalog_file.as_ref().map(path_string),
            reports_dir: self.reports_dir.as_ref().map(path_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_display() {
        assert_eq!(LogLevelArg::Error.to_string(), "error");
        assert_eq!(LogLevelArg::Warn.to_string(), "warn");
        assert_eq!(LogLevelArg::Info.to_string(), "info");
        assert_eq!(LogLevelArg::Debug.to_string(), "debug");
    }

    #[test]
    fn test_log_level_to_logger_level() {
        assert_eq!(Level::from(LogLevelArg::Error), Level::Error);
        assert_eq!(Level::from(LogLevelArg::Debug), Level::Debug);
    }

    #[test]
    fn test_record_assign_parses_attempt() {
        let cli = Cli::try_parse_from([
            "progress", "record", "assign", "s1", "CS101", "--marks", "72", "--grade", "b",
            "--year", "2024", "--semester", "term-2",
        ])
        .expect("parse");

        match cli.command {
            Command::Record {
                subcommand: RecordSubcommand::Assign { student, course, attempt },
            } => {
                assert_eq!(student, "s1");
                assert_eq!(course, "CS101");
                let attempt = Attempt::from(attempt);
                assert_eq!(attempt.marks, 72);
                assert_eq!(attempt.grade, Grade::B);
                assert_eq!(attempt.semester, Semester::Term2);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_unrecognized_grade_is_rejected() {
        let result = Cli::try_parse_from([
            "progress", "record", "retake", "s1", "CS101", "--marks", "72", "--grade", "Z",
            "--year", "2024", "--semester", "term-1",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_correction_fields_are_optional() {
        let cli = Cli::try_parse_from([
            "progress", "record", "correct", "s1", "CS101", "--grade", "N/A",
        ])
        .expect("parse");

        match cli.command {
            Command::Record {
                subcommand: RecordSubcommand::Correct { correction, .. },
            } => {
                let correction = AttemptCorrection::from(correction);
                assert_eq!(correction.grade, Some(Grade::NotApplicable));
                assert!(correction.marks.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_to_config_overrides() {
        let cli = Cli::try_parse_from([
            "progress",
            "--config-level",
            "debug",
            "--data-dir",
            "/srv/progress",
            "--log-file",
            "/tmp/progress.log",
            "catalog",
            "list",
        ])
        .expect("parse");

        let overrides = cli.to_config_overrides();
        assert_eq!(overrides.level, Some("debug".to_string()));
        assert_eq!(overrides.data_dir, Some("/srv/progress".to_string()));
        assert_eq!(overrides.file, Some("/tmp/progress.log".to_string()));
        assert!(overrides.catalog_file.is_none());
        assert!(overrides.reports_dir.is_none());
    }
}
