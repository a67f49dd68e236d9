//! CLI command handlers for `academic-progress`.
//!
//! Each command is implemented in its own submodule. Handlers print results
//! to stdout and exit non-zero on any engine error.

pub mod catalog;
pub mod config;
pub mod progress;
pub mod record;
pub mod report;
pub mod student;

use academic_progress::core::store::JsonStore;
use academic_progress::{EngineError, ProgressService};

/// Service type the CLI operates on
pub type Service = ProgressService<JsonStore>;

/// Print an engine error and exit with status 1
pub fn fail(err: &EngineError) -> ! {
    eprintln!("✗ {err}");
    if err.is_retryable() {
        eprintln!("  The student was changed by another process; re-run the command.");
    }
    std::process::exit(1);
}

/// Unwrap an engine result or exit via [`fail`]
pub fn check<T>(result: Result<T, EngineError>) -> T {
    result.unwrap_or_else(|e| fail(&e))
}
