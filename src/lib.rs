//! Academic progress and eligibility engine
//!
//! Turns a student's course-attempt history into a GPA, gates new course
//! assignments behind prerequisites and a retake cap, and derives the
//! remaining-courses list and continuation eligibility. Used by the
//! `progress` CLI and embeddable behind any [`Persistence`] store.

pub mod core;
pub mod logger;

pub use crate::core::catalog::Catalog;
pub use crate::core::config;
pub use crate::core::error::{EngineError, EngineResult, Entity};
pub use crate::core::get_version;
pub use crate::core::service::ProgressService;
pub use crate::core::store::Persistence;
