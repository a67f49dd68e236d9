//! Core module: domain models, rules engine, persistence and reporting

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod report;
pub mod service;
pub mod store;

/// Returns the current version of the `academic-progress` crate
#[must_use]
pub const fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
