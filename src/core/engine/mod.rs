//! Academic progress rules
//!
//! - [`aggregate`]: picks the best attempt of a course record
//! - [`gpa`]: folds best attempts into a credit-weighted GPA
//! - [`validator`]: gates original assignments, retakes, corrections and deletions
//! - [`resolver`]: derives remaining courses and continuation eligibility
//!
//! The rules are pure functions over a [`Student`](crate::core::models::Student)
//! and a [`Catalog`](crate::core::catalog::Catalog); persistence lives in
//! [`store`](crate::core::store).

pub mod aggregate;
pub mod gpa;
pub mod resolver;
pub mod validator;

pub use aggregate::{best_attempt, is_passed, BestAttempt, RETAKE_DISPLAY_MARKS_CAP};
pub use gpa::{compute_gpa, refresh_gpa, Gpa};
pub use resolver::{
    continuation_eligible, first_unmet_prerequisite, remaining_courses, total_retakes,
    CourseStanding, ProgressSummary, CONTINUATION_RETAKE_CAP,
};
pub use validator::{
    append_retake, assign_original, correct_original, delete_record, record_state, RecordState,
};
