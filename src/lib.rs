//! OINP Score - eligibility estimator for Ontario nomination streams
//!
//! This library scores a candidate profile against the provincial point grids,
//! estimates a federal CRS score for Express Entry streams, and proposes
//! concrete changes that would raise the score.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{
    compute_score, estimate_crs, express_entry_status, generate_suggestions, refresh_crs,
    Evaluation, Evaluator, ProfileSession,
};
pub use crate::models::{ExpressEntryStatus, Profile, ScoreResult, Stream, Suggestion};
