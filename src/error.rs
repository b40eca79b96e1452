//! Error taxonomy for timetabling.
//!
//! | Error | Raised by | Fatal |
//! |-------|-----------|-------|
//! | `InvalidCredits` | time grid | yes |
//! | `InvalidTimeFormat` | `TimeOfDay` parsing | yes |
//! | `InfeasibleGrid` | grid generation | yes |
//! | `PartialAssignmentFailure` | greedy assigner, optimizer | caller decides |
//! | `Validation` | input validation | yes |
//! | `Document` | problem document parsing | yes |
//!
//! Rejected MOVE/SWAP candidates during search are ordinary control flow
//! and never surface as errors.

use thiserror::Error;

use crate::validation::ValidationError;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TimetableError>;

/// Errors produced by the timetabling core.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TimetableError {
    /// A non-positive credit count reached the time grid.
    #[error("invalid credit count {credits} for {context} (must be positive)")]
    InvalidCredits { context: String, credits: i32 },

    /// A time-of-day string is not `HH:MM`.
    #[error("invalid time of day '{0}' (expected HH:MM)")]
    InvalidTimeFormat(String),

    /// The configuration yields no usable start times.
    #[error("infeasible time grid: {0}")]
    InfeasibleGrid(String),

    /// The greedy assigner left courses without a slot.
    #[error("{} course(s) could not be placed: {}", unplaced.len(), unplaced.join(", "))]
    PartialAssignmentFailure { unplaced: Vec<String> },

    /// Input records failed load-time checks.
    #[error("input validation failed: {}", format_validation(.0))]
    Validation(Vec<ValidationError>),

    /// A problem document could not be parsed or written.
    #[error("invalid problem document: {0}")]
    Document(String),
}

fn format_validation(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
