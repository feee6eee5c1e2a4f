//! Error types for study-planner operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlannerError {
    /// The target has nothing to schedule (no page count, or a deadline that
    /// is not in the future). The top-level planner turns this into an empty
    /// plan rather than surfacing it.
    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid time of day: {0}")]
    InvalidTimeOfDay(String),

    #[error("Invalid RRULE: {0}")]
    InvalidRule(String),

    #[error("Invalid request JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// A configuration value parsed but lies outside the range the planner
    /// can compute with.
    #[error("Invalid configuration value: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PlannerError>;
