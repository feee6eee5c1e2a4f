//! # study-planner
//!
//! Adaptive study-plan generation around a user's existing calendar.
//!
//! Given a study target (a page count and a deadline), the planner finds free
//! time inside the user's daily study window, cuts it into bounded sessions,
//! spreads the pages over them, and schedules spaced-repetition reviews. The
//! computation is pure: busy intervals and preferences are read through
//! query traits, and "now" is injected, so identical inputs give identical
//! plans.
//!
//! ## Quick start
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use study_planner::{FixedClock, InMemoryDirectory, StudyPlanner, StudyTarget, UserTimePreferences};
//!
//! let directory = InMemoryDirectory::new().with_preferences("u1", UserTimePreferences::default());
//! let now = Utc.with_ymd_and_hms(2026, 3, 2, 7, 0, 0).unwrap();
//! let planner = StudyPlanner::with_clock(&directory, &directory, FixedClock(now));
//!
//! let target = StudyTarget::new("exam", 40, Utc.with_ymd_and_hms(2026, 3, 3, 0, 0, 0).unwrap());
//! let plan = planner.generate(&target, "u1").unwrap();
//! assert_eq!(plan.sessions[0].note, "Initial study");
//! assert_eq!(plan.sessions[0].pages_from, 1);
//! ```
//!
//! ## Modules
//!
//! - [`interval`] -- Subtract busy time from a horizon, clip to the daily window
//! - [`partition`] -- Cut free time into bounded sessions; fallback synthesis
//! - [`allocator`] -- Spread a page budget over sessions, with overflow
//! - [`review`] -- Spaced-repetition review placement
//! - [`planner`] -- Pipeline orchestration and plan assembly
//! - [`preferences`] -- User preferences and study-window resolution
//! - [`commitments`] -- RRULE expansion of recurring commitments
//! - [`source`] -- Read-only store interfaces and an in-memory directory
//! - [`clock`] -- Injectable current time
//! - [`config`] -- Tunable constants, loadable from TOML
//! - [`request`] -- Self-contained JSON planning request
//! - [`error`] -- Error types

pub mod allocator;
pub mod clock;
pub mod commitments;
pub mod config;
pub mod error;
pub mod interval;
pub mod partition;
pub mod planner;
pub mod preferences;
pub mod request;
pub mod review;
pub mod source;
pub mod types;

pub use allocator::{allocate_pages, Allocation};
pub use clock::{Clock, FixedClock, SystemClock};
pub use commitments::RecurringCommitment;
pub use config::PlannerConfig;
pub use error::PlannerError;
pub use interval::{intersect_with_daily_window, subtract_intervals};
pub use partition::{split_into_sessions, SessionBounds};
pub use planner::{assemble_plan, generate_adaptive_study_plan, StudyPlanner};
pub use preferences::{StudyWindow, UserTimePreferences};
pub use request::PlanRequest;
pub use review::schedule_reviews;
pub use source::{BusyIntervalSource, InMemoryDirectory, PreferenceSource};
pub use types::{
    BusyInterval, CandidateSession, SessionKind, StudyPlan, StudySession, StudyTarget, TimeInterval,
};
