//! Tunable constants of the planning pipeline, loadable from TOML.
//!
//! Every field has a default, and the defaults reproduce the stock planner
//! behavior. A config file only needs to name the values it overrides:
//!
//! ```toml
//! [sessions]
//! break_minutes = 10
//!
//! [review]
//! offsets_days = [1, 3, 7, 14]
//! ```

use std::path::Path;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};
use crate::preferences::time_of_day;

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Longest review offset accepted, about ten years.
pub const MAX_REVIEW_OFFSET_DAYS: u32 = 3650;

/// Most fallback days accepted.
pub const MAX_FALLBACK_DAYS: usize = 366;

/// Session length bounds and the break inserted between back-to-back sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub break_minutes: i64,
    /// Used when the user has no preferred minimum.
    pub default_min_minutes: u32,
    /// Used when the user has no preferred maximum.
    pub default_max_minutes: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            break_minutes: 5,
            default_min_minutes: 30,
            default_max_minutes: 120,
        }
    }
}

/// Study window used when neither the study window nor wake/sleep times are set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    #[serde(with = "time_of_day")]
    pub default_start: NaiveTime,
    #[serde(with = "time_of_day")]
    pub default_end: NaiveTime,
    /// IANA timezone for users without one.
    pub default_timezone: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            default_start: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN),
            default_end: NaiveTime::from_hms_opt(22, 0, 0).unwrap_or(NaiveTime::MIN),
            default_timezone: "UTC".to_string(),
        }
    }
}

/// Synthesized sessions for calendars with no usable free time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    /// Upper bound on synthesized slots, one per calendar day.
    pub max_days: usize,
    pub slot_minutes: i64,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            max_days: 7,
            slot_minutes: 60,
        }
    }
}

/// Pages-per-minute heuristic and overflow session sizing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationConfig {
    pub min_rate: f64,
    pub max_rate: f64,
    /// Floor on the denominator of the rate so a tiny horizon cannot
    /// inflate the rate.
    pub min_total_minutes: i64,
    pub overflow_max_pages: u32,
    pub overflow_max_minutes: i64,
    pub overflow_minutes_per_page: i64,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            min_rate: 0.2,
            max_rate: 2.0,
            min_total_minutes: 60,
            overflow_max_pages: 10,
            overflow_max_minutes: 60,
            overflow_minutes_per_page: 2,
        }
    }
}

/// Spaced-repetition offsets, in days after each initial session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    pub offsets_days: Vec<u32>,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            offsets_days: vec![2, 4, 7],
        }
    }
}

/// Planner configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub sessions: SessionConfig,
    pub window: WindowConfig,
    pub fallback: FallbackConfig,
    pub allocation: AllocationConfig,
    pub review: ReviewConfig,
}

impl PlannerConfig {
    /// Parse a TOML document. Missing sections and keys keep their defaults.
    ///
    /// # Errors
    /// Returns `PlannerError::Config` for malformed TOML and
    /// `PlannerError::InvalidConfig` for values that fail [`validate`].
    ///
    /// [`validate`]: PlannerConfig::validate
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// Check that every value is in a range the pipeline can compute with.
    ///
    /// Minute values are capped at one day, review offsets at
    /// [`MAX_REVIEW_OFFSET_DAYS`], and fallback days at [`MAX_FALLBACK_DAYS`].
    /// Rates must be finite with `0 < min_rate <= max_rate`.
    pub fn validate(&self) -> Result<()> {
        let minutes = [
            ("sessions.break_minutes", self.sessions.break_minutes, 0),
            ("fallback.slot_minutes", self.fallback.slot_minutes, 1),
            ("allocation.overflow_max_minutes", self.allocation.overflow_max_minutes, 1),
            (
                "allocation.overflow_minutes_per_page",
                self.allocation.overflow_minutes_per_page,
                0,
            ),
        ];
        for (name, value, min) in minutes {
            if value < min || value > MINUTES_PER_DAY {
                return Err(PlannerError::InvalidConfig(format!(
                    "'{}' must be in [{}, {}], got {}",
                    name, min, MINUTES_PER_DAY, value
                )));
            }
        }

        if self.allocation.min_total_minutes < 0 {
            return Err(PlannerError::InvalidConfig(format!(
                "'allocation.min_total_minutes' must not be negative, got {}",
                self.allocation.min_total_minutes
            )));
        }

        let (min_rate, max_rate) = (self.allocation.min_rate, self.allocation.max_rate);
        if !(min_rate.is_finite() && max_rate.is_finite() && min_rate > 0.0 && min_rate <= max_rate)
        {
            return Err(PlannerError::InvalidConfig(format!(
                "rates must satisfy 0 < min_rate <= max_rate, got {} and {}",
                min_rate, max_rate
            )));
        }

        if self.fallback.max_days > MAX_FALLBACK_DAYS {
            return Err(PlannerError::InvalidConfig(format!(
                "'fallback.max_days' must be at most {}, got {}",
                MAX_FALLBACK_DAYS, self.fallback.max_days
            )));
        }

        if let Some(offset) = self
            .review
            .offsets_days
            .iter()
            .find(|d| **d > MAX_REVIEW_OFFSET_DAYS)
        {
            return Err(PlannerError::InvalidConfig(format!(
                "'review.offsets_days' entries must be at most {}, got {}",
                MAX_REVIEW_OFFSET_DAYS, offset
            )));
        }

        Ok(())
    }
}
