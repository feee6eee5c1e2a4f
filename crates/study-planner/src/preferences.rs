//! User time preferences and their resolution into a concrete study window.
//!
//! Preferences arrive with any field possibly unset. Resolution falls back in
//! this order: explicit study window, then wake/sleep times, then the
//! configured defaults. Session bounds fall back to the configured defaults
//! when unset or zero.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::config::PlannerConfig;
use crate::error::{PlannerError, Result};
use crate::partition::SessionBounds;
use crate::types::TimeInterval;

/// Per-user scheduling preferences as stored by the profile service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserTimePreferences {
    #[serde(default, with = "option_time_of_day", skip_serializing_if = "Option::is_none")]
    pub study_window_start: Option<NaiveTime>,
    #[serde(default, with = "option_time_of_day", skip_serializing_if = "Option::is_none")]
    pub study_window_end: Option<NaiveTime>,
    #[serde(default, with = "option_time_of_day", skip_serializing_if = "Option::is_none")]
    pub wake_time: Option<NaiveTime>,
    #[serde(default, with = "option_time_of_day", skip_serializing_if = "Option::is_none")]
    pub sleep_time: Option<NaiveTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_min_session_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_max_session_minutes: Option<u32>,
    /// IANA timezone name (e.g., "Europe/Sofia").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl UserTimePreferences {
    /// Resolve the daily study window.
    ///
    /// # Errors
    /// Returns `PlannerError::InvalidTimezone` if the timezone (or the
    /// configured default) is not a valid IANA identifier.
    pub fn study_window(&self, config: &PlannerConfig) -> Result<StudyWindow> {
        let timezone = self
            .timezone
            .as_deref()
            .unwrap_or(&config.window.default_timezone);
        let tz: Tz = timezone
            .parse()
            .map_err(|_| PlannerError::InvalidTimezone(timezone.to_string()))?;

        let start = self
            .study_window_start
            .or(self.wake_time)
            .unwrap_or(config.window.default_start);
        let end = self
            .study_window_end
            .or(self.sleep_time)
            .unwrap_or(config.window.default_end);

        Ok(StudyWindow { start, end, tz })
    }

    /// Resolve min/max session length. Zero counts as unset.
    pub fn session_bounds(&self, config: &PlannerConfig) -> SessionBounds {
        let min = self
            .preferred_min_session_minutes
            .filter(|m| *m > 0)
            .unwrap_or(config.sessions.default_min_minutes);
        let max = self
            .preferred_max_session_minutes
            .filter(|m| *m > 0)
            .unwrap_or(config.sessions.default_max_minutes);

        SessionBounds::new(i64::from(min), i64::from(max))
            .with_break(config.sessions.break_minutes)
    }
}

/// A recurring daily time-of-day range, anchored to a timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StudyWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub tz: Tz,
}

impl StudyWindow {
    pub fn new(start: NaiveTime, end: NaiveTime, tz: Tz) -> Self {
        Self { start, end, tz }
    }

    /// Window in UTC, anchored at midnight UTC.
    pub fn utc(start: NaiveTime, end: NaiveTime) -> Self {
        Self::new(start, end, Tz::UTC)
    }

    /// Calendar date of an instant in this window's timezone.
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.tz).date_naive()
    }

    /// The instant the window opens on the given local date.
    pub fn start_on(&self, day: NaiveDate) -> Option<DateTime<Utc>> {
        resolve_local(&self.tz, day.and_time(self.start))
    }

    /// The window on the given local date. A window whose end precedes its
    /// start closes on the following day. Equal start and end give no window.
    pub fn on(&self, day: NaiveDate) -> Option<TimeInterval> {
        let start = self.start_on(day)?;
        let end_day = if self.end < self.start {
            day.succ_opt()?
        } else {
            day
        };
        let end = resolve_local(&self.tz, end_day.and_time(self.end))?;
        (end > start).then(|| TimeInterval::new(start, end))
    }
}

/// Map a local wall-clock time to UTC. Ambiguous times take the earlier
/// instant; times inside a DST gap shift forward one hour.
fn resolve_local(tz: &Tz, local: NaiveDateTime) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&local)
        .earliest()
        .or_else(|| {
            let shifted = local.checked_add_signed(Duration::hours(1))?;
            tz.from_local_datetime(&shifted).earliest()
        })
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parse `HH:MM` or `HH:MM:SS`.
///
/// # Errors
/// Returns `PlannerError::InvalidTimeOfDay` for anything else.
pub fn parse_time_of_day(raw: &str) -> Result<NaiveTime> {
    let trimmed = raw.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .map_err(|_| PlannerError::InvalidTimeOfDay(raw.to_string()))
}

/// Serde adapter for `NaiveTime` as `"HH:MM"`.
pub mod time_of_day {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_time_of_day(&raw).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for `Option<NaiveTime>` as `"HH:MM"` or null.
pub mod option_time_of_day {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        time: &Option<NaiveTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match time {
            Some(t) => super::time_of_day::serialize(t, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        raw.map(|s| super::parse_time_of_day(&s).map_err(serde::de::Error::custom))
            .transpose()
    }
}
