//! Recurring commitments -- expands RRULE-based events into busy intervals.
//!
//! Wraps the `rrule` crate (v0.13) and `chrono-tz` so weekly lectures, shifts,
//! and similar fixed schedules block study time without the caller expanding
//! them first.

use chrono::{DateTime, Duration, Utc};
use rrule::RRuleSet;
use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};
use crate::types::{BusyInterval, TimeInterval};

/// Upper bound on instances expanded per commitment when no COUNT is given.
const MAX_INSTANCES: u16 = 500;

/// A commitment that repeats according to an RFC 5545 RRULE.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringCommitment {
    /// RRULE body, e.g. `"FREQ=WEEKLY;BYDAY=MO,WE"`.
    pub rrule: String,
    /// Local start of the first instance, e.g. `"2026-03-02T10:00:00"`.
    pub dtstart: String,
    pub duration_minutes: u32,
    /// IANA timezone the local times are expressed in.
    pub timezone: String,
    /// Optional local end boundary for expansion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub until: Option<String>,
    /// Optional cap on instances; overrides COUNT in the rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    /// Local start times of skipped instances.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exdates: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl RecurringCommitment {
    pub fn new(
        rrule: impl Into<String>,
        dtstart: impl Into<String>,
        duration_minutes: u32,
        timezone: impl Into<String>,
    ) -> Self {
        Self {
            rrule: rrule.into(),
            dtstart: dtstart.into(),
            duration_minutes,
            timezone: timezone.into(),
            until: None,
            count: None,
            exdates: Vec::new(),
            label: None,
        }
    }

    /// Expand every instance into a busy interval.
    ///
    /// # Errors
    /// Returns `PlannerError::InvalidRule` if the RRULE is empty or unparseable.
    /// Returns `PlannerError::InvalidTimezone` if the timezone is not a valid
    /// IANA identifier.
    pub fn expand(&self) -> Result<Vec<BusyInterval>> {
        if self.rrule.trim().is_empty() {
            return Err(PlannerError::InvalidRule("empty RRULE string".to_string()));
        }
        if self.count == Some(0) {
            return Ok(Vec::new());
        }

        let _tz: chrono_tz::Tz = self
            .timezone
            .parse()
            .map_err(|_| PlannerError::InvalidTimezone(self.timezone.clone()))?;

        let rule_text = self.ical_text();
        let rrule_set: RRuleSet = rule_text
            .parse()
            .map_err(|e| PlannerError::InvalidRule(format!("{}", e)))?;

        // `.all(limit)` caps before EXDATE filtering, so leave room for them.
        let exdate_buffer = u16::try_from(self.exdates.len()).unwrap_or(u16::MAX);
        let limit = self
            .count
            .map(|c| u16::try_from(c).unwrap_or(u16::MAX).saturating_add(exdate_buffer))
            .unwrap_or(MAX_INSTANCES);

        let duration = Duration::minutes(i64::from(self.duration_minutes));
        let mut busy: Vec<BusyInterval> = rrule_set
            .all(limit)
            .dates
            .into_iter()
            .filter_map(|dt| {
                let start: DateTime<Utc> = dt.with_timezone(&Utc);
                Some(BusyInterval {
                    start,
                    end: start.checked_add_signed(duration)?,
                    label: self.label.clone(),
                })
            })
            .collect();

        if let Some(c) = self.count {
            busy.truncate(c as usize);
        }

        Ok(busy)
    }

    /// Expand and keep only the instances overlapping `horizon`.
    pub fn expand_within(&self, horizon: &TimeInterval) -> Result<Vec<BusyInterval>> {
        Ok(self
            .expand()?
            .into_iter()
            .filter(|b| b.interval().overlaps(horizon))
            .collect())
    }

    /// DTSTART/RRULE/EXDATE block in iCalendar syntax, with COUNT and UNTIL
    /// injected when the rule does not already carry them.
    fn ical_text(&self) -> String {
        let mut rule = self.rrule.trim().to_string();
        let upper = rule.to_uppercase();

        if let Some(c) = self.count {
            if !upper.contains("COUNT=") {
                rule = format!("{};COUNT={}", rule, c);
            }
        }

        // UNTIL must share DTSTART's timezone; UTC needs a trailing "Z".
        if let Some(until) = &self.until {
            if !upper.contains("UNTIL=") {
                let mut until_ical = to_ical_local(until);
                if self.timezone == "UTC" {
                    until_ical.push('Z');
                }
                rule = format!("{};UNTIL={}", rule, until_ical);
            }
        }

        let mut text = format!(
            "DTSTART;TZID={}:{}\nRRULE:{}",
            self.timezone,
            to_ical_local(&self.dtstart),
            rule
        );

        if !self.exdates.is_empty() {
            let exdates: Vec<String> = self.exdates.iter().map(|d| to_ical_local(d)).collect();
            text.push_str(&format!("\nEXDATE;TZID={}:{}", self.timezone, exdates.join(",")));
        }

        text
    }
}

/// "2026-02-17T14:00:00" -> "20260217T140000"
fn to_ical_local(local: &str) -> String {
    local.replace(['-', ':'], "")
}

/// Expand a batch of commitments into one chronologically sorted busy list.
pub fn expand_all(commitments: &[RecurringCommitment]) -> Result<Vec<BusyInterval>> {
    let mut busy = Vec::new();
    for commitment in commitments {
        busy.extend(commitment.expand()?);
    }
    busy.sort_by_key(|b| (b.start, b.end));
    Ok(busy)
}
