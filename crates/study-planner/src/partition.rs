//! Split free time into bounded study sessions.

use chrono::{DateTime, Duration, Utc};

use crate::config::FallbackConfig;
use crate::preferences::StudyWindow;
use crate::types::{CandidateSession, TimeInterval};

/// Minimum and maximum session length plus the break between cut sessions,
/// all in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionBounds {
    pub min_minutes: i64,
    pub max_minutes: i64,
    pub break_minutes: i64,
}

impl SessionBounds {
    pub const DEFAULT_BREAK_MINUTES: i64 = 5;

    /// Build bounds, swapping `min` and `max` if they arrive inverted.
    /// `max` is at least one minute and `min` is never negative.
    pub fn new(min_minutes: i64, max_minutes: i64) -> Self {
        let (min, max) = if min_minutes > max_minutes {
            (max_minutes, min_minutes)
        } else {
            (min_minutes, max_minutes)
        };
        Self {
            min_minutes: min.max(0),
            max_minutes: max.max(1),
            break_minutes: Self::DEFAULT_BREAK_MINUTES,
        }
    }

    pub fn with_break(mut self, break_minutes: i64) -> Self {
        self.break_minutes = break_minutes.max(0);
        self
    }
}

impl Default for SessionBounds {
    fn default() -> Self {
        Self::new(30, 120)
    }
}

/// Split one free interval into sessions no longer than `max_minutes`.
///
/// An interval that already fits becomes a single session, even when it is
/// shorter than `min_minutes`. Longer intervals are cut into `max_minutes`
/// pieces separated by a break; the final remainder survives only if it is at
/// least `min_minutes` long. Non-positive durations give nothing.
pub fn split_into_sessions(
    interval: &TimeInterval,
    bounds: SessionBounds,
) -> Vec<CandidateSession> {
    let duration = interval.duration_minutes();
    if duration <= 0 {
        return Vec::new();
    }
    if duration <= bounds.max_minutes {
        return vec![CandidateSession::from(*interval)];
    }

    let Some(max) = Duration::try_minutes(bounds.max_minutes) else {
        return vec![CandidateSession::from(*interval)];
    };
    // A break too long to represent ends the interval after the first cut.
    let pause = Duration::try_minutes(bounds.break_minutes).unwrap_or_else(Duration::max_value);
    let mut sessions = Vec::new();
    let mut cursor = interval.start;

    while cursor < interval.end {
        let cut = cursor.checked_add_signed(max).filter(|cut| *cut < interval.end);
        if let Some(cut) = cut {
            sessions.push(CandidateSession::from(TimeInterval::new(cursor, cut)));
            cursor = match cut.checked_add_signed(pause) {
                Some(next) => next,
                None => break,
            };
        } else {
            let remainder = (interval.end - cursor).num_minutes();
            if remainder >= bounds.min_minutes {
                sessions.push(CandidateSession::from(TimeInterval::new(cursor, interval.end)));
            }
            break;
        }
    }

    sessions
}

/// Split every free interval, keeping chronological order.
pub fn candidate_sessions(free: &[TimeInterval], bounds: SessionBounds) -> Vec<CandidateSession> {
    free.iter()
        .flat_map(|slot| split_into_sessions(slot, bounds))
        .collect()
}

/// Synthesize sessions for a calendar with no usable free time.
///
/// Walks one calendar day at a time from `planning_start` while the cursor has
/// not passed `planning_end`, placing a fixed-length slot at each day's window
/// start. A day only counts if its slot starts after `now`. At most
/// `fallback.max_days` slots are produced; each is then run through the
/// splitter and marked as synthesized.
pub fn synthesize_fallback_sessions(
    planning_start: DateTime<Utc>,
    planning_end: DateTime<Utc>,
    now: DateTime<Utc>,
    window: &StudyWindow,
    bounds: SessionBounds,
    fallback: &FallbackConfig,
) -> Vec<CandidateSession> {
    let Some(slot_length) = Duration::try_minutes(fallback.slot_minutes) else {
        tracing::debug!(slot_minutes = fallback.slot_minutes, "fallback slot length out of range");
        return Vec::new();
    };
    let mut slots = Vec::new();
    let mut cursor = planning_start;
    let mut day = window.local_date(cursor);

    while cursor <= planning_end && slots.len() < fallback.max_days {
        if let Some(start) = window.start_on(day).filter(|start| *start > now) {
            if let Some(end) = start.checked_add_signed(slot_length) {
                slots.push(TimeInterval::new(start, end));
            }
        }
        day = match day.succ_opt() {
            Some(next) => next,
            None => break,
        };
        cursor = match cursor.checked_add_signed(Duration::days(1)) {
            Some(next) => next,
            None => break,
        };
    }

    tracing::debug!(slots = slots.len(), "synthesized fallback slots");

    slots
        .iter()
        .flat_map(|slot| split_into_sessions(slot, bounds))
        .map(|session| CandidateSession {
            synthesized: true,
            ..session
        })
        .collect()
}
