//! Greedy page allocation over candidate sessions.
//!
//! Pages are handed out in chronological order at a bounded pages-per-minute
//! rate. When the rate underestimates demand, a second pass appends short
//! overflow sessions right after the candidates until the budget runs out or
//! the candidates do.

use chrono::Duration;

use crate::config::AllocationConfig;
use crate::types::{CandidateSession, SessionKind, StudySession};

/// Result of distributing a page budget.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Allocation {
    pub initial: Vec<StudySession>,
    pub overflow: Vec<StudySession>,
    /// Pages left over after both passes. Not an error; they are simply not
    /// scheduled.
    pub unscheduled_pages: u32,
    /// The pages-per-minute rate used for the first pass.
    pub rate: f64,
}

/// Allocate with the stock rate bounds and overflow sizing.
pub fn allocate_pages(candidates: &[CandidateSession], total_pages: u32) -> Allocation {
    allocate_pages_with(candidates, total_pages, &AllocationConfig::default())
}

/// Distribute `total_pages` across `candidates` (which must be in
/// chronological order).
pub fn allocate_pages_with(
    candidates: &[CandidateSession],
    total_pages: u32,
    policy: &AllocationConfig,
) -> Allocation {
    if candidates.is_empty() || total_pages == 0 {
        return Allocation {
            unscheduled_pages: total_pages,
            ..Allocation::default()
        };
    }

    let durations: Vec<i64> = candidates
        .iter()
        .map(|c| c.duration_minutes().max(1))
        .collect();
    let total_minutes: i64 = durations.iter().sum();
    let rate = pages_per_minute(total_pages, total_minutes, policy);

    // Pages handed out so far; the next session starts at `assigned + 1`.
    let mut initial = Vec::new();
    let mut assigned: u32 = 0;

    for (candidate, minutes) in candidates.iter().zip(&durations) {
        let pages = ((*minutes as f64) * rate).round().max(1.0) as u32;
        let pages = pages.min(total_pages - assigned);

        initial.push(StudySession::new(
            candidate.start,
            candidate.end,
            assigned + 1,
            assigned + pages,
            SessionKind::Initial,
        ));
        assigned += pages;
        if assigned == total_pages {
            break;
        }
    }

    let mut overflow = Vec::new();
    for candidate in candidates {
        if assigned == total_pages {
            break;
        }
        let extra = policy.overflow_max_pages.max(1).min(total_pages - assigned);
        let minutes = policy
            .overflow_max_minutes
            .min(i64::from(extra).saturating_mul(policy.overflow_minutes_per_page));
        let Some(end) = Duration::try_minutes(minutes)
            .and_then(|length| candidate.end.checked_add_signed(length))
        else {
            tracing::debug!(minutes, "overflow session out of range, skipping");
            continue;
        };
        overflow.push(StudySession::new(
            candidate.end,
            end,
            assigned + 1,
            assigned + extra,
            SessionKind::Overflow,
        ));
        assigned += extra;
    }

    let unscheduled_pages = total_pages - assigned;
    if unscheduled_pages > 0 {
        tracing::debug!(unscheduled_pages, "page budget exceeds available sessions");
    }

    Allocation {
        initial,
        overflow,
        unscheduled_pages,
        rate,
    }
}

/// `total_pages / max(min_total_minutes, total_minutes)`, clamped to the
/// configured rate bounds.
fn pages_per_minute(total_pages: u32, total_minutes: i64, policy: &AllocationConfig) -> f64 {
    let denominator = total_minutes.max(policy.min_total_minutes).max(1) as f64;
    (f64::from(total_pages) / denominator)
        .min(policy.max_rate)
        .max(policy.min_rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_is_clamped_low() {
        let rate = pages_per_minute(1, 10_000, &AllocationConfig::default());
        assert_eq!(rate, 0.2);
    }

    #[test]
    fn rate_is_clamped_high() {
        let rate = pages_per_minute(10_000, 60, &AllocationConfig::default());
        assert_eq!(rate, 2.0);
    }

    #[test]
    fn short_horizon_uses_sixty_minute_floor() {
        // 30 pages over 15 minutes would be 2.0/min; the floor makes it 0.5.
        let rate = pages_per_minute(30, 15, &AllocationConfig::default());
        assert!((rate - 0.5).abs() < f64::EPSILON);
    }
}
