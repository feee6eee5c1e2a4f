//! Spaced-repetition review placement.
//!
//! Each initial session gets one review per configured day offset. A review
//! takes the first candidate slot that starts on or after its anchor
//! (`session.start + offset days`). When the anchor lies past every candidate,
//! the review falls back to the last candidate that starts before the
//! deadline. Reviews are allowed to share slots with each other and with
//! initial sessions.

use chrono::{DateTime, Duration, Utc};

use crate::types::{CandidateSession, SessionKind, StudySession};

/// Offsets used when no configuration overrides them.
pub const DEFAULT_REVIEW_OFFSETS_DAYS: [u32; 3] = [2, 4, 7];

/// Schedule reviews for `initial` sessions at the stock offsets.
pub fn schedule_reviews(
    initial: &[StudySession],
    candidates: &[CandidateSession],
    deadline: DateTime<Utc>,
) -> Vec<StudySession> {
    schedule_reviews_at(initial, candidates, deadline, &DEFAULT_REVIEW_OFFSETS_DAYS)
}

/// Schedule reviews at the given day offsets. `candidates` must be in
/// chronological order.
pub fn schedule_reviews_at(
    initial: &[StudySession],
    candidates: &[CandidateSession],
    deadline: DateTime<Utc>,
    offsets_days: &[u32],
) -> Vec<StudySession> {
    let fallback = candidates.iter().rev().find(|c| c.start < deadline);
    let mut reviews = Vec::with_capacity(initial.len() * offsets_days.len());

    for session in initial {
        for &offset_days in offsets_days {
            // An anchor past the representable range lies after every slot.
            let anchor = Duration::try_days(i64::from(offset_days))
                .and_then(|offset| session.start.checked_add_signed(offset));
            let next_slot = anchor.and_then(|a| candidates.iter().find(|c| c.start >= a));
            let placed = match next_slot {
                Some(slot) => Some((slot, SessionKind::Review { offset_days })),
                None => fallback.map(|slot| (slot, SessionKind::ReviewFallback { offset_days })),
            };

            match placed {
                Some((slot, kind)) => reviews.push(StudySession::new(
                    slot.start,
                    slot.end,
                    session.pages_from,
                    session.pages_to,
                    kind,
                )),
                None => tracing::trace!(offset_days, "no slot for review"),
            }
        }
    }

    reviews
}
