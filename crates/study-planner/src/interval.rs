//! Interval algebra over calendar time.
//!
//! Subtracts busy commitments from a planning horizon, then restricts what is
//! left to the user's daily study window.

use crate::preferences::StudyWindow;
use crate::types::{BusyInterval, TimeInterval};

/// Remove every busy interval from the horizon.
///
/// Each busy interval, taken in chronological order, splits the free pieces it
/// overlaps into the part before its start and the part after its end. Fully
/// covered pieces disappear; busy intervals that touch nothing change nothing.
/// Zero-length and inverted busy intervals are ignored.
///
/// The result is not sorted. A degenerate horizon yields no free time.
pub fn subtract_intervals(horizon: &TimeInterval, busy: &[BusyInterval]) -> Vec<TimeInterval> {
    if horizon.is_degenerate() {
        return Vec::new();
    }

    let mut ordered: Vec<TimeInterval> = busy
        .iter()
        .map(BusyInterval::interval)
        .filter(|b| !b.is_degenerate())
        .collect();
    ordered.sort_by_key(|b| (b.start, b.end));

    let mut free = vec![*horizon];
    for b in &ordered {
        let mut remaining = Vec::with_capacity(free.len() + 1);
        for slot in free {
            if !slot.overlaps(b) {
                remaining.push(slot);
                continue;
            }
            if b.start > slot.start {
                remaining.push(TimeInterval::new(slot.start, b.start));
            }
            if b.end < slot.end {
                remaining.push(TimeInterval::new(b.end, slot.end));
            }
        }
        free = remaining;
    }

    free
}

/// Clip free intervals to the daily study window.
///
/// Every calendar day (in the window's timezone) that a free interval touches
/// contributes the overlap between the interval and that day's window, if the
/// overlap has positive length. Output is sorted by start time.
pub fn intersect_with_daily_window(
    free: &[TimeInterval],
    window: &StudyWindow,
) -> Vec<TimeInterval> {
    let mut out = Vec::new();

    for slot in free.iter().filter(|s| !s.is_degenerate()) {
        let last = window.local_date(slot.end);
        // Start one day early so an overnight window opened the previous
        // evening still gets clipped against this slot.
        let first = window.local_date(slot.start);
        let mut day = first.pred_opt().unwrap_or(first);

        while day <= last {
            if let Some(daily) = window.on(day) {
                let start = slot.start.max(daily.start);
                let end = slot.end.min(daily.end);
                if end > start {
                    out.push(TimeInterval::new(start, end));
                }
            }
            day = match day.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }
    }

    out.sort_by_key(|i| i.start);
    out
}

/// Free, window-constrained time inside the horizon.
pub fn free_study_time(
    horizon: &TimeInterval,
    busy: &[BusyInterval],
    window: &StudyWindow,
) -> Vec<TimeInterval> {
    let free = subtract_intervals(horizon, busy);
    tracing::trace!(free = free.len(), busy = busy.len(), "subtracted busy intervals");
    intersect_with_daily_window(&free, window)
}
