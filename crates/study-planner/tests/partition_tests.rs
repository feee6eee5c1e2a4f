//! Tests for session splitting and fallback synthesis.

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use study_planner::config::FallbackConfig;
use study_planner::partition::{candidate_sessions, synthesize_fallback_sessions};
use study_planner::{split_into_sessions, SessionBounds, StudyWindow, TimeInterval};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn at(day: u32, hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, day, hour, min, 0).unwrap()
}

fn minutes_from(start: DateTime<Utc>, minutes: i64) -> TimeInterval {
    TimeInterval::new(start, start + Duration::minutes(minutes))
}

fn window() -> StudyWindow {
    StudyWindow::utc(
        NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
        NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
    )
}

// ── split_into_sessions ─────────────────────────────────────────────────────

#[test]
fn three_hundred_minutes_make_three_sessions() {
    let slot = minutes_from(at(2, 8, 0), 300);
    let sessions = split_into_sessions(&slot, SessionBounds::new(30, 120));

    assert_eq!(sessions.len(), 3);
    assert_eq!((sessions[0].start, sessions[0].end), (at(2, 8, 0), at(2, 10, 0)));
    assert_eq!((sessions[1].start, sessions[1].end), (at(2, 10, 5), at(2, 12, 5)));
    assert_eq!((sessions[2].start, sessions[2].end), (at(2, 12, 10), at(2, 13, 0)));

    for s in &sessions {
        assert!(s.duration_minutes() <= 120);
        assert!(s.duration_minutes() >= 30);
        assert!(!s.synthesized);
    }
    for pair in sessions.windows(2) {
        assert_eq!(pair[1].start - pair[0].end, Duration::minutes(5));
    }
}

#[test]
fn interval_that_fits_is_kept_whole() {
    let slot = minutes_from(at(2, 8, 0), 120);
    let sessions = split_into_sessions(&slot, SessionBounds::new(30, 120));
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].interval(), slot);
}

#[test]
fn short_interval_is_kept_despite_minimum() {
    // No minimum applies to a whole-interval session.
    let slot = minutes_from(at(2, 8, 0), 10);
    let sessions = split_into_sessions(&slot, SessionBounds::new(30, 120));
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].duration_minutes(), 10);
}

#[test]
fn short_remainder_is_dropped() {
    // 120 + 5 break + 20 remainder (< 30) → one session.
    let slot = minutes_from(at(2, 8, 0), 145);
    let sessions = split_into_sessions(&slot, SessionBounds::new(30, 120));
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].duration_minutes(), 120);
}

#[test]
fn remainder_swallowed_by_break_is_dropped() {
    // 120 + 3 minutes: the break runs past the end of the interval.
    let slot = minutes_from(at(2, 8, 0), 123);
    let sessions = split_into_sessions(&slot, SessionBounds::new(30, 120));
    assert_eq!(sessions.len(), 1);
}

#[test]
fn zero_and_negative_durations_give_nothing() {
    let zero = TimeInterval::new(at(2, 8, 0), at(2, 8, 0));
    let inverted = TimeInterval::new(at(2, 9, 0), at(2, 8, 0));
    let sub_minute = TimeInterval::new(at(2, 8, 0), at(2, 8, 0) + Duration::seconds(30));
    let bounds = SessionBounds::default();

    assert!(split_into_sessions(&zero, bounds).is_empty());
    assert!(split_into_sessions(&inverted, bounds).is_empty());
    assert!(split_into_sessions(&sub_minute, bounds).is_empty());
}

#[test]
fn inverted_bounds_are_swapped() {
    let bounds = SessionBounds::new(120, 30);
    assert_eq!((bounds.min_minutes, bounds.max_minutes), (30, 120));

    let slot = minutes_from(at(2, 8, 0), 300);
    assert_eq!(split_into_sessions(&slot, bounds).len(), 3);
}

#[test]
fn custom_break_is_respected() {
    let slot = minutes_from(at(2, 8, 0), 200);
    let sessions = split_into_sessions(&slot, SessionBounds::new(30, 60).with_break(15));

    let starts: Vec<_> = sessions.iter().map(|s| s.start).collect();
    assert_eq!(starts, vec![at(2, 8, 0), at(2, 9, 15), at(2, 10, 30)]);
    // The last cut would end at 11:30, past the end, so 10:30-11:20 is kept whole.
    assert_eq!(sessions.last().unwrap().end, at(2, 11, 20));
}

#[test]
fn candidate_sessions_keep_chronological_order() {
    let free = vec![minutes_from(at(2, 8, 0), 300), minutes_from(at(3, 8, 0), 60)];
    let sessions = candidate_sessions(&free, SessionBounds::new(30, 120));

    assert_eq!(sessions.len(), 4);
    assert!(sessions.windows(2).all(|w| w[0].start <= w[1].start));
}

// ── synthesize_fallback_sessions ────────────────────────────────────────────

#[test]
fn fallback_places_one_hour_at_window_start_each_day() {
    let now = at(2, 6, 0);
    let sessions = synthesize_fallback_sessions(
        now,
        at(5, 0, 0),
        now,
        &window(),
        SessionBounds::default(),
        &FallbackConfig::default(),
    );

    let starts: Vec<_> = sessions.iter().map(|s| s.start).collect();
    assert_eq!(starts, vec![at(2, 8, 0), at(3, 8, 0), at(4, 8, 0)]);
    assert!(sessions.iter().all(|s| s.duration_minutes() == 60));
    assert!(sessions.iter().all(|s| s.synthesized));
}

#[test]
fn fallback_skips_today_once_window_start_has_passed() {
    let now = at(2, 9, 0);
    let sessions = synthesize_fallback_sessions(
        now,
        at(4, 12, 0),
        now,
        &window(),
        SessionBounds::default(),
        &FallbackConfig::default(),
    );

    let starts: Vec<_> = sessions.iter().map(|s| s.start).collect();
    assert_eq!(starts, vec![at(3, 8, 0), at(4, 8, 0)]);
}

#[test]
fn fallback_never_exceeds_seven_slots() {
    let now = at(1, 6, 0);
    let sessions = synthesize_fallback_sessions(
        now,
        at(28, 0, 0),
        now,
        &window(),
        SessionBounds::default(),
        &FallbackConfig::default(),
    );

    assert_eq!(sessions.len(), 7);
    assert_eq!(sessions.last().unwrap().start, at(7, 8, 0));
}

#[test]
fn fallback_slot_is_split_when_longer_than_max() {
    let now = at(2, 6, 0);
    let sessions = synthesize_fallback_sessions(
        now,
        at(2, 23, 0),
        now,
        &window(),
        SessionBounds::new(10, 25),
        &FallbackConfig::default(),
    );

    // 60 minutes at max 25: 08:00-08:25, 08:30-08:55, then the break fills the hour.
    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[1].end, at(2, 8, 55));
}

#[test]
fn fallback_respects_configured_day_cap() {
    let now = at(1, 6, 0);
    let config = FallbackConfig {
        max_days: 2,
        slot_minutes: 30,
    };
    let sessions = synthesize_fallback_sessions(
        now,
        at(20, 0, 0),
        now,
        &window(),
        SessionBounds::default(),
        &config,
    );

    assert_eq!(sessions.len(), 2);
    assert!(sessions.iter().all(|s| s.duration_minutes() == 30));
}

#[test]
fn unrepresentable_break_keeps_only_first_cut() {
    let slot = minutes_from(at(2, 8, 0), 200);
    let sessions = split_into_sessions(&slot, SessionBounds::new(30, 60).with_break(i64::MAX));

    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].end, at(2, 9, 0));
}

#[test]
fn unrepresentable_slot_length_synthesizes_nothing() {
    let now = at(1, 6, 0);
    let config = FallbackConfig {
        slot_minutes: i64::MAX,
        ..FallbackConfig::default()
    };
    let sessions = synthesize_fallback_sessions(
        now,
        at(5, 0, 0),
        now,
        &window(),
        SessionBounds::default(),
        &config,
    );

    assert!(sessions.is_empty());
}
