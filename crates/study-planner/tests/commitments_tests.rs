//! Tests for expanding recurring commitments into busy intervals.

use chrono::{DateTime, TimeZone, Utc};
use study_planner::commitments::expand_all;
use study_planner::{PlannerError, RecurringCommitment, TimeInterval};

fn at(day: u32, hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, day, hour, min, 0).unwrap()
}

#[test]
fn weekly_lecture_expands_to_busy_intervals() {
    // 2026-03-02 is a Monday.
    let mut lecture =
        RecurringCommitment::new("FREQ=WEEKLY;BYDAY=MO,WE", "2026-03-02T10:00:00", 90, "UTC");
    lecture.count = Some(4);
    lecture.label = Some("Algebra".to_string());

    let busy = lecture.expand().unwrap();

    let starts: Vec<_> = busy.iter().map(|b| b.start).collect();
    assert_eq!(starts, vec![at(2, 10, 0), at(4, 10, 0), at(9, 10, 0), at(11, 10, 0)]);
    assert!(busy.iter().all(|b| b.end - b.start == chrono::Duration::minutes(90)));
    assert!(busy.iter().all(|b| b.label.as_deref() == Some("Algebra")));
}

#[test]
fn local_times_respect_timezone() {
    let mut shift =
        RecurringCommitment::new("FREQ=DAILY", "2026-03-02T09:00:00", 60, "Europe/Sofia");
    shift.count = Some(1);

    let busy = shift.expand().unwrap();
    assert_eq!(busy.len(), 1);
    assert_eq!(busy[0].start, at(2, 7, 0));
}

#[test]
fn exdates_remove_instances() {
    let mut daily = RecurringCommitment::new("FREQ=DAILY", "2026-03-02T09:00:00", 60, "UTC");
    daily.until = Some("2026-03-04T23:59:59".to_string());
    daily.exdates = vec!["2026-03-03T09:00:00".to_string()];

    let busy = daily.expand().unwrap();
    let starts: Vec<_> = busy.iter().map(|b| b.start).collect();
    assert_eq!(starts, vec![at(2, 9, 0), at(4, 9, 0)]);
}

#[test]
fn until_bounds_expansion() {
    let mut daily = RecurringCommitment::new("FREQ=DAILY", "2026-03-02T09:00:00", 30, "UTC");
    daily.until = Some("2026-03-05T23:59:59".to_string());

    assert_eq!(daily.expand().unwrap().len(), 4);
}

#[test]
fn expand_within_keeps_only_overlapping_instances() {
    let mut daily = RecurringCommitment::new("FREQ=DAILY", "2026-03-01T09:00:00", 60, "UTC");
    daily.count = Some(10);
    let horizon = TimeInterval::new(at(3, 0, 0), at(5, 0, 0));

    let busy = daily.expand_within(&horizon).unwrap();
    let starts: Vec<_> = busy.iter().map(|b| b.start).collect();
    assert_eq!(starts, vec![at(3, 9, 0), at(4, 9, 0)]);
}

#[test]
fn zero_count_expands_to_nothing() {
    let mut daily = RecurringCommitment::new("FREQ=DAILY", "2026-03-02T09:00:00", 60, "UTC");
    daily.count = Some(0);
    assert!(daily.expand().unwrap().is_empty());
}

#[test]
fn empty_rule_is_rejected() {
    let err = RecurringCommitment::new("", "2026-03-02T09:00:00", 60, "UTC")
        .expand()
        .unwrap_err();
    assert!(matches!(err, PlannerError::InvalidRule(_)));
}

#[test]
fn garbage_rule_is_rejected() {
    let err = RecurringCommitment::new("FREQ=SOMETIMES", "2026-03-02T09:00:00", 60, "UTC")
        .expand()
        .unwrap_err();
    assert!(matches!(err, PlannerError::InvalidRule(_)));
}

#[test]
fn unknown_timezone_is_rejected() {
    let err = RecurringCommitment::new("FREQ=DAILY", "2026-03-02T09:00:00", 60, "Nowhere/City")
        .expand()
        .unwrap_err();
    assert!(matches!(err, PlannerError::InvalidTimezone(tz) if tz == "Nowhere/City"));
}

#[test]
fn expand_all_merges_and_sorts() {
    let mut evening = RecurringCommitment::new("FREQ=DAILY", "2026-03-02T18:00:00", 60, "UTC");
    evening.count = Some(2);
    let mut morning = RecurringCommitment::new("FREQ=DAILY", "2026-03-02T07:00:00", 60, "UTC");
    morning.count = Some(2);

    let busy = expand_all(&[evening, morning]).unwrap();
    let starts: Vec<_> = busy.iter().map(|b| b.start).collect();
    assert_eq!(
        starts,
        vec![at(2, 7, 0), at(2, 18, 0), at(3, 7, 0), at(3, 18, 0)]
    );
}
