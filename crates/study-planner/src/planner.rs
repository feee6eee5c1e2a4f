//! Plan assembly and the top-level planning entry points.
//!
//! The pipeline runs strictly downward:
//!
//! 1. subtract busy intervals from `[now, deadline]`
//! 2. clip to the daily study window
//! 3. split into bounded candidate sessions (or synthesize fallback ones)
//! 4. allocate pages, with an overflow pass
//! 5. place spaced-repetition reviews
//! 6. merge, stable-sort by start, clamp page bounds
//!
//! Nothing here reads the wall clock or persists anything. "Now" comes from
//! the caller or a [`Clock`], so the same inputs always give the same plan.

use chrono::{DateTime, Utc};

use crate::allocator::allocate_pages_with;
use crate::clock::{Clock, SystemClock};
use crate::config::PlannerConfig;
use crate::error::{PlannerError, Result};
use crate::interval::free_study_time;
use crate::partition::{candidate_sessions, synthesize_fallback_sessions, SessionBounds};
use crate::preferences::{StudyWindow, UserTimePreferences};
use crate::review::schedule_reviews_at;
use crate::source::{BusyIntervalSource, PreferenceSource};
use crate::types::{
    BusyInterval, CandidateSession, StudyPlan, StudySession, StudyTarget, TimeInterval,
};

/// Page budget of a target that can be scheduled at `now`.
///
/// # Errors
/// Returns `PlannerError::InvalidTarget` when the page count is missing or
/// zero, or the deadline is not after `now`.
pub fn schedulable_pages(target: &StudyTarget, now: DateTime<Utc>) -> Result<u32> {
    if target.deadline <= now {
        return Err(PlannerError::InvalidTarget(format!(
            "deadline {} is not after {}",
            target.deadline.to_rfc3339(),
            now.to_rfc3339()
        )));
    }
    match target.total_pages {
        Some(pages) if pages > 0 => Ok(pages),
        _ => Err(PlannerError::InvalidTarget(format!(
            "target {} has no pages to study",
            target.id
        ))),
    }
}

/// Candidate sessions for the horizon, falling back to synthesized ones when
/// free time yields none.
pub fn plan_candidates(
    horizon: &TimeInterval,
    busy: &[BusyInterval],
    window: &StudyWindow,
    bounds: SessionBounds,
    now: DateTime<Utc>,
    config: &PlannerConfig,
) -> Vec<CandidateSession> {
    let free = free_study_time(horizon, busy, window);
    let candidates = candidate_sessions(&free, bounds);
    tracing::debug!(
        free = free.len(),
        candidates = candidates.len(),
        "computed candidate sessions"
    );

    if !candidates.is_empty() {
        return candidates;
    }

    tracing::info!("no free study time before deadline, synthesizing fallback sessions");
    synthesize_fallback_sessions(
        horizon.start,
        horizon.end,
        now,
        window,
        bounds,
        &config.fallback,
    )
}

/// Merge initial, overflow, and review sessions into one plan.
///
/// The sort is stable, so sessions starting together keep the order
/// initial, overflow, review. Page bounds are clamped into `1..=total_pages`.
pub fn assemble_plan(
    target: &StudyTarget,
    user_id: &str,
    total_pages: u32,
    initial: Vec<StudySession>,
    overflow: Vec<StudySession>,
    reviews: Vec<StudySession>,
) -> StudyPlan {
    let mut sessions: Vec<StudySession> = initial
        .into_iter()
        .chain(overflow)
        .chain(reviews)
        .collect();
    sessions.sort_by_key(|s| s.start);

    for session in &mut sessions {
        session.pages_to = session.pages_to.min(total_pages);
        session.pages_from = session.pages_from.max(1);
    }

    StudyPlan {
        target_id: target.id.clone(),
        user_id: user_id.to_string(),
        deadline: target.deadline,
        sessions,
    }
}

/// Generate a study plan from already-fetched inputs.
///
/// Returns an empty plan when the target has nothing to schedule, before
/// looking at the preferences.
///
/// # Errors
/// Returns `PlannerError::InvalidConfig` when `config` fails
/// [`PlannerConfig::validate`].
/// Returns `PlannerError::UserNotFound` when `preferences` is `None`.
/// Returns `PlannerError::InvalidTimezone` when the preferences name an
/// unknown timezone.
pub fn generate_adaptive_study_plan(
    target: &StudyTarget,
    user_id: &str,
    preferences: Option<&UserTimePreferences>,
    busy: &[BusyInterval],
    now: DateTime<Utc>,
    config: &PlannerConfig,
) -> Result<StudyPlan> {
    config.validate()?;
    let total_pages = match schedulable_pages(target, now) {
        Ok(pages) => pages,
        Err(PlannerError::InvalidTarget(reason)) => {
            tracing::debug!(target_id = %target.id, %reason, "nothing to schedule");
            return Ok(StudyPlan::empty(target, user_id));
        }
        Err(e) => return Err(e),
    };

    let preferences = preferences.ok_or_else(|| PlannerError::UserNotFound(user_id.to_string()))?;
    let window = preferences.study_window(config)?;
    let bounds = preferences.session_bounds(config);
    let horizon = TimeInterval::new(now, target.deadline);

    let candidates = plan_candidates(&horizon, busy, &window, bounds, now, config);
    if candidates.is_empty() {
        tracing::debug!(target_id = %target.id, "no candidate sessions, returning empty plan");
        return Ok(StudyPlan::empty(target, user_id));
    }

    let allocation = allocate_pages_with(&candidates, total_pages, &config.allocation);
    let reviews = schedule_reviews_at(
        &allocation.initial,
        &candidates,
        target.deadline,
        &config.review.offsets_days,
    );

    tracing::debug!(
        target_id = %target.id,
        initial = allocation.initial.len(),
        overflow = allocation.overflow.len(),
        reviews = reviews.len(),
        rate = allocation.rate,
        "allocated pages"
    );

    Ok(assemble_plan(
        target,
        user_id,
        total_pages,
        allocation.initial,
        allocation.overflow,
        reviews,
    ))
}

/// Plans study targets against an event store and a profile store.
///
/// Each call fetches the user's preferences and busy intervals once, then
/// runs the pipeline. The returned plan is never persisted; callers decide
/// whether to store it or show it as a preview.
#[derive(Debug, Clone)]
pub struct StudyPlanner<B, P, C = SystemClock> {
    busy: B,
    preferences: P,
    clock: C,
    config: PlannerConfig,
}

impl<B, P> StudyPlanner<B, P, SystemClock>
where
    B: BusyIntervalSource,
    P: PreferenceSource,
{
    pub fn new(busy: B, preferences: P) -> Self {
        Self::with_clock(busy, preferences, SystemClock)
    }
}

impl<B, P, C> StudyPlanner<B, P, C>
where
    B: BusyIntervalSource,
    P: PreferenceSource,
    C: Clock,
{
    pub fn with_clock(busy: B, preferences: P, clock: C) -> Self {
        Self {
            busy,
            preferences,
            clock,
            config: PlannerConfig::default(),
        }
    }

    pub fn with_config(mut self, config: PlannerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Generate a plan for `target` on behalf of `user_id`.
    ///
    /// # Errors
    /// Returns `PlannerError::UserNotFound` when the profile store has no
    /// preferences for the user, and `PlannerError::InvalidConfig` when the
    /// configuration is out of range.
    pub fn generate(&self, target: &StudyTarget, user_id: &str) -> Result<StudyPlan> {
        let now = self.clock.now();
        if schedulable_pages(target, now).is_err() {
            return generate_adaptive_study_plan(target, user_id, None, &[], now, &self.config);
        }

        let preferences = self
            .preferences
            .fetch_preferences(user_id)
            .ok_or_else(|| PlannerError::UserNotFound(user_id.to_string()))?;
        let horizon = TimeInterval::new(now, target.deadline);
        let busy = self.busy.fetch_busy_intervals(user_id, &horizon);

        generate_adaptive_study_plan(target, user_id, Some(&preferences), &busy, now, &self.config)
    }

    /// The candidate sessions a plan for `target` would draw from. Empty when
    /// the target has nothing to schedule.
    ///
    /// # Errors
    /// Same as [`StudyPlanner::generate`].
    pub fn candidates(&self, target: &StudyTarget, user_id: &str) -> Result<Vec<CandidateSession>> {
        self.config.validate()?;
        let now = self.clock.now();
        if schedulable_pages(target, now).is_err() {
            return Ok(Vec::new());
        }

        let preferences = self
            .preferences
            .fetch_preferences(user_id)
            .ok_or_else(|| PlannerError::UserNotFound(user_id.to_string()))?;
        let window = preferences.study_window(&self.config)?;
        let bounds = preferences.session_bounds(&self.config);
        let horizon = TimeInterval::new(now, target.deadline);
        let busy = self.busy.fetch_busy_intervals(user_id, &horizon);

        Ok(plan_candidates(&horizon, &busy, &window, bounds, now, &self.config))
    }
}
