//! Read-only query interfaces for the planner's external collaborators.
//!
//! The event store and the user-profile store live outside this crate. The
//! planner only ever reads from them, once per run, through these traits.

use std::collections::HashMap;

use crate::preferences::UserTimePreferences;
use crate::types::{BusyInterval, TimeInterval};

/// Supplies a user's existing commitments.
pub trait BusyIntervalSource {
    /// Busy intervals for `user_id` overlapping `horizon`, in chronological
    /// order.
    fn fetch_busy_intervals(&self, user_id: &str, horizon: &TimeInterval) -> Vec<BusyInterval>;
}

/// Supplies a user's time preferences.
pub trait PreferenceSource {
    /// `None` when the user has no profile.
    fn fetch_preferences(&self, user_id: &str) -> Option<UserTimePreferences>;
}

impl<T: BusyIntervalSource + ?Sized> BusyIntervalSource for &T {
    fn fetch_busy_intervals(&self, user_id: &str, horizon: &TimeInterval) -> Vec<BusyInterval> {
        (**self).fetch_busy_intervals(user_id, horizon)
    }
}

impl<T: PreferenceSource + ?Sized> PreferenceSource for &T {
    fn fetch_preferences(&self, user_id: &str) -> Option<UserTimePreferences> {
        (**self).fetch_preferences(user_id)
    }
}

/// In-memory store of profiles and commitments, keyed by user id.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    preferences: HashMap<String, UserTimePreferences>,
    busy: HashMap<String, Vec<BusyInterval>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_preferences(&mut self, user_id: impl Into<String>, prefs: UserTimePreferences) {
        self.preferences.insert(user_id.into(), prefs);
    }

    pub fn add_busy(
        &mut self,
        user_id: impl Into<String>,
        busy: impl IntoIterator<Item = BusyInterval>,
    ) {
        self.busy.entry(user_id.into()).or_default().extend(busy);
    }

    pub fn with_preferences(
        mut self,
        user_id: impl Into<String>,
        prefs: UserTimePreferences,
    ) -> Self {
        self.set_preferences(user_id, prefs);
        self
    }

    pub fn with_busy(
        mut self,
        user_id: impl Into<String>,
        busy: impl IntoIterator<Item = BusyInterval>,
    ) -> Self {
        self.add_busy(user_id, busy);
        self
    }
}

impl BusyIntervalSource for InMemoryDirectory {
    fn fetch_busy_intervals(&self, user_id: &str, horizon: &TimeInterval) -> Vec<BusyInterval> {
        let mut busy: Vec<BusyInterval> = self
            .busy
            .get(user_id)
            .map(|all| {
                all.iter()
                    .filter(|b| b.interval().overlaps(horizon))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        busy.sort_by_key(|b| (b.start, b.end));
        busy
    }
}

impl PreferenceSource for InMemoryDirectory {
    fn fetch_preferences(&self, user_id: &str) -> Option<UserTimePreferences> {
        self.preferences.get(user_id).cloned()
    }
}
