//! Self-contained planning request, as read by the CLI and the WASM bindings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::FixedClock;
use crate::commitments::{expand_all, RecurringCommitment};
use crate::config::PlannerConfig;
use crate::error::Result;
use crate::planner::StudyPlanner;
use crate::preferences::UserTimePreferences;
use crate::source::InMemoryDirectory;
use crate::types::{BusyInterval, CandidateSession, StudyPlan, StudyTarget};

/// Everything needed to plan one target for one user.
///
/// A request without `preferences` behaves like a user without a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    pub user_id: String,
    pub target: StudyTarget,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences: Option<UserTimePreferences>,
    #[serde(default)]
    pub busy: Vec<BusyInterval>,
    #[serde(default)]
    pub recurring: Vec<RecurringCommitment>,
}

impl PlanRequest {
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Load the request's profile and commitments into a directory, expanding
    /// recurring commitments.
    ///
    /// # Errors
    /// Fails if a recurring commitment cannot be expanded.
    pub fn directory(&self) -> Result<InMemoryDirectory> {
        let mut directory = InMemoryDirectory::new();
        if let Some(prefs) = &self.preferences {
            directory.set_preferences(self.user_id.clone(), prefs.clone());
        }
        directory.add_busy(self.user_id.clone(), self.busy.iter().cloned());
        directory.add_busy(self.user_id.clone(), expand_all(&self.recurring)?);
        Ok(directory)
    }

    /// Plan the request's target as of `now`.
    pub fn plan(&self, now: DateTime<Utc>, config: &PlannerConfig) -> Result<StudyPlan> {
        let directory = self.directory()?;
        StudyPlanner::with_clock(&directory, &directory, FixedClock(now))
            .with_config(config.clone())
            .generate(&self.target, &self.user_id)
    }

    /// Candidate sessions for the request's target as of `now`.
    pub fn candidates(
        &self,
        now: DateTime<Utc>,
        config: &PlannerConfig,
    ) -> Result<Vec<CandidateSession>> {
        let directory = self.directory()?;
        StudyPlanner::with_clock(&directory, &directory, FixedClock(now))
            .with_config(config.clone())
            .candidates(&self.target, &self.user_id)
    }
}
