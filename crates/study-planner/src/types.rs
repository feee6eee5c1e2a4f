//! Core value types shared by every stage of the planning pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A half-open span of calendar time, `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeInterval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Whole minutes between start and end, truncated toward zero.
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// True for zero-length and inverted intervals.
    pub fn is_degenerate(&self) -> bool {
        self.start >= self.end
    }

    /// Two intervals overlap iff `a.start < b.end && b.start < a.end`.
    /// Touching endpoints do not count.
    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// An existing commitment that blocks study time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Free-form description of the commitment (e.g., "Lecture").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl BusyInterval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start,
            end,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn interval(&self) -> TimeInterval {
        TimeInterval::new(self.start, self.end)
    }
}

/// A window-constrained free interval eligible to receive pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateSession {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Set when the session came from fallback synthesis rather than from
    /// real free time.
    #[serde(default)]
    pub synthesized: bool,
}

impl CandidateSession {
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    pub fn interval(&self) -> TimeInterval {
        TimeInterval::new(self.start, self.end)
    }
}

impl From<TimeInterval> for CandidateSession {
    fn from(interval: TimeInterval) -> Self {
        Self {
            start: interval.start,
            end: interval.end,
            synthesized: false,
        }
    }
}

/// What a study session is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum SessionKind {
    /// First pass over a page range.
    Initial,
    /// Extra session appended when the first pass under-assigned pages.
    Overflow,
    /// Spaced-repetition review placed at or after its anchor day.
    Review { offset_days: u32 },
    /// Review that found no slot after its anchor and fell back to the last
    /// slot before the deadline.
    ReviewFallback { offset_days: u32 },
}

impl SessionKind {
    /// The human-readable note stored alongside the session.
    pub fn note(&self) -> String {
        match self {
            SessionKind::Initial => "Initial study".to_string(),
            SessionKind::Overflow => "Extra study (fill gap)".to_string(),
            SessionKind::Review { offset_days } => format!("Review +{}d", offset_days),
            SessionKind::ReviewFallback { offset_days } => {
                format!("Review (fallback +{}d)", offset_days)
            }
        }
    }

    pub fn is_review(&self) -> bool {
        matches!(
            self,
            SessionKind::Review { .. } | SessionKind::ReviewFallback { .. }
        )
    }
}

/// One scheduled block of a plan: a time range plus the pages to cover.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudySession {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub pages_from: u32,
    pub pages_to: u32,
    pub note: String,
    pub kind: SessionKind,
}

impl StudySession {
    pub fn new(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        pages_from: u32,
        pages_to: u32,
        kind: SessionKind,
    ) -> Self {
        Self {
            start,
            end,
            pages_from,
            pages_to,
            note: kind.note(),
            kind,
        }
    }

    /// Number of pages covered, inclusive on both ends.
    pub fn page_count(&self) -> u32 {
        (self.pages_to + 1).saturating_sub(self.pages_from)
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// Something to study for: a page budget and a deadline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyTarget {
    pub id: String,
    /// Absent for targets that are not study events.
    #[serde(default)]
    pub total_pages: Option<u32>,
    pub deadline: DateTime<Utc>,
}

impl StudyTarget {
    pub fn new(id: impl Into<String>, total_pages: u32, deadline: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            total_pages: Some(total_pages),
            deadline,
        }
    }
}

/// The ordered result of one planning run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyPlan {
    pub target_id: String,
    pub user_id: String,
    pub deadline: DateTime<Utc>,
    pub sessions: Vec<StudySession>,
}

impl StudyPlan {
    /// A plan with nothing scheduled.
    pub fn empty(target: &StudyTarget, user_id: &str) -> Self {
        Self {
            target_id: target.id.clone(),
            user_id: user_id.to_string(),
            deadline: target.deadline,
            sessions: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn total_minutes(&self) -> i64 {
        self.sessions.iter().map(StudySession::duration_minutes).sum()
    }

    pub fn reviews(&self) -> impl Iterator<Item = &StudySession> {
        self.sessions.iter().filter(|s| s.kind.is_review())
    }
}
