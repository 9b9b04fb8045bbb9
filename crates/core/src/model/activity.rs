use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ActivityItemError {
    #[error("activity item identifier cannot be empty")]
    EmptyIdentifier,

    #[error("score item max score must be positive and finite")]
    InvalidMaxScore,
}

//
// ─── ACTIVITY ITEMS ────────────────────────────────────────────────────────────
//

/// How a binary item's yes/no value should be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryKind {
    TrueFalse,
    PassFail,
    YesNo,
}

/// A score or completion attached to an activity.
///
/// Item identifiers need not be unique within an activity; later items with
/// the same identifier are kept as distinct entries.
#[derive(Debug, Clone, PartialEq)]
pub enum ActivityItem {
    Binary {
        identifier: String,
        title: String,
        value: bool,
        kind: BinaryKind,
    },
    Score {
        identifier: String,
        title: String,
        score: f64,
        max_score: f64,
    },
}

impl ActivityItem {
    /// A yes/no style completion item.
    ///
    /// # Errors
    ///
    /// Returns `ActivityItemError::EmptyIdentifier` for a blank identifier.
    pub fn binary(
        identifier: impl Into<String>,
        title: impl Into<String>,
        value: bool,
        kind: BinaryKind,
    ) -> Result<Self, ActivityItemError> {
        let identifier = identifier.into();
        if identifier.trim().is_empty() {
            return Err(ActivityItemError::EmptyIdentifier);
        }
        Ok(Self::Binary {
            identifier,
            title: title.into(),
            value,
            kind,
        })
    }

    /// A numeric score out of a maximum, e.g. a quiz result.
    ///
    /// # Errors
    ///
    /// Returns `ActivityItemError::EmptyIdentifier` for a blank identifier
    /// and `ActivityItemError::InvalidMaxScore` unless `max_score` is a
    /// positive finite number.
    pub fn score(
        identifier: impl Into<String>,
        title: impl Into<String>,
        score: f64,
        max_score: f64,
    ) -> Result<Self, ActivityItemError> {
        let identifier = identifier.into();
        if identifier.trim().is_empty() {
            return Err(ActivityItemError::EmptyIdentifier);
        }
        if !max_score.is_finite() || max_score <= 0.0 {
            return Err(ActivityItemError::InvalidMaxScore);
        }
        Ok(Self::Score {
            identifier,
            title: title.into(),
            score,
            max_score,
        })
    }

    #[must_use]
    pub fn identifier(&self) -> &str {
        match self {
            Self::Binary { identifier, .. } | Self::Score { identifier, .. } => identifier,
        }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Binary { title, .. } | Self::Score { title, .. } => title,
        }
    }
}

//
// ─── ACTIVITY ──────────────────────────────────────────────────────────────────
//

/// One tracked session of engagement with a context.
///
/// A context has at most one current activity. Stopping is terminal for the
/// activity itself; the context may begin a fresh one afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Activity {
    started_at: Option<DateTime<Utc>>,
    stopped_at: Option<DateTime<Utc>>,
    progress: f64,
    primary_item: Option<ActivityItem>,
    additional_items: Vec<ActivityItem>,
}

impl Activity {
    /// A fresh, unstarted activity with zero progress.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        self.started_at.is_some()
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.stopped_at.is_some()
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn stopped_at(&self) -> Option<DateTime<Utc>> {
        self.stopped_at
    }

    /// Time between start and stop, if both have happened.
    #[must_use]
    pub fn duration(&self) -> Option<Duration> {
        match (self.started_at, self.stopped_at) {
            (Some(started), Some(stopped)) => Some(stopped - started),
            _ => None,
        }
    }

    #[must_use]
    pub fn progress(&self) -> f64 {
        self.progress
    }

    #[must_use]
    pub fn primary_item(&self) -> Option<&ActivityItem> {
        self.primary_item.as_ref()
    }

    #[must_use]
    pub fn additional_items(&self) -> &[ActivityItem] {
        &self.additional_items
    }

    /// Mark the activity as started. Starting an already-started or stopped
    /// activity has no effect.
    pub fn start(&mut self, at: DateTime<Utc>) {
        if self.started_at.is_none() && self.stopped_at.is_none() {
            self.started_at = Some(at);
        }
    }

    /// Mark the activity as stopped. Stopping twice has no effect.
    pub fn stop(&mut self, at: DateTime<Utc>) {
        if self.stopped_at.is_none() {
            self.stopped_at = Some(at);
        }
    }

    /// Record the student's progress through the context.
    ///
    /// Values are clamped to `[0.0, 1.0]`; non-finite input is recorded as
    /// `0.0`. This is the single enforcement point for the progress range.
    pub fn set_progress(&mut self, value: f64) {
        self.progress = if value.is_finite() {
            value.clamp(0.0, 1.0)
        } else {
            0.0
        };
    }

    /// Replace the primary item, typically the headline score.
    pub fn set_primary_item(&mut self, item: ActivityItem) {
        self.primary_item = Some(item);
    }

    /// Append a secondary item. Items are kept in insertion order and never
    /// merged, even when identifiers repeat.
    pub fn add_additional_item(&mut self, item: ActivityItem) {
        self.additional_items.push(item);
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
