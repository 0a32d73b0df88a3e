use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

use crate::model::{ids::ArtifactId, points::Points};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionSummaryError {
    #[error("completed_at is before started_at")]
    InvalidTimeRange,

    #[error("final score {score} exceeds the maximum {max}")]
    ScoreAboveMaximum { score: Points, max: Points },
}

//
// ─── USED POOL ─────────────────────────────────────────────────────────────────
//

/// Artifacts already shown in the current cycle through the pool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UsedPool(BTreeSet<ArtifactId>);

impl UsedPool {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, id: ArtifactId) -> bool {
        self.0.contains(&id)
    }

    pub fn insert(&mut self, id: ArtifactId) -> bool {
        self.0.insert(id)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ArtifactId> + '_ {
        self.0.iter().copied()
    }

    /// Drop ids that do not exist in a pool of `pool_len` artifacts.
    ///
    /// Returns how many ids were removed.
    pub fn retain_within(&mut self, pool_len: usize) -> usize {
        let before = self.0.len();
        self.0.retain(|id| id.index() < pool_len);
        before - self.0.len()
    }
}

impl FromIterator<ArtifactId> for UsedPool {
    fn from_iter<T: IntoIterator<Item = ArtifactId>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

//
// ─── SESSION STATE ─────────────────────────────────────────────────────────────
//

/// Cross-round progress owned by the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub round_count: u32,
    pub score: Points,
    pub used_pool: UsedPool,
}

/// Persisted form of `SessionState`, used to continue after a reload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub round_count: u32,
    pub score: Points,
    #[serde(default)]
    pub used_pool: UsedPool,
    /// When the session being continued began. Engine snapshots leave this
    /// unset; the services layer fills it in before saving.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
}

impl From<&SessionState> for SessionSnapshot {
    fn from(state: &SessionState) -> Self {
        Self {
            round_count: state.round_count,
            score: state.score,
            used_pool: state.used_pool.clone(),
            started_at: None,
        }
    }
}

impl From<SessionSnapshot> for SessionState {
    fn from(snapshot: SessionSnapshot) -> Self {
        Self {
            round_count: snapshot.round_count,
            score: snapshot.score,
            used_pool: snapshot.used_pool,
        }
    }
}

//
// ─── SESSION SUMMARY ───────────────────────────────────────────────────────────
//

/// Record of a completed quiz session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
    rounds_played: u32,
    final_score: Points,
    max_score: Points,
}

impl SessionSummary {
    /// Build a summary, checking that the values are consistent.
    ///
    /// # Errors
    ///
    /// Returns `SessionSummaryError::InvalidTimeRange` if `completed_at` is before `started_at`.
    /// Returns `SessionSummaryError::ScoreAboveMaximum` if the score exceeds `max_score`.
    pub fn from_persisted(
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        rounds_played: u32,
        final_score: Points,
        max_score: Points,
    ) -> Result<Self, SessionSummaryError> {
        if completed_at < started_at {
            return Err(SessionSummaryError::InvalidTimeRange);
        }
        if final_score > max_score {
            return Err(SessionSummaryError::ScoreAboveMaximum {
                score: final_score,
                max: max_score,
            });
        }
        Ok(Self {
            started_at,
            completed_at,
            rounds_played,
            final_score,
            max_score,
        })
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    #[must_use]
    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    #[must_use]
    pub fn final_score(&self) -> Points {
        self.final_score
    }

    #[must_use]
    pub fn max_score(&self) -> Points {
        self.max_score
    }
}
