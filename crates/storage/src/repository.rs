use async_trait::async_trait;
use chrono::{DateTime, Utc};
use relic_core::model::{SessionSnapshot, SessionSummary};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// A stored snapshot and when it was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRecord {
    pub snapshot: SessionSnapshot,
    pub saved_at: DateTime<Utc>,
}

/// A stored session summary with its row id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummaryRow {
    pub id: i64,
    pub summary: SessionSummary,
}

/// Per-profile session progress, so a reload can pick up where it left off.
#[async_trait]
pub trait SnapshotRepository: Send + Sync {
    /// Fetch the snapshot stored for `profile`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend fails or the stored data is unreadable.
    async fn load_snapshot(&self, profile: &str) -> Result<Option<SnapshotRecord>, StorageError>;

    /// Insert or replace the snapshot for `profile`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the snapshot cannot be stored.
    async fn save_snapshot(
        &self,
        profile: &str,
        snapshot: &SessionSnapshot,
        saved_at: DateTime<Utc>,
    ) -> Result<(), StorageError>;

    /// Remove the snapshot for `profile`. Missing snapshots are not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend fails.
    async fn clear_snapshot(&self, profile: &str) -> Result<(), StorageError>;
}

/// History of completed sessions.
#[async_trait]
pub trait SessionSummaryRepository: Send + Sync {
    /// Store a summary and return its id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the summary cannot be stored.
    async fn append_summary(&self, summary: &SessionSummary) -> Result<i64, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no summary has this id.
    async fn get_summary(&self, id: i64) -> Result<SessionSummary, StorageError>;

    /// Most recent summaries first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend fails.
    async fn list_summaries(&self, limit: u32) -> Result<Vec<SessionSummaryRow>, StorageError>;
}

/// Bundles the repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub snapshots: Arc<dyn SnapshotRepository>,
    pub summaries: Arc<dyn SessionSummaryRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        Self {
            snapshots: Arc::new(repo.clone()),
            summaries: Arc::new(repo),
        }
    }
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    snapshots: Arc<Mutex<HashMap<String, SnapshotRecord>>>,
    summaries: Arc<Mutex<Vec<SessionSummary>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait]
impl SnapshotRepository for InMemoryRepository {
    async fn load_snapshot(&self, profile: &str) -> Result<Option<SnapshotRecord>, StorageError> {
        let guard = self.snapshots.lock().map_err(poisoned)?;
        Ok(guard.get(profile).cloned())
    }

    async fn save_snapshot(
        &self,
        profile: &str,
        snapshot: &SessionSnapshot,
        saved_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let mut guard = self.snapshots.lock().map_err(poisoned)?;
        guard.insert(
            profile.to_owned(),
            SnapshotRecord {
                snapshot: snapshot.clone(),
                saved_at,
            },
        );
        Ok(())
    }

    async fn clear_snapshot(&self, profile: &str) -> Result<(), StorageError> {
        let mut guard = self.snapshots.lock().map_err(poisoned)?;
        guard.remove(profile);
        Ok(())
    }
}

#[async_trait]
impl SessionSummaryRepository for InMemoryRepository {
    async fn append_summary(&self, summary: &SessionSummary) -> Result<i64, StorageError> {
        let mut guard = self.summaries.lock().map_err(poisoned)?;
        guard.push(summary.clone());
        i64::try_from(guard.len()).map_err(|_| StorageError::Conflict)
    }

    async fn get_summary(&self, id: i64) -> Result<SessionSummary, StorageError> {
        let guard = self.summaries.lock().map_err(poisoned)?;
        usize::try_from(id)
            .ok()
            .and_then(|id| id.checked_sub(1))
            .and_then(|idx| guard.get(idx).cloned())
            .ok_or(StorageError::NotFound)
    }

    async fn list_summaries(&self, limit: u32) -> Result<Vec<SessionSummaryRow>, StorageError> {
        let guard = self.summaries.lock().map_err(poisoned)?;
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        let mut rows = Vec::with_capacity(guard.len().min(limit));
        for (idx, summary) in guard.iter().enumerate().rev().take(limit) {
            let id = i64::try_from(idx + 1).map_err(|_| StorageError::Conflict)?;
            rows.push(SessionSummaryRow {
                id,
                summary: summary.clone(),
            });
        }
        Ok(rows)
    }
}
