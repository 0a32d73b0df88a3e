use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use relic_core::model::{ArtifactDraft, ArtifactError, ArtifactPool, CorrectYear, PoolError};

/// Errors raised while loading the artifact pool. All are fatal for a session.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PoolLoadError {
    #[error("failed to read artifact pool {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("artifact pool is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("artifact {index} is invalid: {source}")]
    InvalidArtifact {
        index: usize,
        #[source]
        source: ArtifactError,
    },

    #[error("artifact pool is empty")]
    Empty,
}

impl From<PoolError> for PoolLoadError {
    fn from(err: PoolError) -> Self {
        match err {
            PoolError::InvalidArtifact { index, source } => Self::InvalidArtifact { index, source },
            _ => Self::Empty,
        }
    }
}

/// One artifact as written in a pool file.
///
/// Mirrors `ArtifactDraft` so the file format stays out of the domain layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactRecord {
    #[serde(alias = "imageURL", alias = "imageUrl")]
    pub image_ref: String,
    pub correct_answer: String,
    pub distractors: Vec<String>,
    pub correct_year: CorrectYear,
}

impl ArtifactRecord {
    #[must_use]
    pub fn into_draft(self) -> ArtifactDraft {
        ArtifactDraft {
            image_ref: self.image_ref,
            correct_answer: self.correct_answer,
            distractors: self.distractors,
            correct_year: self.correct_year,
        }
    }
}

/// Validate records into a pool.
///
/// # Errors
///
/// Returns `PoolLoadError::Empty` or `PoolLoadError::InvalidArtifact`.
pub fn pool_from_records(records: Vec<ArtifactRecord>) -> Result<ArtifactPool, PoolLoadError> {
    Ok(ArtifactPool::from_drafts(
        records.into_iter().map(ArtifactRecord::into_draft),
    )?)
}

/// Parse a JSON array of artifact records into a pool.
///
/// # Errors
///
/// Returns `PoolLoadError::Parse` for malformed JSON, otherwise the errors of
/// [`pool_from_records`].
pub fn parse_pool(json: &str) -> Result<ArtifactPool, PoolLoadError> {
    let records: Vec<ArtifactRecord> = serde_json::from_str(json)?;
    pool_from_records(records)
}

/// Source of the artifact pool, loaded once per session.
#[async_trait]
pub trait PoolLoader: Send + Sync {
    /// Load and validate the pool.
    ///
    /// # Errors
    ///
    /// Returns `PoolLoadError` if the pool cannot be read, parsed or validated.
    async fn load(&self) -> Result<ArtifactPool, PoolLoadError>;
}

/// Loads the pool from a JSON file on disk.
#[derive(Debug, Clone)]
pub struct JsonFilePoolLoader {
    path: PathBuf,
}

impl JsonFilePoolLoader {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl PoolLoader for JsonFilePoolLoader {
    async fn load(&self) -> Result<ArtifactPool, PoolLoadError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| PoolLoadError::Io {
                path: self.path.clone(),
                source,
            })?;
        let pool = parse_pool(&raw)?;
        tracing::debug!(
            path = %self.path.display(),
            artifacts = pool.len(),
            "artifact pool loaded"
        );
        Ok(pool)
    }
}

/// Serves a pool held in memory; handy for tests and embedded data.
#[derive(Debug, Clone, Default)]
pub struct StaticPoolLoader {
    records: Vec<ArtifactRecord>,
}

impl StaticPoolLoader {
    #[must_use]
    pub fn new(records: Vec<ArtifactRecord>) -> Self {
        Self { records }
    }

    /// # Errors
    ///
    /// Returns `PoolLoadError::Parse` if `json` is not an array of records.
    pub fn from_json(json: &str) -> Result<Self, PoolLoadError> {
        Ok(Self::new(serde_json::from_str(json)?))
    }
}

#[async_trait]
impl PoolLoader for StaticPoolLoader {
    async fn load(&self) -> Result<ArtifactPool, PoolLoadError> {
        pool_from_records(self.records.clone())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
