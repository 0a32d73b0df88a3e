use thiserror::Error;

use crate::model::{
    artifact::{Artifact, ArtifactDraft, ArtifactError},
    ids::ArtifactId,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PoolError {
    #[error("artifact pool is empty")]
    Empty,

    #[error("artifact {index} is invalid: {source}")]
    InvalidArtifact {
        index: usize,
        #[source]
        source: ArtifactError,
    },
}

/// The fixed, non-empty set of artifacts a session draws from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPool {
    artifacts: Vec<Artifact>,
}

impl ArtifactPool {
    /// Validate drafts in order, assigning each its index as id.
    ///
    /// # Errors
    ///
    /// Returns `PoolError::Empty` for no drafts, or `PoolError::InvalidArtifact`
    /// for the first draft that fails validation.
    pub fn from_drafts(drafts: impl IntoIterator<Item = ArtifactDraft>) -> Result<Self, PoolError> {
        let artifacts = drafts
            .into_iter()
            .enumerate()
            .map(|(index, draft)| {
                draft
                    .validate(ArtifactId::new(index))
                    .map_err(|source| PoolError::InvalidArtifact { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if artifacts.is_empty() {
            return Err(PoolError::Empty);
        }

        Ok(Self { artifacts })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    /// Always false; an empty pool cannot be constructed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: ArtifactId) -> Option<&Artifact> {
        self.artifacts.get(id.index())
    }

    #[must_use]
    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }
}
