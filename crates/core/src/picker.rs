use rand::Rng;
use rand::seq::SliceRandom;
use thiserror::Error;

use crate::model::{Artifact, ArtifactId, UsedPool};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PickerError {
    #[error("no artifacts to pick from")]
    EmptyPool,
}

/// Draws artifacts from a fixed pool without repeats until the pool is
/// exhausted, then starts a new cycle.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArtifactPicker;

impl ArtifactPicker {
    /// Pick the next artifact.
    ///
    /// Indices in `used` that fall outside `pool` are ignored. When every
    /// artifact has been used the cycle restarts from an empty set.
    ///
    /// # Errors
    ///
    /// Returns `PickerError::EmptyPool` if `pool` is empty.
    pub fn next<'a, R: Rng + ?Sized>(
        pool: &'a [Artifact],
        used: &UsedPool,
        rng: &mut R,
    ) -> Result<(ArtifactId, &'a Artifact, UsedPool), PickerError> {
        if pool.is_empty() {
            return Err(PickerError::EmptyPool);
        }

        let mut used = used.clone();
        let mut available: Vec<ArtifactId> = (0..pool.len())
            .map(ArtifactId::new)
            .filter(|id| !used.contains(*id))
            .collect();

        if available.is_empty() {
            used.clear();
            available = (0..pool.len()).map(ArtifactId::new).collect();
        }

        let id = available[rng.random_range(0..available.len())];
        used.insert(id);
        Ok((id, &pool[id.index()], used))
    }
}

/// The artifact's answer and distractors in a uniformly random order.
pub fn shuffle_choices<R: Rng + ?Sized>(artifact: &Artifact, rng: &mut R) -> Vec<String> {
    let mut choices = artifact.choices();
    choices.shuffle(rng);
    choices
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
