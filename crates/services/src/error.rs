//! Shared error types for the services crate.

use thiserror::Error;

use relic_core::model::SessionSummaryError;
use relic_core::{EngineError, EngineSetupError};
use storage::pool::PoolLoadError;
use storage::repository::StorageError;

/// Errors emitted by `QuizLoopService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Setup(#[from] EngineSetupError),
    #[error(transparent)]
    PoolLoad(#[from] PoolLoadError),
    #[error(transparent)]
    Summary(#[from] SessionSummaryError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl SessionError {
    /// True when the player can fix the input and try again.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SessionError::Engine(err) if err.is_recoverable())
    }
}
