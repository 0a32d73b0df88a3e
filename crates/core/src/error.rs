use thiserror::Error;

use crate::model::SettingsError;
use crate::picker::PickerError;

/// Errors returned by `QuizEngine` commands.
///
/// `NoAnswerSelected` and `UnknownChoice` are player mistakes and leave the
/// engine untouched. The rest mean the caller broke the round protocol.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EngineError {
    #[error("select an answer before submitting")]
    NoAnswerSelected,

    #[error("{0:?} is not one of the presented choices")]
    UnknownChoice(String),

    #[error("no round has been started")]
    NoActiveRound,

    #[error("the current round is still in progress")]
    RoundInProgress,

    #[error("the current round is already finalized")]
    RoundAlreadyFinalized,

    #[error("the session is complete")]
    SessionComplete,

    #[error(transparent)]
    Picker(#[from] PickerError),
}

impl EngineError {
    /// True for mistakes the player can correct and retry.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            EngineError::NoAnswerSelected | EngineError::UnknownChoice(_)
        )
    }
}

/// Errors when building an engine from settings or a stored snapshot.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EngineSetupError {
    #[error(transparent)]
    InvalidSettings(#[from] SettingsError),

    #[error("snapshot has {round_count} rounds but the session length is {session_length}")]
    RoundCountExceedsSession { round_count: u32, session_length: u32 },
}
