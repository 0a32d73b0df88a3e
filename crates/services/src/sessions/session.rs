use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use relic_core::QuizEngine;
use relic_core::engine::AttemptState;
use relic_core::model::{QuizSettings, SessionState};

/// One player's live quiz: the engine plus the bookkeeping the services
/// layer needs to persist it.
#[derive(Debug)]
pub struct QuizSession {
    pub(crate) engine: QuizEngine<StdRng>,
    pub(crate) started_at: DateTime<Utc>,
    pub(crate) resumed: bool,
    pub(crate) summary_id: Option<i64>,
}

impl QuizSession {
    pub(crate) fn new(
        engine: QuizEngine<StdRng>,
        started_at: DateTime<Utc>,
        resumed: bool,
    ) -> Self {
        Self {
            engine,
            started_at,
            resumed,
            summary_id: None,
        }
    }

    #[must_use]
    pub fn engine(&self) -> &QuizEngine<StdRng> {
        &self.engine
    }

    #[must_use]
    pub fn settings(&self) -> &QuizSettings {
        self.engine.settings()
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        self.engine.session()
    }

    #[must_use]
    pub fn attempt(&self) -> Option<&AttemptState> {
        self.engine.attempt()
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// True if this session continued a stored snapshot.
    #[must_use]
    pub fn is_resumed(&self) -> bool {
        self.resumed
    }

    /// Id of the stored summary once the session has completed.
    #[must_use]
    pub fn summary_id(&self) -> Option<i64> {
        self.summary_id
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.engine.is_session_complete()
    }

    /// A round is open and still accepting answers.
    #[must_use]
    pub fn has_live_round(&self) -> bool {
        self.engine.attempt().is_some_and(|a| !a.is_finalized())
    }

    /// A live round has a countdown that needs ticking.
    #[must_use]
    pub fn has_live_timer(&self) -> bool {
        self.engine
            .attempt()
            .is_some_and(|a| !a.is_finalized() && a.has_active_timer())
    }
}
