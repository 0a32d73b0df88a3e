use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use relic_core::engine::{RoundReady, SubmitOutcome, TickOutcome};
use relic_core::model::{ArtifactPool, Points, QuizSettings, SessionSnapshot, SessionSummary};
use relic_core::{EngineSetupError, QuizEngine, QuizEvent};
use storage::pool::PoolLoader;
use storage::repository::{
    SessionSummaryRepository, SessionSummaryRow, SnapshotRepository, Storage,
};
use tracing::{debug, info, warn};

use super::session::QuizSession;
use crate::Clock;
use crate::error::SessionError;

/// Profile used when the caller does not name one.
pub const DEFAULT_PROFILE: &str = "default";

/// Orchestrates a quiz session: pool loading, resume, and persistence of
/// progress and history around the engine.
#[derive(Clone)]
pub struct QuizLoopService {
    clock: Clock,
    loader: Arc<dyn PoolLoader>,
    snapshots: Arc<dyn SnapshotRepository>,
    summaries: Arc<dyn SessionSummaryRepository>,
    settings: QuizSettings,
    profile: String,
    seed: Option<u64>,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(
        clock: Clock,
        loader: Arc<dyn PoolLoader>,
        snapshots: Arc<dyn SnapshotRepository>,
        summaries: Arc<dyn SessionSummaryRepository>,
        settings: QuizSettings,
    ) -> Self {
        Self {
            clock,
            loader,
            snapshots,
            summaries,
            settings,
            profile: DEFAULT_PROFILE.to_owned(),
            seed: None,
        }
    }

    #[must_use]
    pub fn from_storage(
        clock: Clock,
        loader: Arc<dyn PoolLoader>,
        storage: &Storage,
        settings: QuizSettings,
    ) -> Self {
        Self::new(
            clock,
            loader,
            Arc::clone(&storage.snapshots),
            Arc::clone(&storage.summaries),
            settings,
        )
    }

    #[must_use]
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
    }

    /// Seed the engine RNG so artifact order and choice order repeat.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn profile(&self) -> &str {
        &self.profile
    }

    #[must_use]
    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    /// Load the pool and continue the stored session, or start a fresh one.
    ///
    /// A stored snapshot that no longer fits the settings is discarded.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::PoolLoad` if the pool cannot be loaded,
    /// `SessionError::Setup` for invalid settings, and `SessionError::Storage`
    /// if the snapshot store fails.
    pub async fn start_session(&self) -> Result<QuizSession, SessionError> {
        self.settings.validate().map_err(EngineSetupError::from)?;
        let pool = self.loader.load().await?;
        let now = self.clock.now();

        let Some(record) = self.snapshots.load_snapshot(&self.profile).await? else {
            let engine = QuizEngine::with_rng(pool, self.settings.clone(), self.rng())?;
            info!(
                profile = %self.profile,
                artifacts = engine.pool().len(),
                "quiz session started"
            );
            return Ok(QuizSession::new(engine, now, false));
        };

        let stored_start = record.snapshot.started_at.filter(|at| *at <= now);
        match self.resume_engine(pool.clone(), record.snapshot) {
            Ok(mut engine) => {
                let mut started_at = stored_start.unwrap_or(now);
                if engine.is_session_complete() {
                    engine.restart_session()?;
                    started_at = now;
                }
                info!(
                    profile = %self.profile,
                    round_count = engine.session().round_count,
                    score = %engine.session().score,
                    "quiz session resumed"
                );
                Ok(QuizSession::new(engine, started_at, true))
            }
            Err(err) => {
                warn!(profile = %self.profile, error = %err, "discarding stored snapshot");
                self.snapshots.clear_snapshot(&self.profile).await?;
                let engine = QuizEngine::with_rng(pool, self.settings.clone(), self.rng())?;
                Ok(QuizSession::new(engine, now, false))
            }
        }
    }

    /// Open the next round.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Engine` for round ordering errors.
    pub fn start_round(&self, session: &mut QuizSession) -> Result<RoundReady, SessionError> {
        let ready = session.engine.start_round()?;
        info!(
            round = ready.round_number,
            artifact = %ready.artifact_id,
            "round started"
        );
        Ok(ready)
    }

    /// # Errors
    ///
    /// Returns `SessionError::Engine` if `answer` is not a presented choice or
    /// no round is live.
    pub fn select_answer(
        &self,
        session: &mut QuizSession,
        answer: &str,
    ) -> Result<(), SessionError> {
        session.engine.select_answer(answer)?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `SessionError::Engine` if no round is live.
    pub fn set_year_guess(&self, session: &mut QuizSession, year: i32) -> Result<(), SessionError> {
        session.engine.set_year_guess(year)?;
        Ok(())
    }

    /// Submit an answer and persist the result when the round finalizes.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Engine` for player or ordering errors (nothing
    /// is persisted), otherwise storage or summary failures.
    pub async fn submit(
        &self,
        session: &mut QuizSession,
        selected: Option<&str>,
        year_guess: i32,
    ) -> Result<Vec<QuizEvent>, SessionError> {
        let outcome = session.engine.submit(selected, year_guess)?;
        self.record(session, outcome).await
    }

    /// Submit the answer and year currently held by the round.
    ///
    /// # Errors
    ///
    /// Same as [`QuizLoopService::submit`].
    pub async fn submit_current(
        &self,
        session: &mut QuizSession,
    ) -> Result<Vec<QuizEvent>, SessionError> {
        let outcome = session.engine.submit_current()?;
        self.record(session, outcome).await
    }

    /// Advance the round countdown by one second.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Engine` once the session is complete, otherwise
    /// persistence failures from an expiry.
    pub async fn tick(&self, session: &mut QuizSession) -> Result<Vec<QuizEvent>, SessionError> {
        match session.engine.tick()? {
            TickOutcome::Expired(outcome) => {
                info!("round timer expired");
                let mut events = vec![QuizEvent::TimerTick { remaining_secs: 0 }];
                events.extend(self.record(session, outcome).await?);
                Ok(events)
            }
            other => Ok(other.into_events()),
        }
    }

    /// Start another session after completion. The used pool carries over.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Engine` if a round is still live, otherwise
    /// storage failures.
    pub async fn play_again(&self, session: &mut QuizSession) -> Result<(), SessionError> {
        session.engine.restart_session()?;
        session.started_at = self.clock.now();
        session.summary_id = None;
        self.save_progress(session).await?;
        info!(profile = %self.profile, "quiz session restarted");
        Ok(())
    }

    /// Stored session summaries, most recent first.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the history cannot be read.
    pub async fn history(&self, limit: u32) -> Result<Vec<SessionSummaryRow>, SessionError> {
        Ok(self.summaries.list_summaries(limit).await?)
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }

    fn resume_engine(
        &self,
        pool: ArtifactPool,
        snapshot: SessionSnapshot,
    ) -> Result<QuizEngine<StdRng>, EngineSetupError> {
        QuizEngine::resume_with_rng(pool, self.settings.clone(), snapshot, self.rng())
    }

    async fn save(&self, snapshot: &SessionSnapshot) -> Result<(), SessionError> {
        self.snapshots
            .save_snapshot(&self.profile, snapshot, self.clock.now())
            .await?;
        Ok(())
    }

    /// Save the engine state together with when the session began.
    async fn save_progress(&self, session: &QuizSession) -> Result<(), SessionError> {
        let mut snapshot = session.engine.snapshot();
        snapshot.started_at = Some(session.started_at);
        self.save(&snapshot).await
    }

    async fn record(
        &self,
        session: &mut QuizSession,
        outcome: SubmitOutcome,
    ) -> Result<Vec<QuizEvent>, SessionError> {
        if let SubmitOutcome::Retry(partial) = &outcome {
            debug!(
                lives_remaining = partial.lives_remaining,
                object_correct = partial.object_correct,
                year_correct = partial.year_correct,
                "attempt rejected"
            );
            return Ok(outcome.into_events());
        }

        if let Some(feedback) = outcome.final_feedback() {
            info!(
                round = feedback.round_count,
                points = %feedback.points_earned,
                score = %feedback.cumulative_score,
                timed_out = feedback.timed_out,
                "round finalized"
            );
        }

        match outcome.session_complete() {
            Some(done) => {
                let summary = SessionSummary::from_persisted(
                    session.started_at,
                    self.clock.now(),
                    done.rounds_played,
                    done.final_score,
                    done.max_score,
                )?;
                let id = self.summaries.append_summary(&summary).await?;
                session.summary_id = Some(id);

                let next = SessionSnapshot {
                    round_count: 0,
                    score: Points::ZERO,
                    used_pool: session.engine.session().used_pool.clone(),
                    started_at: None,
                };
                self.save(&next).await?;
                info!(
                    summary_id = id,
                    final_score = %done.final_score,
                    max_score = %done.max_score,
                    duration_secs = self.clock.elapsed_since(session.started_at).num_seconds(),
                    "quiz session completed"
                );
            }
            None => self.save_progress(session).await?,
        }

        Ok(outcome.into_events())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use relic_core::model::ArtifactId;
    use relic_core::time::fixed_clock;
    use storage::pool::StaticPoolLoader;
    use storage::repository::InMemoryRepository;

    const POOL: &str = r#"[
        {"imageURL": "vase.png", "correctAnswer": "Vase",
         "distractors": ["Urn"], "correctYear": 1200},
        {"imageURL": "lamp.png", "correctAnswer": "Lamp",
         "distractors": ["Jug"], "correctYear": 300}
    ]"#;

    fn service(repo: &InMemoryRepository, settings: QuizSettings) -> QuizLoopService {
        QuizLoopService::new(
            fixed_clock(),
            Arc::new(StaticPoolLoader::from_json(POOL).unwrap()),
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
            settings,
        )
        .with_seed(7)
    }

    fn year_of(session: &QuizSession) -> i32 {
        match session.attempt().unwrap().artifact().correct_answer() {
            "Vase" => 1200,
            _ => 300,
        }
    }

    #[tokio::test]
    async fn retry_is_not_persisted() {
        let repo = InMemoryRepository::new();
        let svc = service(&repo, QuizSettings::default());
        let mut session = svc.start_session().await.unwrap();
        svc.start_round(&mut session).unwrap();

        let wrong = session.attempt().unwrap().artifact().distractors()[0].clone();
        let events = svc.submit(&mut session, Some(&wrong), -3000).await.unwrap();
        assert!(matches!(events[0], QuizEvent::PartialFeedback(_)));
        assert!(repo.load_snapshot(DEFAULT_PROFILE).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn finalized_round_saves_snapshot() {
        let repo = InMemoryRepository::new();
        let svc = service(&repo, QuizSettings::default());
        let mut session = svc.start_session().await.unwrap();
        let ready = svc.start_round(&mut session).unwrap();

        let answer = session.attempt().unwrap().artifact().correct_answer().to_owned();
        let year = year_of(&session);
        let events = svc.submit(&mut session, Some(&answer), year).await.unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1], QuizEvent::ReadyForNextRound { round_count: 1 });

        let stored = repo.load_snapshot(DEFAULT_PROFILE).await.unwrap().unwrap();
        assert_eq!(stored.snapshot.round_count, 1);
        assert_eq!(stored.snapshot.score, Points::whole(5));
        assert!(stored.snapshot.used_pool.contains(ready.artifact_id));
    }

    #[tokio::test]
    async fn invalid_snapshot_is_discarded() {
        let repo = InMemoryRepository::new();
        let snapshot = SessionSnapshot {
            round_count: 40,
            score: Points::whole(3),
            used_pool: [ArtifactId::new(0)].into_iter().collect(),
            started_at: None,
        };
        repo.save_snapshot(DEFAULT_PROFILE, &snapshot, relic_core::time::fixed_now())
            .await
            .unwrap();

        let svc = service(&repo, QuizSettings::default());
        let session = svc.start_session().await.unwrap();
        assert!(!session.is_resumed());
        assert_eq!(session.state().round_count, 0);
        assert!(repo.load_snapshot(DEFAULT_PROFILE).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn no_answer_is_recoverable_and_changes_nothing() {
        let repo = InMemoryRepository::new();
        let svc = service(&repo, QuizSettings::default());
        let mut session = svc.start_session().await.unwrap();
        svc.start_round(&mut session).unwrap();

        let err = svc.submit(&mut session, None, 0).await.unwrap_err();
        assert!(err.is_recoverable());
        assert_eq!(session.attempt().unwrap().lives_remaining(), 2);
    }
}
