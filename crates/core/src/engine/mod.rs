//! Round engine: the per-session state machine.
//!
//! A round moves `AwaitingAnswer -> (Retry | Finalized)`. A retry keeps the
//! round alive with one life fewer; finalization applies the score exactly
//! once and stops the countdown. The engine never spawns timers itself:
//! callers feed it `tick()` once per second in timed mode.

mod attempt;
mod event;
mod timer;

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

pub use attempt::{AttemptState, FirstTry};
pub use event::{
    FinalFeedback, NextStep, PartialFeedback, QuizEvent, RoundReady, SessionComplete,
    SubmitOutcome, TickOutcome,
};
pub use timer::{RoundTimer, TimerStatus};

use crate::error::{EngineError, EngineSetupError};
use crate::model::{ArtifactPool, Points, QuizSettings, SessionSnapshot, SessionState};
use crate::picker::{ArtifactPicker, shuffle_choices};
use crate::scoring::{MAX_ROUND_POINTS, score_attempt};

/// Owns one player's session: pool, settings, progress and the live round.
#[derive(Debug)]
pub struct QuizEngine<R = StdRng> {
    pool: ArtifactPool,
    settings: QuizSettings,
    session: SessionState,
    round: Option<AttemptState>,
    rng: R,
}

impl QuizEngine<StdRng> {
    /// Start a fresh session seeded from the OS.
    ///
    /// # Errors
    ///
    /// Returns `EngineSetupError::InvalidSettings` if `settings` fail validation.
    pub fn start_session(
        pool: ArtifactPool,
        settings: QuizSettings,
    ) -> Result<Self, EngineSetupError> {
        Self::with_rng(pool, settings, StdRng::from_os_rng())
    }

    /// Continue a stored session seeded from the OS.
    ///
    /// # Errors
    ///
    /// See [`QuizEngine::resume_with_rng`].
    pub fn resume(
        pool: ArtifactPool,
        settings: QuizSettings,
        snapshot: SessionSnapshot,
    ) -> Result<Self, EngineSetupError> {
        Self::resume_with_rng(pool, settings, snapshot, StdRng::from_os_rng())
    }
}

impl<R: Rng> QuizEngine<R> {
    /// Start a fresh session with a caller-supplied RNG.
    ///
    /// # Errors
    ///
    /// Returns `EngineSetupError::InvalidSettings` if `settings` fail validation.
    pub fn with_rng(
        pool: ArtifactPool,
        settings: QuizSettings,
        rng: R,
    ) -> Result<Self, EngineSetupError> {
        Self::resume_with_rng(pool, settings, SessionSnapshot::default(), rng)
    }

    /// Continue from a snapshot. Used-pool entries outside the pool are dropped.
    ///
    /// # Errors
    ///
    /// Returns `EngineSetupError::InvalidSettings` for invalid settings and
    /// `EngineSetupError::RoundCountExceedsSession` if the snapshot claims more
    /// rounds than the session allows.
    pub fn resume_with_rng(
        pool: ArtifactPool,
        settings: QuizSettings,
        snapshot: SessionSnapshot,
        rng: R,
    ) -> Result<Self, EngineSetupError> {
        settings.validate()?;
        if snapshot.round_count > settings.session_length() {
            return Err(EngineSetupError::RoundCountExceedsSession {
                round_count: snapshot.round_count,
                session_length: settings.session_length(),
            });
        }

        let mut session = SessionState::from(snapshot);
        session.used_pool.retain_within(pool.len());

        Ok(Self {
            pool,
            settings,
            session,
            round: None,
            rng,
        })
    }

    #[must_use]
    pub fn pool(&self) -> &ArtifactPool {
        &self.pool
    }

    #[must_use]
    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    #[must_use]
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// The current round, finalized or not. `None` before the first round.
    #[must_use]
    pub fn attempt(&self) -> Option<&AttemptState> {
        self.round.as_ref()
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::from(&self.session)
    }

    #[must_use]
    pub fn is_session_complete(&self) -> bool {
        self.session.round_count >= self.settings.session_length()
    }

    #[must_use]
    pub fn max_score(&self) -> Points {
        MAX_ROUND_POINTS * self.settings.session_length()
    }

    /// Pick the next artifact and open a round for it.
    ///
    /// # Errors
    ///
    /// - `SessionComplete` once the session length is reached
    /// - `RoundInProgress` if the current round is not finalized
    pub fn start_round(&mut self) -> Result<RoundReady, EngineError> {
        if self.is_session_complete() {
            return Err(EngineError::SessionComplete);
        }
        if self.round.as_ref().is_some_and(|r| !r.finalized) {
            return Err(EngineError::RoundInProgress);
        }

        let (artifact_id, artifact, used) =
            ArtifactPicker::next(self.pool.artifacts(), &self.session.used_pool, &mut self.rng)?;
        let artifact = artifact.clone();
        self.session.used_pool = used;

        let choices = shuffle_choices(&artifact, &mut self.rng);
        let lives = self.settings.lives_per_round();
        let year_guess = self.settings.slider_start_year();
        let timer = self
            .settings
            .timed_mode()
            .then(|| RoundTimer::start(self.settings.time_limit_secs()));

        let ready = RoundReady {
            artifact_id,
            image_ref: artifact.image_ref().to_owned(),
            choices: choices.clone(),
            round_number: self.session.round_count + 1,
            lives_remaining: lives,
            time_limit_secs: timer.map(|t| t.limit_secs()),
            year_guess,
        };

        // Replacing the attempt drops the previous round's timer.
        self.round = Some(AttemptState::new(artifact, choices, lives, year_guess, timer));
        Ok(ready)
    }

    /// Record the player's multiple-choice pick.
    ///
    /// # Errors
    ///
    /// `UnknownChoice` if `answer` was not presented, plus the round-state
    /// errors of [`QuizEngine::submit`].
    pub fn select_answer(&mut self, answer: &str) -> Result<(), EngineError> {
        let round = self.live_round_mut()?;
        if !round.is_choice(answer) {
            return Err(EngineError::UnknownChoice(answer.to_owned()));
        }
        round.selected_answer = Some(answer.to_owned());
        Ok(())
    }

    /// Record the slider position.
    ///
    /// # Errors
    ///
    /// The round-state errors of [`QuizEngine::submit`].
    pub fn set_year_guess(&mut self, year: i32) -> Result<(), EngineError> {
        self.live_round_mut()?.year_guess = year;
        Ok(())
    }

    /// Submit an answer and year guess for the current round.
    ///
    /// # Errors
    ///
    /// - `NoAnswerSelected` if `selected` is `None` (nothing changes)
    /// - `UnknownChoice` if `selected` was not presented
    /// - `NoActiveRound`, `RoundAlreadyFinalized` or `SessionComplete` when
    ///   called outside a live round
    pub fn submit(
        &mut self,
        selected: Option<&str>,
        year_guess: i32,
    ) -> Result<SubmitOutcome, EngineError> {
        let round = self.live_round_mut()?;
        if let Some(answer) = selected {
            if !round.is_choice(answer) {
                return Err(EngineError::UnknownChoice(answer.to_owned()));
            }
        }
        let expired = round.timer.is_some_and(|t| t.is_expired());
        if selected.is_none() && !expired {
            return Err(EngineError::NoAnswerSelected);
        }

        round.selected_answer = selected.map(str::to_owned);
        round.year_guess = year_guess;
        self.evaluate(expired)
    }

    /// Submit whatever answer and year are currently held.
    ///
    /// # Errors
    ///
    /// Same as [`QuizEngine::submit`].
    pub fn submit_current(&mut self) -> Result<SubmitOutcome, EngineError> {
        let round = self.live_round_mut()?;
        let selected = round.selected_answer.clone();
        let year_guess = round.year_guess;
        self.submit(selected.as_deref(), year_guess)
    }

    /// Advance the countdown by one second.
    ///
    /// When it reaches zero the round is finalized with the held answer and
    /// year, even if no answer was selected.
    ///
    /// # Errors
    ///
    /// `SessionComplete` once the session has ended.
    pub fn tick(&mut self) -> Result<TickOutcome, EngineError> {
        if self.is_session_complete() && self.round.as_ref().is_none_or(|r| r.finalized) {
            return Err(EngineError::SessionComplete);
        }

        let Some(round) = self.round.as_mut().filter(|r| !r.finalized) else {
            return Ok(TickOutcome::Idle);
        };
        let Some(timer) = round.timer.as_mut() else {
            return Ok(TickOutcome::Idle);
        };

        match timer.tick() {
            TimerStatus::Running { remaining_secs } => Ok(TickOutcome::Running { remaining_secs }),
            TimerStatus::Expired => Ok(TickOutcome::Expired(self.evaluate(true)?)),
        }
    }

    /// Begin a new session after the previous one: round count and score go
    /// back to zero, the used pool carries over so the cycle continues.
    ///
    /// # Errors
    ///
    /// `RoundInProgress` if a round is still live.
    pub fn restart_session(&mut self) -> Result<(), EngineError> {
        if self.round.as_ref().is_some_and(|r| !r.finalized) {
            return Err(EngineError::RoundInProgress);
        }
        self.session.round_count = 0;
        self.session.score = Points::ZERO;
        self.round = None;
        Ok(())
    }

    fn live_round_mut(&mut self) -> Result<&mut AttemptState, EngineError> {
        let complete = self.is_session_complete();
        match self.round.as_mut() {
            Some(round) if !round.finalized => Ok(round),
            _ if complete => Err(EngineError::SessionComplete),
            Some(_) => Err(EngineError::RoundAlreadyFinalized),
            None => Err(EngineError::NoActiveRound),
        }
    }

    fn evaluate(&mut self, timed_out: bool) -> Result<SubmitOutcome, EngineError> {
        let settings = &self.settings;
        let session = &mut self.session;
        let round = self
            .round
            .as_mut()
            .filter(|r| !r.finalized)
            .ok_or(EngineError::NoActiveRound)?;

        round.attempts_made += 1;
        let object_correct = round
            .selected_answer
            .as_deref()
            .is_some_and(|answer| round.artifact.is_correct_answer(answer));
        let year = round.artifact.correct_year().evaluate(round.year_guess);
        let perfect = object_correct && year.correct;

        if !perfect && round.lives_remaining > 1 && !timed_out {
            round.lives_remaining -= 1;
            round.first_try.latch(object_correct);
            if settings.restart_timer_on_retry() {
                if let Some(timer) = round.timer.as_mut() {
                    timer.restart();
                }
            }
            return Ok(SubmitOutcome::Retry(PartialFeedback {
                object_correct,
                year_correct: year.correct,
                lives_remaining: round.lives_remaining,
                remaining_secs: round.remaining_secs(),
            }));
        }

        round.first_try.latch(object_correct);
        let points = score_attempt(object_correct, round.first_try.get(), year.diff);
        let earned = points.total();

        session.score += earned;
        session.round_count += 1;
        round.finalized = true;
        round.timer = None;

        let feedback = FinalFeedback {
            artifact_id: round.artifact.id(),
            selected_answer: round.selected_answer.clone(),
            object_correct,
            correct_answer: round.artifact.correct_answer().to_owned(),
            year_guess: round.year_guess,
            year_correct: year.correct,
            correct_year: round.artifact.correct_year(),
            year_diff: year.diff,
            points,
            points_earned: earned,
            cumulative_score: session.score,
            round_count: session.round_count,
            timed_out,
        };

        let next = if session.round_count >= settings.session_length() {
            NextStep::SessionComplete(SessionComplete {
                final_score: session.score,
                rounds_played: session.round_count,
                max_score: MAX_ROUND_POINTS * settings.session_length(),
            })
        } else {
            NextStep::NextRound
        };

        Ok(SubmitOutcome::Finalized { feedback, next })
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
