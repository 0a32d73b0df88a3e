use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Allowed countdown length per round, in seconds.
pub const TIME_LIMIT_RANGE: RangeInclusive<u32> = 5..=600;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("session length must be > 0")]
    InvalidSessionLength,

    #[error("lives per round must be > 0")]
    InvalidLivesPerRound,

    #[error("time limit must be between 5 and 600 seconds, got {0}")]
    InvalidTimeLimit(u32),
}

//
// ─── SETTINGS ──────────────────────────────────────────────────────────────────
//

/// Quiz configuration.
///
/// Defaults:
/// - 5 rounds per session
/// - 2 lives per round (one retry)
/// - untimed, with a 90 second limit once timed mode is switched on
/// - the countdown restarts after a retry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizSettings {
    session_length: u32,
    timed_mode: bool,
    time_limit_secs: u32,
    lives_per_round: u32,
    restart_timer_on_retry: bool,
    slider_start_year: i32,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            session_length: 5,
            timed_mode: false,
            time_limit_secs: 90,
            lives_per_round: 2,
            restart_timer_on_retry: true,
            slider_start_year: -3000,
        }
    }
}

impl QuizSettings {
    /// Creates custom settings.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if the session length or lives are zero, or the
    /// time limit is outside `TIME_LIMIT_RANGE`.
    pub fn new(
        session_length: u32,
        timed_mode: bool,
        time_limit_secs: u32,
        lives_per_round: u32,
    ) -> Result<Self, SettingsError> {
        Self::default()
            .with_session_length(session_length)?
            .with_timed_mode(timed_mode)
            .with_time_limit_secs(time_limit_secs)?
            .with_lives_per_round(lives_per_round)
    }

    /// # Errors
    ///
    /// Returns `SettingsError::InvalidSessionLength` for zero.
    pub fn with_session_length(mut self, rounds: u32) -> Result<Self, SettingsError> {
        if rounds == 0 {
            return Err(SettingsError::InvalidSessionLength);
        }
        self.session_length = rounds;
        Ok(self)
    }

    #[must_use]
    pub fn with_timed_mode(mut self, timed: bool) -> Self {
        self.timed_mode = timed;
        self
    }

    /// # Errors
    ///
    /// Returns `SettingsError::InvalidTimeLimit` outside `TIME_LIMIT_RANGE`.
    pub fn with_time_limit_secs(mut self, secs: u32) -> Result<Self, SettingsError> {
        if !TIME_LIMIT_RANGE.contains(&secs) {
            return Err(SettingsError::InvalidTimeLimit(secs));
        }
        self.time_limit_secs = secs;
        Ok(self)
    }

    /// # Errors
    ///
    /// Returns `SettingsError::InvalidLivesPerRound` for zero.
    pub fn with_lives_per_round(mut self, lives: u32) -> Result<Self, SettingsError> {
        if lives == 0 {
            return Err(SettingsError::InvalidLivesPerRound);
        }
        self.lives_per_round = lives;
        Ok(self)
    }

    #[must_use]
    pub fn with_restart_timer_on_retry(mut self, restart: bool) -> Self {
        self.restart_timer_on_retry = restart;
        self
    }

    #[must_use]
    pub fn with_slider_start_year(mut self, year: i32) -> Self {
        self.slider_start_year = year;
        self
    }

    /// Re-check values that may have come through deserialization.
    ///
    /// # Errors
    ///
    /// Returns the first `SettingsError` found.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.session_length == 0 {
            return Err(SettingsError::InvalidSessionLength);
        }
        if self.lives_per_round == 0 {
            return Err(SettingsError::InvalidLivesPerRound);
        }
        if !TIME_LIMIT_RANGE.contains(&self.time_limit_secs) {
            return Err(SettingsError::InvalidTimeLimit(self.time_limit_secs));
        }
        Ok(())
    }

    #[must_use]
    pub fn session_length(&self) -> u32 {
        self.session_length
    }

    #[must_use]
    pub fn timed_mode(&self) -> bool {
        self.timed_mode
    }

    #[must_use]
    pub fn time_limit_secs(&self) -> u32 {
        self.time_limit_secs
    }

    #[must_use]
    pub fn lives_per_round(&self) -> u32 {
        self.lives_per_round
    }

    #[must_use]
    pub fn restart_timer_on_retry(&self) -> bool {
        self.restart_timer_on_retry
    }

    #[must_use]
    pub fn slider_start_year(&self) -> i32 {
        self.slider_start_year
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
