use crate::engine::timer::RoundTimer;
use crate::model::{Artifact, ArtifactId};

/// Whether the object was named correctly on the first submission of a round.
///
/// Starts unknown and can be set once; later writes are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FirstTry(Option<bool>);

impl FirstTry {
    /// Record the first-submission result. Returns false if already set.
    pub fn latch(&mut self, object_correct: bool) -> bool {
        if self.0.is_some() {
            return false;
        }
        self.0 = Some(object_correct);
        true
    }

    #[must_use]
    pub fn get(&self) -> Option<bool> {
        self.0
    }
}

/// Live state of one round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptState {
    pub(crate) artifact: Artifact,
    pub(crate) choices: Vec<String>,
    pub(crate) lives_remaining: u32,
    pub(crate) selected_answer: Option<String>,
    pub(crate) year_guess: i32,
    pub(crate) first_try: FirstTry,
    pub(crate) timer: Option<RoundTimer>,
    pub(crate) attempts_made: u32,
    pub(crate) finalized: bool,
}

impl AttemptState {
    pub(crate) fn new(
        artifact: Artifact,
        choices: Vec<String>,
        lives: u32,
        year_guess: i32,
        timer: Option<RoundTimer>,
    ) -> Self {
        Self {
            artifact,
            choices,
            lives_remaining: lives,
            selected_answer: None,
            year_guess,
            first_try: FirstTry::default(),
            timer,
            attempts_made: 0,
            finalized: false,
        }
    }

    #[must_use]
    pub fn artifact_id(&self) -> ArtifactId {
        self.artifact.id()
    }

    #[must_use]
    pub fn artifact(&self) -> &Artifact {
        &self.artifact
    }

    #[must_use]
    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    #[must_use]
    pub fn lives_remaining(&self) -> u32 {
        self.lives_remaining
    }

    #[must_use]
    pub fn selected_answer(&self) -> Option<&str> {
        self.selected_answer.as_deref()
    }

    #[must_use]
    pub fn year_guess(&self) -> i32 {
        self.year_guess
    }

    #[must_use]
    pub fn first_try(&self) -> FirstTry {
        self.first_try
    }

    #[must_use]
    pub fn remaining_secs(&self) -> Option<u32> {
        self.timer.map(|t| t.remaining_secs())
    }

    #[must_use]
    pub fn has_active_timer(&self) -> bool {
        self.timer.is_some()
    }

    #[must_use]
    pub fn attempts_made(&self) -> u32 {
        self.attempts_made
    }

    #[must_use]
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub(crate) fn is_choice(&self, answer: &str) -> bool {
        self.choices.iter().any(|c| c == answer)
    }
}
