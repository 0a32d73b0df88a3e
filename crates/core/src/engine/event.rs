use serde::Serialize;

use crate::model::{ArtifactId, CorrectYear, Points};
use crate::scoring::AwardedPoints;

/// A new round is ready to be shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundReady {
    pub artifact_id: ArtifactId,
    pub image_ref: String,
    /// Answer and distractors in display order.
    pub choices: Vec<String>,
    pub round_number: u32,
    pub lives_remaining: u32,
    pub time_limit_secs: Option<u32>,
    pub year_guess: i32,
}

/// Feedback after a missed attempt that still leaves a retry.
///
/// Only says which half was right, never the correct values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PartialFeedback {
    pub object_correct: bool,
    pub year_correct: bool,
    pub lives_remaining: u32,
    pub remaining_secs: Option<u32>,
}

/// Full disclosure once a round is finalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinalFeedback {
    pub artifact_id: ArtifactId,
    pub selected_answer: Option<String>,
    pub object_correct: bool,
    pub correct_answer: String,
    pub year_guess: i32,
    pub year_correct: bool,
    pub correct_year: CorrectYear,
    pub year_diff: u32,
    pub points: AwardedPoints,
    pub points_earned: Points,
    pub cumulative_score: Points,
    pub round_count: u32,
    pub timed_out: bool,
}

impl FinalFeedback {
    #[must_use]
    pub fn is_perfect(&self) -> bool {
        self.object_correct && self.year_correct
    }
}

/// The last round of the session has been finalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionComplete {
    pub final_score: Points,
    pub rounds_played: u32,
    pub max_score: Points,
}

/// What the UI should offer after a finalized round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextStep {
    NextRound,
    SessionComplete(SessionComplete),
}

/// Result of one evaluated submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Retry(PartialFeedback),
    Finalized {
        feedback: FinalFeedback,
        next: NextStep,
    },
}

impl SubmitOutcome {
    #[must_use]
    pub fn is_finalized(&self) -> bool {
        matches!(self, SubmitOutcome::Finalized { .. })
    }

    #[must_use]
    pub fn final_feedback(&self) -> Option<&FinalFeedback> {
        match self {
            SubmitOutcome::Finalized { feedback, .. } => Some(feedback),
            SubmitOutcome::Retry(_) => None,
        }
    }

    #[must_use]
    pub fn session_complete(&self) -> Option<SessionComplete> {
        match self {
            SubmitOutcome::Finalized {
                next: NextStep::SessionComplete(done),
                ..
            } => Some(*done),
            _ => None,
        }
    }

    #[must_use]
    pub fn into_events(self) -> Vec<QuizEvent> {
        match self {
            SubmitOutcome::Retry(partial) => vec![QuizEvent::PartialFeedback(partial)],
            SubmitOutcome::Finalized { feedback, next } => {
                let round_count = feedback.round_count;
                let follow_up = match next {
                    NextStep::NextRound => QuizEvent::ReadyForNextRound { round_count },
                    NextStep::SessionComplete(done) => QuizEvent::SessionComplete(done),
                };
                vec![QuizEvent::FinalFeedback(feedback), follow_up]
            }
        }
    }
}

/// Result of a timer tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// No countdown is running.
    Idle,
    Running { remaining_secs: u32 },
    /// The countdown hit zero and the round was force-submitted.
    Expired(SubmitOutcome),
}

impl TickOutcome {
    #[must_use]
    pub fn into_events(self) -> Vec<QuizEvent> {
        match self {
            TickOutcome::Idle => Vec::new(),
            TickOutcome::Running { remaining_secs } => {
                vec![QuizEvent::TimerTick { remaining_secs }]
            }
            TickOutcome::Expired(outcome) => {
                let mut events = vec![QuizEvent::TimerTick { remaining_secs: 0 }];
                events.extend(outcome.into_events());
                events
            }
        }
    }
}

/// Everything the engine reports to a UI binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum QuizEvent {
    RoundReady(RoundReady),
    PartialFeedback(PartialFeedback),
    FinalFeedback(FinalFeedback),
    ReadyForNextRound { round_count: u32 },
    SessionComplete(SessionComplete),
    TimerTick { remaining_secs: u32 },
}

impl QuizEvent {
    #[must_use]
    pub fn event_name(&self) -> &'static str {
        match self {
            QuizEvent::RoundReady(_) => "round-ready",
            QuizEvent::PartialFeedback(_) => "partial-feedback",
            QuizEvent::FinalFeedback(_) => "final-feedback",
            QuizEvent::ReadyForNextRound { .. } => "ready-for-next-round",
            QuizEvent::SessionComplete(_) => "session-complete",
            QuizEvent::TimerTick { .. } => "timer-tick",
        }
    }
}
