#![forbid(unsafe_code)]

pub mod engine;
pub mod error;
pub mod model;
pub mod picker;
pub mod scoring;
pub mod time;

pub use engine::{QuizEngine, QuizEvent, SubmitOutcome, TickOutcome};
pub use error::{EngineError, EngineSetupError};
pub use time::Clock;
