#![forbid(unsafe_code)]

pub mod error;
pub mod sessions;

pub use relic_core::Clock;

pub use error::SessionError;
pub use sessions::{DEFAULT_PROFILE, QuizLoopService, QuizSession};
