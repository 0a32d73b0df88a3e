mod session;
mod workflow;

pub use crate::error::SessionError;
pub use session::QuizSession;
pub use workflow::{DEFAULT_PROFILE, QuizLoopService};
