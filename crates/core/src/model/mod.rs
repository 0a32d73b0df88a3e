mod artifact;
mod ids;
mod points;
mod pool;
mod session;
mod settings;
mod year;

pub use artifact::{Artifact, ArtifactDraft, ArtifactError};
pub use ids::{ArtifactId, ParseIdError};
pub use points::{Points, PointsError};
pub use pool::{ArtifactPool, PoolError};
pub use session::{
    SessionSnapshot, SessionState, SessionSummary, SessionSummaryError, UsedPool,
};
pub use settings::{QuizSettings, SettingsError, TIME_LIMIT_RANGE};
pub use year::{CorrectYear, YearCheck};
