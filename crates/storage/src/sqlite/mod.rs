use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use thiserror::Error;

use crate::repository::{SessionSummaryRepository, SnapshotRepository, Storage};

mod location;
mod mapping;
mod migrate;
mod session_summary_repo;
mod snapshot_repo;

pub use location::{DatabaseLocation, DatabaseUrlError};

/// One quiz database holding both snapshots and session summaries.
#[derive(Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SqliteInitError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error("cannot create database directory: {0}")]
    Io(#[from] std::io::Error),
}

impl SqliteRepository {
    /// Open the database at `database_url`, creating the file when missing.
    /// Connections use WAL journaling and wait up to five seconds on locks.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if the URL is malformed or the connection
    /// cannot be established.
    pub async fn connect(database_url: &str) -> Result<Self, SqliteInitError> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(5))
            .connect_with(options)
            .await?;
        tracing::debug!(url = database_url, "connected to sqlite");
        Ok(Self { pool })
    }

    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Bring the schema up to the latest version.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if migration queries fail.
    pub async fn migrate(&self) -> Result<(), SqliteInitError> {
        migrate::run_migrations(&self.pool).await
    }
}

impl Storage {
    /// Open and migrate the quiz database, creating the parent directory of
    /// a file database first.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if the directory, connection or migrations
    /// fail.
    pub async fn open(location: &DatabaseLocation) -> Result<Self, SqliteInitError> {
        if let Some(parent) = location.file_path().and_then(Path::parent) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let repo = SqliteRepository::connect(&location.url()).await?;
        repo.migrate().await?;
        let snapshots: Arc<dyn SnapshotRepository> = Arc::new(repo.clone());
        let summaries: Arc<dyn SessionSummaryRepository> = Arc::new(repo);
        Ok(Self {
            snapshots,
            summaries,
        })
    }
}
