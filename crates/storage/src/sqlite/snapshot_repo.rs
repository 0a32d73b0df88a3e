use async_trait::async_trait;
use chrono::{DateTime, Utc};
use relic_core::model::SessionSnapshot;
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{
    points_from_i64, points_to_i64, ser, u32_from_i64, used_pool_from_json, used_pool_to_json,
};
use crate::repository::{SnapshotRecord, SnapshotRepository, StorageError};

fn map_snapshot_row(row: &sqlx::sqlite::SqliteRow) -> Result<SnapshotRecord, StorageError> {
    let round_count = u32_from_i64(
        "round_count",
        row.try_get::<i64, _>("round_count").map_err(ser)?,
    )?;
    let score = points_from_i64(
        "score_halves",
        row.try_get::<i64, _>("score_halves").map_err(ser)?,
    )?;
    let used_pool = used_pool_from_json(&row.try_get::<String, _>("used_pool").map_err(ser)?)?;
    let saved_at: DateTime<Utc> = row.try_get("saved_at").map_err(ser)?;
    let started_at: Option<DateTime<Utc>> = row.try_get("started_at").map_err(ser)?;

    Ok(SnapshotRecord {
        snapshot: SessionSnapshot {
            round_count,
            score,
            used_pool,
            started_at,
        },
        saved_at,
    })
}

#[async_trait]
impl SnapshotRepository for SqliteRepository {
    async fn load_snapshot(&self, profile: &str) -> Result<Option<SnapshotRecord>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT round_count, score_halves, used_pool, started_at, saved_at
            FROM session_snapshots
            WHERE profile = ?1
            ",
        )
        .bind(profile)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        row.as_ref().map(map_snapshot_row).transpose()
    }

    async fn save_snapshot(
        &self,
        profile: &str,
        snapshot: &SessionSnapshot,
        saved_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO session_snapshots (
                profile, round_count, score_halves, used_pool, started_at, saved_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(profile) DO UPDATE SET
                round_count = excluded.round_count,
                score_halves = excluded.score_halves,
                used_pool = excluded.used_pool,
                started_at = excluded.started_at,
                saved_at = excluded.saved_at
            ",
        )
        .bind(profile)
        .bind(i64::from(snapshot.round_count))
        .bind(points_to_i64(snapshot.score))
        .bind(used_pool_to_json(&snapshot.used_pool)?)
        .bind(snapshot.started_at)
        .bind(saved_at)
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }

    async fn clear_snapshot(&self, profile: &str) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM session_snapshots WHERE profile = ?1")
            .bind(profile)
            .execute(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;
        Ok(())
    }
}
