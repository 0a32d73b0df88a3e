use relic_core::model::SessionSummary;
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{points_from_i64, points_to_i64, ser, u32_from_i64};
use crate::repository::{SessionSummaryRepository, SessionSummaryRow, StorageError};

fn map_summary_row(row: &sqlx::sqlite::SqliteRow) -> Result<SessionSummary, StorageError> {
    let started_at = row.try_get("started_at").map_err(ser)?;
    let completed_at = row.try_get("completed_at").map_err(ser)?;
    let rounds_played = u32_from_i64(
        "rounds_played",
        row.try_get::<i64, _>("rounds_played").map_err(ser)?,
    )?;
    let final_score = points_from_i64(
        "final_score_halves",
        row.try_get::<i64, _>("final_score_halves").map_err(ser)?,
    )?;
    let max_score = points_from_i64(
        "max_score_halves",
        row.try_get::<i64, _>("max_score_halves").map_err(ser)?,
    )?;

    SessionSummary::from_persisted(started_at, completed_at, rounds_played, final_score, max_score)
        .map_err(ser)
}

#[async_trait::async_trait]
impl SessionSummaryRepository for SqliteRepository {
    async fn append_summary(&self, summary: &SessionSummary) -> Result<i64, StorageError> {
        let res = sqlx::query(
            r"
                INSERT INTO session_summaries (
                    started_at, completed_at, rounds_played,
                    final_score_halves, max_score_halves
                )
                VALUES (?1, ?2, ?3, ?4, ?5)
            ",
        )
        .bind(summary.started_at())
        .bind(summary.completed_at())
        .bind(i64::from(summary.rounds_played()))
        .bind(points_to_i64(summary.final_score()))
        .bind(points_to_i64(summary.max_score()))
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(res.last_insert_rowid())
    }

    async fn get_summary(&self, id: i64) -> Result<SessionSummary, StorageError> {
        let row = sqlx::query(
            r"
                SELECT started_at, completed_at, rounds_played,
                       final_score_halves, max_score_halves
                FROM session_summaries
                WHERE id = ?1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?
        .ok_or(StorageError::NotFound)?;

        map_summary_row(&row)
    }

    async fn list_summaries(&self, limit: u32) -> Result<Vec<SessionSummaryRow>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT id, started_at, completed_at, rounds_played,
                       final_score_halves, max_score_halves
                FROM session_summaries
                ORDER BY completed_at DESC, id DESC
                LIMIT ?1
            ",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let id: i64 = row.try_get("id").map_err(ser)?;
            out.push(SessionSummaryRow {
                id,
                summary: map_summary_row(&row)?,
            });
        }
        Ok(out)
    }
}
