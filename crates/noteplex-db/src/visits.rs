//! Note visit repository implementation.

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use noteplex_core::{Error, NoteVisit, NoteVisitRepository, Result};

/// PostgreSQL implementation of NoteVisitRepository.
pub struct PgNoteVisitRepository {
    pool: Pool<Postgres>,
}

impl PgNoteVisitRepository {
    /// Create a new PgNoteVisitRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NoteVisitRepository for PgNoteVisitRepository {
    async fn record_visit(&self, note_id: i64, user_id: i64) -> Result<NoteVisit> {
        sqlx::query_as(
            "INSERT INTO note_visits (note_id, user_id, visited_at) VALUES ($1, $2, now())
             ON CONFLICT (note_id, user_id) DO UPDATE SET visited_at = now()
             RETURNING note_id, user_id, visited_at",
        )
        .bind(note_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)
    }

    async fn list_for_user(&self, user_id: i64) -> Result<Vec<NoteVisit>> {
        sqlx::query_as(
            "SELECT note_id, user_id, visited_at FROM note_visits
             WHERE user_id = $1
             ORDER BY visited_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)
    }
}
