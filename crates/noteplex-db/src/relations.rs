//! Note relation repository implementation.

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row};

use noteplex_core::{defaults::MAX_ANCESTOR_DEPTH, Error, NoteRelationRepository, Result};

/// PostgreSQL implementation of NoteRelationRepository.
pub struct PgNoteRelationRepository {
    pool: Pool<Postgres>,
}

impl PgNoteRelationRepository {
    /// Create a new PgNoteRelationRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NoteRelationRepository for PgNoteRelationRepository {
    async fn get_parent_note_id(&self, note_id: i64) -> Result<Option<i64>> {
        let row = sqlx::query("SELECT parent_id FROM note_relations WHERE note_id = $1")
            .bind(note_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(row.map(|r| r.get("parent_id")))
    }

    /// Link a note under a parent, replacing any existing link.
    ///
    /// Walks the prospective parent's ancestor chain (bounded) before
    /// writing: linking must never close a cycle, since readers only
    /// bound their walks rather than repair them.
    async fn set_parent(&self, note_id: i64, parent_id: i64) -> Result<()> {
        if note_id == parent_id {
            return Err(Error::InvalidInput(
                "note cannot be its own parent".to_string(),
            ));
        }

        let mut current = parent_id;
        for _ in 0..MAX_ANCESTOR_DEPTH {
            let row = sqlx::query("SELECT parent_id FROM note_relations WHERE note_id = $1")
                .bind(current)
                .fetch_optional(&self.pool)
                .await
                .map_err(Error::Database)?;
            match row {
                Some(r) => {
                    current = r.get("parent_id");
                    if current == note_id {
                        return Err(Error::InvalidInput(
                            "relation would create a cycle".to_string(),
                        ));
                    }
                }
                None => break,
            }
        }

        sqlx::query(
            "INSERT INTO note_relations (note_id, parent_id) VALUES ($1, $2)
             ON CONFLICT (note_id) DO UPDATE SET parent_id = EXCLUDED.parent_id",
        )
        .bind(note_id)
        .bind(parent_id)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;
        Ok(())
    }

    async fn unlink(&self, note_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM note_relations WHERE note_id = $1")
            .bind(note_id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(result.rows_affected() > 0)
    }
}
