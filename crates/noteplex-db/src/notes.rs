//! Note repository implementation.

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use tracing::info;

use noteplex_core::{ids, CreateNoteRequest, Error, MemberRole, Note, NoteRepository, Result};

/// PostgreSQL implementation of NoteRepository.
pub struct PgNoteRepository {
    pool: Pool<Postgres>,
}

impl PgNoteRepository {
    /// Create a new PgNoteRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NoteRepository for PgNoteRepository {
    /// Create a note together with its settings row, the creator's
    /// Write membership, and the optional parent link, in one
    /// transaction. A note is never observable without its settings.
    async fn create(&self, req: CreateNoteRequest) -> Result<Note> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        let note: Note = sqlx::query_as(
            "INSERT INTO notes (public_id, content, creator_id)
             VALUES ($1, $2, $3)
             RETURNING id, public_id, content, creator_id, created_at, updated_at",
        )
        .bind(ids::generate_public_id())
        .bind(&req.content)
        .bind(req.creator_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(Error::Database)?;

        sqlx::query("INSERT INTO note_settings (note_id, invitation_hash) VALUES ($1, $2)")
            .bind(note.id)
            .bind(ids::generate_invitation_hash())
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;

        sqlx::query("INSERT INTO note_team (note_id, user_id, role) VALUES ($1, $2, $3)")
            .bind(note.id)
            .bind(req.creator_id)
            .bind(MemberRole::Write)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;

        if let Some(parent_id) = req.parent_note_id {
            // A brand-new note cannot close a cycle; link directly.
            sqlx::query("INSERT INTO note_relations (note_id, parent_id) VALUES ($1, $2)")
                .bind(note.id)
                .bind(parent_id)
                .execute(&mut *tx)
                .await
                .map_err(Error::Database)?;
        }

        tx.commit().await.map_err(Error::Database)?;

        info!(
            subsystem = "db",
            component = "notes",
            op = "create",
            note_id = note.id,
            note_public_id = %note.public_id,
            user_id = req.creator_id,
            "Note created"
        );
        Ok(note)
    }

    async fn get(&self, id: i64) -> Result<Option<Note>> {
        sqlx::query_as(
            "SELECT id, public_id, content, creator_id, created_at, updated_at
             FROM notes WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)
    }

    async fn get_by_public_id(&self, public_id: &str) -> Result<Option<Note>> {
        sqlx::query_as(
            "SELECT id, public_id, content, creator_id, created_at, updated_at
             FROM notes WHERE public_id = $1",
        )
        .bind(public_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)
    }

    async fn update_content(&self, id: i64, content: serde_json::Value) -> Result<Note> {
        sqlx::query_as(
            "UPDATE notes SET content = $1, updated_at = now()
             WHERE id = $2
             RETURNING id, public_id, content, creator_id, created_at, updated_at",
        )
        .bind(&content)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?
        .ok_or_else(|| Error::NotFound(format!("note {}", id)))
    }

    /// Settings, team rows, relations, visits, and attachments cascade
    /// at the schema level.
    async fn delete(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM notes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        info!(
            subsystem = "db",
            component = "notes",
            op = "delete",
            note_id = id,
            "Note deleted"
        );
        Ok(())
    }
}
