//! Note settings repository implementation.

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use tracing::info;

use noteplex_core::{
    ids, Error, NoteSettings, NoteSettingsRepository, PatchNoteSettingsRequest, Result,
};

const SETTINGS_COLUMNS: &str = "id, note_id, is_public, invitation_hash, custom_hostname, cover";

/// PostgreSQL implementation of NoteSettingsRepository.
pub struct PgNoteSettingsRepository {
    pool: Pool<Postgres>,
}

impl PgNoteSettingsRepository {
    /// Create a new PgNoteSettingsRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NoteSettingsRepository for PgNoteSettingsRepository {
    async fn get_by_note_id(&self, note_id: i64) -> Result<NoteSettings> {
        sqlx::query_as(&format!(
            "SELECT {} FROM note_settings WHERE note_id = $1",
            SETTINGS_COLUMNS
        ))
        .bind(note_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?
        // Settings are seeded at note creation; a miss is a data error.
        .ok_or_else(|| Error::NotFound(format!("settings for note {}", note_id)))
    }

    async fn get_by_invitation_hash(&self, hash: &str) -> Result<Option<NoteSettings>> {
        sqlx::query_as(&format!(
            "SELECT {} FROM note_settings WHERE invitation_hash = $1",
            SETTINGS_COLUMNS
        ))
        .bind(hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)
    }

    async fn patch(&self, note_id: i64, req: PatchNoteSettingsRequest) -> Result<NoteSettings> {
        sqlx::query_as(&format!(
            "UPDATE note_settings SET
                 is_public = COALESCE($1, is_public),
                 custom_hostname = COALESCE($2, custom_hostname),
                 cover = COALESCE($3, cover)
             WHERE note_id = $4
             RETURNING {}",
            SETTINGS_COLUMNS
        ))
        .bind(req.is_public)
        .bind(req.custom_hostname)
        .bind(req.cover)
        .bind(note_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?
        .ok_or_else(|| Error::NotFound(format!("settings for note {}", note_id)))
    }

    async fn regenerate_invitation_hash(&self, note_id: i64) -> Result<NoteSettings> {
        let settings: NoteSettings = sqlx::query_as(&format!(
            "UPDATE note_settings SET invitation_hash = $1
             WHERE note_id = $2
             RETURNING {}",
            SETTINGS_COLUMNS
        ))
        .bind(ids::generate_invitation_hash())
        .bind(note_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?
        .ok_or_else(|| Error::NotFound(format!("settings for note {}", note_id)))?;

        info!(
            subsystem = "db",
            component = "note_settings",
            op = "regenerate_hash",
            note_id,
            "Invitation hash replaced"
        );
        Ok(settings)
    }
}
