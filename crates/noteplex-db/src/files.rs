//! File repository implementation. Uploads are stored inline as BYTEA
//! and addressed by a random access key.

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use tracing::info;

use noteplex_core::{ids, CreateFileRequest, Error, FileRepository, Result, StoredFile};

/// PostgreSQL implementation of FileRepository.
pub struct PgFileRepository {
    pool: Pool<Postgres>,
}

impl PgFileRepository {
    /// Create a new PgFileRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FileRepository for PgFileRepository {
    async fn insert(&self, req: CreateFileRequest) -> Result<StoredFile> {
        let file: StoredFile = sqlx::query_as(
            "INSERT INTO files (key, kind, note_id, uploader_id, filename, data)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id, key, kind, note_id, uploader_id, filename, data, created_at",
        )
        .bind(ids::generate_file_key())
        .bind(req.kind)
        .bind(req.note_id)
        .bind(req.uploader_id)
        .bind(&req.filename)
        .bind(&req.data)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        info!(
            subsystem = "db",
            component = "files",
            op = "insert",
            note_id = file.note_id,
            user_id = file.uploader_id,
            size_bytes = file.data.len(),
            "File stored"
        );
        Ok(file)
    }

    async fn get_by_key(&self, key: &str) -> Result<Option<StoredFile>> {
        sqlx::query_as(
            "SELECT id, key, kind, note_id, uploader_id, filename, data, created_at
             FROM files WHERE key = $1",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)
    }
}
