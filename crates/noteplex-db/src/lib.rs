//! # noteplex-db
//!
//! PostgreSQL database layer for noteplex.
//!
//! This crate provides:
//! - Connection pool management
//! - Repository implementations for all core entities
//! - Embedded schema migrations (feature `migrations`)
//!
//! ## Example
//!
//! ```rust,ignore
//! use noteplex_db::Database;
//! use noteplex_core::{CreateNoteRequest, NoteRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/noteplex").await?;
//!
//!     let note = db.notes.create(CreateNoteRequest {
//!         creator_id: 1,
//!         content: serde_json::json!({"blocks": []}),
//!         parent_note_id: None,
//!     }).await?;
//!
//!     println!("Created note: {}", note.public_id);
//!     Ok(())
//! }
//! ```

pub mod files;
pub mod note_settings;
pub mod notes;
pub mod pool;
pub mod relations;
pub mod teams;
pub mod tokens;
pub mod users;
pub mod visits;

// Test fixtures for integration tests
// Note: always compiled so integration tests (in tests/) can use them.
pub mod test_fixtures;

// Re-export core types
pub use noteplex_core::*;

// Re-export repository implementations
pub use files::PgFileRepository;
pub use note_settings::PgNoteSettingsRepository;
pub use notes::PgNoteRepository;
pub use pool::{create_pool, create_pool_with_config, log_pool_status, PoolConfig};
pub use relations::PgNoteRelationRepository;
pub use teams::PgTeamRepository;
pub use tokens::PgAuthTokenRepository;
pub use users::PgUserRepository;
pub use visits::PgNoteVisitRepository;

/// Combined database context with all repositories.
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Note repository for CRUD operations.
    pub notes: PgNoteRepository,
    /// Parent/child relation repository.
    pub relations: PgNoteRelationRepository,
    /// Team membership repository.
    pub teams: PgTeamRepository,
    /// Per-note settings repository.
    pub note_settings: PgNoteSettingsRepository,
    /// User account repository.
    pub users: PgUserRepository,
    /// Inline file repository.
    pub files: PgFileRepository,
    /// Note visit repository.
    pub visits: PgNoteVisitRepository,
    /// Bearer token repository.
    pub tokens: PgAuthTokenRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            notes: PgNoteRepository::new(pool.clone()),
            relations: PgNoteRelationRepository::new(pool.clone()),
            teams: PgTeamRepository::new(pool.clone()),
            note_settings: PgNoteSettingsRepository::new(pool.clone()),
            users: PgUserRepository::new(pool.clone()),
            files: PgFileRepository::new(pool.clone()),
            visits: PgNoteVisitRepository::new(pool.clone()),
            tokens: PgAuthTokenRepository::new(pool.clone()),
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self::new(self.pool.clone())
    }
}
