//! Bearer token repository implementation.
//!
//! Raw tokens are returned to the caller exactly once at issue time;
//! only their SHA-256 hex digest is stored. Resolution treats unknown
//! and expired tokens identically: the request proceeds anonymously.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use sqlx::{Pool, Postgres, Row};
use tracing::debug;

use noteplex_core::{ids, AuthTokenRepository, Error, Result};

/// PostgreSQL implementation of AuthTokenRepository.
pub struct PgAuthTokenRepository {
    pool: Pool<Postgres>,
}

impl PgAuthTokenRepository {
    /// Create a new PgAuthTokenRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthTokenRepository for PgAuthTokenRepository {
    async fn issue(&self, user_id: i64, ttl_secs: i64) -> Result<String> {
        let token = ids::generate_token();
        let expires_at = Utc::now() + Duration::seconds(ttl_secs);

        sqlx::query(
            "INSERT INTO auth_tokens (token_hash, user_id, expires_at) VALUES ($1, $2, $3)",
        )
        .bind(ids::sha256_hex(&token))
        .bind(user_id)
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        debug!(
            subsystem = "db",
            component = "tokens",
            op = "issue",
            user_id,
            "Bearer token issued"
        );
        Ok(token)
    }

    async fn resolve(&self, token: &str) -> Result<Option<i64>> {
        let row = sqlx::query(
            "SELECT user_id FROM auth_tokens
             WHERE token_hash = $1 AND expires_at > now()",
        )
        .bind(ids::sha256_hex(token))
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;
        Ok(row.map(|r| r.get("user_id")))
    }

    async fn revoke(&self, token: &str) -> Result<()> {
        sqlx::query("DELETE FROM auth_tokens WHERE token_hash = $1")
            .bind(ids::sha256_hex(token))
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(())
    }
}
