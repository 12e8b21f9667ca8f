//! User repository implementation.

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use noteplex_core::{CreateUserRequest, Error, Result, User, UserRepository};

/// PostgreSQL implementation of UserRepository.
pub struct PgUserRepository {
    pool: Pool<Postgres>,
}

impl PgUserRepository {
    /// Create a new PgUserRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, req: CreateUserRequest) -> Result<User> {
        sqlx::query_as(
            "INSERT INTO users (email, name, photo) VALUES ($1, $2, $3)
             RETURNING id, email, name, photo, created_at",
        )
        .bind(&req.email)
        .bind(&req.name)
        .bind(&req.photo)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)
    }

    async fn get(&self, id: i64) -> Result<Option<User>> {
        sqlx::query_as("SELECT id, email, name, photo, created_at FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        sqlx::query_as("SELECT id, email, name, photo, created_at FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)
    }
}
