//! Team membership repository implementation.

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row};

use noteplex_core::{Error, MemberRole, Result, TeamMember, TeamRepository};

/// PostgreSQL implementation of TeamRepository.
pub struct PgTeamRepository {
    pool: Pool<Postgres>,
}

impl PgTeamRepository {
    /// Create a new PgTeamRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TeamRepository for PgTeamRepository {
    async fn get_team_members(&self, note_id: i64) -> Result<Vec<TeamMember>> {
        sqlx::query_as(
            "SELECT id, note_id, user_id, role, created_at
             FROM note_team WHERE note_id = $1
             ORDER BY id",
        )
        .bind(note_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)
    }

    async fn get_member(&self, note_id: i64, user_id: i64) -> Result<Option<TeamMember>> {
        sqlx::query_as(
            "SELECT id, note_id, user_id, role, created_at
             FROM note_team WHERE note_id = $1 AND user_id = $2",
        )
        .bind(note_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)
    }

    async fn upsert_member(
        &self,
        note_id: i64,
        user_id: i64,
        role: MemberRole,
    ) -> Result<TeamMember> {
        sqlx::query_as(
            "INSERT INTO note_team (note_id, user_id, role) VALUES ($1, $2, $3)
             ON CONFLICT ON CONSTRAINT note_team_note_user_unique
             DO UPDATE SET role = EXCLUDED.role
             RETURNING id, note_id, user_id, role, created_at",
        )
        .bind(note_id)
        .bind(user_id)
        .bind(role)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)
    }

    /// Conflict-keep insert: under concurrent duplicate joins the first
    /// role written wins. The no-op `DO UPDATE SET role = note_team.role`
    /// makes RETURNING yield the surviving row either way.
    async fn add_member(&self, note_id: i64, user_id: i64, role: MemberRole) -> Result<TeamMember> {
        sqlx::query_as(
            "INSERT INTO note_team (note_id, user_id, role) VALUES ($1, $2, $3)
             ON CONFLICT ON CONSTRAINT note_team_note_user_unique
             DO UPDATE SET role = note_team.role
             RETURNING id, note_id, user_id, role, created_at",
        )
        .bind(note_id)
        .bind(user_id)
        .bind(role)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)
    }

    async fn update_role(
        &self,
        note_id: i64,
        user_id: i64,
        role: MemberRole,
    ) -> Result<Option<MemberRole>> {
        let row = sqlx::query(
            "UPDATE note_team SET role = $1
             WHERE note_id = $2 AND user_id = $3
             RETURNING role",
        )
        .bind(role)
        .bind(note_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;
        Ok(row.map(|r| r.get("role")))
    }

    async fn remove_member(&self, note_id: i64, user_id: i64) -> Result<Option<i64>> {
        let row = sqlx::query(
            "DELETE FROM note_team WHERE note_id = $1 AND user_id = $2
             RETURNING user_id",
        )
        .bind(note_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;
        Ok(row.map(|r| r.get("user_id")))
    }
}
