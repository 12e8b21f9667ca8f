//! Core traits for noteplex abstractions.
//!
//! These traits define the interfaces that concrete implementations
//! must satisfy, enabling pluggable backends and testability. The
//! access-control services operate exclusively through these contracts
//! and never touch storage directly.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// NOTE REPOSITORY
// =============================================================================

/// Repository for note CRUD operations.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Create a note. Seeds the settings row and the creator's Write
    /// membership, and links the optional parent, in one transaction.
    async fn create(&self, req: CreateNoteRequest) -> Result<Note>;

    /// Fetch a note by internal id.
    async fn get(&self, id: i64) -> Result<Option<Note>>;

    /// Fetch a note by its public identifier.
    async fn get_by_public_id(&self, public_id: &str) -> Result<Option<Note>>;

    /// Replace the note's document content.
    async fn update_content(&self, id: i64, content: serde_json::Value) -> Result<Note>;

    /// Permanently delete a note (settings, team, relations cascade).
    async fn delete(&self, id: i64) -> Result<()>;
}

// =============================================================================
// NOTE RELATION REPOSITORY
// =============================================================================

/// Repository for the parent/child relation between notes.
///
/// Storage does not enforce acyclicity; callers that walk the chain
/// must bound the walk themselves.
#[async_trait]
pub trait NoteRelationRepository: Send + Sync {
    /// Parent of a note, if any. A note has at most one parent.
    async fn get_parent_note_id(&self, note_id: i64) -> Result<Option<i64>>;

    /// Link a note under a parent, replacing any existing link.
    /// Rejects self-parenting and links that would close a cycle.
    async fn set_parent(&self, note_id: i64, parent_id: i64) -> Result<()>;

    /// Remove a note's parent link. Returns whether a link existed.
    async fn unlink(&self, note_id: i64) -> Result<bool>;
}

// =============================================================================
// TEAM REPOSITORY
// =============================================================================

/// Repository for note team membership rows.
#[async_trait]
pub trait TeamRepository: Send + Sync {
    /// All members of a note's direct team (no inheritance applied).
    async fn get_team_members(&self, note_id: i64) -> Result<Vec<TeamMember>>;

    /// A single member of a note's direct team.
    async fn get_member(&self, note_id: i64, user_id: i64) -> Result<Option<TeamMember>>;

    /// Insert a membership, replacing the role if the row exists.
    async fn upsert_member(&self, note_id: i64, user_id: i64, role: MemberRole)
        -> Result<TeamMember>;

    /// Insert a membership, keeping the existing row untouched if one
    /// exists. Safe under concurrent duplicate joins: the first role
    /// written wins and is returned.
    async fn add_member(&self, note_id: i64, user_id: i64, role: MemberRole) -> Result<TeamMember>;

    /// Change an existing member's role. Returns `None` without writing
    /// when the user is not in the team.
    async fn update_role(
        &self,
        note_id: i64,
        user_id: i64,
        role: MemberRole,
    ) -> Result<Option<MemberRole>>;

    /// Remove a member. Returns the removed user id, or `None` if the
    /// user was not in the team.
    async fn remove_member(&self, note_id: i64, user_id: i64) -> Result<Option<i64>>;
}

// =============================================================================
// NOTE SETTINGS REPOSITORY
// =============================================================================

/// Repository for per-note settings rows.
#[async_trait]
pub trait NoteSettingsRepository: Send + Sync {
    /// Settings for a note. Every note has a settings row from creation,
    /// so a miss here is `Error::NotFound`, not an empty result.
    async fn get_by_note_id(&self, note_id: i64) -> Result<NoteSettings>;

    /// Settings row matching an invitation hash, if the hash is current.
    async fn get_by_invitation_hash(&self, hash: &str) -> Result<Option<NoteSettings>>;

    /// Apply a partial update and return the updated settings.
    async fn patch(&self, note_id: i64, req: PatchNoteSettingsRequest) -> Result<NoteSettings>;

    /// Replace the invitation hash with a freshly generated one,
    /// invalidating the previous hash. `Error::NotFound` if the note
    /// has no settings row.
    async fn regenerate_invitation_hash(&self, note_id: i64) -> Result<NoteSettings>;
}

// =============================================================================
// USER REPOSITORY
// =============================================================================

/// Repository for user accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a user.
    async fn create(&self, req: CreateUserRequest) -> Result<User>;

    /// Fetch a user by id.
    async fn get(&self, id: i64) -> Result<Option<User>>;

    /// Fetch a user by email.
    async fn get_by_email(&self, email: &str) -> Result<Option<User>>;
}

// =============================================================================
// FILE REPOSITORY
// =============================================================================

/// Repository for uploaded files stored inline.
#[async_trait]
pub trait FileRepository: Send + Sync {
    /// Store a file and return its record (including the access key).
    async fn insert(&self, req: CreateFileRequest) -> Result<StoredFile>;

    /// Fetch a file by its access key.
    async fn get_by_key(&self, key: &str) -> Result<Option<StoredFile>>;
}

// =============================================================================
// NOTE VISIT REPOSITORY
// =============================================================================

/// Repository for note visit records.
#[async_trait]
pub trait NoteVisitRepository: Send + Sync {
    /// Record that a user opened a note, refreshing the timestamp if a
    /// record already exists.
    async fn record_visit(&self, note_id: i64, user_id: i64) -> Result<NoteVisit>;

    /// Visits by a user, most recent first.
    async fn list_for_user(&self, user_id: i64) -> Result<Vec<NoteVisit>>;
}

// =============================================================================
// AUTH TOKEN REPOSITORY
// =============================================================================

/// Narrow contract for resolving bearer tokens to user ids.
///
/// Token issuance and exchange live outside this system; request
/// handling only needs `resolve`, which treats unknown and expired
/// tokens identically as anonymous.
#[async_trait]
pub trait AuthTokenRepository: Send + Sync {
    /// Issue a token for a user. Returns the raw token exactly once;
    /// only its digest is stored.
    async fn issue(&self, user_id: i64, ttl_secs: i64) -> Result<String>;

    /// Resolve a raw token to a user id. `None` for unknown or expired
    /// tokens — resolution failures are anonymity, never errors.
    async fn resolve(&self, token: &str) -> Result<Option<i64>>;

    /// Revoke a token immediately.
    async fn revoke(&self, token: &str) -> Result<()>;
}
