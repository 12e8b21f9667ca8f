//! In-memory repository implementations for unit tests.
//!
//! Each mock keeps its rows in a `RwLock`-guarded map and counts reads
//! per method, so tests can assert not just what was resolved but how
//! many store round-trips the resolution cost. Locks are never held
//! across an await point.
//!
//! The mocks are deliberately per-store: transactional coupling (note
//! creation seeding settings and the creator membership) is a storage
//! concern exercised against the real `noteplex-db` implementations;
//! tests here seed each store explicitly.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use noteplex_core::{
    ids, CreateNoteRequest, Error, MemberRole, Note, NoteRelationRepository, NoteRepository,
    NoteSettings, NoteSettingsRepository, PatchNoteSettingsRequest, Result, TeamMember,
    TeamRepository,
};

// ============================================================================
// Relations
// ============================================================================

/// Mock parent/child relation store.
#[derive(Default)]
pub struct MockRelationRepository {
    parents: RwLock<HashMap<i64, i64>>,
    parent_reads: AtomicUsize,
}

impl MockRelationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a relation directly, bypassing the cycle checks of
    /// `set_parent`. Tests use this to construct malformed chains.
    pub fn seed(&self, note_id: i64, parent_id: i64) {
        self.parents.write().unwrap().insert(note_id, parent_id);
    }

    /// Number of `get_parent_note_id` calls observed.
    pub fn parent_reads(&self) -> usize {
        self.parent_reads.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl NoteRelationRepository for MockRelationRepository {
    async fn get_parent_note_id(&self, note_id: i64) -> Result<Option<i64>> {
        self.parent_reads.fetch_add(1, Ordering::Relaxed);
        Ok(self.parents.read().unwrap().get(&note_id).copied())
    }

    async fn set_parent(&self, note_id: i64, parent_id: i64) -> Result<()> {
        if note_id == parent_id {
            return Err(Error::InvalidInput(
                "note cannot be its own parent".to_string(),
            ));
        }
        {
            let parents = self.parents.read().unwrap();
            let mut current = parent_id;
            let mut hops = 0;
            while let Some(&next) = parents.get(&current) {
                if next == note_id {
                    return Err(Error::InvalidInput(
                        "relation would create a cycle".to_string(),
                    ));
                }
                current = next;
                hops += 1;
                if hops > noteplex_core::defaults::MAX_ANCESTOR_DEPTH {
                    return Err(Error::InvalidInput("parent chain too deep".to_string()));
                }
            }
        }
        self.parents.write().unwrap().insert(note_id, parent_id);
        Ok(())
    }

    async fn unlink(&self, note_id: i64) -> Result<bool> {
        Ok(self.parents.write().unwrap().remove(&note_id).is_some())
    }
}

// ============================================================================
// Teams
// ============================================================================

/// Mock team membership store.
#[derive(Default)]
pub struct MockTeamRepository {
    members: RwLock<HashMap<(i64, i64), TeamMember>>,
    next_id: AtomicI64,
    team_reads: AtomicUsize,
    member_reads: AtomicUsize,
}

impl MockTeamRepository {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI64::new(1),
            ..Default::default()
        }
    }

    /// Seed a membership row.
    pub fn seed(&self, note_id: i64, user_id: i64, role: MemberRole) -> TeamMember {
        let member = TeamMember {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            note_id,
            user_id,
            role,
            created_at: Utc::now(),
        };
        self.members
            .write()
            .unwrap()
            .insert((note_id, user_id), member.clone());
        member
    }

    /// Number of `get_team_members` calls observed.
    pub fn team_reads(&self) -> usize {
        self.team_reads.load(Ordering::Relaxed)
    }

    /// Number of `get_member` calls observed.
    pub fn member_reads(&self) -> usize {
        self.member_reads.load(Ordering::Relaxed)
    }

    /// Total membership rows across all notes.
    pub fn row_count(&self) -> usize {
        self.members.read().unwrap().len()
    }
}

#[async_trait]
impl TeamRepository for MockTeamRepository {
    async fn get_team_members(&self, note_id: i64) -> Result<Vec<TeamMember>> {
        self.team_reads.fetch_add(1, Ordering::Relaxed);
        let mut team: Vec<TeamMember> = self
            .members
            .read()
            .unwrap()
            .values()
            .filter(|m| m.note_id == note_id)
            .cloned()
            .collect();
        team.sort_by_key(|m| m.id);
        Ok(team)
    }

    async fn get_member(&self, note_id: i64, user_id: i64) -> Result<Option<TeamMember>> {
        self.member_reads.fetch_add(1, Ordering::Relaxed);
        Ok(self
            .members
            .read()
            .unwrap()
            .get(&(note_id, user_id))
            .cloned())
    }

    async fn upsert_member(
        &self,
        note_id: i64,
        user_id: i64,
        role: MemberRole,
    ) -> Result<TeamMember> {
        let mut members = self.members.write().unwrap();
        if let Some(existing) = members.get_mut(&(note_id, user_id)) {
            existing.role = role;
            return Ok(existing.clone());
        }
        let member = TeamMember {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            note_id,
            user_id,
            role,
            created_at: Utc::now(),
        };
        members.insert((note_id, user_id), member.clone());
        Ok(member)
    }

    async fn add_member(&self, note_id: i64, user_id: i64, role: MemberRole) -> Result<TeamMember> {
        let mut members = self.members.write().unwrap();
        if let Some(existing) = members.get(&(note_id, user_id)) {
            // Conflict-keep: first role written wins.
            return Ok(existing.clone());
        }
        let member = TeamMember {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            note_id,
            user_id,
            role,
            created_at: Utc::now(),
        };
        members.insert((note_id, user_id), member.clone());
        Ok(member)
    }

    async fn update_role(
        &self,
        note_id: i64,
        user_id: i64,
        role: MemberRole,
    ) -> Result<Option<MemberRole>> {
        let mut members = self.members.write().unwrap();
        match members.get_mut(&(note_id, user_id)) {
            Some(member) => {
                member.role = role;
                Ok(Some(role))
            }
            None => Ok(None),
        }
    }

    async fn remove_member(&self, note_id: i64, user_id: i64) -> Result<Option<i64>> {
        Ok(self
            .members
            .write()
            .unwrap()
            .remove(&(note_id, user_id))
            .map(|m| m.user_id))
    }
}

// ============================================================================
// Notes
// ============================================================================

/// Mock note store.
#[derive(Default)]
pub struct MockNoteRepository {
    notes: RwLock<HashMap<i64, Note>>,
    next_id: AtomicI64,
    note_reads: AtomicUsize,
}

impl MockNoteRepository {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI64::new(1),
            ..Default::default()
        }
    }

    /// Seed a note with an explicit id and public id.
    pub fn seed(&self, id: i64, public_id: &str, creator_id: i64) -> Note {
        let now = Utc::now();
        let note = Note {
            id,
            public_id: public_id.to_string(),
            content: serde_json::json!({}),
            creator_id,
            created_at: now,
            updated_at: now,
        };
        self.notes.write().unwrap().insert(id, note.clone());
        self.next_id.fetch_max(id + 1, Ordering::Relaxed);
        note
    }

    /// Number of note lookups observed (by either id form).
    pub fn note_reads(&self) -> usize {
        self.note_reads.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl NoteRepository for MockNoteRepository {
    async fn create(&self, req: CreateNoteRequest) -> Result<Note> {
        let now = Utc::now();
        let note = Note {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            public_id: ids::generate_public_id(),
            content: req.content,
            creator_id: req.creator_id,
            created_at: now,
            updated_at: now,
        };
        self.notes.write().unwrap().insert(note.id, note.clone());
        Ok(note)
    }

    async fn get(&self, id: i64) -> Result<Option<Note>> {
        self.note_reads.fetch_add(1, Ordering::Relaxed);
        Ok(self.notes.read().unwrap().get(&id).cloned())
    }

    async fn get_by_public_id(&self, public_id: &str) -> Result<Option<Note>> {
        self.note_reads.fetch_add(1, Ordering::Relaxed);
        Ok(self
            .notes
            .read()
            .unwrap()
            .values()
            .find(|n| n.public_id == public_id)
            .cloned())
    }

    async fn update_content(&self, id: i64, content: serde_json::Value) -> Result<Note> {
        let mut notes = self.notes.write().unwrap();
        let note = notes
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound(format!("note {}", id)))?;
        note.content = content;
        note.updated_at = Utc::now();
        Ok(note.clone())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.notes.write().unwrap().remove(&id);
        Ok(())
    }
}

// ============================================================================
// Settings
// ============================================================================

/// Mock note settings store.
#[derive(Default)]
pub struct MockSettingsRepository {
    settings: RwLock<HashMap<i64, NoteSettings>>,
    next_id: AtomicI64,
    settings_reads: AtomicUsize,
    hash_lookups: AtomicUsize,
}

impl MockSettingsRepository {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI64::new(1),
            ..Default::default()
        }
    }

    /// Seed a settings row for a note.
    pub fn seed(&self, note_id: i64, is_public: bool, invitation_hash: &str) -> NoteSettings {
        let settings = NoteSettings {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            note_id,
            is_public,
            invitation_hash: invitation_hash.to_string(),
            custom_hostname: None,
            cover: None,
        };
        self.settings
            .write()
            .unwrap()
            .insert(note_id, settings.clone());
        settings
    }

    /// Number of `get_by_note_id` calls observed.
    pub fn settings_reads(&self) -> usize {
        self.settings_reads.load(Ordering::Relaxed)
    }

    /// Number of `get_by_invitation_hash` calls observed.
    pub fn hash_lookups(&self) -> usize {
        self.hash_lookups.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl NoteSettingsRepository for MockSettingsRepository {
    async fn get_by_note_id(&self, note_id: i64) -> Result<NoteSettings> {
        self.settings_reads.fetch_add(1, Ordering::Relaxed);
        self.settings
            .read()
            .unwrap()
            .get(&note_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("settings for note {}", note_id)))
    }

    async fn get_by_invitation_hash(&self, hash: &str) -> Result<Option<NoteSettings>> {
        self.hash_lookups.fetch_add(1, Ordering::Relaxed);
        Ok(self
            .settings
            .read()
            .unwrap()
            .values()
            .find(|s| s.invitation_hash == hash)
            .cloned())
    }

    async fn patch(&self, note_id: i64, req: PatchNoteSettingsRequest) -> Result<NoteSettings> {
        let mut settings = self.settings.write().unwrap();
        let row = settings
            .get_mut(&note_id)
            .ok_or_else(|| Error::NotFound(format!("settings for note {}", note_id)))?;
        if let Some(is_public) = req.is_public {
            row.is_public = is_public;
        }
        if let Some(hostname) = req.custom_hostname {
            row.custom_hostname = Some(hostname);
        }
        if let Some(cover) = req.cover {
            row.cover = Some(cover);
        }
        Ok(row.clone())
    }

    async fn regenerate_invitation_hash(&self, note_id: i64) -> Result<NoteSettings> {
        let mut settings = self.settings.write().unwrap();
        let row = settings
            .get_mut(&note_id)
            .ok_or_else(|| Error::NotFound(format!("settings for note {}", note_id)))?;
        row.invitation_hash = ids::generate_invitation_hash();
        Ok(row.clone())
    }
}
