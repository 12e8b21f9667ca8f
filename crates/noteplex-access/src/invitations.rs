//! Invitation redemption and hash management.

use std::sync::Arc;

use tracing::{debug, info};

use noteplex_core::{
    Error, EventBus, MemberRole, NoteRepository, NoteSettings, NoteSettingsRepository, Result,
    ServerEvent, TeamMemberPublic, TeamRepository,
};

/// Admits users into note teams via shareable invitation hashes.
pub struct InvitationService {
    settings: Arc<dyn NoteSettingsRepository>,
    teams: Arc<dyn TeamRepository>,
    notes: Arc<dyn NoteRepository>,
    event_bus: Arc<EventBus>,
}

impl InvitationService {
    pub fn new(
        settings: Arc<dyn NoteSettingsRepository>,
        teams: Arc<dyn TeamRepository>,
        notes: Arc<dyn NoteRepository>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            settings,
            teams,
            notes,
            event_bus,
        }
    }

    /// Redeem an invitation hash for a user.
    ///
    /// Joins are idempotent: an existing membership is returned
    /// unchanged, with no role escalation and no new row. First joins
    /// enter with [`MemberRole::Read`] via a conflict-keep insert, so
    /// concurrent duplicate joins by the same user still produce
    /// exactly one row.
    ///
    /// Fails with [`Error::InvalidInvitation`] when the hash does not
    /// resolve; nothing is written in that case.
    pub async fn join_by_invitation_hash(
        &self,
        hash: &str,
        user_id: i64,
    ) -> Result<TeamMemberPublic> {
        let settings = self
            .settings
            .get_by_invitation_hash(hash)
            .await?
            .ok_or(Error::InvalidInvitation)?;
        let note_id = settings.note_id;

        let note = self
            .notes
            .get(note_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("note {}", note_id)))?;

        if let Some(existing) = self.teams.get_member(note_id, user_id).await? {
            debug!(
                subsystem = "access",
                component = "invitations",
                op = "join",
                note_id,
                user_id,
                "Repeat join, returning existing membership"
            );
            return Ok(TeamMemberPublic {
                user_id: existing.user_id,
                note_id: note.public_id,
                role: existing.role,
            });
        }

        let member = self
            .teams
            .add_member(note_id, user_id, MemberRole::Read)
            .await?;

        info!(
            subsystem = "access",
            component = "invitations",
            op = "join",
            note_id,
            user_id,
            role = %member.role,
            "User joined note team via invitation"
        );
        self.event_bus.emit(ServerEvent::MemberJoined {
            note_id,
            user_id,
            role: member.role,
        });

        Ok(TeamMemberPublic {
            user_id: member.user_id,
            note_id: note.public_id,
            role: member.role,
        })
    }

    /// Replace a note's invitation hash with a fresh value, revoking
    /// every outstanding copy of the old one.
    pub async fn regenerate_invitation_hash(&self, note_id: i64) -> Result<NoteSettings> {
        let settings = self.settings.regenerate_invitation_hash(note_id).await?;
        info!(
            subsystem = "access",
            component = "invitations",
            op = "regenerate_hash",
            note_id,
            "Invitation hash regenerated"
        );
        self.event_bus.emit(ServerEvent::SettingsUpdated {
            note_id,
            is_public: settings.is_public,
        });
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{MockNoteRepository, MockSettingsRepository, MockTeamRepository};

    struct Fixture {
        settings: Arc<MockSettingsRepository>,
        teams: Arc<MockTeamRepository>,
        notes: Arc<MockNoteRepository>,
        bus: Arc<EventBus>,
        service: InvitationService,
    }

    fn fixture() -> Fixture {
        let settings = Arc::new(MockSettingsRepository::new());
        let teams = Arc::new(MockTeamRepository::new());
        let notes = Arc::new(MockNoteRepository::new());
        let bus = Arc::new(EventBus::new(32));
        let service = InvitationService::new(
            settings.clone(),
            teams.clone(),
            notes.clone(),
            bus.clone(),
        );
        Fixture {
            settings,
            teams,
            notes,
            bus,
            service,
        }
    }

    #[tokio::test]
    async fn test_first_join_creates_read_membership() {
        let f = fixture();
        f.notes.seed(1, "TJmEb89e0l", 9);
        f.settings.seed(1, false, "Hzh2hy4igf");
        let mut rx = f.bus.subscribe();

        let joined = f
            .service
            .join_by_invitation_hash("Hzh2hy4igf", 1)
            .await
            .unwrap();
        assert_eq!(joined.user_id, 1);
        assert_eq!(joined.note_id, "TJmEb89e0l");
        assert_eq!(joined.role, MemberRole::Read);
        assert_eq!(f.teams.row_count(), 1);

        let envelope = rx.recv().await.unwrap();
        assert!(matches!(
            envelope.payload,
            ServerEvent::MemberJoined {
                note_id: 1,
                user_id: 1,
                role: MemberRole::Read,
            }
        ));
    }

    #[tokio::test]
    async fn test_repeat_join_is_idempotent() {
        let f = fixture();
        f.notes.seed(1, "TJmEb89e0l", 9);
        f.settings.seed(1, false, "Hzh2hy4igf");

        let first = f
            .service
            .join_by_invitation_hash("Hzh2hy4igf", 1)
            .await
            .unwrap();
        let second = f
            .service
            .join_by_invitation_hash("Hzh2hy4igf", 1)
            .await
            .unwrap();

        assert_eq!(first.user_id, second.user_id);
        assert_eq!(first.note_id, second.note_id);
        assert_eq!(first.role, second.role);
        assert_eq!(f.teams.row_count(), 1);
        // Each join checks for an existing membership exactly once.
        assert_eq!(f.teams.member_reads(), 2);
    }

    #[tokio::test]
    async fn test_repeat_join_does_not_escalate_role() {
        let f = fixture();
        f.notes.seed(1, "TJmEb89e0l", 9);
        f.settings.seed(1, false, "Hzh2hy4igf");
        f.teams.seed(1, 5, MemberRole::Write);

        let joined = f
            .service
            .join_by_invitation_hash("Hzh2hy4igf", 5)
            .await
            .unwrap();
        // Existing Write membership returned as-is, not reset to Read.
        assert_eq!(joined.role, MemberRole::Write);
        assert_eq!(f.teams.row_count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_hash_is_rejected_without_writes() {
        let f = fixture();
        f.notes.seed(1, "TJmEb89e0l", 9);
        f.settings.seed(1, false, "Hzh2hy4igf");

        let err = f
            .service
            .join_by_invitation_hash("Jih23y4igf", 1)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInvitation));
        assert_eq!(err.to_string(), "Wrong invitation");
        assert_eq!(f.teams.row_count(), 0);
        // The hash lookup ran, but rejection happened before the note
        // or membership stores were consulted.
        assert_eq!(f.settings.hash_lookups(), 1);
        assert_eq!(f.notes.note_reads(), 0);
        assert_eq!(f.teams.member_reads(), 0);
    }

    #[tokio::test]
    async fn test_regenerated_hash_invalidates_old_one() {
        let f = fixture();
        f.notes.seed(1, "TJmEb89e0l", 9);
        f.settings.seed(1, false, "Hzh2hy4igf");

        let updated = f.service.regenerate_invitation_hash(1).await.unwrap();
        assert_ne!(updated.invitation_hash, "Hzh2hy4igf");
        assert_eq!(updated.invitation_hash.len(), 10);

        let err = f
            .service
            .join_by_invitation_hash("Hzh2hy4igf", 1)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInvitation));

        let joined = f
            .service
            .join_by_invitation_hash(&updated.invitation_hash, 1)
            .await
            .unwrap();
        assert_eq!(joined.role, MemberRole::Read);
    }

    #[tokio::test]
    async fn test_regenerate_without_settings_fails_not_found() {
        let f = fixture();
        let err = f.service.regenerate_invitation_hash(99).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
