//! Team role mutations.
//!
//! Authorization is enforced upstream by the route's policy chain
//! (`UserCanEdit` / `UserIsCreator`); these operations assume the
//! caller is already allowed and only enforce data-level rules.

use std::sync::Arc;

use tracing::info;

use noteplex_core::{Error, EventBus, MemberRole, Result, ServerEvent, TeamRepository};

/// Applies role changes and removals to a note's direct team.
pub struct RoleService {
    teams: Arc<dyn TeamRepository>,
    event_bus: Arc<EventBus>,
}

impl RoleService {
    pub fn new(teams: Arc<dyn TeamRepository>, event_bus: Arc<EventBus>) -> Self {
        Self { teams, event_bus }
    }

    /// Change an existing member's role.
    ///
    /// Fails with [`Error::NotInTeam`] — and performs no write — when
    /// the target user has no membership row on the note. Inherited
    /// roles do not count: mutations always target the direct team.
    pub async fn patch_member_role(
        &self,
        note_id: i64,
        target_user_id: i64,
        new_role: MemberRole,
    ) -> Result<MemberRole> {
        let updated = self
            .teams
            .update_role(note_id, target_user_id, new_role)
            .await?
            .ok_or(Error::NotInTeam)?;

        info!(
            subsystem = "access",
            component = "roles",
            op = "patch_member_role",
            note_id,
            user_id = target_user_id,
            role = %updated,
            "Member role changed"
        );
        self.event_bus.emit(ServerEvent::MemberRoleChanged {
            note_id,
            user_id: target_user_id,
            role: updated,
        });
        Ok(updated)
    }

    /// Remove a member from a note's direct team.
    ///
    /// Returns the removed user id, or `None` when no membership row
    /// existed — absence is not an error here.
    pub async fn remove_member(&self, note_id: i64, target_user_id: i64) -> Result<Option<i64>> {
        let removed = self.teams.remove_member(note_id, target_user_id).await?;
        if removed.is_some() {
            info!(
                subsystem = "access",
                component = "roles",
                op = "remove_member",
                note_id,
                user_id = target_user_id,
                "Member removed from note team"
            );
            self.event_bus.emit(ServerEvent::MemberRemoved {
                note_id,
                user_id: target_user_id,
            });
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::MockTeamRepository;

    fn service(teams: &Arc<MockTeamRepository>) -> (RoleService, Arc<EventBus>) {
        let bus = Arc::new(EventBus::new(32));
        (RoleService::new(teams.clone(), bus.clone()), bus)
    }

    #[tokio::test]
    async fn test_patch_role_updates_existing_member() {
        let teams = Arc::new(MockTeamRepository::new());
        teams.seed(1, 2, MemberRole::Read);
        let (service, bus) = service(&teams);
        let mut rx = bus.subscribe();

        let role = service.patch_member_role(1, 2, MemberRole::Write).await.unwrap();
        assert_eq!(role, MemberRole::Write);
        assert_eq!(
            teams.get_member(1, 2).await.unwrap().unwrap().role,
            MemberRole::Write
        );

        let envelope = rx.recv().await.unwrap();
        assert!(matches!(
            envelope.payload,
            ServerEvent::MemberRoleChanged {
                note_id: 1,
                user_id: 2,
                role: MemberRole::Write,
            }
        ));
    }

    #[tokio::test]
    async fn test_patch_role_on_non_member_fails_closed() {
        let teams = Arc::new(MockTeamRepository::new());
        teams.seed(1, 2, MemberRole::Read);
        let (service, _bus) = service(&teams);

        let err = service
            .patch_member_role(1, 99, MemberRole::Write)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotInTeam));
        assert_eq!(err.to_string(), "User does not belong to Note's team");
        // No row was created as a side effect.
        assert_eq!(teams.row_count(), 1);
    }

    #[tokio::test]
    async fn test_remove_member_returns_id() {
        let teams = Arc::new(MockTeamRepository::new());
        teams.seed(1, 2, MemberRole::Read);
        let (service, bus) = service(&teams);
        let mut rx = bus.subscribe();

        let removed = service.remove_member(1, 2).await.unwrap();
        assert_eq!(removed, Some(2));
        assert_eq!(teams.row_count(), 0);

        let envelope = rx.recv().await.unwrap();
        assert!(matches!(
            envelope.payload,
            ServerEvent::MemberRemoved {
                note_id: 1,
                user_id: 2,
            }
        ));
    }

    #[tokio::test]
    async fn test_remove_absent_member_is_none_and_silent() {
        let teams = Arc::new(MockTeamRepository::new());
        let (service, bus) = service(&teams);
        let mut rx = bus.subscribe();

        let removed = service.remove_member(1, 2).await.unwrap();
        assert!(removed.is_none());
        assert!(rx.try_recv().is_err());
    }
}
