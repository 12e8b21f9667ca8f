//! Effective-team resolution.
//!
//! A note's direct team governs access only once it has been
//! customized. A team with exactly one row is treated as "never
//! customized" (only the seeded creator membership exists), and
//! authorization falls back to the nearest ancestor whose team was
//! customized. A team of two or more rows is authoritative and stops
//! the climb even when it does not contain the querying user — that
//! yields "no role", not further climbing.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, warn};

use noteplex_core::{MemberRole, NoteRelationRepository, Result, TeamMember, TeamRepository};

use noteplex_core::defaults::MAX_ANCESTOR_DEPTH;

/// Resolves the team that effectively governs a note, walking the
/// parent chain while the direct team is trivial.
pub struct TeamResolver {
    relations: Arc<dyn NoteRelationRepository>,
    teams: Arc<dyn TeamRepository>,
    max_depth: usize,
}

impl TeamResolver {
    /// Create a resolver with the default climb ceiling.
    pub fn new(relations: Arc<dyn NoteRelationRepository>, teams: Arc<dyn TeamRepository>) -> Self {
        Self::with_max_depth(relations, teams, MAX_ANCESTOR_DEPTH)
    }

    /// Create a resolver with an explicit climb ceiling. Used by tests
    /// that exercise the bound directly.
    pub fn with_max_depth(
        relations: Arc<dyn NoteRelationRepository>,
        teams: Arc<dyn TeamRepository>,
        max_depth: usize,
    ) -> Self {
        Self {
            relations,
            teams,
            max_depth,
        }
    }

    /// Compute the effective team for a note.
    ///
    /// Climbs from the note upward while the current team has exactly
    /// one row and a parent exists. Storage does not enforce
    /// acyclicity, so the walk carries a visited set and a depth
    /// ceiling; tripping either returns an **empty** team — access is
    /// denied rather than resolved from a corrupt chain.
    ///
    /// For an acyclic chain of length *n* this performs at most
    /// *n + 1* team reads.
    pub async fn resolve_effective_team(&self, note_id: i64) -> Result<Vec<TeamMember>> {
        let mut current = note_id;
        let mut visited = HashSet::new();
        visited.insert(current);

        let mut team = self.teams.get_team_members(current).await?;
        let mut parent = self.relations.get_parent_note_id(current).await?;
        let mut depth = 0usize;

        while team.len() == 1 {
            let Some(parent_id) = parent else {
                // Root with a size-1 team: the sole member keeps their
                // role, there is nothing to climb to.
                break;
            };

            depth += 1;
            if depth > self.max_depth || !visited.insert(parent_id) {
                warn!(
                    subsystem = "access",
                    component = "resolver",
                    op = "resolve_effective_team",
                    note_id,
                    climb_depth = depth,
                    "Parent chain exceeded bound or looped; denying by default"
                );
                return Ok(Vec::new());
            }

            current = parent_id;
            team = self.teams.get_team_members(current).await?;
            parent = self.relations.get_parent_note_id(current).await?;
        }

        debug!(
            subsystem = "access",
            component = "resolver",
            op = "resolve_effective_team",
            note_id,
            resolved_note_id = current,
            climb_depth = depth,
            result_count = team.len(),
            "Effective team resolved"
        );
        Ok(team)
    }

    /// Role the user effectively holds for the note, if any.
    pub async fn user_role(&self, user_id: i64, note_id: i64) -> Result<Option<MemberRole>> {
        let team = self.resolve_effective_team(note_id).await?;
        Ok(team
            .into_iter()
            .find(|m| m.user_id == user_id)
            .map(|m| m.role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{MockRelationRepository, MockTeamRepository};

    fn resolver(
        relations: &Arc<MockRelationRepository>,
        teams: &Arc<MockTeamRepository>,
    ) -> TeamResolver {
        TeamResolver::new(relations.clone(), teams.clone())
    }

    #[tokio::test]
    async fn test_customized_team_is_returned_directly() {
        let relations = Arc::new(MockRelationRepository::new());
        let teams = Arc::new(MockTeamRepository::new());
        teams.seed(1, 10, MemberRole::Write);
        teams.seed(1, 11, MemberRole::Read);

        let team = resolver(&relations, &teams)
            .resolve_effective_team(1)
            .await
            .unwrap();
        assert_eq!(team.len(), 2);
        assert_eq!(teams.team_reads(), 1);
    }

    #[tokio::test]
    async fn test_trivial_team_climbs_to_customized_ancestor() {
        // C (trivial) -> B (customized) -> A (root)
        let relations = Arc::new(MockRelationRepository::new());
        relations.seed(3, 2);
        relations.seed(2, 1);
        let teams = Arc::new(MockTeamRepository::new());
        teams.seed(1, 10, MemberRole::Write);
        teams.seed(2, 10, MemberRole::Write);
        teams.seed(2, 7, MemberRole::Write);
        teams.seed(3, 10, MemberRole::Write);

        let r = resolver(&relations, &teams);
        let team = r.resolve_effective_team(3).await.unwrap();
        assert_eq!(team.len(), 2);
        assert!(team.iter().all(|m| m.note_id == 2));

        // Spec scenario: user 7 holds Write on the grandchild via B.
        assert_eq!(r.user_role(7, 3).await.unwrap(), Some(MemberRole::Write));
    }

    #[tokio::test]
    async fn test_root_with_trivial_team_keeps_sole_member() {
        let relations = Arc::new(MockRelationRepository::new());
        let teams = Arc::new(MockTeamRepository::new());
        teams.seed(1, 10, MemberRole::Write);

        let team = resolver(&relations, &teams)
            .resolve_effective_team(1)
            .await
            .unwrap();
        assert_eq!(team.len(), 1);
        assert_eq!(team[0].user_id, 10);
    }

    #[tokio::test]
    async fn test_authoritative_team_stops_climb_without_user() {
        // Child team has 2 rows, neither is user 99; the parent team
        // containing user 99 must not be consulted.
        let relations = Arc::new(MockRelationRepository::new());
        relations.seed(2, 1);
        let teams = Arc::new(MockTeamRepository::new());
        teams.seed(1, 99, MemberRole::Write);
        teams.seed(2, 10, MemberRole::Write);
        teams.seed(2, 11, MemberRole::Read);

        let r = resolver(&relations, &teams);
        assert_eq!(r.user_role(99, 2).await.unwrap(), None);
        assert_eq!(teams.team_reads(), 1);
    }

    #[tokio::test]
    async fn test_read_bound_on_chain() {
        // Chain of 3 trivial notes above the start: n+1 team reads.
        let relations = Arc::new(MockRelationRepository::new());
        relations.seed(4, 3);
        relations.seed(3, 2);
        relations.seed(2, 1);
        let teams = Arc::new(MockTeamRepository::new());
        for note in 1..=4 {
            teams.seed(note, 10, MemberRole::Write);
        }

        let team = resolver(&relations, &teams)
            .resolve_effective_team(4)
            .await
            .unwrap();
        assert_eq!(team.len(), 1);
        assert_eq!(team[0].note_id, 1);
        assert_eq!(teams.team_reads(), 4);
        assert_eq!(relations.parent_reads(), 4);
    }

    #[tokio::test]
    async fn test_cycle_fails_closed() {
        // 1 -> 2 -> 1, all teams trivial.
        let relations = Arc::new(MockRelationRepository::new());
        relations.seed(1, 2);
        relations.seed(2, 1);
        let teams = Arc::new(MockTeamRepository::new());
        teams.seed(1, 10, MemberRole::Write);
        teams.seed(2, 10, MemberRole::Write);

        let r = resolver(&relations, &teams);
        let team = r.resolve_effective_team(1).await.unwrap();
        assert!(team.is_empty());
        assert_eq!(r.user_role(10, 1).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_self_cycle_fails_closed() {
        let relations = Arc::new(MockRelationRepository::new());
        relations.seed(1, 1);
        let teams = Arc::new(MockTeamRepository::new());
        teams.seed(1, 10, MemberRole::Write);

        let team = resolver(&relations, &teams)
            .resolve_effective_team(1)
            .await
            .unwrap();
        assert!(team.is_empty());
    }

    #[tokio::test]
    async fn test_depth_ceiling_fails_closed() {
        // Acyclic chain longer than the ceiling.
        let relations = Arc::new(MockRelationRepository::new());
        let teams = Arc::new(MockTeamRepository::new());
        for note in 1..=5 {
            teams.seed(note, 10, MemberRole::Write);
            if note > 1 {
                relations.seed(note, note - 1);
            }
        }

        let r = TeamResolver::with_max_depth(relations.clone(), teams.clone(), 2);
        let team = r.resolve_effective_team(5).await.unwrap();
        assert!(team.is_empty());
    }

    #[tokio::test]
    async fn test_empty_team_does_not_climb() {
        // Zero rows is not "trivial"; it is an empty, authoritative
        // answer (no one has access).
        let relations = Arc::new(MockRelationRepository::new());
        relations.seed(2, 1);
        let teams = Arc::new(MockTeamRepository::new());
        teams.seed(1, 10, MemberRole::Write);

        let team = resolver(&relations, &teams)
            .resolve_effective_team(2)
            .await
            .unwrap();
        assert!(team.is_empty());
        assert_eq!(teams.team_reads(), 1);
    }

    #[tokio::test]
    async fn test_single_non_creator_row_still_climbs() {
        // Literal behavior kept: any size-1 team triggers inheritance,
        // even when the sole row is not the creator's.
        let relations = Arc::new(MockRelationRepository::new());
        relations.seed(2, 1);
        let teams = Arc::new(MockTeamRepository::new());
        teams.seed(1, 5, MemberRole::Write);
        teams.seed(1, 6, MemberRole::Read);
        teams.seed(2, 42, MemberRole::Read);

        let team = resolver(&relations, &teams)
            .resolve_effective_team(2)
            .await
            .unwrap();
        assert_eq!(team.len(), 2);
        assert!(team.iter().all(|m| m.note_id == 1));
    }
}
