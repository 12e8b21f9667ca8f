//! Shared application state.

use std::sync::Arc;

use governor::RateLimiter;
use noteplex_access::{InvitationService, PolicyEvaluator, RoleService, TeamResolver};
use noteplex_core::EventBus;
use noteplex_db::Database;

/// Global (not per-client) rate limiter.
pub type GlobalRateLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub resolver: Arc<TeamResolver>,
    pub evaluator: Arc<PolicyEvaluator>,
    pub invitations: Arc<InvitationService>,
    pub roles: Arc<RoleService>,
    pub event_bus: Arc<EventBus>,
    pub rate_limiter: Option<Arc<GlobalRateLimiter>>,
}

impl AppState {
    /// Wire the access-control services over the database repositories.
    pub fn new(
        db: Database,
        event_bus: Arc<EventBus>,
        rate_limiter: Option<Arc<GlobalRateLimiter>>,
    ) -> Self {
        let pool = db.pool().clone();
        let notes = Arc::new(noteplex_db::PgNoteRepository::new(pool.clone()));
        let relations = Arc::new(noteplex_db::PgNoteRelationRepository::new(pool.clone()));
        let teams = Arc::new(noteplex_db::PgTeamRepository::new(pool.clone()));
        let settings = Arc::new(noteplex_db::PgNoteSettingsRepository::new(pool));

        let resolver = Arc::new(TeamResolver::new(relations, teams.clone()));
        let evaluator = Arc::new(PolicyEvaluator::new(
            notes.clone(),
            settings.clone(),
            resolver.clone(),
        ));
        let invitations = Arc::new(InvitationService::new(
            settings,
            teams.clone(),
            notes,
            event_bus.clone(),
        ));
        let roles = Arc::new(RoleService::new(teams, event_bus.clone()));

        Self {
            db,
            resolver,
            evaluator,
            invitations,
            roles,
            event_bus,
            rate_limiter,
        }
    }
}
