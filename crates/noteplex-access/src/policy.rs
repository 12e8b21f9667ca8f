//! Route policy evaluation.
//!
//! A route declares an ordered list of [`Policy`] values. Evaluation is
//! sequential AND-composition: the first denial aborts the chain and
//! becomes the response; only when every policy allows does the handler
//! body run. Policies never raise — a denial is a value carrying the
//! HTTP status and a short human-readable message, and the transport
//! layer writes it out verbatim.

use std::sync::Arc;

use tracing::debug;

use noteplex_core::{
    FileKind, MemberRole, Note, NoteRepository, NoteSettings, NoteSettingsRepository, Result,
    StoredFile,
};

use crate::resolver::TeamResolver;

/// Named authorization checks bindable to routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// The request must carry an authenticated user.
    AuthRequired,
    /// The resolved note's creator must be the requesting user.
    UserIsCreator,
    /// The note is public, or the user holds any effective role.
    NotePublicOrUserInTeam,
    /// The user's effective role must be exactly `Write`.
    UserCanEdit,
    /// Upload guard: note attachments require `Write` on the target
    /// note; any other upload kind requires authentication only.
    UserCanUploadFile,
    /// Download guard: files bound to a note follow the note's
    /// public/team visibility; unbound files need nothing further.
    UserCanReadFileData,
}

impl Policy {
    /// Stable name used in denial logs.
    pub fn name(&self) -> &'static str {
        match self {
            Policy::AuthRequired => "authRequired",
            Policy::UserIsCreator => "userIsCreator",
            Policy::NotePublicOrUserInTeam => "notePublicOrUserInTeam",
            Policy::UserCanEdit => "userCanEdit",
            Policy::UserCanUploadFile => "userCanUploadFile",
            Policy::UserCanReadFileData => "userCanReadFileData",
        }
    }
}

/// HTTP status a denial maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyStatus {
    Unauthorized,
    Forbidden,
    NotFound,
    NotAcceptable,
}

impl DenyStatus {
    /// Numeric status code.
    pub fn code(&self) -> u16 {
        match self {
            DenyStatus::Unauthorized => 401,
            DenyStatus::Forbidden => 403,
            DenyStatus::NotFound => 404,
            DenyStatus::NotAcceptable => 406,
        }
    }
}

/// Outcome of evaluating one policy (or a whole chain).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyDecision {
    Allowed,
    Denied {
        status: DenyStatus,
        message: String,
    },
}

impl PolicyDecision {
    fn denied(status: DenyStatus, message: &str) -> Self {
        PolicyDecision::Denied {
            status,
            message: message.to_string(),
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, PolicyDecision::Allowed)
    }
}

/// Declared intent of an upload request, parsed from the typed body
/// before evaluation.
#[derive(Debug, Clone)]
pub struct UploadIntent {
    pub kind: FileKind,
    /// Public id of the target note, for note-attachment uploads.
    pub note_public_id: Option<String>,
}

/// Resolved request context the policies evaluate against.
///
/// Route handlers resolve what they can up front (authenticated user,
/// note by public id, its settings); fields stay `None` when the route
/// carries no such input or resolution missed.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub user_id: Option<i64>,
    pub note: Option<Note>,
    pub settings: Option<NoteSettings>,
    pub upload: Option<UploadIntent>,
    pub file: Option<StoredFile>,
}

const MSG_AUTH_REQUIRED: &str = "You must be authenticated to access this resource";
const MSG_PERMISSION_DENIED: &str = "Permission denied";
const MSG_NOTE_NOT_FOUND: &str = "Note not found";
const MSG_UPLOAD_UNRESOLVED: &str = "File type or location not provided";
const MSG_FILE_NOT_FOUND: &str = "File not found";

/// Evaluates policy chains against a request context.
///
/// Holds store handles because the file policies resolve their target
/// note and settings themselves, mid-policy, from the declared upload
/// location or the stored file row.
pub struct PolicyEvaluator {
    notes: Arc<dyn NoteRepository>,
    settings: Arc<dyn NoteSettingsRepository>,
    resolver: Arc<TeamResolver>,
}

impl PolicyEvaluator {
    pub fn new(
        notes: Arc<dyn NoteRepository>,
        settings: Arc<dyn NoteSettingsRepository>,
        resolver: Arc<TeamResolver>,
    ) -> Self {
        Self {
            notes,
            settings,
            resolver,
        }
    }

    /// Evaluate a route's policy list in order, short-circuiting on the
    /// first denial.
    pub async fn evaluate_all(
        &self,
        policies: &[Policy],
        ctx: &RequestContext,
    ) -> Result<PolicyDecision> {
        for policy in policies {
            let decision = self.evaluate(*policy, ctx).await?;
            if let PolicyDecision::Denied { status, ref message } = decision {
                debug!(
                    subsystem = "access",
                    component = "policy",
                    policy = policy.name(),
                    deny_status = status.code(),
                    message = %message,
                    "Policy denied request"
                );
                return Ok(decision);
            }
        }
        Ok(PolicyDecision::Allowed)
    }

    /// Evaluate a single policy.
    pub async fn evaluate(&self, policy: Policy, ctx: &RequestContext) -> Result<PolicyDecision> {
        match policy {
            Policy::AuthRequired => Ok(self.auth_required(ctx)),
            Policy::UserIsCreator => Ok(self.user_is_creator(ctx)),
            Policy::NotePublicOrUserInTeam => self.note_public_or_user_in_team(ctx).await,
            Policy::UserCanEdit => self.user_can_edit(ctx).await,
            Policy::UserCanUploadFile => self.user_can_upload_file(ctx).await,
            Policy::UserCanReadFileData => self.user_can_read_file_data(ctx).await,
        }
    }

    fn auth_required(&self, ctx: &RequestContext) -> PolicyDecision {
        if ctx.user_id.is_some() {
            PolicyDecision::Allowed
        } else {
            PolicyDecision::denied(DenyStatus::Unauthorized, MSG_AUTH_REQUIRED)
        }
    }

    fn user_is_creator(&self, ctx: &RequestContext) -> PolicyDecision {
        let Some(user_id) = ctx.user_id else {
            return PolicyDecision::denied(DenyStatus::Unauthorized, MSG_AUTH_REQUIRED);
        };
        let Some(note) = &ctx.note else {
            return PolicyDecision::denied(DenyStatus::NotAcceptable, MSG_NOTE_NOT_FOUND);
        };
        if note.creator_id == user_id {
            PolicyDecision::Allowed
        } else {
            PolicyDecision::denied(DenyStatus::Forbidden, MSG_PERMISSION_DENIED)
        }
    }

    async fn note_public_or_user_in_team(&self, ctx: &RequestContext) -> Result<PolicyDecision> {
        let (Some(note), Some(settings)) = (&ctx.note, &ctx.settings) else {
            return Ok(PolicyDecision::denied(
                DenyStatus::NotAcceptable,
                MSG_NOTE_NOT_FOUND,
            ));
        };
        // Public notes bypass the role lookup entirely.
        if settings.is_public {
            return Ok(PolicyDecision::Allowed);
        }
        // Private note: anonymous and roleless users get the same
        // generic denial. Routes that want a 401-first answer put
        // AuthRequired ahead of this policy in their chain.
        let Some(user_id) = ctx.user_id else {
            return Ok(PolicyDecision::denied(
                DenyStatus::Forbidden,
                MSG_PERMISSION_DENIED,
            ));
        };
        match self.resolver.user_role(user_id, note.id).await? {
            Some(_) => Ok(PolicyDecision::Allowed),
            None => Ok(PolicyDecision::denied(
                DenyStatus::Forbidden,
                MSG_PERMISSION_DENIED,
            )),
        }
    }

    async fn user_can_edit(&self, ctx: &RequestContext) -> Result<PolicyDecision> {
        let Some(user_id) = ctx.user_id else {
            return Ok(PolicyDecision::denied(
                DenyStatus::Unauthorized,
                MSG_AUTH_REQUIRED,
            ));
        };
        let Some(note) = &ctx.note else {
            return Ok(PolicyDecision::denied(
                DenyStatus::NotAcceptable,
                MSG_NOTE_NOT_FOUND,
            ));
        };
        // Exact match, no hierarchy: Read never satisfies Write.
        match self.resolver.user_role(user_id, note.id).await? {
            Some(MemberRole::Write) => Ok(PolicyDecision::Allowed),
            _ => Ok(PolicyDecision::denied(
                DenyStatus::Forbidden,
                MSG_PERMISSION_DENIED,
            )),
        }
    }

    async fn user_can_upload_file(&self, ctx: &RequestContext) -> Result<PolicyDecision> {
        let Some(user_id) = ctx.user_id else {
            return Ok(PolicyDecision::denied(
                DenyStatus::Unauthorized,
                MSG_AUTH_REQUIRED,
            ));
        };
        let Some(upload) = &ctx.upload else {
            return Ok(PolicyDecision::denied(
                DenyStatus::NotAcceptable,
                MSG_UPLOAD_UNRESOLVED,
            ));
        };
        if upload.kind != FileKind::NoteAttachment {
            // Avatars and future unbound kinds need authentication only.
            return Ok(PolicyDecision::Allowed);
        }
        let Some(public_id) = &upload.note_public_id else {
            return Ok(PolicyDecision::denied(
                DenyStatus::NotAcceptable,
                MSG_UPLOAD_UNRESOLVED,
            ));
        };
        let Some(note) = self.notes.get_by_public_id(public_id).await? else {
            return Ok(PolicyDecision::denied(
                DenyStatus::NotFound,
                MSG_NOTE_NOT_FOUND,
            ));
        };
        match self.resolver.user_role(user_id, note.id).await? {
            Some(MemberRole::Write) => Ok(PolicyDecision::Allowed),
            _ => Ok(PolicyDecision::denied(
                DenyStatus::Forbidden,
                MSG_PERMISSION_DENIED,
            )),
        }
    }

    async fn user_can_read_file_data(&self, ctx: &RequestContext) -> Result<PolicyDecision> {
        let Some(file) = &ctx.file else {
            return Ok(PolicyDecision::denied(
                DenyStatus::NotAcceptable,
                MSG_FILE_NOT_FOUND,
            ));
        };
        let Some(note_id) = file.note_id else {
            // Unbound files (avatars) are guarded by key secrecy alone.
            return Ok(PolicyDecision::Allowed);
        };
        let settings = self.settings.get_by_note_id(note_id).await?;
        if settings.is_public {
            return Ok(PolicyDecision::Allowed);
        }
        let Some(user_id) = ctx.user_id else {
            return Ok(PolicyDecision::denied(
                DenyStatus::Unauthorized,
                MSG_AUTH_REQUIRED,
            ));
        };
        match self.resolver.user_role(user_id, note_id).await? {
            Some(_) => Ok(PolicyDecision::Allowed),
            None => Ok(PolicyDecision::denied(
                DenyStatus::Forbidden,
                MSG_PERMISSION_DENIED,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{
        MockNoteRepository, MockRelationRepository, MockSettingsRepository, MockTeamRepository,
    };
    struct Fixture {
        notes: Arc<MockNoteRepository>,
        settings: Arc<MockSettingsRepository>,
        teams: Arc<MockTeamRepository>,
        relations: Arc<MockRelationRepository>,
        evaluator: PolicyEvaluator,
    }

    fn fixture() -> Fixture {
        let notes = Arc::new(MockNoteRepository::new());
        let settings = Arc::new(MockSettingsRepository::new());
        let teams = Arc::new(MockTeamRepository::new());
        let relations = Arc::new(MockRelationRepository::new());
        let resolver = Arc::new(TeamResolver::new(relations.clone(), teams.clone()));
        let evaluator = PolicyEvaluator::new(notes.clone(), settings.clone(), resolver);
        Fixture {
            notes,
            settings,
            teams,
            relations,
            evaluator,
        }
    }

    fn assert_denied(decision: &PolicyDecision, code: u16, message: &str) {
        match decision {
            PolicyDecision::Denied { status, message: m } => {
                assert_eq!(status.code(), code);
                assert_eq!(m, message);
            }
            PolicyDecision::Allowed => panic!("expected denial, got allow"),
        }
    }

    fn note_ctx(f: &Fixture, user_id: Option<i64>) -> RequestContext {
        let note = f.notes.seed(1, "TJmEb89e0l", 9);
        let settings = f.settings.seed(1, false, "Hzh2hy4igf");
        RequestContext {
            user_id,
            note: Some(note),
            settings: Some(settings),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_auth_required() {
        let f = fixture();
        let anon = RequestContext::default();
        let decision = f.evaluator.evaluate(Policy::AuthRequired, &anon).await.unwrap();
        assert_denied(
            &decision,
            401,
            "You must be authenticated to access this resource",
        );

        let authed = RequestContext {
            user_id: Some(1),
            ..Default::default()
        };
        assert!(f
            .evaluator
            .evaluate(Policy::AuthRequired, &authed)
            .await
            .unwrap()
            .is_allowed());
    }

    #[tokio::test]
    async fn test_user_is_creator_branches() {
        let f = fixture();

        let anon = note_ctx(&f, None);
        let decision = f
            .evaluator
            .evaluate(Policy::UserIsCreator, &anon)
            .await
            .unwrap();
        assert_denied(
            &decision,
            401,
            "You must be authenticated to access this resource",
        );

        let no_note = RequestContext {
            user_id: Some(9),
            ..Default::default()
        };
        let decision = f
            .evaluator
            .evaluate(Policy::UserIsCreator, &no_note)
            .await
            .unwrap();
        assert_denied(&decision, 406, "Note not found");

        let stranger = RequestContext {
            user_id: Some(2),
            ..note_ctx(&f, Some(2))
        };
        let decision = f
            .evaluator
            .evaluate(Policy::UserIsCreator, &stranger)
            .await
            .unwrap();
        assert_denied(&decision, 403, "Permission denied");

        let creator = note_ctx(&f, Some(9));
        assert!(f
            .evaluator
            .evaluate(Policy::UserIsCreator, &creator)
            .await
            .unwrap()
            .is_allowed());
    }

    #[tokio::test]
    async fn test_public_note_bypasses_role_lookup() {
        let f = fixture();
        let note = f.notes.seed(1, "TJmEb89e0l", 9);
        let settings = f.settings.seed(1, true, "Hzh2hy4igf");
        let anon = RequestContext {
            user_id: None,
            note: Some(note),
            settings: Some(settings),
            ..Default::default()
        };

        let decision = f
            .evaluator
            .evaluate(Policy::NotePublicOrUserInTeam, &anon)
            .await
            .unwrap();
        assert!(decision.is_allowed());
        // No team read performed for public notes.
        assert_eq!(f.teams.team_reads(), 0);
    }

    #[tokio::test]
    async fn test_private_note_denies_anonymous_with_403() {
        // Scenario: anonymous request to a private note's settings
        // endpoint produces the generic 403, not a 401.
        let f = fixture();
        let ctx = note_ctx(&f, None);

        let decision = f
            .evaluator
            .evaluate(Policy::NotePublicOrUserInTeam, &ctx)
            .await
            .unwrap();
        assert_denied(&decision, 403, "Permission denied");
    }

    #[tokio::test]
    async fn test_private_note_denies_roleless_user() {
        let f = fixture();
        let ctx = note_ctx(&f, Some(5));
        f.teams.seed(1, 9, MemberRole::Write);
        f.teams.seed(1, 6, MemberRole::Read);

        let decision = f
            .evaluator
            .evaluate(Policy::NotePublicOrUserInTeam, &ctx)
            .await
            .unwrap();
        assert_denied(&decision, 403, "Permission denied");
    }

    #[tokio::test]
    async fn test_private_note_allows_any_role() {
        let f = fixture();
        let ctx = note_ctx(&f, Some(6));
        f.teams.seed(1, 9, MemberRole::Write);
        f.teams.seed(1, 6, MemberRole::Read);

        assert!(f
            .evaluator
            .evaluate(Policy::NotePublicOrUserInTeam, &ctx)
            .await
            .unwrap()
            .is_allowed());
    }

    #[tokio::test]
    async fn test_missing_note_or_settings_is_406() {
        let f = fixture();
        let ctx = RequestContext {
            user_id: Some(1),
            ..Default::default()
        };
        let decision = f
            .evaluator
            .evaluate(Policy::NotePublicOrUserInTeam, &ctx)
            .await
            .unwrap();
        assert_denied(&decision, 406, "Note not found");
    }

    #[tokio::test]
    async fn test_user_can_edit_requires_exact_write() {
        let f = fixture();
        f.teams.seed(1, 9, MemberRole::Write);
        f.teams.seed(1, 6, MemberRole::Read);

        let reader = note_ctx(&f, Some(6));
        let decision = f
            .evaluator
            .evaluate(Policy::UserCanEdit, &reader)
            .await
            .unwrap();
        assert_denied(&decision, 403, "Permission denied");

        let writer = note_ctx(&f, Some(9));
        assert!(f
            .evaluator
            .evaluate(Policy::UserCanEdit, &writer)
            .await
            .unwrap()
            .is_allowed());
    }

    #[tokio::test]
    async fn test_user_can_edit_uses_inherited_role() {
        // Write inherited from the parent's customized team.
        let f = fixture();
        let child = f.notes.seed(2, "Child00000", 9);
        f.settings.seed(2, false, "aaaaaaaaaa");
        f.relations.seed(2, 1);
        f.teams.seed(2, 9, MemberRole::Write);
        f.teams.seed(1, 9, MemberRole::Write);
        f.teams.seed(1, 7, MemberRole::Write);

        let ctx = RequestContext {
            user_id: Some(7),
            note: Some(child),
            settings: Some(f.settings.get_by_note_id(2).await.unwrap()),
            ..Default::default()
        };
        assert!(f
            .evaluator
            .evaluate(Policy::UserCanEdit, &ctx)
            .await
            .unwrap()
            .is_allowed());
    }

    #[tokio::test]
    async fn test_upload_policy_branches() {
        let f = fixture();
        f.notes.seed(1, "TJmEb89e0l", 9);
        f.teams.seed(1, 9, MemberRole::Write);
        f.teams.seed(1, 6, MemberRole::Read);

        // Anonymous fails first.
        let anon = RequestContext::default();
        let decision = f
            .evaluator
            .evaluate(Policy::UserCanUploadFile, &anon)
            .await
            .unwrap();
        assert_denied(
            &decision,
            401,
            "You must be authenticated to access this resource",
        );

        // Missing upload intent.
        let bare = RequestContext {
            user_id: Some(9),
            ..Default::default()
        };
        let decision = f
            .evaluator
            .evaluate(Policy::UserCanUploadFile, &bare)
            .await
            .unwrap();
        assert_denied(&decision, 406, "File type or location not provided");

        // Attachment without a location.
        let no_location = RequestContext {
            user_id: Some(9),
            upload: Some(UploadIntent {
                kind: FileKind::NoteAttachment,
                note_public_id: None,
            }),
            ..Default::default()
        };
        let decision = f
            .evaluator
            .evaluate(Policy::UserCanUploadFile, &no_location)
            .await
            .unwrap();
        assert_denied(&decision, 406, "File type or location not provided");

        // Unknown note is 404 here, not 406.
        let unknown_note = RequestContext {
            user_id: Some(9),
            upload: Some(UploadIntent {
                kind: FileKind::NoteAttachment,
                note_public_id: Some("doesNotExst".to_string()),
            }),
            ..Default::default()
        };
        let decision = f
            .evaluator
            .evaluate(Policy::UserCanUploadFile, &unknown_note)
            .await
            .unwrap();
        assert_denied(&decision, 404, "Note not found");

        // Read role is insufficient for attachments.
        let reader = RequestContext {
            user_id: Some(6),
            upload: Some(UploadIntent {
                kind: FileKind::NoteAttachment,
                note_public_id: Some("TJmEb89e0l".to_string()),
            }),
            ..Default::default()
        };
        let decision = f
            .evaluator
            .evaluate(Policy::UserCanUploadFile, &reader)
            .await
            .unwrap();
        assert_denied(&decision, 403, "Permission denied");

        // Writer uploads attachments.
        let writer = RequestContext {
            user_id: Some(9),
            upload: Some(UploadIntent {
                kind: FileKind::NoteAttachment,
                note_public_id: Some("TJmEb89e0l".to_string()),
            }),
            ..Default::default()
        };
        assert!(f
            .evaluator
            .evaluate(Policy::UserCanUploadFile, &writer)
            .await
            .unwrap()
            .is_allowed());

        // Avatar uploads need authentication only.
        let avatar = RequestContext {
            user_id: Some(6),
            upload: Some(UploadIntent {
                kind: FileKind::UserAvatar,
                note_public_id: None,
            }),
            ..Default::default()
        };
        assert!(f
            .evaluator
            .evaluate(Policy::UserCanUploadFile, &avatar)
            .await
            .unwrap()
            .is_allowed());

        // Only the three attachment cases with a location resolved the
        // target note; the rest denied before reaching the note store.
        assert_eq!(f.notes.note_reads(), 3);
    }

    fn stored_file(note_id: Option<i64>) -> StoredFile {
        StoredFile {
            id: 1,
            key: "k".repeat(21),
            kind: note_id
                .map(|_| FileKind::NoteAttachment)
                .unwrap_or(FileKind::UserAvatar),
            note_id,
            uploader_id: 9,
            filename: "diagram.png".to_string(),
            data: vec![1, 2, 3],
            created_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_read_file_policy_branches() {
        let f = fixture();
        f.notes.seed(1, "TJmEb89e0l", 9);
        f.settings.seed(1, false, "Hzh2hy4igf");
        f.teams.seed(1, 9, MemberRole::Write);
        f.teams.seed(1, 6, MemberRole::Read);

        // Missing file resolution.
        let missing = RequestContext {
            user_id: Some(9),
            ..Default::default()
        };
        let decision = f
            .evaluator
            .evaluate(Policy::UserCanReadFileData, &missing)
            .await
            .unwrap();
        assert_denied(&decision, 406, "File not found");

        // Private note attachment: anonymous is 401 here.
        let bound = stored_file(Some(1));
        let anon = RequestContext {
            user_id: None,
            file: Some(bound.clone()),
            ..Default::default()
        };
        let decision = f
            .evaluator
            .evaluate(Policy::UserCanReadFileData, &anon)
            .await
            .unwrap();
        assert_denied(
            &decision,
            401,
            "You must be authenticated to access this resource",
        );

        // Roleless authenticated user is 403.
        let stranger = RequestContext {
            user_id: Some(42),
            file: Some(bound.clone()),
            ..Default::default()
        };
        let decision = f
            .evaluator
            .evaluate(Policy::UserCanReadFileData, &stranger)
            .await
            .unwrap();
        assert_denied(&decision, 403, "Permission denied");

        // Any role reads.
        let reader = RequestContext {
            user_id: Some(6),
            file: Some(bound.clone()),
            ..Default::default()
        };
        assert!(f
            .evaluator
            .evaluate(Policy::UserCanReadFileData, &reader)
            .await
            .unwrap()
            .is_allowed());

        // Unbound files pass with no further checks, even anonymously.
        let avatar = stored_file(None);
        let anon_avatar = RequestContext {
            user_id: None,
            file: Some(avatar),
            ..Default::default()
        };
        assert!(f
            .evaluator
            .evaluate(Policy::UserCanReadFileData, &anon_avatar)
            .await
            .unwrap()
            .is_allowed());

        // Settings were fetched once per note-bound evaluation; the
        // missing-file and avatar cases never touched the store.
        assert_eq!(f.settings.settings_reads(), 3);
    }

    #[tokio::test]
    async fn test_public_note_attachment_readable_anonymously() {
        let f = fixture();
        f.notes.seed(1, "TJmEb89e0l", 9);
        f.settings.seed(1, true, "Hzh2hy4igf");

        let file = stored_file(Some(1));
        let anon = RequestContext {
            user_id: None,
            file: Some(file),
            ..Default::default()
        };
        assert!(f
            .evaluator
            .evaluate(Policy::UserCanReadFileData, &anon)
            .await
            .unwrap()
            .is_allowed());
        assert_eq!(f.teams.team_reads(), 0);
    }

    #[tokio::test]
    async fn test_evaluate_all_short_circuits() {
        let f = fixture();
        let anon = note_ctx(&f, None);

        // AuthRequired fails first; NotePublicOrUserInTeam would have
        // produced a 403, but the chain never reaches it.
        let decision = f
            .evaluator
            .evaluate_all(&[Policy::AuthRequired, Policy::NotePublicOrUserInTeam], &anon)
            .await
            .unwrap();
        assert_denied(
            &decision,
            401,
            "You must be authenticated to access this resource",
        );
        assert_eq!(f.teams.team_reads(), 0);
    }

    #[tokio::test]
    async fn test_evaluate_all_allows_when_every_policy_allows() {
        let f = fixture();
        let creator = note_ctx(&f, Some(9));
        f.teams.seed(1, 9, MemberRole::Write);

        let decision = f
            .evaluator
            .evaluate_all(
                &[
                    Policy::AuthRequired,
                    Policy::UserIsCreator,
                    Policy::UserCanEdit,
                ],
                &creator,
            )
            .await
            .unwrap();
        assert!(decision.is_allowed());
    }

    #[tokio::test]
    async fn test_empty_chain_allows() {
        let f = fixture();
        let decision = f
            .evaluator
            .evaluate_all(&[], &RequestContext::default())
            .await
            .unwrap();
        assert!(decision.is_allowed());
    }
}
