//! Note settings and team management handlers.

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::info;

use noteplex_access::{Policy, RequestContext};
use noteplex_core::{
    Error, MemberRole, Note, NoteRepository, NoteSettings, NoteSettingsRepository,
    PatchNoteSettingsRequest, ServerEvent, SettingsWithTeam, TeamMember, TeamRepository,
};

use crate::auth::Auth;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchTeamBody {
    pub user_id: i64,
    pub new_role: MemberRole,
}

async fn resolve_note(state: &AppState, public_id: &str) -> Result<Option<Note>, ApiError> {
    Ok(state.db.notes.get_by_public_id(public_id).await?)
}

/// `GET /note-settings/:notePublicId` — settings plus the note's direct
/// team. Readable by anyone for public notes, team members otherwise.
pub async fn get_settings(
    State(state): State<AppState>,
    Auth(user_id): Auth,
    Path(public_id): Path<String>,
) -> Result<Json<SettingsWithTeam>, ApiError> {
    let note = resolve_note(&state, &public_id)
        .await?
        .ok_or(Error::NoteNotFound(public_id))?;
    let settings = state.db.note_settings.get_by_note_id(note.id).await?;

    let ctx = RequestContext {
        user_id,
        note: Some(note.clone()),
        settings: Some(settings.clone()),
        ..Default::default()
    };
    ApiError::check(
        state
            .evaluator
            .evaluate_all(&[Policy::NotePublicOrUserInTeam], &ctx)
            .await?,
    )?;

    let team = state.db.teams.get_team_members(note.id).await?;
    Ok(Json(SettingsWithTeam { settings, team }))
}

/// `PATCH /note-settings/:notePublicId` — partial settings update
/// (visibility, custom hostname, cover). Requires Write.
pub async fn patch_settings(
    State(state): State<AppState>,
    Auth(user_id): Auth,
    Path(public_id): Path<String>,
    Json(body): Json<PatchNoteSettingsRequest>,
) -> Result<Json<NoteSettings>, ApiError> {
    let note = resolve_note(&state, &public_id).await?;
    let ctx = RequestContext {
        user_id,
        note: note.clone(),
        ..Default::default()
    };
    ApiError::check(
        state
            .evaluator
            .evaluate_all(&[Policy::AuthRequired, Policy::UserCanEdit], &ctx)
            .await?,
    )?;
    let note = note.ok_or(Error::NoteNotFound(public_id))?;

    let updated = state.db.note_settings.patch(note.id, body).await?;
    info!(
        subsystem = "api",
        op = "patch_settings",
        note_id = note.id,
        is_public = updated.is_public,
        "Note settings updated"
    );
    state.event_bus.emit(ServerEvent::SettingsUpdated {
        note_id: note.id,
        is_public: updated.is_public,
    });
    Ok(Json(updated))
}

/// `PATCH /note-settings/:notePublicId/invitation-hash` — rotate the
/// invitation hash, revoking every outstanding copy of the old one.
pub async fn regenerate_invitation_hash(
    State(state): State<AppState>,
    Auth(user_id): Auth,
    Path(public_id): Path<String>,
) -> Result<Json<JsonValue>, ApiError> {
    let note = resolve_note(&state, &public_id).await?;
    let ctx = RequestContext {
        user_id,
        note: note.clone(),
        ..Default::default()
    };
    ApiError::check(
        state
            .evaluator
            .evaluate_all(&[Policy::AuthRequired, Policy::UserCanEdit], &ctx)
            .await?,
    )?;
    let note = note.ok_or(Error::NoteNotFound(public_id))?;

    let settings = state.invitations.regenerate_invitation_hash(note.id).await?;
    Ok(Json(serde_json::json!({
        "invitationHash": settings.invitation_hash,
    })))
}

/// `GET /note-settings/:notePublicId/team` — the note's direct team
/// rows, inheritance not applied.
pub async fn get_team(
    State(state): State<AppState>,
    Auth(user_id): Auth,
    Path(public_id): Path<String>,
) -> Result<Json<Vec<TeamMember>>, ApiError> {
    let note = resolve_note(&state, &public_id)
        .await?
        .ok_or(Error::NoteNotFound(public_id))?;
    let ctx = RequestContext {
        user_id,
        note: Some(note.clone()),
        ..Default::default()
    };
    ApiError::check(
        state
            .evaluator
            .evaluate_all(&[Policy::AuthRequired, Policy::UserCanEdit], &ctx)
            .await?,
    )?;

    let team = state.db.teams.get_team_members(note.id).await?;
    Ok(Json(team))
}

/// `PATCH /note-settings/:notePublicId/team` — change a direct member's
/// role. 404 when the target is not in the team.
pub async fn patch_team(
    State(state): State<AppState>,
    Auth(user_id): Auth,
    Path(public_id): Path<String>,
    Json(body): Json<PatchTeamBody>,
) -> Result<Json<MemberRole>, ApiError> {
    let note = resolve_note(&state, &public_id).await?;
    let ctx = RequestContext {
        user_id,
        note: note.clone(),
        ..Default::default()
    };
    ApiError::check(
        state
            .evaluator
            .evaluate_all(&[Policy::AuthRequired, Policy::UserCanEdit], &ctx)
            .await?,
    )?;
    let note = note.ok_or(Error::NoteNotFound(public_id))?;

    let role = state
        .roles
        .patch_member_role(note.id, body.user_id, body.new_role)
        .await?;
    Ok(Json(role))
}

/// `DELETE /note-settings/:notePublicId/team/:userId` — remove a direct
/// member. Absence is not an error; the response carries `null`.
pub async fn remove_team_member(
    State(state): State<AppState>,
    Auth(user_id): Auth,
    Path((public_id, target_user_id)): Path<(String, i64)>,
) -> Result<Json<JsonValue>, ApiError> {
    let note = resolve_note(&state, &public_id).await?;
    let ctx = RequestContext {
        user_id,
        note: note.clone(),
        ..Default::default()
    };
    ApiError::check(
        state
            .evaluator
            .evaluate_all(&[Policy::AuthRequired, Policy::UserCanEdit], &ctx)
            .await?,
    )?;
    let note = note.ok_or(Error::NoteNotFound(public_id))?;

    let removed = state.roles.remove_member(note.id, target_user_id).await?;
    Ok(Json(serde_json::json!({ "removedUserId": removed })))
}
