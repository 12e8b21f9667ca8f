//! Note CRUD and parent-relation handlers.
//!
//! Reads resolve the note up front and 404 on a miss; mutations hand a
//! `None` note to the policy chain instead, which surfaces the 406 the
//! edit policies produce for unresolvable notes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::info;

use noteplex_access::{Policy, RequestContext};
use noteplex_core::{
    CreateNoteRequest, Error, EventActor, EventContext, Note, NoteRelationRepository,
    NoteRepository, NoteSettingsRepository, ServerEvent,
};

use crate::auth::Auth;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNoteBody {
    #[serde(default)]
    pub content: Option<JsonValue>,
    pub parent_public_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchNoteBody {
    pub content: JsonValue,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetRelationBody {
    /// Public id of the new parent note.
    pub parent_note_id: String,
}

async fn resolve_note(state: &AppState, public_id: &str) -> Result<Option<Note>, ApiError> {
    Ok(state.db.notes.get_by_public_id(public_id).await?)
}

fn user_ctx(user_id: i64) -> EventContext {
    EventContext {
        actor: Some(EventActor::user(user_id)),
        ..Default::default()
    }
}

/// `POST /notes` — create a note, optionally under a parent. Settings
/// and the creator's Write membership are seeded in the same
/// transaction.
pub async fn create_note(
    State(state): State<AppState>,
    Auth(user_id): Auth,
    Json(body): Json<CreateNoteBody>,
) -> Result<(StatusCode, Json<Note>), ApiError> {
    let ctx = RequestContext {
        user_id,
        ..Default::default()
    };
    ApiError::check(
        state
            .evaluator
            .evaluate_all(&[Policy::AuthRequired], &ctx)
            .await?,
    )?;
    let user_id = user_id
        .ok_or_else(|| ApiError::Unauthorized("You must be authenticated".to_string()))?;

    let parent_note_id = match body.parent_public_id {
        Some(ref pid) => Some(
            resolve_note(&state, pid)
                .await?
                .ok_or_else(|| Error::NoteNotFound(pid.clone()))?
                .id,
        ),
        None => None,
    };

    let note = state
        .db
        .notes
        .create(CreateNoteRequest {
            creator_id: user_id,
            content: body.content.unwrap_or_else(|| serde_json::json!({})),
            parent_note_id,
        })
        .await?;

    info!(
        subsystem = "api",
        op = "create_note",
        note_id = note.id,
        note_public_id = %note.public_id,
        user_id,
        "Note created"
    );
    state.event_bus.emit_with_context(
        ServerEvent::NoteCreated {
            note_id: note.id,
            public_id: note.public_id.clone(),
            creator_id: user_id,
        },
        user_ctx(user_id),
    );
    Ok((StatusCode::CREATED, Json(note)))
}

/// `GET /notes/:notePublicId` — fetch a note. Public notes are open to
/// anyone; private notes require an effective team role.
pub async fn get_note(
    State(state): State<AppState>,
    Auth(user_id): Auth,
    Path(public_id): Path<String>,
) -> Result<Json<JsonValue>, ApiError> {
    let note = resolve_note(&state, &public_id)
        .await?
        .ok_or(Error::NoteNotFound(public_id))?;
    let settings = state.db.note_settings.get_by_note_id(note.id).await?;

    let ctx = RequestContext {
        user_id,
        note: Some(note.clone()),
        settings: Some(settings),
        ..Default::default()
    };
    ApiError::check(
        state
            .evaluator
            .evaluate_all(&[Policy::NotePublicOrUserInTeam], &ctx)
            .await?,
    )?;

    if let Some(user_id) = user_id {
        state.event_bus.emit_with_context(
            ServerEvent::NoteVisited {
                note_id: note.id,
                user_id,
            },
            user_ctx(user_id),
        );
    }

    let parent_public_id = match state.db.relations.get_parent_note_id(note.id).await? {
        Some(parent_id) => state
            .db
            .notes
            .get(parent_id)
            .await?
            .map(|parent| parent.public_id),
        None => None,
    };

    let mut body = serde_json::to_value(&note).map_err(Error::from)?;
    if let Some(pid) = parent_public_id {
        body["parentNoteId"] = serde_json::json!(pid);
    }
    Ok(Json(body))
}

/// `PATCH /notes/:notePublicId` — replace the note's content. Requires
/// an effective Write role.
pub async fn patch_note(
    State(state): State<AppState>,
    Auth(user_id): Auth,
    Path(public_id): Path<String>,
    Json(body): Json<PatchNoteBody>,
) -> Result<Json<Note>, ApiError> {
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

    let updated = state.db.notes.update_content(note.id, body.content).await?;
    Ok(Json(updated))
}

/// `DELETE /notes/:notePublicId` — delete a note. Creator-only;
/// settings, team rows, and relations cascade.
pub async fn delete_note(
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
            .evaluate_all(&[Policy::AuthRequired, Policy::UserIsCreator], &ctx)
            .await?,
    )?;
    let note = note.ok_or(Error::NoteNotFound(public_id))?;

    state.db.notes.delete(note.id).await?;
    info!(
        subsystem = "api",
        op = "delete_note",
        note_id = note.id,
        "Note deleted"
    );
    state
        .event_bus
        .emit(ServerEvent::NoteDeleted { note_id: note.id });
    Ok(Json(serde_json::json!({ "deleted": true })))
}

/// `PUT /notes/:notePublicId/relation` — link the note under a parent,
/// replacing any existing link. Self-links and cycles are rejected.
pub async fn set_relation(
    State(state): State<AppState>,
    Auth(user_id): Auth,
    Path(public_id): Path<String>,
    Json(body): Json<SetRelationBody>,
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

    let parent = resolve_note(&state, &body.parent_note_id)
        .await?
        .ok_or(Error::NoteNotFound(body.parent_note_id))?;

    state.db.relations.set_parent(note.id, parent.id).await?;
    Ok(Json(serde_json::json!({
        "noteId": note.public_id,
        "parentNoteId": parent.public_id,
    })))
}

/// `DELETE /notes/:notePublicId/relation` — unlink the note from its
/// parent. Reports whether a link existed.
pub async fn delete_relation(
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

    let unlinked = state.db.relations.unlink(note.id).await?;
    Ok(Json(serde_json::json!({ "unlinked": unlinked })))
}
