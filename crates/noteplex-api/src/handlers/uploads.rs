//! File upload handler.
//!
//! Uploads arrive as base64 inside a JSON body. The upload policy runs
//! before any decoding, so oversized or malformed payloads from
//! unauthorized callers cost one policy walk and nothing else.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use base64::Engine;
use serde::Deserialize;
use tracing::info;

use noteplex_access::{Policy, RequestContext, UploadIntent};
use noteplex_core::{
    defaults, CreateFileRequest, Error, FileKind, FileRepository, NoteRepository,
};

use crate::auth::Auth;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadBody {
    /// File kind; absent values are denied by the upload policy, not
    /// rejected as malformed JSON.
    pub kind: Option<FileKind>,
    pub note_public_id: Option<String>,
    pub filename: String,
    /// Base64-encoded file content.
    pub data: String,
}

/// `POST /uploads` — store a file. Note attachments require Write on
/// the target note; other kinds require authentication only.
pub async fn upload_file(
    State(state): State<AppState>,
    Auth(user_id): Auth,
    Json(body): Json<UploadBody>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let ctx = RequestContext {
        user_id,
        upload: body.kind.map(|kind| UploadIntent {
            kind,
            note_public_id: body.note_public_id.clone(),
        }),
        ..Default::default()
    };
    ApiError::check(
        state
            .evaluator
            .evaluate_all(&[Policy::UserCanUploadFile], &ctx)
            .await?,
    )?;
    let user_id = user_id
        .ok_or_else(|| ApiError::Unauthorized("You must be authenticated".to_string()))?;
    let kind = body
        .kind
        .ok_or_else(|| ApiError::BadRequest("File type not provided".to_string()))?;

    let data = base64::engine::general_purpose::STANDARD
        .decode(&body.data)
        .map_err(|_| ApiError::BadRequest("File data is not valid base64".to_string()))?;
    if data.len() > defaults::MAX_UPLOAD_SIZE_BYTES {
        return Err(ApiError::BadRequest(format!(
            "File exceeds the {} byte limit",
            defaults::MAX_UPLOAD_SIZE_BYTES
        )));
    }

    // The upload policy already resolved the target note; re-resolve to
    // get its internal id for the file row.
    let note_id = match (kind, body.note_public_id) {
        (FileKind::NoteAttachment, Some(ref pid)) => Some(
            state
                .db
                .notes
                .get_by_public_id(pid)
                .await?
                .ok_or_else(|| Error::NoteNotFound(pid.clone()))?
                .id,
        ),
        _ => None,
    };

    let file = state
        .db
        .files
        .insert(CreateFileRequest {
            kind,
            note_id,
            uploader_id: user_id,
            filename: body.filename,
            data,
        })
        .await?;

    info!(
        subsystem = "api",
        op = "upload_file",
        user_id,
        file_key = %file.key,
        note_id = file.note_id,
        "File stored"
    );
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "key": file.key })),
    ))
}
