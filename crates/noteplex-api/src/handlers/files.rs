//! File download handler.

use axum::extract::{Path, State};
use axum::Json;
use base64::Engine;

use noteplex_access::{Policy, RequestContext};
use noteplex_core::{Error, FileRepository};

use crate::auth::Auth;
use crate::error::ApiError;
use crate::state::AppState;

/// `GET /files/:key` — fetch a stored file by its access key. Files
/// bound to a note follow the note's visibility; unbound files are
/// guarded by the key alone.
pub async fn get_file(
    State(state): State<AppState>,
    Auth(user_id): Auth,
    Path(key): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let file = state.db.files.get_by_key(&key).await?;
    let ctx = RequestContext {
        user_id,
        file: file.clone(),
        ..Default::default()
    };
    ApiError::check(
        state
            .evaluator
            .evaluate_all(&[Policy::UserCanReadFileData], &ctx)
            .await?,
    )?;
    let file = file.ok_or_else(|| Error::NotFound(format!("file {}", key)))?;

    let data = base64::engine::general_purpose::STANDARD.encode(&file.data);
    Ok(Json(serde_json::json!({
        "key": file.key,
        "filename": file.filename,
        "kind": file.kind,
        "data": data,
    })))
}
