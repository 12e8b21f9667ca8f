//! Invitation redemption.

use axum::extract::{Path, State};
use axum::Json;
use tracing::info;

use noteplex_access::{Policy, RequestContext};

use crate::auth::Auth;
use crate::error::ApiError;
use crate::state::AppState;

/// `POST /join/:hash` — redeem an invitation hash and enter the note's
/// team with the Read role. Idempotent for existing members.
pub async fn join_by_hash(
    State(state): State<AppState>,
    Auth(user_id): Auth,
    Path(hash): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
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

    let member = state
        .invitations
        .join_by_invitation_hash(&hash, user_id)
        .await?;
    info!(
        subsystem = "api",
        op = "join",
        user_id,
        note_public_id = %member.note_id,
        "Invitation redeemed"
    );
    Ok(Json(serde_json::json!({ "result": member })))
}
