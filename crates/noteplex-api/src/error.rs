//! API error type and response mapping.
//!
//! Two body shapes cross the wire. Policy denials and the access-control
//! domain errors use `{"message": ..}` — these texts are part of the
//! public contract. Everything else keeps the `{"error": ..}` envelope.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use noteplex_access::{DenyStatus, PolicyDecision};

#[derive(Debug)]
pub enum ApiError {
    /// Database or other internal failure. Logged, never echoed.
    Internal(noteplex_core::Error),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    BadRequest(String),
    /// A policy denial or domain error surfaced with a `message` body.
    Denied { status: StatusCode, message: String },
}

impl ApiError {
    /// Convert a policy chain outcome into a handler result.
    pub fn check(decision: PolicyDecision) -> Result<(), ApiError> {
        match decision {
            PolicyDecision::Allowed => Ok(()),
            PolicyDecision::Denied { status, message } => Err(ApiError::Denied {
                status: deny_status_code(status),
                message,
            }),
        }
    }
}

fn deny_status_code(status: DenyStatus) -> StatusCode {
    StatusCode::from_u16(status.code()).unwrap_or(StatusCode::FORBIDDEN)
}

impl From<noteplex_core::Error> for ApiError {
    fn from(err: noteplex_core::Error) -> Self {
        use noteplex_core::Error;
        match err {
            Error::NotFound(msg) => ApiError::NotFound(msg),
            Error::NoteNotFound(_) => ApiError::Denied {
                status: StatusCode::NOT_FOUND,
                message: "Note not found".to_string(),
            },
            Error::InvalidInvitation => ApiError::Denied {
                status: StatusCode::NOT_ACCEPTABLE,
                message: Error::InvalidInvitation.to_string(),
            },
            Error::NotInTeam => ApiError::Denied {
                status: StatusCode::NOT_FOUND,
                message: Error::NotInTeam.to_string(),
            },
            Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            Error::Unauthorized(msg) => ApiError::Unauthorized(msg),
            Error::Forbidden(msg) => ApiError::Forbidden(msg),
            other => ApiError::Internal(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            ApiError::Denied { status, message } => {
                (status, serde_json::json!({ "message": message }))
            }
            ApiError::Internal(err) => {
                tracing::error!(
                    subsystem = "api",
                    error = %err,
                    "Internal error while handling request"
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({ "error": "Internal server error" }),
                )
            }
            ApiError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, serde_json::json!({ "error": msg }))
            }
            ApiError::Forbidden(msg) => {
                (StatusCode::FORBIDDEN, serde_json::json!({ "error": msg }))
            }
            ApiError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, serde_json::json!({ "error": msg }))
            }
            ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, serde_json::json!({ "error": msg }))
            }
        };
        (status, Json(body)).into_response()
    }
}
