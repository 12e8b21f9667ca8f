//! Bearer-token authentication extractor.
//!
//! Anonymous requests are valid: the extractor never rejects. Unknown
//! and expired tokens resolve to `None` exactly like a missing header,
//! so route behavior for bad credentials matches unauthenticated
//! access and the policies decide what anonymity means per route.

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use noteplex_core::AuthTokenRepository;

use crate::state::AppState;

/// Acting user for the current request, if any.
pub struct Auth(pub Option<i64>);

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

#[axum::async_trait]
impl FromRequestParts<AppState> for Auth {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user_id = match bearer_token(parts) {
            Some(token) => match state.db.tokens.resolve(token).await {
                Ok(user_id) => user_id,
                Err(err) => {
                    // Storage failure on the auth path degrades to
                    // anonymous rather than failing the request.
                    tracing::warn!(
                        subsystem = "api",
                        component = "auth",
                        error = %err,
                        "Token resolution failed"
                    );
                    None
                }
            },
            None => None,
        };
        Ok(Auth(user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_auth(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/notes/abc");
        if let Some(v) = value {
            builder = builder.header(header::AUTHORIZATION, v);
        }
        let (parts, _) = builder.body(()).unwrap().into_parts();
        parts
    }

    #[test]
    fn test_bearer_token_extracted() {
        let parts = parts_with_auth(Some("Bearer abc123"));
        assert_eq!(bearer_token(&parts), Some("abc123"));
    }

    #[test]
    fn test_missing_header_is_anonymous() {
        let parts = parts_with_auth(None);
        assert_eq!(bearer_token(&parts), None);
    }

    #[test]
    fn test_non_bearer_scheme_is_anonymous() {
        let parts = parts_with_auth(Some("Basic dXNlcjpwdw=="));
        assert_eq!(bearer_token(&parts), None);
    }
}
