//! Admin authentication for moderation endpoints
//!
//! One fixed credential pair, supplied as HTTP basic auth, guards the
//! queue-inspection and decision routes. The Telegram path never goes
//! through this gate - it has its own channel-native admin check.
//!
//! # Usage
//!
//! ```rust,ignore
//! async fn handler(_admin: AdminAuth) -> impl IntoResponse {
//!     // only reached with valid credentials
//! }
//! ```

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::json;

use crate::app::App;

/// The configured admin credential pair.
#[derive(Clone)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

/// Extractor that admits exactly the configured admin identity.
///
/// Rejects with `401 Unauthorized` and a `WWW-Authenticate: Basic`
/// challenge when the header is missing, malformed, or wrong.
pub struct AdminAuth;

impl FromRequestParts<Arc<App>> for AdminAuth {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<App>,
    ) -> Result<Self, Self::Rejection> {
        let encoded = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Basic "))
            .ok_or_else(unauthorized)?;

        let decoded = BASE64.decode(encoded.trim()).map_err(|_| unauthorized())?;
        let decoded = String::from_utf8(decoded).map_err(|_| unauthorized())?;
        let (username, password) = decoded.split_once(':').ok_or_else(unauthorized)?;

        let credentials = &state.admin_credentials;
        let username_ok = constant_time_eq(username.as_bytes(), credentials.username.as_bytes());
        let password_ok = constant_time_eq(password.as_bytes(), credentials.password.as_bytes());
        if username_ok && password_ok {
            Ok(AdminAuth)
        } else {
            Err(unauthorized())
        }
    }
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, "Basic")],
        Json(json!({ "detail": "Incorrect username or password" })),
    )
        .into_response()
}

/// Byte comparison that does not short-circuit on the first mismatch.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_time_eq_matches_equal_slices() {
        assert!(constant_time_eq(b"admin", b"admin"));
        assert!(constant_time_eq(b"", b""));
    }

    #[test]
    fn constant_time_eq_rejects_differences() {
        assert!(!constant_time_eq(b"admin", b"admim"));
        assert!(!constant_time_eq(b"admin", b"admin2"));
        assert!(!constant_time_eq(b"admin", b""));
    }
}
