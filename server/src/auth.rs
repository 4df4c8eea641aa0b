use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::request::Parts;

use crate::config::MAX_IDENTITY_LEN;
use crate::error::ApiError;
use crate::state::AppState;

/// Identity asserted by the upstream authentication gateway.
///
/// Session handling lives in the gateway; this service only trusts the forwarded header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: String,
}

impl AuthUser {
    pub fn from_headers(headers: &HeaderMap, header_name: &str) -> Option<Self> {
        let raw = headers.get(header_name)?.to_str().ok()?;
        normalize_identity(raw).map(|id| Self { id: id.to_owned() })
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match Self::from_headers(&parts.headers, &state.auth_header) {
            Some(user) => Ok(user),
            None => {
                state.observability.record_unauthorized();
                Err(ApiError::Unauthorized)
            }
        }
    }
}

fn normalize_identity(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.len() > MAX_IDENTITY_LEN {
        return None;
    }
    if trimmed.chars().any(char::is_control) {
        return None;
    }
    Some(trimmed)
}
