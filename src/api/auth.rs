//! Session-cookie authentication and role gates.

use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, header, request::Parts};
use tracing::warn;

use crate::error::{PosError, PosResult};
use crate::models::StaffMember;

use super::response::ApiErrorResponse;
use super::state::AppState;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "session";

/// The authenticated caller.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub StaffMember);

#[axum::async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiErrorResponse;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = session_token(&parts.headers).unwrap_or_default();
        match state.config().authenticate(token) {
            Ok(member) => Ok(CurrentUser(member)),
            Err(err) => {
                warn!(uri = %parts.uri, "Rejected request without a valid session");
                Err(err.into())
            }
        }
    }
}

/// Extracts the session token from the `Cookie` headers.
fn session_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, token)| token.trim())
}

/// Admits ADMIN and MANAGER callers.
pub fn require_manager(user: &StaffMember, action: &str) -> PosResult<()> {
    if user.role.is_manager() {
        return Ok(());
    }
    warn!(user_id = %user.id, role = %user.role, action, "Role not allowed");
    Err(PosError::Forbidden {
        role: user.role.to_string(),
        action: action.to_string(),
    })
}
