//! Role gate: login/logout handlers and the session extractor.
//!
//! A session binds a cookie token to exactly one [`Role`] via a
//! shared-secret password check. Guarded handlers extract [`MaybeSession`]
//! and pass it through [`authorize`], the single authorization function;
//! failures carry the role-specific login prompt URL.

use crate::error::AppError;
use crate::session::{SESSION_COOKIE, Session};
use crate::state::AppState;
use axum::{
    Json,
    async_trait,
    extract::{FromRequestParts, State},
    http::{HeaderMap, header, request::Parts},
    response::{AppendHeaders, IntoResponse},
};
use packstation_core::{Capability, Role};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The caller's session, if any. Extraction never fails; authorization is
/// decided per-capability in the handler.
#[derive(Debug, Clone)]
pub struct MaybeSession(pub Option<Session>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = session_token(&parts.headers)
            .and_then(|token| state.sessions.get(token, state.clock.now()));
        Ok(Self(session))
    }
}

/// Parses the session token out of the `Cookie` header.
fn session_token(headers: &HeaderMap) -> Option<Uuid> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        if name == SESSION_COOKIE {
            Uuid::parse_str(value).ok()
        } else {
            None
        }
    })
}

/// The single authorization function of the role gate.
///
/// Requires an authenticated session whose role is allowed the capability.
///
/// # Errors
///
/// Returns 401 with the role-specific login prompt URL when the caller has
/// no session or the wrong role.
pub fn authorize(session: &MaybeSession, capability: Capability) -> Result<Session, AppError> {
    let required = Role::required_for(capability);
    match &session.0 {
        Some(session) if session.role.allows(capability) => Ok(session.clone()),
        _ => Err(
            AppError::unauthorized(format!("{required} role required"))
                .with_login_url(format!("/login?role={required}")),
        ),
    }
}

/// Login request body.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Role to log in as: `frontdesk`, `store` or `driver`.
    pub role: String,
    /// Shared secret for that role.
    pub password: String,
}

/// Login response body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// The authenticated role.
    pub role: Role,
    /// The role home the original UI redirected to.
    pub redirect_to: String,
}

/// The role home path used after login.
const fn role_home(role: Role) -> &'static str {
    match role {
        Role::Frontdesk => "/desk",
        Role::Store => "/store",
        Role::Driver => "/driver",
    }
}

/// Log in with a role and its shared secret.
///
/// # Errors
///
/// 422 for an unknown role, 401 for a wrong password.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let role = Role::parse(&request.role)
        .ok_or_else(|| AppError::validation(format!("unknown role {}", request.role)))?;

    if request.password != state.config.password_for(role) {
        tracing::warn!(%role, "login rejected");
        return Err(AppError::unauthorized("Invalid credentials")
            .with_login_url(format!("/login?role={role}")));
    }

    let token = state
        .sessions
        .create(role, role.as_str(), state.clock.now());
    tracing::info!(%role, "login succeeded");

    let cookie = format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        state.sessions.max_age_seconds()
    );
    Ok((
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Json(LoginResponse {
            role,
            redirect_to: role_home(role).to_string(),
        }),
    ))
}

/// Log out: destroy the session and clear the cookie.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    if let Some(token) = session_token(&headers) {
        state.sessions.destroy(token);
    }
    let cookie = format!("{SESSION_COOKIE}=; Path=/; HttpOnly; Max-Age=0");
    (
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Json(serde_json::json!({ "ok": true })),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn authorize_rejects_missing_session() {
        let err = authorize(&MaybeSession(None), Capability::CheckIn).unwrap_err();
        assert!(err.to_string().contains("frontdesk role required"));
    }

    #[test]
    fn authorize_rejects_wrong_role() {
        let session = Session {
            role: Role::Driver,
            user: "driver".to_string(),
            expires_at: Utc::now() + chrono::Duration::hours(1),
        };
        assert!(authorize(&MaybeSession(Some(session)), Capability::Stage).is_err());
    }

    #[test]
    fn authorize_accepts_matching_role() {
        let session = Session {
            role: Role::Store,
            user: "store".to_string(),
            expires_at: Utc::now() + chrono::Duration::hours(1),
        };
        let authorized = authorize(&MaybeSession(Some(session)), Capability::Stage).unwrap();
        assert_eq!(authorized.role, Role::Store);
    }

    #[test]
    fn session_token_parses_cookie_header() {
        let token = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            format!("other=1; {SESSION_COOKIE}={token}; x=y")
                .parse()
                .unwrap(),
        );
        assert_eq!(session_token(&headers), Some(token));
    }
}
