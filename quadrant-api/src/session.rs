/// Cookie-backed sessions
///
/// Login stores a signed token in the `quadrant_session` cookie. Protected
/// routes sit behind [`require_session`], which resolves the cookie to a
/// [`CurrentUser`] and places it in the request extensions; handlers take it
/// with `Extension<CurrentUser>`.
///
/// A missing, expired, or tampered cookie, or one naming a deleted user, is
/// treated as anonymous and gets a 401.

use crate::{app::AppState, config::Config, error::ApiError};
use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use quadrant_shared::{
    auth::session::{issue_token, validate_token, SessionClaims},
    models::user::User,
};
use tracing::debug;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "quadrant_session";

/// Identity resolved from the session cookie
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

/// Middleware that rejects requests without a valid session
pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = session_token(req.headers())
        .ok_or_else(|| ApiError::Unauthorized("Login required".to_string()))?;

    let claims = validate_token(&token, &state.config.session.secret).map_err(|e| {
        debug!(error = %e, "Rejected session cookie");
        ApiError::from(e)
    })?;

    let user = state
        .accounts
        .resolve(claims.user_id()?)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Login required".to_string()))?;

    req.extensions_mut().insert(CurrentUser::from(user));

    Ok(next.run(req).await)
}

/// Extracts the session token from the `Cookie` header(s)
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    CookieJar::from_headers(headers)
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// `Set-Cookie` value that logs `user_id` in
pub fn session_cookie(config: &Config, user_id: i64) -> Result<HeaderValue, ApiError> {
    let ttl = config.session.ttl();
    let token = issue_token(&SessionClaims::new(user_id, ttl), &config.session.secret)?;

    cookie_header(&format!(
        "{}={}; Max-Age={}{}",
        SESSION_COOKIE,
        token,
        ttl.num_seconds(),
        cookie_attributes(config.api.production)
    ))
}

/// `Set-Cookie` value that removes the session
pub fn clear_session_cookie(config: &Config) -> Result<HeaderValue, ApiError> {
    cookie_header(&format!(
        "{}=; Max-Age=0{}",
        SESSION_COOKIE,
        cookie_attributes(config.api.production)
    ))
}

fn cookie_attributes(secure: bool) -> &'static str {
    if secure {
        "; Path=/; HttpOnly; SameSite=Lax; Secure"
    } else {
        "; Path=/; HttpOnly; SameSite=Lax"
    }
}

fn cookie_header(value: &str) -> Result<HeaderValue, ApiError> {
    HeaderValue::from_str(value)
        .map_err(|e| ApiError::InternalError(format!("Invalid cookie header: {}", e)))
}
