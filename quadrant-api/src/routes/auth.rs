/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /login` (also `/api/login`) - Check credentials and set the session cookie
/// - `POST /register` (also `/api/register`) - Create an account (no automatic login)
/// - `GET /logout` - Clear the session cookie and redirect to `/`

use crate::{
    app::AppState,
    error::ApiResult,
    session::{clear_session_cookie, session_cookie},
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::{IntoResponse, Redirect},
    Json,
};
use quadrant_shared::models::user::UserSummary;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Login and registration body
#[derive(Debug, Deserialize, Validate)]
pub struct CredentialsRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 80, message = "Username must be 1 to 80 characters"))]
    pub username: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub user: UserSummary,
}

/// Body of responses that only report success
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Json<Self> {
        Json(Self { success: true })
    }
}

/// Login endpoint
///
/// ```text
/// POST /login
/// Content-Type: application/json
///
/// { "username": "alice", "password": "..." }
/// ```
///
/// Response (with `Set-Cookie: quadrant_session=...`):
///
/// ```json
/// { "success": true, "user": { "id": 1, "username": "alice", "initial": "A" } }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Malformed body
/// - `401 Unauthorized`: Unknown, empty or missing username, or wrong
///   password; no cookie is set
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    // Registration rules are not applied here: a name that could never
    // register is simply an unknown user.
    let Json(req) = payload?;

    let user = state.accounts.authenticate(&req.username, &req.password).await?;
    let cookie = session_cookie(&state.config, user.id)?;

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(LoginResponse {
            success: true,
            user: user.summary(),
        }),
    ))
}

/// Registration endpoint
///
/// # Errors
///
/// - `400 Bad Request`: Malformed body or username already taken
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> ApiResult<Json<SuccessResponse>> {
    let Json(req) = payload?;
    req.validate()?;

    state.accounts.register(&req.username, &req.password).await?;

    Ok(SuccessResponse::ok())
}

/// Logout endpoint; safe to call without a session
pub async fn logout(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let cookie = clear_session_cookie(&state.config)?;
    Ok(([(header::SET_COOKIE, cookie)], Redirect::to("/")))
}
