//! Axum route handlers for admin sessions.

use axum::{
    extract::State,
    http::header::SET_COOKIE,
    response::{AppendHeaders, IntoResponse},
    Extension, Json,
};
use serde_json::{json, Value};
use tracing::info;

use crate::auth::identity::SessionUser;
use crate::errors::AppError;
use crate::state::AppState;

/// POST /api/v1/auth/session
///
/// Body: `{ idToken }`. Verifies the token with the identity provider and sets
/// the session cookie.
pub async fn handle_login(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let id_token = body
        .get("idToken")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Validation("Missing idToken".to_string()))?;

    let user = state.identity.verify_id_token(id_token).await?;
    let session = state
        .sessions
        .issue(&user.uid)
        .map_err(|e| anyhow::anyhow!("could not issue session: {e}"))?;

    info!("Session created for {}", user.uid);
    Ok((
        AppendHeaders([(SET_COOKIE, state.sessions.cookie_header(Some(&session)))]),
        Json(json!({ "ok": true })),
    ))
}

/// DELETE /api/v1/auth/session
pub async fn handle_logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        AppendHeaders([(SET_COOKIE, state.sessions.cookie_header(None))]),
        Json(json!({ "ok": true })),
    )
}

/// GET /api/v1/auth/me
pub async fn handle_me(Extension(user): Extension<SessionUser>) -> Json<SessionUser> {
    Json(user)
}
