use axum::{
    extract::{Request, State},
    http::header::COOKIE,
    middleware::Next,
    response::Response,
};

use crate::auth::identity::SessionUser;
use crate::errors::AppError;
use crate::state::AppState;

const AUTH_REQUIRED: &str = "Authentication required";

/// Gate for admin routes. A valid session cookie puts a [`SessionUser`] into
/// the request extensions; anything else is a 401.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let cookie = request
        .headers()
        .get(COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|header| state.sessions.read_cookie(header))
        .ok_or_else(|| AppError::Unauthorized(AUTH_REQUIRED.to_string()))?;

    let uid = state.sessions.verify(cookie).map_err(|e| {
        tracing::debug!("Session rejected: {e}");
        AppError::Unauthorized(AUTH_REQUIRED.to_string())
    })?;

    request.extensions_mut().insert(SessionUser::from_uid(uid));
    Ok(next.run(request).await)
}
