use axum::{
    extract::{Query, State},
    response::Redirect,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PreviewParams {
    pub secret: Option<String>,
    pub slug: Option<String>,
}

/// GET /api/v1/preview?secret=...&slug=/path
///
/// Entry point for CMS editor previews. Redirects to the requested path once
/// the shared secret checks out.
pub async fn handle_preview(
    State(state): State<AppState>,
    Query(params): Query<PreviewParams>,
) -> Result<Redirect, AppError> {
    let authorised = matches!(
        (&state.config.preview_secret, &params.secret),
        (Some(expected), Some(given)) if expected == given
    );
    if !authorised {
        return Err(AppError::Unauthorized("Invalid preview secret".to_string()));
    }

    Ok(Redirect::temporary(&preview_target(params.slug.as_deref())))
}

/// Same-origin path for the redirect. Leading slashes and backslashes are
/// collapsed to one `/` so `//host` cannot become a protocol-relative URL.
fn preview_target(slug: Option<&str>) -> String {
    let path = slug.unwrap_or_default().trim_start_matches(['/', '\\']);
    format!("/{path}")
}
