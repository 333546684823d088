//! Axum route handlers for the draft pipeline.

use axum::{extract::State, Extension, Json};
use serde_json::{Map, Value};
use tracing::info;

use crate::auth::identity::SessionUser;
use crate::errors::AppError;
use crate::pipeline::catalog::{CatalogSource, ProjectSummary};
use crate::pipeline::orchestrator::{generate_application_draft, DraftCreated};
use crate::state::AppState;

/// POST /api/v1/applications/generate
///
/// Body: `{ jobDescription, companyName, roleTitle }`. Runs the whole draft
/// pipeline and writes the result to the CMS as an `ai-generated` draft.
pub async fn handle_generate(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Json(body): Json<Value>,
) -> Result<Json<DraftCreated>, AppError> {
    info!("Draft generation requested by {}", user.uid);

    let payload = match body {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    let catalog = load_catalog(&state).await?;

    let created = generate_application_draft(&payload, &catalog, &state.llm, &state.cms).await?;
    Ok(Json(created))
}

async fn load_catalog(state: &AppState) -> Result<Vec<ProjectSummary>, AppError> {
    match state.config.catalog_source {
        CatalogSource::Static => Ok(ProjectSummary::default_catalog()),
        CatalogSource::Cms => Ok(state.cms.project_catalog().await?),
    }
}
