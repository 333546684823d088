//! Axum route handlers for CMS-backed content: projects and public applications.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::models::application::PublicApplication;
use crate::models::project::{CreateProjectResponse, ProjectDocument, ProjectInput};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ApplicationSlugsResponse {
    pub slugs: Vec<String>,
}

/// POST /api/v1/projects
pub async fn handle_create_project(
    State(state): State<AppState>,
    Json(input): Json<ProjectInput>,
) -> Result<Json<CreateProjectResponse>, AppError> {
    let document = ProjectDocument::try_from(input)?;
    let document_id = state.cms.create_project(&document).await?;

    Ok(Json(CreateProjectResponse {
        success: true,
        project_id: document.project_id,
        document_id,
    }))
}

/// GET /api/v1/applications
pub async fn handle_list_applications(
    State(state): State<AppState>,
) -> Result<Json<ApplicationSlugsResponse>, AppError> {
    let slugs = state.cms.application_slugs().await?;
    Ok(Json(ApplicationSlugsResponse { slugs }))
}

/// GET /api/v1/applications/:slug
pub async fn handle_get_application(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<PublicApplication>, AppError> {
    state
        .cms
        .application_by_slug(&slug)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No application found for \"{slug}\"")))
}
