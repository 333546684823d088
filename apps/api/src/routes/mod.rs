pub mod health;
pub mod preview;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};

use crate::auth::handlers as auth_handlers;
use crate::auth::middleware::require_session;
use crate::cms::handlers as cms_handlers;
use crate::pipeline::handlers as pipeline_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    // Admin routes: session cookie required
    let admin = Router::new()
        .route(
            "/api/v1/applications/generate",
            post(pipeline_handlers::handle_generate),
        )
        .route("/api/v1/projects", post(cms_handlers::handle_create_project))
        .route("/api/v1/auth/me", get(auth_handlers::handle_me))
        .route_layer(from_fn_with_state(state.clone(), require_session));

    Router::new()
        .route("/health", get(health::health_handler))
        // Public application pages
        .route(
            "/api/v1/applications",
            get(cms_handlers::handle_list_applications),
        )
        .route(
            "/api/v1/applications/:slug",
            get(cms_handlers::handle_get_application),
        )
        // Sessions
        .route(
            "/api/v1/auth/session",
            post(auth_handlers::handle_login).delete(auth_handlers::handle_logout),
        )
        .route("/api/v1/preview", get(preview::handle_preview))
        .merge(admin)
        .with_state(state)
}
