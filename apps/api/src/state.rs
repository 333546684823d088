use std::sync::Arc;

use crate::auth::identity::IdentityProvider;
use crate::auth::session::SessionSigner;
use crate::cms::CmsClient;
use crate::config::Config;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub llm: LlmClient,
    pub cms: CmsClient,
    /// Pluggable ID-token verifier. Default: FirebaseIdentity.
    pub identity: Arc<dyn IdentityProvider>,
    pub sessions: SessionSigner,
    pub config: Config,
}
