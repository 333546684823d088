//! CMS client: the only module that talks to the content store's HTTP API.
//!
//! Writes go through the mutation endpoint, reads through GROQ queries.

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::models::application::{JobApplicationDocument, PublicApplication};
use crate::models::project::ProjectDocument;
use crate::pipeline::catalog::ProjectSummary;
use crate::pipeline::orchestrator::DraftStore;

pub mod handlers;
pub mod queries;

use queries::{APPLICATION_BY_SLUG_QUERY, APPLICATION_SLUGS_QUERY, PROJECT_CATALOG_QUERY};

const API_VERSION: &str = "v2024-01-01";

#[derive(Debug, Error)]
pub enum CmsError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Mutation returned no document id")]
    MissingDocumentId,
}

#[derive(Debug, Deserialize)]
struct MutationResponse {
    #[serde(default)]
    results: Vec<MutationResult>,
}

#[derive(Debug, Deserialize)]
struct MutationResult {
    id: String,
}

#[derive(Debug, Deserialize)]
struct QueryResponse<T> {
    result: T,
}

#[derive(Clone)]
pub struct CmsClient {
    client: Client,
    base_url: String,
    dataset: String,
    token: String,
}

impl CmsClient {
    pub fn new(project_id: &str, dataset: String, token: String) -> Result<Self, CmsError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()?,
            base_url: format!("https://{project_id}.api.sanity.io/{API_VERSION}/data"),
            dataset,
            token,
        })
    }

    /// Creates one document and returns its id.
    pub async fn create_document<T: Serialize + Sync>(&self, document: &T) -> Result<String, CmsError> {
        let url = format!("{}/mutate/{}", self.base_url, self.dataset);
        let body = mutation_body(document)?;

        let response = self
            .client
            .post(&url)
            .query(&[("returnIds", "true")])
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;
        let response = check_status(response).await?;

        let mutation: MutationResponse = response.json().await?;
        let id = mutation
            .results
            .into_iter()
            .next()
            .map(|r| r.id)
            .ok_or(CmsError::MissingDocumentId)?;

        debug!("CMS document created: {id}");
        Ok(id)
    }

    /// Runs a GROQ query. `params` are bound as `$name` with JSON-encoded values.
    pub async fn query<T: DeserializeOwned>(
        &self,
        groq: &str,
        params: &[(&str, Value)],
    ) -> Result<T, CmsError> {
        let url = format!("{}/query/{}", self.base_url, self.dataset);

        let response = self
            .client
            .get(&url)
            .query(&query_pairs(groq, params)?)
            .bearer_auth(&self.token)
            .send()
            .await?;
        let response = check_status(response).await?;

        let body: QueryResponse<T> = response.json().await?;
        Ok(body.result)
    }

    pub async fn create_project(&self, document: &ProjectDocument) -> Result<String, CmsError> {
        let id = self.create_document(document).await?;
        info!("Created project {} as {}", document.project_id, id);
        Ok(id)
    }

    pub async fn application_by_slug(&self, slug: &str) -> Result<Option<PublicApplication>, CmsError> {
        self.query(APPLICATION_BY_SLUG_QUERY, &[("slug", json!(slug))])
            .await
    }

    pub async fn application_slugs(&self) -> Result<Vec<String>, CmsError> {
        self.query(APPLICATION_SLUGS_QUERY, &[]).await
    }

    pub async fn project_catalog(&self) -> Result<Vec<ProjectSummary>, CmsError> {
        self.query(PROJECT_CATALOG_QUERY, &[]).await
    }
}

#[async_trait]
impl DraftStore for CmsClient {
    async fn create_application(&self, document: &JobApplicationDocument) -> Result<String, AppError> {
        Ok(self.create_document(document).await?)
    }
}

fn mutation_body<T: Serialize>(document: &T) -> Result<Value, CmsError> {
    Ok(json!({ "mutations": [{ "create": serde_json::to_value(document)? }] }))
}

fn query_pairs(groq: &str, params: &[(&str, Value)]) -> Result<Vec<(String, String)>, CmsError> {
    let mut pairs = vec![("query".to_string(), groq.to_string())];
    for (name, value) in params {
        pairs.push((format!("${name}"), serde_json::to_string(value)?));
    }
    Ok(pairs)
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, CmsError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/description")
                .or_else(|| v.pointer("/message"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or(body);

    Err(CmsError::Api {
        status: status.as_u16(),
        message,
    })
}
