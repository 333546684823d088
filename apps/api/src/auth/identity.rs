//! ID-token verification against the Identity Toolkit REST API.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::debug;

const LOOKUP_URL: &str = "https://identitytoolkit.googleapis.com/v1/accounts:lookup";

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider looked at the token and said no.
    #[error("ID token rejected: {0}")]
    Rejected(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// The signed-in admin, as carried through request extensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub uid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl SessionUser {
    pub fn from_uid(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            email: None,
            name: None,
        }
    }
}

/// Turns a client-side ID token into a verified user.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn verify_id_token(&self, id_token: &str) -> Result<SessionUser, IdentityError>;
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
    local_id: String,
    email: Option<String>,
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LookupError {
    error: LookupErrorBody,
}

#[derive(Debug, Deserialize)]
struct LookupErrorBody {
    message: String,
}

#[derive(Clone)]
pub struct FirebaseIdentity {
    client: Client,
    api_key: String,
}

impl FirebaseIdentity {
    pub fn new(api_key: String) -> Result<Self, IdentityError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(15))
                .build()?,
            api_key,
        })
    }
}

#[async_trait]
impl IdentityProvider for FirebaseIdentity {
    async fn verify_id_token(&self, id_token: &str) -> Result<SessionUser, IdentityError> {
        let response = self
            .client
            .post(LOOKUP_URL)
            .query(&[("key", self.api_key.as_str())])
            .json(&json!({ "idToken": id_token }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<LookupError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            // 400 is how the API reports invalid or expired tokens.
            if status.as_u16() == 400 {
                return Err(IdentityError::Rejected(message));
            }
            return Err(IdentityError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let lookup: LookupResponse = response.json().await?;
        user_from_lookup(lookup)
    }
}

fn user_from_lookup(lookup: LookupResponse) -> Result<SessionUser, IdentityError> {
    let user = lookup
        .users
        .into_iter()
        .next()
        .ok_or_else(|| IdentityError::Rejected("USER_NOT_FOUND".to_string()))?;

    debug!("ID token verified for {}", user.local_id);
    Ok(SessionUser {
        uid: user.local_id,
        email: user.email,
        name: user.display_name,
    })
}
