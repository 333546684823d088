//! Draft pipeline: orchestrates one job-application submission end to end.
//!
//! Flow: validate_input → slug → build_prompt → generate → parse_response →
//!       map_project_references → CMS draft document → persist → response.
//!
//! Strictly linear: no step is retried and nothing is shared between calls.
//! Only a missing input field or a failing collaborator stops the run; a bad
//! model response still yields a draft, annotated for review.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::TextGenerator;
use crate::models::application::{ApplicationStatus, JobApplicationDocument};
use crate::pipeline::catalog::ProjectSummary;
use crate::pipeline::input::validate_input;
use crate::pipeline::prompt_builder::build_prompt;
use crate::pipeline::references::map_project_references;
use crate::pipeline::response_parser::{parse_response, ParseOutcome};
use crate::pipeline::slug::slug_or_fallback;

pub const SUCCESS_MESSAGE: &str = "Application draft created successfully";

/// Where finished drafts are written. `CmsClient` in production.
#[async_trait]
pub trait DraftStore: Send + Sync {
    /// Persists the document and returns its id.
    async fn create_application(&self, document: &JobApplicationDocument) -> Result<String, AppError>;
}

/// Response returned to whoever submitted the job posting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DraftCreated {
    pub success: bool,
    pub slug: String,
    pub message: String,
    pub status: String,
}

/// Runs the full draft pipeline for one submission payload.
pub async fn generate_application_draft(
    payload: &Map<String, Value>,
    catalog: &[ProjectSummary],
    generator: &dyn TextGenerator,
    store: &dyn DraftStore,
) -> Result<DraftCreated, AppError> {
    // Step 1: Validate
    let submission = validate_input(payload)?;
    info!(
        "Draft requested for {} / {}",
        submission.input.company_name, submission.input.role_title
    );

    // Step 2: Slug
    let slug = slug_or_fallback(&submission.input.company_name, &submission.input.role_title);

    // Step 3: Prompt
    let prompt = build_prompt(&submission.input, catalog)?;

    // Step 4: Generate
    let raw = generator.generate(&prompt.prompt, JSON_ONLY_SYSTEM).await?;

    // Step 5: Parse and validate
    let envelope = parse_response(&raw);
    if let ParseOutcome::Malformed(_) = envelope.application {
        warn!("Draft {} stored with unparseable model output", slug);
    } else if let Some(error) = envelope.application.parsed().and_then(|app| app.error.as_deref()) {
        warn!("Draft {} stored with model-reported error: {}", slug, error);
    } else if let Some(warning) = envelope.application.warning() {
        warn!("Draft {} needs review: {}", slug, warning);
    }

    // Step 6: Project references
    let references = map_project_references(&envelope.application);

    // Step 7: Persist
    let document =
        JobApplicationDocument::from_generation(&submission, &slug, &envelope.application, &references);
    let document_id = store.create_application(&document).await?;

    info!(
        "Created application draft {} (slug {}, {} linked projects)",
        document_id,
        slug,
        references.len()
    );

    Ok(DraftCreated {
        success: true,
        slug,
        message: SUCCESS_MESSAGE.to_string(),
        status: ApplicationStatus::AiGenerated.as_str().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::LlmError;
    use crate::pipeline::response_parser::RawModelResponse;
    use serde_json::json;
    use std::sync::Mutex;

    struct FakeGenerator {
        reply: Option<String>,
        prompts: Mutex<Vec<String>>,
    }

    impl FakeGenerator {
        fn replying(text: &str) -> Self {
            Self {
                reply: Some(text.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                reply: None,
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl TextGenerator for FakeGenerator {
        async fn generate(&self, prompt: &str, _system: &str) -> Result<RawModelResponse, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match &self.reply {
                Some(text) => Ok(RawModelResponse::from_text(text.clone())),
                None => Err(LlmError::EmptyContent),
            }
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        documents: Mutex<Vec<JobApplicationDocument>>,
    }

    #[async_trait]
    impl DraftStore for MemoryStore {
        async fn create_application(&self, document: &JobApplicationDocument) -> Result<String, AppError> {
            let mut docs = self.documents.lock().unwrap();
            docs.push(document.clone());
            Ok(format!("doc-{}", docs.len()))
        }
    }

    fn payload(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn acme_payload() -> Map<String, Value> {
        payload(json!({
            "jobDescription": "Own our automation roadmap.",
            "companyName": "Acme Corp",
            "roleTitle": "Automation Lead"
        }))
    }

    const GOOD_REPLY: &str = r#"```json
{
  "targetCompany": "Acme Corp",
  "targetRoleTitle": "Automation Lead",
  "customIntroduction": "I remove busywork for a living.",
  "alignmentPoints": [{"category": "automation", "content": "Built Ops Autopilot."}],
  "closingStatement": "Let's talk.",
  "linkedProjectIds": ["P-03", "P-04", "P-01", "P-02"]
}
```"#;

    #[tokio::test]
    async fn test_happy_path_returns_success_and_persists_draft() {
        let generator = FakeGenerator::replying(GOOD_REPLY);
        let store = MemoryStore::default();

        let result = generate_application_draft(
            &acme_payload(),
            &ProjectSummary::default_catalog(),
            &generator,
            &store,
        )
        .await
        .unwrap();

        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "success": true,
                "slug": "acme-corp-automation-lead",
                "message": "Application draft created successfully",
                "status": "ai-generated"
            })
        );

        let docs = store.documents.lock().unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].slug.current, "acme-corp-automation-lead");
        let refs: Vec<&str> = docs[0]
            .linked_projects
            .iter()
            .map(|r| r.reference.as_str())
            .collect();
        assert_eq!(refs, vec!["P-03", "P-04", "P-01"]);
        assert!(docs[0].generation_warning.is_none());
    }

    #[tokio::test]
    async fn test_prompt_embeds_submission_and_catalog() {
        let generator = FakeGenerator::replying(GOOD_REPLY);
        let store = MemoryStore::default();

        generate_application_draft(
            &acme_payload(),
            &ProjectSummary::default_catalog(),
            &generator,
            &store,
        )
        .await
        .unwrap();

        let prompts = generator.prompts.lock().unwrap();
        assert!(prompts[0].contains("Own our automation roadmap."));
        assert!(prompts[0].contains("Knowledge Transfer Engine"));
    }

    #[tokio::test]
    async fn test_missing_field_halts_before_generation() {
        let generator = FakeGenerator::replying(GOOD_REPLY);
        let store = MemoryStore::default();
        let bad = payload(json!({"companyName": "", "roleTitle": "x", "jobDescription": "y"}));

        let err = generate_application_draft(&bad, &[], &generator, &store)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(generator.calls(), 0);
        assert!(store.documents.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unparseable_reply_still_creates_annotated_draft() {
        let generator = FakeGenerator::replying("I cannot help with that");
        let store = MemoryStore::default();

        let result = generate_application_draft(&acme_payload(), &[], &generator, &store)
            .await
            .unwrap();
        assert!(result.success);

        let docs = store.documents.lock().unwrap();
        assert_eq!(docs[0].target_company, "Acme Corp");
        assert_eq!(docs[0].raw_response.as_deref(), Some("I cannot help with that"));
        assert_eq!(docs[0].generation_error.as_deref(), Some("Failed to parse JSON"));
        assert!(docs[0].linked_projects.is_empty());
    }

    #[tokio::test]
    async fn test_model_refusal_is_stored_with_its_error() {
        let generator = FakeGenerator::replying(r#"{"error": "Content policy: cannot draft this application"}"#);
        let store = MemoryStore::default();

        let result = generate_application_draft(&acme_payload(), &[], &generator, &store)
            .await
            .unwrap();
        assert!(result.success);

        let docs = store.documents.lock().unwrap();
        assert_eq!(
            docs[0].generation_error.as_deref(),
            Some("Content policy: cannot draft this application")
        );
        assert!(docs[0].generation_warning.is_none());
    }

    #[tokio::test]
    async fn test_generator_failure_propagates_and_nothing_is_stored() {
        let generator = FakeGenerator::failing();
        let store = MemoryStore::default();

        let err = generate_application_draft(&acme_payload(), &[], &generator, &store)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Llm(_)));
        assert!(store.documents.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_symbol_only_names_get_fallback_slug() {
        let generator = FakeGenerator::replying(GOOD_REPLY);
        let store = MemoryStore::default();
        let odd = payload(json!({"companyName": "???", "roleTitle": "!!!", "jobDescription": "y"}));

        let result = generate_application_draft(&odd, &[], &generator, &store)
            .await
            .unwrap();
        assert!(result.slug.starts_with("application-"));
    }
}
