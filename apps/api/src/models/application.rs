use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{new_key, SanityReference};
use crate::pipeline::input::ValidatedSubmission;
use crate::pipeline::references::ProjectReference;
use crate::pipeline::response_parser::{AlignmentPoint, ParseOutcome, ResearchContext};

/// Review lifecycle of an application document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ApplicationStatus {
    #[default]
    Draft,
    AiGenerated,
    InReview,
    Ready,
    Published,
    Archived,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Draft => "draft",
            ApplicationStatus::AiGenerated => "ai-generated",
            ApplicationStatus::InReview => "in-review",
            ApplicationStatus::Ready => "ready",
            ApplicationStatus::Published => "published",
            ApplicationStatus::Archived => "archived",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlugField {
    #[serde(rename = "_type")]
    pub field_type: String,
    pub current: String,
}

impl SlugField {
    pub fn new(current: &str) -> Self {
        Self {
            field_type: "slug".to_string(),
            current: current.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignmentPointItem {
    #[serde(rename = "_key")]
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl From<&AlignmentPoint> for AlignmentPointItem {
    fn from(point: &AlignmentPoint) -> Self {
        Self {
            key: new_key(),
            category: point.category.clone(),
            content: point.content.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProofPointItem {
    #[serde(rename = "_key")]
    pub key: String,
    pub claim: String,
}

/// Research context in the CMS field layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchContextFields {
    pub company_pain_points: Vec<String>,
    pub role_keywords: Vec<String>,
    pub proof_points: Vec<ProofPointItem>,
}

impl From<&ResearchContext> for ResearchContextFields {
    fn from(research: &ResearchContext) -> Self {
        Self {
            company_pain_points: research.pain_points.clone(),
            role_keywords: research.keywords.clone(),
            proof_points: research
                .proof_points
                .iter()
                .map(|claim| ProofPointItem {
                    key: new_key(),
                    claim: claim.clone(),
                })
                .collect(),
        }
    }
}

/// `jobApplication` document written by the draft pipeline.
///
/// Drafts always land with status `ai-generated`. Parser findings travel with
/// the document (`generationWarning`, `generationError`, `rawResponse`) so the
/// reviewer sees them next to the copy.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplicationDocument {
    #[serde(rename = "_type")]
    pub doc_type: String,
    pub slug: SlugField,
    pub target_company: String,
    pub target_role_title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_introduction: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub alignment_points: Vec<AlignmentPointItem>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub linked_projects: Vec<SanityReference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closing_statement: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub research_context: Option<ResearchContextFields>,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_warning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
}

impl JobApplicationDocument {
    /// Assembles the draft from the pipeline's records. Company and role fall
    /// back to the submitted values when the model left them out.
    pub fn from_generation(
        submission: &ValidatedSubmission,
        slug: &str,
        outcome: &ParseOutcome,
        references: &[ProjectReference],
    ) -> Self {
        let input = &submission.input;
        let mut doc = Self {
            doc_type: "jobApplication".to_string(),
            slug: SlugField::new(slug),
            target_company: input.company_name.clone(),
            target_role_title: input.role_title.clone(),
            custom_introduction: None,
            alignment_points: Vec::new(),
            linked_projects: references.iter().map(SanityReference::from).collect(),
            closing_statement: None,
            research_context: None,
            status: ApplicationStatus::AiGenerated,
            created_at: submission.received_at,
            generation_warning: None,
            generation_error: None,
            raw_response: None,
        };

        match outcome {
            ParseOutcome::Parsed(app) => {
                if let Some(company) = non_empty(&app.target_company) {
                    doc.target_company = company;
                }
                if let Some(role) = non_empty(&app.target_role_title) {
                    doc.target_role_title = role;
                }
                doc.custom_introduction = non_empty(&app.custom_introduction);
                doc.closing_statement = non_empty(&app.closing_statement);
                doc.alignment_points = app
                    .alignment_points
                    .iter()
                    .flatten()
                    .map(AlignmentPointItem::from)
                    .collect();
                doc.research_context = app.research_context.as_ref().map(ResearchContextFields::from);
                doc.generation_warning = app.warning.clone();
                doc.generation_error = app.error.clone();
            }
            ParseOutcome::Malformed(malformed) => {
                doc.generation_error = Some(malformed.error.clone());
                doc.raw_response = Some(malformed.raw.clone());
            }
        }

        doc
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|s| !s.trim().is_empty()).cloned()
}

// ────────────────────────────────────────────────────────────────────────────
// Read models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicAlignmentPoint {
    pub category: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedProjectView {
    pub project_id: Option<String>,
    pub name: Option<String>,
    pub focus: Option<String>,
    pub key_metric: Option<String>,
}

/// An application as served to the public page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicApplication {
    pub slug: String,
    pub target_company: Option<String>,
    pub target_role_title: Option<String>,
    pub custom_introduction: Option<String>,
    pub alignment_points: Vec<PublicAlignmentPoint>,
    pub closing_statement: Option<String>,
    pub linked_projects: Vec<LinkedProjectView>,
}
