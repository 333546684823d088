//! Response Parser: turns untrusted model output into an annotated application.
//!
//! This step never fails. Output that cannot be read as a JSON object becomes
//! [`ParseOutcome::Malformed`] carrying the raw text; output that can be read is
//! checked for required fields and alignment-point structure, and every problem
//! is recorded on the result instead of rejecting it. A human reviews the draft
//! later either way.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Error text attached to output that could not be parsed.
pub const PARSE_FAILURE_MESSAGE: &str = "Failed to parse JSON";

/// Top-level keys every generated application must carry.
pub const REQUIRED_FIELDS: [&str; 5] = [
    "targetCompany",
    "targetRoleTitle",
    "customIntroduction",
    "alignmentPoints",
    "closingStatement",
];

/// First ```json fence in the text, case-insensitive, body trimmed.
static JSON_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)```json\s*(.*?)\s*```").expect("fence pattern is valid"));

// ────────────────────────────────────────────────────────────────────────────
// Input
// ────────────────────────────────────────────────────────────────────────────

/// Whatever the text-generation step handed back. The shape is not ours to
/// control: the text may sit under `body`, under `text`, or nowhere.
#[derive(Debug, Clone, PartialEq)]
pub struct RawModelResponse(Value);

impl RawModelResponse {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Wraps plain generated text as `{ "text": ... }`.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self(Value::Object(Map::from_iter([(
            "text".to_string(),
            Value::String(text.into()),
        )])))
    }

    /// Resolves the text to parse: a truthy `body`, else a truthy `text`, else
    /// the whole payload serialised. A bare JSON string is used as-is.
    pub fn text(&self) -> String {
        match &self.0 {
            Value::String(s) => s.clone(),
            Value::Object(map) => ["body", "text"]
                .iter()
                .find_map(|key| map.get(*key).filter(|v| is_truthy(v)))
                .map(value_as_text)
                .unwrap_or_else(|| self.0.to_string()),
            other => other.to_string(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Output
// ────────────────────────────────────────────────────────────────────────────

/// The fixed set of alignment-point categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlignmentCategory {
    CxDesign,
    Automation,
    Technical,
    General,
}

impl AlignmentCategory {
    pub const ALL: [AlignmentCategory; 4] = [
        AlignmentCategory::CxDesign,
        AlignmentCategory::Automation,
        AlignmentCategory::Technical,
        AlignmentCategory::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AlignmentCategory::CxDesign => "cx-design",
            AlignmentCategory::Automation => "automation",
            AlignmentCategory::Technical => "technical",
            AlignmentCategory::General => "general",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == value)
    }
}

/// One alignment claim as the model produced it. Invalid entries are kept so
/// the reviewer sees exactly what came back.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AlignmentPoint {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl AlignmentPoint {
    fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(map) => Self {
                category: string_field(map, "category"),
                content: string_field(map, "content"),
            },
            _ => Self::default(),
        }
    }

    /// Valid when the category is one of [`AlignmentCategory::ALL`] and the
    /// content is non-empty.
    pub fn is_valid(&self) -> bool {
        let category_ok = self
            .category
            .as_deref()
            .and_then(AlignmentCategory::parse)
            .is_some();
        let content_ok = self.content.as_deref().is_some_and(|c| !c.is_empty());
        category_ok && content_ok
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchContext {
    pub pain_points: Vec<String>,
    pub keywords: Vec<String>,
    pub proof_points: Vec<String>,
}

impl ResearchContext {
    fn from_value(value: &Value) -> Option<Self> {
        let map = value.as_object()?;
        Some(Self {
            pain_points: string_list(map, "painPoints"),
            keywords: string_list(map, "keywords"),
            proof_points: string_list(map, "proofPoints"),
        })
    }
}

/// A structural problem found in a parsed application.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum Violation {
    MissingFields { fields: Vec<String> },
    InvalidAlignmentPoints { indices: Vec<usize> },
}

impl Violation {
    pub fn message(&self) -> String {
        match self {
            Violation::MissingFields { fields } => format!("Missing fields: {}", fields.join(", ")),
            Violation::InvalidAlignmentPoints { .. } => {
                "Invalid alignmentPoints structure".to_string()
            }
        }
    }
}

/// A model response that parsed as a JSON object.
///
/// Fields are extracted one by one; a field of the wrong JSON type reads as
/// absent. `violations` holds the structured findings and `warning` the same
/// findings as one human-readable line.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedApplication {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_role_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_introduction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignment_points: Option<Vec<AlignmentPoint>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closing_statement: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub linked_project_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub research_context: Option<ResearchContext>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<Violation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    /// Error the model reported in its own output. Validation is skipped when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ParsedApplication {
    fn from_object(map: &Map<String, Value>) -> Self {
        let alignment_points = match map.get("alignmentPoints") {
            Some(Value::Array(entries)) => {
                Some(entries.iter().map(AlignmentPoint::from_value).collect::<Vec<_>>())
            }
            _ => None,
        };

        let error = map.get("error").filter(|v| is_truthy(v)).map(value_as_text);
        let violations = if error.is_some() {
            Vec::new()
        } else {
            find_violations(map, alignment_points.as_deref())
        };
        let warning = if violations.is_empty() {
            None
        } else {
            Some(
                violations
                    .iter()
                    .map(Violation::message)
                    .collect::<Vec<_>>()
                    .join(" "),
            )
        };

        Self {
            target_company: string_field(map, "targetCompany"),
            target_role_title: string_field(map, "targetRoleTitle"),
            custom_introduction: string_field(map, "customIntroduction"),
            alignment_points,
            closing_statement: string_field(map, "closingStatement"),
            linked_project_ids: string_list(map, "linkedProjectIds"),
            research_context: map.get("researchContext").and_then(ResearchContext::from_value),
            violations,
            warning,
            error,
        }
    }
}

/// Model output that could not be read as a JSON object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MalformedResponse {
    pub raw: String,
    pub error: String,
}

/// Result of reading one model response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParseOutcome {
    Parsed(ParsedApplication),
    Malformed(MalformedResponse),
}

impl ParseOutcome {
    pub fn parsed(&self) -> Option<&ParsedApplication> {
        match self {
            ParseOutcome::Parsed(app) => Some(app),
            ParseOutcome::Malformed(_) => None,
        }
    }

    pub fn warning(&self) -> Option<&str> {
        self.parsed().and_then(|app| app.warning.as_deref())
    }
}

/// Wire shape of this step: always `{ "application": ... }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationEnvelope {
    pub application: ParseOutcome,
}

// ────────────────────────────────────────────────────────────────────────────
// Parsing
// ────────────────────────────────────────────────────────────────────────────

/// Extracts and validates the application JSON from a model response.
///
/// Extraction order, first success wins:
/// 1. the body of the first ```json fence
/// 2. the whole text
///
/// When both fail the result is `Malformed` with the original text.
pub fn parse_response(response: &RawModelResponse) -> ApplicationEnvelope {
    let text = response.text();

    let application = match extract_object(&text) {
        Some(map) => {
            let parsed = ParsedApplication::from_object(&map);
            if let Some(error) = &parsed.error {
                warn!("Generated output reports an error; skipping validation: {error}");
            }
            for violation in &parsed.violations {
                warn!("Generated application failed validation: {}", violation.message());
            }
            ParseOutcome::Parsed(parsed)
        }
        None => ParseOutcome::Malformed(MalformedResponse {
            raw: text,
            error: PARSE_FAILURE_MESSAGE.to_string(),
        }),
    };

    ApplicationEnvelope { application }
}

fn extract_object(text: &str) -> Option<Map<String, Value>> {
    if let Some(captures) = JSON_FENCE.captures(text) {
        match serde_json::from_str::<Map<String, Value>>(&captures[1]) {
            Ok(map) => {
                debug!("Parsed application JSON from code fence");
                return Some(map);
            }
            Err(e) => warn!("Failed to parse JSON from code fence: {e}"),
        }
    }

    match serde_json::from_str::<Map<String, Value>>(text) {
        Ok(map) => Some(map),
        Err(e) => {
            warn!("Failed to parse response as JSON: {e}");
            None
        }
    }
}

fn find_violations(
    map: &Map<String, Value>,
    alignment_points: Option<&[AlignmentPoint]>,
) -> Vec<Violation> {
    let mut violations = Vec::new();

    let missing: Vec<String> = REQUIRED_FIELDS
        .iter()
        .filter(|field| !map.get(**field).is_some_and(is_truthy))
        .map(|field| field.to_string())
        .collect();
    if !missing.is_empty() {
        violations.push(Violation::MissingFields { fields: missing });
    }

    if let Some(points) = alignment_points {
        let invalid: Vec<usize> = points
            .iter()
            .enumerate()
            .filter(|(_, point)| !point.is_valid())
            .map(|(i, _)| i)
            .collect();
        if !invalid.is_empty() {
            violations.push(Violation::InvalidAlignmentPoints { indices: invalid });
        }
    }

    violations
}

/// Presence test used for required fields: `null`, `false`, `0` and `""`
/// count as absent; empty arrays and objects count as present.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn value_as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn string_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key).and_then(Value::as_str).map(str::to_string)
}

/// String entries of an array field; other entries are skipped.
fn string_list(map: &Map<String, Value>, key: &str) -> Vec<String> {
    map.get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
