use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Project form submission from the admin area.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInput {
    pub project_id: Option<String>,
    pub name: Option<String>,
    pub focus: Option<String>,
    pub key_metric: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub skills_applied: Vec<String>,
    pub organisation: Option<String>,
    pub year: Option<String>,
    pub status: Option<String>,
    pub url: Option<String>,
}

/// `project` document. Optional fields are only written when non-empty.
///
/// The document id is the project id, so application references built from
/// `linkedProjectIds` resolve without a lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDocument {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_type")]
    pub doc_type: String,
    pub project_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_metric: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub technologies: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skills_applied: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organisation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl TryFrom<ProjectInput> for ProjectDocument {
    type Error = AppError;

    fn try_from(input: ProjectInput) -> Result<Self, Self::Error> {
        let (Some(project_id), Some(name)) = (present(input.project_id), present(input.name)) else {
            return Err(AppError::Validation(
                "projectId and name are required".to_string(),
            ));
        };

        Ok(Self {
            id: project_id.clone(),
            doc_type: "project".to_string(),
            project_id,
            name,
            focus: present(input.focus),
            key_metric: present(input.key_metric),
            description: present(input.description),
            technologies: input.technologies,
            skills_applied: input.skills_applied,
            organisation: present(input.organisation),
            year: present(input.year),
            status: present(input.status),
            url: present(input.url),
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectResponse {
    pub success: bool,
    pub project_id: String,
    pub document_id: String,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_requires_project_id_and_name() {
        let input: ProjectInput = serde_json::from_value(json!({"name": "Pivot"})).unwrap();
        let err = ProjectDocument::try_from(input).unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg == "projectId and name are required"));

        let input: ProjectInput =
            serde_json::from_value(json!({"projectId": "P-01", "name": ""})).unwrap();
        assert!(ProjectDocument::try_from(input).is_err());
    }

    #[test]
    fn test_only_non_empty_optionals_are_written() {
        let input: ProjectInput = serde_json::from_value(json!({
            "projectId": "P-06",
            "name": "Ledger Sync",
            "focus": "Integrations",
            "keyMetric": "",
            "technologies": ["Rust", "Postgres"],
            "skillsApplied": []
        }))
        .unwrap();

        let doc = ProjectDocument::try_from(input).unwrap();
        let value = serde_json::to_value(&doc).unwrap();

        assert_eq!(value["_type"], "project");
        assert_eq!(value["_id"], "P-06");
        assert_eq!(value["projectId"], "P-06");
        assert_eq!(value["focus"], "Integrations");
        assert_eq!(value["technologies"], json!(["Rust", "Postgres"]));
        assert!(value.get("keyMetric").is_none());
        assert!(value.get("skillsApplied").is_none());
        assert!(value.get("url").is_none());
    }
}
