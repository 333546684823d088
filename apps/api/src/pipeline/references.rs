use serde::{Deserialize, Serialize};

use crate::pipeline::response_parser::ParseOutcome;

/// Most projects a single application may link.
pub const MAX_LINKED_PROJECTS: usize = 3;

/// Pointer to a project document by id. Whether the id exists is the CMS's
/// problem, not ours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectReference {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "ref")]
    pub reference: String,
}

impl ProjectReference {
    pub fn to(id: impl Into<String>) -> Self {
        Self {
            kind: "reference".to_string(),
            reference: id.into(),
        }
    }
}

/// Maps the first [`MAX_LINKED_PROJECTS`] linked project ids to references.
/// Extra ids are dropped silently; a malformed response links nothing.
pub fn map_project_references(outcome: &ParseOutcome) -> Vec<ProjectReference> {
    outcome
        .parsed()
        .map(|app| {
            app.linked_project_ids
                .iter()
                .take(MAX_LINKED_PROJECTS)
                .map(ProjectReference::to)
                .collect()
        })
        .unwrap_or_default()
}
