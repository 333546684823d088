use serde::{Deserialize, Serialize};

/// A project offered to the model as citable proof of experience.
///
/// Field order matters: it is the key order of the JSON embedded in the prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub id: String,
    pub name: String,
    pub focus: String,
    pub key_metric: String,
}

impl ProjectSummary {
    fn new(id: &str, name: &str, focus: &str, key_metric: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            focus: focus.to_string(),
            key_metric: key_metric.to_string(),
        }
    }

    /// Built-in catalog used when the CMS is not the catalog source.
    pub fn default_catalog() -> Vec<ProjectSummary> {
        vec![
            Self::new(
                "P-01",
                "Pivot Platform",
                "Product Strategy",
                "transformed near-zero returns to active re-engagement",
            ),
            Self::new(
                "P-02",
                "Future-Proof Foundation",
                "Frontend Architecture",
                "saved 6+ months development time",
            ),
            Self::new(
                "P-03",
                "Ops Autopilot",
                "Workflow Automation",
                "eliminated manual job matching process",
            ),
            Self::new(
                "P-04",
                "Knowledge Transfer Engine",
                "Documentation & Onboarding",
                "reduced onboarding from weeks to 20 minutes",
            ),
            Self::new(
                "P-05",
                "Career Stories Platform",
                "AI-assisted development",
                "accelerated 0→1 development",
            ),
        ]
    }
}

/// Where the prompt's project catalog comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CatalogSource {
    #[default]
    Static,
    Cms,
}

impl CatalogSource {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "static" => Some(Self::Static),
            "cms" => Some(Self::Cms),
            _ => None,
        }
    }
}
