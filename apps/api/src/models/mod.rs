pub mod application;
pub mod project;

use serde::Serialize;
use uuid::Uuid;

use crate::pipeline::references::ProjectReference;

/// Reference to another CMS document, as stored inside an array field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SanityReference {
    #[serde(rename = "_type")]
    pub ref_type: String,
    #[serde(rename = "_ref")]
    pub reference: String,
    #[serde(rename = "_key")]
    pub key: String,
}

impl From<&ProjectReference> for SanityReference {
    fn from(reference: &ProjectReference) -> Self {
        Self {
            ref_type: reference.kind.clone(),
            reference: reference.reference.clone(),
            key: new_key(),
        }
    }
}

/// Array items in the CMS need a `_key` unique within the array.
pub(crate) fn new_key() -> String {
    let id = Uuid::new_v4().simple().to_string();
    id[..12].to_string()
}
