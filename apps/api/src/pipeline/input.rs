//! Input validation: the first gate of the draft pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Raised when any of the three required submission fields is absent or empty.
/// Carries no detail on which field failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Missing required field: jobDescription, companyName, or roleTitle")]
pub struct MissingFieldError;

/// The three free-text fields a job-application submission must carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionInput {
    pub job_description: String,
    pub company_name: String,
    pub role_title: String,
}

/// A submission that passed validation, stamped with the time it was accepted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedSubmission {
    #[serde(flatten)]
    pub input: SubmissionInput,
    pub received_at: DateTime<Utc>,
}

/// Validates an arbitrary JSON record. Extra keys are ignored.
///
/// Each required field must be a non-empty string. Absent keys, `null`, numbers,
/// booleans and empty strings are all rejected.
pub fn validate_input(payload: &Map<String, Value>) -> Result<ValidatedSubmission, MissingFieldError> {
    let job_description = required_text(payload, "jobDescription")?;
    let company_name = required_text(payload, "companyName")?;
    let role_title = required_text(payload, "roleTitle")?;

    Ok(ValidatedSubmission {
        input: SubmissionInput {
            job_description,
            company_name,
            role_title,
        },
        received_at: Utc::now(),
    })
}

fn required_text(payload: &Map<String, Value>, key: &str) -> Result<String, MissingFieldError> {
    match payload.get(key) {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        _ => Err(MissingFieldError),
    }
}
