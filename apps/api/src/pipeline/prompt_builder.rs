//! Prompt Builder: renders the draft-generation instruction for one submission.

use serde::Serialize;

use crate::errors::AppError;
use crate::pipeline::catalog::ProjectSummary;
use crate::pipeline::input::SubmissionInput;
use crate::pipeline::prompts::APPLICATION_PROMPT_TEMPLATE;

/// The rendered prompt plus the identity fields carried to later steps.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptRecord {
    pub prompt: String,
    pub company_name: String,
    pub role_title: String,
}

/// Fills the application template with the submission and the project catalog.
///
/// The catalog is serialised as two-space indented JSON.
pub fn build_prompt(
    input: &SubmissionInput,
    catalog: &[ProjectSummary],
) -> Result<PromptRecord, AppError> {
    let projects_json = serde_json::to_string_pretty(catalog)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize catalog: {e}")))?;

    let prompt = render_template(
        APPLICATION_PROMPT_TEMPLATE,
        &[
            ("job_description", input.job_description.as_str()),
            ("projects_json", projects_json.as_str()),
            ("company_name", input.company_name.as_str()),
            ("role_title", input.role_title.as_str()),
        ],
    );

    Ok(PromptRecord {
        prompt,
        company_name: input.company_name.clone(),
        role_title: input.role_title.clone(),
    })
}

/// Single-pass `{name}` substitution. Substituted values are never rescanned,
/// so placeholder-looking text inside user input is kept verbatim.
fn render_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];

        let hit = vars.iter().find_map(|(name, value)| {
            let placeholder_len = name.len() + 2;
            let matches = tail.len() >= placeholder_len
                && tail[1..].starts_with(name)
                && tail[1 + name.len()..].starts_with('}');
            matches.then_some((placeholder_len, *value))
        });

        match hit {
            Some((len, value)) => {
                out.push_str(value);
                rest = &tail[len..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission() -> SubmissionInput {
        SubmissionInput {
            job_description: "We need someone to automate onboarding workflows.".to_string(),
            company_name: "Acme Corp".to_string(),
            role_title: "Automation Lead".to_string(),
        }
    }

    #[test]
    fn test_embeds_literal_inputs() {
        let record = build_prompt(&submission(), &ProjectSummary::default_catalog()).unwrap();
        assert!(record
            .prompt
            .contains("We need someone to automate onboarding workflows."));
        assert!(record.prompt.contains("Company: Acme Corp"));
        assert!(record.prompt.contains("Role: Automation Lead"));
        assert_eq!(record.company_name, "Acme Corp");
        assert_eq!(record.role_title, "Automation Lead");
    }

    #[test]
    fn test_embeds_every_catalog_entry_as_pretty_json() {
        let catalog = ProjectSummary::default_catalog();
        let record = build_prompt(&submission(), &catalog).unwrap();

        for project in &catalog {
            assert!(record.prompt.contains(&format!("\"id\": \"{}\"", project.id)));
            assert!(record.prompt.contains(&project.key_metric));
        }
        assert!(record.prompt.contains("\n  {\n    \"id\": \"P-01\","));
    }

    #[test]
    fn test_uses_injected_catalog() {
        let catalog = vec![ProjectSummary {
            id: "X-42".to_string(),
            name: "Custom".to_string(),
            focus: "Testing".to_string(),
            key_metric: "found every bug".to_string(),
        }];
        let record = build_prompt(&submission(), &catalog).unwrap();
        assert!(record.prompt.contains("X-42"));
        assert!(!record.prompt.contains("\"id\": \"P-01\""));
    }

    #[test]
    fn test_no_placeholders_survive() {
        let record = build_prompt(&submission(), &ProjectSummary::default_catalog()).unwrap();
        for placeholder in [
            "{job_description}",
            "{projects_json}",
            "{company_name}",
            "{role_title}",
        ] {
            assert!(!record.prompt.contains(placeholder));
        }
    }

    #[test]
    fn test_forbids_fences_and_lists_categories() {
        let record = build_prompt(&submission(), &ProjectSummary::default_catalog()).unwrap();
        assert!(record.prompt.contains("Do not include markdown code fences"));
        for category in ["cx-design", "automation", "technical", "general"] {
            assert!(record.prompt.contains(&format!("\"{category}\"")));
        }
    }

    #[test]
    fn test_placeholder_text_in_user_input_is_left_alone() {
        let mut input = submission();
        input.job_description = "Literal {company_name} in the posting".to_string();
        input.company_name = "{role_title} Inc".to_string();
        let record = build_prompt(&input, &ProjectSummary::default_catalog()).unwrap();
        assert!(record.prompt.contains("Literal {company_name} in the posting"));
        assert!(record.prompt.contains("Company: {role_title} Inc"));
    }

    #[test]
    fn test_render_template_keeps_unknown_braces() {
        let out = render_template("{ \"a\": {x} } {y", &[("x", "1")]);
        assert_eq!(out, "{ \"a\": 1 } {y");
    }
}
