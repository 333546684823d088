// Prompt constants for the application-draft pipeline.
// The system instruction sent alongside it lives in llm_client::prompts.

/// Application draft prompt template.
/// Replace: {job_description}, {projects_json}, {company_name}, {role_title}
pub const APPLICATION_PROMPT_TEMPLATE: &str = r#"You are an assistant that outputs JSON only.

Using the job description and the candidate's project portfolio below, write a tailored job application and return it as a JSON object with exactly this structure:

{
  "targetCompany": "Company name from the job posting",
  "targetRoleTitle": "Role title from the job posting",
  "customIntroduction": "2-3 short sentences introducing the candidate",
  "alignmentPoints": [
    { "category": "cx-design", "content": "One bullet on customer experience or design alignment" },
    { "category": "automation", "content": "One bullet on automation experience" },
    { "category": "technical", "content": "One bullet on technical fit" }
  ],
  "closingStatement": "One closing sentence",
  "linkedProjectIds": ["P-01"],
  "researchContext": {
    "painPoints": ["Company challenge 1", "Company challenge 2"],
    "keywords": ["keyword1", "keyword2", "keyword3"],
    "proofPoints": ["metric1", "metric2"]
  }
}

ALIGNMENT POINT CATEGORIES (use exactly these values):
- "cx-design": user experience, design thinking, product strategy
- "automation": process automation, workflow optimization, efficiency
- "technical": technical skills, tools, technologies
- "general": general fit, culture, values

LINKED PROJECTS: pick at most 3 ids from the available projects, most relevant first.

JOB DESCRIPTION:
{job_description}

AVAILABLE PROJECTS:
{projects_json}

Company: {company_name}
Role: {role_title}

Return only valid JSON. Do not include markdown code fences or explanations."#;
