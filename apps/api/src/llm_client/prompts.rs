// Shared prompt fragments. Each feature that needs generation defines its own
// prompts.rs alongside it; this file holds the cross-cutting pieces.

/// System instruction that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant that writes \
    tailored job application copy. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";
