// Application draft pipeline.
// Implements: input validation, slug generation, prompt building, response
// parsing, project reference mapping, and the orchestration of those steps.
// All generation calls go through llm_client; no direct Gemini calls here.

pub mod catalog;
pub mod handlers;
pub mod input;
pub mod orchestrator;
pub mod prompt_builder;
pub mod prompts;
pub mod references;
pub mod response_parser;
pub mod slug;
