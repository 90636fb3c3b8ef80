// Interview preparation: job analysis, briefing generation, mock-interview chat.
// All LLM calls go through llm_client; no direct HTTP calls here.

pub mod assembler;
pub mod handlers;
pub mod prompts;
