// Cross-cutting prompt types and fragments.
// Feature prompts live next to the feature (see interview/prompts.rs).

/// A system/user prompt pair ready to send to the completion API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

/// Appended to conversational system prompts so replies render cleanly in the chat UI.
pub const MARKDOWN_INSTRUCTION: &str =
    "Format your response using markdown with clear sections when appropriate.";
