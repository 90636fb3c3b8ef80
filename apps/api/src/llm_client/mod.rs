/// LLM Client: the single point of entry for all completion API calls.
///
/// ARCHITECTURAL RULE: No other module may call the completion API directly.
/// All LLM interactions MUST go through `AnalysisService`.
///
/// Speaks the OpenAI-compatible `/chat/completions` protocol. There is no retry
/// loop here: `AnalysisError::retriable` is advice for the caller.
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::ChatTurn;

pub mod prompts;

pub use prompts::Prompt;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Error codes the API uses for rate limits and exhausted billing quota.
const QUOTA_ERROR_CODES: &[&str] = &["insufficient_quota", "rate_limit_exceeded"];

/// Model and sampling parameters for one kind of call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionSettings {
    pub model: &'static str,
    pub max_tokens: u32,
    pub temperature: f32,
}

pub const JOB_ANALYSIS: CompletionSettings = CompletionSettings {
    model: "gpt-4",
    max_tokens: 1000,
    temperature: 0.7,
};

pub const INTERVIEW_PREP: CompletionSettings = CompletionSettings {
    model: "gpt-3.5-turbo",
    max_tokens: 1500,
    temperature: 0.7,
};

pub const INTERVIEW_CHAT: CompletionSettings = CompletionSettings {
    model: "gpt-3.5-turbo",
    max_tokens: 1000,
    temperature: 0.7,
};

pub const CONNECTIVITY_CHECK: CompletionSettings = CompletionSettings {
    model: "gpt-3.5-turbo",
    max_tokens: 20,
    temperature: 0.0,
};

/// Explicit client configuration, built once from `Config` at startup.
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisErrorKind {
    Configuration,
    QuotaExceeded,
    EmptyResponse,
    Unknown,
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("OpenAI API key is not configured")]
    NotConfigured,

    #[error("Completion API quota exceeded: {message}")]
    QuotaExceeded { message: String },

    #[error("No response received from the completion API")]
    EmptyResponse,

    #[error("Completion request failed: {0}")]
    Unknown(String),
}

impl AnalysisError {
    pub fn kind(&self) -> AnalysisErrorKind {
        match self {
            AnalysisError::NotConfigured => AnalysisErrorKind::Configuration,
            AnalysisError::QuotaExceeded { .. } => AnalysisErrorKind::QuotaExceeded,
            AnalysisError::EmptyResponse => AnalysisErrorKind::EmptyResponse,
            AnalysisError::Unknown(_) => AnalysisErrorKind::Unknown,
        }
    }

    /// Whether the same call may succeed later without user or operator action.
    pub fn retriable(&self) -> bool {
        matches!(self, AnalysisError::QuotaExceeded { .. })
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage<'a>],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

impl ChatCompletionResponse {
    /// Content of the first choice, if it has any non-blank text.
    fn into_text(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .filter(|text| !text.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
    #[serde(rename = "type")]
    error_type: Option<String>,
    code: Option<String>,
}

impl ApiErrorBody {
    fn is_quota(&self) -> bool {
        [self.code.as_deref(), self.error_type.as_deref()]
            .into_iter()
            .flatten()
            .any(|c| QUOTA_ERROR_CODES.contains(&c))
    }
}

/// The single completion client used by all handlers.
#[derive(Clone)]
pub struct AnalysisService {
    client: Client,
    config: CompletionConfig,
}

impl AnalysisService {
    pub fn new(config: CompletionConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn is_configured(&self) -> bool {
        self.config
            .api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }

    /// Fails fast when no API key is configured. Handlers call this before
    /// doing any other outbound work.
    pub fn ensure_configured(&self) -> Result<(), AnalysisError> {
        if self.is_configured() {
            Ok(())
        } else {
            Err(AnalysisError::NotConfigured)
        }
    }

    /// Sends a system/user prompt pair and returns the model's answer.
    pub async fn analyze(
        &self,
        prompt: &Prompt,
        settings: CompletionSettings,
    ) -> Result<String, AnalysisError> {
        let messages = [
            ChatMessage {
                role: "system",
                content: &prompt.system,
            },
            ChatMessage {
                role: "user",
                content: &prompt.user,
            },
        ];
        self.complete(&messages, settings).await
    }

    /// Continues a conversation: system prompt, prior turns in order, then the new user message.
    pub async fn converse(
        &self,
        system: &str,
        history: &[ChatTurn],
        message: &str,
        settings: CompletionSettings,
    ) -> Result<String, AnalysisError> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage {
            role: "system",
            content: system,
        });
        messages.extend(history.iter().map(|turn| ChatMessage {
            role: turn.role.as_str(),
            content: &turn.content,
        }));
        messages.push(ChatMessage {
            role: "user",
            content: message,
        });
        self.complete(&messages, settings).await
    }

    /// Minimal round trip used by the connectivity check endpoint.
    pub async fn ping(&self) -> Result<String, AnalysisError> {
        let messages = [ChatMessage {
            role: "user",
            content: "Say hello!",
        }];
        self.complete(&messages, CONNECTIVITY_CHECK).await
    }

    async fn complete(
        &self,
        messages: &[ChatMessage<'_>],
        settings: CompletionSettings,
    ) -> Result<String, AnalysisError> {
        let api_key = match self.config.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => key,
            _ => return Err(AnalysisError::NotConfigured),
        };

        let body = ChatCompletionRequest {
            model: settings.model,
            messages,
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
        };

        debug!(model = settings.model, messages = messages.len(), "Sending completion request");

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AnalysisError::Unknown(format!("transport: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(classify_failure(status, &text));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AnalysisError::Unknown(format!("undecodable response: {e}")))?;

        if let Some(usage) = &parsed.usage {
            debug!(
                "Completion succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        parsed.into_text().ok_or(AnalysisError::EmptyResponse)
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

/// Maps a non-2xx completion response to an `AnalysisError`.
fn classify_failure(status: StatusCode, body: &str) -> AnalysisError {
    let parsed = serde_json::from_str::<ApiErrorEnvelope>(body).ok();
    let message = parsed
        .as_ref()
        .map(|e| e.error.message.clone())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.to_string());

    if status == StatusCode::TOO_MANY_REQUESTS || parsed.is_some_and(|e| e.error.is_quota()) {
        warn!("Completion API returned {status}: quota or rate limit");
        return AnalysisError::QuotaExceeded { message };
    }

    warn!("Completion API returned {status}: {message}");
    AnalysisError::Unknown(format!("status {}: {message}", status.as_u16()))
}
