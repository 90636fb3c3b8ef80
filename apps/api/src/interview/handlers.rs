//! Axum route handlers for job analysis, interview preparation and the mock-interview chat.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::interview::assembler::{build_analysis_prompt, build_chat_system_prompt};
use crate::llm_client::{INTERVIEW_CHAT, INTERVIEW_PREP, JOB_ANALYSIS};
use crate::models::{AnalysisRequest, ChatTurn, InterviewType, JobRecord};
use crate::state::AppState;

/// Oldest turns beyond this are dropped before the chat call to bound prompt size.
const MAX_CHAT_HISTORY: usize = 20;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnalyzeJobRequest {
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeJobResponse {
    pub job_data: JobRecord,
    pub analysis: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrepareInterviewRequest {
    #[serde(default)]
    pub job_url: String,
    pub interview_type: Option<String>,
    #[serde(default)]
    pub resume_text: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    /// Prior turns, oldest first. The client owns the conversation.
    #[serde(default)]
    pub context: Vec<ChatTurn>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct CompletionCheckResponse {
    pub success: bool,
    pub message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/analyze-job
///
/// Scrapes the posting and returns it with a structured analysis.
pub async fn handle_analyze_job(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeJobRequest>,
) -> Result<Json<AnalyzeJobResponse>, AppError> {
    if request.url.trim().is_empty() {
        return Err(AppError::Validation("URL is required".to_string()));
    }
    state.analysis.ensure_configured()?;

    let job = state.pipeline.run(&request.url).await?;

    let prompt = build_analysis_prompt(&job, None, None);
    let analysis = state.analysis.analyze(&prompt, JOB_ANALYSIS).await?;

    Ok(Json(AnalyzeJobResponse {
        job_data: job,
        analysis,
    }))
}

/// POST /api/prepare-interview
///
/// Scrapes the posting and produces the opening interview briefing. The returned
/// `message` is the first assistant turn of the chat.
pub async fn handle_prepare_interview(
    State(state): State<AppState>,
    Json(request): Json<PrepareInterviewRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    if request.job_url.trim().is_empty() {
        return Err(AppError::Validation("Job URL is required".to_string()));
    }
    let interview_type = match request.interview_type.as_deref() {
        None | Some("") => InterviewType::default(),
        Some(raw) => raw.parse::<InterviewType>().map_err(AppError::Validation)?,
    };
    state.analysis.ensure_configured()?;

    let job = state.pipeline.run(&request.job_url).await?;

    let analysis_request = AnalysisRequest {
        job,
        resume_text: Some(request.resume_text),
        interview_type: Some(interview_type),
    };
    let message = state
        .analysis
        .analyze(&analysis_request.prompt(), INTERVIEW_PREP)
        .await?;

    info!(interview_type = %interview_type, "Interview briefing generated");
    Ok(Json(MessageResponse { message }))
}

/// POST /api/chat
///
/// One turn of the mock interview.
pub async fn handle_chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    if request.message.trim().is_empty() {
        return Err(AppError::Validation("message cannot be empty".to_string()));
    }

    let skip = request.context.len().saturating_sub(MAX_CHAT_HISTORY);
    let history = &request.context[skip..];

    let message = state
        .analysis
        .converse(
            &build_chat_system_prompt(),
            history,
            &request.message,
            INTERVIEW_CHAT,
        )
        .await?;

    Ok(Json(MessageResponse { message }))
}

/// GET /api/completion-check
///
/// Round-trips a trivial prompt to verify the key and endpoint are usable.
pub async fn handle_completion_check(
    State(state): State<AppState>,
) -> Result<Json<CompletionCheckResponse>, AppError> {
    let message = state.analysis.ping().await?;
    Ok(Json(CompletionCheckResponse {
        success: true,
        message,
    }))
}
