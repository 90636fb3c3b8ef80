#![allow(dead_code)]

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::AnalysisError;
use crate::resume::pdf::ResumeError;
use crate::scraping::ExtractionError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Every variant renders as `{"error": <user-facing message>, "code": <CODE>}`.
/// Internal detail is logged here and never sent to the client.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    Resume(#[from] ResumeError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut details = None;

        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Extraction(e) => {
                let (status, code) = match e {
                    ExtractionError::InvalidUrl => (StatusCode::BAD_REQUEST, "INVALID_URL"),
                    ExtractionError::FetchFailed => (StatusCode::BAD_GATEWAY, "FETCH_FAILED"),
                    ExtractionError::EmptyDescription => {
                        (StatusCode::UNPROCESSABLE_ENTITY, "EMPTY_DESCRIPTION")
                    }
                };
                (status, code, e.to_string())
            }
            AppError::Analysis(e) => {
                tracing::warn!(kind = ?e.kind(), retriable = e.retriable(), "Completion call failed");
                match e {
                    AnalysisError::NotConfigured => {
                        tracing::error!("Completion API key missing");
                        (
                            StatusCode::INTERNAL_SERVER_ERROR,
                            "CONFIGURATION_ERROR",
                            e.to_string(),
                        )
                    }
                    AnalysisError::QuotaExceeded { message } => {
                        details = Some(message.clone());
                        (
                            StatusCode::TOO_MANY_REQUESTS,
                            "QUOTA_EXCEEDED",
                            "OpenAI API quota exceeded. Please try again later or contact support to upgrade your plan."
                                .to_string(),
                        )
                    }
                    AnalysisError::EmptyResponse => (
                        StatusCode::BAD_GATEWAY,
                        "EMPTY_RESPONSE",
                        "No response received from OpenAI".to_string(),
                    ),
                    AnalysisError::Unknown(detail) => {
                        tracing::error!("LLM error: {detail}");
                        (
                            StatusCode::INTERNAL_SERVER_ERROR,
                            "LLM_ERROR",
                            "An AI processing error occurred".to_string(),
                        )
                    }
                }
            }
            AppError::Resume(e) => {
                if let ResumeError::Unreadable(detail) = e {
                    tracing::warn!("Resume extraction failed: {detail}");
                }
                (StatusCode::UNPROCESSABLE_ENTITY, "RESUME_ERROR", e.to_string())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = match details {
            Some(details) => json!({ "error": message, "code": code, "details": details }),
            None => json!({ "error": message, "code": code }),
        };

        (status, Json(body)).into_response()
    }
}
