use axum::{extract::Multipart, Json};
use serde::Serialize;

use crate::errors::AppError;
use crate::resume::pdf::extract_resume_text;

/// Multipart field carrying the PDF.
const RESUME_FIELD: &str = "resume";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractResumeResponse {
    pub resume_text: String,
}

/// POST /api/extract-resume
///
/// Accepts a multipart upload with the PDF in the `resume` field and returns its text.
/// The text is what the client later sends as `resumeText` to /api/prepare-interview.
pub async fn handle_extract_resume(
    mut multipart: Multipart,
) -> Result<Json<ExtractResumeResponse>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(RESUME_FIELD) {
            continue;
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;

        let resume_text = extract_resume_text(bytes.to_vec()).await?;
        return Ok(Json(ExtractResumeResponse { resume_text }));
    }

    Err(AppError::Validation(format!(
        "Missing '{RESUME_FIELD}' file field"
    )))
}
