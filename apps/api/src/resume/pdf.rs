//! Résumé text extraction from uploaded PDF bytes.
//!
//! `pdf_extract` is synchronous and can panic on malformed input, so it runs on the
//! blocking pool; a panic there surfaces as a `JoinError` and is reported as unreadable.

use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ResumeError {
    #[error("The uploaded resume is empty")]
    Empty,

    #[error("Failed to extract text from PDF")]
    Unreadable(String),

    #[error("The PDF contains no extractable text")]
    NoText,
}

/// Extracts the text of every page, in page order, with whitespace normalized.
pub async fn extract_resume_text(bytes: Vec<u8>) -> Result<String, ResumeError> {
    if bytes.is_empty() {
        return Err(ResumeError::Empty);
    }

    let size = bytes.len();
    let raw = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .map_err(|e| ResumeError::Unreadable(format!("extraction task failed: {e}")))?
        .map_err(|e| ResumeError::Unreadable(e.to_string()))?;

    let text = collapse_whitespace(&raw);
    if text.is_empty() {
        warn!(bytes = size, "PDF parsed but contained no text");
        return Err(ResumeError::NoText);
    }

    info!(bytes = size, chars = text.chars().count(), "Resume text extracted");
    Ok(text)
}

/// PDF text comes out as fragments separated by arbitrary spacing and form feeds;
/// join everything into single-spaced text.
fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_bytes_rejected() {
        let err = extract_resume_text(Vec::new()).await.unwrap_err();
        assert!(matches!(err, ResumeError::Empty));
    }

    #[tokio::test]
    async fn test_non_pdf_bytes_are_unreadable() {
        let err = extract_resume_text(b"Jane Doe\nSenior Engineer".to_vec())
            .await
            .unwrap_err();
        assert!(matches!(err, ResumeError::Unreadable(_)));
        assert_eq!(err.to_string(), "Failed to extract text from PDF");
    }

    #[tokio::test]
    async fn test_truncated_pdf_is_unreadable() {
        let err = extract_resume_text(b"%PDF-1.4\n1 0 obj\n<< /Type /Catalog".to_vec())
            .await
            .unwrap_err();
        assert!(matches!(err, ResumeError::Unreadable(_)));
    }

    #[test]
    fn test_collapse_whitespace_joins_pages() {
        assert_eq!(
            collapse_whitespace("  Jane  Doe\n\nSenior\tEngineer\x0cPage two  "),
            "Jane Doe Senior Engineer Page two"
        );
        assert_eq!(collapse_whitespace(" \n\x0c "), "");
    }
}
