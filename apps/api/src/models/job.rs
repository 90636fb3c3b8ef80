use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Normalized job posting produced by one extraction attempt.
///
/// Every field is a plain `String` that defaults to empty, so consumers only
/// ever check for emptiness, never for presence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobRecord {
    pub title: String,
    pub company: String,
    pub description: String,
    pub location: String,
    pub source_url: String,
}

/// Interview flavour selected by the candidate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterviewType {
    Technical,
    Behavioral,
    #[default]
    General,
}

impl InterviewType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewType::Technical => "technical",
            InterviewType::Behavioral => "behavioral",
            InterviewType::General => "general",
        }
    }
}

impl FromStr for InterviewType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "technical" => Ok(InterviewType::Technical),
            "behavioral" => Ok(InterviewType::Behavioral),
            "general" => Ok(InterviewType::General),
            other => Err(format!(
                "Unknown interview type '{other}'; expected technical, behavioral or general"
            )),
        }
    }
}

impl fmt::Display for InterviewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the prompt assembler needs for one user action.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub job: JobRecord,
    pub resume_text: Option<String>,
    pub interview_type: Option<InterviewType>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

/// One prior message of the mock interview, sent back by the client with each chat turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}
