//! Prompt Assembler: pure builders turning a `JobRecord` into completion prompts.
//!
//! No I/O and no clock: identical inputs always give byte-identical prompts.
//! User-supplied text is inserted after templates are resolved, so it can never be
//! mistaken for a placeholder.

use crate::interview::prompts::{
    INTERVIEW_CHAT_SYSTEM, INTERVIEW_PREP_SYSTEM_TEMPLATE, JOB_ANALYSIS_ITEMS,
    JOB_ANALYSIS_SYSTEM, NO_RESUME_PLACEHOLDER,
};
use crate::llm_client::prompts::{Prompt, MARKDOWN_INSTRUCTION};
use crate::models::{AnalysisRequest, InterviewType, JobRecord};

/// Builds the prompt for a job posting.
///
/// With neither résumé nor interview type this is the plain job analysis. Either one
/// switches to the interview briefing; a missing type defaults to `general`.
pub fn build_analysis_prompt(
    job: &JobRecord,
    resume_text: Option<&str>,
    interview_type: Option<InterviewType>,
) -> Prompt {
    if resume_text.is_none() && interview_type.is_none() {
        return build_job_analysis_prompt(job);
    }
    build_interview_prompt(
        job,
        resume_text.unwrap_or_default(),
        interview_type.unwrap_or_default(),
    )
}

/// Job analysis: job header + description, then the numbered list of slots to fill.
pub fn build_job_analysis_prompt(job: &JobRecord) -> Prompt {
    let mut user = job_header(job);
    user.push_str("\nDescription:\n");
    user.push_str(&job.description);
    user.push_str("\n\nPlease analyze this job posting and provide:\n");
    for (i, item) in JOB_ANALYSIS_ITEMS.iter().enumerate() {
        user.push_str(&format!("{}. {item}\n", i + 1));
    }

    Prompt {
        system: JOB_ANALYSIS_SYSTEM.to_string(),
        user,
    }
}

/// Interview briefing: fixed six-section markdown skeleton in the system prompt,
/// job and résumé in the user prompt.
pub fn build_interview_prompt(
    job: &JobRecord,
    resume_text: &str,
    interview_type: InterviewType,
) -> Prompt {
    let system = INTERVIEW_PREP_SYSTEM_TEMPLATE.replace("{interview_type}", interview_type.as_str());

    let resume = match resume_text.trim() {
        "" => NO_RESUME_PLACEHOLDER,
        text => text,
    };

    let mut user = job_header(job);
    user.push_str("\nJob Description:\n");
    user.push_str(&job.description);
    user.push_str("\n\nResume:\n");
    user.push_str(resume);

    Prompt { system, user }
}

/// System prompt for follow-up turns of the mock interview.
pub fn build_chat_system_prompt() -> String {
    format!("{INTERVIEW_CHAT_SYSTEM}\n\n{MARKDOWN_INSTRUCTION}")
}

fn job_header(job: &JobRecord) -> String {
    format!(
        "Job Title: {}\nCompany: {}\nLocation: {}\n",
        job.title, job.company, job.location
    )
}

impl AnalysisRequest {
    pub fn prompt(&self) -> Prompt {
        build_analysis_prompt(
            &self.job,
            self.resume_text.as_deref(),
            self.interview_type,
        )
    }
}
