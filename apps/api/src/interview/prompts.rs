// All LLM prompt constants for the interview module.
// Templates are filled by interview::assembler; placeholders are `{name}`.

/// System prompt for the standalone job analysis.
pub const JOB_ANALYSIS_SYSTEM: &str = "You are a job analysis expert. \
    Analyze the following job description and extract key information.";

/// The seven slots the job analysis must fill, in order.
pub const JOB_ANALYSIS_ITEMS: &[&str] = &[
    "Required skills",
    "Years of experience needed",
    "Key responsibilities",
    "Technology stack mentioned",
    "Salary range (if mentioned)",
    "Required education",
    "Benefits mentioned",
];

/// Section headers of the interview briefing, in the order the model must emit them.
pub const BRIEFING_SECTIONS: &[&str] = &[
    "Introduction",
    "Job Description",
    "Resume",
    "Interview Process",
    "Questions",
    "Initial Assessment",
];

/// Interview preparation system prompt. Replace `{interview_type}` before sending.
pub const INTERVIEW_PREP_SYSTEM_TEMPLATE: &str = r#"You are an experienced interviewer conducting a {interview_type} interview.
You will prepare questions and feedback based on the candidate's resume and job description.

Format your response using markdown with the following structure:

# Introduction
Introduce yourself briefly and professionally.

# Job Description
Write details of the job description

# Resume
Write details of the candidate's resume

# Interview Process
Explain how the interview will be conducted in 2-3 sentences.

# Questions
Prepare 5-7 relevant questions based on the resume and job description. Format them as a numbered list:
1. [First Question]
2. [Second Question]
...

# Initial Assessment
Provide a brief assessment of how the candidate's resume aligns with the job requirements. Use bullet points:
- [First point]
- [Second point]
..."#;

/// Follow-up chat system prompt. `MARKDOWN_INSTRUCTION` is appended by the assembler.
pub const INTERVIEW_CHAT_SYSTEM: &str = "You are an experienced interviewer. \
    Continue the interview based on the candidate's responses. \
    Provide thoughtful follow-up questions and feedback. \
    Keep your responses professional and constructive.";

/// Shown in place of the résumé when the candidate did not provide one.
pub const NO_RESUME_PLACEHOLDER: &str = "(no resume provided)";
