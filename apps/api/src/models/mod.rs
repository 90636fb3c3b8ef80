pub mod job;

pub use job::{AnalysisRequest, ChatTurn, InterviewType, JobRecord};
