// Resume analysis: summarize, opine on and score each candidate of a job.

pub mod handlers;
pub mod orchestrator;
pub mod parser;
pub mod prompts;
pub mod resume_source;
