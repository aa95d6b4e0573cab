pub mod analysis;
pub mod candidate;
pub mod job;
pub mod prospect;

pub use analysis::AnalysisResult;
pub use candidate::{Candidate, CandidateField, Disclosure};
pub use job::Job;
pub use prospect::Prospect;
