use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Structured evaluation of one candidate's resume for one job.
/// Created once per (job, candidate) run and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct AnalysisResult {
    pub id: Uuid,
    pub job_code: String,
    pub candidate_id: String,
    /// Markdown summary produced by the model.
    pub content: String,
    /// Resume file the summary was produced from.
    pub file: String,
    pub opinion: String,
    pub name: String,
    pub skills: Vec<String>,
    pub education: Vec<String>,
    pub languages: Vec<String>,
    /// 0.0 to 10.0
    pub score: f64,
    pub created_at: DateTime<Utc>,
}
