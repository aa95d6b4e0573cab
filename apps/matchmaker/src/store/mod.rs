//! Storage collaborator. The pipeline never touches global tables; callers
//! inject an `AnalysisStore` scoped to their session.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{AnalysisResult, Candidate, Job, Prospect};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{entity} '{id}' already exists")]
    Duplicate { entity: &'static str, id: String },

    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },
}

#[async_trait]
pub trait AnalysisStore: Send + Sync {
    async fn get_jobs(&self) -> Result<Vec<Job>, StoreError>;

    async fn get_job(&self, job_code: &str) -> Result<Option<Job>, StoreError> {
        Ok(self
            .get_jobs()
            .await?
            .into_iter()
            .find(|job| job.code == job_code))
    }

    /// Candidates linked to a job through its prospects, in prospect order.
    async fn get_candidates(&self, job_code: &str) -> Result<Vec<Candidate>, StoreError>;

    async fn get_all_candidates(&self) -> Result<Vec<Candidate>, StoreError>;

    async fn get_prospects(&self, job_code: &str) -> Result<Vec<Prospect>, StoreError>;

    async fn insert_analysis(&self, analysis: &AnalysisResult) -> Result<(), StoreError>;

    async fn get_analyses(&self, job_code: &str) -> Result<Vec<AnalysisResult>, StoreError>;

    /// Fails with `Duplicate` if the id is already present.
    async fn insert_candidate(&self, candidate: Candidate) -> Result<(), StoreError>;

    /// Replaces an existing candidate; fails with `NotFound` for unknown ids.
    async fn update_candidate(&self, candidate: Candidate) -> Result<(), StoreError>;
}
