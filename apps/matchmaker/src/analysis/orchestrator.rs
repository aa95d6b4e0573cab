//! Per-job analysis pipeline.
//!
//! For each candidate linked to the job: read resume text, ask the model for
//! a markdown summary, an opinion and a score, parse the summary into
//! sections, then persist the result. A failing candidate is skipped and
//! reported; it never aborts the batch.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::analysis::parser::{
    extract_sections, parse_score, unwrap_markdown_fence, MissingRequiredSectionError,
};
use crate::analysis::prompts;
use crate::analysis::resume_source::ResumeSource;
use crate::llm_client::{CompletionService, LlmError};
use crate::models::{AnalysisResult, Candidate};
use crate::store::{AnalysisStore, StoreError};

pub const DEFAULT_CONCURRENCY: usize = 1;
pub const DEFAULT_SCORE_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_LLM_CALL_TIMEOUT: Duration = Duration::from_secs(120);

/// Batch-level failures. The whole run stops.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Job '{0}' not found")]
    UnknownJob(String),

    #[error("No candidates linked to job '{0}'")]
    NoCandidates(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Candidate-level failures. The candidate is skipped.
#[derive(Debug, Error)]
pub enum CandidateError {
    #[error("resume unavailable: {0}")]
    ResourceUnavailable(String),

    #[error("model call failed: {0}")]
    ExternalCallFailure(#[from] LlmError),

    #[error(transparent)]
    MissingRequiredSection(#[from] MissingRequiredSectionError),
}

#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Candidates analyzed at the same time. 1 runs them one after another.
    pub max_concurrency: usize,
    /// Score prompts sent while the reply carries no readable score.
    pub score_max_attempts: u32,
    pub llm_call_timeout: Duration,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            max_concurrency: DEFAULT_CONCURRENCY,
            score_max_attempts: DEFAULT_SCORE_MAX_ATTEMPTS,
            llm_call_timeout: DEFAULT_LLM_CALL_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedCandidate {
    pub candidate_id: String,
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisBatchReport {
    pub job_code: String,
    pub analyzed: Vec<AnalysisResult>,
    pub skipped: Vec<SkippedCandidate>,
    /// Results produced but not stored.
    pub persist_failures: usize,
}

#[derive(Clone)]
pub struct Analyzer {
    store: Arc<dyn AnalysisStore>,
    llm: Arc<dyn CompletionService>,
    resumes: Arc<dyn ResumeSource>,
    config: AnalyzerConfig,
}

impl Analyzer {
    pub fn new(
        store: Arc<dyn AnalysisStore>,
        llm: Arc<dyn CompletionService>,
        resumes: Arc<dyn ResumeSource>,
        config: AnalyzerConfig,
    ) -> Self {
        Self {
            store,
            llm,
            resumes,
            config,
        }
    }

    /// Analyzes every candidate linked to `job_code`.
    pub async fn analyze(&self, job_code: &str) -> Result<AnalysisBatchReport, LookupError> {
        let Some(job) = self.store.get_job(job_code).await? else {
            warn!(job_code = %job_code, "Job not found; nothing to analyze");
            return Err(LookupError::UnknownJob(job_code.to_string()));
        };

        let candidates = self.store.get_candidates(job_code).await?;
        if candidates.is_empty() {
            warn!(job_code = %job_code, "No candidates linked to job");
            return Err(LookupError::NoCandidates(job_code.to_string()));
        }

        info!(
            job_code = %job_code,
            candidates = candidates.len(),
            concurrency = self.config.max_concurrency,
            "Starting analysis batch"
        );

        let brief = Arc::new(job.analysis_brief());
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrency.max(1)));
        let mut pending: BTreeMap<usize, (String, String)> = BTreeMap::new();
        let mut tasks = JoinSet::new();

        for (index, candidate) in candidates.into_iter().enumerate() {
            pending.insert(index, (candidate.id.clone(), candidate.name.clone()));
            let worker = self.clone();
            let brief = Arc::clone(&brief);
            let semaphore = Arc::clone(&semaphore);
            let job_code = job_code.to_string();

            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                let outcome = worker.analyze_candidate(&job_code, &brief, &candidate).await;
                (index, outcome)
            });
        }

        let mut analyzed: BTreeMap<usize, AnalysisResult> = BTreeMap::new();
        let mut skipped: BTreeMap<usize, SkippedCandidate> = BTreeMap::new();
        let mut persist_failures = 0;

        while let Some(joined) = tasks.join_next().await {
            let (index, outcome) = match joined {
                Ok(done) => done,
                Err(e) => {
                    error!(job_code = %job_code, "Analysis task failed: {e}");
                    continue;
                }
            };
            let Some((candidate_id, name)) = pending.remove(&index) else {
                continue;
            };

            match outcome {
                Ok(result) => {
                    if let Err(e) = self.store.insert_analysis(&result).await {
                        error!(
                            job_code = %job_code,
                            candidate_id = %candidate_id,
                            "Failed to persist analysis: {e}"
                        );
                        persist_failures += 1;
                    }
                    info!(
                        job_code = %job_code,
                        candidate_id = %candidate_id,
                        score = result.score,
                        "Candidate analyzed"
                    );
                    analyzed.insert(index, result);
                }
                Err(e) => {
                    warn!(
                        job_code = %job_code,
                        candidate_id = %candidate_id,
                        "Skipping candidate: {e}"
                    );
                    skipped.insert(
                        index,
                        SkippedCandidate {
                            candidate_id,
                            name,
                            reason: e.to_string(),
                        },
                    );
                }
            }
        }

        // whatever is left never reported back (panicked or cancelled)
        for (index, (candidate_id, name)) in pending {
            skipped.insert(
                index,
                SkippedCandidate {
                    candidate_id,
                    name,
                    reason: "analysis task aborted".to_string(),
                },
            );
        }

        let report = AnalysisBatchReport {
            job_code: job_code.to_string(),
            analyzed: analyzed.into_values().collect(),
            skipped: skipped.into_values().collect(),
            persist_failures,
        };
        info!(
            job_code = %job_code,
            analyzed = report.analyzed.len(),
            skipped = report.skipped.len(),
            persist_failures = report.persist_failures,
            "Analysis batch finished"
        );
        Ok(report)
    }

    async fn analyze_candidate(
        &self,
        job_code: &str,
        brief: &str,
        candidate: &Candidate,
    ) -> Result<AnalysisResult, CandidateError> {
        let path = candidate.resume_path().ok_or_else(|| {
            CandidateError::ResourceUnavailable("candidate has no resume file".to_string())
        })?;
        let resume = self
            .resumes
            .read_text(path)
            .await
            .map_err(|e| CandidateError::ResourceUnavailable(e.to_string()))?;

        let reply = self.complete(&prompts::summary_prompt(&resume)).await?;
        let summary = unwrap_markdown_fence(&reply).to_string();
        let opinion = self.complete(&prompts::opinion_prompt(&resume, brief)).await?;
        let score = self.score(&resume, brief, job_code, &candidate.id).await?;
        let sections = extract_sections(&summary)?;

        Ok(AnalysisResult {
            id: Uuid::new_v4(),
            job_code: job_code.to_string(),
            candidate_id: candidate.id.clone(),
            content: summary,
            file: path.to_string(),
            opinion,
            name: sections.name,
            skills: sections.skills,
            education: sections.education,
            languages: sections.languages,
            score,
            created_at: Utc::now(),
        })
    }

    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let timeout = self.config.llm_call_timeout;
        tokio::time::timeout(timeout, self.llm.complete(prompt))
            .await
            .map_err(|_| LlmError::Timeout(timeout))?
    }

    /// Re-asks while the reply has no readable score; 0.0 once attempts run out.
    async fn score(
        &self,
        resume: &str,
        brief: &str,
        job_code: &str,
        candidate_id: &str,
    ) -> Result<f64, LlmError> {
        let prompt = prompts::score_prompt(resume, brief);
        let attempts = self.config.score_max_attempts.max(1);

        for attempt in 1..=attempts {
            let reply = self.complete(&prompt).await?;
            match parse_score(&reply) {
                Ok(score) => return Ok(score),
                Err(e) => warn!(
                    job_code = %job_code,
                    candidate_id = %candidate_id,
                    attempt,
                    "Unreadable score reply: {e}"
                ),
            }
        }

        warn!(
            job_code = %job_code,
            candidate_id = %candidate_id,
            "No score after {attempts} attempts; defaulting to 0.0"
        );
        Ok(0.0)
    }
}
