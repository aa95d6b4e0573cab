//! Axum route handlers for jobs, prospects and candidates.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::models::{Candidate, Job, Prospect};
use crate::records::candidate::normalize_candidate;
use crate::records::raw::RawCandidate;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NewCandidateRequest {
    pub id: String,
    /// Nested applicant record in the `applicants.json` shape.
    pub record: RawCandidate,
}

fn normalize_or_reject(id: &str, raw: &RawCandidate) -> Result<Candidate, AppError> {
    normalize_candidate(id, raw)
        .ok_or_else(|| AppError::Validation("candidate id must not be blank".to_string()))
}

async fn require_job(state: &AppState, job_id: &str) -> Result<Job, AppError> {
    state
        .store
        .get_job(job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))
}

/// GET /api/v1/jobs
pub async fn handle_list_jobs(State(state): State<AppState>) -> Result<Json<Vec<Job>>, AppError> {
    Ok(Json(state.store.get_jobs().await?))
}

/// GET /api/v1/jobs/:job_id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<Job>, AppError> {
    Ok(Json(require_job(&state, &job_id).await?))
}

/// GET /api/v1/jobs/:job_id/prospects
pub async fn handle_job_prospects(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<Vec<Prospect>>, AppError> {
    require_job(&state, &job_id).await?;
    Ok(Json(state.store.get_prospects(&job_id).await?))
}

/// GET /api/v1/jobs/:job_id/candidates
pub async fn handle_job_candidates(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<Vec<Candidate>>, AppError> {
    require_job(&state, &job_id).await?;
    Ok(Json(state.store.get_candidates(&job_id).await?))
}

/// POST /api/v1/candidates
pub async fn handle_create_candidate(
    State(state): State<AppState>,
    Json(req): Json<NewCandidateRequest>,
) -> Result<(StatusCode, Json<Candidate>), AppError> {
    let candidate = normalize_or_reject(&req.id, &req.record)?;
    state.store.insert_candidate(candidate.clone()).await?;
    info!(candidate_id = %candidate.id, "Candidate created");
    Ok((StatusCode::CREATED, Json(candidate)))
}

/// PUT /api/v1/candidates/:id
pub async fn handle_update_candidate(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(record): Json<RawCandidate>,
) -> Result<Json<Candidate>, AppError> {
    let candidate = normalize_or_reject(&id, &record)?;
    state.store.update_candidate(candidate.clone()).await?;
    info!(candidate_id = %candidate.id, "Candidate updated");
    Ok(Json(candidate))
}
