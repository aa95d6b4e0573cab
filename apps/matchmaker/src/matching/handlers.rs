//! Axum route handlers for the Matching API.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::matching::ranker::{filter_complete, rank, RankedCandidate};
use crate::models::CandidateField;
use crate::state::AppState;

const DEFAULT_LIMIT: usize = 10;

#[derive(Debug, Default, Deserialize)]
pub struct MatchParams {
    pub limit: Option<usize>,
    /// Comma-separated candidate fields that must carry information.
    pub require: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub query: String,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub require: Vec<CandidateField>,
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub query: String,
    pub model: String,
    pub matches: Vec<RankedCandidate>,
}

fn parse_required(raw: Option<&str>) -> Result<Vec<CandidateField>, AppError> {
    raw.unwrap_or_default()
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.parse().map_err(AppError::Validation))
        .collect()
}

async fn ranked_matches(
    state: &AppState,
    query: String,
    required: &[CandidateField],
    limit: Option<usize>,
) -> Result<MatchResponse, AppError> {
    let candidates = state.store.get_all_candidates().await?;
    let candidates = filter_complete(candidates, required);

    let mut matches = rank(&query, candidates, state.embedder.as_ref()).await?;
    matches.truncate(limit.unwrap_or(DEFAULT_LIMIT));

    Ok(MatchResponse {
        query,
        model: state.embedder.model_name().to_string(),
        matches,
    })
}

/// GET /api/v1/jobs/:job_id/matches
///
/// Ranks every candidate against the job title.
pub async fn handle_job_matches(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
    Query(params): Query<MatchParams>,
) -> Result<Json<MatchResponse>, AppError> {
    let required = parse_required(params.require.as_deref())?;
    let job = state
        .store
        .get_job(&job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;

    let response = ranked_matches(&state, job.title, &required, params.limit).await?;
    Ok(Json(response))
}

/// POST /api/v1/matches
pub async fn handle_query_matches(
    State(state): State<AppState>,
    Json(req): Json<MatchRequest>,
) -> Result<Json<MatchResponse>, AppError> {
    if req.query.trim().is_empty() {
        return Err(AppError::Validation("query must not be empty".to_string()));
    }
    let response = ranked_matches(&state, req.query, &req.require, req.limit).await?;
    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_required_fields() {
        let fields = parse_required(Some("name, technical_skills,")).unwrap();
        assert_eq!(
            fields,
            vec![CandidateField::Name, CandidateField::TechnicalSkills]
        );
        assert!(parse_required(None).unwrap().is_empty());
        assert!(parse_required(Some("salary")).is_err());
    }
}
