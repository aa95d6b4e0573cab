//! Axum route handlers for the Analysis API.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::analysis::orchestrator::{AnalysisBatchReport, Analyzer};
use crate::errors::AppError;
use crate::models::AnalysisResult;
use crate::state::AppState;

/// POST /api/v1/jobs/:job_id/analyses
///
/// Runs the analysis pipeline for every candidate linked to the job.
pub async fn handle_run_analysis(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<AnalysisBatchReport>, AppError> {
    let analyzer = Analyzer::new(
        state.store.clone(),
        state.llm.clone(),
        state.resumes.clone(),
        state.config.analyzer(),
    );
    let report = analyzer.analyze(&job_id).await?;
    Ok(Json(report))
}

/// GET /api/v1/jobs/:job_id/analyses
pub async fn handle_list_analyses(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<Vec<AnalysisResult>>, AppError> {
    if state.store.get_job(&job_id).await?.is_none() {
        return Err(AppError::NotFound(format!("Job {job_id} not found")));
    }
    Ok(Json(state.store.get_analyses(&job_id).await?))
}
