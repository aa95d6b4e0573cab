//! Loads and normalizes the three source exports from a directory.

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::info;

use crate::models::{Candidate, Job, Prospect};
use crate::records::candidate::normalize_candidates;
use crate::records::job::normalize_jobs;
use crate::records::prospect::normalize_prospects;

pub const APPLICANTS_FILE: &str = "applicants.json";
pub const JOBS_FILE: &str = "vagas.json";
pub const PROSPECTS_FILE: &str = "prospects.json";

/// Normalized snapshot of all source records.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub candidates: Vec<Candidate>,
    pub jobs: Vec<Job>,
    pub prospects: Vec<Prospect>,
}

impl Dataset {
    pub fn from_documents(applicants: &Value, jobs: &Value, prospects: &Value) -> Self {
        Self {
            candidates: normalize_candidates(applicants),
            jobs: normalize_jobs(jobs),
            prospects: normalize_prospects(prospects),
        }
    }

    /// Reads `applicants.json`, `vagas.json` and `prospects.json` from `dir`.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let applicants = read_document(&dir.join(APPLICANTS_FILE))?;
        let jobs = read_document(&dir.join(JOBS_FILE))?;
        let prospects = read_document(&dir.join(PROSPECTS_FILE))?;

        let dataset = Self::from_documents(&applicants, &jobs, &prospects);
        info!(
            candidates = dataset.candidates.len(),
            jobs = dataset.jobs.len(),
            prospects = dataset.prospects.len(),
            "Dataset loaded from {}",
            dir.display()
        );
        Ok(dataset)
    }
}

fn read_document(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", path.display()))
}
