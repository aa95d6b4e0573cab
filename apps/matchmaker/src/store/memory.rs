//! Session-scoped in-memory store seeded from a normalized dataset.

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::models::{AnalysisResult, Candidate, Job, Prospect};
use crate::records::dataset::Dataset;
use crate::store::{AnalysisStore, StoreError};

#[derive(Default)]
struct Tables {
    candidates: Vec<Candidate>,
    jobs: Vec<Job>,
    prospects: Vec<Prospect>,
    analyses: Vec<AnalysisResult>,
}

#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            tables: RwLock::new(Tables {
                candidates: dataset.candidates,
                jobs: dataset.jobs,
                prospects: dataset.prospects,
                analyses: Vec::new(),
            }),
        }
    }
}

#[async_trait]
impl AnalysisStore for InMemoryStore {
    async fn get_jobs(&self) -> Result<Vec<Job>, StoreError> {
        Ok(self.tables.read().await.jobs.clone())
    }

    async fn get_candidates(&self, job_code: &str) -> Result<Vec<Candidate>, StoreError> {
        let tables = self.tables.read().await;
        let mut linked: Vec<Candidate> = Vec::new();

        for prospect in tables.prospects.iter().filter(|p| p.job_code == job_code) {
            if linked.iter().any(|c| c.id == prospect.candidate_code) {
                continue;
            }
            match tables
                .candidates
                .iter()
                .find(|c| c.id == prospect.candidate_code)
            {
                Some(candidate) => linked.push(candidate.clone()),
                None => debug!(
                    job_code = %job_code,
                    candidate_id = %prospect.candidate_code,
                    "Prospect references unknown candidate"
                ),
            }
        }

        Ok(linked)
    }

    async fn get_all_candidates(&self) -> Result<Vec<Candidate>, StoreError> {
        Ok(self.tables.read().await.candidates.clone())
    }

    async fn get_prospects(&self, job_code: &str) -> Result<Vec<Prospect>, StoreError> {
        Ok(self
            .tables
            .read()
            .await
            .prospects
            .iter()
            .filter(|p| p.job_code == job_code)
            .cloned()
            .collect())
    }

    async fn insert_analysis(&self, analysis: &AnalysisResult) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if tables.analyses.iter().any(|a| a.id == analysis.id) {
            return Err(StoreError::Duplicate {
                entity: "analysis",
                id: analysis.id.to_string(),
            });
        }
        tables.analyses.push(analysis.clone());
        Ok(())
    }

    async fn get_analyses(&self, job_code: &str) -> Result<Vec<AnalysisResult>, StoreError> {
        Ok(self
            .tables
            .read()
            .await
            .analyses
            .iter()
            .filter(|a| a.job_code == job_code)
            .cloned()
            .collect())
    }

    async fn insert_candidate(&self, candidate: Candidate) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if tables.candidates.iter().any(|c| c.id == candidate.id) {
            return Err(StoreError::Duplicate {
                entity: "candidate",
                id: candidate.id,
            });
        }
        tables.candidates.push(candidate);
        Ok(())
    }

    async fn update_candidate(&self, candidate: Candidate) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        match tables.candidates.iter_mut().find(|c| c.id == candidate.id) {
            Some(existing) => {
                *existing = candidate;
                Ok(())
            }
            None => Err(StoreError::NotFound {
                entity: "candidate",
                id: candidate.id,
            }),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::records::candidate::normalize_candidate;
    use crate::records::raw::{RawCandidate, RawJob};
    use crate::records::{epoch_sentinel, job::normalize_job, NO_INFORMATION};

    pub(crate) fn candidate(id: &str, name: &str) -> Candidate {
        let mut c = normalize_candidate(id, &RawCandidate::default()).unwrap();
        c.name = name.to_string();
        c
    }

    pub(crate) fn job(code: &str, title: &str) -> Job {
        let mut j = normalize_job(code, &RawJob::default()).unwrap();
        j.title = title.to_string();
        j
    }

    pub(crate) fn prospect(job_code: &str, candidate_code: &str) -> Prospect {
        Prospect {
            job_code: job_code.to_string(),
            job_title: NO_INFORMATION.to_string(),
            candidate_code: candidate_code.to_string(),
            name: NO_INFORMATION.to_string(),
            email: NO_INFORMATION.to_string(),
            phone: NO_INFORMATION.to_string(),
            status: NO_INFORMATION.to_string(),
            comment: NO_INFORMATION.to_string(),
            recruiter: NO_INFORMATION.to_string(),
            applied_on: epoch_sentinel(),
            last_updated: epoch_sentinel(),
        }
    }

    fn store() -> InMemoryStore {
        InMemoryStore::new(Dataset {
            candidates: vec![candidate("1", "Ana"), candidate("2", "Bruno"), candidate("3", "Caio")],
            jobs: vec![job("J1", "Dev"), job("J2", "QA")],
            prospects: vec![
                prospect("J1", "2"),
                prospect("J1", "1"),
                prospect("J1", "2"),
                prospect("J1", "99"),
                prospect("J2", "3"),
            ],
        })
    }

    #[tokio::test]
    async fn test_candidates_follow_prospect_links_in_order() {
        let linked = store().get_candidates("J1").await.unwrap();
        let ids: Vec<_> = linked.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);
    }

    #[tokio::test]
    async fn test_unknown_job_has_no_candidates() {
        assert!(store().get_candidates("J9").await.unwrap().is_empty());
        assert!(store().get_job("J9").await.unwrap().is_none());
        assert_eq!(store().get_job("J2").await.unwrap().unwrap().title, "QA");
    }

    #[tokio::test]
    async fn test_prospects_filtered_by_job() {
        assert_eq!(store().get_prospects("J1").await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_insert_duplicate_candidate_is_rejected() {
        let store = store();
        let err = store.insert_candidate(candidate("1", "Outra")).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { .. }));
        store.insert_candidate(candidate("4", "Duda")).await.unwrap();
        assert_eq!(store.get_all_candidates().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_update_unknown_candidate_is_rejected() {
        let store = store();
        let err = store.update_candidate(candidate("42", "X")).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));

        store.update_candidate(candidate("1", "Ana Lima")).await.unwrap();
        let all = store.get_all_candidates().await.unwrap();
        assert_eq!(all[0].name, "Ana Lima");
    }
}
