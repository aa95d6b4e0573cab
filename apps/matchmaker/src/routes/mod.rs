pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::matching::handlers as matching;
use crate::records::handlers as records;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Jobs and prospects
        .route("/api/v1/jobs", get(records::handle_list_jobs))
        .route("/api/v1/jobs/:job_id", get(records::handle_get_job))
        .route(
            "/api/v1/jobs/:job_id/prospects",
            get(records::handle_job_prospects),
        )
        .route(
            "/api/v1/jobs/:job_id/candidates",
            get(records::handle_job_candidates),
        )
        // Candidates
        .route("/api/v1/candidates", post(records::handle_create_candidate))
        .route(
            "/api/v1/candidates/:id",
            put(records::handle_update_candidate),
        )
        // Matching
        .route(
            "/api/v1/jobs/:job_id/matches",
            get(matching::handle_job_matches),
        )
        .route("/api/v1/matches", post(matching::handle_query_matches))
        // Analysis
        .route(
            "/api/v1/jobs/:job_id/analyses",
            post(analysis::handle_run_analysis).get(analysis::handle_list_analyses),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::analysis::resume_source::FileResumeReader;
    use crate::config::{Config, EmbeddingBackend};
    use crate::llm_client::{CompletionService, LlmError};
    use crate::matching::embedding::HashEmbedder;
    use crate::records::dataset::Dataset;
    use crate::store::memory::tests::{candidate, job, prospect};
    use crate::store::memory::InMemoryStore;

    struct SilentLlm;

    #[async_trait]
    impl CompletionService for SilentLlm {
        async fn complete(&self, _prompt: &str) -> Result<String, LlmError> {
            Err(LlmError::EmptyContent)
        }
    }

    fn test_state() -> AppState {
        let mut rust_dev = candidate("1", "Ana");
        rust_dev.searchable_text = "desenvolvedora rust backend".to_string();
        let mut accountant = candidate("2", "Bruno");
        accountant.searchable_text = "contador fiscal".to_string();

        let store = InMemoryStore::new(Dataset {
            candidates: vec![accountant, rust_dev],
            jobs: vec![job("J1", "Desenvolvedora Rust"), job("J2", "Vazia")],
            prospects: vec![prospect("J1", "1"), prospect("J1", "2")],
        });

        AppState {
            store: Arc::new(store),
            llm: Arc::new(SilentLlm),
            embedder: Arc::new(HashEmbedder::default()),
            resumes: Arc::new(FileResumeReader::default()),
            config: Config {
                llm_api_key: "test".to_string(),
                llm_base_url: "http://localhost".to_string(),
                llm_model: "test-model".to_string(),
                database_url: None,
                dataset_dir: PathBuf::from("documents"),
                embedding_backend: EmbeddingBackend::Hash,
                ollama_url: "http://localhost:11434".to_string(),
                embed_model: "all-minilm".to_string(),
                analysis_concurrency: 1,
                score_max_attempts: 1,
                llm_call_timeout: Duration::from_secs(1),
                port: 0,
                rust_log: "info".to_string(),
            },
        }
    }

    async fn send(request: Request<Body>) -> (StatusCode, Value) {
        let response = build_router(test_state()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["service"], "matchmaker");
        assert_eq!(body["embedding_model"], "feature-hash");
    }

    #[tokio::test]
    async fn test_jobs_and_unknown_job() {
        let (status, body) = send(get("/api/v1/jobs")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 2);

        let (status, body) = send(get("/api/v1/jobs/J9")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_job_candidates_follow_prospects() {
        let (status, body) = send(get("/api/v1/jobs/J1/candidates")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["id"], "1");
        assert_eq!(body[1]["id"], "2");
    }

    #[tokio::test]
    async fn test_job_matches_rank_by_title() {
        let (status, body) = send(get("/api/v1/jobs/J1/matches?limit=1")).await;
        assert_eq!(status, StatusCode::OK);
        let matches = body["matches"].as_array().unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0]["candidate"]["id"], "1");
    }

    #[tokio::test]
    async fn test_query_matches_reject_unknown_required_field() {
        let (status, _) = send(get("/api/v1/jobs/J1/matches?require=salary")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(json_request("POST", "/api/v1/matches", json!({"query": "  "}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_candidate_rejects_duplicate() {
        let body = json!({
            "id": "1",
            "record": {"infos_basicas": {"nome": "Outra Ana"}}
        });
        let (status, body) = send(json_request("POST", "/api/v1/candidates", body)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn test_create_candidate_normalizes_record() {
        let body = json!({
            "id": "77",
            "record": {
                "infos_basicas": {"nome": "  Carla\tDias ", "email": ""},
                "informacoes_profissionais": {"remuneracao": "R$ 1.234,56"}
            }
        });
        let (status, body) = send(json_request("POST", "/api/v1/candidates", body)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["name"], "Carla Dias");
        assert_eq!(body["email"], "sem informacao");
        assert_eq!(body["remuneration"], 1234.56);
    }

    #[tokio::test]
    async fn test_update_unknown_candidate_is_not_found() {
        let (status, _) = send(json_request("PUT", "/api/v1/candidates/404", json!({}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_analysis_of_job_without_candidates() {
        let (status, body) = send(json_request("POST", "/api/v1/jobs/J2/analyses", json!({}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "UNPROCESSABLE_ENTITY");

        let (status, body) = send(get("/api/v1/jobs/J1/analyses")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.as_array().unwrap().is_empty());
    }
}
