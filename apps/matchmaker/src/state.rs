use std::sync::Arc;

use crate::analysis::resume_source::ResumeSource;
use crate::config::Config;
use crate::llm_client::CompletionService;
use crate::matching::embedding::Embedder;
use crate::store::AnalysisStore;

/// Shared application state injected into all route handlers via Axum extractors.
/// Every collaborator is a trait object.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn AnalysisStore>,
    pub llm: Arc<dyn CompletionService>,
    /// Default: OllamaEmbedder. `EMBEDDING_BACKEND=hash` selects the offline HashEmbedder.
    pub embedder: Arc<dyn Embedder>,
    pub resumes: Arc<dyn ResumeSource>,
    pub config: Config,
}
