mod analysis;
mod config;
mod errors;
mod llm_client;
mod matching;
mod models;
mod records;
mod routes;
mod state;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::resume_source::FileResumeReader;
use crate::config::{Config, EmbeddingBackend};
use crate::llm_client::LlmClient;
use crate::matching::embedding::{Embedder, HashEmbedder, OllamaEmbedder};
use crate::records::dataset::Dataset;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::memory::InMemoryStore;
use crate::store::postgres::PgStore;
use crate::store::AnalysisStore;

const PG_MAX_CONNECTIONS: u32 = 10;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Matchmaker API v{}", env!("CARGO_PKG_VERSION"));

    let store = build_store(&config).await?;

    // Initialize LLM client
    let llm = LlmClient::new(
        config.llm_base_url.clone(),
        config.llm_api_key.clone(),
        config.llm_model.clone(),
    )?;
    info!("LLM client initialized (model: {})", llm.model());

    let embedder: Arc<dyn Embedder> = match config.embedding_backend {
        EmbeddingBackend::Ollama => Arc::new(OllamaEmbedder::new(
            config.ollama_url.clone(),
            config.embed_model.clone(),
        )),
        EmbeddingBackend::Hash => Arc::new(HashEmbedder::default()),
    };
    info!("Embedder initialized (model: {})", embedder.model_name());

    let resumes = Arc::new(FileResumeReader::new(config.dataset_dir.clone()));

    // Build app state
    let state = AppState {
        store,
        llm: Arc::new(llm),
        embedder,
        resumes,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// PostgreSQL when `DATABASE_URL` is set (seeded from the dataset directory if
/// present), otherwise an in-memory store loaded from the dataset directory.
async fn build_store(config: &Config) -> Result<Arc<dyn AnalysisStore>> {
    let dataset_present = config.dataset_dir.is_dir();

    match &config.database_url {
        Some(url) => {
            let store = PgStore::connect(url, PG_MAX_CONNECTIONS).await?;
            if dataset_present {
                let dataset = Dataset::load_dir(&config.dataset_dir)?;
                store.import_dataset(&dataset).await?;
            }
            Ok(Arc::new(store))
        }
        None => {
            let dataset = if dataset_present {
                Dataset::load_dir(&config.dataset_dir)?
            } else {
                warn!(
                    "Dataset directory {} not found; starting with an empty store",
                    config.dataset_dir.display()
                );
                Dataset::default()
            };
            Ok(Arc::new(InMemoryStore::new(dataset)))
        }
    }
}
