use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::analysis::orchestrator::{
    AnalyzerConfig, DEFAULT_CONCURRENCY, DEFAULT_LLM_CALL_TIMEOUT, DEFAULT_SCORE_MAX_ATTEMPTS,
};
use crate::llm_client::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::matching::embedding::{DEFAULT_EMBED_MODEL, DEFAULT_OLLAMA_URL};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingBackend {
    Ollama,
    Hash,
}

impl FromStr for EmbeddingBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ollama" => Ok(EmbeddingBackend::Ollama),
            "hash" => Ok(EmbeddingBackend::Hash),
            other => bail!("EMBEDDING_BACKEND must be 'ollama' or 'hash', got '{other}'"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing or a value does not parse.
#[derive(Debug, Clone)]
pub struct Config {
    pub llm_api_key: String,
    pub llm_base_url: String,
    pub llm_model: String,
    /// PostgreSQL store when set; in-memory store otherwise.
    pub database_url: Option<String>,
    pub dataset_dir: PathBuf,
    pub embedding_backend: EmbeddingBackend,
    pub ollama_url: String,
    pub embed_model: String,
    pub analysis_concurrency: usize,
    pub score_max_attempts: u32,
    pub llm_call_timeout: Duration,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            llm_api_key: require_env("LLM_API_KEY")?,
            llm_base_url: env_or("LLM_BASE_URL", DEFAULT_BASE_URL),
            llm_model: env_or("LLM_MODEL", DEFAULT_MODEL),
            database_url: std::env::var("DATABASE_URL").ok().filter(|v| !v.trim().is_empty()),
            dataset_dir: PathBuf::from(env_or("DATASET_DIR", "documents")),
            embedding_backend: parse_env("EMBEDDING_BACKEND", EmbeddingBackend::Ollama)?,
            ollama_url: env_or("OLLAMA_URL", DEFAULT_OLLAMA_URL),
            embed_model: env_or("EMBED_MODEL", DEFAULT_EMBED_MODEL),
            analysis_concurrency: parse_env("ANALYSIS_CONCURRENCY", DEFAULT_CONCURRENCY)?,
            score_max_attempts: parse_env("SCORE_MAX_ATTEMPTS", DEFAULT_SCORE_MAX_ATTEMPTS)?,
            llm_call_timeout: Duration::from_secs(parse_env(
                "LLM_CALL_TIMEOUT_SECS",
                DEFAULT_LLM_CALL_TIMEOUT.as_secs(),
            )?),
            port: parse_env("PORT", 8080)?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }

    pub fn analyzer(&self) -> AnalyzerConfig {
        AnalyzerConfig {
            max_concurrency: self.analysis_concurrency.max(1),
            score_max_attempts: self.score_max_attempts.max(1),
            llm_call_timeout: self.llm_call_timeout,
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{key} has an invalid value '{raw}': {e}")),
        Err(_) => Ok(default),
    }
}
