//! Resume text retrieval.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ResumeError {
    #[error("could not read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not extract text from '{path}': {message}")]
    Pdf { path: String, message: String },

    #[error("resume '{path}' has no text")]
    Empty { path: String },

    #[error("unsupported resume format: '{path}'")]
    UnsupportedFormat { path: String },

    #[error("extraction task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[async_trait]
pub trait ResumeSource: Send + Sync {
    /// Plain text of the resume at `path`. Blank text is an error.
    async fn read_text(&self, path: &str) -> Result<String, ResumeError>;
}

/// Reads resumes from disk. PDFs go through `pdf-extract`; `.txt` and `.md`
/// files are read as-is. Relative paths resolve against `base_dir`.
#[derive(Debug, Clone, Default)]
pub struct FileResumeReader {
    base_dir: Option<PathBuf>,
}

impl FileResumeReader {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
        }
    }

    async fn resolve(&self, path: &str) -> PathBuf {
        let candidate = Path::new(path);
        match &self.base_dir {
            Some(base) if candidate.is_relative() => {
                let exists = tokio::fs::try_exists(candidate).await.unwrap_or(false);
                if exists {
                    candidate.to_path_buf()
                } else {
                    base.join(candidate)
                }
            }
            _ => candidate.to_path_buf(),
        }
    }
}

#[async_trait]
impl ResumeSource for FileResumeReader {
    async fn read_text(&self, path: &str) -> Result<String, ResumeError> {
        let resolved = self.resolve(path).await;
        let extension = resolved
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let bytes = tokio::fs::read(&resolved).await.map_err(|source| ResumeError::Io {
            path: path.to_string(),
            source,
        })?;

        let text = match extension.as_str() {
            "pdf" => {
                let owned = path.to_string();
                tokio::task::spawn_blocking(move || {
                    pdf_extract::extract_text_from_mem(&bytes).map_err(|e| ResumeError::Pdf {
                        path: owned,
                        message: e.to_string(),
                    })
                })
                .await??
            }
            "txt" | "md" => String::from_utf8_lossy(&bytes).into_owned(),
            _ => {
                return Err(ResumeError::UnsupportedFormat {
                    path: path.to_string(),
                })
            }
        };

        if text.trim().is_empty() {
            return Err(ResumeError::Empty {
                path: path.to_string(),
            });
        }

        debug!(path = %path, chars = text.len(), "Resume text loaded");
        Ok(text)
    }
}
