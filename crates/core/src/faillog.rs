//! Failure log collaborator.
//!
//! Resolution and recalculation failures are appended as single
//! human-readable lines keyed by a timestamp. Rotation and naming of the
//! destination are out of scope; a log write that itself fails is
//! reported through tracing and otherwise ignored, so logging can never
//! take the pipeline down.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Local;
use tokio::io::AsyncWriteExt;
use tracing::error;

/// Append-only sink for pipeline failure records.
#[async_trait]
pub trait FailureLog: Send + Sync {
    /// Appends one event line. Implementations add the timestamp.
    async fn record(&self, line: &str);
}

/// Failure log backed by a line-oriented file.
pub struct FileFailureLog {
    path: PathBuf,
}

impl FileFailureLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn append(&self, line: &str) -> Result<(), std::io::Error> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        let stamp = Local::now().format("%m-%d-%Y %H:%M:%S");
        file.write_all(format!("{} {}\n", stamp, line).as_bytes())
            .await?;
        Ok(())
    }
}

#[async_trait]
impl FailureLog for FileFailureLog {
    async fn record(&self, line: &str) {
        if let Err(e) = self.append(line).await {
            error!("failed to write failure log {:?}: {}", self.path, e);
        }
    }
}
