//! External difficulty-analysis tool invocation.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

use crate::mods::ModSet;

/// Errors from running the analysis tool.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// Tool binary not found.
    #[error("analysis tool not found at path: {path}")]
    ToolNotFound { path: PathBuf },

    /// Tool exited with a non-success status.
    #[error("analysis tool failed (exit code {code:?}): {stderr}")]
    ToolFailed { code: Option<i32>, stderr: String },

    /// Tool ran past the configured timeout.
    #[error("analysis tool timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// I/O error while running the tool.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Analyzer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OppaiConfig {
    /// Path to the oppai binary (default: "oppai", resolved via PATH).
    #[serde(default = "default_path")]
    pub path: PathBuf,
    /// Tool timeout in seconds (default: 30).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_path() -> PathBuf {
    PathBuf::from("oppai")
}

fn default_timeout() -> u64 {
    30
}

impl Default for OppaiConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Runs a difficulty analysis over a local beatmap file and returns the
/// tool's unstructured text output.
#[async_trait]
pub trait DifficultyAnalyzer: Send + Sync {
    async fn analyze(&self, beatmap_path: &Path, mods: &ModSet) -> Result<String, AnalyzerError>;
}

/// oppai-based analyzer implementation.
pub struct OppaiAnalyzer {
    config: OppaiConfig,
}

impl OppaiAnalyzer {
    pub fn new(config: OppaiConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(OppaiConfig::default())
    }
}

#[async_trait]
impl DifficultyAnalyzer for OppaiAnalyzer {
    async fn analyze(&self, beatmap_path: &Path, mods: &ModSet) -> Result<String, AnalyzerError> {
        let mut command = Command::new(&self.config.path);
        command
            .arg(beatmap_path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if !mods.is_empty() {
            command.arg(mods.label());
        }

        debug!("running {:?} on {:?} with {}", self.config.path, beatmap_path, mods);

        let run = command.output();
        let output = match timeout(Duration::from_secs(self.config.timeout_secs), run).await {
            Ok(result) => result.map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    AnalyzerError::ToolNotFound {
                        path: self.config.path.clone(),
                    }
                } else {
                    AnalyzerError::Io(e)
                }
            })?,
            Err(_) => {
                return Err(AnalyzerError::Timeout {
                    timeout_secs: self.config.timeout_secs,
                })
            }
        };

        if !output.status.success() {
            return Err(AnalyzerError::ToolFailed {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
