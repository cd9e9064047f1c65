//! Mock difficulty analyzer for testing.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::mods::ModSet;
use crate::recalc::{AnalyzerError, DifficultyAnalyzer};

/// Mock implementation of the `DifficultyAnalyzer` trait.
///
/// Returns a configurable output text (a parseable sample by default)
/// and records every invocation for assertions.
#[derive(Debug, Clone)]
pub struct MockAnalyzer {
    output: Arc<RwLock<String>>,
    fail_next: Arc<RwLock<bool>>,
    calls: Arc<RwLock<Vec<(PathBuf, String)>>>,
}

impl Default for MockAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAnalyzer {
    pub fn new() -> Self {
        Self {
            output: Arc::new(RwLock::new(
                "od7.0 ar9.0 cs4.0 hp5.0\n5.10 stars".to_string(),
            )),
            fail_next: Arc::new(RwLock::new(false)),
            calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Set the text the analyzer will print.
    pub async fn set_output(&self, text: &str) {
        *self.output.write().await = text.to_string();
    }

    /// Make the next invocation fail.
    pub async fn fail_next(&self) {
        *self.fail_next.write().await = true;
    }

    /// Recorded `(beatmap_path, mod_label)` invocations.
    pub async fn calls(&self) -> Vec<(PathBuf, String)> {
        self.calls.read().await.clone()
    }
}

#[async_trait]
impl DifficultyAnalyzer for MockAnalyzer {
    async fn analyze(&self, beatmap_path: &Path, mods: &ModSet) -> Result<String, AnalyzerError> {
        self.calls
            .write()
            .await
            .push((beatmap_path.to_path_buf(), mods.label()));

        let mut fail = self.fail_next.write().await;
        if *fail {
            *fail = false;
            return Err(AnalyzerError::ToolFailed {
                code: Some(1),
                stderr: "mock failure".to_string(),
            });
        }

        Ok(self.output.read().await.clone())
    }
}
