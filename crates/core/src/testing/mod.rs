//! Testing utilities and mock implementations.
//!
//! Mock implementations of the collaborator traits (`OsuApi`,
//! `DifficultyAnalyzer`, `FailureLog`) so the pipeline can be exercised
//! end-to-end without network access or the real analysis tool.

mod mock_analyzer;
mod mock_osu_api;

pub use mock_analyzer::MockAnalyzer;
pub use mock_osu_api::MockOsuApi;

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::faillog::FailureLog;

/// Failure log that records lines in memory for assertions.
#[derive(Debug, Clone, Default)]
pub struct MemoryFailureLog {
    lines: Arc<RwLock<Vec<String>>>,
}

impl MemoryFailureLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lines(&self) -> Vec<String> {
        self.lines.read().await.clone()
    }
}

#[async_trait]
impl FailureLog for MemoryFailureLog {
    async fn record(&self, line: &str) {
        self.lines.write().await.push(line.to_string());
    }
}

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::osu::Beatmap;

    /// Create a test beatmap with reasonable defaults.
    pub fn beatmap(beatmap_id: u64, artist: &str, title: &str, version: &str) -> Beatmap {
        Beatmap {
            beatmap_id,
            artist: artist.to_string(),
            title: title.to_string(),
            version: version.to_string(),
            creator: "mapper".to_string(),
            stars: 4.5,
            approach_rate: 8.0,
            circle_size: 4.0,
            overall_difficulty: 7.0,
            hp_drain: 5.0,
            total_length: 125,
            bpm: 180.0,
            playcount: 1000,
        }
    }
}
