//! Difficulty recalculation under a modifier set.
//!
//! The nomod profile comes straight from the beatmap record. When the
//! modifier set actually changes difficulty attributes, the beatmap file
//! is fetched into a uniquely named temporary file, the external
//! analysis tool is run over it, and its output is parsed into the
//! modded half of the profile. Failures on that path degrade to the
//! nomod-only profile instead of aborting the report.

mod oppai;
mod output;

pub use oppai::{AnalyzerError, DifficultyAnalyzer, OppaiAnalyzer, OppaiConfig};
pub use output::{parse_output, OutputParseError, ToolOutput};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::faillog::FailureLog;
use crate::mods::ModSet;
use crate::osu::{Beatmap, OsuApi, OsuApiError};

/// EZ halves the drain rate.
const EZ_HP_SCALAR: f64 = 0.5;
/// HR scales drain by 1.4, clamped at the attribute maximum.
const HR_HP_SCALAR: f64 = 1.4;
const HP_MAX: f64 = 10.0;

/// Errors on the recalculation path. Callers never see these directly;
/// they are logged and the profile degrades to nomod-only.
#[derive(Debug, Error)]
pub enum RecalcError {
    #[error("beatmap download failed: {0}")]
    Download(#[from] OsuApiError),

    #[error(transparent)]
    Analyzer(#[from] AnalyzerError),

    #[error(transparent)]
    Output(#[from] OutputParseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Recalculator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecalcConfig {
    /// Directory for temporary beatmap files (default: the system temp dir).
    #[serde(default = "default_temp_dir")]
    pub temp_dir: PathBuf,
}

fn default_temp_dir() -> PathBuf {
    std::env::temp_dir()
}

impl Default for RecalcConfig {
    fn default() -> Self {
        Self {
            temp_dir: default_temp_dir(),
        }
    }
}

/// The five tracked difficulty attributes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiffValues {
    pub sr: f64,
    pub ar: f64,
    pub cs: f64,
    pub od: f64,
    pub hp: f64,
}

impl DiffValues {
    /// The unmodified attributes of a beatmap record, star rating rounded
    /// to two decimals.
    pub fn nomod(map: &Beatmap) -> Self {
        Self {
            sr: round2(map.stars),
            ar: map.approach_rate,
            cs: map.circle_size,
            od: map.overall_difficulty,
            hp: map.hp_drain,
        }
    }
}

/// Nomod attributes, plus the recomputed attributes when a qualifying
/// modifier set was applied.
///
/// The pair form is present exactly when recomputation ran: it is
/// triggered by the presence of a standard modifier, not by any value
/// actually differing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyProfile {
    pub nomod: DiffValues,
    pub modded: Option<DiffValues>,
}

/// Recomputes difficulty attributes for a beatmap under a modifier set.
pub struct DifficultyRecalculator {
    api: Arc<dyn OsuApi>,
    analyzer: Arc<dyn DifficultyAnalyzer>,
    config: RecalcConfig,
    faillog: Option<Arc<dyn FailureLog>>,
}

impl DifficultyRecalculator {
    pub fn new(
        api: Arc<dyn OsuApi>,
        analyzer: Arc<dyn DifficultyAnalyzer>,
        config: RecalcConfig,
    ) -> Self {
        Self {
            api,
            analyzer,
            config,
            faillog: None,
        }
    }

    /// Sets the failure log used when recalculation degrades.
    pub fn with_faillog(mut self, faillog: Arc<dyn FailureLog>) -> Self {
        self.faillog = Some(faillog);
        self
    }

    /// Returns the difficulty profile for a beatmap under the given mods.
    ///
    /// Recomputation is skipped when the set is empty, made solely of
    /// codes that cannot change difficulty attributes, or contains an
    /// unrecognized code. A failed recomputation degrades to the
    /// nomod-only profile.
    pub async fn recalculate(&self, map: &Beatmap, mods: &ModSet) -> DifficultyProfile {
        let nomod = DiffValues::nomod(map);

        if !mods.requires_recalc() {
            debug!("no recalculation needed for {} ({})", map.beatmap_id, mods);
            return DifficultyProfile { nomod, modded: None };
        }

        match self.modded_values(map, mods).await {
            Ok(modded) => DifficultyProfile {
                nomod,
                modded: Some(modded),
            },
            Err(e) => {
                warn!(
                    "recalculation failed for beatmap {}, falling back to nomod: {}",
                    map.beatmap_id, e
                );
                if let Some(ref faillog) = self.faillog {
                    faillog
                        .record(&format!(
                            "recalculation failed for beatmap {} with {}: {}",
                            map.beatmap_id, mods, e
                        ))
                        .await;
                }
                DifficultyProfile { nomod, modded: None }
            }
        }
    }

    async fn modded_values(&self, map: &Beatmap, mods: &ModSet) -> Result<DiffValues, RecalcError> {
        let body = self.api.download_beatmap(map.beatmap_id).await?;
        let temp = TempBeatmap::write(&self.config.temp_dir, &body).await?;

        let text = self.analyzer.analyze(temp.path(), mods).await?;
        let parsed = parse_output(&text)?;

        Ok(DiffValues {
            sr: round2(parsed.stars),
            ar: parsed.ar,
            cs: parsed.cs,
            od: parsed.od,
            hp: scaled_hp(map.hp_drain, mods),
        })
    }
}

/// The analysis tool does not model drain-rate changes, so HP is scaled
/// manually. EZ takes precedence over HR; any other combination leaves
/// the base value untouched.
fn scaled_hp(base: f64, mods: &ModSet) -> f64 {
    if mods.contains("EZ") {
        round2(base * EZ_HP_SCALAR)
    } else if mods.contains("HR") {
        round2(base * HR_HP_SCALAR).min(HP_MAX)
    } else {
        base
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// A downloaded beatmap file with a unique name, removed on drop so the
/// success, parse-failure and tool-failure paths all clean up.
struct TempBeatmap {
    path: PathBuf,
}

impl TempBeatmap {
    async fn write(dir: &Path, contents: &str) -> Result<Self, std::io::Error> {
        let path = dir.join(format!("{}.osu", Uuid::new_v4()));
        tokio::fs::write(&path, contents).await?;
        Ok(Self { path })
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempBeatmap {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            warn!("failed to remove temp beatmap {:?}: {}", self.path, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixtures, MemoryFailureLog, MockAnalyzer, MockOsuApi};

    fn recalculator(api: &MockOsuApi, analyzer: &MockAnalyzer) -> DifficultyRecalculator {
        DifficultyRecalculator::new(
            Arc::new(api.clone()),
            Arc::new(analyzer.clone()),
            RecalcConfig::default(),
        )
    }

    #[test]
    fn test_scaled_hp_ez_halves() {
        assert_eq!(scaled_hp(7.0, &ModSet::parse("+EZ")), 3.5);
        assert_eq!(scaled_hp(5.0, &ModSet::parse("+EZDT")), 2.5);
    }

    #[test]
    fn test_scaled_hp_hr_caps_at_ten() {
        assert_eq!(scaled_hp(5.0, &ModSet::parse("+HR")), 7.0);
        assert_eq!(scaled_hp(8.0, &ModSet::parse("+HR")), 10.0);
    }

    #[test]
    fn test_scaled_hp_ez_precedes_hr() {
        assert_eq!(scaled_hp(6.0, &ModSet::parse("+EZHR")), 3.0);
    }

    #[test]
    fn test_scaled_hp_other_mods_leave_base() {
        assert_eq!(scaled_hp(6.0, &ModSet::parse("+HDDT")), 6.0);
        assert_eq!(scaled_hp(6.0, &ModSet::empty()), 6.0);
    }

    #[test]
    fn test_nomod_values_round_sr() {
        let mut map = fixtures::beatmap(1, "a", "b", "c");
        map.stars = 7.0335;
        let values = DiffValues::nomod(&map);
        assert_eq!(values.sr, 7.03);
    }

    #[tokio::test]
    async fn test_skip_for_empty_mods() {
        let api = MockOsuApi::new();
        let analyzer = MockAnalyzer::new();
        let map = fixtures::beatmap(1, "a", "b", "c");

        let profile = recalculator(&api, &analyzer)
            .recalculate(&map, &ModSet::empty())
            .await;
        assert!(profile.modded.is_none());
        assert!(analyzer.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_skip_for_ignored_only_mods() {
        let api = MockOsuApi::new();
        let analyzer = MockAnalyzer::new();
        let map = fixtures::beatmap(1, "a", "b", "c");

        let profile = recalculator(&api, &analyzer)
            .recalculate(&map, &ModSet::parse("+HDSD"))
            .await;
        assert!(profile.modded.is_none());
        assert!(analyzer.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_skip_for_unknown_code() {
        let api = MockOsuApi::new();
        let analyzer = MockAnalyzer::new();
        let map = fixtures::beatmap(1, "a", "b", "c");

        let profile = recalculator(&api, &analyzer)
            .recalculate(&map, &ModSet::parse("+DTXX"))
            .await;
        assert!(profile.modded.is_none());
        assert!(analyzer.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_standard_mods_run_the_tool() {
        let api = MockOsuApi::new();
        api.set_beatmap_file(1, "osu file format v14").await;
        let analyzer = MockAnalyzer::new();
        analyzer
            .set_output("od7.5 ar9.0 cs4.0 hp5.0\n5.10 stars")
            .await;
        let mut map = fixtures::beatmap(1, "a", "b", "c");
        map.stars = 4.5;
        map.approach_rate = 8.0;
        map.circle_size = 4.0;
        map.overall_difficulty = 7.0;
        map.hp_drain = 5.0;

        let profile = recalculator(&api, &analyzer)
            .recalculate(&map, &ModSet::parse("+HDDT"))
            .await;

        let modded = profile.modded.unwrap();
        assert_eq!(profile.nomod.sr, 4.5);
        assert_eq!(modded.sr, 5.10);
        assert_eq!(modded.ar, 9.0);
        assert_eq!(modded.cs, 4.0);
        assert_eq!(modded.od, 7.5);
        // No EZ/HR present, drain stays at the base value.
        assert_eq!(modded.hp, 5.0);
    }

    #[tokio::test]
    async fn test_tool_failure_degrades_to_nomod_and_logs() {
        let api = MockOsuApi::new();
        api.set_beatmap_file(1, "osu file format v14").await;
        let analyzer = MockAnalyzer::new();
        analyzer.fail_next().await;
        let faillog = Arc::new(MemoryFailureLog::new());
        let map = fixtures::beatmap(1, "a", "b", "c");

        let profile = recalculator(&api, &analyzer)
            .with_faillog(faillog.clone())
            .recalculate(&map, &ModSet::parse("+HR"))
            .await;

        assert!(profile.modded.is_none());
        let lines = faillog.lines().await;
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("recalculation failed"));
    }

    #[tokio::test]
    async fn test_download_failure_degrades_to_nomod() {
        let api = MockOsuApi::new(); // No beatmap file registered.
        let analyzer = MockAnalyzer::new();
        let map = fixtures::beatmap(1, "a", "b", "c");

        let profile = recalculator(&api, &analyzer)
            .recalculate(&map, &ModSet::parse("+DT"))
            .await;
        assert!(profile.modded.is_none());
        assert!(analyzer.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_temp_beatmap_is_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = {
            let temp = TempBeatmap::write(dir.path(), "contents").await.unwrap();
            assert!(temp.path().exists());
            temp.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_temp_files_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let a = TempBeatmap::write(dir.path(), "a").await.unwrap();
        let b = TempBeatmap::write(dir.path(), "b").await.unwrap();
        assert_ne!(a.path(), b.path());
    }
}
