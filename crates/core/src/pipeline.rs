//! The resolve-recompute-compose pipeline.
//!
//! One invocation per title: parse the title, resolve the beatmap,
//! recalculate difficulty under the parsed modifier set, compose the
//! comment. Every entity lives for exactly one run; nothing is shared
//! across invocations.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::faillog::FailureLog;
use crate::recalc::DifficultyRecalculator;
use crate::report::{self, ReportConfig};
use crate::resolver::BeatmapResolver;
use crate::title::parse_title;

/// A candidate post handed to the pipeline.
#[derive(Debug, Clone)]
pub struct IncomingPost {
    pub title: String,
    /// Whether the source is a link (non-text) post; those are rejected.
    pub is_link: bool,
}

/// What one pipeline run produced. A title either yields a fully
/// composed comment or nothing; partial reports are never emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// The post is not a score post; skipped silently.
    NotApplicable,
    /// Both lookup phases failed or a lookup fault occurred; logged.
    ResolutionFailed,
    /// The finished comment text.
    Comment(String),
}

/// Ties the parser, resolver, recalculator and composer together.
pub struct Pipeline {
    resolver: BeatmapResolver,
    recalc: DifficultyRecalculator,
    report: ReportConfig,
    faillog: Option<Arc<dyn FailureLog>>,
}

impl Pipeline {
    pub fn new(
        resolver: BeatmapResolver,
        recalc: DifficultyRecalculator,
        report: ReportConfig,
    ) -> Self {
        Self {
            resolver,
            recalc,
            report,
            faillog: None,
        }
    }

    /// Sets the failure log used for resolution failures.
    pub fn with_faillog(mut self, faillog: Arc<dyn FailureLog>) -> Self {
        self.faillog = Some(faillog);
        self
    }

    /// Runs the full pipeline over one post.
    pub async fn handle(&self, post: &IncomingPost) -> PipelineOutcome {
        if post.is_link {
            debug!("skipping link post '{}'", post.title);
            return PipelineOutcome::NotApplicable;
        }

        let parsed = match parse_title(&post.title) {
            Ok(parsed) => parsed,
            Err(e) => {
                debug!("not a score post ({}): '{}'", e, post.title);
                return PipelineOutcome::NotApplicable;
            }
        };

        let map = match self.resolver.resolve(&parsed.player, &parsed.identity).await {
            Ok(map) => map,
            Err(e) => {
                warn!("resolution failed for '{}': {}", post.title, e);
                if let Some(ref faillog) = self.faillog {
                    faillog
                        .record(&format!("map retrieval failed for '{}': {}", post.title, e))
                        .await;
                }
                return PipelineOutcome::ResolutionFailed;
            }
        };

        info!(
            "resolved '{}' to beatmap {} ({})",
            post.title,
            map.beatmap_id,
            map.display_name()
        );

        let profile = self.recalc.recalculate(&map, &parsed.mods).await;
        let comment = report::compose(&map, &profile, &parsed.mods, &self.report);
        PipelineOutcome::Comment(comment)
    }
}
