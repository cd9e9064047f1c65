//! Two-phase beatmap resolution.
//!
//! Phase one scans the player's profile event feed: event descriptions
//! embed the displayed map name and one feed fetch covers the whole
//! recent window, so this is cheap. Feeds are newest-first and the first
//! matching event wins. Phase two, used only when the scan finds
//! nothing, walks the player's recent plays and fetches metadata for
//! each one; more expensive, but it covers plays that never made an
//! event (practice runs, second attempts).

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::osu::{Beatmap, OsuApi, OsuApiError};

/// Default bound for the recent-plays fallback batch.
const DEFAULT_RECENT_LIMIT: u32 = 50;

#[derive(Debug, Error)]
pub enum ResolveError {
    /// Neither lookup phase produced a matching beatmap.
    #[error("no beatmap found for '{identity}'")]
    NotFound { identity: String },

    #[error(transparent)]
    Api(#[from] OsuApiError),
}

/// Resolves a (player, map identity) pair to an exact beatmap record.
pub struct BeatmapResolver {
    api: Arc<dyn OsuApi>,
    recent_limit: u32,
}

impl BeatmapResolver {
    pub fn new(api: Arc<dyn OsuApi>) -> Self {
        Self {
            api,
            recent_limit: DEFAULT_RECENT_LIMIT,
        }
    }

    pub fn with_recent_limit(mut self, limit: u32) -> Self {
        self.recent_limit = limit;
        self
    }

    /// Returns the beatmap the identity refers to, or a not-found error
    /// after both phases have been tried.
    pub async fn resolve(&self, player: &str, identity: &str) -> Result<Beatmap, ResolveError> {
        let not_found = || ResolveError::NotFound {
            identity: identity.to_string(),
        };

        let beatmap_id = match self.scan_events(player, identity).await? {
            Some(id) => Some(id),
            None => self.scan_recent_plays(player, identity).await?,
        };

        let beatmap_id = beatmap_id.ok_or_else(not_found)?;
        let map = self.api.beatmap(beatmap_id).await?.ok_or_else(not_found)?;
        Ok(map)
    }

    /// Phase one: case-insensitive substring search over the event feed,
    /// in feed order. The first hit wins; later matching events in the
    /// same feed do not override it.
    async fn scan_events(&self, player: &str, identity: &str) -> Result<Option<u64>, ResolveError> {
        let events = self.api.user_events(player).await?;
        for event in events {
            if event.display_html.to_lowercase().contains(identity) {
                debug!("event scan hit: beatmap {}", event.beatmap_id);
                return Ok(Some(event.beatmap_id));
            }
        }
        debug!("event scan found nothing for '{}'", identity);
        Ok(None)
    }

    /// Phase two: walk recent plays, fetch each play's beatmap and
    /// compare the reconstructed identity for exact equality.
    async fn scan_recent_plays(
        &self,
        player: &str,
        identity: &str,
    ) -> Result<Option<u64>, ResolveError> {
        let plays = self.api.recent_plays(player, self.recent_limit).await?;
        for play in plays {
            let Some(map) = self.api.beatmap(play.beatmap_id).await? else {
                continue;
            };
            if map.identity() == identity {
                debug!("recent-plays hit: beatmap {}", map.beatmap_id);
                return Ok(Some(map.beatmap_id));
            }
        }
        Ok(None)
    }
}
