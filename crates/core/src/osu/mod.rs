//! osu! API collaborator.
//!
//! Four read-only calls are needed by the pipeline: the profile event
//! feed, the recent-plays batch, beatmap metadata by id, and the raw
//! `.osu` file download. The trait keeps the pipeline testable without
//! real network access.

mod client;
mod types;

pub use client::{OsuApiClient, OsuApiConfig};
pub use types::{Beatmap, RecentPlay, UserEvent};

use async_trait::async_trait;
use thiserror::Error;

/// Errors from the osu! API collaborator.
#[derive(Debug, Error)]
pub enum OsuApiError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse a response.
    #[error("failed to parse API response: {0}")]
    Parse(String),

    /// The API answered with an empty result where one was required.
    #[error("empty API response: {0}")]
    Empty(String),
}

/// Read-only client for the game's public API.
#[async_trait]
pub trait OsuApi: Send + Sync {
    /// Fetches a player's profile event feed, in feed order.
    async fn user_events(&self, user: &str) -> Result<Vec<UserEvent>, OsuApiError>;

    /// Fetches a player's most recent plays, newest first, bounded by `limit`.
    async fn recent_plays(&self, user: &str, limit: u32) -> Result<Vec<RecentPlay>, OsuApiError>;

    /// Fetches beatmap metadata by id. `None` means the API returned an
    /// empty result for that id.
    async fn beatmap(&self, beatmap_id: u64) -> Result<Option<Beatmap>, OsuApiError>;

    /// Downloads the raw `.osu` file for a beatmap.
    async fn download_beatmap(&self, beatmap_id: u64) -> Result<String, OsuApiError>;
}
