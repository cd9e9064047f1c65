//! Mock osu! API for testing.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::osu::{Beatmap, OsuApi, OsuApiError, RecentPlay, UserEvent};

/// Mock implementation of the `OsuApi` trait.
///
/// Responses are configured per user / beatmap id; `fail_next` injects a
/// one-shot error into whichever call runs next. An unconfigured user has
/// no record (`user_events` errors, like the real endpoint), while
/// unconfigured recents and beatmaps yield empty results.
#[derive(Debug, Clone, Default)]
pub struct MockOsuApi {
    events: Arc<RwLock<HashMap<String, Vec<UserEvent>>>>,
    recents: Arc<RwLock<HashMap<String, Vec<RecentPlay>>>>,
    beatmaps: Arc<RwLock<HashMap<u64, Beatmap>>>,
    files: Arc<RwLock<HashMap<u64, String>>>,
    next_error: Arc<RwLock<Option<OsuApiError>>>,
}

impl MockOsuApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a user's profile event feed, in feed order.
    pub async fn set_events(&self, user: &str, events: Vec<UserEvent>) {
        self.events.write().await.insert(user.to_string(), events);
    }

    /// Append a recent play for a user.
    pub async fn add_recent_play(&self, user: &str, beatmap_id: u64) {
        self.recents
            .write()
            .await
            .entry(user.to_string())
            .or_default()
            .push(RecentPlay { beatmap_id });
    }

    /// Register beatmap metadata.
    pub async fn add_beatmap(&self, map: Beatmap) {
        self.beatmaps.write().await.insert(map.beatmap_id, map);
    }

    /// Register a raw `.osu` file body.
    pub async fn set_beatmap_file(&self, beatmap_id: u64, body: &str) {
        self.files
            .write()
            .await
            .insert(beatmap_id, body.to_string());
    }

    /// Make the next API call fail with the given error.
    pub async fn fail_next(&self, error: OsuApiError) {
        *self.next_error.write().await = Some(error);
    }

    async fn take_error(&self) -> Option<OsuApiError> {
        self.next_error.write().await.take()
    }
}

#[async_trait]
impl OsuApi for MockOsuApi {
    async fn user_events(&self, user: &str) -> Result<Vec<UserEvent>, OsuApiError> {
        if let Some(e) = self.take_error().await {
            return Err(e);
        }
        self.events
            .read()
            .await
            .get(user)
            .cloned()
            .ok_or_else(|| OsuApiError::Empty(format!("no user record for '{}'", user)))
    }

    async fn recent_plays(&self, user: &str, limit: u32) -> Result<Vec<RecentPlay>, OsuApiError> {
        if let Some(e) = self.take_error().await {
            return Err(e);
        }
        let mut plays = self
            .recents
            .read()
            .await
            .get(user)
            .cloned()
            .unwrap_or_default();
        plays.truncate(limit as usize);
        Ok(plays)
    }

    async fn beatmap(&self, beatmap_id: u64) -> Result<Option<Beatmap>, OsuApiError> {
        if let Some(e) = self.take_error().await {
            return Err(e);
        }
        Ok(self.beatmaps.read().await.get(&beatmap_id).cloned())
    }

    async fn download_beatmap(&self, beatmap_id: u64) -> Result<String, OsuApiError> {
        if let Some(e) = self.take_error().await {
            return Err(e);
        }
        self.files
            .read()
            .await
            .get(&beatmap_id)
            .cloned()
            .ok_or_else(|| OsuApiError::Empty(format!("beatmap file {} is empty", beatmap_id)))
    }
}
