//! Reqwest-based osu! v1 API client.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::types::{RawBeatmap, RawRecent, RawUser};
use super::{Beatmap, OsuApi, OsuApiError, RecentPlay, UserEvent};
use async_trait::async_trait;

/// How many days of profile events the API is asked for.
const EVENT_DAYS: u32 = 31;

/// osu! API client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OsuApiConfig {
    /// API key, required for every `/api` call.
    pub api_key: String,
    /// Base URL (default: https://osu.ppy.sh).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Request timeout in seconds (default: 30).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_timeout() -> u64 {
    30
}

/// Client for the osu! v1 API.
pub struct OsuApiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OsuApiClient {
    /// Create a new API client.
    pub fn new(config: OsuApiConfig) -> Result<Self, OsuApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let base_url = config
            .base_url
            .unwrap_or_else(|| "https://osu.ppy.sh".to_string());

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key,
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, OsuApiError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.client.get(&url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OsuApiError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| OsuApiError::Parse(format!("{} response: {}", path, e)))
    }
}

#[async_trait]
impl OsuApi for OsuApiClient {
    async fn user_events(&self, user: &str) -> Result<Vec<UserEvent>, OsuApiError> {
        debug!("fetching profile events for '{}'", user);
        let event_days = EVENT_DAYS.to_string();
        let users: Vec<RawUser> = self
            .get_json(
                "/api/get_user",
                &[
                    ("k", self.api_key.as_str()),
                    ("u", user),
                    ("type", "string"),
                    ("event_days", &event_days),
                ],
            )
            .await?;

        let user_record = users
            .into_iter()
            .next()
            .ok_or_else(|| OsuApiError::Empty(format!("no user record for '{}'", user)))?;

        Ok(user_record
            .events
            .into_iter()
            .filter_map(|event| event.into_event())
            .collect())
    }

    async fn recent_plays(&self, user: &str, limit: u32) -> Result<Vec<RecentPlay>, OsuApiError> {
        debug!("fetching {} recent plays for '{}'", limit, user);
        let limit = limit.to_string();
        let recents: Vec<RawRecent> = self
            .get_json(
                "/api/get_user_recent",
                &[
                    ("k", self.api_key.as_str()),
                    ("u", user),
                    ("type", "string"),
                    ("limit", &limit),
                ],
            )
            .await?;

        recents.into_iter().map(RecentPlay::try_from).collect()
    }

    async fn beatmap(&self, beatmap_id: u64) -> Result<Option<Beatmap>, OsuApiError> {
        debug!("fetching beatmap {}", beatmap_id);
        let id = beatmap_id.to_string();
        let maps: Vec<RawBeatmap> = self
            .get_json(
                "/api/get_beatmaps",
                &[("k", self.api_key.as_str()), ("b", &id)],
            )
            .await?;

        maps.into_iter().next().map(Beatmap::try_from).transpose()
    }

    async fn download_beatmap(&self, beatmap_id: u64) -> Result<String, OsuApiError> {
        debug!("downloading beatmap file {}", beatmap_id);
        let url = format!("{}/osu/{}", self.base_url, beatmap_id);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OsuApiError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Err(OsuApiError::Empty(format!(
                "beatmap file {} is empty",
                beatmap_id
            )));
        }
        Ok(body)
    }
}
