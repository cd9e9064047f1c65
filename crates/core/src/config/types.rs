use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::osu::OsuApiConfig;
use crate::recalc::{OppaiConfig, RecalcConfig};
use crate::report::ReportConfig;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub osu: OsuApiConfig,
    #[serde(default)]
    pub oppai: OppaiConfig,
    #[serde(default)]
    pub recalc: RecalcConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub reddit: RedditConfig,
}

/// Resolver configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverConfig {
    /// Bound for the recent-plays fallback batch (default: 50).
    #[serde(default = "default_recent_limit")]
    pub recent_limit: u32,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            recent_limit: default_recent_limit(),
        }
    }
}

fn default_recent_limit() -> u32 {
    50
}

/// Failure log configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LogConfig {
    #[serde(default = "default_failures_path")]
    pub failures: PathBuf,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            failures: default_failures_path(),
        }
    }
}

fn default_failures_path() -> PathBuf {
    PathBuf::from("logs/failures.log")
}

/// Subreddit polling configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RedditConfig {
    #[serde(default = "default_subreddit")]
    pub subreddit: String,
    /// User-Agent sent with listing requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Seconds between listing polls (default: 60).
    #[serde(default = "default_poll_secs")]
    pub poll_secs: u64,
    /// Posts fetched per poll (default: 25).
    #[serde(default = "default_listing_limit")]
    pub listing_limit: u32,
}

impl Default for RedditConfig {
    fn default() -> Self {
        Self {
            subreddit: default_subreddit(),
            user_agent: default_user_agent(),
            poll_secs: default_poll_secs(),
            listing_limit: default_listing_limit(),
        }
    }
}

fn default_subreddit() -> String {
    "osugame".to_string()
}

fn default_user_agent() -> String {
    format!("maplink/{}", env!("CARGO_PKG_VERSION"))
}

fn default_poll_secs() -> u64 {
    60
}

fn default_listing_limit() -> u32 {
    25
}
