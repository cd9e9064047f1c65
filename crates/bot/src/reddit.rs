//! Subreddit listing source.
//!
//! Reads the subreddit's public `new.json` listing; no authentication is
//! needed for reading. Posting, OAuth and rate limiting stay outside
//! this binary. Already-seen post ids are tracked in memory so a post is
//! handed to the pipeline at most once per process lifetime.

use std::collections::HashSet;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use maplink_core::{IncomingPost, RedditConfig};

const REDDIT_URL: &str = "https://www.reddit.com";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("listing request failed with status {status}")]
    Api { status: u16 },

    #[error("failed to parse listing: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Poll-based source of new subreddit posts.
pub struct RedditSource {
    client: Client,
    config: RedditConfig,
    seen: HashSet<String>,
}

impl RedditSource {
    pub fn new(config: RedditConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            config,
            seen: HashSet::new(),
        })
    }

    /// Fetches the listing and returns the posts not seen before,
    /// oldest first so the pipeline processes them in posting order.
    pub async fn fetch_new(&mut self) -> Result<Vec<IncomingPost>, FetchError> {
        let url = format!("{}/r/{}/new.json", REDDIT_URL, self.config.subreddit);
        let limit = self.config.listing_limit.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[("limit", limit.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Api {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let mut posts: Vec<IncomingPost> = parse_listing(&body)?
            .into_iter()
            .filter(|(id, _)| self.seen.insert(id.clone()))
            .map(|(_, post)| post)
            .collect();
        posts.reverse();

        debug!("{} new posts in /r/{}", posts.len(), self.config.subreddit);
        Ok(posts)
    }
}

/// Parses a listing document into `(post id, post)` pairs, newest first.
fn parse_listing(json: &str) -> Result<Vec<(String, IncomingPost)>, serde_json::Error> {
    let listing: Listing = serde_json::from_str(json)?;
    Ok(listing
        .data
        .children
        .into_iter()
        .map(|child| {
            (
                child.data.id,
                IncomingPost {
                    title: child.data.title,
                    is_link: !child.data.is_self,
                },
            )
        })
        .collect())
}

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Child>,
}

#[derive(Debug, Deserialize)]
struct Child {
    data: ChildData,
}

#[derive(Debug, Deserialize)]
struct ChildData {
    id: String,
    title: String,
    #[serde(default)]
    is_self: bool,
}
