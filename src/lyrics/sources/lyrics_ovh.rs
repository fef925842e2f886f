//! lyrics.ovh adapter, the simplest source in the chain.
//!
//! One path-parameterized lookup, no credential, no search step. It either
//! knows the song or it 404s; it is also the flakiest of the structured
//! sources, hence its best-effort tier.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use super::SOURCE_TIMEOUT;
use crate::lyrics::{LyricsSource, ReliabilityTier, SourceTag};
use crate::normalize::{normalize_artist, normalize_title};

const DEFAULT_BASE_URL: &str = "https://api.lyrics.ovh";

pub struct LyricsOvhSource {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct LyricsResponse {
    #[serde(default)]
    lyrics: String,
}

impl LyricsOvhSource {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(SOURCE_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl Default for LyricsOvhSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LyricsSource for LyricsOvhSource {
    fn tag(&self) -> SourceTag {
        SourceTag::LyricsOvh
    }

    fn tier(&self) -> ReliabilityTier {
        ReliabilityTier::BestEffort
    }

    async fn fetch(&self, title: &str, artist: &str) -> Result<Option<String>> {
        let query_title = normalize_title(title);
        let query_artist = normalize_artist(artist);
        if query_title.is_empty() || query_artist.is_empty() {
            return Ok(None);
        }

        let url = format!(
            "{}/v1/{}/{}",
            self.base_url,
            urlencoding::encode(&query_artist),
            urlencoding::encode(&query_title),
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("lyrics.ovh request failed")?;
        if !response.status().is_success() {
            // 404 is its way of saying "unknown song"
            return Ok(None);
        }

        let body: LyricsResponse = response
            .json()
            .await
            .context("Failed to parse lyrics.ovh response")?;
        if body.lyrics.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(body.lyrics))
    }
}
