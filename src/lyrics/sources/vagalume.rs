//! Vagalume adapter: structured lyrics API with strong regional coverage.
//!
//! The search endpoint answers with a nearest match when it can't find the
//! exact song, so the returned title has to be re-checked against the query
//! before the text is trusted.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{loose_match, SOURCE_TIMEOUT};
use crate::lyrics::{LyricsSource, ReliabilityTier, SourceTag};
use crate::normalize::{normalize_artist, normalize_title};

const DEFAULT_BASE_URL: &str = "https://api.vagalume.com.br";

pub struct VagalumeSource {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(rename = "type")]
    response_type: String,
    #[serde(default)]
    mus: Vec<SearchedSong>,
}

#[derive(Debug, Deserialize)]
struct SearchedSong {
    name: String,
    #[serde(default)]
    text: String,
}

impl VagalumeSource {
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

impl Default for VagalumeSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LyricsSource for VagalumeSource {
    fn tag(&self) -> SourceTag {
        SourceTag::Vagalume
    }

    fn tier(&self) -> ReliabilityTier {
        ReliabilityTier::Trusted
    }

    async fn fetch(&self, title: &str, artist: &str) -> Result<Option<String>> {
        let query_title = normalize_title(title);
        let query_artist = normalize_artist(artist);
        if query_title.is_empty() || query_artist.is_empty() {
            return Ok(None);
        }

        let url = format!(
            "{}/search.php?art={}&mus={}",
            self.base_url,
            urlencoding::encode(&query_artist),
            urlencoding::encode(&query_title),
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Vagalume search request failed")?;
        if !response.status().is_success() {
            anyhow::bail!("Vagalume search failed with status {}", response.status());
        }

        let body: SearchResponse = response
            .json()
            .await
            .context("Failed to parse Vagalume response")?;

        if body.response_type.contains("notfound") {
            return Ok(None);
        }

        let Some(song) = body.mus.into_iter().next() else {
            return Ok(None);
        };

        // Nearest-match guard: the reported title must relate to the query
        // title by substring in at least one direction.
        if !loose_match(&song.name, &query_title) {
            debug!(
                reported = %song.name,
                queried = %query_title,
                "Vagalume returned an unrelated song, discarding"
            );
            return Ok(None);
        }

        if song.text.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(song.text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_exact_hit() {
        let json = r#"{
            "type": "exact",
            "art": {"id": "3ade68b4", "name": "Queen"},
            "mus": [{
                "id": "3ade68b7",
                "name": "Bohemian Rhapsody",
                "lang": 2,
                "text": "Is this the real life?"
            }]
        }"#;
        let body: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(body.response_type, "exact");
        assert_eq!(body.mus[0].name, "Bohemian Rhapsody");
        assert!(body.mus[0].text.contains("real life"));
    }

    #[test]
    fn deserialize_not_found() {
        let json = r#"{"type": "song_notfound", "art": {"id": "x", "name": "Queen"}}"#;
        let body: SearchResponse = serde_json::from_str(json).unwrap();
        assert!(body.response_type.contains("notfound"));
        assert!(body.mus.is_empty());
    }

    #[test]
    fn nearest_match_title_guard() {
        // the guard the adapter applies before accepting a hit
        assert!(loose_match("Bohemian Rhapsody (Remastered)", "Bohemian Rhapsody"));
        assert!(!loose_match("Another One Bites the Dust", "Bohemian Rhapsody"));
    }
}
