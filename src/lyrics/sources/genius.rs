//! Genius adapter: token-authenticated search-then-fetch.
//!
//! Two round-trips: the search API turns a free-text query into candidate
//! hits, a fuzzy title/artist filter picks the right one, and the hit's
//! canonical page is fetched and mined for the lyric containers. Without a
//! configured access token the adapter reports itself unavailable and the
//! resolver skips it outright.

use anyhow::{Context, Result};
use async_trait::async_trait;
use scraper::{Html, Selector};
use serde::Deserialize;
use tracing::debug;

use super::{element_to_text, loose_match, BROWSER_USER_AGENT, SOURCE_TIMEOUT};
use crate::lyrics::{LyricsSource, ReliabilityTier, SourceTag};
use crate::normalize::{normalize_artist, normalize_title};

const DEFAULT_API_BASE_URL: &str = "https://api.genius.com";

/// The lyric text container used by current pages, plus the legacy class
/// still served on some cached variants.
const LYRIC_CONTAINER_SELECTORS: &[&str] = &["div[data-lyrics-container='true']", "div.lyrics"];

pub struct GeniusSource {
    client: reqwest::Client,
    api_base_url: String,
    access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    response: SearchInner,
}

#[derive(Debug, Deserialize)]
struct SearchInner {
    #[serde(default)]
    hits: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    result: HitResult,
}

#[derive(Debug, Deserialize)]
struct HitResult {
    id: u64,
    title: String,
    url: String,
    primary_artist: HitArtist,
}

#[derive(Debug, Deserialize)]
struct HitArtist {
    name: String,
}

impl GeniusSource {
    pub fn new(access_token: Option<String>) -> Self {
        Self::with_base_url(DEFAULT_API_BASE_URL, access_token)
    }

    pub fn with_base_url(api_base_url: impl Into<String>, access_token: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(SOURCE_TIMEOUT)
            .user_agent(BROWSER_USER_AGENT)
            .build()
            .expect("Failed to create HTTP client");
        Self {
            client,
            api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.filter(|t| !t.trim().is_empty()),
        }
    }

    async fn search(&self, query: &str, token: &str) -> Result<Vec<HitResult>> {
        let url = format!(
            "{}/search?q={}",
            self.api_base_url,
            urlencoding::encode(query)
        );
        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await
            .context("Genius search request failed")?;
        if !response.status().is_success() {
            anyhow::bail!("Genius search failed with status {}", response.status());
        }
        let body: SearchResponse = response
            .json()
            .await
            .context("Failed to parse Genius search response")?;
        Ok(body.response.hits.into_iter().map(|h| h.result).collect())
    }

    async fn fetch_song_text(&self, hit: &HitResult) -> Result<Option<String>> {
        let response = self
            .client
            .get(&hit.url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch Genius page for song {}", hit.id))?;
        if !response.status().is_success() {
            return Ok(None);
        }
        let html = response
            .text()
            .await
            .context("Failed to read Genius page body")?;
        Ok(extract_lyrics(&html))
    }
}

/// Picks the hit whose title and primary artist both loosely contain (or
/// are contained by) the query fields.
fn select_hit(hits: Vec<HitResult>, title: &str, artist: &str) -> Option<HitResult> {
    hits.into_iter()
        .find(|hit| loose_match(&hit.title, title) && loose_match(&hit.primary_artist.name, artist))
}

fn extract_lyrics(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    for selector_str in LYRIC_CONTAINER_SELECTORS {
        let selector = Selector::parse(selector_str).ok()?;
        let mut text = String::new();
        for container in document.select(&selector) {
            if !text.is_empty() {
                text.push('\n');
            }
            text.push_str(&element_to_text(container));
        }
        if !text.trim().is_empty() {
            return Some(text);
        }
    }
    None
}

#[async_trait]
impl LyricsSource for GeniusSource {
    fn tag(&self) -> SourceTag {
        SourceTag::Genius
    }

    fn tier(&self) -> ReliabilityTier {
        ReliabilityTier::Trusted
    }

    fn is_available(&self) -> bool {
        self.access_token.is_some()
    }

    async fn fetch(&self, title: &str, artist: &str) -> Result<Option<String>> {
        let Some(token) = self.access_token.clone() else {
            return Ok(None);
        };

        let query_title = normalize_title(title);
        let query_artist = normalize_artist(artist);
        if query_title.is_empty() {
            return Ok(None);
        }

        let query = format!("{} {}", query_title, query_artist);
        let hits = self.search(query.trim(), &token).await?;
        let Some(hit) = select_hit(hits, &query_title, &query_artist) else {
            debug!(%query, "No Genius hit survived the title/artist filter");
            return Ok(None);
        };

        self.fetch_song_text(&hit).await
    }
}
