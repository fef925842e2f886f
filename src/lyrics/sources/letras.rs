//! Letras adapter: plain HTML scrape of the lyrics page.
//!
//! No API, no search: the page URL is guessed from slugified artist/title,
//! fetched with a browser-like signature, and mined for whichever of the
//! known content containers this page variant uses. A 200 can still be a
//! disguised error or search page, so the decoded text is phrase-checked
//! before it is believed.

use anyhow::{Context, Result};
use async_trait::async_trait;
use scraper::{Html, Selector};
use tracing::debug;

use super::{collapse_blank_lines, element_to_text, BROWSER_USER_AGENT, SOURCE_TIMEOUT};
use crate::lyrics::quality::{non_empty_lines, ErrorPageDetector};
use crate::lyrics::{LyricsSource, ReliabilityTier, SourceTag};
use crate::normalize::{normalize_artist, normalize_title, slugify};

const DEFAULT_BASE_URLS: &[&str] = &["https://www.letras.mus.br", "https://www.letras.com"];

/// Content containers observed across page variants, newest first.
const CONTAINER_SELECTORS: &[&str] = &["div.lyric-original", "div.cnt-letra"];

const MIN_SCRAPED_LINES: usize = 3;

pub struct LetrasSource {
    client: reqwest::Client,
    base_urls: Vec<String>,
    detector: ErrorPageDetector,
}

impl LetrasSource {
    pub fn new() -> Self {
        Self::with_base_urls(DEFAULT_BASE_URLS.iter().map(|s| s.to_string()).collect())
    }

    pub fn with_base_urls(base_urls: Vec<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(SOURCE_TIMEOUT)
            .user_agent(BROWSER_USER_AGENT)
            .build()
            .expect("Failed to create HTTP client");
        Self {
            client,
            base_urls: base_urls
                .into_iter()
                .map(|u| u.trim_end_matches('/').to_string())
                .collect(),
            detector: ErrorPageDetector::default(),
        }
    }

    fn candidate_urls(&self, title: &str, artist: &str) -> Vec<String> {
        let artist_slug = slugify(&normalize_artist(artist));
        let title_slug = slugify(&normalize_title(title));
        if artist_slug.is_empty() || title_slug.is_empty() {
            return Vec::new();
        }
        self.base_urls
            .iter()
            .map(|base| format!("{}/{}/{}/", base, artist_slug, title_slug))
            .collect()
    }

    async fn scrape(&self, url: &str) -> Result<Option<String>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", url))?;
        if !response.status().is_success() {
            return Ok(None);
        }
        let html = response.text().await.context("Failed to read page body")?;
        Ok(extract_page_lyrics(&html, &self.detector))
    }
}

impl Default for LetrasSource {
    fn default() -> Self {
        Self::new()
    }
}

fn extract_page_lyrics(html: &str, detector: &ErrorPageDetector) -> Option<String> {
    let document = Html::parse_document(html);
    for selector_str in CONTAINER_SELECTORS {
        let Ok(selector) = Selector::parse(selector_str) else {
            continue;
        };
        let Some(container) = document.select(&selector).next() else {
            continue;
        };
        let text = collapse_blank_lines(&element_to_text(container));
        if text.is_empty() {
            continue;
        }
        if detector.matches(&text) {
            debug!("Scraped page looks like an error or search page, discarding");
            return None;
        }
        if non_empty_lines(&text) < MIN_SCRAPED_LINES {
            return None;
        }
        return Some(text);
    }
    None
}

#[async_trait]
impl LyricsSource for LetrasSource {
    fn tag(&self) -> SourceTag {
        SourceTag::Letras
    }

    fn tier(&self) -> ReliabilityTier {
        ReliabilityTier::BestEffort
    }

    async fn fetch(&self, title: &str, artist: &str) -> Result<Option<String>> {
        for url in self.candidate_urls(title, artist) {
            match self.scrape(&url).await {
                Ok(Some(text)) => return Ok(Some(text)),
                Ok(None) => continue,
                Err(err) => {
                    // one mirror failing must not stop the next candidate
                    debug!(%url, error = %err, "Letras candidate fetch failed");
                    continue;
                }
            }
        }
        Ok(None)
    }
}
