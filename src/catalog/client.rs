//! HTTP client for the catalog/playlist service.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

use super::models::{AddItemResponse, PlaylistItemsResponse, SearchResponse};
use super::{MusicCatalog, PlaylistAddStatus, SearchScope, Track};

pub struct CatalogServiceClient {
    client: reqwest::Client,
    base_url: String,
    api_token: String,
}

impl CatalogServiceClient {
    /// # Arguments
    /// * `base_url` - Base URL of the catalog service.
    /// * `api_token` - Bearer credential for every call.
    /// * `timeout_sec` - Request timeout in seconds.
    pub fn new(base_url: String, api_token: String, timeout_sec: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_sec))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder.header("Authorization", format!("Bearer {}", self.api_token))
    }
}

#[async_trait]
impl MusicCatalog for CatalogServiceClient {
    async fn search_tracks(&self, query: &str, scope: SearchScope) -> Result<Vec<Track>> {
        let url = format!(
            "{}/search?q={}&scope={}",
            self.base_url,
            urlencoding::encode(query),
            scope.as_str(),
        );
        debug!(%query, scope = scope.as_str(), "Searching catalog");

        let response = self
            .authorized(self.client.get(&url))
            .send()
            .await
            .context("Failed to reach catalog service")?;
        if !response.status().is_success() {
            anyhow::bail!("Catalog search failed with status {}", response.status());
        }

        let body: SearchResponse = response
            .json()
            .await
            .context("Failed to parse catalog search response")?;
        Ok(body
            .results
            .into_iter()
            .filter_map(|entry| entry.into_track())
            .collect())
    }

    async fn playlist_track_ids(&self, playlist_id: &str) -> Result<Vec<String>> {
        let url = format!("{}/playlists/{}/tracks", self.base_url, playlist_id);
        let response = self
            .authorized(self.client.get(&url))
            .send()
            .await
            .context("Failed to fetch playlist items")?;
        if !response.status().is_success() {
            anyhow::bail!(
                "Playlist items fetch failed with status {}",
                response.status()
            );
        }

        let body: PlaylistItemsResponse = response
            .json()
            .await
            .context("Failed to parse playlist items response")?;
        Ok(body.tracks.into_iter().map(|t| t.video_id).collect())
    }

    async fn add_playlist_track(
        &self,
        playlist_id: &str,
        track_id: &str,
    ) -> Result<PlaylistAddStatus> {
        let url = format!("{}/playlists/{}/tracks", self.base_url, playlist_id);
        let response = self
            .authorized(self.client.post(&url))
            .json(&json!({ "videoId": track_id }))
            .send()
            .await
            .context("Failed to reach playlist mutation endpoint")?;
        if !response.status().is_success() {
            anyhow::bail!("Playlist mutation failed with status {}", response.status());
        }

        let body: AddItemResponse = response
            .json()
            .await
            .context("Failed to parse playlist mutation response")?;
        Ok(body.into_status())
    }
}
