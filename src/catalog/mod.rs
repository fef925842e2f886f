//! The external music catalog and playlist service, consumed as a black
//! box: free text in, candidate tracks out, plus playlist mutation with a
//! duplicate report.

mod client;
mod models;

pub use client::CatalogServiceClient;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A resolved catalog entity. Immutable once produced by a search; the
/// rest of the pipeline only reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    /// Opaque stable identifier issued by the catalog; doubles as the
    /// lyrics cache key.
    pub id: String,
    pub title: String,
    /// Primary artist first.
    pub artists: Vec<String>,
    /// Source-reported, advisory only: the judge sees it as one signal
    /// among others, it never blocks on its own.
    pub is_explicit: bool,
    pub thumbnail_url: Option<String>,
    pub album: Option<String>,
}

impl Track {
    pub fn primary_artist(&self) -> &str {
        self.artists.first().map(String::as_str).unwrap_or("")
    }

    /// Comma-joined artist credit for display and prompting.
    pub fn artists_label(&self) -> String {
        self.artists.join(", ")
    }
}

/// Result scopes the catalog can be searched under, walked in order until
/// one yields a usable candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchScope {
    Songs,
    Videos,
    Any,
}

impl SearchScope {
    pub const FALLBACK_ORDER: [SearchScope; 3] =
        [SearchScope::Songs, SearchScope::Videos, SearchScope::Any];

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchScope::Songs => "songs",
            SearchScope::Videos => "videos",
            SearchScope::Any => "any",
        }
    }
}

/// Outcome of a playlist mutation as reported by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaylistAddStatus {
    Success,
    Duplicate,
    Error,
}

#[async_trait]
pub trait MusicCatalog: Send + Sync {
    /// Searches the catalog within one result scope.
    async fn search_tracks(&self, query: &str, scope: SearchScope) -> Result<Vec<Track>>;

    /// Track ids currently on the playlist.
    async fn playlist_track_ids(&self, playlist_id: &str) -> Result<Vec<String>>;

    /// Appends a track to the playlist, reporting the service's own
    /// duplicate detection.
    async fn add_playlist_track(
        &self,
        playlist_id: &str,
        track_id: &str,
    ) -> Result<PlaylistAddStatus>;
}
