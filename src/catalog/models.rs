//! Wire types for the catalog service API responses, with conversion to
//! the pipeline's own models.

use serde::Deserialize;

use super::{PlaylistAddStatus, Track};

/// Track entry as returned by the catalog's search endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogTrack {
    #[serde(rename = "videoId", default)]
    pub video_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub artists: Vec<CatalogArtist>,
    #[serde(rename = "isExplicit", default)]
    pub is_explicit: bool,
    #[serde(default)]
    pub thumbnails: Vec<CatalogThumbnail>,
    #[serde(default)]
    pub album: Option<CatalogAlbum>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogArtist {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogThumbnail {
    pub url: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogAlbum {
    pub name: String,
}

impl CatalogTrack {
    /// Converts to the pipeline track model. Returns `None` when the entry
    /// has no usable identifier; such hits are unplayable and skipped.
    pub fn into_track(self) -> Option<Track> {
        let id = self.video_id.filter(|id| !id.is_empty())?;
        // the service lists thumbnails smallest first
        let thumbnail_url = self
            .thumbnails
            .iter()
            .max_by_key(|t| t.width.max(t.height))
            .map(|t| t.url.clone());
        Some(Track {
            id,
            title: self.title,
            artists: self.artists.into_iter().map(|a| a.name).collect(),
            is_explicit: self.is_explicit,
            thumbnail_url,
            album: self.album.map(|a| a.name),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<CatalogTrack>,
}

#[derive(Debug, Deserialize)]
pub struct PlaylistItemsResponse {
    #[serde(default)]
    pub tracks: Vec<PlaylistItem>,
}

#[derive(Debug, Deserialize)]
pub struct PlaylistItem {
    #[serde(rename = "videoId")]
    pub video_id: String,
}

#[derive(Debug, Deserialize)]
pub struct AddItemResponse {
    #[serde(default)]
    pub status: String,
}

impl AddItemResponse {
    pub fn into_status(self) -> PlaylistAddStatus {
        match self.status.as_str() {
            "STATUS_SUCCEEDED" => PlaylistAddStatus::Success,
            "STATUS_DUPLICATE" => PlaylistAddStatus::Duplicate,
            _ => PlaylistAddStatus::Error,
        }
    }
}
