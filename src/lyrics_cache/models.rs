use chrono::{DateTime, Utc};

use crate::lyrics::SourceTag;

/// One cached resolution. At most one entry exists per catalog track id;
/// a re-resolution replaces the row wholesale rather than merging.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub track_id: String,
    pub title: String,
    pub artist: String,
    pub lyrics: String,
    /// The adapter that originally produced the text, never `cache`.
    pub source: SourceTag,
    pub created_at: DateTime<Utc>,
    pub last_used_at: DateTime<Utc>,
    pub use_count: i64,
}

impl CacheEntry {
    pub fn new(
        track_id: impl Into<String>,
        title: impl Into<String>,
        artist: impl Into<String>,
        lyrics: impl Into<String>,
        source: SourceTag,
    ) -> Self {
        let now = Utc::now();
        Self {
            track_id: track_id.into(),
            title: title.into(),
            artist: artist.into(),
            lyrics: lyrics.into(),
            source,
            created_at: now,
            last_used_at: now,
            use_count: 0,
        }
    }
}
