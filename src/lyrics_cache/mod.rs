//! Persistent lyrics cache keyed by catalog track identifier.
//!
//! First successful resolution for a track is written through here; every
//! later request for the same track is served from the cache without
//! touching any external source. Entries never expire on their own;
//! clearing is an explicit administrative action.

mod models;
mod schema;
mod store;

pub use models::CacheEntry;
pub use store::SqliteLyricsCache;

use anyhow::Result;

pub trait LyricsCache: Send + Sync {
    /// Returns the entry for a track id, updating its hit bookkeeping
    /// (use count, last-used timestamp) as a side effect.
    /// Returns Ok(None) if the track has never been cached.
    fn lookup(&self, track_id: &str) -> Result<Option<CacheEntry>>;

    /// Inserts or wholesale-replaces the entry for a track id.
    fn upsert(&self, entry: &CacheEntry) -> Result<()>;

    /// Number of cached tracks.
    fn len(&self) -> Result<usize>;

    /// Administrative reset. Returns the number of entries removed.
    fn clear(&self) -> Result<usize>;
}
