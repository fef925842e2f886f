//! Lyrics acquisition: source adapters, quality validation and the
//! cache-backed resolver that arbitrates between them.

pub mod quality;
pub mod resolver;
pub mod sources;

pub use quality::{ErrorPageDetector, RejectReason};
pub use resolver::{LyricsResolver, Resolution};

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifies which adapter (or the cache) produced a piece of lyrics text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceTag {
    Genius,
    Vagalume,
    LyricsOvh,
    Letras,
    Cache,
}

impl SourceTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceTag::Genius => "genius",
            SourceTag::Vagalume => "vagalume",
            SourceTag::LyricsOvh => "lyrics_ovh",
            SourceTag::Letras => "letras",
            SourceTag::Cache => "cache",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "genius" => Some(SourceTag::Genius),
            "vagalume" => Some(SourceTag::Vagalume),
            "lyrics_ovh" => Some(SourceTag::LyricsOvh),
            "letras" => Some(SourceTag::Letras),
            "cache" => Some(SourceTag::Cache),
            _ => None,
        }
    }
}

impl std::fmt::Display for SourceTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static classification of an adapter, consumed only by the resolver's
/// early-exit rule: a sufficiently long hit from a `Trusted` source is
/// accepted without consulting the remaining adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReliabilityTier {
    Trusted,
    BestEffort,
}

/// One external lyrics source. Implementations are stateless strategy
/// objects; the resolver walks them in priority order and treats them
/// uniformly through this trait, unaware of the transport behind each.
///
/// `fetch` returns `Ok(None)` for a clean miss and `Err` for transport or
/// format failures; the resolver folds both into "no lyrics from this
/// source" and nothing an adapter does can fail the overall request.
#[async_trait]
pub trait LyricsSource: Send + Sync {
    fn tag(&self) -> SourceTag;

    fn tier(&self) -> ReliabilityTier;

    /// Whether the adapter's preconditions are met (e.g. a credential is
    /// configured). Unavailable adapters are skipped, not counted as
    /// failures.
    fn is_available(&self) -> bool {
        true
    }

    async fn fetch(&self, title: &str, artist: &str) -> Result<Option<String>>;
}

/// Lyrics text accepted by the resolver's quality floor.
#[derive(Debug, Clone)]
pub struct LyricsResult {
    pub text: String,
    pub source: SourceTag,
    pub fetched_at: DateTime<Utc>,
}
