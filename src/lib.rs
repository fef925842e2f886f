//! DJ Request Server Library
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod catalog;
pub mod config;
pub mod lyrics;
pub mod lyrics_cache;
pub mod moderation;
pub mod normalize;
pub mod request;
pub mod server;

// Re-export commonly used types for convenience
pub use catalog::{CatalogServiceClient, MusicCatalog, PlaylistAddStatus, Track};
pub use config::{AppConfig, CliConfig, FileConfig};
pub use lyrics::{LyricsResolver, LyricsSource, SourceTag};
pub use lyrics_cache::{LyricsCache, SqliteLyricsCache};
pub use moderation::{GeminiClient, ModerationDecision, ModerationJudge, TextGenerator};
pub use request::{RequestOutcome, RequestPipeline};
pub use server::{make_app, run_server};
