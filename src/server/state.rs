use axum::extract::FromRef;
use std::sync::Arc;
use std::time::Instant;

use crate::lyrics_cache::LyricsCache;
use crate::request::RequestPipeline;

pub type GuardedPipeline = Arc<RequestPipeline>;
pub type GuardedLyricsCache = Arc<dyn LyricsCache>;

#[derive(Clone)]
pub struct ServerState {
    pub start_time: Instant,
    pub pipeline: GuardedPipeline,
    pub lyrics_cache: GuardedLyricsCache,
}

impl FromRef<ServerState> for GuardedPipeline {
    fn from_ref(input: &ServerState) -> Self {
        input.pipeline.clone()
    }
}

impl FromRef<ServerState> for GuardedLyricsCache {
    fn from_ref(input: &ServerState) -> Self {
        input.lyrics_cache.clone()
    }
}
