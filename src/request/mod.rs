//! The top-level request pipeline: catalog search, lyrics resolution,
//! moderation, playlist mutation.
//!
//! Every stage degrades to a typed outcome rather than an error; a request
//! always terminates in exactly one of the [`RequestOutcome`] variants.

use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::catalog::{MusicCatalog, PlaylistAddStatus, SearchScope, Track};
use crate::lyrics::{LyricsResolver, SourceTag};
use crate::moderation::{ModerationDecision, ModerationJudge};

/// Terminal state of one processed request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RequestOutcome {
    /// The catalog produced no candidate with a usable identifier.
    NotFound,
    /// The judge turned the track down.
    Rejected { track: Track, reason: String },
    /// Approved and appended to the playlist.
    Added {
        track: Track,
        reason: String,
        lyrics_source: Option<SourceTag>,
    },
    /// Approved, but the playlist already contains it. Nothing was added.
    Duplicate { track: Track, reason: String },
    /// Approved, but the playlist mutation failed. The approval stands;
    /// the failure is operational.
    AddFailed {
        track: Track,
        reason: String,
        error: String,
    },
}

pub struct RequestPipeline {
    catalog: Arc<dyn MusicCatalog>,
    resolver: LyricsResolver,
    judge: ModerationJudge,
    playlist_id: String,
}

impl RequestPipeline {
    pub fn new(
        catalog: Arc<dyn MusicCatalog>,
        resolver: LyricsResolver,
        judge: ModerationJudge,
        playlist_id: impl Into<String>,
    ) -> Self {
        Self {
            catalog,
            resolver,
            judge,
            playlist_id: playlist_id.into(),
        }
    }

    pub async fn handle(&self, request_text: &str) -> Result<RequestOutcome> {
        let Some(track) = self.find_track(request_text).await? else {
            info!(%request_text, "No catalog candidate for request");
            return Ok(RequestOutcome::NotFound);
        };
        info!(track_id = %track.id, title = %track.title, "Catalog candidate selected");

        let resolution = self.resolver.resolve(&track, false).await;
        let (lyrics, lyrics_source) = match &resolution.result {
            Some(result) => (Some(result.text.as_str()), Some(result.source)),
            None => {
                info!(
                    track_id = %track.id,
                    diagnostic = %resolution.diagnostic,
                    "No lyrics available, judging from metadata"
                );
                (None, None)
            }
        };

        let decision = self.judge.judge(&track, lyrics).await;
        if !decision.approved {
            info!(track_id = %track.id, reason = %decision.reason, "Track rejected");
            return Ok(RequestOutcome::Rejected {
                track,
                reason: decision.reason,
            });
        }

        Ok(self.add_to_playlist(track, decision, lyrics_source).await)
    }

    /// Walks the search scopes in fallback order and takes the first
    /// candidate bearing a non-empty catalog identifier. Deliberately no
    /// re-ranking: the catalog's own ordering is trusted.
    async fn find_track(&self, request_text: &str) -> Result<Option<Track>> {
        for scope in SearchScope::FALLBACK_ORDER {
            let candidates = match self.catalog.search_tracks(request_text, scope).await {
                Ok(candidates) => candidates,
                Err(err) => {
                    warn!(scope = scope.as_str(), error = %err, "Catalog search failed");
                    continue;
                }
            };
            if let Some(track) = candidates.into_iter().find(|t| !t.id.is_empty()) {
                return Ok(Some(track));
            }
        }
        Ok(None)
    }

    async fn add_to_playlist(
        &self,
        track: Track,
        decision: ModerationDecision,
        lyrics_source: Option<SourceTag>,
    ) -> RequestOutcome {
        // membership check first, so an approved re-request never turns
        // into a second insertion even if the service's duplicate
        // detection misses
        match self.catalog.playlist_track_ids(&self.playlist_id).await {
            Ok(ids) if ids.contains(&track.id) => {
                info!(track_id = %track.id, "Track already on playlist");
                return RequestOutcome::Duplicate {
                    track,
                    reason: decision.reason,
                };
            }
            Ok(_) => {}
            Err(err) => {
                // fall through to the mutation call and rely on its
                // duplicate report
                warn!(error = %err, "Playlist membership check failed");
            }
        }

        match self
            .catalog
            .add_playlist_track(&self.playlist_id, &track.id)
            .await
        {
            Ok(PlaylistAddStatus::Success) => {
                info!(track_id = %track.id, "Track added to playlist");
                RequestOutcome::Added {
                    track,
                    reason: decision.reason,
                    lyrics_source,
                }
            }
            Ok(PlaylistAddStatus::Duplicate) => RequestOutcome::Duplicate {
                track,
                reason: decision.reason,
            },
            Ok(PlaylistAddStatus::Error) => RequestOutcome::AddFailed {
                track,
                reason: decision.reason,
                error: "The playlist service reported an unexpected status".to_string(),
            },
            Err(err) => {
                warn!(track_id = %track.id, error = %err, "Playlist mutation failed");
                RequestOutcome::AddFailed {
                    track,
                    reason: decision.reason,
                    error: err.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lyrics::{LyricsSource, ReliabilityTier};
    use crate::lyrics_cache::SqliteLyricsCache;
    use crate::moderation::llm::{GenerationError, TextGenerator};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn sample_track(id: &str, explicit: bool) -> Track {
        Track {
            id: id.to_string(),
            title: "Bohemian Rhapsody".to_string(),
            artists: vec!["Queen".to_string()],
            is_explicit: explicit,
            thumbnail_url: None,
            album: None,
        }
    }

    struct FakeCatalog {
        tracks: Vec<Track>,
        playlist: Mutex<Vec<String>>,
        add_calls: AtomicUsize,
        fail_add: bool,
    }

    impl FakeCatalog {
        fn with_tracks(tracks: Vec<Track>) -> Arc<Self> {
            Arc::new(Self {
                tracks,
                playlist: Mutex::new(Vec::new()),
                add_calls: AtomicUsize::new(0),
                fail_add: false,
            })
        }

        fn failing_add(tracks: Vec<Track>) -> Arc<Self> {
            Arc::new(Self {
                tracks,
                playlist: Mutex::new(Vec::new()),
                add_calls: AtomicUsize::new(0),
                fail_add: true,
            })
        }
    }

    #[async_trait]
    impl MusicCatalog for FakeCatalog {
        async fn search_tracks(&self, _query: &str, scope: SearchScope) -> Result<Vec<Track>> {
            // only the songs scope answers; the pipeline never needs more
            if scope == SearchScope::Songs {
                Ok(self.tracks.clone())
            } else {
                Ok(Vec::new())
            }
        }

        async fn playlist_track_ids(&self, _playlist_id: &str) -> Result<Vec<String>> {
            Ok(self.playlist.lock().unwrap().clone())
        }

        async fn add_playlist_track(
            &self,
            _playlist_id: &str,
            track_id: &str,
        ) -> Result<PlaylistAddStatus> {
            self.add_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_add {
                anyhow::bail!("playlist service is down");
            }
            let mut playlist = self.playlist.lock().unwrap();
            if playlist.iter().any(|id| id == track_id) {
                return Ok(PlaylistAddStatus::Duplicate);
            }
            playlist.push(track_id.to_string());
            Ok(PlaylistAddStatus::Success)
        }
    }

    struct StaticSource {
        text: Option<String>,
    }

    #[async_trait]
    impl LyricsSource for StaticSource {
        fn tag(&self) -> SourceTag {
            SourceTag::Letras
        }

        fn tier(&self) -> ReliabilityTier {
            ReliabilityTier::BestEffort
        }

        async fn fetch(&self, _title: &str, _artist: &str) -> Result<Option<String>> {
            Ok(self.text.clone())
        }
    }

    struct ScriptedGenerator {
        response: String,
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(self.response.clone())
        }
    }

    fn clean_lyrics() -> String {
        (0..12)
            .map(|i| format!("gentle verse number {} about friendship", i))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn pipeline_with(
        catalog: Arc<FakeCatalog>,
        lyrics: Option<String>,
        verdict: &str,
    ) -> (RequestPipeline, Arc<ScriptedGenerator>) {
        let cache = Arc::new(SqliteLyricsCache::in_memory().unwrap());
        let resolver = LyricsResolver::new(
            cache,
            vec![Arc::new(StaticSource { text: lyrics }) as Arc<dyn LyricsSource>],
        );
        let generator = Arc::new(ScriptedGenerator {
            response: verdict.to_string(),
            prompts: Mutex::new(Vec::new()),
        });
        let judge = ModerationJudge::new(generator.clone());
        (
            RequestPipeline::new(catalog, resolver, judge, "playlist-1"),
            generator,
        )
    }

    #[tokio::test]
    async fn approved_track_is_added() {
        let catalog = FakeCatalog::with_tracks(vec![sample_track("t1", false)]);
        let (pipeline, _) = pipeline_with(
            catalog.clone(),
            Some(clean_lyrics()),
            r#"{"approved": true, "reason": "harmless"}"#,
        );

        let outcome = pipeline.handle("Bohemian Rhapsody - Queen").await.unwrap();
        match outcome {
            RequestOutcome::Added {
                track,
                reason,
                lyrics_source,
            } => {
                assert_eq!(track.id, "t1");
                assert_eq!(reason, "harmless");
                assert_eq!(lyrics_source, Some(SourceTag::Letras));
            }
            other => panic!("expected Added, got {:?}", other),
        }
        assert_eq!(catalog.add_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn rejected_track_is_not_added() {
        let catalog = FakeCatalog::with_tracks(vec![sample_track("t1", true)]);
        let (pipeline, _) = pipeline_with(
            catalog.clone(),
            Some(clean_lyrics()),
            r#"{"approved": false, "reason": "too heavy"}"#,
        );

        let outcome = pipeline.handle("something").await.unwrap();
        match outcome {
            RequestOutcome::Rejected { reason, .. } => assert_eq!(reason, "too heavy"),
            other => panic!("expected Rejected, got {:?}", other),
        }
        assert_eq!(catalog.add_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn repeat_requests_never_insert_twice() {
        let catalog = FakeCatalog::with_tracks(vec![sample_track("t1", false)]);
        let (pipeline, _) = pipeline_with(
            catalog.clone(),
            Some(clean_lyrics()),
            r#"{"approved": true, "reason": "fine"}"#,
        );

        let first = pipeline.handle("req").await.unwrap();
        assert!(matches!(first, RequestOutcome::Added { .. }));

        for _ in 0..2 {
            let outcome = pipeline.handle("req").await.unwrap();
            assert!(matches!(outcome, RequestOutcome::Duplicate { .. }));
        }
        // membership pre-check short-circuits, so only the first request
        // ever reached the mutation endpoint
        assert_eq!(catalog.add_calls.load(Ordering::SeqCst), 1);
        assert_eq!(catalog.playlist.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_lyrics_feeds_sentinel_to_judge() {
        let catalog = FakeCatalog::with_tracks(vec![sample_track("t1", true)]);
        let (pipeline, generator) = pipeline_with(
            catalog,
            None,
            r#"{"approved": false, "reason": "explicit tag and unknown lyrics"}"#,
        );

        let outcome = pipeline.handle("req").await.unwrap();
        assert!(matches!(outcome, RequestOutcome::Rejected { .. }));

        let prompts = generator.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains(crate::moderation::MISSING_LYRICS_SENTINEL));
    }

    #[tokio::test]
    async fn empty_catalog_is_not_found() {
        let catalog = FakeCatalog::with_tracks(Vec::new());
        let (pipeline, generator) = pipeline_with(
            catalog,
            Some(clean_lyrics()),
            r#"{"approved": true, "reason": "x"}"#,
        );

        let outcome = pipeline.handle("gibberish").await.unwrap();
        assert!(matches!(outcome, RequestOutcome::NotFound));
        // the judge is never consulted for unresolvable requests
        assert!(generator.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn mutation_failure_is_reported_as_add_failed() {
        let catalog = FakeCatalog::failing_add(vec![sample_track("t1", false)]);
        let (pipeline, _) = pipeline_with(
            catalog,
            Some(clean_lyrics()),
            r#"{"approved": true, "reason": "fine"}"#,
        );

        let outcome = pipeline.handle("req").await.unwrap();
        match outcome {
            RequestOutcome::AddFailed { reason, error, .. } => {
                // the approval survives the operational failure
                assert_eq!(reason, "fine");
                assert!(error.contains("playlist service"));
            }
            other => panic!("expected AddFailed, got {:?}", other),
        }
    }
}
