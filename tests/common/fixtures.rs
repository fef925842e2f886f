//! Scripted stand-ins for the external collaborators.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use dj_request_server::catalog::{MusicCatalog, PlaylistAddStatus, SearchScope, Track};
use dj_request_server::lyrics::{LyricsSource, ReliabilityTier, SourceTag};
use dj_request_server::moderation::llm::{GenerationError, TextGenerator};

pub fn sample_track(id: &str, title: &str, artist: &str, explicit: bool) -> Track {
    Track {
        id: id.to_string(),
        title: title.to_string(),
        artists: vec![artist.to_string()],
        is_explicit: explicit,
        thumbnail_url: Some("https://img.example/cover.jpg".to_string()),
        album: None,
    }
}

/// Realistically-sized scraped lyric text: ~2000 chars over 40 lines.
pub fn clean_scraped_lyrics() -> String {
    (0..40)
        .map(|i| format!("verse {:02} about sunshine and gentle friendship xxxx", i))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Catalog fixture with an in-memory playlist mirroring the real
/// service's duplicate reporting.
pub struct FixtureCatalog {
    tracks: Vec<Track>,
    pub playlist: Mutex<Vec<String>>,
    pub add_calls: AtomicUsize,
}

impl FixtureCatalog {
    pub fn new(tracks: Vec<Track>) -> Arc<Self> {
        Arc::new(Self {
            tracks,
            playlist: Mutex::new(Vec::new()),
            add_calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl MusicCatalog for FixtureCatalog {
    async fn search_tracks(&self, _query: &str, scope: SearchScope) -> Result<Vec<Track>> {
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
        let mut playlist = self.playlist.lock().unwrap();
        if playlist.iter().any(|id| id == track_id) {
            return Ok(PlaylistAddStatus::Duplicate);
        }
        playlist.push(track_id.to_string());
        Ok(PlaylistAddStatus::Success)
    }
}

/// Lyrics source fixture returning a fixed payload.
pub struct FixtureSource {
    tag: SourceTag,
    tier: ReliabilityTier,
    text: Option<String>,
    pub calls: AtomicUsize,
}

impl FixtureSource {
    pub fn scrape(text: Option<String>) -> Arc<Self> {
        Arc::new(Self {
            tag: SourceTag::Letras,
            tier: ReliabilityTier::BestEffort,
            text,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn trusted(tag: SourceTag, text: Option<String>) -> Arc<Self> {
        Arc::new(Self {
            tag,
            tier: ReliabilityTier::Trusted,
            text,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl LyricsSource for FixtureSource {
    fn tag(&self) -> SourceTag {
        self.tag
    }

    fn tier(&self) -> ReliabilityTier {
        self.tier
    }

    async fn fetch(&self, _title: &str, _artist: &str) -> Result<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.text.clone())
    }
}

/// What the scripted backend should do for every generation call.
#[derive(Clone)]
pub enum BackendScript {
    Respond(String),
    Fail,
}

pub struct FixtureGenerator {
    script: BackendScript,
    pub prompts: Mutex<Vec<String>>,
}

impl FixtureGenerator {
    pub fn new(script: BackendScript) -> Arc<Self> {
        Arc::new(Self {
            script,
            prompts: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl TextGenerator for FixtureGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.script {
            BackendScript::Respond(text) => Ok(text.clone()),
            BackendScript::Fail => Err(GenerationError::Connection("backend unreachable".into())),
        }
    }
}

/// Everything a test server needs scripted up front.
pub struct TestSetup {
    pub tracks: Vec<Track>,
    pub sources: Vec<Arc<FixtureSource>>,
    pub backend: BackendScript,
}

impl TestSetup {
    pub fn approving(tracks: Vec<Track>, sources: Vec<Arc<FixtureSource>>) -> Self {
        Self {
            tracks,
            sources,
            backend: BackendScript::Respond(
                r#"{"approved": true, "reason": "mild and danceable"}"#.to_string(),
            ),
        }
    }
}
