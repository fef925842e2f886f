//! Test server lifecycle management
//!
//! Spawns an isolated server per test: random port, in-memory lyrics
//! cache, scripted collaborators. Dropping the handle shuts the server
//! down.

use std::sync::Arc;

use tokio::net::TcpListener;

use dj_request_server::lyrics::{LyricsResolver, LyricsSource};
use dj_request_server::lyrics_cache::{LyricsCache, SqliteLyricsCache};
use dj_request_server::moderation::ModerationJudge;
use dj_request_server::request::RequestPipeline;
use dj_request_server::server::make_app;

use super::fixtures::{FixtureCatalog, FixtureGenerator, TestSetup};

pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// Collaborator handles for direct assertions in tests
    pub catalog: Arc<FixtureCatalog>,
    pub generator: Arc<FixtureGenerator>,
    pub cache: Arc<dyn LyricsCache>,

    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawns a new test server wired to the given scripted setup.
    ///
    /// # Panics
    ///
    /// Panics if port binding or server startup fails.
    pub async fn spawn(setup: TestSetup) -> Self {
        let catalog = FixtureCatalog::new(setup.tracks);
        let generator = FixtureGenerator::new(setup.backend);

        let cache: Arc<dyn LyricsCache> =
            Arc::new(SqliteLyricsCache::in_memory().expect("Failed to create test cache"));

        let sources: Vec<Arc<dyn LyricsSource>> = setup
            .sources
            .iter()
            .map(|s| s.clone() as Arc<dyn LyricsSource>)
            .collect();
        let resolver = LyricsResolver::new(cache.clone(), sources);
        let judge = ModerationJudge::new(generator.clone());

        let pipeline = Arc::new(RequestPipeline::new(
            catalog.clone(),
            resolver,
            judge,
            "test-playlist",
        ));

        let app = make_app(pipeline, cache.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let port = listener
            .local_addr()
            .expect("Failed to read local address")
            .port();

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .expect("Test server crashed");
        });

        Self {
            base_url: format!("http://127.0.0.1:{}", port),
            catalog,
            generator,
            cache,
            _shutdown_tx: Some(shutdown_tx),
        }
    }
}
