use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use dj_request_server::catalog::CatalogServiceClient;
use dj_request_server::config::{AppConfig, CliConfig, FileConfig};
use dj_request_server::lyrics::sources::{
    GeniusSource, LetrasSource, LyricsOvhSource, VagalumeSource,
};
use dj_request_server::lyrics::{LyricsResolver, LyricsSource};
use dj_request_server::lyrics_cache::SqliteLyricsCache;
use dj_request_server::moderation::{GeminiClient, ModerationJudge};
use dj_request_server::request::RequestPipeline;
use dj_request_server::server::run_server;

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to a TOML config file. Values in the file override CLI flags.
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// Path to the SQLite lyrics cache database file.
    #[clap(long)]
    pub cache_db: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 3001)]
    pub port: u16,

    /// Identifier of the playlist approved tracks are appended to.
    #[clap(long)]
    pub playlist_id: Option<String>,

    /// Base URL of the catalog/playlist service.
    #[clap(long)]
    pub catalog_url: Option<String>,

    /// Bearer credential for the catalog service (or CATALOG_API_TOKEN).
    #[clap(long)]
    pub catalog_api_token: Option<String>,

    /// Timeout in seconds for catalog service requests.
    #[clap(long, default_value_t = 30)]
    pub catalog_timeout_sec: u64,

    /// API key for the generative backend (or GEMINI_API_KEY).
    #[clap(long)]
    pub gemini_api_key: Option<String>,

    /// Model used for moderation judgments.
    #[clap(long, default_value = "gemini-2.5-flash")]
    pub gemini_model: String,

    /// Override the generative backend base URL.
    #[clap(long)]
    pub gemini_base_url: Option<String>,

    /// Access token for the Genius lyrics source (or GENIUS_ACCESS_TOKEN).
    /// Without it the source is skipped.
    #[clap(long)]
    pub genius_access_token: Option<String>,
}

impl CliArgs {
    fn into_cli_config(self) -> (Option<PathBuf>, CliConfig) {
        let config_path = self.config;
        let cli = CliConfig {
            cache_db_path: self.cache_db,
            port: self.port,
            playlist_id: self.playlist_id,
            catalog_url: self.catalog_url,
            catalog_api_token: self.catalog_api_token,
            catalog_timeout_sec: self.catalog_timeout_sec,
            gemini_api_key: self.gemini_api_key,
            gemini_model: self.gemini_model,
            gemini_base_url: self.gemini_base_url,
            genius_access_token: self.genius_access_token,
        };
        (config_path, cli)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    let (config_path, cli_config) = cli_args.into_cli_config();
    let file_config = match &config_path {
        Some(path) => Some(FileConfig::load(path)?),
        None => None,
    };
    let config = AppConfig::resolve(&cli_config, file_config)?;

    info!(
        "Opening SQLite lyrics cache at {:?}...",
        config.cache_db_path
    );
    let cache = Arc::new(SqliteLyricsCache::new(&config.cache_db_path)?);

    // Sources in priority order, most structurally reliable first; the
    // scrape goes last.
    if config.genius_access_token.is_none() {
        info!("No Genius access token configured, source disabled");
    }
    let sources: Vec<Arc<dyn LyricsSource>> = vec![
        Arc::new(GeniusSource::new(config.genius_access_token.clone())),
        Arc::new(VagalumeSource::new()),
        Arc::new(LyricsOvhSource::new()),
        Arc::new(LetrasSource::new()),
    ];
    let resolver = LyricsResolver::new(cache.clone(), sources);

    let gemini = match &config.gemini_base_url {
        Some(base_url) => GeminiClient::with_base_url(
            base_url.clone(),
            config.gemini_model.clone(),
            config.gemini_api_key.clone(),
        ),
        None => GeminiClient::new(config.gemini_model.clone(), config.gemini_api_key.clone()),
    };
    let judge = ModerationJudge::new(Arc::new(gemini));

    info!("Catalog service configured at {}", config.catalog_url);
    let catalog = Arc::new(CatalogServiceClient::new(
        config.catalog_url.clone(),
        config.catalog_api_token.clone(),
        config.catalog_timeout_sec,
    ));

    let pipeline = Arc::new(RequestPipeline::new(
        catalog,
        resolver,
        judge,
        config.playlist_id.clone(),
    ));

    info!("Ready to serve at port {}!", config.port);
    run_server(pipeline, cache, config.port).await
}
