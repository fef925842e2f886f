//! Configuration resolution: CLI arguments, optional TOML file, and
//! environment fallbacks for secrets, merged into one explicit struct that
//! is built once at startup and passed by reference from there on.

mod file_config;

pub use file_config::FileConfig;

use anyhow::{bail, Result};
use std::path::PathBuf;

/// CLI arguments that participate in config resolution. Mirrors the
/// fields a TOML config can override.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub cache_db_path: Option<PathBuf>,
    pub port: u16,
    pub playlist_id: Option<String>,
    pub catalog_url: Option<String>,
    pub catalog_api_token: Option<String>,
    pub catalog_timeout_sec: u64,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: Option<String>,
    pub genius_access_token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub cache_db_path: PathBuf,
    pub port: u16,
    pub playlist_id: String,

    pub catalog_url: String,
    pub catalog_api_token: String,
    pub catalog_timeout_sec: u64,

    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_base_url: Option<String>,

    /// Absent token disables the Genius source entirely; it is skipped,
    /// not attempted.
    pub genius_access_token: Option<String>,
}

impl AppConfig {
    /// Resolves configuration from CLI arguments and optional TOML file
    /// config. TOML values override CLI values where present; secrets
    /// missing from both fall back to the environment
    /// (`GEMINI_API_KEY`, `CATALOG_API_TOKEN`, `GENIUS_ACCESS_TOKEN`).
    ///
    /// Missing required values are a blocking error: no request may be
    /// processed against a partially-configured pipeline.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let cache_db_path = file
            .cache_db_path
            .map(PathBuf::from)
            .or_else(|| cli.cache_db_path.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("cache_db_path must be specified via CLI or in the config file")
            })?;

        let port = file.port.unwrap_or(cli.port);

        let Some(playlist_id) = file.playlist_id.or_else(|| cli.playlist_id.clone()) else {
            bail!("Configuration error: playlist_id is not set");
        };

        let Some(catalog_url) = file.catalog_url.or_else(|| cli.catalog_url.clone()) else {
            bail!("Configuration error: catalog_url is not set");
        };
        let catalog_api_token = file
            .catalog_api_token
            .or_else(|| cli.catalog_api_token.clone())
            .or_else(|| env_non_empty("CATALOG_API_TOKEN"));
        let Some(catalog_api_token) = catalog_api_token else {
            bail!(
                "Configuration error: catalog_api_token is not set \
                 (CLI, config file or CATALOG_API_TOKEN)"
            );
        };
        let catalog_timeout_sec = file.catalog_timeout_sec.unwrap_or(cli.catalog_timeout_sec);

        let gemini_api_key = file
            .gemini_api_key
            .or_else(|| cli.gemini_api_key.clone())
            .or_else(|| env_non_empty("GEMINI_API_KEY"));
        let Some(gemini_api_key) = gemini_api_key else {
            bail!(
                "Configuration error: gemini_api_key is not set \
                 (CLI, config file or GEMINI_API_KEY)"
            );
        };
        let gemini_model = file.gemini_model.unwrap_or_else(|| cli.gemini_model.clone());
        let gemini_base_url = file.gemini_base_url.or_else(|| cli.gemini_base_url.clone());

        let genius_access_token = file
            .genius_access_token
            .or_else(|| cli.genius_access_token.clone())
            .or_else(|| env_non_empty("GENIUS_ACCESS_TOKEN"));

        Ok(Self {
            cache_db_path,
            port,
            playlist_id,
            catalog_url,
            catalog_api_token,
            catalog_timeout_sec,
            gemini_api_key,
            gemini_model,
            gemini_base_url,
            genius_access_token,
        })
    }
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
