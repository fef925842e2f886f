use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Core settings (can override CLI)
    pub cache_db_path: Option<String>,
    pub port: Option<u16>,
    pub playlist_id: Option<String>,

    // Catalog service
    pub catalog_url: Option<String>,
    pub catalog_api_token: Option<String>,
    pub catalog_timeout_sec: Option<u64>,

    // Generative backend
    pub gemini_api_key: Option<String>,
    pub gemini_model: Option<String>,
    pub gemini_base_url: Option<String>,

    // Lyrics sources
    pub genius_access_token: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
