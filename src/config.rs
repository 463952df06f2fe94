use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Public base URL used when building frame post URLs.
    pub public_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8787,
            public_url: "http://localhost:8787".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuneQueries {
    pub fid_stats: u64,
    pub top_channels: u64,
    pub follower_tiers: u64,
    pub active_hours: u64,
    pub top_cast: u64,
    pub trending_words: u64,
    pub recommendations: u64,
}

impl Default for DuneQueries {
    fn default() -> Self {
        Self {
            fid_stats: 3_555_616,
            top_channels: 3_556_441,
            follower_tiers: 3_556_783,
            active_hours: 3_556_260,
            top_cast: 3_418_706,
            trending_words: 3_598_357,
            recommendations: 3_509_966,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuneConfig {
    pub api_key: String,
    pub api_base: String,
    pub queries: DuneQueries,
}

impl Default for DuneConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: "https://api.dune.com".to_string(),
            queries: DuneQueries::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeynarConfig {
    pub api_key: String,
    pub api_base: String,
}

impl Default for NeynarConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: "https://api.neynar.com".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub api_base: String,
    pub model: String,
    pub compress_model: String,
    /// Hard character limit for summarizer output, ellipsis included.
    pub char_budget: usize,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: "https://api.openai.com/v1".to_string(),
            model: "gpt-4-turbo".to_string(),
            compress_model: "gpt-3.5-turbo".to_string(),
            char_budget: 80,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// External frame-image renderer; screen text is passed in the query.
    pub image_base: String,
    /// Warpcast cast-image endpoint used for the top-cast screen.
    pub cast_image_base: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            image_base: "https://og.castsense.xyz/api/image".to_string(),
            cast_image_base: "https://client.warpcast.com/v2/cast-image".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub dune: DuneConfig,
    pub neynar: NeynarConfig,
    pub openai: OpenAiConfig,
    pub render: RenderConfig,
}

impl AppConfig {
    pub fn load(path: Option<PathBuf>) -> Result<(Self, Option<PathBuf>), String> {
        let config_path = path.or_else(default_config_path);
        let mut config = if let Some(path) = config_path.as_ref() {
            if path.exists() {
                let contents = std::fs::read_to_string(path)
                    .map_err(|err| format!("failed to read config: {}", err))?;
                toml::from_str(&contents)
                    .map_err(|err| format!("failed to parse config: {}", err))?
            } else {
                AppConfig::default()
            }
        } else {
            AppConfig::default()
        };

        config.apply_env_overrides();
        Ok((config, config_path))
    }

    pub fn write(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|err| format!("failed to create config dir: {}", err))?;
        }
        let payload = toml::to_string_pretty(self)
            .map_err(|err| format!("failed to serialize config: {}", err))?;
        std::fs::write(path, payload)
            .map_err(|err| format!("failed to write config: {}", err))?;
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(value) = env::var("DUNE_API_KEY") {
            if !value.trim().is_empty() {
                self.dune.api_key = value;
            }
        }
        if let Ok(value) = env::var("DUNE_API_BASE") {
            if !value.trim().is_empty() {
                self.dune.api_base = value;
            }
        }
        if let Ok(value) = env::var("NEYNAR_API_KEY") {
            if !value.trim().is_empty() {
                self.neynar.api_key = value;
            }
        }
        if let Ok(value) = env::var("NEYNAR_API_BASE") {
            if !value.trim().is_empty() {
                self.neynar.api_base = value;
            }
        }
        if let Ok(value) = env::var("OPENAI_API_KEY") {
            if !value.trim().is_empty() {
                self.openai.api_key = value;
            }
        }
        if let Ok(value) = env::var("OPENAI_API_BASE") {
            if !value.trim().is_empty() {
                self.openai.api_base = value;
            }
        }
        if let Ok(value) = env::var("OPENAI_MODEL") {
            if !value.trim().is_empty() {
                self.openai.model = value;
            }
        }
        if let Ok(value) = env::var("SUMMARY_CHAR_BUDGET") {
            if let Ok(budget) = value.parse::<usize>() {
                self.openai.char_budget = budget;
            }
        }
        if let Ok(value) = env::var("CASTSENSE_PUBLIC_URL") {
            if !value.trim().is_empty() {
                self.server.public_url = value;
            }
        }
        if let Ok(value) = env::var("CASTSENSE_IMAGE_BASE") {
            if !value.trim().is_empty() {
                self.render.image_base = value;
            }
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    env::var("CASTSENSE_CONFIG_PATH")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .or_else(|| Some(PathBuf::from("config/castsense.toml")))
}
