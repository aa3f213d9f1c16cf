use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// The feed refuses windows wider than this many rows
pub const MAX_PAGE_SIZE: u32 = 1000;

fn default_feed_url() -> String {
    "http://openapi.seoul.go.kr:8088".to_string()
}
fn default_data_type() -> String {
    "json".to_string()
}
fn default_service() -> String {
    "touristFoodInfo".to_string()
}
fn default_page_size() -> u32 {
    100
}
fn default_kakao_url() -> String {
    "https://dapi.kakao.com".to_string()
}
fn default_radius_m() -> u32 {
    20
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_database() -> PathBuf {
    PathBuf::from("venuesync.db")
}

#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub database: Option<PathBuf>,
    #[serde(default)]
    pub feed: Option<FeedConfig>,
    #[serde(default)]
    pub kakao: Option<KakaoConfig>,
}

/// Public open-data feed settings
#[derive(Debug, Deserialize, Clone)]
pub struct FeedConfig {
    #[serde(default = "default_feed_url")]
    pub base_url: String,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default = "default_data_type")]
    pub data_type: String,
    #[serde(default = "default_service")]
    pub service: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: default_feed_url(),
            key: None,
            data_type: default_data_type(),
            service: default_service(),
            page_size: default_page_size(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl FeedConfig {
    /// Page size clamped to what the feed accepts.
    pub fn effective_page_size(&self) -> u32 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }
}

/// Kakao Local API settings
#[derive(Debug, Deserialize, Clone)]
pub struct KakaoConfig {
    #[serde(default = "default_kakao_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    /// Search radius around the geocoded point for the category lookup
    #[serde(default = "default_radius_m")]
    pub radius_m: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for KakaoConfig {
    fn default() -> Self {
        Self {
            base_url: default_kakao_url(),
            api_key: None,
            radius_m: default_radius_m(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl FileConfig {
    /// Load the first config file found on the search path.
    pub fn load() -> Option<Self> {
        let config_paths = get_config_paths();

        for path in config_paths {
            if path.exists()
                && let Ok(contents) = std::fs::read_to_string(&path)
            {
                match toml::from_str(&contents) {
                    Ok(config) => return Some(config),
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "failed to parse config file");
                    }
                }
            }
        }
        None
    }

    /// Load an explicitly named config file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&contents).context("Failed to parse config file")
    }

    pub fn database_path(&self) -> PathBuf {
        self.database.clone().unwrap_or_else(default_database)
    }

    pub fn feed_or_default(&self) -> FeedConfig {
        self.feed.clone().unwrap_or_default()
    }

    pub fn kakao_or_default(&self) -> KakaoConfig {
        self.kakao.clone().unwrap_or_default()
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("venuesync.toml"));
    paths.push(PathBuf::from(".venuesync.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("venuesync").join("config.toml"));
        paths.push(config_dir.join("venuesync.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".venuesync.toml"));
        paths.push(home.join(".config").join("venuesync").join("config.toml"));
    }

    paths
}
