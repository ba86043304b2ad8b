use std::path::{Path, PathBuf};

use mcp_common::youtube::YouTubeClientConfig;

use crate::error::AppError;

/// YouTube's special playlist id for the signed-in user's Watch Later list.
pub const WATCH_LATER_PLAYLIST_ID: &str = "WL";
const DEFAULT_PLAYLIST_CACHE_TTL_SECS: u64 = 900;

/// Application configuration loaded explicitly from environment variables.
///
/// Every credential is optional. Tools that need a missing one answer with a
/// `no_api_key` / `no_credentials` status instead of failing.
#[derive(Debug, Clone)]
pub struct Config {
    /// YouTube Data API client settings, including the API key / OAuth token.
    pub youtube: YouTubeClientConfig,
    /// Playlist to analyze (`YOUTUBE_PLAYLIST_ID`, default `WL`).
    pub playlist_id: String,
    pub notion_api_key: Option<String>,
    /// Path to the Google Calendar credentials JSON file.
    pub google_credentials_file: Option<PathBuf>,
    /// Redis connection URL (e.g. "redis://127.0.0.1:6379"). `None` disables caching.
    pub redis_url: Option<String>,
    /// Lifetime of cached playlist snapshots. Zero disables playlist caching.
    pub playlist_cache_ttl_secs: u64,
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// Optional:
    /// - `YOUTUBE_API_KEY` / `YOUTUBE_ACCESS_TOKEN`: YouTube credentials
    /// - `YOUTUBE_PLAYLIST_ID`: playlist to work on (default `WL`)
    /// - `NOTION_API_KEY`: enables the Notion export tool
    /// - `GOOGLE_CREDENTIALS_FILE`: enables the scheduling tool when the file exists
    /// - `REDIS_URL`: Redis connection string (omit to disable caching)
    /// - `PLAYLIST_CACHE_TTL_SECS`: playlist cache lifetime (default 900)
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let playlist_cache_ttl_secs = match var("PLAYLIST_CACHE_TTL_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                AppError::Config(format!(
                    "PLAYLIST_CACHE_TTL_SECS must be a non-negative integer, got {raw:?}"
                ))
            })?,
            None => DEFAULT_PLAYLIST_CACHE_TTL_SECS,
        };

        Ok(Self {
            youtube: YouTubeClientConfig::from_lookup(&lookup),
            playlist_id: var("YOUTUBE_PLAYLIST_ID")
                .unwrap_or_else(|| WATCH_LATER_PLAYLIST_ID.to_string()),
            notion_api_key: var("NOTION_API_KEY"),
            google_credentials_file: var("GOOGLE_CREDENTIALS_FILE").map(PathBuf::from),
            redis_url: var("REDIS_URL"),
            playlist_cache_ttl_secs,
        })
    }

    pub fn has_youtube(&self) -> bool {
        self.youtube.has_credentials()
    }

    pub fn has_notion(&self) -> bool {
        self.notion_api_key.is_some()
    }

    /// True only when the credentials file is configured and present on disk.
    pub fn has_google_credentials(&self) -> bool {
        self.google_credentials_file
            .as_deref()
            .is_some_and(Path::exists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, AppError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.playlist_id, "WL");
        assert_eq!(config.playlist_cache_ttl_secs, 900);
        assert!(!config.has_youtube());
        assert!(!config.has_notion());
        assert!(!config.has_google_credentials());
        assert!(config.redis_url.is_none());
    }

    #[test]
    fn reads_credentials_and_overrides() {
        let config = config_from(&[
            ("YOUTUBE_API_KEY", "yt-key"),
            ("YOUTUBE_PLAYLIST_ID", "PL123"),
            ("NOTION_API_KEY", "secret_abc"),
            ("REDIS_URL", "redis://127.0.0.1:6379"),
            ("PLAYLIST_CACHE_TTL_SECS", "60"),
        ])
        .unwrap();
        assert!(config.has_youtube());
        assert!(config.has_notion());
        assert_eq!(config.playlist_id, "PL123");
        assert_eq!(config.playlist_cache_ttl_secs, 60);
        assert_eq!(config.redis_url.as_deref(), Some("redis://127.0.0.1:6379"));
    }

    #[test]
    fn blank_values_are_unset() {
        let config = config_from(&[("NOTION_API_KEY", "  "), ("YOUTUBE_PLAYLIST_ID", "")]).unwrap();
        assert!(!config.has_notion());
        assert_eq!(config.playlist_id, "WL");
    }

    #[test]
    fn invalid_ttl_is_rejected() {
        let err = config_from(&[("PLAYLIST_CACHE_TTL_SECS", "soon")]).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn missing_credentials_file_is_not_configured() {
        let config = config_from(&[("GOOGLE_CREDENTIALS_FILE", "/nonexistent/credentials.json")]).unwrap();
        assert!(config.google_credentials_file.is_some());
        assert!(!config.has_google_credentials());
    }
}
