use anyhow::Result;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

pub mod defaults;
pub mod duration_serde;

use defaults::*;

use crate::errors::{AppError, AppResult};
use crate::imaging::AspectRatio;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub imaging: ImagingConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Remote APOD endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_api_key")]
    pub api_key: String,
    /// Ask the API for the high resolution image
    #[serde(default = "default_hd")]
    pub hd: bool,
    #[serde(default = "default_connect_timeout", with = "duration_serde")]
    pub connect_timeout: Duration,
    #[serde(default = "default_request_timeout", with = "duration_serde")]
    pub request_timeout: Duration,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding manifests and images; defaults to the executable's directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImagingConfig {
    #[serde(default = "default_aspect_width")]
    pub aspect_width: u32,
    #[serde(default = "default_aspect_height")]
    pub aspect_height: u32,
    /// Bounding box edge for thumbnails, in pixels
    #[serde(default = "default_thumbnail_size")]
    pub thumbnail_size: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Time zone the date key is computed in
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Write the negative marker when the metadata request itself fails
    #[serde(default = "default_mark_transport_failures")]
    pub mark_transport_failures: bool,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}
fn default_api_key() -> String {
    DEFAULT_API_KEY.to_string()
}
fn default_hd() -> bool {
    DEFAULT_HD
}
fn default_connect_timeout() -> Duration {
    Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECONDS)
}
fn default_request_timeout() -> Duration {
    Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECONDS)
}
fn default_aspect_width() -> u32 {
    DEFAULT_ASPECT_WIDTH
}
fn default_aspect_height() -> u32 {
    DEFAULT_ASPECT_HEIGHT
}
fn default_thumbnail_size() -> u32 {
    DEFAULT_THUMBNAIL_SIZE
}
fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}
fn default_mark_transport_failures() -> bool {
    DEFAULT_MARK_TRANSPORT_FAILURES
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: default_api_key(),
            hd: default_hd(),
            connect_timeout: default_connect_timeout(),
            request_timeout: default_request_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for ImagingConfig {
    fn default() -> Self {
        Self {
            aspect_width: default_aspect_width(),
            aspect_height: default_aspect_height(),
            thumbnail_size: default_thumbnail_size(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            mark_transport_failures: default_mark_transport_failures(),
        }
    }
}

impl ImagingConfig {
    pub fn aspect_ratio(&self) -> AppResult<AspectRatio> {
        AspectRatio::new(self.aspect_width, self.aspect_height)
    }
}

impl CacheConfig {
    pub fn tz(&self) -> AppResult<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| AppError::configuration(format!("Unknown timezone '{}': {e}", self.timezone)))
    }
}

impl Config {
    pub fn load_from_file(config_file: &str) -> Result<Self> {
        let mut config = if Path::new(config_file).exists() {
            let contents = std::fs::read_to_string(config_file)?;
            toml::from_str::<Self>(&contents)?
        } else {
            let default_config = Self::default();
            let contents = toml::to_string_pretty(&default_config)?;
            match std::fs::write(config_file, contents) {
                Ok(()) => info!("Created default config file: {}", config_file),
                Err(e) => warn!(
                    "Could not write default config file {}: {}; using defaults",
                    config_file, e
                ),
            }
            default_config
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply `APOD_*` overrides from the given variable lookup
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(api_key) = lookup(ENV_API_KEY).filter(|v| !v.trim().is_empty()) {
            self.api.api_key = api_key;
        }
        if let Some(base_path) = lookup(ENV_BASE_PATH).filter(|v| !v.trim().is_empty()) {
            self.storage.base_path = Some(PathBuf::from(base_path));
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.api.api_key.trim().is_empty() {
            return Err(AppError::configuration("api.api_key must not be empty"));
        }
        url::Url::parse(&self.api.endpoint).map_err(|e| {
            AppError::configuration(format!("Invalid api.endpoint '{}': {e}", self.api.endpoint))
        })?;
        self.imaging.aspect_ratio()?;
        if self.imaging.thumbnail_size == 0 {
            return Err(AppError::configuration("imaging.thumbnail_size must be greater than 0"));
        }
        self.cache.tz()?;
        Ok(())
    }

    /// Directory the cache lives in
    pub fn base_path(&self) -> AppResult<PathBuf> {
        if let Some(path) = &self.storage.base_path {
            return Ok(path.clone());
        }

        let exe = std::env::current_exe()?;
        exe.parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| AppError::configuration("Cannot determine the executable's directory"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.endpoint, "https://api.nasa.gov/planetary/apod");
        assert_eq!(config.api.api_key, "DEMO_KEY");
        assert!(config.api.hd);
        assert_eq!(config.imaging.aspect_width, 16);
        assert_eq!(config.imaging.aspect_height, 9);
        assert_eq!(config.imaging.thumbnail_size, 128);
        assert_eq!(config.cache.tz().unwrap(), chrono_tz::US::Eastern);
        assert!(!config.cache.mark_transport_failures);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [api]
            api_key = "abc123"
            request_timeout = "2m"

            [imaging]
            aspect_width = 21
            "#,
        )
        .unwrap();

        assert_eq!(config.api.api_key, "abc123");
        assert_eq!(config.api.request_timeout, Duration::from_secs(120));
        assert_eq!(config.api.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.imaging.aspect_width, 21);
        assert_eq!(config.imaging.aspect_height, 9);
        assert_eq!(config.cache.timezone, "US/Eastern");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.imaging.aspect_height = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.imaging.thumbnail_size = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.cache.timezone = "Mars/Olympus_Mons".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.api.api_key = "   ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides() {
        let mut config = Config::default();
        config.apply_overrides(|key| match key {
            ENV_API_KEY => Some("from-env".to_string()),
            ENV_BASE_PATH => Some("/var/cache/apod".to_string()),
            _ => None,
        });
        assert_eq!(config.api.api_key, "from-env");
        assert_eq!(config.base_path().unwrap(), PathBuf::from("/var/cache/apod"));

        let mut config = Config::default();
        config.apply_overrides(|_| Some(String::new()));
        assert_eq!(config.api.api_key, "DEMO_KEY");
        assert!(config.storage.base_path.is_none());
    }

    #[test]
    fn test_load_writes_default_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("apod.toml");
        let path_str = path.to_str().unwrap();

        let config = Config::load_from_file(path_str).unwrap();
        assert!(path.exists());
        assert_eq!(config.imaging.thumbnail_size, 128);

        // Second load reads the written file back
        let reloaded = Config::load_from_file(path_str).unwrap();
        assert_eq!(reloaded.api.endpoint, config.api.endpoint);
        assert_eq!(reloaded.api.request_timeout, config.api.request_timeout);
    }

    #[test]
    fn test_load_falls_back_to_defaults_when_unwritable() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join("apod.toml");

        let config = Config::load_from_file(path.to_str().unwrap()).unwrap();
        assert!(!path.exists());
        assert_eq!(config.api.endpoint, "https://api.nasa.gov/planetary/apod");
        assert_eq!(config.imaging.thumbnail_size, 128);
    }
}
