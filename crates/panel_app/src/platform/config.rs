use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use panel_core::{
    Locale, PanelSettings, DEFAULT_FEEDBACK_MS, DEFAULT_LIMIT, DEFAULT_OUT_DIR, DEFAULT_PER_PAGE,
    DEFAULT_POLL_PERIOD_MS, DEFAULT_TICKER_PERIOD_MS,
};
use panel_engine::ApiSettings;
use panel_logging::{panel_info, LevelFilter};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use super::logging::LogDestination;

pub const DEFAULT_CONFIG_PATH: &str = "panel.ron";
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/";
pub const DEFAULT_SNAPSHOT_PATH: &str = "panel.html";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
    #[error("invalid base URL '{url}': {source}")]
    BaseUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("base URL '{0}' cannot carry paths")]
    OpaqueBaseUrl(String),
    #[error("unknown log level '{0}'")]
    LogLevel(String),
}

/// Everything the binary reads from its RON file. Missing fields take defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    pub base_url: String,
    pub per_page: u32,
    pub ticker_period_ms: i64,
    pub poll_period_ms: i64,
    pub feedback_ms: i64,
    pub default_limit: u32,
    pub default_out_dir: String,
    pub locale: Locale,
    pub snapshot_path: PathBuf,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub log_destination: LogDestination,
    pub log_level: String,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            per_page: DEFAULT_PER_PAGE,
            ticker_period_ms: DEFAULT_TICKER_PERIOD_MS,
            poll_period_ms: DEFAULT_POLL_PERIOD_MS,
            feedback_ms: DEFAULT_FEEDBACK_MS,
            default_limit: DEFAULT_LIMIT,
            default_out_dir: DEFAULT_OUT_DIR.to_string(),
            locale: Locale::default(),
            snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT_PATH),
            connect_timeout_secs: 10,
            request_timeout_secs: 30,
            log_destination: LogDestination::File,
            log_level: "info".to_string(),
        }
    }
}

impl PanelConfig {
    /// Reads `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let config = ron::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        panel_info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// The base URL with a trailing slash so relative endpoints append to it.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let mut url = Url::parse(self.base_url.trim()).map_err(|source| ConfigError::BaseUrl {
            url: self.base_url.clone(),
            source,
        })?;
        if url.cannot_be_a_base() {
            return Err(ConfigError::OpaqueBaseUrl(self.base_url.clone()));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }

    pub fn log_level(&self) -> Result<LevelFilter, ConfigError> {
        panel_logging::parse_level(&self.log_level)
            .ok_or_else(|| ConfigError::LogLevel(self.log_level.clone()))
    }

    pub fn panel_settings(&self) -> Result<PanelSettings, ConfigError> {
        let defaults = PanelSettings::new(self.base_url()?);
        Ok(PanelSettings {
            per_page: self.per_page.max(1),
            ticker_period_ms: self.ticker_period_ms.max(1),
            poll_period_ms: self.poll_period_ms.max(1),
            feedback_ms: self.feedback_ms.max(0),
            default_limit: self.default_limit.max(1),
            default_out_dir: self.default_out_dir.clone(),
            locale: self.locale,
            ..defaults
        })
    }

    pub fn api_settings(&self) -> Result<ApiSettings, ConfigError> {
        Ok(ApiSettings {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            ..ApiSettings::new(self.base_url()?)
        })
    }
}
