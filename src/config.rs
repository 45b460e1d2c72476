//! Configuration loaded from `bulkflow.toml` with environment overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::dataset::ColumnFilter;
use crate::{Error, Result};

/// Environment variable overriding `canvas.token`.
pub const TOKEN_ENV: &str = "CANVAS_API_TOKEN";
/// Environment variable overriding `canvas.base_url`.
pub const BASE_URL_ENV: &str = "CANVAS_BASE_URL";

/// Canvas API access.
#[derive(Clone, Deserialize)]
pub struct CanvasConfig {
    /// Instance root, e.g. `https://usu.instructure.com`.
    #[serde(default)]
    pub base_url: String,
    /// Bearer token sent on every API request.
    #[serde(default)]
    pub token: String,
    /// Total timeout for API calls; connect and idle-read timeout for file content.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_timeout() -> u64 {
    300
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            token: String::new(),
            timeout_secs: default_timeout(),
        }
    }
}

impl std::fmt::Debug for CanvasConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanvasConfig")
            .field("base_url", &self.base_url)
            .field("token", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Bulk downloader settings.
#[derive(Debug, Clone, Deserialize)]
pub struct DownloadConfig {
    /// CSV export to read.
    #[serde(default = "default_csv_file")]
    pub csv_file: PathBuf,
    /// Directory the files are written to (created if absent).
    #[serde(default = "default_output_folder")]
    pub output_folder: PathBuf,
    #[serde(default = "default_id_column")]
    pub id_column: String,
    #[serde(default = "default_name_column")]
    pub name_column: String,
    /// Every filter must match for a row to be downloaded.
    #[serde(default = "default_filters")]
    pub filters: Vec<ColumnFilter>,
    /// Skip every row whose sanitized filename occurs more than once.
    #[serde(default)]
    pub skip_duplicate_names: bool,
    /// Warn when the response Content-Type does not contain this value. Empty disables.
    #[serde(default = "default_content_type")]
    pub expected_content_type: String,
}

fn default_csv_file() -> PathBuf {
    PathBuf::from("export.csv")
}

fn default_output_folder() -> PathBuf {
    PathBuf::from("Downloads")
}

fn default_id_column() -> String {
    "Id".to_string()
}

fn default_name_column() -> String {
    "Name".to_string()
}

fn default_filters() -> Vec<ColumnFilter> {
    vec![
        ColumnFilter::new("Mime type", "application/pdf"),
        ColumnFilter::new("Ocred:2", "0"),
    ]
}

fn default_content_type() -> String {
    "application/pdf".to_string()
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            csv_file: default_csv_file(),
            output_folder: default_output_folder(),
            id_column: default_id_column(),
            name_column: default_name_column(),
            filters: default_filters(),
            skip_duplicate_names: false,
            expected_content_type: default_content_type(),
        }
    }
}

/// Bulk uploader settings.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    /// CSV export to read.
    #[serde(default = "default_csv_file")]
    pub csv_file: PathBuf,
    /// Directory holding the replacement files named in `file_column`.
    #[serde(default = "default_source_folder")]
    pub source_folder: PathBuf,
    #[serde(default = "default_id_column")]
    pub id_column: String,
    #[serde(default = "default_name_column")]
    pub file_column: String,
    /// Content type declared in the upload initiation.
    #[serde(default = "default_content_type")]
    pub content_type: String,
    /// Canvas duplicate policy; `overwrite` replaces the file in place.
    #[serde(default = "default_on_duplicate")]
    pub on_duplicate: String,
}

fn default_source_folder() -> PathBuf {
    PathBuf::from("Downloads/OCRed")
}

fn default_on_duplicate() -> String {
    "overwrite".to_string()
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            csv_file: default_csv_file(),
            source_folder: default_source_folder(),
            id_column: default_id_column(),
            file_column: default_name_column(),
            content_type: default_content_type(),
            on_duplicate: default_on_duplicate(),
        }
    }
}

/// Root configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Pause after each processed row, in milliseconds.
    #[serde(default = "default_row_delay")]
    pub row_delay_ms: u64,
    #[serde(default)]
    pub canvas: CanvasConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub download: DownloadConfig,
    #[serde(default)]
    pub upload: UploadConfig,
}

fn default_row_delay() -> u64 {
    1000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            row_delay_ms: default_row_delay(),
            canvas: CanvasConfig::default(),
            logging: LoggingConfig::default(),
            download: DownloadConfig::default(),
            upload: UploadConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Apply `CANVAS_API_TOKEN` and `CANVAS_BASE_URL`. Empty values are ignored.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(token) = std::env::var(TOKEN_ENV) {
            if !token.is_empty() {
                self.canvas.token = token;
            }
        }
        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            if !base_url.is_empty() {
                self.canvas.base_url = base_url;
            }
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.canvas.base_url.trim().is_empty() {
            return Err(Error::Config(format!(
                "canvas.base_url is not set. Set it in the config file or via {}.",
                BASE_URL_ENV
            )));
        }
        if self.canvas.token.trim().is_empty() {
            return Err(Error::Config(format!(
                "canvas.token is not set. Set it in the config file or via {}.",
                TOKEN_ENV
            )));
        }
        if self.canvas.timeout_secs == 0 {
            return Err(Error::Config(
                "canvas.timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
