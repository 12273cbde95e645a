use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use super::defaults;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub app: AppConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub search: SearchDefaults,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Overrides of the default key map, action name -> key ("space", "d", "ctrl+e")
    #[serde(default)]
    pub keybindings: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            app: AppConfig::default(),
            api: ApiConfig::default(),
            ui: UiConfig::default(),
            search: SearchDefaults::default(),
            export: ExportConfig::default(),
            logging: LoggingConfig::default(),
            keybindings: HashMap::new(),
        }
    }
}

fn default_version() -> String {
    "v1".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default = "default_app_name")]
    pub name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
        }
    }
}

fn default_app_name() -> String {
    defaults::DEFAULT_APP_NAME.to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout: String,
    #[serde(default)]
    pub paths: ApiPaths,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout: default_timeout(),
            paths: ApiPaths::default(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        humantime::parse_duration(&self.timeout).unwrap_or(Duration::from_secs(60))
    }

    /// Join a configured path onto the base URL.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

fn default_base_url() -> String {
    defaults::DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> String {
    "60s".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiPaths {
    #[serde(default = "default_agencies_path")]
    pub agencies: String,
    #[serde(default = "default_search_path")]
    pub search: String,
    #[serde(default = "default_delete_path")]
    pub delete: String,
    #[serde(default = "default_export_path")]
    pub export: String,
}

impl Default for ApiPaths {
    fn default() -> Self {
        Self {
            agencies: default_agencies_path(),
            search: default_search_path(),
            delete: default_delete_path(),
            export: default_export_path(),
        }
    }
}

fn default_agencies_path() -> String {
    "/api/agencies".to_string()
}

fn default_search_path() -> String {
    "/api/search".to_string()
}

fn default_delete_path() -> String {
    "/api/delete".to_string()
}

fn default_export_path() -> String {
    "/api/export/excel".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UiConfig {
    #[serde(default = "default_feedback_duration")]
    pub feedback_duration: String,
    #[serde(default = "default_clock_interval")]
    pub clock_interval: String,
    #[serde(default = "default_tick_rate")]
    pub tick_rate: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            feedback_duration: default_feedback_duration(),
            clock_interval: default_clock_interval(),
            tick_rate: default_tick_rate(),
        }
    }
}

impl UiConfig {
    pub fn feedback_duration(&self) -> Duration {
        humantime::parse_duration(&self.feedback_duration).unwrap_or(Duration::from_secs(3))
    }

    pub fn clock_interval(&self) -> Duration {
        humantime::parse_duration(&self.clock_interval).unwrap_or(Duration::from_secs(60))
    }

    pub fn tick_rate(&self) -> Duration {
        humantime::parse_duration(&self.tick_rate).unwrap_or(Duration::from_millis(100))
    }
}

fn default_feedback_duration() -> String {
    "3s".to_string()
}

fn default_clock_interval() -> String {
    "1m".to_string()
}

fn default_tick_rate() -> String {
    "100ms".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchDefaults {
    /// How many days back the start date defaults to
    #[serde(default = "default_days")]
    pub default_days: i64,
    #[serde(default = "default_bid_type")]
    pub bid_type: String,
}

impl Default for SearchDefaults {
    fn default() -> Self {
        Self {
            default_days: default_days(),
            bid_type: default_bid_type(),
        }
    }
}

fn default_days() -> i64 {
    7
}

fn default_bid_type() -> String {
    "all".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExportConfig {
    /// Falls back to the user's download directory, then the working directory
    #[serde(default)]
    pub directory: Option<PathBuf>,
    #[serde(default = "default_filename")]
    pub filename: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: None,
            filename: default_filename(),
        }
    }
}

impl ExportConfig {
    pub fn resolved_directory(&self) -> PathBuf {
        self.directory
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

fn default_filename() -> String {
    defaults::DEFAULT_EXPORT_FILENAME.to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub file: Option<PathBuf>,
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: None,
            level: default_log_level(),
        }
    }
}

impl LoggingConfig {
    pub fn resolved_file(&self) -> PathBuf {
        self.file.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("bidstack")
                .join("bidstack.log")
        })
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
