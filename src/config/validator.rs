use anyhow::{Context, Result, anyhow};

use super::defaults::BID_TYPES;
use super::schema::{ApiConfig, Config, UiConfig};
use crate::input::KeyMap;
use crate::template::TemplateEngine;

/// Ten years back is as far as the search form will default
const MAX_DEFAULT_DAYS: i64 = 3650;

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(config: &Config) -> Result<()> {
        // Validate version
        if config.version != "v1" {
            return Err(anyhow!(
                "Unsupported config version: {}. Expected: v1",
                config.version
            ));
        }

        // Validate app name
        if config.app.name.trim().is_empty() {
            return Err(anyhow!("App name cannot be empty"));
        }

        Self::validate_api(&config.api).context("Invalid api section")?;
        Self::validate_ui(&config.ui).context("Invalid ui section")?;

        if !(0..=MAX_DEFAULT_DAYS).contains(&config.search.default_days) {
            return Err(anyhow!(
                "search.default_days must be between 0 and {}, got {}",
                MAX_DEFAULT_DAYS,
                config.search.default_days
            ));
        }

        if !BID_TYPES
            .iter()
            .any(|(code, _)| *code == config.search.bid_type)
        {
            return Err(anyhow!(
                "Unknown search.bid_type '{}'. Valid types: {:?}",
                config.search.bid_type,
                BID_TYPES.iter().map(|(code, _)| *code).collect::<Vec<_>>()
            ));
        }

        Self::validate_export_filename(&config.export.filename)
            .context("Invalid export.filename")?;

        tracing_subscriber::EnvFilter::try_new(&config.logging.level)
            .with_context(|| format!("Invalid logging.level: {}", config.logging.level))?;

        KeyMap::from_overrides(&config.keybindings)
            .map_err(|e| anyhow!("Invalid keybindings: {}", e))?;

        Ok(())
    }

    fn validate_api(api: &ApiConfig) -> Result<()> {
        let url = reqwest::Url::parse(&api.base_url)
            .with_context(|| format!("Invalid base_url: {}", api.base_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(anyhow!("base_url must be http or https, got {}", url.scheme()));
        }

        humantime::parse_duration(&api.timeout)
            .with_context(|| format!("Invalid timeout format: {}", api.timeout))?;

        for (name, path) in [
            ("agencies", &api.paths.agencies),
            ("search", &api.paths.search),
            ("delete", &api.paths.delete),
            ("export", &api.paths.export),
        ] {
            if path.trim().is_empty() {
                return Err(anyhow!("API path '{}' cannot be empty", name));
            }
        }

        Ok(())
    }

    fn validate_ui(ui: &UiConfig) -> Result<()> {
        for (name, value) in [
            ("feedback_duration", &ui.feedback_duration),
            ("clock_interval", &ui.clock_interval),
            ("tick_rate", &ui.tick_rate),
        ] {
            let duration = humantime::parse_duration(value)
                .with_context(|| format!("Invalid {} format: {}", name, value))?;
            if duration.is_zero() {
                return Err(anyhow!("{} must be greater than zero", name));
            }
        }
        Ok(())
    }

    fn validate_export_filename(template: &str) -> Result<()> {
        if template.trim().is_empty() {
            return Err(anyhow!("Export filename cannot be empty"));
        }

        let engine = TemplateEngine::new().map_err(|e| anyhow!("{}", e))?;
        let rendered = engine
            .render_filename(template, "20240101_000000")
            .map_err(|e| anyhow!("{}", e))?;

        if rendered.contains('/') || rendered.contains('\\') {
            return Err(anyhow!(
                "Export filename must not contain path separators: {}",
                rendered
            ));
        }

        Ok(())
    }
}
