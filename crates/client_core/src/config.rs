use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::{
    controller::{
        ControllerTiming, DEFAULT_JOKE_INTERVAL, DEFAULT_NOTICE_DURATION, DEFAULT_NOTICE_INTERVAL,
        DEFAULT_REQUEST_TIMEOUT,
    },
    error::ConfigError,
};

pub const DEFAULT_SETTINGS_FILE: &str = "nps_updater.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub api_url: Option<String>,
    pub request_timeout_seconds: u64,
    pub joke_interval_ms: u64,
    pub notice_interval_seconds: u64,
    pub notice_duration_seconds: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_url: None,
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT.as_secs(),
            joke_interval_ms: DEFAULT_JOKE_INTERVAL.as_millis() as u64,
            notice_interval_seconds: DEFAULT_NOTICE_INTERVAL.as_secs(),
            notice_duration_seconds: DEFAULT_NOTICE_DURATION.as_secs(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    api_url: Option<String>,
    request_timeout_seconds: Option<u64>,
    joke_interval_ms: Option<u64>,
    notice_interval_seconds: Option<u64>,
    notice_duration_seconds: Option<u64>,
}

/// Defaults, then `nps_updater.toml` (or `config_path`), then environment.
pub fn load_settings(config_path: Option<&Path>) -> anyhow::Result<ClientSettings> {
    let mut settings = ClientSettings::default();

    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE));
    match fs::read_to_string(&path) {
        Ok(raw) => {
            apply_file_settings(&mut settings, &raw)
                .with_context(|| format!("failed to parse settings file '{}'", path.display()))?;
        }
        // An explicitly requested file must exist; the default one is optional.
        Err(err) if config_path.is_some() => {
            return Err(err).with_context(|| {
                format!("failed to read settings file '{}'", path.display())
            });
        }
        Err(_) => debug!(path = %path.display(), "no settings file; using defaults"),
    }

    apply_env_overrides(&mut settings, |name| std::env::var(name).ok());
    Ok(settings)
}

fn apply_file_settings(settings: &mut ClientSettings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: FileSettings = toml::from_str(raw)?;
    if let Some(v) = file_cfg.api_url {
        settings.api_url = Some(v);
    }
    if let Some(v) = file_cfg.request_timeout_seconds {
        settings.request_timeout_seconds = v;
    }
    if let Some(v) = file_cfg.joke_interval_ms {
        settings.joke_interval_ms = v;
    }
    if let Some(v) = file_cfg.notice_interval_seconds {
        settings.notice_interval_seconds = v;
    }
    if let Some(v) = file_cfg.notice_duration_seconds {
        settings.notice_duration_seconds = v;
    }
    Ok(())
}

fn apply_env_overrides(settings: &mut ClientSettings, lookup: impl Fn(&str) -> Option<String>) {
    let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

    // Later names win.
    for name in ["VITE_API_URL", "APP__API_URL", "NPS_UPDATER_API_URL"] {
        if let Some(v) = non_empty(name) {
            settings.api_url = Some(v);
        }
    }

    let parsed = |name: &str| non_empty(name).and_then(|v| v.trim().parse::<u64>().ok());
    if let Some(v) = parsed("APP__REQUEST_TIMEOUT_SECONDS") {
        settings.request_timeout_seconds = v;
    }
    if let Some(v) = parsed("APP__JOKE_INTERVAL_MS") {
        settings.joke_interval_ms = v;
    }
    if let Some(v) = parsed("APP__NOTICE_INTERVAL_SECONDS") {
        settings.notice_interval_seconds = v;
    }
    if let Some(v) = parsed("APP__NOTICE_DURATION_SECONDS") {
        settings.notice_duration_seconds = v;
    }
}

impl ClientSettings {
    pub fn endpoint(&self) -> Result<Url, ConfigError> {
        let value = self
            .api_url
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::MissingApiUrl)?;
        let url = Url::parse(value).map_err(|source| ConfigError::InvalidApiUrl {
            value: value.to_string(),
            source,
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme {
                value: value.to_string(),
            });
        }
        Ok(url)
    }

    pub fn timing(&self) -> ControllerTiming {
        ControllerTiming {
            request_timeout: Duration::from_secs(self.request_timeout_seconds),
            joke_interval: Duration::from_millis(self.joke_interval_ms),
            notice_interval: Duration::from_secs(self.notice_interval_seconds),
            notice_duration: Duration::from_secs(self.notice_duration_seconds),
        }
        .normalized()
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
