use std::{collections::HashMap, fs};

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:3001/api/";
pub const DEFAULT_LOG_FILTER: &str = "info";
pub const SETTINGS_FILE: &str = "roaster.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub backend_url: String,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.into(),
            log_filter: DEFAULT_LOG_FILTER.into(),
        }
    }
}

/// Defaults, then `roaster.toml` in the working directory, then the environment.
pub fn load_settings() -> Settings {
    let file = fs::read_to_string(SETTINGS_FILE).ok();
    settings_from_sources(file.as_deref(), |key| std::env::var(key).ok())
}

pub(crate) fn settings_from_sources(
    file: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Settings {
    let mut settings = Settings::default();

    if let Some(raw) = file {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(raw) {
            if let Some(v) = file_cfg.get("backend_url") {
                settings.backend_url = v.clone();
            }
            if let Some(v) = file_cfg.get("log_filter") {
                settings.log_filter = v.clone();
            }
        }
    }

    if let Some(v) = env("ROASTER_BACKEND_URL") {
        settings.backend_url = v;
    }
    if let Some(v) = env("APP__BACKEND_URL") {
        settings.backend_url = v;
    }

    if let Some(v) = env("ROASTER_LOG") {
        settings.log_filter = v;
    }
    if let Some(v) = env("APP__LOG_FILTER") {
        settings.log_filter = v;
    }

    settings.backend_url = normalize_backend_url(&settings.backend_url);
    settings
}

/// Adds a scheme to bare `host:port/path` values and ends the path with `/` so
/// endpoint names join under it.
pub fn normalize_backend_url(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return DEFAULT_BACKEND_URL.to_string();
    }

    let mut url = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("http://{raw}")
    };
    if !url.ends_with('/') {
        url.push('/');
    }
    url
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
