use std::{fs, path::Path, time::Duration};

use anyhow::Context;
use serde::Deserialize;
use url::Url;

pub const SETTINGS_FILE: &str = "console.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub orders_endpoint: String,
    pub view_base_url: String,
    pub search_quiet_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            orders_endpoint: "http://localhost:3000/orders".into(),
            view_base_url: "http://localhost:4200/orders".into(),
            search_quiet_ms: 300,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    orders_endpoint: Option<String>,
    view_base_url: Option<String>,
    search_quiet_ms: Option<u64>,
}

impl Settings {
    pub fn search_quiet_period(&self) -> Duration {
        Duration::from_millis(self.search_quiet_ms)
    }

    pub fn endpoint_url(&self) -> anyhow::Result<Url> {
        parse_endpoint(&self.orders_endpoint)
    }

    /// View URL with `query` (leading `?` optional) as its query string.
    pub fn view_url(&self, query: Option<&str>) -> anyhow::Result<Url> {
        let mut url = Url::parse(&self.view_base_url)
            .with_context(|| format!("invalid view base url '{}'", self.view_base_url))?;
        let query = query
            .map(|q| q.trim().trim_start_matches('?'))
            .filter(|q| !q.is_empty());
        url.set_query(query);
        Ok(url)
    }
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

/// Defaults, then the settings file, then environment variables. Values
/// that fail to parse are skipped.
pub fn load_settings_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<FileSettings>(&raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.orders_endpoint {
                    settings.orders_endpoint = v;
                }
                if let Some(v) = file_cfg.view_base_url {
                    settings.view_base_url = v;
                }
                if let Some(v) = file_cfg.search_quiet_ms {
                    settings.search_quiet_ms = v;
                }
            }
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "ignoring malformed settings file");
            }
        }
    }

    if let Some(v) = env("ORDERS_ENDPOINT") {
        settings.orders_endpoint = v;
    }
    if let Some(v) = env("APP__ORDERS_ENDPOINT") {
        settings.orders_endpoint = v;
    }

    if let Some(v) = env("APP__VIEW_BASE_URL") {
        settings.view_base_url = v;
    }

    if let Some(v) = env("APP__SEARCH_QUIET_MS") {
        if let Ok(parsed) = v.trim().parse::<u64>() {
            settings.search_quiet_ms = parsed;
        }
    }

    settings
}

/// Accepts URLs and bare file paths; the latter become `file://` URLs.
pub fn parse_endpoint(raw: &str) -> anyhow::Result<Url> {
    let raw = raw.trim();
    if raw.contains("://") {
        return Url::parse(raw).with_context(|| format!("invalid orders endpoint '{raw}'"));
    }

    let path = Path::new(raw);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .context("failed to resolve current directory")?
            .join(path)
    };
    Url::from_file_path(&absolute)
        .map_err(|()| anyhow::anyhow!("invalid orders file path '{}'", absolute.display()))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
