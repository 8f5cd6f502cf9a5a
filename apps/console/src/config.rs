use std::{fs, time::Duration};

use anyhow::Context;
use client_core::DEFAULT_PAGE_SIZE;
use serde::Deserialize;
use tracing::warn;
use url::Url;

pub const SETTINGS_FILE: &str = "console.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub store_url: String,
    pub page_size: usize,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store_url: "http://localhost:3000/api".into(),
            page_size: DEFAULT_PAGE_SIZE,
            request_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    store_url: Option<String>,
    page_size: Option<usize>,
    request_timeout_secs: Option<u64>,
}

impl Settings {
    /// Overlays keys found in a `console.toml` body. An unreadable file is
    /// ignored as a whole.
    pub fn apply_file(&mut self, raw: &str) {
        let file_cfg = match toml::from_str::<FileSettings>(raw) {
            Ok(file_cfg) => file_cfg,
            Err(err) => {
                warn!(error = %err, "ignoring malformed {SETTINGS_FILE}");
                return;
            }
        };
        if let Some(v) = file_cfg.store_url {
            self.store_url = v;
        }
        if let Some(v) = file_cfg.page_size.filter(|size| *size > 0) {
            self.page_size = v;
        }
        if let Some(v) = file_cfg.request_timeout_secs.filter(|secs| *secs > 0) {
            self.request_timeout_secs = v;
        }
    }

    /// Overlays environment variables read through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("CONSOLE_STORE_URL") {
            self.store_url = v;
        }
        if let Some(v) = lookup("APP__STORE_URL") {
            self.store_url = v;
        }

        if let Some(v) = lookup("APP__PAGE_SIZE") {
            match v.parse::<usize>() {
                Ok(parsed) if parsed > 0 => self.page_size = parsed,
                _ => warn!(value = %v, "ignoring invalid APP__PAGE_SIZE"),
            }
        }

        if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS") {
            match v.parse::<u64>() {
                Ok(parsed) if parsed > 0 => self.request_timeout_secs = parsed,
                _ => warn!(value = %v, "ignoring invalid APP__REQUEST_TIMEOUT_SECS"),
            }
        }
    }

    pub fn store_url(&self) -> anyhow::Result<Url> {
        Url::parse(self.store_url.trim())
            .with_context(|| format!("invalid record store url '{}'", self.store_url))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(SETTINGS_FILE) {
        settings.apply_file(&raw);
    }
    settings.apply_env(|key| std::env::var(key).ok());

    settings
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn defaults_use_nine_rows_per_page() {
        let settings = Settings::default();
        assert_eq!(settings.page_size, 9);
        assert!(settings.store_url().is_ok());
    }

    #[test]
    fn file_values_override_defaults() {
        let mut settings = Settings::default();
        settings.apply_file(
            r#"
            store_url = "https://roster.example.org/api"
            page_size = 12
            "#,
        );

        assert_eq!(settings.store_url, "https://roster.example.org/api");
        assert_eq!(settings.page_size, 12);
        assert_eq!(settings.request_timeout_secs, 10);
    }

    #[test]
    fn malformed_file_is_ignored() {
        let mut settings = Settings::default();
        settings.apply_file("page_size = \"many\"");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn env_overrides_file_and_prefers_app_prefix() {
        let mut settings = Settings::default();
        settings.apply_file("store_url = \"http://file.example.org\"");
        settings.apply_env(env_of(&[
            ("CONSOLE_STORE_URL", "http://console.example.org"),
            ("APP__STORE_URL", "http://app.example.org"),
            ("APP__REQUEST_TIMEOUT_SECS", "3"),
        ]));

        assert_eq!(settings.store_url, "http://app.example.org");
        assert_eq!(settings.request_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn invalid_numbers_keep_previous_values() {
        let mut settings = Settings::default();
        settings.apply_env(env_of(&[
            ("APP__PAGE_SIZE", "0"),
            ("APP__REQUEST_TIMEOUT_SECS", "soon"),
        ]));

        assert_eq!(settings.page_size, 9);
        assert_eq!(settings.request_timeout_secs, 10);
    }

    #[test]
    fn store_url_must_parse() {
        let settings = Settings {
            store_url: "not a url".into(),
            ..Settings::default()
        };
        assert!(settings.store_url().is_err());
    }
}
