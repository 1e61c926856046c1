use std::{fs, io, path::Path, time::Duration};

use anyhow::{anyhow, Context};
use url::Url;

pub const DEFAULT_CONFIG_PATH: &str = "artefact-client.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: String,
    pub request_timeout_secs: u64,
    pub log_filter: String,
    pub access_token: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:5000/api".into(),
            request_timeout_secs: 30,
            log_filter: "info".into(),
            access_token: None,
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Defaults, then the TOML file at `path` if it exists, then environment.
pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    match fs::read_to_string(path) {
        Ok(raw) => apply_file(&mut settings, &raw)
            .with_context(|| format!("invalid config file '{}'", path.display()))?,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read config file '{}'", path.display()))
        }
    }
    apply_env(&mut settings, |key| std::env::var(key).ok())?;

    Url::parse(&settings.api_url)
        .with_context(|| format!("invalid api_url '{}'", settings.api_url))?;
    Ok(settings)
}

fn apply_file(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let table: toml::Table = toml::from_str(raw)?;

    if let Some(v) = table.get("api_url").and_then(|v| v.as_str()) {
        settings.api_url = v.to_string();
    }
    if let Some(v) = table.get("request_timeout_secs") {
        let secs = v
            .as_integer()
            .and_then(|secs| u64::try_from(secs).ok())
            .ok_or_else(|| anyhow!("request_timeout_secs must be a non-negative integer"))?;
        settings.request_timeout_secs = secs;
    }
    if let Some(v) = table.get("log_filter").and_then(|v| v.as_str()) {
        settings.log_filter = v.to_string();
    }
    if let Some(v) = table.get("access_token").and_then(|v| v.as_str()) {
        settings.access_token = Some(v.to_string());
    }
    Ok(())
}

fn apply_env(
    settings: &mut Settings,
    var: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<()> {
    if let Some(v) = var("API_URL") {
        settings.api_url = v;
    }
    if let Some(v) = var("APP__API_URL") {
        settings.api_url = v;
    }

    if let Some(v) = var("APP__REQUEST_TIMEOUT_SECS") {
        settings.request_timeout_secs = v
            .parse()
            .with_context(|| format!("APP__REQUEST_TIMEOUT_SECS is not a number: '{v}'"))?;
    }

    if let Some(v) = var("APP__LOG_FILTER") {
        settings.log_filter = v;
    }

    if let Some(v) = var("APP__ACCESS_TOKEN") {
        settings.access_token = Some(v);
    }

    Ok(())
}
