use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::infra::api_client::{DEFAULT_SESSION_COOKIE, DEFAULT_TIMEOUT};

const APP_DIR: &str = "profile-page";
const CONFIG_FILE: &str = "config.json";

/// Which backend contract the profile endpoints follow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendVariant {
    /// Images travel inside the profile update (multipart `data` + files)
    #[default]
    Bundled,
    /// Images go to a dedicated upload endpoint; updates are JSON only
    Split,
}

impl fmt::Display for BackendVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendVariant::Bundled => f.write_str("bundled"),
            BackendVariant::Split => f.write_str("split"),
        }
    }
}

impl FromStr for BackendVariant {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bundled" => Ok(BackendVariant::Bundled),
            "split" => Ok(BackendVariant::Split),
            other => bail!("unknown backend variant {:?}", other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server_url: String,
    pub backend: BackendVariant,
    /// Cookie carrying the session credential
    pub session_cookie: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:8080".to_string(),
            backend: BackendVariant::default(),
            session_cookie: DEFAULT_SESSION_COOKIE.to_string(),
            session_token: None,
            request_timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Defaults, then the config file, then `PROFILE_*` environment
    /// variables. A broken config file is logged and skipped.
    pub fn load() -> Self {
        let mut config = match Self::default_path() {
            Some(path) if path.exists() => {
                Self::load_from(&path).unwrap_or_else(|err| {
                    log::warn!("[Config] Ignoring config file: {:#}", err);
                    Self::default()
                })
            }
            _ => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))
    }

    /// Apply overrides from a key lookup (the process environment in
    /// production).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(server_url) = lookup("PROFILE_SERVER_URL") {
            self.server_url = server_url;
        }
        if let Some(raw) = lookup("PROFILE_BACKEND") {
            match raw.parse() {
                Ok(variant) => self.backend = variant,
                Err(err) => log::warn!("[Config] PROFILE_BACKEND: {}", err),
            }
        }
        if let Some(token) = lookup("PROFILE_SESSION_TOKEN") {
            self.session_token = Some(token).filter(|t| !t.is_empty());
        }
        if let Some(cookie) = lookup("PROFILE_SESSION_COOKIE") {
            self.session_cookie = cookie;
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating {}", dir.display()))?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("writing {}", path.display()))
    }
}
