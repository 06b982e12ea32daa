//! Configuration types and loading.
//!
//! Config is loaded from a JSON file (e.g. `~/.coursebot/config.json`) and then
//! overridden from the environment (`PORT`, `LINE_TOKEN`, ...). Every section is
//! optional; a missing file yields the defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level application config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// LINE Messaging API settings.
    #[serde(default)]
    pub line: LineConfig,

    /// Where the course catalog is read from.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Presentation and matching toggles.
    #[serde(default)]
    pub features: FeatureFlags,

    /// Outbound reply pacing.
    #[serde(default)]
    pub reply: ReplyConfig,
}

/// Bind address and port for the webhook server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    /// Port for HTTP (default 3000). Overridden by PORT env.
    #[serde(default = "default_server_port")]
    pub port: u16,

    /// Bind address (default "0.0.0.0").
    #[serde(default = "default_server_bind")]
    pub bind: String,
}

fn default_server_port() -> u16 {
    3000
}

fn default_server_bind() -> String {
    "0.0.0.0".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_server_port(),
            bind: default_server_bind(),
        }
    }
}

/// LINE channel config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineConfig {
    /// Channel access token for the reply API. Overridden by LINE_TOKEN env. When absent, replies are disabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_access_token: Option<String>,

    /// API base URL (default https://api.line.me). Overridden by LINE_API_BASE env.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogBackend {
    /// Cloud Firestore REST API.
    #[default]
    Firestore,

    /// Local JSON file holding an array of course documents.
    File,
}

/// Catalog store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogConfig {
    #[serde(default)]
    pub backend: CatalogBackend,

    /// Firestore collection holding course documents (default "courses").
    #[serde(default = "default_collection")]
    pub collection: String,

    /// Google Cloud project id. Overridden by GOOGLE_CLOUD_PROJECT env. Required for the firestore backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,

    /// OAuth access token sent as a bearer credential to Firestore. Overridden by FIRESTORE_ACCESS_TOKEN env.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    /// Firestore API base URL (default https://firestore.googleapis.com). Overridden by FIRESTORE_API_BASE env.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firestore_base: Option<String>,

    /// Path of the JSON catalog for the file backend (default "courses.json").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

fn default_collection() -> String {
    "courses".to_string()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            backend: CatalogBackend::default(),
            collection: default_collection(),
            project_id: None,
            access_token: None,
            firestore_base: None,
            path: None,
        }
    }
}

/// Process-wide feature toggles. Immutable after load; handed to the matcher and card composer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureFlags {
    /// Accent title color and tinted body/footer backgrounds on cards.
    #[serde(default = "default_true")]
    pub themed_cards: bool,

    /// Whitespace-insensitive bidirectional substring matching on keywords and title.
    #[serde(default = "default_true")]
    pub fuzzy_search: bool,

    /// "หมวดหมู่ <name>" filters the catalog by category.
    #[serde(default = "default_true")]
    pub category_search: bool,

    /// Attach suggestion chips to the not-found reply.
    #[serde(default = "default_true")]
    pub quick_reply: bool,
}

fn default_true() -> bool {
    true
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            themed_cards: true,
            fuzzy_search: true,
            category_search: true,
            quick_reply: true,
        }
    }
}

/// Reply dispatch settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyConfig {
    /// Delay between consecutive carousel messages, in milliseconds (default 1000).
    #[serde(default = "default_pacing_ms")]
    pub pacing_ms: u64,
}

fn default_pacing_ms() -> u64 {
    1000
}

impl Default for ReplyConfig {
    fn default() -> Self {
        Self {
            pacing_ms: default_pacing_ms(),
        }
    }
}

/// Trimmed env value, or None when unset or blank.
fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().and_then(|s| non_empty(&s))
}

fn non_empty(s: &str) -> Option<String> {
    let t = s.trim();
    if t.is_empty() {
        None
    } else {
        Some(t.to_string())
    }
}

/// Env value wins over the configured one; blank values on either side count as unset.
fn prefer_env(env: Option<String>, configured: Option<&str>) -> Option<String> {
    env.or_else(|| configured.and_then(non_empty))
}

impl Config {
    /// Apply environment overrides (PORT, LINE_TOKEN, LINE_API_BASE, GOOGLE_CLOUD_PROJECT,
    /// FIRESTORE_ACCESS_TOKEN, FIRESTORE_API_BASE). Blank optional values are normalized to None.
    pub fn apply_env_overrides(&mut self) {
        if let Some(port) = env_value("PORT") {
            match port.parse::<u16>() {
                Ok(p) => self.server.port = p,
                Err(_) => log::warn!("ignoring invalid PORT value: {}", port),
            }
        }
        self.line.channel_access_token = prefer_env(
            env_value("LINE_TOKEN"),
            self.line.channel_access_token.as_deref(),
        );
        self.line.api_base = prefer_env(env_value("LINE_API_BASE"), self.line.api_base.as_deref());
        self.catalog.project_id = prefer_env(
            env_value("GOOGLE_CLOUD_PROJECT"),
            self.catalog.project_id.as_deref(),
        );
        self.catalog.access_token = prefer_env(
            env_value("FIRESTORE_ACCESS_TOKEN"),
            self.catalog.access_token.as_deref(),
        );
        self.catalog.firestore_base = prefer_env(
            env_value("FIRESTORE_API_BASE"),
            self.catalog.firestore_base.as_deref(),
        );
    }
}

/// Resolve config path from env or default.
pub fn default_config_path() -> PathBuf {
    std::env::var("COURSEBOT_CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .map(|h| h.join(".coursebot").join("config.json"))
                .unwrap_or_else(|| PathBuf::from("config.json"))
        })
}

/// Parse a config document. Exposed for callers that hold the JSON already.
pub fn parse_config(s: &str) -> Result<Config> {
    serde_json::from_str(s).context("parsing config JSON")
}

/// Load config from the given path (or COURSEBOT_CONFIG_PATH / default), then apply env overrides.
/// Missing file => default config. Returns the config and the path that was used.
pub fn load_config(path: Option<PathBuf>) -> Result<(Config, PathBuf)> {
    let path = path.unwrap_or_else(default_config_path);
    let mut config = if !path.exists() {
        log::debug!("config file not found, using defaults: {}", path.display());
        Config::default()
    } else {
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        parse_config(&s).with_context(|| format!("parsing config from {}", path.display()))?
    };
    config.apply_env_overrides();
    Ok((config, path))
}
