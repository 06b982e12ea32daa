//! Initialize the configuration: write a default config file the operator can edit.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::config::Config;

/// Create the config directory and a default `config.json` if it does not exist.
/// Returns the config path. An existing file is left untouched.
pub fn init_config_file(config_path: &Path) -> Result<PathBuf> {
    let config_dir = config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(config_dir)
        .with_context(|| format!("creating config directory {}", config_dir.display()))?;

    if config_path.exists() {
        log::debug!("config already exists at {}, skipping", config_path.display());
        return Ok(config_path.to_path_buf());
    }

    let default_config =
        serde_json::to_string_pretty(&Config::default()).context("serializing default config")?;
    std::fs::write(config_path, default_config)
        .with_context(|| format!("writing default config to {}", config_path.display()))?;
    log::info!("created default config at {}", config_path.display());
    Ok(config_path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;

    fn temp_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("coursebot-init-{}", uuid::Uuid::new_v4()))
            .join("config.json")
    }

    #[test]
    fn writes_parseable_defaults() {
        let path = temp_path();
        init_config_file(&path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        let config = parse_config(&written).unwrap();
        assert_eq!(config.server.port, 3000);
        assert!(config.line.channel_access_token.is_none());
        assert!(written.contains("\"themedCards\": true"));
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn keeps_existing_file() {
        let path = temp_path();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, r#"{"server":{"port":8080}}"#).unwrap();
        init_config_file(&path).unwrap();
        let config = parse_config(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(config.server.port, 8080);
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
