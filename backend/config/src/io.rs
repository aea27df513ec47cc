//! Config file lookup, reading and writing.

use crate::schema::RunConfig;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

pub const CONFIG_FILE_NAME: &str = "a11yscore.yaml";

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "A11YSCORE_CONFIG";

/// Resolve the config file to load.
/// Priority: explicit path > `A11YSCORE_CONFIG` > `./a11yscore.yaml` >
/// `<user config dir>/a11yscore/a11yscore.yaml`. Falls back to the
/// working-directory path when none of them exist.
pub fn config_file_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        let user = dir.join("a11yscore").join(CONFIG_FILE_NAME);
        if user.exists() {
            return user;
        }
    }
    local
}

/// Parse the config file as a JSON value tree for the substitution pass.
///
/// A missing file yields an empty object so that every default applies.
pub async fn load_config_value(path: &Path) -> Result<serde_json::Value> {
    if !path.exists() {
        debug!(path = %path.display(), "Config file does not exist; using defaults");
        return Ok(serde_json::Value::Object(Default::default()));
    }

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let value: serde_json::Value = serde_yaml::from_str(&raw)
        .with_context(|| format!("Failed to parse config YAML at: {}", path.display()))?;

    info!(path = %path.display(), "Loaded config");
    // An empty file parses as null.
    Ok(if value.is_null() {
        serde_json::Value::Object(Default::default())
    } else {
        value
    })
}

/// Write config to disk atomically (write to temp file, rename).
pub async fn write_config(config: &RunConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
    }

    let yaml = serde_yaml::to_string(config).context("Failed to serialize config to YAML")?;

    let tmp_path = path.with_extension("yaml.tmp");
    fs::write(&tmp_path, yaml.as_bytes())
        .await
        .with_context(|| format!("Failed to write temp config: {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path)
        .await
        .with_context(|| format!("Failed to rename temp config to: {}", path.display()))?;

    info!(path = %path.display(), "Wrote config");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("a11yscore-config-{}", uuid::Uuid::new_v4()))
            .join(CONFIG_FILE_NAME)
    }

    #[test]
    fn explicit_path_wins() {
        let path = Path::new("/etc/a11yscore/custom.yaml");
        assert_eq!(config_file_path(Some(path)), path);
    }

    #[tokio::test]
    async fn missing_file_is_empty_object() {
        let value = load_config_value(&temp_path()).await.unwrap();
        assert_eq!(value, serde_json::json!({}));
    }

    #[tokio::test]
    async fn write_then_load() {
        let path = temp_path();
        let config = RunConfig {
            build_label: Some("14393.0.amd64fre.rs1_release.160715-1616".into()),
            ..Default::default()
        };
        write_config(&config, &path).await.unwrap();

        let value = load_config_value(&path).await.unwrap();
        assert_eq!(value["buildLabel"], "14393.0.amd64fre.rs1_release.160715-1616");
        assert!(value.get("fileSuffix").is_none());

        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }
}
