//! `a11yscore-config`: run configuration for the conformance tool.
//!
//! Provides:
//! - Typed config schema
//! - Config file lookup and YAML read/write
//! - `${ENV_VAR}` substitution
//! - Default value application
//! - Validation with errors and warnings

pub mod defaults;
pub mod env;
pub mod io;
pub mod schema;
pub mod validation;

pub use schema::{LocatorConfig, LoggingConfig, OutputConfig, RunConfig, SearchConfig};
pub use io::{config_file_path, load_config_value, write_config, CONFIG_ENV, CONFIG_FILE_NAME};
pub use env::{collect_referenced_vars, resolve_env_vars, resolve_env_vars_with, MissingEnvVarError};
pub use defaults::apply_all_defaults;
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{bail, Context, Result};
use std::path::Path;

/// Load, apply env substitution, apply defaults and validate.
///
/// `explicit` is the `--config` argument, if any. Warnings are logged;
/// validation errors are logged and fail the load.
pub async fn load_and_prepare(explicit: Option<&Path>) -> Result<RunConfig> {
    let path = config_file_path(explicit);
    let value = load_config_value(&path).await?;

    tracing::debug!(vars = ?collect_referenced_vars(&value), "Resolving config env vars");
    let value = resolve_env_vars(&value).context("Failed to resolve env vars in config")?;

    let config: RunConfig = serde_json::from_value(value)
        .with_context(|| format!("Invalid config at: {}", path.display()))?;
    let config = apply_all_defaults(config);

    let report = validate(&config);
    log_report(&report);
    if let Some(first) = report.errors.into_iter().next() {
        bail!(first);
    }

    Ok(config)
}

/// Logs every warning and error of a validation pass.
pub fn log_report(report: &ValidationReport) {
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp(yaml: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("a11yscore-prepare-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(CONFIG_FILE_NAME);
        std::fs::write(&path, yaml).unwrap();
        path
    }

    #[tokio::test]
    async fn prepares_file_with_overrides() {
        let path = write_temp(
            "repositoryPath: http://localhost:8000/test-files/\n\
             locator:\n  maxRetries: 2\n\
             output:\n  jsonFile: summary.json\n",
        );
        let config = load_and_prepare(Some(&path)).await.unwrap();
        assert_eq!(config.repository_path(), "http://localhost:8000/test-files/");
        assert_eq!(config.locator().max_retries, Some(2));
        assert_eq!(config.output().json_file.as_deref(), Some("summary.json"));
        assert_eq!(config.output().csv_file.as_deref(), Some("scores.csv"));
        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[tokio::test]
    async fn invalid_config_fails() {
        let path = write_temp("search:\n  maxDepth: 0\n");
        let err = load_and_prepare(Some(&path)).await.unwrap_err();
        assert!(err.to_string().contains("search.maxDepth"));
        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[tokio::test]
    async fn unknown_value_type_is_rejected() {
        let path = write_temp("maxTabStops: many\n");
        assert!(load_and_prepare(Some(&path)).await.is_err());
        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }
}
