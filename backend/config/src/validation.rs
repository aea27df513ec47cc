//! Config validation: checks run after defaults are applied.

use crate::schema::RunConfig;
use thiserror::Error;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

pub fn validate(config: &RunConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_pages(config, &mut report);
    validate_webdriver(config, &mut report);
    validate_traversal(config, &mut report);
    report
}

fn validate_pages(config: &RunConfig, report: &mut ValidationReport) {
    if config.repository_path().trim().is_empty() {
        report.error("repositoryPath", "repositoryPath cannot be empty");
    }
    let suffix = config.file_suffix();
    if !suffix.is_empty() && !suffix.starts_with('.') {
        report.warn(
            "fileSuffix",
            format!("fileSuffix '{suffix}' does not start with '.'"),
        );
    }
}

fn validate_webdriver(config: &RunConfig, report: &mut ValidationReport) {
    let url = config.webdriver_url();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        report.error(
            "webdriverUrl",
            format!("webdriverUrl '{url}' must be an http(s) URL"),
        );
    }
}

fn validate_traversal(config: &RunConfig, report: &mut ValidationReport) {
    if config.search.as_ref().and_then(|s| s.max_depth) == Some(0) {
        report.error("search.maxDepth", "maxDepth must be >= 1");
    }
    if let Some(retries) = config.locator.as_ref().and_then(|l| l.max_retries) {
        if retries > 20 {
            report.warn(
                "locator.maxRetries",
                format!("maxRetries {retries} makes a missing browser very slow to report"),
            );
        }
    }
    if let Some(stops) = config.max_tab_stops {
        if stops < 2 {
            report.warn(
                "maxTabStops",
                "maxTabStops below 2 cannot reach any element after the tab root",
            );
        }
    }
}
