//! Run configuration schema.
//!
//! Every field is optional on disk; [`crate::apply_all_defaults`] fills in
//! whatever the file leaves out, after which the accessor methods can be
//! relied on.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Root of `a11yscore.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunConfig {
    /// Base URL the test pages are loaded from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository_path: Option<String>,

    /// Appended to the test name to form the page file name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_suffix: Option<String>,

    /// W3C WebDriver endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webdriver_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browser_name: Option<String>,

    /// Pause before the first test case
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub startup_delay_secs: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_timeout_secs: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locator: Option<LocatorConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<SearchConfig>,

    /// How long to wait for a structure change after typing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mutation_wait_secs: Option<u64>,

    /// Upper bound on tab presses while discovering the tab order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tab_stops: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,

    /// Dotted build label recorded in the score history
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_label: Option<String>,
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocatorConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_marker: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shell_class_marker: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tab_class_marker: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
    /// Score history, relative to `dir`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csv_file: Option<String>,
    /// Run summary, relative to `dir`; not written when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_file: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

// ---------------------------------------------------------------------------
// Accessors
// ---------------------------------------------------------------------------

impl RunConfig {
    pub fn repository_path(&self) -> &str {
        self.repository_path.as_deref().unwrap_or_default()
    }

    pub fn file_suffix(&self) -> &str {
        self.file_suffix.as_deref().unwrap_or_default()
    }

    pub fn webdriver_url(&self) -> &str {
        self.webdriver_url.as_deref().unwrap_or_default()
    }

    pub fn browser_name(&self) -> &str {
        self.browser_name.as_deref().unwrap_or_default()
    }

    pub fn locator(&self) -> LocatorConfig {
        self.locator.clone().unwrap_or_default()
    }

    pub fn max_depth(&self) -> usize {
        self.search.as_ref().and_then(|s| s.max_depth).unwrap_or_default()
    }

    pub fn output(&self) -> OutputConfig {
        self.output.clone().unwrap_or_default()
    }

    pub fn logging(&self) -> LoggingConfig {
        self.logging.clone().unwrap_or_default()
    }
}
