//! Config defaults: fills every field the file leaves out.

use crate::schema::{LocatorConfig, LoggingConfig, OutputConfig, RunConfig, SearchConfig};

pub const DEFAULT_REPOSITORY_PATH: &str =
    "https://cdn.rawgit.com/DHBrett/AT-browser-tests/gh-pages/test-files/";
pub const DEFAULT_FILE_SUFFIX: &str = ".html";
pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:17556";
pub const DEFAULT_BROWSER_NAME: &str = "MicrosoftEdge";
pub const DEFAULT_STARTUP_DELAY_SECS: u64 = 2;
pub const DEFAULT_SCRIPT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MAX_RETRIES: u32 = 5;
pub const DEFAULT_MAX_DEPTH: usize = 10;
pub const DEFAULT_MUTATION_WAIT_SECS: u64 = 5;
pub const DEFAULT_MAX_TAB_STOPS: usize = 100;
pub const DEFAULT_CSV_FILE: &str = "scores.csv";

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: RunConfig) -> RunConfig {
    let config = apply_page_defaults(config);
    let config = apply_driver_defaults(config);
    let config = apply_locator_defaults(config);
    let config = apply_output_defaults(config);
    apply_logging_defaults(config)
}

fn apply_page_defaults(mut config: RunConfig) -> RunConfig {
    config
        .repository_path
        .get_or_insert_with(|| DEFAULT_REPOSITORY_PATH.to_string());
    config
        .file_suffix
        .get_or_insert_with(|| DEFAULT_FILE_SUFFIX.to_string());
    config.max_tab_stops.get_or_insert(DEFAULT_MAX_TAB_STOPS);
    config
}

fn apply_driver_defaults(mut config: RunConfig) -> RunConfig {
    config
        .webdriver_url
        .get_or_insert_with(|| DEFAULT_WEBDRIVER_URL.to_string());
    config
        .browser_name
        .get_or_insert_with(|| DEFAULT_BROWSER_NAME.to_string());
    config.startup_delay_secs.get_or_insert(DEFAULT_STARTUP_DELAY_SECS);
    config.script_timeout_secs.get_or_insert(DEFAULT_SCRIPT_TIMEOUT_SECS);
    config.mutation_wait_secs.get_or_insert(DEFAULT_MUTATION_WAIT_SECS);
    config
}

/// Browser chrome markers and traversal bounds.
fn apply_locator_defaults(mut config: RunConfig) -> RunConfig {
    let locator = config.locator.get_or_insert_with(LocatorConfig::default);
    locator.max_retries.get_or_insert(DEFAULT_MAX_RETRIES);
    locator
        .product_marker
        .get_or_insert_with(|| "Microsoft Edge".to_string());
    locator
        .shell_class_marker
        .get_or_insert_with(|| "Spartan".to_string());
    locator
        .tab_class_marker
        .get_or_insert_with(|| "TabWindowClass".to_string());

    let search = config.search.get_or_insert_with(SearchConfig::default);
    search.max_depth.get_or_insert(DEFAULT_MAX_DEPTH);
    config
}

fn apply_output_defaults(mut config: RunConfig) -> RunConfig {
    let output = config.output.get_or_insert_with(OutputConfig::default);
    output.dir.get_or_insert_with(|| ".".to_string());
    output
        .csv_file
        .get_or_insert_with(|| DEFAULT_CSV_FILE.to_string());
    config
}

fn apply_logging_defaults(mut config: RunConfig) -> RunConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    logging.level.get_or_insert_with(|| "info".to_string());
    logging.dir.get_or_insert_with(|| "logs".to_string());
    config
}
