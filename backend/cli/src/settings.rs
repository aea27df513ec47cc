//! Maps the loaded run configuration onto runner settings.

use std::path::{Path, PathBuf};
use std::time::Duration;

use a11yscore_browser::BrowserMarkers;
use a11yscore_config::RunConfig;
use a11yscore_runner::{CheckTiming, RunnerSettings};

/// Expects a config that has been through `apply_all_defaults`.
pub fn runner_settings(config: &RunConfig, screenshot_dir: Option<PathBuf>) -> RunnerSettings {
    let locator = config.locator();
    let markers = BrowserMarkers::default();
    RunnerSettings {
        repository_path: config.repository_path().to_string(),
        file_suffix: config.file_suffix().to_string(),
        max_retries: locator.max_retries.unwrap_or_default(),
        markers: BrowserMarkers {
            product_marker: locator.product_marker.unwrap_or(markers.product_marker),
            shell_class_marker: locator.shell_class_marker.unwrap_or(markers.shell_class_marker),
            tab_class_marker: locator.tab_class_marker.unwrap_or(markers.tab_class_marker),
        },
        max_tab_stops: config.max_tab_stops.unwrap_or_default(),
        timing: CheckTiming {
            script_timeout: secs(config.script_timeout_secs),
            mutation_wait: secs(config.mutation_wait_secs),
            max_depth: config.max_depth(),
            ..CheckTiming::default()
        },
        screenshot_dir,
    }
}

pub fn startup_delay(config: &RunConfig) -> Duration {
    secs(config.startup_delay_secs)
}

/// Score history and optional summary paths under `output.dir`.
pub fn report_paths(config: &RunConfig) -> (PathBuf, Option<PathBuf>) {
    let output = config.output();
    let dir = PathBuf::from(output.dir.as_deref().unwrap_or("."));
    let csv = dir.join(output.csv_file.as_deref().unwrap_or("scores.csv"));
    let json = output.json_file.as_deref().map(|f| dir.join(f));
    (csv, json)
}

pub fn log_dir(config: &RunConfig) -> (PathBuf, String) {
    let logging = config.logging();
    (
        Path::new(logging.dir.as_deref().unwrap_or("logs")).to_path_buf(),
        logging.level.unwrap_or_else(|| "info".to_string()),
    )
}

fn secs(value: Option<u64>) -> Duration {
    Duration::from_secs(value.unwrap_or_default())
}
