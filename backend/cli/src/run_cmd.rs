//! `a11yscore run`

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Args;
use tracing::info;

use a11yscore_browser::{MemoryTree, NodeSpec, ReplayDriver};
use a11yscore_config::{load_and_prepare, log_report, validate, RunConfig};
use a11yscore_report::{append_scores, no_match_message, render_results, write_summary, RunSummary};
use a11yscore_runner::{builtin_catalog, load_catalog, select, startup_delay, ConformanceRunner};

use crate::settings::{log_dir, report_paths, runner_settings, startup_delay as configured_delay};
use crate::terminal_output::{note_success, note_warn};

#[derive(Args)]
pub struct RunArgs {
    /// Only run the test case with this name
    pub test_name: Option<String>,
    /// Config file; defaults to $A11YSCORE_CONFIG or ./a11yscore.yaml
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// YAML catalog to use instead of the built-in one
    #[arg(long)]
    pub catalog: Option<PathBuf>,
    /// Replay recorded page snapshots from this directory
    #[arg(long)]
    pub snapshots: Option<PathBuf>,
    /// WebDriver endpoint, overriding the config. Only validated and
    /// reported for now: runs need --snapshots until a platform tree
    /// provider exists to pair with a live browser session
    #[arg(long)]
    pub webdriver: Option<String>,
    /// Save a screenshot per test case into this directory
    #[arg(long)]
    pub screenshots: Option<PathBuf>,
}

pub async fn run(args: RunArgs) -> Result<ExitCode> {
    let mut config = load_and_prepare(args.config.as_deref()).await?;
    if let Some(url) = args.webdriver {
        config.webdriver_url = Some(url);
    }
    let (dir, level) = log_dir(&config);
    a11yscore_logging::init_logger(&dir, &level);
    // --webdriver may have changed what the load validated.
    let report = validate(&config);
    log_report(&report);
    if let Some(first) = report.errors.first() {
        bail!("{first}");
    }

    let cases = match &args.catalog {
        Some(path) => load_catalog(path)?,
        None => builtin_catalog(),
    };
    let selected = select(&cases, args.test_name.as_deref());
    if selected.is_empty() {
        note_warn(&no_match_message(args.test_name.as_deref()));
        return Ok(ExitCode::FAILURE);
    }

    let Some(snapshot_dir) = args.snapshots else {
        bail!(
            "No accessibility tree provider is available on this platform, so {} at {} cannot be inspected; \
             rerun with --snapshots <DIR> to replay recorded pages",
            config.browser_name(),
            config.webdriver_url()
        );
    };

    let tree = Arc::new(
        MemoryTree::new(&NodeSpec::new("Pane")).context("Failed to create the replay tree")?,
    );
    let driver = Arc::new(ReplayDriver::new(tree.clone(), &snapshot_dir));
    let runner = ConformanceRunner::new(driver, tree, runner_settings(&config, args.screenshots));
    info!(
        run_id = %runner.run_id(),
        snapshots = %snapshot_dir.display(),
        cases = selected.len(),
        "Replaying recorded pages"
    );

    startup_delay(configured_delay(&config)).await;
    let outcome = runner.run_batch(&selected).await;
    runner.close().await;

    print!("{}", render_results(&outcome.results, outcome.score));
    write_reports(&config, &outcome)?;
    Ok(ExitCode::SUCCESS)
}

fn write_reports(config: &RunConfig, outcome: &a11yscore_runner::BatchOutcome) -> Result<()> {
    let Some(score) = outcome.score else {
        return Ok(());
    };
    let (csv_path, json_path) = report_paths(config);
    append_scores(
        &csv_path,
        config.build_label.as_deref(),
        score,
        &outcome.results,
        chrono::Local::now(),
    )?;
    note_success(&format!("Score appended to {}", csv_path.display()));

    if let Some(path) = json_path {
        let summary = RunSummary::new(&outcome.run_id, outcome.score, &outcome.results);
        write_summary(&path, &summary)?;
        note_success(&format!("Run summary written to {}", path.display()));
    }
    Ok(())
}
