//! Viewport screenshot persistence.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use a11yscore_core::AutomationDriver;

/// Captures the viewport and writes it to `<dir>/<name>.png`.
pub async fn save_screenshot(driver: &dyn AutomationDriver, dir: &Path, name: &str) -> Result<PathBuf> {
    let bytes = driver.screenshot().await.context("Failed to capture screenshot")?;
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Failed to create screenshot dir: {}", dir.display()))?;
    let path = dir.join(format!("{name}.png"));
    tokio::fs::write(&path, &bytes)
        .await
        .with_context(|| format!("Failed to write screenshot: {}", path.display()))?;
    info!(path = %path.display(), bytes = bytes.len(), "Saved screenshot");
    Ok(path)
}
