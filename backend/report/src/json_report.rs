//! JSON summary of one run.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use a11yscore_core::{AggregateScore, CaseResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub run_id: String,
    pub generated_at: DateTime<Utc>,
    pub score: Option<f64>,
    pub results: Vec<CaseResult>,
}

impl RunSummary {
    pub fn new(run_id: &str, score: Option<AggregateScore>, results: &[CaseResult]) -> Self {
        Self {
            run_id: run_id.to_string(),
            generated_at: Utc::now(),
            score: score.map(|s| s.percentage),
            results: results.to_vec(),
        }
    }
}

/// Writes `summary` as pretty JSON, replacing any previous file.
pub fn write_summary(path: &Path, summary: &RunSummary) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create report directory: {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(summary)?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write run summary: {}", path.display()))?;
    info!(path = %path.display(), "Wrote run summary");
    Ok(())
}
