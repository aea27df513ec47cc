//! Score history as an append-only CSV file.
//!
//! One row per run. The header is written only when the file is created;
//! later rows are laid out under that header by case name, so a run in a
//! different order or with a different verdict mix stays in its columns.

use std::fs::OpenOptions;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use tracing::{info, warn};

use a11yscore_core::{AggregateScore, CaseResult};

/// Columns preceding the per-case verdict and detail columns.
pub const CSV_PREFIX_COLUMNS: [&str; 7] = [
    "buildNumber",
    "buildIteration",
    "buildArchitecture",
    "buildBranch",
    "buildDate",
    "score",
    "time",
];

const BUILD_FIELDS: usize = 5;

/// Splits a dotted build label such as `14393.0.amd64fre.rs1_release.160715-1616`
/// into the five build columns. Missing parts are empty; anything past the
/// fifth dot stays in the last column.
pub fn split_build_label(label: Option<&str>) -> Vec<String> {
    let mut fields: Vec<String> = label
        .map(|l| l.splitn(BUILD_FIELDS, '.').map(str::to_string).collect())
        .unwrap_or_default();
    fields.resize(BUILD_FIELDS, String::new());
    fields
}

fn header(case_names: &[String]) -> Vec<String> {
    let mut header: Vec<String> = CSV_PREFIX_COLUMNS.iter().map(|c| c.to_string()).collect();
    for name in case_names {
        header.push(name.clone());
        header.push(format!("{name}-details"));
    }
    header
}

/// Case names of an existing header: every other column after the prefix.
fn case_columns(header: &[String]) -> Vec<String> {
    header
        .iter()
        .skip(CSV_PREFIX_COLUMNS.len())
        .step_by(2)
        .cloned()
        .collect()
}

fn read_header(path: &Path) -> Result<Option<Vec<String>>> {
    if !path.exists() {
        return Ok(None);
    }
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open score file: {}", path.display()))?;
    match reader.records().next() {
        Some(record) => {
            let record = record
                .with_context(|| format!("Failed to read score file header: {}", path.display()))?;
            Ok(Some(record.iter().map(str::to_string).collect()))
        }
        None => Ok(None),
    }
}

fn row(
    build_label: Option<&str>,
    score: AggregateScore,
    case_names: &[String],
    results: &[CaseResult],
    at: DateTime<Local>,
) -> Vec<String> {
    let mut row = split_build_label(build_label);
    row.push(score.to_string());
    row.push(at.format("%Y%m%d-%H%M").to_string());
    for name in case_names {
        match results.iter().find(|r| &r.name == name) {
            Some(result) => {
                row.push(result.verdict.to_string());
                row.push(
                    result
                        .detail
                        .as_deref()
                        .unwrap_or_default()
                        .replace('\n', "\t"),
                );
            }
            // Not run this time.
            None => row.extend([String::new(), String::new()]),
        }
    }
    row
}

/// Appends one run to the CSV file at `path`, creating it with a header.
///
/// Results whose case has no column in an existing header are left out of
/// the row and logged.
pub fn append_scores(
    path: &Path,
    build_label: Option<&str>,
    score: AggregateScore,
    results: &[CaseResult],
    at: DateTime<Local>,
) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create report directory: {}", parent.display()))?;
    }
    let existing = read_header(path)?;
    let write_header = existing.is_none();
    let case_names = match &existing {
        Some(header) => case_columns(header),
        None => results.iter().map(|r| r.name.clone()).collect(),
    };
    let unplaced: Vec<&str> = results
        .iter()
        .filter(|r| !case_names.contains(&r.name))
        .map(|r| r.name.as_str())
        .collect();
    if !unplaced.is_empty() {
        warn!(path = %path.display(), cases = ?unplaced, "Score file has no column for these cases");
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open score file: {}", path.display()))?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_writer(file);
    if write_header {
        writer.write_record(header(&case_names))?;
    }
    writer.write_record(row(build_label, score, &case_names, results, at))?;
    writer
        .flush()
        .with_context(|| format!("Failed to write score file: {}", path.display()))?;

    info!(path = %path.display(), score = score.percentage, header = write_header, "Appended score row");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use a11yscore_core::Verdict;
    use chrono::TimeZone;
    use std::path::PathBuf;

    fn result(name: &str, verdict: Verdict, detail: Option<&str>) -> CaseResult {
        CaseResult {
            name: name.into(),
            verdict,
            detail: detail.map(str::to_string),
        }
    }

    fn results() -> Vec<CaseResult> {
        vec![
            result(
                "meter",
                Verdict::Half,
                Some("\nElement did not have the correct value\nsecond"),
            ),
            result("nav", Verdict::Pass, None),
        ]
    }

    fn temp_csv() -> PathBuf {
        std::env::temp_dir()
            .join(format!("a11yscore-report-{}", uuid::Uuid::new_v4()))
            .join("scores.csv")
    }

    fn at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2016, 7, 15, 9, 5, 0).unwrap()
    }

    /// Value in column `column` of every data row.
    fn column_values(path: &Path, column: &str) -> Vec<String> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path).unwrap();
        let index = reader
            .headers()
            .unwrap()
            .iter()
            .position(|h| h == column)
            .unwrap();
        reader
            .records()
            .map(|r| r.unwrap().get(index).unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn build_label_fills_five_columns() {
        assert_eq!(
            split_build_label(Some("14393.0.amd64fre.rs1_release.160715-1616")),
            ["14393", "0", "amd64fre", "rs1_release", "160715-1616"]
        );
        assert_eq!(split_build_label(Some("1.2")), ["1", "2", "", "", ""]);
        assert_eq!(split_build_label(Some("a.b.c.d.e.f")), ["a", "b", "c", "d", "e.f"]);
        assert_eq!(split_build_label(None), ["", "", "", "", ""]);
    }

    #[test]
    fn header_written_once() {
        let path = temp_csv();
        let score = AggregateScore { percentage: 75.0 };

        append_scores(&path, Some("14393.0.amd64fre.rs1_release.160715-1616"), score, &results(), at())
            .unwrap();
        append_scores(&path, None, score, &results(), at()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "buildNumber,buildIteration,buildArchitecture,buildBranch,buildDate,score,time,meter,meter-details,nav,nav-details"
        );
        assert_eq!(
            lines[1],
            "14393,0,amd64fre,rs1_release,160715-1616,75,20160715-0905,Half,\tElement did not have the correct value\tsecond,Pass,"
        );
        assert!(lines[2].starts_with(",,,,,75,20160715-0905,Half,"));

        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn later_runs_stay_under_their_case_columns() {
        let path = temp_csv();
        let first = vec![
            result("nav", Verdict::Pass, None),
            result("meter", Verdict::Fail, Some("Unable to find the browser")),
        ];
        let second = vec![
            result("meter", Verdict::Half, Some("Element did not have the correct value")),
            result("nav", Verdict::Fail, Some("Unable to find the browser")),
        ];
        append_scores(&path, None, AggregateScore { percentage: 50.0 }, &first, at()).unwrap();
        append_scores(&path, None, AggregateScore { percentage: 25.0 }, &second, at()).unwrap();

        assert_eq!(column_values(&path, "nav"), ["Pass", "Fail"]);
        assert_eq!(column_values(&path, "meter"), ["Fail", "Half"]);
        assert_eq!(
            column_values(&path, "meter-details"),
            ["Unable to find the browser", "Element did not have the correct value"]
        );

        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn missing_and_new_cases() {
        let path = temp_csv();
        append_scores(&path, None, AggregateScore { percentage: 100.0 }, &results(), at()).unwrap();
        let later = vec![
            result("nav", Verdict::Pass, None),
            result("article", Verdict::Fail, Some("Unable to find the browser")),
        ];
        append_scores(&path, None, AggregateScore { percentage: 50.0 }, &later, at()).unwrap();

        assert_eq!(column_values(&path, "meter"), ["Half", ""]);
        assert_eq!(column_values(&path, "nav"), ["Pass", "Pass"]);
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(!content.contains("article"));

        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }
}
