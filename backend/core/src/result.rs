//! Dual-subresult outcome model.
//!
//! Every test case produces a primary and a secondary [`SubResult`]. The pair
//! collapses into a three-valued [`Verdict`] at reporting time, and a batch
//! of verdicts into an [`AggregateScore`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ScoreError;

/// Binary outcome carried by one sub-result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Pass,
    Fail,
}

/// One half of a test case result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubResult {
    pub result: Outcome,
    pub name: String,
    pub detail: Option<String>,
}

/// Reported outcome of a test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    Pass,
    Half,
    Fail,
}

impl Verdict {
    /// Score weight: pass 1, half 0.5, fail 0.
    pub fn weight(self) -> f64 {
        match self {
            Verdict::Pass => 1.0,
            Verdict::Half => 0.5,
            Verdict::Fail => 0.0,
        }
    }

    /// Display rank: failures first, then halves, then passes.
    fn display_rank(self) -> u8 {
        match self {
            Verdict::Fail => 0,
            Verdict::Half => 1,
            Verdict::Pass => 2,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Pass => write!(f, "Pass"),
            Verdict::Half => write!(f, "Half"),
            Verdict::Fail => write!(f, "Fail"),
        }
    }
}

impl FromStr for Verdict {
    type Err = ScoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pass" => Ok(Verdict::Pass),
            "half" => Ok(Verdict::Half),
            "fail" => Ok(Verdict::Fail),
            _ => Err(ScoreError::InvalidVerdict(s.to_string())),
        }
    }
}

/// Collapses a `(primary, secondary)` pair into a verdict.
///
/// The verdict is the secondary outcome, except that a passing primary with
/// a failing secondary reports `Half`. `(Fail, Pass)` is not produced by any
/// constructor and reports `Pass`; that input is kept as-is rather than
/// guessing at an intent nobody recorded.
pub fn verdict_of(primary: Outcome, secondary: Outcome) -> Verdict {
    match (primary, secondary) {
        (Outcome::Pass, Outcome::Fail) => Verdict::Half,
        (_, Outcome::Fail) => Verdict::Fail,
        (_, Outcome::Pass) => Verdict::Pass,
    }
}

/// The two sub-results emitted for one test case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultPair {
    pub primary: SubResult,
    pub secondary: SubResult,
}

impl ResultPair {
    pub fn pass(name: &str) -> Self {
        Self {
            primary: sub(Outcome::Pass, name, 1, None),
            secondary: sub(Outcome::Pass, name, 2, None),
        }
    }

    pub fn fail(name: &str, cause: impl Into<String>) -> Self {
        let cause = cause.into();
        Self {
            primary: sub(Outcome::Fail, name, 1, Some(cause.clone())),
            secondary: sub(Outcome::Fail, name, 2, Some(cause)),
        }
    }

    pub fn half(name: &str, cause: impl Into<String>) -> Self {
        Self {
            primary: sub(Outcome::Pass, name, 1, None),
            secondary: sub(Outcome::Fail, name, 2, Some(cause.into())),
        }
    }

    pub fn verdict(&self) -> Verdict {
        verdict_of(self.primary.result, self.secondary.result)
    }

    /// Collapses the pair into the single entry shown in reports.
    pub fn into_reported(self) -> CaseResult {
        let verdict = self.verdict();
        let name = self
            .secondary
            .name
            .strip_suffix("-2")
            .map(str::to_string)
            .unwrap_or(self.secondary.name);
        CaseResult {
            name,
            verdict,
            detail: self.secondary.detail,
        }
    }
}

fn sub(result: Outcome, name: &str, index: u8, detail: Option<String>) -> SubResult {
    SubResult {
        result,
        name: format!("{name}-{index}"),
        detail,
    }
}

/// A reported test case: name without the sub-result suffix, verdict and
/// optional human-readable cause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseResult {
    pub name: String,
    pub verdict: Verdict,
    pub detail: Option<String>,
}

impl CaseResult {
    /// Detail cut to `max_chars` characters for one-line display.
    pub fn short_detail(&self, max_chars: usize) -> Option<String> {
        self.detail
            .as_deref()
            .map(|d| d.chars().take(max_chars).collect())
    }
}

impl fmt::Display for CaseResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:\n\t{}", self.name, self.verdict)?;
        if let Some(detail) = self.short_detail(30) {
            write!(f, " ({detail})")?;
        }
        Ok(())
    }
}

/// Percentage score of a completed batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AggregateScore {
    pub percentage: f64,
}

impl AggregateScore {
    /// Average verdict weight times 100, or `None` for an empty batch.
    pub fn from_verdicts<I>(verdicts: I) -> Option<Self>
    where
        I: IntoIterator<Item = Verdict>,
    {
        let (total, count) = verdicts
            .into_iter()
            .fold((0.0_f64, 0_usize), |(total, count), v| (total + v.weight(), count + 1));
        if count == 0 {
            return None;
        }
        Some(Self {
            percentage: total / count as f64 * 100.0,
        })
    }
}

impl fmt::Display for AggregateScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.percentage)
    }
}

/// Per-case progress through the conformance pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStage {
    Navigated,
    RootLocated,
    RootNotFound,
    ElementsSearched,
    ElementsNotFound,
    ChecksEvaluated,
    VerdictEmitted,
}

impl CaseStage {
    /// Stages after which the case can only fail.
    pub fn is_failure(self) -> bool {
        matches!(self, CaseStage::RootNotFound | CaseStage::ElementsNotFound)
    }

    pub fn can_advance_to(self, next: CaseStage) -> bool {
        use CaseStage::*;
        matches!(
            (self, next),
            (Navigated, RootLocated | RootNotFound)
                | (RootLocated, ElementsSearched | ElementsNotFound)
                | (ElementsSearched, ChecksEvaluated)
                | (ChecksEvaluated | RootNotFound | ElementsNotFound, VerdictEmitted)
        )
    }
}

impl fmt::Display for CaseStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CaseStage::Navigated => "navigated",
            CaseStage::RootLocated => "root_located",
            CaseStage::RootNotFound => "root_not_found",
            CaseStage::ElementsSearched => "elements_searched",
            CaseStage::ElementsNotFound => "elements_not_found",
            CaseStage::ChecksEvaluated => "checks_evaluated",
            CaseStage::VerdictEmitted => "verdict_emitted",
        };
        f.write_str(s)
    }
}

/// Stable sort for display: failures, then halves, then passes.
pub fn order_for_display(results: &mut [CaseResult]) {
    results.sort_by_key(|r| r.verdict.display_rank());
}
