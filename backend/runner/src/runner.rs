//! Conformance runner
//!
//! Drives one test case at a time through navigate, locate root, search,
//! standard checks and checkers, and collapses the outcome into a
//! [`ResultPair`]. A batch run reports every case and an aggregate score;
//! no single case can abort the batch.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

use a11yscore_browser::{save_screenshot, search, tabbable_ids, BrowserMarkers, TreeLocator};
use a11yscore_core::{
    AggregateScore, AutomationDriver, CaseResult, CaseStage, ConformanceError,
    Element, ResultPair, TreeProvider, UNKNOWN_NAME,
};
use a11yscore_logging::{ConformanceEvent, EventLogger};

use crate::checkers::{CheckContext, CheckTiming};
use crate::checks;
use crate::test_case::TestCase;

/// Everything the runner needs besides the driver and the tree.
#[derive(Debug, Clone)]
pub struct RunnerSettings {
    pub repository_path: String,
    pub file_suffix: String,
    pub max_retries: u32,
    pub markers: BrowserMarkers,
    pub max_tab_stops: usize,
    pub timing: CheckTiming,
    /// Saves a screenshot per case once its elements are searched.
    pub screenshot_dir: Option<PathBuf>,
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self {
            repository_path: "https://cdn.rawgit.com/DHBrett/AT-browser-tests/gh-pages/test-files/"
                .into(),
            file_suffix: ".html".into(),
            max_retries: 5,
            markers: BrowserMarkers::default(),
            max_tab_stops: 100,
            timing: CheckTiming::default(),
            screenshot_dir: None,
        }
    }
}

impl RunnerSettings {
    pub fn url_for(&self, case: &TestCase) -> String {
        format!("{}{}{}", self.repository_path, case.name, self.file_suffix)
    }
}

/// Ordered results and score of a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub run_id: String,
    /// In execution order; reports that sort do so on their own copy.
    pub results: Vec<CaseResult>,
    /// `None` when no case ran.
    pub score: Option<AggregateScore>,
}

pub struct ConformanceRunner {
    driver: Arc<dyn AutomationDriver>,
    tree: Arc<dyn TreeProvider>,
    locator: TreeLocator,
    settings: RunnerSettings,
    events: EventLogger,
}

impl ConformanceRunner {
    pub fn new(
        driver: Arc<dyn AutomationDriver>,
        tree: Arc<dyn TreeProvider>,
        settings: RunnerSettings,
    ) -> Self {
        let locator = TreeLocator::new(settings.markers.clone());
        Self {
            driver,
            tree,
            locator,
            settings,
            events: EventLogger::new(Uuid::new_v4().to_string()),
        }
    }

    pub fn run_id(&self) -> &str {
        self.events.run_id()
    }

    pub fn settings(&self) -> &RunnerSettings {
        &self.settings
    }

    /// Runs every case in order and scores the batch. Results keep the
    /// order of `cases`.
    pub async fn run_batch(&self, cases: &[&TestCase]) -> BatchOutcome {
        self.events.log_event(ConformanceEvent::BatchStarted { cases: cases.len() });
        info!(run_id = %self.run_id(), cases = cases.len(), "Starting conformance run");

        let mut results = Vec::with_capacity(cases.len());
        for case in cases {
            let pair = match self.execute(case).await {
                Ok(pair) => pair,
                Err(e) => {
                    error!(case = %case.name, error = %e, "Test case definition is broken");
                    ResultPair::fail(&case.name, e.to_string())
                }
            };
            let reported = pair.into_reported();
            self.events.log_event(ConformanceEvent::Verdict {
                case: reported.name.clone(),
                verdict: reported.verdict,
            });
            results.push(reported);
        }

        let score = AggregateScore::from_verdicts(results.iter().map(|r| r.verdict));
        self.events.log_event(ConformanceEvent::BatchFinished {
            cases: results.len(),
            score: score.map(|s| s.percentage),
        });
        BatchOutcome {
            run_id: self.run_id().to_string(),
            results,
            score,
        }
    }

    /// Runs one test case.
    ///
    /// Only a broken case definition (an unknown role or landmark name) is an
    /// error; everything else the page or the tree does ends up in the pair.
    pub async fn execute(&self, case: &TestCase) -> Result<ResultPair, ConformanceError> {
        let outcome = self.execute_case(case).await;
        if outcome.is_err() {
            self.events.abandon(&case.name);
        }
        outcome
    }

    async fn execute_case(&self, case: &TestCase) -> Result<ResultPair, ConformanceError> {
        case.validate()?;
        let target = case.target()?;
        let name = case.name.as_str();

        let url = self.settings.url_for(case);
        if let Err(e) = self.driver.navigate(&url).await {
            warn!(case = name, %url, error = %e, "Navigation failed");
            return Ok(self.finish(name, ResultPair::fail(name, format!("Unable to load {url}: {e}"))));
        }
        self.events.log_stage(name, CaseStage::Navigated, Some(&url));

        let Some(root) = self
            .locator
            .find_document_root(self.tree.as_ref(), self.settings.max_retries)
        else {
            self.events.log_stage(name, CaseStage::RootNotFound, None);
            return Ok(self.finish(name, ResultPair::fail(name, "Unable to find the browser")));
        };
        self.events.log_stage(name, CaseStage::RootLocated, None);

        let max_depth = self.settings.timing.max_depth;
        let found = search(self.tree.as_ref(), &root, &target, max_depth)?;
        self.save_screenshot(name).await;
        if found.matches.is_empty() {
            let cause = if case.uses_control_type_search() {
                let roles: Vec<&str> = found.found_roles.iter().map(String::as_str).collect();
                format!("Unable to find the element, found these instead: {}", roles.join(", "))
            } else {
                "Unable to find the element using the alternate search strategy".to_string()
            };
            self.events.log_stage(name, CaseStage::ElementsNotFound, Some(&cause));
            return Ok(self.finish(name, ResultPair::fail(name, cause)));
        }
        let count = found.matches.len().to_string();
        self.events.log_stage(name, CaseStage::ElementsSearched, Some(&count));

        let mut detail = self.standard_checks(case, &found.matches)?;
        let tabbable = match tabbable_ids(
            self.driver.as_ref(),
            self.settings.max_tab_stops,
            self.settings.timing.script_timeout,
        )
        .await
        {
            Ok(ids) => ids,
            Err(e) => {
                warn!(case = name, error = %e, "Tab order discovery failed");
                Vec::new()
            }
        };
        detail.push_str(&checks::keyboard_access(&case.keyboard_elements, &tabbable));

        if !case.checks.is_empty() {
            // Key input above may have changed the tree; search again.
            let elements = search(self.tree.as_ref(), &root, &target, max_depth)?.matches;
            detail.push_str(&self.run_checkers(case, &root, &elements, &tabbable).await);
        }
        self.events.log_stage(name, CaseStage::ChecksEvaluated, None);

        let detail = detail.trim();
        let pair = if detail.is_empty() {
            ResultPair::pass(name)
        } else {
            ResultPair::half(name, detail)
        };
        Ok(self.finish(name, pair))
    }

    pub async fn close(&self) {
        if let Err(e) = self.driver.close().await {
            warn!(error = %e, "Failed to close driver session");
        }
    }

    fn standard_checks(
        &self,
        case: &TestCase,
        elements: &[Element],
    ) -> Result<String, ConformanceError> {
        let mut detail = String::new();
        if let Some(localized) = &case.localized_control_type {
            detail.push_str(&checks::localized_control_type(elements, localized));
        }
        if !case.landmark_type.eq_ignore_ascii_case(UNKNOWN_NAME) {
            detail.push_str(&checks::landmarks(
                elements,
                &case.landmark_type,
                case.localized_landmark_type.as_deref(),
            )?);
        }
        if case.required_names.is_some() || case.required_descriptions.is_some() {
            detail.push_str(&checks::names_and_descriptions(
                elements,
                case.required_names.as_deref(),
                case.required_descriptions.as_deref(),
            ));
        }
        Ok(detail)
    }

    async fn run_checkers(
        &self,
        case: &TestCase,
        root: &Element,
        elements: &[Element],
        tabbable: &[String],
    ) -> String {
        let ctx = CheckContext {
            elements,
            root,
            tree: self.tree.as_ref(),
            driver: self.driver.as_ref(),
            tabbable_ids: tabbable,
            timing: &self.settings.timing,
        };
        let mut detail = String::new();
        for spec in &case.checks {
            let checker = spec.checker();
            match checker.evaluate(&ctx).await {
                Ok(lines) => {
                    if !lines.is_empty() {
                        info!(case = %case.name, checker = checker.name(), "Check reported issues");
                    }
                    detail.push_str(&lines);
                }
                Err(e) => {
                    warn!(case = %case.name, checker = checker.name(), error = %e, "Checker failed");
                    detail.push_str(&format!(
                        "\nCaught exception during test execution, ERROR: {e:#}"
                    ));
                }
            }
        }
        detail
    }

    async fn save_screenshot(&self, name: &str) {
        let Some(dir) = &self.settings.screenshot_dir else {
            return;
        };
        if let Err(e) = save_screenshot(self.driver.as_ref(), dir, name).await {
            warn!(case = name, error = %e, "Unable to save screenshot");
        }
    }

    fn finish(&self, name: &str, pair: ResultPair) -> ResultPair {
        let verdict = pair.verdict().to_string();
        self.events.log_stage(name, CaseStage::VerdictEmitted, Some(&verdict));
        pair
    }
}

/// Pause before the first case so the browser can finish starting up.
pub async fn startup_delay(delay: Duration) {
    if !delay.is_zero() {
        info!(delay_secs = delay.as_secs(), "Waiting for the browser to start");
        tokio::time::sleep(delay).await;
    }
}
