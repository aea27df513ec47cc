//! Conformance Event Logger
//!
//! One structured event per test-case stage transition and per batch,
//! emitted under the `conformance_events` target so they can be filtered
//! out of the NDJSON log.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use a11yscore_core::{CaseStage, Verdict};

pub const EVENT_TARGET: &str = "conformance_events";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConformanceEvent {
    BatchStarted {
        cases: usize,
    },
    Stage {
        case: String,
        stage: CaseStage,
        #[serde(skip_serializing_if = "Option::is_none")]
        detail: Option<String>,
    },
    Verdict {
        case: String,
        verdict: Verdict,
    },
    BatchFinished {
        cases: usize,
        score: Option<f64>,
    },
}

#[derive(Debug, Serialize)]
pub struct EventLogEntry {
    pub run_id: String,
    pub timestamp: DateTime<Utc>,
    pub event: ConformanceEvent,
}

impl EventLogEntry {
    pub fn new(run_id: &str, event: ConformanceEvent) -> Self {
        Self {
            run_id: run_id.into(),
            timestamp: Utc::now(),
            event,
        }
    }
}

/// Emits conformance events for one run and tracks where each case is in
/// the stage machine.
#[derive(Debug, Clone)]
pub struct EventLogger {
    run_id: String,
    stages: Arc<Mutex<HashMap<String, CaseStage>>>,
}

impl EventLogger {
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            stages: Arc::default(),
        }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn log_event(&self, event: ConformanceEvent) {
        let entry = EventLogEntry::new(&self.run_id, event);
        match serde_json::to_string(&entry) {
            Ok(json) => info!(target: EVENT_TARGET, event = %json, "Conformance event"),
            Err(_) => info!(target: EVENT_TARGET, event = ?entry, "Conformance event"),
        }
    }

    /// Last stage logged for `case`; cleared once its verdict is emitted.
    pub fn stage_of(&self, case: &str) -> Option<CaseStage> {
        self.stages.lock().ok()?.get(case).copied()
    }

    /// Forgets the stage of a case that ended in an error rather than a verdict.
    pub fn abandon(&self, case: &str) {
        if let Ok(mut stages) = self.stages.lock() {
            stages.remove(case);
        }
    }

    /// Logs a stage transition. An illegal transition is logged as a
    /// warning and trips a debug assertion.
    pub fn log_stage(&self, case: &str, stage: CaseStage, detail: Option<&str>) {
        let legal = self.advance(case, stage);
        if !legal {
            warn!(case, ?stage, "Illegal case stage transition");
        }
        debug_assert!(legal, "illegal stage transition to {stage:?} for case '{case}'");
        if stage.is_failure() {
            info!(case, ?stage, "Case can no longer pass");
        }
        self.log_event(ConformanceEvent::Stage {
            case: case.into(),
            stage,
            detail: detail.map(str::to_string),
        });
    }
}

impl EventLogger {
    /// Records `stage` for `case` and reports whether the move was legal.
    ///
    /// `Navigated` starts a case afresh. A verdict with no earlier stage is
    /// a navigation failure.
    fn advance(&self, case: &str, stage: CaseStage) -> bool {
        let Ok(mut stages) = self.stages.lock() else {
            return true;
        };
        let legal = match (stages.get(case), stage) {
            (_, CaseStage::Navigated) => true,
            (None, CaseStage::VerdictEmitted) => true,
            (None, _) => false,
            (Some(prev), next) => prev.can_advance_to(next),
        };
        if stage == CaseStage::VerdictEmitted {
            stages.remove(case);
        } else {
            stages.insert(case.to_string(), stage);
        }
        legal
    }
}
