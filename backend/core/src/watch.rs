//! Structure-change signal scoped to one test case.

use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

use tokio::sync::Notify;
use tracing::{debug, warn};

/// Waits until a set of named children has appeared under a subtree.
///
/// A tree provider calls [`StructureWatch::notify_child_added`] for every
/// inserted child; the checker awaiting the update calls
/// [`StructureWatch::wait`]. Each test case creates its own watch, so no
/// state leaks between cases.
#[derive(Debug)]
pub struct StructureWatch {
    pending: Mutex<HashSet<String>>,
    notify: Notify,
}

impl StructureWatch {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            pending: Mutex::new(names.into_iter().map(Into::into).collect()),
            notify: Notify::new(),
        }
    }

    /// Records that a child called `name` was inserted.
    pub fn notify_child_added(&self, name: &str) {
        let satisfied = match self.pending.lock() {
            Ok(mut pending) => {
                if pending.remove(name) {
                    debug!(name, remaining = pending.len(), "Awaited child appeared");
                }
                pending.is_empty()
            }
            Err(_) => return,
        };
        if satisfied {
            self.notify.notify_waiters();
        }
    }

    pub fn is_satisfied(&self) -> bool {
        self.pending.lock().map(|p| p.is_empty()).unwrap_or(false)
    }

    /// Blocks until every awaited name has appeared or `timeout` elapses.
    ///
    /// Returns `false` on timeout. The caller proceeds either way and lets
    /// its own search report what is missing.
    pub async fn wait(&self, timeout: Duration) -> bool {
        let wait = async {
            loop {
                let notified = self.notify.notified();
                if self.is_satisfied() {
                    return;
                }
                notified.await;
            }
        };
        match tokio::time::timeout(timeout, wait).await {
            Ok(()) => true,
            Err(_) => {
                let missing: Vec<String> = self
                    .pending
                    .lock()
                    .map(|p| p.iter().cloned().collect())
                    .unwrap_or_default();
                warn!(?missing, timeout_ms = timeout.as_millis() as u64, "Structure wait timed out");
                false
            }
        }
    }
}
