//! Page Control Actions
//!
//! Keyboard simulation and polling helpers layered over an
//! [`AutomationDriver`] session.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, info, warn};

use a11yscore_core::{AutomationDriver, DriverError, WebDriverKey};

/// Pause inserted by [`WebDriverKey::Wait`].
pub const KEY_WAIT: Duration = Duration::from_secs(1);

/// DOM id of the temporary input tab-order discovery starts from.
pub const TAB_ROOT_ID: &str = "tabroot";

const INSERT_TAB_ROOT: &str =
    "document.body.innerHTML = \"<input id='tabroot' />\" + document.body.innerHTML";
const REMOVE_TAB_ROOT: &str =
    "document.body.removeChild(document.getElementById(\"tabroot\"))";
const ACTIVE_ELEMENT_ID: &str =
    "return document.activeElement ? document.activeElement.id : null";

/// Sends `keys` to `element_id`. Each [`WebDriverKey::Wait`] pauses for
/// [`KEY_WAIT`] and then flushes the keys collected before it.
pub async fn send_special_keys(
    driver: &dyn AutomationDriver,
    element_id: &str,
    keys: &[WebDriverKey],
) -> Result<(), DriverError> {
    let mut pending = String::new();
    for key in keys {
        match key.code_point() {
            Some(c) => pending.push(c),
            None => {
                tokio::time::sleep(KEY_WAIT).await;
                driver.send_keys(element_id, &pending).await?;
                pending.clear();
            }
        }
    }
    driver.send_keys(element_id, &pending).await
}

pub async fn send_tabs(
    driver: &dyn AutomationDriver,
    element_id: &str,
    count: usize,
) -> Result<(), DriverError> {
    send_special_keys(driver, element_id, &vec![WebDriverKey::Tab; count]).await
}

/// DOM ids reachable with the Tab key, in first-seen order.
///
/// Inserts a temporary input at the top of the body, tabs 1, 2, 3, ...
/// times from it and records the focused id until focus returns to the
/// temporary input or `max_tab_stops` tab counts have been tried. The
/// temporary input is removed again whether or not discovery succeeded.
pub async fn tabbable_ids(
    driver: &dyn AutomationDriver,
    max_tab_stops: usize,
    script_timeout: Duration,
) -> Result<Vec<String>, DriverError> {
    driver.execute_script(INSERT_TAB_ROOT, script_timeout, &[]).await?;

    let discovered = walk_tab_order(driver, max_tab_stops).await;
    let removed = driver.execute_script(REMOVE_TAB_ROOT, script_timeout, &[]).await;

    let ids = discovered?;
    removed?;
    info!(count = ids.len(), "Collected tabbable ids");
    Ok(ids)
}

async fn walk_tab_order(
    driver: &dyn AutomationDriver,
    max_tab_stops: usize,
) -> Result<Vec<String>, DriverError> {
    let mut ids: Vec<String> = Vec::new();
    for count in 1..=max_tab_stops {
        send_tabs(driver, TAB_ROOT_ID, count).await?;
        let active = driver.execute_script(ACTIVE_ELEMENT_ID, Duration::ZERO, &[]).await?;
        let id = active.as_str().unwrap_or_default();
        if id == TAB_ROOT_ID {
            return Ok(ids);
        }
        if !id.is_empty() && !ids.iter().any(|seen| seen == id) {
            debug!(id, count, "Discovered tab stop");
            ids.push(id.to_string());
        }
    }
    warn!(max_tab_stops, "Tab order did not cycle back to the start");
    Ok(ids)
}

/// Polls `check` up to `attempts` times, sleeping `interval` before each
/// poll and running `on_miss` after each miss.
pub async fn wait_for_condition<C, CF, M, MF>(
    mut check: C,
    mut on_miss: M,
    attempts: u32,
    interval: Duration,
) -> bool
where
    C: FnMut() -> CF,
    CF: Future<Output = bool>,
    M: FnMut() -> MF,
    MF: Future<Output = ()>,
{
    for attempt in 1..=attempts {
        tokio::time::sleep(interval).await;
        if check().await {
            debug!(attempt, "Condition met");
            return true;
        }
        on_miss().await;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::Value;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    /// Records key input and answers active-element queries from a fixed
    /// tab order.
    #[derive(Default)]
    struct KeyLog {
        sent: Mutex<Vec<(String, String)>>,
        order: Vec<&'static str>,
        focus: Mutex<String>,
        scripts: Mutex<Vec<String>>,
        /// Key input fails once this many sends have succeeded.
        fail_after_sends: Option<usize>,
    }

    #[async_trait]
    impl AutomationDriver for KeyLog {
        async fn navigate(&self, _url: &str) -> Result<(), DriverError> {
            Ok(())
        }

        async fn execute_raw(&self, script: &str, _args: &[Value]) -> Result<Value, DriverError> {
            if script.contains("readyState") {
                return Ok(Value::from("complete"));
            }
            self.scripts.lock().unwrap().push(script.to_string());
            if script.contains("activeElement") {
                return Ok(Value::from(self.focus.lock().unwrap().clone()));
            }
            Ok(Value::Null)
        }

        async fn send_keys(&self, id: &str, text: &str) -> Result<(), DriverError> {
            if self.fail_after_sends == Some(self.sent.lock().unwrap().len()) {
                return Err(DriverError::Session("window closed".into()));
            }
            self.sent.lock().unwrap().push((id.to_string(), text.to_string()));
            let tabs = text.chars().filter(|&c| c == '\u{E004}').count();
            if id == TAB_ROOT_ID && tabs > 0 {
                let cycle = self.order.len() + 1;
                let focus = match tabs % cycle {
                    0 => TAB_ROOT_ID.to_string(),
                    n => self.order[n - 1].to_string(),
                };
                *self.focus.lock().unwrap() = focus;
            }
            Ok(())
        }

        async fn screenshot(&self) -> Result<Vec<u8>, DriverError> {
            Ok(Vec::new())
        }

        async fn close(&self) -> Result<(), DriverError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn tabbable_ids_stops_when_focus_cycles() {
        let driver = KeyLog {
            order: vec!["input1", "", "input2", "input1"],
            ..KeyLog::default()
        };
        let ids = tabbable_ids(&driver, 100, Duration::from_secs(1)).await.unwrap();
        assert_eq!(ids, ["input1", "input2"]);

        let scripts = driver.scripts.lock().unwrap();
        assert!(scripts.first().unwrap().contains("tabroot"));
        assert!(scripts.last().unwrap().contains("removeChild"));
        assert_eq!(driver.sent.lock().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn tabbable_ids_is_capped() {
        let driver = KeyLog {
            order: vec!["a", "b", "c", "d", "e", "f"],
            ..KeyLog::default()
        };
        let ids = tabbable_ids(&driver, 3, Duration::from_secs(1)).await.unwrap();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn tab_root_removed_when_discovery_fails() {
        let driver = KeyLog {
            order: vec!["input1", "input2"],
            fail_after_sends: Some(1),
            ..KeyLog::default()
        };
        let err = tabbable_ids(&driver, 100, Duration::from_secs(1)).await.unwrap_err();
        assert!(matches!(err, DriverError::Session(_)));

        let scripts = driver.scripts.lock().unwrap();
        assert!(scripts.last().unwrap().contains("removeChild"));
    }

    #[tokio::test]
    async fn wait_key_splits_input() {
        let driver = KeyLog::default();
        send_special_keys(
            &driver,
            "input1",
            &[WebDriverKey::Enter, WebDriverKey::Wait, WebDriverKey::Tab],
        )
        .await
        .unwrap();
        let sent = driver.sent.lock().unwrap();
        assert_eq!(sent[0], ("input1".to_string(), "\u{E007}".to_string()));
        assert_eq!(sent[1], ("input1".to_string(), "\u{E004}".to_string()));
    }

    #[tokio::test]
    async fn wait_for_condition_runs_miss_action_between_polls() {
        let polls = AtomicU32::new(0);
        let misses = AtomicU32::new(0);
        let met = wait_for_condition(
            || async { polls.fetch_add(1, Ordering::SeqCst) >= 2 },
            || async {
                misses.fetch_add(1, Ordering::SeqCst);
            },
            20,
            Duration::from_millis(1),
        )
        .await;
        assert!(met);
        assert_eq!(polls.load(Ordering::SeqCst), 3);
        assert_eq!(misses.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn wait_for_condition_gives_up() {
        let met = wait_for_condition(|| async { false }, || async {}, 3, Duration::from_millis(1)).await;
        assert!(!met);
    }
}
