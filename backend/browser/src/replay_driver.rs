//! Offline driver replaying recorded page snapshots.
//!
//! Each page is a JSON [`Snapshot`] named after the page's file stem. On
//! navigation the snapshot's tree replaces the contents of the shared
//! [`MemoryTree`]; scripts, focus and key input are answered from the
//! snapshot so that every check can run without a browser.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::Context;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use a11yscore_core::{AutomationDriver, DriverError, WebDriverKey};

use crate::memory_tree::{MemoryTree, NodePatch, NodeSpec};
use crate::page_control::TAB_ROOT_ID;

/// PNG file signature, returned as the replayed screenshot.
const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

static VALUE_READ: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"return document\.getElementById\(['"]([^'"]+)['"]\)\.value"#).unwrap()
});
static VALUE_CLEAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"document\.getElementById\(['"]([^'"]+)['"]\)\.value\s*=\s*['"]{2}"#).unwrap()
});

/// Canned result for scripts containing `contains`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptStub {
    pub contains: String,
    pub result: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insertion {
    pub parent_id: String,
    pub node: NodeSpec,
}

/// Tree changes triggered by typing into an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyEffect {
    pub element_id: String,
    /// Only applies when the typed text contains this; any input otherwise.
    #[serde(default)]
    pub keys_contain: Option<String>,
    #[serde(default)]
    pub insert: Vec<Insertion>,
    #[serde(default)]
    pub patches: Vec<NodePatch>,
}

/// A recorded page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Snapshot {
    /// The full platform tree, window chrome included.
    pub tree: NodeSpec,
    pub scripts: Vec<ScriptStub>,
    /// DOM ids in tab order, not counting the tab root.
    pub tab_order: Vec<String>,
    pub key_effects: Vec<KeyEffect>,
}

impl Snapshot {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot: {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse snapshot: {}", path.display()))
    }
}

#[derive(Debug, Default)]
struct ReplayState {
    snapshot: Snapshot,
    focus: Option<String>,
    tab_root: bool,
    values: HashMap<String, String>,
}

pub struct ReplayDriver {
    tree: Arc<MemoryTree>,
    snapshot_dir: PathBuf,
    state: Mutex<ReplayState>,
}

impl ReplayDriver {
    pub fn new(tree: Arc<MemoryTree>, snapshot_dir: impl Into<PathBuf>) -> Self {
        Self {
            tree,
            snapshot_dir: snapshot_dir.into(),
            state: Mutex::new(ReplayState::default()),
        }
    }

    /// `<snapshot dir>/<file stem of the url's last segment>.json`
    pub fn snapshot_path(&self, url: &str) -> PathBuf {
        let last = url
            .split(['?', '#'])
            .next()
            .unwrap_or(url)
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or(url);
        let stem = Path::new(last)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(last);
        self.snapshot_dir.join(format!("{stem}.json"))
    }

    /// Installs `snapshot` as the current page without touching disk.
    pub fn load_snapshot(&self, snapshot: Snapshot) -> Result<(), DriverError> {
        self.tree
            .replace(&snapshot.tree)
            .map_err(|e| DriverError::Protocol(e.to_string()))?;
        self.tree.set_focus(None);
        let mut state = self.lock()?;
        *state = ReplayState {
            snapshot,
            ..ReplayState::default()
        };
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, ReplayState>, DriverError> {
        self.state
            .lock()
            .map_err(|_| DriverError::Session("replay state poisoned".into()))
    }

    fn move_focus(&self, state: &mut ReplayState, from: &str, tabs: usize) {
        let mut cycle = vec![TAB_ROOT_ID.to_string()];
        cycle.extend(state.snapshot.tab_order.iter().cloned());
        let start = cycle.iter().position(|id| id == from).unwrap_or(0);
        let target = cycle[(start + tabs) % cycle.len()].clone();
        let dom_focus = (target != TAB_ROOT_ID).then_some(target.as_str());
        self.tree.set_focus(dom_focus);
        debug!(from, tabs, to = %target, "Moved focus");
        state.focus = Some(target);
    }
}

#[async_trait]
impl AutomationDriver for ReplayDriver {
    async fn navigate(&self, url: &str) -> Result<(), DriverError> {
        let path = self.snapshot_path(url);
        let snapshot = Snapshot::load(&path).map_err(|e| DriverError::Session(format!("{e:#}")))?;
        info!(url, snapshot = %path.display(), "Replaying page");
        self.load_snapshot(snapshot)
    }

    async fn execute_raw(&self, script: &str, _args: &[Value]) -> Result<Value, DriverError> {
        let mut state = self.lock()?;
        if script.contains("document.readyState") {
            return Ok(Value::from("complete"));
        }
        if script.contains(TAB_ROOT_ID) {
            state.tab_root = !script.contains("removeChild");
            if !state.tab_root {
                state.focus = None;
                self.tree.set_focus(None);
            }
            return Ok(Value::Null);
        }
        if script.contains("document.activeElement") {
            return Ok(state.focus.clone().map(Value::from).unwrap_or(Value::Null));
        }
        if let Some(caps) = VALUE_CLEAR.captures(script) {
            state.values.remove(&caps[1]);
            return Ok(Value::Null);
        }
        if let Some(caps) = VALUE_READ.captures(script) {
            return Ok(Value::from(state.values.get(&caps[1]).cloned().unwrap_or_default()));
        }
        let stub = state
            .snapshot
            .scripts
            .iter()
            .find(|stub| script.contains(&stub.contains))
            .map(|stub| stub.result.clone());
        Ok(stub.unwrap_or(Value::Null))
    }

    async fn send_keys(&self, element_id: &str, text: &str) -> Result<(), DriverError> {
        let mut state = self.lock()?;
        let known = (element_id == TAB_ROOT_ID && state.tab_root)
            || self.tree.find_by_id(element_id).is_some()
            || state.snapshot.tab_order.iter().any(|id| id == element_id);
        if !known {
            return Err(DriverError::ElementNotFound(element_id.to_string()));
        }

        let tab = WebDriverKey::Tab.code_point();
        let tabs = text.chars().filter(|&c| Some(c) == tab).count();
        if tabs > 0 {
            self.move_focus(&mut state, element_id, tabs);
        }
        let printable: String = text
            .chars()
            .filter(|&c| WebDriverKey::from_code_point(c).is_none())
            .collect();
        if !printable.is_empty() {
            state.values.entry(element_id.to_string()).or_default().push_str(&printable);
        }

        let effects: Vec<KeyEffect> = state
            .snapshot
            .key_effects
            .iter()
            .filter(|e| e.element_id == element_id)
            .filter(|e| e.keys_contain.as_deref().map_or(true, |k| text.contains(k)))
            .cloned()
            .collect();
        drop(state);

        for effect in effects {
            for patch in &effect.patches {
                self.tree
                    .patch(patch)
                    .map_err(|e| DriverError::Protocol(e.to_string()))?;
            }
            for insertion in &effect.insert {
                self.tree
                    .insert_child(&insertion.parent_id, &insertion.node)
                    .map_err(|e| DriverError::Protocol(e.to_string()))?;
            }
        }
        Ok(())
    }

    async fn screenshot(&self) -> Result<Vec<u8>, DriverError> {
        Ok(PNG_SIGNATURE.to_vec())
    }

    async fn close(&self) -> Result<(), DriverError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page_control::tabbable_ids;
    use crate::screenshot::save_screenshot;
    use a11yscore_core::TreeProvider;
    use std::time::Duration;

    fn form_page() -> Snapshot {
        Snapshot {
            tree: NodeSpec::new("Document").with_children(vec![
                NodeSpec::new("Edit").with_id("input1").named("email"),
                NodeSpec::new("Edit").with_id("input2"),
            ]),
            scripts: vec![ScriptStub {
                contains: "Modernizr".into(),
                result: Value::Bool(true),
            }],
            tab_order: vec!["input1".into(), "input2".into()],
            key_effects: vec![KeyEffect {
                element_id: "input1".into(),
                keys_contain: Some("\u{E007}".into()),
                insert: vec![Insertion {
                    parent_id: "input1".into(),
                    node: NodeSpec::new("Pane").with_id("err").named("Enter an email"),
                }],
                patches: vec![NodePatch {
                    id: "input1".into(),
                    data_invalid: Some(true),
                    controller_for: Some(vec!["err".into()]),
                    ..NodePatch::default()
                }],
            }],
        }
    }

    fn driver() -> (Arc<MemoryTree>, ReplayDriver) {
        let tree = Arc::new(MemoryTree::new(&NodeSpec::new("Pane")).unwrap());
        let driver = ReplayDriver::new(tree.clone(), "snapshots");
        (tree, driver)
    }

    #[test]
    fn snapshot_path_uses_file_stem() {
        let (_, driver) = driver();
        assert_eq!(
            driver.snapshot_path("https://host/test-files/meter.html"),
            PathBuf::from("snapshots/meter.json")
        );
        assert_eq!(
            driver.snapshot_path("file:///c/pages/input-email.html?x=1"),
            PathBuf::from("snapshots/input-email.json")
        );
    }

    #[tokio::test]
    async fn tab_order_is_replayed() {
        let (_, driver) = driver();
        driver.load_snapshot(form_page()).unwrap();
        let ids = tabbable_ids(&driver, 10, Duration::from_secs(1)).await.unwrap();
        assert_eq!(ids, ["input1", "input2"]);
    }

    #[tokio::test]
    async fn key_effects_patch_and_insert() {
        let (tree, driver) = driver();
        driver.load_snapshot(form_page()).unwrap();
        driver.send_keys("input1", "invalid").await.unwrap();
        assert!(tree.find_by_id("err").is_none());

        driver.send_keys("input1", "\u{E007}").await.unwrap();
        let input = tree.find_by_id("input1").unwrap();
        assert!(!input.is_data_valid_for_form().unwrap());
        assert_eq!(input.controller_for().unwrap().len(), 1);
        assert_eq!(tree.children(&input).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn scripts_and_values() {
        let (_, driver) = driver();
        driver.load_snapshot(form_page()).unwrap();
        let modernizr = driver.execute_raw("return Modernizr.canvas", &[]).await.unwrap();
        assert_eq!(modernizr, Value::Bool(true));

        driver.send_keys("input2", "x").await.unwrap();
        let read = "return document.getElementById('input2').value";
        assert_eq!(driver.execute_raw(read, &[]).await.unwrap(), Value::from("x"));
        driver
            .execute_raw("document.getElementById('input2').value = ''", &[])
            .await
            .unwrap();
        assert_eq!(driver.execute_raw(read, &[]).await.unwrap(), Value::from(""));
    }

    #[tokio::test]
    async fn unknown_element_is_reported() {
        let (_, driver) = driver();
        driver.load_snapshot(form_page()).unwrap();
        let err = driver.send_keys("nope", "x").await.unwrap_err();
        assert!(matches!(err, DriverError::ElementNotFound(id) if id == "nope"));
    }

    #[tokio::test]
    async fn navigate_loads_snapshot_file() {
        let dir = std::env::temp_dir().join(format!("a11yscore-replay-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("form.json"), serde_json::to_string(&form_page()).unwrap()).unwrap();

        let tree = Arc::new(MemoryTree::new(&NodeSpec::new("Pane")).unwrap());
        let driver = ReplayDriver::new(tree.clone(), &dir);
        driver.navigate("https://example.test/form.html").await.unwrap();
        assert!(tree.find_by_id("input1").is_some());
        assert!(driver.navigate("https://example.test/missing.html").await.is_err());

        let png = save_screenshot(&driver, &dir.join("shots"), "form").await.unwrap();
        assert_eq!(std::fs::read(png).unwrap(), PNG_SIGNATURE);
        std::fs::remove_dir_all(&dir).ok();
    }
}
