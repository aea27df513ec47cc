//! Feature-specific checkers.
//!
//! A test case lists zero or more [`CheckSpec`] values. Each variant wraps
//! one concrete [`Checker`] that inspects the found elements, and possibly
//! drives the page, and returns the detail lines to append to the case
//! result. An empty string means the check passed; an `Err` is reported on
//! the case and never aborts the batch.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use a11yscore_browser::{child_names, descendants, send_special_keys, wait_for_condition};
use a11yscore_core::{
    codes, AutomationDriver, Element, LiveSetting, StructureWatch, TreeProvider, WebDriverKey,
};

use crate::checks::list_message;

/// Timing and bounds shared by every checker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckTiming {
    pub script_timeout: Duration,
    /// Settle time after key input, and the interval between condition polls.
    pub poll_interval: Duration,
    pub poll_attempts: u32,
    /// Upper bound for a structure-change wait.
    pub mutation_wait: Duration,
    pub max_depth: usize,
}

impl Default for CheckTiming {
    fn default() -> Self {
        Self {
            script_timeout: Duration::from_secs(10),
            poll_interval: Duration::from_millis(500),
            poll_attempts: 20,
            mutation_wait: Duration::from_secs(5),
            max_depth: 10,
        }
    }
}

/// Everything a checker may look at for one test case.
pub struct CheckContext<'a> {
    /// Elements from a fresh search, in discovery order.
    pub elements: &'a [Element],
    pub root: &'a Element,
    pub tree: &'a dyn TreeProvider,
    pub driver: &'a dyn AutomationDriver,
    /// Tab order discovered for the page.
    pub tabbable_ids: &'a [String],
    pub timing: &'a CheckTiming,
}

#[async_trait]
pub trait Checker: Send + Sync {
    fn name(&self) -> &'static str;

    async fn evaluate(&self, ctx: &CheckContext<'_>) -> Result<String>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "check", rename_all = "camelCase")]
pub enum CheckSpec {
    ChildNames(ChildNames),
    ElementCount(ElementCount),
    LandmarkCount(LandmarkCount),
    RangeValue(RangeValueCheck),
    ValueText(ValueText),
    ReadOnly(ReadOnly),
    LiveSetting(LiveSettingCheck),
    ControllerForCount(ControllerForCount),
    RequiredField(RequiredField),
    FeatureDetection(FeatureDetection),
    FormValidation(FormValidation),
    ClearButton(ClearButton),
    DescendantCount(DescendantCount),
}

impl CheckSpec {
    pub fn checker(&self) -> &dyn Checker {
        match self {
            CheckSpec::ChildNames(c) => c,
            CheckSpec::ElementCount(c) => c,
            CheckSpec::LandmarkCount(c) => c,
            CheckSpec::RangeValue(c) => c,
            CheckSpec::ValueText(c) => c,
            CheckSpec::ReadOnly(c) => c,
            CheckSpec::LiveSetting(c) => c,
            CheckSpec::ControllerForCount(c) => c,
            CheckSpec::RequiredField(c) => c,
            CheckSpec::FeatureDetection(c) => c,
            CheckSpec::FormValidation(c) => c,
            CheckSpec::ClearButton(c) => c,
            CheckSpec::DescendantCount(c) => c,
        }
    }
}

// ---------------------------------------------------------------------------
// Tree-only checkers
// ---------------------------------------------------------------------------

/// Direct children of every element must carry the listed names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildNames {
    pub names: Vec<String>,
    /// Also report unexpected children when the counts differ.
    #[serde(default)]
    pub strict: bool,
}

#[async_trait]
impl Checker for ChildNames {
    fn name(&self) -> &'static str {
        "childNames"
    }

    async fn evaluate(&self, ctx: &CheckContext<'_>) -> Result<String> {
        let mut detail = String::new();
        for element in ctx.elements {
            let found = child_names(ctx.tree, element, |_| Ok(true))?;
            let missing: Vec<String> = self
                .names
                .iter()
                .filter(|n| !found.contains(n))
                .cloned()
                .collect();
            detail.push_str(&list_message(
                &missing,
                " was expected as a name but not found. ",
                " were expected as names but not found. ",
            ));
            if self.strict && found.len() != self.names.len() {
                let unexpected: Vec<String> = found
                    .iter()
                    .filter(|n| !self.names.contains(n))
                    .cloned()
                    .collect();
                detail.push_str(&list_message(
                    &unexpected,
                    " was found as a name but not expected. ",
                    " were found as names but not expected. ",
                ));
            }
        }
        Ok(detail)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementCount {
    pub expected: usize,
}

#[async_trait]
impl Checker for ElementCount {
    fn name(&self) -> &'static str {
        "elementCount"
    }

    async fn evaluate(&self, ctx: &CheckContext<'_>) -> Result<String> {
        let found = ctx.elements.len();
        if found == self.expected {
            return Ok(String::new());
        }
        Ok(format!("\nFound {found} elements, expected {}.", self.expected))
    }
}

/// Exactly `expected` elements carry the landmark and/or localized landmark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LandmarkCount {
    #[serde(default)]
    pub landmark: Option<String>,
    #[serde(default)]
    pub localized: Option<String>,
    #[serde(default = "one")]
    pub expected: usize,
}

fn one() -> usize {
    1
}

#[async_trait]
impl Checker for LandmarkCount {
    fn name(&self) -> &'static str {
        "landmarkCount"
    }

    async fn evaluate(&self, ctx: &CheckContext<'_>) -> Result<String> {
        let mut detail = String::new();
        if let Some(landmark) = &self.landmark {
            let code = codes().landmarks().code_of(landmark)?;
            let count = ctx
                .elements
                .iter()
                .filter(|e| e.landmark_type().map(|c| c == code).unwrap_or(false))
                .count();
            if count != self.expected {
                detail.push_str(&format!(
                    "\nFound {count} elements with landmark type {landmark}, expected {}",
                    self.expected
                ));
            }
        }
        if let Some(localized) = &self.localized {
            let count = ctx
                .elements
                .iter()
                .filter(|e| e.localized_landmark_type().map(|l| &l == localized).unwrap_or(false))
                .count();
            if count != self.expected {
                detail.push_str(&format!(
                    "\nFound {count} elements with localized landmark type {localized}, expected {}",
                    self.expected
                ));
            }
        }
        Ok(detail)
    }
}

/// Range-value pattern bounds and current value, within `epsilon`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeValueCheck {
    pub minimum: f64,
    pub maximum: f64,
    pub value: f64,
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
}

fn default_epsilon() -> f64 {
    0.001
}

#[async_trait]
impl Checker for RangeValueCheck {
    fn name(&self) -> &'static str {
        "rangeValue"
    }

    async fn evaluate(&self, ctx: &CheckContext<'_>) -> Result<String> {
        let mut detail = String::new();
        for element in ctx.elements {
            let Some(range) = element.range_value()? else {
                detail.push_str("\nElement did not support RangeValuePattern");
                continue;
            };
            if (range.maximum - self.maximum).abs() > self.epsilon {
                detail.push_str("\nElement did not have the correct max");
            }
            if (range.minimum - self.minimum).abs() > self.epsilon {
                detail.push_str("\nElement did not have the correct min");
            }
            if (range.value - self.value).abs() > self.epsilon {
                detail.push_str("\nElement did not have the correct value");
            }
        }
        Ok(detail)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueText {
    pub expected: String,
}

#[async_trait]
impl Checker for ValueText {
    fn name(&self) -> &'static str {
        "valueText"
    }

    async fn evaluate(&self, ctx: &CheckContext<'_>) -> Result<String> {
        let mut detail = String::new();
        for element in ctx.elements {
            match element.value_text()? {
                None => detail.push_str("\nElement did not support ValuePattern"),
                Some(value) if value != self.expected => {
                    detail.push_str("\nElement did not have value set")
                }
                Some(_) => {}
            }
        }
        Ok(detail)
    }
}

/// Every element exposes a property whose name contains `property`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadOnly {
    #[serde(default = "read_only_property")]
    pub property: String,
}

fn read_only_property() -> String {
    "IsReadOnly".into()
}

impl Default for ReadOnly {
    fn default() -> Self {
        Self {
            property: read_only_property(),
        }
    }
}

#[async_trait]
impl Checker for ReadOnly {
    fn name(&self) -> &'static str {
        "readOnly"
    }

    async fn evaluate(&self, ctx: &CheckContext<'_>) -> Result<String> {
        for element in ctx.elements {
            let properties = element.supported_properties()?;
            if !properties.iter().any(|p| p.contains(&self.property)) {
                return Ok("\nNot all elements were read only".into());
            }
        }
        Ok(String::new())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveSettingCheck {
    pub expected: LiveSetting,
}

#[async_trait]
impl Checker for LiveSettingCheck {
    fn name(&self) -> &'static str {
        "liveSetting"
    }

    async fn evaluate(&self, ctx: &CheckContext<'_>) -> Result<String> {
        for element in ctx.elements {
            if element.live_setting()? != self.expected {
                return Ok(format!(
                    "\nElement did not have LiveSetting = {:?}",
                    self.expected
                ));
            }
        }
        Ok(String::new())
    }
}

/// Number of elements with a non-empty controller-for relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControllerForCount {
    #[serde(default = "one")]
    pub expected: usize,
}

#[async_trait]
impl Checker for ControllerForCount {
    fn name(&self) -> &'static str {
        "controllerForCount"
    }

    async fn evaluate(&self, ctx: &CheckContext<'_>) -> Result<String> {
        let mut count = 0;
        for element in ctx.elements {
            if !element.controller_for()?.is_empty() {
                count += 1;
            }
        }
        if count == self.expected {
            return Ok(String::new());
        }
        Ok(format!(
            "\nExpected {} element with ControllerFor set. Found {count}",
            self.expected
        ))
    }
}

/// Descendants of the found elements with one of `roles`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescendantCount {
    pub roles: Vec<String>,
    pub expected: usize,
}

#[async_trait]
impl Checker for DescendantCount {
    fn name(&self) -> &'static str {
        "descendantCount"
    }

    async fn evaluate(&self, ctx: &CheckContext<'_>) -> Result<String> {
        let wanted = self
            .roles
            .iter()
            .map(|r| codes().control_types().code_of(r))
            .collect::<Result<Vec<i32>, _>>()?;
        let found: usize = ctx
            .elements
            .iter()
            .map(|e| {
                descendants(
                    ctx.tree,
                    e,
                    |d| Ok(wanted.contains(&d.control_type()?)),
                    ctx.timing.max_depth,
                )
                .len()
            })
            .sum();
        if found == self.expected {
            return Ok(String::new());
        }
        Ok(format!(
            "\nUnable to find subdom elements. Found {found} with role {}, expected {}",
            self.roles.join("/"),
            self.expected
        ))
    }
}

// ---------------------------------------------------------------------------
// Checkers that drive the page
// ---------------------------------------------------------------------------

/// Runs a boolean feature-detection script in the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureDetection {
    /// Script run first, e.g. a detection library the page does not load.
    #[serde(default)]
    pub setup: Option<String>,
    pub script: String,
    pub failure: String,
}

#[async_trait]
impl Checker for FeatureDetection {
    fn name(&self) -> &'static str {
        "featureDetection"
    }

    async fn evaluate(&self, ctx: &CheckContext<'_>) -> Result<String> {
        let timeout = ctx.timing.script_timeout;
        if let Some(setup) = &self.setup {
            ctx.driver.execute_script(setup, timeout, &[]).await?;
        }
        let supported = ctx.driver.execute_script(&self.script, timeout, &[]).await?;
        debug!(?supported, "Feature detection result");
        if supported.as_bool() == Some(true) {
            return Ok(String::new());
        }
        Ok(self.failure.clone())
    }
}

/// Submits a form field with Enter and checks the required-field signals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequiredField {
    pub element_id: String,
}

#[async_trait]
impl Checker for RequiredField {
    fn name(&self) -> &'static str {
        "requiredField"
    }

    async fn evaluate(&self, ctx: &CheckContext<'_>) -> Result<String> {
        send_special_keys(ctx.driver, &self.element_id, &[WebDriverKey::Enter]).await?;
        tokio::time::sleep(ctx.timing.poll_interval).await;

        let mut detail = String::new();
        for element in ctx.elements {
            if element.controller_for()?.is_empty() {
                detail.push_str("\nElement did not have controller for set");
            }
            if !element.is_required_for_form()? {
                detail.push_str("\nElement did not have IsRequiredForForm set to true");
            }
            if element.help_text()?.is_empty() {
                detail.push_str("\nElement did not have HelpText");
            }
        }
        Ok(detail)
    }
}

/// Types invalid input into the first tab stop, submits it, and checks the
/// invalid element points at a help pane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormValidation {
    #[serde(default = "invalid_input")]
    pub input: String,
}

fn invalid_input() -> String {
    "invalid".into()
}

impl Default for FormValidation {
    fn default() -> Self {
        Self {
            input: invalid_input(),
        }
    }
}

#[async_trait]
impl Checker for FormValidation {
    fn name(&self) -> &'static str {
        "formValidation"
    }

    async fn evaluate(&self, ctx: &CheckContext<'_>) -> Result<String> {
        let mut detail = String::new();
        let Some(id) = ctx.tabbable_ids.first() else {
            return Ok(detail);
        };
        ctx.driver.send_keys(id, &self.input).await?;
        send_special_keys(ctx.driver, id, &[WebDriverKey::Enter]).await?;

        let mut invalid = Vec::new();
        for element in ctx.elements {
            if !element.is_data_valid_for_form()? {
                invalid.push(element.clone());
            }
        }
        if invalid.len() > 1 {
            bail!("Test assumption failed, multiple elements were invalid");
        }
        let Some(invalid) = invalid.pop() else {
            detail.push_str("\nElement failed to validate improper input");
            return Ok(detail);
        };

        let watched = invalid.clone();
        let driver = ctx.driver;
        let has_one_controller = wait_for_condition(
            move || {
                let watched = watched.clone();
                async move { watched.controller_for().map(|c| c.len() == 1).unwrap_or(false) }
            },
            move || async move {
                if let Err(e) = send_special_keys(driver, id, &[WebDriverKey::Enter]).await {
                    debug!(error = %e, "Re-submitting form failed");
                }
            },
            ctx.timing.poll_attempts,
            ctx.timing.poll_interval,
        )
        .await;
        if !has_one_controller {
            let count = invalid.controller_for().map(|c| c.len()).unwrap_or(0);
            detail.push_str(&format!("\n{id} did not have 1 ControllerFor {count}"));
            return Ok(detail);
        }

        if invalid.is_data_valid_for_form()? {
            detail.push_str("\nElement did not have IsDataValidForForm set to false");
        }
        if invalid.help_text()?.is_empty() {
            detail.push_str("\nElement did not have HelpText");
        }
        let help_pane = invalid
            .controller_for()
            .ok()
            .and_then(|c| c.into_iter().next())
            .and_then(|pane| pane.control_type().ok());
        match help_pane {
            Some(code) if codes().control_types().name_or_unknown(code) == "Pane" => {}
            Some(_) => detail.push_str("\nError message did not have correct ControlType"),
            None => detail.push_str("\nUnable to get controller for"),
        }
        Ok(detail)
    }
}

/// Typing into the first tab stop must surface a clear button under one of
/// the elements. The input is cleared afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearButton {
    #[serde(default = "clear_button_name")]
    pub button_name: String,
    #[serde(default = "clear_input")]
    pub input: String,
}

fn clear_button_name() -> String {
    "Clear value".into()
}

fn clear_input() -> String {
    "x".into()
}

impl Default for ClearButton {
    fn default() -> Self {
        Self {
            button_name: clear_button_name(),
            input: clear_input(),
        }
    }
}

impl ClearButton {
    fn button_present(&self, ctx: &CheckContext<'_>) -> bool {
        let needle = self.button_name.to_lowercase();
        ctx.elements.iter().any(|e| {
            !descendants(
                ctx.tree,
                e,
                |d| Ok(d.name()?.to_lowercase().contains(&needle)),
                ctx.timing.max_depth,
            )
            .is_empty()
        })
    }
}

#[async_trait]
impl Checker for ClearButton {
    fn name(&self) -> &'static str {
        "clearButton"
    }

    async fn evaluate(&self, ctx: &CheckContext<'_>) -> Result<String> {
        let mut detail = String::new();
        let Some(id) = ctx.tabbable_ids.first() else {
            return Ok(detail);
        };

        let watch = Arc::new(StructureWatch::new([self.button_name.clone()]));
        for element in ctx.elements {
            if let Err(e) = ctx.tree.watch_structure(element, watch.clone()) {
                debug!(error = %e, "Unable to watch element for a clear button");
            }
        }
        ctx.driver.send_keys(id, &self.input).await?;

        if !self.button_present(ctx) {
            watch.wait(ctx.timing.mutation_wait).await;
            if !self.button_present(ctx) {
                detail.push_str("\nUnable to find a clear button as a child of any element");
            }
        }

        let clear = format!("document.getElementById('{id}').value = ''");
        ctx.driver.execute_script(&clear, Duration::ZERO, &[]).await?;
        info!(id = %id, "Cleared input after clear-button check");
        Ok(detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use a11yscore_browser::{
        KeyEffect, MemoryTree, NodePatch, NodeSpec, ReplayDriver, ScriptStub, Snapshot,
    };
    use a11yscore_browser::replay_driver::Insertion;
    use a11yscore_core::RangeValue;
    use serde_json::Value;

    struct Page {
        tree: Arc<MemoryTree>,
        driver: ReplayDriver,
        root: Element,
        elements: Vec<Element>,
        timing: CheckTiming,
    }

    impl Page {
        fn new(snapshot: Snapshot) -> Self {
            let tree = Arc::new(MemoryTree::new(&NodeSpec::new("Pane")).unwrap());
            let driver = ReplayDriver::new(tree.clone(), "unused");
            driver.load_snapshot(snapshot).unwrap();
            let root = tree.root_element().unwrap();
            let elements = tree.children(&root).unwrap();
            let timing = CheckTiming {
                poll_interval: Duration::from_millis(1),
                poll_attempts: 3,
                mutation_wait: Duration::from_millis(50),
                ..CheckTiming::default()
            };
            Self {
                tree,
                driver,
                root,
                elements,
                timing,
            }
        }

        async fn run(&self, spec: CheckSpec, tabbable: &[&str]) -> Result<String> {
            let tabbable: Vec<String> = tabbable.iter().map(|s| s.to_string()).collect();
            let ctx = CheckContext {
                elements: &self.elements,
                root: &self.root,
                tree: self.tree.as_ref(),
                driver: &self.driver,
                tabbable_ids: &tabbable,
                timing: &self.timing,
            };
            spec.checker().evaluate(&ctx).await
        }
    }

    fn page(children: Vec<NodeSpec>) -> Page {
        Page::new(Snapshot {
            tree: NodeSpec::new("Document").with_children(children),
            ..Snapshot::default()
        })
    }

    #[test]
    fn specs_parse_from_tagged_yaml() {
        let yaml = "- check: rangeValue\n  minimum: 0\n  maximum: 100\n  value: 83.5\n- check: readOnly\n- check: liveSetting\n  expected: polite\n";
        let specs: Vec<CheckSpec> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(specs.len(), 3);
        assert!(matches!(&specs[0], CheckSpec::RangeValue(r) if r.epsilon == 0.001));
        assert_eq!(specs[1], CheckSpec::ReadOnly(ReadOnly::default()));
        assert_eq!(specs[2].checker().name(), "liveSetting");
    }

    #[tokio::test]
    async fn child_names_reports_missing_controls() {
        let page = page(vec![NodeSpec::new("Group").with_children(vec![
            NodeSpec::new("Button").named("Play"),
            NodeSpec::new("Slider").named("Seek"),
            NodeSpec::new("Button").named("Extra"),
        ])]);
        let spec = CheckSpec::ChildNames(ChildNames {
            names: vec!["Play".into(), "Seek".into(), "Mute".into()],
            strict: false,
        });
        assert_eq!(
            page.run(spec, &[]).await.unwrap(),
            "\nMute was expected as a name but not found. "
        );

        let strict = CheckSpec::ChildNames(ChildNames {
            names: vec!["Play".into(), "Seek".into()],
            strict: true,
        });
        assert_eq!(
            page.run(strict, &[]).await.unwrap(),
            "\nExtra was found as a name but not expected. "
        );
    }

    #[tokio::test]
    async fn landmark_and_element_counts() {
        let page = page(vec![
            NodeSpec::new("Group").landmark("Custom", "content information"),
            NodeSpec::new("Group"),
        ]);
        let count = CheckSpec::ElementCount(ElementCount { expected: 7 });
        assert_eq!(page.run(count, &[]).await.unwrap(), "\nFound 2 elements, expected 7.");

        let landmark = CheckSpec::LandmarkCount(LandmarkCount {
            landmark: Some("Custom".into()),
            localized: Some("content information".into()),
            expected: 1,
        });
        assert_eq!(page.run(landmark, &[]).await.unwrap(), "");
    }

    #[tokio::test]
    async fn meter_checks() {
        let mut meter = NodeSpec::new("Progressbar");
        meter.range_value = Some(RangeValue {
            minimum: 0.0,
            maximum: 100.0,
            value: 83.5,
        });
        meter.value = Some("Good".into());
        meter.properties = vec!["RangeValueIsReadOnly".into()];
        let mut bare = NodeSpec::new("Progressbar");
        bare.range_value = Some(RangeValue {
            minimum: 0.0,
            maximum: 1.0,
            value: 22.0,
        });
        let page = page(vec![meter, bare]);

        let range = CheckSpec::RangeValue(RangeValueCheck {
            minimum: 0.0,
            maximum: 100.0,
            value: 83.5,
            epsilon: 0.001,
        });
        assert_eq!(
            page.run(range, &[]).await.unwrap(),
            "\nElement did not have the correct max\nElement did not have the correct value"
        );
        let value = CheckSpec::ValueText(ValueText {
            expected: "Good".into(),
        });
        assert_eq!(
            page.run(value, &[]).await.unwrap(),
            "\nElement did not support ValuePattern"
        );
        let read_only = CheckSpec::ReadOnly(ReadOnly::default());
        assert_eq!(
            page.run(read_only, &[]).await.unwrap(),
            "\nNot all elements were read only"
        );
    }

    #[tokio::test]
    async fn output_checks() {
        let mut polite = NodeSpec::new("Group").with_id("out1");
        polite.live_setting = LiveSetting::Polite;
        polite.controller_for = vec!["out2".into()];
        let mut other = NodeSpec::new("Group").with_id("out2");
        other.live_setting = LiveSetting::Polite;
        let page = page(vec![polite, other]);

        let live = CheckSpec::LiveSetting(LiveSettingCheck {
            expected: LiveSetting::Polite,
        });
        assert_eq!(page.run(live, &[]).await.unwrap(), "");
        let controllers = CheckSpec::ControllerForCount(ControllerForCount { expected: 2 });
        assert_eq!(
            page.run(controllers, &[]).await.unwrap(),
            "\nExpected 2 element with ControllerFor set. Found 1"
        );
    }

    #[tokio::test]
    async fn descendant_count_uses_role_names() {
        let page = page(vec![NodeSpec::new("Image").with_children(vec![
            NodeSpec::new("Button"),
            NodeSpec::new("Pane").child(NodeSpec::new("Text")),
        ])]);
        let spec = CheckSpec::DescendantCount(DescendantCount {
            roles: vec!["Button".into(), "Text".into()],
            expected: 2,
        });
        assert_eq!(page.run(spec, &[]).await.unwrap(), "");

        let bad = CheckSpec::DescendantCount(DescendantCount {
            roles: vec!["Knob".into()],
            expected: 1,
        });
        assert!(page.run(bad, &[]).await.is_err());
    }

    #[tokio::test]
    async fn feature_detection_reads_script_result() {
        let page = Page::new(Snapshot {
            tree: NodeSpec::new("Document").child(NodeSpec::new("Image")),
            scripts: vec![ScriptStub {
                contains: "drawFocusIfNeeded".into(),
                result: Value::Bool(false),
            }],
            ..Snapshot::default()
        });
        let spec = CheckSpec::FeatureDetection(FeatureDetection {
            setup: None,
            script: "return !!canvas.getContext('2d').drawFocusIfNeeded".into(),
            failure: "\nFailed feature detection".into(),
        });
        assert_eq!(page.run(spec, &[]).await.unwrap(), "\nFailed feature detection");
    }

    fn form(effects: Vec<KeyEffect>) -> Page {
        Page::new(Snapshot {
            tree: NodeSpec::new("Document").with_children(vec![
                NodeSpec::new("Edit").with_id("input1"),
                NodeSpec::new("Edit").with_id("input2"),
            ]),
            tab_order: vec!["input1".into(), "input2".into()],
            key_effects: effects,
            ..Snapshot::default()
        })
    }

    fn error_pane_on_enter() -> KeyEffect {
        KeyEffect {
            element_id: "input1".into(),
            keys_contain: Some("\u{E007}".into()),
            insert: vec![Insertion {
                parent_id: "input1".into(),
                node: NodeSpec::new("Pane").with_id("err1").named("Enter a valid value"),
            }],
            patches: vec![NodePatch {
                id: "input1".into(),
                data_invalid: Some(true),
                controller_for: Some(vec!["err1".into()]),
                help_text: Some("Enter a valid value".into()),
                ..NodePatch::default()
            }],
        }
    }

    #[tokio::test]
    async fn form_validation_passes_with_help_pane() {
        let page = form(vec![error_pane_on_enter()]);
        let spec = CheckSpec::FormValidation(FormValidation::default());
        assert_eq!(page.run(spec, &["input1", "input2"]).await.unwrap(), "");
    }

    #[tokio::test]
    async fn form_validation_without_invalid_element() {
        let page = form(Vec::new());
        let spec = CheckSpec::FormValidation(FormValidation::default());
        assert_eq!(
            page.run(spec, &["input1"]).await.unwrap(),
            "\nElement failed to validate improper input"
        );
        // No tab stops: nothing to type into.
        let spec = CheckSpec::FormValidation(FormValidation::default());
        assert_eq!(page.run(spec, &[]).await.unwrap(), "");
    }

    #[tokio::test]
    async fn required_field_reports_each_missing_signal() {
        let page = form(Vec::new());
        let spec = CheckSpec::RequiredField(RequiredField {
            element_id: "input1".into(),
        });
        let detail = page.run(spec, &[]).await.unwrap();
        assert_eq!(detail.matches("controller for set").count(), 2);
        assert_eq!(detail.matches("IsRequiredForForm").count(), 2);
        assert_eq!(detail.matches("HelpText").count(), 2);
    }

    #[tokio::test]
    async fn clear_button_waits_for_insertion() {
        let page = form(vec![KeyEffect {
            element_id: "input1".into(),
            keys_contain: Some("x".into()),
            insert: vec![Insertion {
                parent_id: "input1".into(),
                node: NodeSpec::new("Button").named("Clear value"),
            }],
            patches: Vec::new(),
        }]);
        let spec = CheckSpec::ClearButton(ClearButton::default());
        assert_eq!(page.run(spec, &["input1"]).await.unwrap(), "");

        let read = "return document.getElementById('input1').value";
        let value = page.driver.execute_raw(read, &[]).await.unwrap();
        assert_eq!(value, Value::from(""));
    }

    #[tokio::test]
    async fn missing_clear_button_is_reported() {
        let page = form(Vec::new());
        let spec = CheckSpec::ClearButton(ClearButton::default());
        assert_eq!(
            page.run(spec, &["input2"]).await.unwrap(),
            "\nUnable to find a clear button as a child of any element"
        );
    }
}
