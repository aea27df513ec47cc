//! Accessibility tree abstraction.
//!
//! The tree is owned and mutated by the browser process. The engine only
//! holds transient [`Element`] handles while a search is in progress, and
//! every read may fail because the tree changed underneath it.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::TreeError;
use crate::watch::StructureWatch;

/// Shared handle to a node supplied by a [`TreeProvider`].
pub type Element = Arc<dyn AccessibleElement>;

pub type TreeResult<T> = Result<T, TreeError>;

/// Live-region politeness of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiveSetting {
    #[default]
    Off,
    Polite,
    Assertive,
}

/// Current state of an element's range-value pattern.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeValue {
    pub minimum: f64,
    pub maximum: f64,
    pub value: f64,
}

/// Read access to one accessibility node.
pub trait AccessibleElement: Send + Sync + fmt::Debug {
    /// Identity of the node within the current tree. Not stable across
    /// navigations.
    fn runtime_id(&self) -> TreeResult<Vec<i32>>;

    fn control_type(&self) -> TreeResult<i32>;
    fn name(&self) -> TreeResult<String>;
    fn class_name(&self) -> TreeResult<String>;
    fn localized_control_type(&self) -> TreeResult<String>;
    fn full_description(&self) -> TreeResult<String>;
    fn help_text(&self) -> TreeResult<String>;
    fn landmark_type(&self) -> TreeResult<i32>;
    fn localized_landmark_type(&self) -> TreeResult<String>;
    fn live_setting(&self) -> TreeResult<LiveSetting>;
    fn controller_for(&self) -> TreeResult<Vec<Element>>;
    fn is_required_for_form(&self) -> TreeResult<bool>;
    fn is_data_valid_for_form(&self) -> TreeResult<bool>;
    fn has_keyboard_focus(&self) -> TreeResult<bool>;

    /// Names of the control patterns the element supports, e.g. `RangeValuePattern`.
    fn supported_patterns(&self) -> TreeResult<Vec<String>>;

    /// Names of the properties the element supports, e.g. `RangeValueIsReadOnly`.
    fn supported_properties(&self) -> TreeResult<Vec<String>>;

    /// `None` when the element does not support the range-value pattern.
    fn range_value(&self) -> TreeResult<Option<RangeValue>>;

    /// `None` when the element does not support the value pattern.
    fn value_text(&self) -> TreeResult<Option<String>>;
}

/// Navigation over the live tree.
pub trait TreeProvider: Send + Sync {
    fn root_element(&self) -> TreeResult<Element>;
    fn first_child(&self, node: &Element) -> TreeResult<Option<Element>>;
    fn next_sibling(&self, node: &Element) -> TreeResult<Option<Element>>;

    /// Subscribes `watch` to child insertions under `node`.
    ///
    /// Providers without change notifications keep the default, and waits on
    /// the watch run to their timeout.
    fn watch_structure(&self, _node: &Element, _watch: Arc<StructureWatch>) -> TreeResult<()> {
        Ok(())
    }

    /// Direct children of `node` in provider order.
    fn children(&self, node: &Element) -> TreeResult<Vec<Element>> {
        let mut children = Vec::new();
        let mut next = self.first_child(node)?;
        while let Some(child) = next {
            next = self.next_sibling(&child)?;
            children.push(child);
        }
        Ok(children)
    }
}
