//! In-memory accessibility tree.
//!
//! Backs offline runs (snapshots recorded from a real browser) and every
//! tree-dependent test. Supports transient fault injection, live child
//! insertion with structure notifications, and wholesale replacement on
//! navigation, which invalidates every previously handed-out element.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use a11yscore_core::{
    codes, AccessibleElement, CodeKind, Element, LiveSetting, RangeValue, RegistryError,
    StructureWatch, TreeError, TreeProvider, TreeResult, UNKNOWN_CODE,
};

/// A platform code given either numerically or by canonical name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CodeRef {
    Code(i32),
    Name(String),
}

impl Default for CodeRef {
    fn default() -> Self {
        CodeRef::Code(UNKNOWN_CODE)
    }
}

impl CodeRef {
    fn resolve(&self, kind: CodeKind) -> Result<i32, RegistryError> {
        match self {
            CodeRef::Code(code) => Ok(*code),
            CodeRef::Name(name) => codes().table(kind).code_of(name),
        }
    }
}

/// Declarative description of a node and its subtree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeSpec {
    /// DOM id, used for controller-for references, focus and key input.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub role: CodeRef,
    pub name: String,
    pub class_name: String,
    pub localized_control_type: String,
    pub full_description: String,
    pub help_text: String,
    pub landmark: CodeRef,
    pub localized_landmark_type: String,
    pub live_setting: LiveSetting,
    pub controller_for: Vec<String>,
    pub required_for_form: bool,
    pub data_invalid: bool,
    pub patterns: Vec<String>,
    pub properties: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range_value: Option<RangeValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Every property read on this node fails.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub fault: bool,
    pub children: Vec<NodeSpec>,
}

impl NodeSpec {
    pub fn new(role: &str) -> Self {
        Self {
            role: CodeRef::Name(role.to_string()),
            localized_control_type: role.to_ascii_lowercase(),
            ..Self::default()
        }
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_class(mut self, class_name: &str) -> Self {
        self.class_name = class_name.to_string();
        self
    }

    pub fn localized(mut self, localized_control_type: &str) -> Self {
        self.localized_control_type = localized_control_type.to_string();
        self
    }

    pub fn landmark(mut self, landmark: &str, localized: &str) -> Self {
        self.landmark = CodeRef::Name(landmark.to_string());
        self.localized_landmark_type = localized.to_string();
        self
    }

    pub fn child(mut self, child: NodeSpec) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: Vec<NodeSpec>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn faulty(mut self) -> Self {
        self.fault = true;
        self
    }
}

/// In-place update of a node's mutable state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodePatch {
    pub id: String,
    pub data_invalid: Option<bool>,
    pub controller_for: Option<Vec<String>>,
    pub help_text: Option<String>,
    pub value: Option<String>,
}

#[derive(Debug)]
struct NodeData {
    control_type: i32,
    landmark_type: i32,
    props: NodeSpec,
    parent: Option<usize>,
    children: Vec<usize>,
}

#[derive(Debug, Default)]
struct TreeState {
    generation: i32,
    nodes: Vec<NodeData>,
    by_id: HashMap<String, usize>,
    focused: Option<usize>,
    watches: Vec<(usize, Arc<StructureWatch>)>,
}

impl TreeState {
    /// Appends `spec` and its subtree, returning the new node's index.
    fn append(
        &mut self,
        spec: &NodeSpec,
        parent: Option<usize>,
        added: &mut Vec<String>,
    ) -> Result<usize, RegistryError> {
        let index = self.nodes.len();
        let mut props = spec.clone();
        props.children.clear();
        self.nodes.push(NodeData {
            control_type: spec.role.resolve(CodeKind::ControlType)?,
            landmark_type: spec.landmark.resolve(CodeKind::Landmark)?,
            props,
            parent,
            children: Vec::new(),
        });
        if let Some(id) = &spec.id {
            self.by_id.insert(id.clone(), index);
        }
        added.push(spec.name.clone());
        for child in &spec.children {
            let child_index = self.append(child, Some(index), added)?;
            self.nodes[index].children.push(child_index);
        }
        Ok(index)
    }

    fn ancestry(&self, index: usize) -> Vec<usize> {
        let mut chain = vec![index];
        let mut current = self.nodes[index].parent;
        while let Some(p) = current {
            chain.push(p);
            current = self.nodes[p].parent;
        }
        chain
    }
}

fn poisoned() -> TreeError {
    TreeError::Fault("tree lock poisoned".into())
}

/// Tree provider over an arena of [`NodeSpec`] nodes.
pub struct MemoryTree {
    state: Arc<RwLock<TreeState>>,
    root_faults: AtomicUsize,
    root_calls: AtomicUsize,
}

impl fmt::Debug for MemoryTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryTree")
            .field("root_calls", &self.root_calls.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl MemoryTree {
    pub fn new(root: &NodeSpec) -> Result<Self, RegistryError> {
        let mut state = TreeState::default();
        state.append(root, None, &mut Vec::new())?;
        Ok(Self {
            state: Arc::new(RwLock::new(state)),
            root_faults: AtomicUsize::new(0),
            root_calls: AtomicUsize::new(0),
        })
    }

    /// Loads a tree from a JSON file holding one [`NodeSpec`].
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read tree snapshot: {}", path.display()))?;
        let spec: NodeSpec = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse tree snapshot: {}", path.display()))?;
        Ok(Self::new(&spec)?)
    }

    /// Makes the next `count` calls to `root_element` fail.
    pub fn fail_next_root_calls(&self, count: usize) {
        self.root_faults.store(count, Ordering::SeqCst);
    }

    /// Number of `root_element` calls made so far, failed ones included.
    pub fn root_calls(&self) -> usize {
        self.root_calls.load(Ordering::SeqCst)
    }

    /// Swaps in a new document. Elements from the old tree become stale.
    pub fn replace(&self, root: &NodeSpec) -> Result<(), TreeError> {
        let mut next = TreeState::default();
        next.append(root, None, &mut Vec::new())
            .map_err(|e| TreeError::Fault(e.to_string()))?;
        let mut state = self.state.write().map_err(|_| poisoned())?;
        next.generation = state.generation + 1;
        *state = next;
        Ok(())
    }

    /// Appends `child` under the node with DOM id `parent_id` and notifies
    /// watches registered on that node or any of its ancestors.
    pub fn insert_child(&self, parent_id: &str, child: &NodeSpec) -> Result<(), TreeError> {
        let (names, watches) = {
            let mut state = self.state.write().map_err(|_| poisoned())?;
            let parent = *state
                .by_id
                .get(parent_id)
                .ok_or_else(|| TreeError::Fault(format!("no node with id '{parent_id}'")))?;
            let mut names = Vec::new();
            let index = state
                .append(child, Some(parent), &mut names)
                .map_err(|e| TreeError::Fault(e.to_string()))?;
            state.nodes[parent].children.push(index);
            let chain = state.ancestry(parent);
            let watches: Vec<Arc<StructureWatch>> = state
                .watches
                .iter()
                .filter(|(anchor, _)| chain.contains(anchor))
                .map(|(_, w)| w.clone())
                .collect();
            (names, watches)
        };
        debug!(parent_id, added = names.len(), "Inserted subtree");
        for watch in watches {
            for name in &names {
                watch.notify_child_added(name);
            }
        }
        Ok(())
    }

    pub fn patch(&self, patch: &NodePatch) -> Result<(), TreeError> {
        let mut state = self.state.write().map_err(|_| poisoned())?;
        let index = *state
            .by_id
            .get(&patch.id)
            .ok_or_else(|| TreeError::Fault(format!("no node with id '{}'", patch.id)))?;
        let props = &mut state.nodes[index].props;
        if let Some(invalid) = patch.data_invalid {
            props.data_invalid = invalid;
        }
        if let Some(ids) = &patch.controller_for {
            props.controller_for = ids.clone();
        }
        if let Some(help) = &patch.help_text {
            props.help_text = help.clone();
        }
        if let Some(value) = &patch.value {
            props.value = Some(value.clone());
        }
        Ok(())
    }

    /// Moves keyboard focus to the node with DOM id `id`, or clears it.
    pub fn set_focus(&self, id: Option<&str>) {
        if let Ok(mut state) = self.state.write() {
            let focused = id.and_then(|id| state.by_id.get(id).copied());
            state.focused = focused;
        }
    }

    pub fn find_by_id(&self, id: &str) -> Option<Element> {
        let state = self.state.read().ok()?;
        let index = *state.by_id.get(id)?;
        Some(self.element(state.generation, index))
    }

    fn element(&self, generation: i32, index: usize) -> Element {
        Arc::new(MemoryElement {
            state: self.state.clone(),
            generation,
            index,
        })
    }

    /// Resolves a handle back to its arena index, rejecting stale handles.
    fn locate(&self, node: &Element) -> TreeResult<(i32, usize)> {
        let id = node.runtime_id()?;
        let state = self.state.read().map_err(|_| poisoned())?;
        match id.as_slice() {
            [generation, index]
                if *generation == state.generation && (*index as usize) < state.nodes.len() =>
            {
                Ok((*generation, *index as usize))
            }
            _ => Err(TreeError::Stale),
        }
    }
}

impl TreeProvider for MemoryTree {
    fn root_element(&self) -> TreeResult<Element> {
        self.root_calls.fetch_add(1, Ordering::SeqCst);
        let injected = self
            .root_faults
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if injected {
            return Err(TreeError::Fault("injected root fault".into()));
        }
        let state = self.state.read().map_err(|_| poisoned())?;
        Ok(self.element(state.generation, 0))
    }

    fn first_child(&self, node: &Element) -> TreeResult<Option<Element>> {
        let (generation, index) = self.locate(node)?;
        let state = self.state.read().map_err(|_| poisoned())?;
        Ok(state.nodes[index]
            .children
            .first()
            .map(|&child| self.element(generation, child)))
    }

    fn next_sibling(&self, node: &Element) -> TreeResult<Option<Element>> {
        let (generation, index) = self.locate(node)?;
        let state = self.state.read().map_err(|_| poisoned())?;
        let Some(parent) = state.nodes[index].parent else {
            return Ok(None);
        };
        let siblings = &state.nodes[parent].children;
        let next = siblings
            .iter()
            .position(|&i| i == index)
            .and_then(|pos| siblings.get(pos + 1));
        Ok(next.map(|&i| self.element(generation, i)))
    }

    fn watch_structure(&self, node: &Element, watch: Arc<StructureWatch>) -> TreeResult<()> {
        let (_, index) = self.locate(node)?;
        let mut state = self.state.write().map_err(|_| poisoned())?;
        state.watches.push((index, watch));
        Ok(())
    }
}

struct MemoryElement {
    state: Arc<RwLock<TreeState>>,
    generation: i32,
    index: usize,
}

impl fmt::Debug for MemoryElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryElement")
            .field("generation", &self.generation)
            .field("index", &self.index)
            .finish()
    }
}

impl MemoryElement {
    fn read<T>(&self, f: impl FnOnce(&TreeState, &NodeData) -> T) -> TreeResult<T> {
        let state = self.state.read().map_err(|_| poisoned())?;
        if state.generation != self.generation {
            return Err(TreeError::Stale);
        }
        let node = state.nodes.get(self.index).ok_or(TreeError::Stale)?;
        if node.props.fault {
            return Err(TreeError::Fault(format!("injected fault on '{}'", node.props.name)));
        }
        Ok(f(&state, node))
    }
}

impl AccessibleElement for MemoryElement {
    fn runtime_id(&self) -> TreeResult<Vec<i32>> {
        Ok(vec![self.generation, self.index as i32])
    }

    fn control_type(&self) -> TreeResult<i32> {
        self.read(|_, n| n.control_type)
    }

    fn name(&self) -> TreeResult<String> {
        self.read(|_, n| n.props.name.clone())
    }

    fn class_name(&self) -> TreeResult<String> {
        self.read(|_, n| n.props.class_name.clone())
    }

    fn localized_control_type(&self) -> TreeResult<String> {
        self.read(|_, n| n.props.localized_control_type.clone())
    }

    fn full_description(&self) -> TreeResult<String> {
        self.read(|_, n| n.props.full_description.clone())
    }

    fn help_text(&self) -> TreeResult<String> {
        self.read(|_, n| n.props.help_text.clone())
    }

    fn landmark_type(&self) -> TreeResult<i32> {
        self.read(|_, n| n.landmark_type)
    }

    fn localized_landmark_type(&self) -> TreeResult<String> {
        self.read(|_, n| n.props.localized_landmark_type.clone())
    }

    fn live_setting(&self) -> TreeResult<LiveSetting> {
        self.read(|_, n| n.props.live_setting)
    }

    fn controller_for(&self) -> TreeResult<Vec<Element>> {
        self.read(|state, n| {
            n.props
                .controller_for
                .iter()
                .filter_map(|id| state.by_id.get(id))
                .map(|&index| {
                    Arc::new(MemoryElement {
                        state: self.state.clone(),
                        generation: self.generation,
                        index,
                    }) as Element
                })
                .collect()
        })
    }

    fn is_required_for_form(&self) -> TreeResult<bool> {
        self.read(|_, n| n.props.required_for_form)
    }

    fn is_data_valid_for_form(&self) -> TreeResult<bool> {
        self.read(|_, n| !n.props.data_invalid)
    }

    fn has_keyboard_focus(&self) -> TreeResult<bool> {
        self.read(|state, _| state.focused == Some(self.index))
    }

    fn supported_patterns(&self) -> TreeResult<Vec<String>> {
        self.read(|_, n| n.props.patterns.clone())
    }

    fn supported_properties(&self) -> TreeResult<Vec<String>> {
        self.read(|_, n| n.props.properties.clone())
    }

    fn range_value(&self) -> TreeResult<Option<RangeValue>> {
        self.read(|_, n| n.props.range_value)
    }

    fn value_text(&self) -> TreeResult<Option<String>> {
        self.read(|_, n| n.props.value.clone())
    }
}
