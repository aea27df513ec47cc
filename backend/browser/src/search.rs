//! Breadth-first element search under a document root.

use std::collections::{BTreeSet, VecDeque};
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use a11yscore_core::{codes, Element, RegistryError, TreeProvider, TreeResult};

/// Node test supplied by the caller instead of a role name.
pub type Predicate = Arc<dyn Fn(&Element) -> TreeResult<bool> + Send + Sync>;

/// What a search is looking for.
#[derive(Clone)]
pub enum Target {
    /// Control type name, compared case-insensitively.
    Role(String),
    Predicate(Predicate),
}

impl Target {
    pub fn role(name: impl Into<String>) -> Self {
        Target::Role(name.into())
    }

    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&Element) -> TreeResult<bool> + Send + Sync + 'static,
    {
        Target::Predicate(Arc::new(f))
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Role(name) => f.debug_tuple("Role").field(name).finish(),
            Target::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// Matches in discovery order plus the roles of every node inspected.
#[derive(Debug, Default)]
pub struct SearchOutcome {
    pub matches: Vec<Element>,
    pub found_roles: BTreeSet<String>,
}

/// Bounded breadth-first search below `root`.
///
/// The root itself is not a candidate; its children sit at depth 1 and no
/// node deeper than `max_depth` is inspected. A matching node is collected
/// and its subtree is not explored. Tree faults on a node drop that node and
/// its subtree. Only an unknown target role name is an error.
pub fn search(
    tree: &dyn TreeProvider,
    root: &Element,
    target: &Target,
    max_depth: usize,
) -> Result<SearchOutcome, RegistryError> {
    if let Target::Role(name) = target {
        codes().control_types().code_of(name)?;
    }

    let mut outcome = SearchOutcome::default();
    if max_depth == 0 {
        return Ok(outcome);
    }

    let mut frontier: VecDeque<(Element, usize)> = VecDeque::new();
    enqueue_children(tree, root, 1, &mut frontier);

    while let Some((node, depth)) = frontier.pop_front() {
        let role = match node.control_type() {
            Ok(code) => codes().control_types().name_or_unknown(code),
            Err(e) => {
                debug!(depth, error = %e, "Skipping unreadable node");
                continue;
            }
        };
        outcome.found_roles.insert(role.to_string());

        let matched = match target {
            Target::Role(name) => role.eq_ignore_ascii_case(name),
            Target::Predicate(predicate) => match predicate(&node) {
                Ok(matched) => matched,
                Err(e) => {
                    debug!(depth, error = %e, "Predicate failed, skipping node");
                    continue;
                }
            },
        };

        if matched {
            outcome.matches.push(node);
        } else if depth < max_depth {
            enqueue_children(tree, &node, depth + 1, &mut frontier);
        }
    }

    debug!(
        matches = outcome.matches.len(),
        roles = outcome.found_roles.len(),
        ?target,
        "Search finished"
    );
    Ok(outcome)
}

fn enqueue_children(
    tree: &dyn TreeProvider,
    node: &Element,
    depth: usize,
    frontier: &mut VecDeque<(Element, usize)>,
) {
    match tree.children(node) {
        Ok(children) => frontier.extend(children.into_iter().map(|c| (c, depth))),
        Err(e) => debug!(depth, error = %e, "Unable to expand node"),
    }
}

/// Every descendant of `node` accepted by `predicate`, breadth-first.
///
/// Unlike [`search`], matches are expanded too. Faulting nodes are skipped.
pub fn descendants<F>(
    tree: &dyn TreeProvider,
    node: &Element,
    predicate: F,
    max_depth: usize,
) -> Vec<Element>
where
    F: Fn(&Element) -> TreeResult<bool>,
{
    let mut found = Vec::new();
    let mut frontier = VecDeque::new();
    enqueue_children(tree, node, 1, &mut frontier);
    while let Some((current, depth)) = frontier.pop_front() {
        if predicate(&current).unwrap_or(false) {
            found.push(current.clone());
        }
        if depth < max_depth {
            enqueue_children(tree, &current, depth + 1, &mut frontier);
        }
    }
    found
}

/// Names of the direct children of `node` accepted by `predicate`.
pub fn child_names<F>(tree: &dyn TreeProvider, node: &Element, predicate: F) -> TreeResult<Vec<String>>
where
    F: Fn(&Element) -> TreeResult<bool>,
{
    let mut names = Vec::new();
    for child in tree.children(node)? {
        if predicate(&child)? {
            names.push(child.name()?);
        }
    }
    Ok(names)
}
