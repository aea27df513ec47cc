//! Locating the rendered document inside the browser's window chrome.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use a11yscore_core::{Element, TreeProvider, TreeResult};

/// Substrings that identify the browser's window chrome in the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowserMarkers {
    /// Descend into elements whose name contains this.
    pub product_marker: String,
    /// Descend into elements whose class name contains this.
    pub shell_class_marker: String,
    /// Exact class name of the tab window wrapping the document.
    pub tab_class_marker: String,
}

impl Default for BrowserMarkers {
    fn default() -> Self {
        Self {
            product_marker: "Microsoft Edge".into(),
            shell_class_marker: "Spartan".into(),
            tab_class_marker: "TabWindowClass".into(),
        }
    }
}

/// Runs `attempt` up to `1 + max_retries` times until it yields a value.
///
/// Errors count as a failed attempt and never escape. Returns the value and
/// the number of attempts made.
pub fn retry_attempts<T, F>(max_retries: u32, mut attempt: F) -> (Option<T>, u32)
where
    F: FnMut(u32) -> TreeResult<Option<T>>,
{
    let total = max_retries.saturating_add(1);
    for n in 1..=total {
        match attempt(n) {
            Ok(Some(found)) => return (Some(found), n),
            Ok(None) => debug!(attempt = n, "Attempt found nothing"),
            Err(e) => warn!(attempt = n, error = %e, "Attempt failed on a tree fault"),
        }
    }
    (None, total)
}

/// Finds the document root with bounded retries.
#[derive(Debug, Clone, Default)]
pub struct TreeLocator {
    markers: BrowserMarkers,
}

impl TreeLocator {
    pub fn new(markers: BrowserMarkers) -> Self {
        Self { markers }
    }

    pub fn markers(&self) -> &BrowserMarkers {
        &self.markers
    }

    /// Returns `None` once every attempt has failed; never errors.
    pub fn find_document_root(&self, tree: &dyn TreeProvider, max_retries: u32) -> Option<Element> {
        let (root, attempts) = retry_attempts(max_retries, |_| self.attempt(tree));
        match &root {
            Some(_) => info!(attempts, "Located browser document root"),
            None => warn!(attempts, "Unable to locate browser document root"),
        }
        root
    }

    /// One fresh descent from the platform root.
    fn attempt(&self, tree: &dyn TreeProvider) -> TreeResult<Option<Element>> {
        let root = tree.root_element()?;
        let first = tree.first_child(&root)?;
        self.scan(tree, first)
    }

    /// Walks `first` and its following siblings.
    fn scan(&self, tree: &dyn TreeProvider, first: Option<Element>) -> TreeResult<Option<Element>> {
        let mut current = first;
        while let Some(element) = current {
            let class_name = element.class_name()?;
            if class_name == self.markers.tab_class_marker {
                // The document sits two levels below the tab window.
                let Some(child) = tree.first_child(&element)? else {
                    return Ok(None);
                };
                return tree.first_child(&child);
            }
            let name = element.name()?;
            if name.contains(&self.markers.product_marker)
                || class_name.contains(&self.markers.shell_class_marker)
            {
                let nested = tree.first_child(&element)?;
                if let Some(found) = self.scan(tree, nested)? {
                    return Ok(Some(found));
                }
            }
            current = tree.next_sibling(&element)?;
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_tree::{MemoryTree, NodeSpec};
    use a11yscore_core::TreeError;

    fn desktop() -> NodeSpec {
        NodeSpec::new("Pane").named("Desktop").with_children(vec![
            NodeSpec::new("Window").named("Notepad"),
            NodeSpec::new("Window")
                .named("Test page - Microsoft Edge")
                .with_class("ApplicationFrameWindow")
                .child(
                    NodeSpec::new("Pane")
                        .named("Microsoft Edge")
                        .with_class("Windows.UI.Core.CoreWindow")
                        .child(NodeSpec::new("Pane").with_class("Spartan XAML Host").child(
                            NodeSpec::new("Pane").with_class("TabWindowClass").child(
                                NodeSpec::new("Pane")
                                    .with_class("Internet Explorer_Server")
                                    .child(NodeSpec::new("Document").named("page")),
                            ),
                        )),
                ),
        ])
    }

    #[test]
    fn returns_grandchild_of_tab_window() {
        let tree = MemoryTree::new(&desktop()).unwrap();
        let root = TreeLocator::default().find_document_root(&tree, 5).unwrap();
        assert_eq!(root.name().unwrap(), "page");
    }

    #[test]
    fn ignores_windows_without_markers() {
        let spec = NodeSpec::new("Pane").child(
            NodeSpec::new("Window")
                .named("Other browser")
                .child(NodeSpec::new("Pane").with_class("TabWindowClass")),
        );
        let tree = MemoryTree::new(&spec).unwrap();
        assert!(TreeLocator::default().find_document_root(&tree, 0).is_none());
        assert_eq!(tree.root_calls(), 1);
    }

    #[test]
    fn transient_fault_then_success_takes_two_attempts() {
        let tree = MemoryTree::new(&desktop()).unwrap();
        tree.fail_next_root_calls(1);
        let root = TreeLocator::default().find_document_root(&tree, 5);
        assert!(root.is_some());
        assert_eq!(tree.root_calls(), 2);
    }

    #[test]
    fn exhausts_retries_without_error() {
        let tree = MemoryTree::new(&desktop()).unwrap();
        tree.fail_next_root_calls(100);
        assert!(TreeLocator::default().find_document_root(&tree, 5).is_none());
        assert_eq!(tree.root_calls(), 6);
    }

    #[test]
    fn retry_combinator_counts_attempts() {
        let (found, attempts) = retry_attempts(3, |n| {
            if n < 3 {
                Err(TreeError::Stale)
            } else {
                Ok(Some(n))
            }
        });
        assert_eq!(found, Some(3));
        assert_eq!(attempts, 3);

        let (found, attempts) = retry_attempts::<u32, _>(2, |_| Ok(None));
        assert_eq!(found, None);
        assert_eq!(attempts, 3);
    }
}
