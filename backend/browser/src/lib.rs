pub mod memory_tree;
pub mod page_control;
pub mod replay_driver;
pub mod screenshot;
pub mod search;
pub mod tree_locator;
pub mod webdriver_client;

pub use memory_tree::{CodeRef, MemoryTree, NodePatch, NodeSpec};
pub use page_control::{send_special_keys, send_tabs, tabbable_ids, wait_for_condition};
pub use replay_driver::{KeyEffect, ReplayDriver, ScriptStub, Snapshot};
pub use screenshot::save_screenshot;
pub use search::{child_names, descendants, search, SearchOutcome, Target};
pub use tree_locator::{retry_attempts, BrowserMarkers, TreeLocator};
pub use webdriver_client::WebDriverClient;
