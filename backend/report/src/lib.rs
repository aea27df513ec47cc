pub mod console;
pub mod csv_report;
pub mod json_report;

pub use console::{no_match_message, render_results};
pub use csv_report::{append_scores, split_build_label, CSV_PREFIX_COLUMNS};
pub use json_report::{write_summary, RunSummary};
