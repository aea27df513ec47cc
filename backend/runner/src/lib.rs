pub mod catalog;
pub mod checkers;
pub mod checks;
pub mod runner;
pub mod test_case;

pub use catalog::{builtin_catalog, load_catalog, select};
pub use checkers::{CheckContext, CheckSpec, CheckTiming, Checker};
pub use runner::{startup_delay, BatchOutcome, ConformanceRunner, RunnerSettings};
pub use test_case::{SearchStrategy, TestCase};
