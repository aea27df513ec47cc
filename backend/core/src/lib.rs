mod code_tables;
pub mod codes;
pub mod driver;
pub mod error;
pub mod result;
pub mod tree;
pub mod watch;

pub use codes::{codes, CodeEntry, CodeKind, CodeRegistry, CodeTable, UNKNOWN_CODE, UNKNOWN_NAME};
pub use driver::{AutomationDriver, WebDriverKey};
pub use error::{ConformanceError, DriverError, RegistryError, ScoreError, TreeError};
pub use result::{
    order_for_display, verdict_of, AggregateScore, CaseResult, CaseStage, Outcome, ResultPair, SubResult,
    Verdict,
};
pub use tree::{AccessibleElement, Element, LiveSetting, RangeValue, TreeProvider, TreeResult};
pub use watch::StructureWatch;
