//! Structured logging for a11yscore.
//!
//! Console output, rolling NDJSON file output, and per-case stage events.

pub mod event_logger;
pub mod logger;

pub use event_logger::{ConformanceEvent, EventLogEntry, EventLogger};
pub use logger::init_logger;
