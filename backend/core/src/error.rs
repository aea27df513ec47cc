use thiserror::Error;

use crate::codes::CodeKind;

/// Lookup misses in the code registry.
///
/// These indicate a broken test definition, so callers are allowed to
/// propagate them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("unknown {kind} code: {code}")]
    UnknownCode { kind: CodeKind, code: i32 },

    #[error("no {kind} named \"{name}\"")]
    NameNotFound { kind: CodeKind, name: String },
}

/// A read against the live accessibility tree failed.
///
/// The browser mutates the tree while it is being walked, so these are
/// expected and always recoverable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("accessibility tree fault: {0}")]
    Fault(String),

    #[error("element is no longer part of the tree")]
    Stale,
}

/// Failures reported by an automation driver.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("driver session error: {0}")]
    Session(String),

    #[error("page did not reach readyState 'complete' within {timeout_secs}s")]
    PageNotReady { timeout_secs: u64 },

    #[error("no element with id '{0}'")]
    ElementNotFound(String),

    #[error("driver protocol error: {0}")]
    Protocol(String),

    #[error("driver transport error: {0}")]
    Http(String),
}

/// Scoring errors. A verdict outside pass/half/fail is a configuration error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoreError {
    #[error("invalid verdict value: {0}")]
    InvalidVerdict(String),
}

/// Top-level error type for the conformance engine.
#[derive(Debug, Error)]
pub enum ConformanceError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Driver(#[from] DriverError),

    #[error(transparent)]
    Score(#[from] ScoreError),

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
