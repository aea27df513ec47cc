//! Bidirectional mapping between platform codes and canonical names.
//!
//! This is the only bridge between human-readable expectations ("Button",
//! "Main") and the integer codes the accessibility platform returns. Nothing
//! else in the workspace hard-codes those integers.

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::code_tables::{CONTROL_TYPES, LANDMARKS, PROPERTIES};
use crate::error::RegistryError;

/// Code returned by the platform when it has no value to report.
pub const UNKNOWN_CODE: i32 = -1;

/// Name every namespace uses for [`UNKNOWN_CODE`].
pub const UNKNOWN_NAME: &str = "Unknown";

static REGISTRY: Lazy<CodeRegistry> = Lazy::new(CodeRegistry::new);

/// The process-wide registry, populated on first use.
pub fn codes() -> &'static CodeRegistry {
    &REGISTRY
}

/// The three disjoint code namespaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CodeKind {
    ControlType,
    Property,
    Landmark,
}

impl fmt::Display for CodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodeKind::ControlType => write!(f, "control type"),
            CodeKind::Property => write!(f, "property"),
            CodeKind::Landmark => write!(f, "landmark"),
        }
    }
}

/// One `(code, name)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeEntry {
    pub code: i32,
    pub name: &'static str,
}

/// A single namespace of the registry.
#[derive(Debug)]
pub struct CodeTable {
    kind: CodeKind,
    entries: Vec<CodeEntry>,
    by_code: HashMap<i32, usize>,
}

impl CodeTable {
    fn from_static(kind: CodeKind, table: &'static [(i32, &'static str)]) -> Self {
        let entries: Vec<CodeEntry> = table
            .iter()
            .map(|&(code, name)| CodeEntry { code, name })
            .collect();
        let by_code = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| (entry.code, index))
            .collect();
        Self { kind, entries, by_code }
    }

    pub fn kind(&self) -> CodeKind {
        self.kind
    }

    /// Canonical name for `code`.
    pub fn name_of(&self, code: i32) -> Result<&'static str, RegistryError> {
        self.by_code
            .get(&code)
            .map(|&index| self.entries[index].name)
            .ok_or(RegistryError::UnknownCode { kind: self.kind, code })
    }

    /// Code of the first entry whose name matches `name`, ignoring case.
    pub fn code_of(&self, name: &str) -> Result<i32, RegistryError> {
        self.entries
            .iter()
            .find(|entry| entry.name.eq_ignore_ascii_case(name))
            .map(|entry| entry.code)
            .ok_or_else(|| RegistryError::NameNotFound {
                kind: self.kind,
                name: name.to_string(),
            })
    }

    /// Like [`CodeTable::name_of`] but reports unmapped codes as `Unknown`.
    ///
    /// Used for diagnostics on codes read from a live tree, where a newer
    /// platform may return values this table predates.
    pub fn name_or_unknown(&self, code: i32) -> &'static str {
        self.name_of(code).unwrap_or(UNKNOWN_NAME)
    }

    pub fn entries(&self) -> &[CodeEntry] {
        &self.entries
    }
}

/// Control type, property and landmark tables.
#[derive(Debug)]
pub struct CodeRegistry {
    control_types: CodeTable,
    properties: CodeTable,
    landmarks: CodeTable,
}

impl CodeRegistry {
    fn new() -> Self {
        Self {
            control_types: CodeTable::from_static(CodeKind::ControlType, CONTROL_TYPES),
            properties: CodeTable::from_static(CodeKind::Property, PROPERTIES),
            landmarks: CodeTable::from_static(CodeKind::Landmark, LANDMARKS),
        }
    }

    pub fn table(&self, kind: CodeKind) -> &CodeTable {
        match kind {
            CodeKind::ControlType => &self.control_types,
            CodeKind::Property => &self.properties,
            CodeKind::Landmark => &self.landmarks,
        }
    }

    pub fn control_types(&self) -> &CodeTable {
        &self.control_types
    }

    pub fn properties(&self) -> &CodeTable {
        &self.properties
    }

    pub fn landmarks(&self) -> &CodeTable {
        &self.landmarks
    }

    /// Finds the namespace a code belongs to by its numeric range.
    pub fn kind_of(&self, code: i32) -> Option<CodeKind> {
        if code == UNKNOWN_CODE {
            return None;
        }
        [CodeKind::ControlType, CodeKind::Property, CodeKind::Landmark]
            .into_iter()
            .find(|&kind| self.table(kind).name_of(code).is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_every_code_in_every_namespace() {
        for kind in [CodeKind::ControlType, CodeKind::Property, CodeKind::Landmark] {
            let table = codes().table(kind);
            for entry in table.entries() {
                let name = table.name_of(entry.code).unwrap();
                assert_eq!(table.code_of(name).unwrap(), entry.code, "{kind} {name}");
            }
        }
    }

    #[test]
    fn code_of_ignores_case() {
        assert_eq!(codes().control_types().code_of("button").unwrap(), 50000);
        assert_eq!(codes().control_types().code_of("PROGRESSBAR").unwrap(), 50012);
        assert_eq!(codes().landmarks().code_of("main").unwrap(), 80002);
    }

    #[test]
    fn absent_code_is_unknown_code() {
        let err = codes().control_types().name_of(49999).unwrap_err();
        assert_eq!(
            err,
            RegistryError::UnknownCode { kind: CodeKind::ControlType, code: 49999 }
        );
        assert_eq!(codes().control_types().name_or_unknown(49999), "Unknown");
    }

    #[test]
    fn absent_name_is_name_not_found() {
        let err = codes().landmarks().code_of("banner").unwrap_err();
        assert!(matches!(err, RegistryError::NameNotFound { kind: CodeKind::Landmark, .. }));
    }

    #[test]
    fn shared_names_resolve_within_their_namespace() {
        assert_eq!(codes().control_types().code_of("Custom").unwrap(), 50025);
        assert_eq!(codes().landmarks().code_of("Custom").unwrap(), 80000);
        assert_eq!(codes().properties().code_of("HasKeyboardFocus").unwrap(), 30008);
    }

    #[test]
    fn kind_of_uses_numeric_range() {
        assert_eq!(codes().kind_of(50026), Some(CodeKind::ControlType));
        assert_eq!(codes().kind_of(30104), Some(CodeKind::Property));
        assert_eq!(codes().kind_of(80003), Some(CodeKind::Landmark));
        assert_eq!(codes().kind_of(-1), None);
        assert_eq!(codes().kind_of(12), None);
    }
}
