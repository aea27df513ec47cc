//! `a11yscore codes`

use std::process::ExitCode;

use anyhow::Result;

use a11yscore_core::{codes, CodeKind};

use crate::terminal_output::{note_warn, render_table, Column};

const KINDS: [CodeKind; 3] = [CodeKind::ControlType, CodeKind::Property, CodeKind::Landmark];

pub fn run(query: &str, kind: Option<CodeKind>) -> Result<ExitCode> {
    let rows = lookup(query, kind);
    if rows.is_empty() {
        note_warn(&format!("No code or name matches '{query}'"));
        return Ok(ExitCode::FAILURE);
    }
    let columns = [Column::left("Kind"), Column::right("Code"), Column::left("Name")];
    print!("{}", render_table(&columns, &rows));
    Ok(ExitCode::SUCCESS)
}

/// One row per namespace the query resolves in. A name can live in several
/// namespaces; a code belongs to exactly one, except the shared unknown code.
fn lookup(query: &str, kind: Option<CodeKind>) -> Vec<Vec<String>> {
    let registry = codes();
    let kinds: Vec<CodeKind> = match kind {
        Some(kind) => vec![kind],
        None => KINDS.to_vec(),
    };
    kinds
        .into_iter()
        .filter_map(|kind| {
            let table = registry.table(kind);
            let (code, name) = match query.trim().parse::<i32>() {
                Ok(code) => (code, table.name_of(code).ok()?),
                Err(_) => {
                    let code = table.code_of(query.trim()).ok()?;
                    (code, table.name_of(code).ok()?)
                }
            };
            Some(vec![kind.to_string(), code.to_string(), name.to_string()])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_lookup_across_namespaces() {
        let rows = lookup("Custom", None);
        let kinds: Vec<&str> = rows.iter().map(|r| r[0].as_str()).collect();
        assert!(kinds.contains(&"landmark"));
        assert!(rows.iter().any(|r| r[1] == "80000"));
    }

    #[test]
    fn code_lookup() {
        assert_eq!(
            lookup("50000", None),
            vec![vec!["control type".to_string(), "50000".to_string(), "Button".to_string()]]
        );
        assert!(lookup("50000", Some(CodeKind::Landmark)).is_empty());
    }

    #[test]
    fn unknown_query_matches_nothing() {
        assert!(lookup("NotARole", None).is_empty());
    }
}
