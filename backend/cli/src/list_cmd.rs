//! `a11yscore list`

use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;

use a11yscore_runner::{builtin_catalog, load_catalog, SearchStrategy, TestCase};

use crate::terminal_output::{note_info, render_table, Column};

pub fn run(catalog: Option<&Path>) -> Result<ExitCode> {
    let (cases, source) = match catalog {
        Some(path) => (load_catalog(path)?, path.display().to_string()),
        None => (builtin_catalog(), "built-in catalog".to_string()),
    };
    print!("{}", case_table(&cases));
    note_info(&format!("{} test cases from {source}", cases.len()));
    Ok(ExitCode::SUCCESS)
}

fn case_table(cases: &[TestCase]) -> String {
    let columns = [
        Column::left("Name"),
        Column::left("Control type"),
        Column::left("Search"),
        Column::right("Checks"),
    ];
    let rows: Vec<Vec<String>> = cases
        .iter()
        .map(|case| {
            vec![
                case.name.clone(),
                case.control_type.clone(),
                strategy_label(&case.search),
                case.checks.len().to_string(),
            ]
        })
        .collect();
    render_table(&columns, &rows)
}

fn strategy_label(search: &SearchStrategy) -> String {
    match search {
        SearchStrategy::ControlType => "control type".into(),
        SearchStrategy::Any => "any".into(),
        SearchStrategy::WithLocalizedType { localized } => format!("localized = {localized}"),
        SearchStrategy::ExcludingLocalizedType { localized } => format!("localized != {localized}"),
        SearchStrategy::SupportsPattern { pattern } => format!("supports {pattern}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_every_builtin_case() {
        let cases = builtin_catalog();
        let table = case_table(&cases);
        // Header and separator, then one line per case.
        assert_eq!(table.lines().count(), cases.len() + 2);
        assert!(table.contains("supports RangeValuePattern"));
    }
}
