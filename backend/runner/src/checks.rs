//! Standard checks run for every test case once its elements are found.
//!
//! Each check returns the detail lines it wants appended to the case
//! result; an empty string means the check passed.

use a11yscore_core::{codes, Element, RegistryError, UNKNOWN_NAME};

/// Joins `items` with `", "` and appends the singular or plural phrase.
///
/// Returns an empty string for an empty list.
pub fn list_message(items: &[String], singular: &str, plural: &str) -> String {
    match items.len() {
        0 => String::new(),
        1 => format!("\n{}{}", items[0], singular),
        _ => format!("\n{}{}", items.join(", "), plural),
    }
}

/// Expected-not-found and found-not-expected lines for one kind of label.
fn label_mismatch(found: &[String], required: &[String], noun: &str) -> String {
    let missing: Vec<String> = required
        .iter()
        .filter(|r| !found.contains(r))
        .cloned()
        .collect();
    let unexpected: Vec<String> = found
        .iter()
        .filter(|f| !required.contains(f))
        .cloned()
        .collect();
    let mut detail = list_message(
        &missing,
        &format!(" was expected as a {noun} but not found. "),
        &format!(" were expected as {noun}s but not found. "),
    );
    detail.push_str(&list_message(
        &unexpected,
        &format!(" was found as a {noun} but not expected. "),
        &format!(" were found as {noun}s but not expected. "),
    ));
    detail
}

pub fn localized_control_type(elements: &[Element], expected: &str) -> String {
    let mut detail = String::new();
    for element in elements {
        let actual = element.localized_control_type().unwrap_or_default();
        if !actual.eq_ignore_ascii_case(expected) {
            detail.push_str(&format!(
                "\nElement did not have the correct localized control type. Expected:{expected} Actual:{actual}"
            ));
        }
    }
    detail
}

/// Landmark type through the landmark namespace, plus the localized
/// landmark string.
pub fn landmarks(
    elements: &[Element],
    expected: &str,
    expected_localized: Option<&str>,
) -> Result<String, RegistryError> {
    let table = codes().landmarks();
    let expected = table.name_of(table.code_of(expected)?)?;
    let expected_localized = expected_localized.unwrap_or_default();

    let mut detail = String::new();
    for element in elements {
        let actual = element
            .landmark_type()
            .map(|code| table.name_or_unknown(code))
            .unwrap_or(UNKNOWN_NAME);
        if actual != expected {
            detail.push_str(&format!(
                "\nElement did not have the correct landmark type. Expected:{expected} Actual:{actual}\n"
            ));
        }
        let localized = element.localized_landmark_type().unwrap_or_default();
        if localized != expected_localized {
            detail.push_str(&format!(
                "\nElement did not have the correct localized landmark type. Expected:{expected_localized} Actual:{localized}\n"
            ));
        }
    }
    Ok(detail)
}

/// Non-empty names and full descriptions of `elements` against the required
/// lists. A missing list counts as empty.
pub fn names_and_descriptions(
    elements: &[Element],
    required_names: Option<&[String]>,
    required_descriptions: Option<&[String]>,
) -> String {
    let non_empty = |values: Vec<String>| -> Vec<String> {
        values.into_iter().filter(|v| !v.is_empty()).collect()
    };
    let names = non_empty(elements.iter().map(|e| e.name().unwrap_or_default()).collect());
    let descriptions = non_empty(
        elements
            .iter()
            .map(|e| e.full_description().unwrap_or_default())
            .collect(),
    );

    let mut detail = label_mismatch(&names, required_names.unwrap_or_default(), "name");
    detail.push_str(&label_mismatch(
        &descriptions,
        required_descriptions.unwrap_or_default(),
        "description",
    ));
    detail
}

pub fn keyboard_access(keyboard_elements: &[String], tabbable: &[String]) -> String {
    keyboard_elements
        .iter()
        .filter(|id| !tabbable.contains(id))
        .map(|id| format!("\nCould not access element with id: '{id}' by tab"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use a11yscore_browser::{MemoryTree, NodeSpec};
    use a11yscore_core::TreeProvider;

    fn elements(specs: Vec<NodeSpec>) -> (MemoryTree, Vec<Element>) {
        let tree = MemoryTree::new(&NodeSpec::new("Document").with_children(specs)).unwrap();
        let root = tree.root_element().unwrap();
        let children = tree.children(&root).unwrap();
        (tree, children)
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn list_message_phrasing() {
        assert_eq!(list_message(&[], " one", " many"), "");
        assert_eq!(list_message(&strings(&["a"]), " one", " many"), "\na one");
        assert_eq!(list_message(&strings(&["a", "b"]), " one", " many"), "\na, b many");
    }

    #[test]
    fn localized_type_is_case_insensitive() {
        let (_tree, els) = elements(vec![
            NodeSpec::new("Group").localized("Article"),
            NodeSpec::new("Group").localized("group"),
        ]);
        let detail = localized_control_type(&els, "article");
        assert_eq!(
            detail,
            "\nElement did not have the correct localized control type. Expected:article Actual:group"
        );
    }

    #[test]
    fn landmark_mismatch_reports_both_forms() {
        let (_tree, els) = elements(vec![
            NodeSpec::new("Group").landmark("Main", "main"),
            NodeSpec::new("Group").landmark("Custom", "region"),
        ]);
        let detail = landmarks(&els, "main", Some("main")).unwrap();
        assert_eq!(
            detail,
            "\nElement did not have the correct landmark type. Expected:Main Actual:Custom\n\
             \nElement did not have the correct localized landmark type. Expected:main Actual:region\n"
        );
        assert!(landmarks(&els, "Banner", None).is_err());
    }

    #[test]
    fn names_and_descriptions_mismatch() {
        let (_tree, els) = elements(vec![
            NodeSpec::new("Group").named("title attribute 1"),
            NodeSpec::new("Group").named("extra"),
            NodeSpec::new("Group"),
        ]);
        let names = strings(&["title attribute 1", "aria-label 2", "aria-label 3"]);
        let detail = names_and_descriptions(&els, Some(names.as_slice()), None);
        assert_eq!(
            detail,
            "\naria-label 2, aria-label 3 were expected as names but not found. \
             \nextra was found as a name but not expected. "
        );
    }

    #[test]
    fn missing_description_is_reported() {
        let (_tree, els) = elements(vec![NodeSpec::new("Group")]);
        let descriptions = strings(&["title attribute 7"]);
        assert_eq!(
            names_and_descriptions(&els, None, Some(descriptions.as_slice())),
            "\ntitle attribute 7 was expected as a description but not found. "
        );
    }

    #[test]
    fn keyboard_access_lists_unreachable_ids() {
        let detail = keyboard_access(&strings(&["input1", "input2"]), &strings(&["input1"]));
        assert_eq!(detail, "\nCould not access element with id: 'input2' by tab");
    }
}
