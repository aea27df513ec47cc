//! Test case definitions.
//!
//! A [`TestCase`] names one markup feature, the page that exercises it, how
//! to find its elements and what the tree is expected to say about them.
//! Catalog files use the same camelCase shape.

use serde::{Deserialize, Serialize};

use a11yscore_browser::Target;
use a11yscore_core::{codes, RegistryError, UNKNOWN_NAME};

use crate::checkers::CheckSpec;

fn unknown_landmark() -> String {
    UNKNOWN_NAME.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    /// Also the page name: `<repositoryPath><name><fileSuffix>`.
    pub name: String,
    pub control_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub localized_control_type: Option<String>,
    #[serde(default = "unknown_landmark")]
    pub landmark_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub localized_landmark_type: Option<String>,
    /// DOM ids that must be reachable with Tab.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keyboard_elements: Vec<String>,
    #[serde(default)]
    pub search: SearchStrategy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_names: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_descriptions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub checks: Vec<CheckSpec>,
}

impl TestCase {
    pub fn new(name: &str, control_type: &str) -> Self {
        Self {
            name: name.into(),
            control_type: control_type.into(),
            localized_control_type: None,
            landmark_type: unknown_landmark(),
            localized_landmark_type: None,
            keyboard_elements: Vec::new(),
            search: SearchStrategy::default(),
            required_names: None,
            required_descriptions: None,
            checks: Vec::new(),
        }
    }

    pub fn localized(mut self, localized: &str) -> Self {
        self.localized_control_type = Some(localized.into());
        self
    }

    pub fn landmark(mut self, landmark: &str, localized: &str) -> Self {
        self.landmark_type = landmark.into();
        self.localized_landmark_type = Some(localized.into());
        self
    }

    pub fn keyboard(mut self, ids: &[&str]) -> Self {
        self.keyboard_elements = to_strings(ids);
        self
    }

    pub fn search(mut self, search: SearchStrategy) -> Self {
        self.search = search;
        self
    }

    pub fn names(mut self, names: &[&str]) -> Self {
        self.required_names = Some(to_strings(names));
        self
    }

    pub fn descriptions(mut self, descriptions: &[&str]) -> Self {
        self.required_descriptions = Some(to_strings(descriptions));
        self
    }

    pub fn check(mut self, check: CheckSpec) -> Self {
        self.checks.push(check);
        self
    }

    /// Whether elements are found by control type alone.
    pub fn uses_control_type_search(&self) -> bool {
        matches!(self.search, SearchStrategy::ControlType)
    }

    /// Resolves every code name the case refers to.
    ///
    /// A miss means the definition itself is broken.
    pub fn validate(&self) -> Result<(), RegistryError> {
        codes().control_types().code_of(&self.control_type)?;
        codes().landmarks().code_of(&self.landmark_type)?;
        Ok(())
    }

    /// Search target for this case's elements.
    pub fn target(&self) -> Result<Target, RegistryError> {
        self.search.compile(&self.control_type)
    }
}

pub(crate) fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// How a case's elements are told apart from the rest of the page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "camelCase")]
pub enum SearchStrategy {
    /// Match on the control type name.
    #[default]
    ControlType,
    /// Every node matches; the search returns the root's children.
    Any,
    /// Control type plus an exact localized control type.
    WithLocalizedType { localized: String },
    /// Control type, but not this localized control type.
    ExcludingLocalizedType { localized: String },
    /// Any node supporting the named control pattern; control type is ignored.
    SupportsPattern { pattern: String },
}

impl SearchStrategy {
    pub fn compile(&self, control_type: &str) -> Result<Target, RegistryError> {
        let target = match self {
            SearchStrategy::ControlType => {
                codes().control_types().code_of(control_type)?;
                Target::role(control_type)
            }
            SearchStrategy::Any => Target::predicate(|_| Ok(true)),
            SearchStrategy::WithLocalizedType { localized } => {
                let code = codes().control_types().code_of(control_type)?;
                let localized = localized.clone();
                Target::predicate(move |e| {
                    Ok(e.control_type()? == code && e.localized_control_type()? == localized)
                })
            }
            SearchStrategy::ExcludingLocalizedType { localized } => {
                let code = codes().control_types().code_of(control_type)?;
                let localized = localized.clone();
                Target::predicate(move |e| {
                    Ok(e.control_type()? == code && e.localized_control_type()? != localized)
                })
            }
            SearchStrategy::SupportsPattern { pattern } => {
                let pattern = pattern.clone();
                Target::predicate(move |e| Ok(e.supported_patterns()?.contains(&pattern)))
            }
        };
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_yaml_case_gets_defaults() {
        let case: TestCase = serde_yaml::from_str("name: nav\ncontrolType: Group\n").unwrap();
        assert_eq!(case.landmark_type, "Unknown");
        assert_eq!(case.search, SearchStrategy::ControlType);
        assert!(case.required_names.is_none());
        assert!(case.uses_control_type_search());
        case.validate().unwrap();
    }

    #[test]
    fn strategies_parse_from_yaml() {
        let yaml = "name: mark\ncontrolType: Text\nsearch:\n  strategy: withLocalizedType\n  localized: mark\n";
        let case: TestCase = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            case.search,
            SearchStrategy::WithLocalizedType { localized: "mark".into() }
        );
        assert!(!case.uses_control_type_search());
    }

    #[test]
    fn broken_definitions_are_rejected() {
        assert!(TestCase::new("x", "Buton").validate().is_err());
        let mut case = TestCase::new("x", "Group");
        case.landmark_type = "Banner".into();
        assert!(matches!(
            case.validate(),
            Err(RegistryError::NameNotFound { .. })
        ));
        assert!(TestCase::new("x", "Buton").target().is_err());
        assert!(TestCase::new("x", "Buton").search(SearchStrategy::Any).target().is_ok());
    }
}
