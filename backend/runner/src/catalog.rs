//! Built-in test case catalog and YAML catalog loading.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use a11yscore_core::LiveSetting;

use crate::checkers::{
    CheckSpec, ChildNames, ClearButton, ControllerForCount, DescendantCount, ElementCount,
    FeatureDetection, FormValidation, LandmarkCount, LiveSettingCheck, RangeValueCheck, ReadOnly,
    RequiredField, ValueText,
};
use crate::test_case::{to_strings, SearchStrategy, TestCase};

const CANVAS_FEATURE_SCRIPT: &str = "canvas = document.getElementById('myCanvas'); \
     isSupported = !!(canvas.getContext && canvas.getContext('2d')); \
     isSupported = isSupported && !!(canvas.getContext('2d').drawFocusIfNeeded); \
     return isSupported;";

const TRACK_FEATURE_SCRIPT: &str = "return typeof document.createElement('track').track === 'object' \
     && typeof document.createElement('video').addTextTrack === 'function';";

/// Names and descriptions shared by the sectioning elements.
const SECTIONING_NAMES: &[&str] = &[
    "aria-label attribute 3",
    "h1 referenced by aria-labelledby4",
    "title attribute 5",
    "aria-label attribute 7",
];
const SECTIONING_DESCRIPTIONS: &[&str] = &["h1 referenced by aria-describedby6", "title attribute 7"];

const INPUT_NAMES: &[&str] = &[
    "aria-label attribute2",
    "p referenced by aria-labelledby3",
    "label wrapping input 4",
    "title attribute 5",
    "label referenced by for/id attributes 7",
];
const SPACED_INPUT_NAMES: &[&str] = &[
    "aria-label attribute 2",
    "p referenced by aria-labelledby3",
    "label wrapping input 4",
    "title attribute 5",
    "label referenced by for/id attributes 7",
];
const INPUT_DESCRIPTIONS: &[&str] = &["p referenced by aria-describedby6", "title attribute 7"];

const MEDIA_CONTROLS: &[&str] = &["Play", "Time elapsed", "Seek", "Time remaining"];

fn child_names(names: Vec<&str>) -> CheckSpec {
    CheckSpec::ChildNames(ChildNames {
        names: to_strings(&names),
        strict: false,
    })
}

fn range(value: f64) -> CheckSpec {
    CheckSpec::RangeValue(RangeValueCheck {
        minimum: 0.0,
        maximum: 100.0,
        value,
        epsilon: 0.001,
    })
}

fn page_landmark(localized: &str) -> Vec<CheckSpec> {
    vec![
        CheckSpec::ElementCount(ElementCount { expected: 7 }),
        CheckSpec::LandmarkCount(LandmarkCount {
            landmark: Some("Custom".into()),
            localized: None,
            expected: 1,
        }),
        CheckSpec::LandmarkCount(LandmarkCount {
            landmark: None,
            localized: Some(localized.into()),
            expected: 1,
        }),
    ]
}

fn with_checks(mut case: TestCase, checks: Vec<CheckSpec>) -> TestCase {
    case.checks.extend(checks);
    case
}

fn input(name: &str, control_type: &str, localized: &str) -> TestCase {
    TestCase::new(name, control_type)
        .localized(localized)
        .keyboard(&["input1", "input2"])
}

fn labelled_input(name: &str, control_type: &str, localized: &str, names: &[&str]) -> TestCase {
    input(name, control_type, localized)
        .names(names)
        .descriptions(INPUT_DESCRIPTIONS)
}

/// The test cases shipped with the tool, in catalog order.
pub fn builtin_catalog() -> Vec<TestCase> {
    let audio_controls = [MEDIA_CONTROLS, &["Mute", "Volume"]].concat();
    let video_controls = [
        MEDIA_CONTROLS,
        &["Zoom in", "Show audio", "Show captioning", "Mute", "Volume", "Full screen"],
    ]
    .concat();

    vec![
        TestCase::new("article", "Group")
            .localized("article")
            .names(SECTIONING_NAMES)
            .descriptions(SECTIONING_DESCRIPTIONS),
        TestCase::new("aside", "Group")
            .localized("aside")
            .landmark("Custom", "complementary")
            .names(SECTIONING_NAMES)
            .descriptions(SECTIONING_DESCRIPTIONS),
        TestCase::new("audio", "Group")
            .localized("audio")
            .check(child_names(audio_controls)),
        TestCase::new("canvas", "Image")
            .check(CheckSpec::DescendantCount(DescendantCount {
                roles: to_strings(&["Button", "Text"]),
                expected: 3,
            }))
            .check(CheckSpec::FeatureDetection(FeatureDetection {
                setup: None,
                script: CANVAS_FEATURE_SCRIPT.into(),
                failure: "\nFailed feature detection".into(),
            })),
        TestCase::new("figure", "Group")
            .localized("figure")
            .names(&[
                "aria-label attribute 2",
                "p referenced by aria-labelledby3",
                "title attribute 4",
                "Figcaption element 5",
                "Figcaption element 7",
            ])
            .descriptions(&["p referenced by aria-describedby6", "title attribute 7"]),
        with_checks(
            TestCase::new("footer", "Group")
                .search(SearchStrategy::ExcludingLocalizedType {
                    localized: "article".into(),
                })
                .names(&[
                    "aria-label attribute 3",
                    "small referenced by aria-labelledby4",
                    "title attribute 5",
                    "aria-label attribute 7",
                ])
                .descriptions(&["small referenced by aria-describedby6", "title attribute 7"]),
            page_landmark("content information"),
        ),
        with_checks(
            TestCase::new("header", "Group")
                .search(SearchStrategy::ExcludingLocalizedType {
                    localized: "article".into(),
                })
                .names(SECTIONING_NAMES)
                .descriptions(SECTIONING_DESCRIPTIONS),
            page_landmark("banner"),
        ),
        labelled_input("input-email", "Edit", "email", INPUT_NAMES)
            .check(CheckSpec::FormValidation(FormValidation::default()))
            .check(CheckSpec::ClearButton(ClearButton::default())),
        labelled_input("input-number", "Spinner", "number", INPUT_NAMES)
            .check(CheckSpec::FormValidation(FormValidation::default())),
        labelled_input("input-search", "Edit", "search", SPACED_INPUT_NAMES)
            .check(CheckSpec::ClearButton(ClearButton::default())),
        labelled_input("input-tel", "Edit", "telephone", SPACED_INPUT_NAMES)
            .check(CheckSpec::ClearButton(ClearButton::default())),
        input("input-url", "Edit", "url")
            .check(CheckSpec::FormValidation(FormValidation::default()))
            .check(CheckSpec::ClearButton(ClearButton::default())),
        TestCase::new("main", "Group")
            .localized("main")
            .landmark("Main", "main")
            .names(&[
                "title attribute 1",
                "aria-label attribute 2",
                "h1 referenced by aria-labelledby3",
                "title attribute 4",
                "aria-label attribute 6",
            ])
            .descriptions(&["h1 referenced by aria-describedby5", "title attribute 6"]),
        TestCase::new("mark", "Text")
            .search(SearchStrategy::WithLocalizedType {
                localized: "mark".into(),
            })
            .names(&[
                "aria-label attribute2",
                "Element referenced by aria-labelledby attribute3",
                "title attribute 4",
                "aria-label attribute 6",
            ])
            .descriptions(&[
                "Element referenced by aria-describedby attribute5",
                "title attribute 6",
            ]),
        TestCase::new("meter", "Progressbar")
            .localized("meter")
            .search(SearchStrategy::SupportsPattern {
                pattern: "RangeValuePattern".into(),
            })
            .names(&[
                "aria-label attribute 2",
                "p referenced by aria-labelledby3",
                "label wrapping meter 4",
                "title attribute 5",
                "label referenced by for/id attributes 7",
            ])
            .descriptions(INPUT_DESCRIPTIONS)
            .check(CheckSpec::ReadOnly(ReadOnly::default()))
            .check(range(83.5))
            .check(CheckSpec::ValueText(ValueText {
                expected: "Good".into(),
            })),
        TestCase::new("nav", "Group")
            .localized("navigation")
            .landmark("Navigation", "navigation")
            .names(&[
                "aria-label attribute 2",
                "h1 referenced by aria-labelledby3",
                "title attribute 4",
                "aria-label attribute 6",
            ])
            .descriptions(&["h1 referenced by aria-describedby5", "title attribute 6"]),
        TestCase::new("output", "Group")
            .localized("output")
            .names(&[
                "aria-label attribute 2",
                "p referenced by aria-labelledby3",
                "label wrapping output 410",
                "title attribute 5",
                "label referenced by for/id attributes 7",
            ])
            .descriptions(INPUT_DESCRIPTIONS)
            .check(CheckSpec::LiveSetting(LiveSettingCheck {
                expected: LiveSetting::Polite,
            }))
            .check(CheckSpec::ControllerForCount(ControllerForCount { expected: 1 })),
        TestCase::new("progress", "Progressbar")
            .names(&[
                "aria-label attribute 2",
                "p referenced by aria-labelledby3",
                "label wrapping output 4",
                "title attribute 5",
                "label referenced by for/id attributes 7",
            ])
            .descriptions(INPUT_DESCRIPTIONS)
            .check(range(22.0)),
        TestCase::new("section", "Group")
            .localized("section")
            .landmark("Custom", "region")
            .names(SECTIONING_NAMES)
            .descriptions(SECTIONING_DESCRIPTIONS),
        TestCase::new("time", "Text")
            .search(SearchStrategy::WithLocalizedType {
                localized: "time".into(),
            })
            .names(&[
                "aria-label attribute2",
                "Element referenced by aria-labelledby attribute 3",
                "title attribute 4",
                "aria-label attribute 6",
            ])
            .descriptions(&[
                "2015-10-01",
                "2015-10-02",
                "2015-10-03",
                "2015-10-04",
                "Element referenced by aria-describedby attribute",
                "title attribute 6",
            ]),
        TestCase::new("track", "Unknown")
            .search(SearchStrategy::Any)
            .check(CheckSpec::FeatureDetection(FeatureDetection {
                setup: None,
                script: TRACK_FEATURE_SCRIPT.into(),
                failure: "\nElement was not found to be supported by feature detection".into(),
            })),
        TestCase::new("video", "Group")
            .keyboard(&["video1"])
            .check(child_names(video_controls)),
        TestCase::new("required-att", "Edit").check(CheckSpec::RequiredField(RequiredField {
            element_id: "input1".into(),
        })),
        TestCase::new("placeholder-att", "Edit")
            .names(&[
                "placeholder text 1",
                "Label text 2:",
                "Label text 3:",
                "placeholder text 4",
                "placeholder text 5",
                "aria-placeholder text 6",
            ])
            .descriptions(&["placeholder text 2", "placeholder text 3", "title text 4"]),
    ]
}

/// Reads a YAML list of test cases.
pub fn load_catalog(path: &Path) -> Result<Vec<TestCase>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog: {}", path.display()))?;
    let cases: Vec<TestCase> = serde_yaml::from_str(&raw)
        .with_context(|| format!("Failed to parse catalog: {}", path.display()))?;
    for case in &cases {
        case.validate()
            .with_context(|| format!("Invalid test case '{}' in {}", case.name, path.display()))?;
    }
    info!(path = %path.display(), cases = cases.len(), "Loaded test catalog");
    Ok(cases)
}

/// Cases named `name`, or all of them when no name is given.
pub fn select<'a>(cases: &'a [TestCase], name: Option<&str>) -> Vec<&'a TestCase> {
    cases
        .iter()
        .filter(|c| name.map_or(true, |n| c.name == n))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_cases_resolve_against_the_registry() {
        let catalog = builtin_catalog();
        assert_eq!(catalog.len(), 24);
        for case in &catalog {
            case.validate().unwrap();
            case.target().unwrap();
        }
        let names: std::collections::HashSet<&str> =
            catalog.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names.len(), catalog.len());
    }

    #[test]
    fn select_by_name() {
        let catalog = builtin_catalog();
        assert_eq!(select(&catalog, None).len(), catalog.len());
        let meter = select(&catalog, Some("meter"));
        assert_eq!(meter.len(), 1);
        assert_eq!(meter[0].checks.len(), 3);
        assert!(select(&catalog, Some("marquee")).is_empty());
    }

    #[test]
    fn builtin_catalog_survives_yaml() {
        let catalog = builtin_catalog();
        let yaml = serde_yaml::to_string(&catalog).unwrap();
        let parsed: Vec<TestCase> = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, catalog);
    }

    #[test]
    fn load_catalog_rejects_unknown_roles() {
        let dir = std::env::temp_dir().join(format!("a11yscore-catalog-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let good = dir.join("good.yaml");
        std::fs::write(&good, "- name: dialog\n  controlType: Window\n  keyboardElements: [close]\n").unwrap();
        let cases = load_catalog(&good).unwrap();
        assert_eq!(cases[0].keyboard_elements, ["close"]);

        let bad = dir.join("bad.yaml");
        std::fs::write(&bad, "- name: dialog\n  controlType: Popup\n").unwrap();
        let err = load_catalog(&bad).unwrap_err();
        assert!(format!("{err:#}").contains("dialog"));
        std::fs::remove_dir_all(&dir).ok();
    }
}
