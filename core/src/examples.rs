//! Example values shown next to type errors.

use indexmap::IndexMap;

use crate::text::glob_match;

/// Field-path pattern to example literal, e.g. `"root.*.include"` →
/// `r#"["src/"]"#`. Insertion order decides which glob wins.
pub type FieldExamples = IndexMap<String, String>;

/// Looks up the example for `field_path`.
///
/// An exact key wins; otherwise the first pattern containing `*` that
/// matches the whole path is used.
///
/// # Examples
///
/// ```
/// use config_conformance_core::{FieldExamples, example_for_field};
///
/// let mut examples = FieldExamples::new();
/// examples.insert("root.*.out".into(), "\"dist\"".into());
/// examples.insert("root.builds[0].out".into(), "\"build\"".into());
///
/// assert_eq!(example_for_field("root.builds[0].out", Some(&examples)), Some("\"build\""));
/// assert_eq!(example_for_field("root.builds[3].out", Some(&examples)), Some("\"dist\""));
/// assert_eq!(example_for_field("root.watch", Some(&examples)), None);
/// assert_eq!(example_for_field("root.watch", None), None);
/// ```
pub fn example_for_field<'a>(
    field_path: &str,
    examples: Option<&'a FieldExamples>,
) -> Option<&'a str> {
    let examples = examples?;

    if let Some(example) = examples.get(field_path) {
        return Some(example.as_str());
    }

    examples
        .iter()
        .find(|(pattern, _)| pattern.contains('*') && glob_match(field_path, pattern))
        .map(|(_, example)| example.as_str())
}
