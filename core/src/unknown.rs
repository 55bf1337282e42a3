//! Detection of undeclared keys.

use serde_json::{Map, Value};

use crate::structure::{Scope, TOP_LEVEL_CONTEXT};
use crate::summary::{ValidationSummary, route_message};
use crate::text::{DEFAULT_HINT_CUTOFF, closest_matches, plural_suffix};
use crate::types::Fields;

/// Reports keys of `map` that `fields` does not declare.
///
/// Keys in the scope's prewarn set are left alone. All unknown keys of one
/// mapping become a single advisory finding, with a "did you mean" line for
/// those that resemble a declared key:
///
/// ```text
/// Unknown key `outpt` in top-level configuration.
/// Hint: did you mean 'outpt' → 'output'?
/// ```
///
/// Returns `false` only in strict mode when something was reported.
pub fn check_unknown_keys(
    context: &str,
    map: &Map<String, Value>,
    fields: &Fields,
    scope: &Scope<'_>,
    summary: &mut ValidationSummary,
) -> bool {
    let unknown: Vec<&str> = map
        .keys()
        .map(String::as_str)
        .filter(|key| !fields.contains_key(*key) && !scope.is_prewarned(key))
        .collect();

    if unknown.is_empty() {
        return true;
    }

    let joined = unknown
        .iter()
        .map(|key| format!("`{key}`"))
        .collect::<Vec<_>>()
        .join(", ");
    let location = match context.rsplit_once(TOP_LEVEL_CONTEXT) {
        Some((_, tail)) => format!("in {tail}"),
        None => context.to_string(),
    };
    let mut message = format!(
        "Unknown key{} {joined} {location}.",
        plural_suffix(unknown.len())
    );

    let hints: Vec<String> = unknown
        .iter()
        .filter_map(|key| {
            closest_matches(key, fields.keys().map(String::as_str), 1, DEFAULT_HINT_CUTOFF)
                .into_iter()
                .next()
                .map(|close| format!("'{key}' → '{close}'"))
        })
        .collect();
    if !hints.is_empty() {
        message.push_str("\nHint: did you mean ");
        message.push_str(&hints.join(", "));
        message.push('?');
    }

    route_message(message.trim(), false, scope.strict, summary);
    !scope.strict
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{KeySet, TypeDecl};

    fn fields(names: &[&str]) -> Fields {
        names
            .iter()
            .map(|name| (name.to_string(), TypeDecl::any()))
            .collect()
    }

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    fn scope(strict: bool, prewarn: Option<&KeySet>) -> Scope<'_> {
        Scope {
            strict,
            prewarn,
            field_examples: None,
        }
    }

    #[test]
    fn test_declared_keys_pass() {
        let mut summary = ValidationSummary::new(true);
        let map = object(json!({"output": "dist"}));
        assert!(check_unknown_keys(
            "ctx",
            &map,
            &fields(&["output"]),
            &scope(true, None),
            &mut summary
        ));
        assert!(!summary.has_findings());
    }

    #[test]
    fn test_top_level_location_and_hint() {
        let mut summary = ValidationSummary::new(false);
        let map = object(json!({"outpt": "dist"}));
        assert!(check_unknown_keys(
            TOP_LEVEL_CONTEXT,
            &map,
            &fields(&["output", "include"]),
            &scope(false, None),
            &mut summary
        ));
        assert_eq!(
            summary.warnings,
            vec!["Unknown key `outpt` in .\nHint: did you mean 'outpt' → 'output'?"]
        );
    }

    #[test]
    fn test_text_after_marker_becomes_location() {
        let mut summary = ValidationSummary::new(false);
        let map = object(json!({"x": 1, "y": 2}));
        check_unknown_keys(
            "config.json in top-level configuration.builds[0]",
            &map,
            &fields(&["name"]),
            &scope(false, None),
            &mut summary,
        );
        assert_eq!(summary.warnings, vec!["Unknown keys `x`, `y` in builds[0]."]);
    }

    #[test]
    fn test_nested_context_is_used_verbatim() {
        let mut summary = ValidationSummary::new(true);
        let map = object(json!({"zzz": 1}));
        assert!(!check_unknown_keys(
            "build.options",
            &map,
            &fields(&["name"]),
            &scope(true, None),
            &mut summary
        ));
        assert_eq!(summary.strict_warnings, vec!["Unknown key `zzz` build.options."]);
    }

    #[test]
    fn test_prewarned_keys_are_skipped() {
        let prewarn: KeySet = ["legacy".to_string()].into_iter().collect();
        let mut summary = ValidationSummary::new(true);
        let map = object(json!({"legacy": true}));
        assert!(check_unknown_keys(
            "ctx",
            &map,
            &fields(&["name"]),
            &scope(true, Some(&prewarn)),
            &mut summary
        ));
        assert!(!summary.has_findings());
    }

    #[test]
    fn test_keys_reported_in_document_order() {
        let mut summary = ValidationSummary::new(false);
        let map = object(json!({"b": 1, "name": "n", "a": 2}));
        check_unknown_keys(
            "ctx",
            &map,
            &fields(&["name"]),
            &scope(false, None),
            &mut summary,
        );
        assert!(summary.warnings[0].starts_with("Unknown keys `b`, `a` ctx"));
    }
}
