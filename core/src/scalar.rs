//! Checks for single, non-container values.

use serde_json::Value;
use tracing::debug;

use crate::examples::example_for_field;
use crate::label::{type_label, value_type_name};
use crate::structure::Scope;
use crate::summary::{ValidationSummary, route_message};
use crate::typecheck::{kind_fallback_match, type_match};
use crate::types::TypeDecl;

/// Checks one value against `expected`, recording an error on mismatch.
///
/// When the matcher cannot introspect `expected` the value is compared with
/// the declaration's primitive kind instead. The error names the field path's
/// example, if one is configured:
///
/// ```text
/// in top-level configuration.: key `watch` expected float (e.g. 1.5), got str
/// ```
pub fn validate_scalar_value(
    context: &str,
    key: &str,
    value: &Value,
    expected: &TypeDecl,
    scope: &Scope<'_>,
    summary: &mut ValidationSummary,
    field_path: &str,
) -> bool {
    match type_match(value, expected) {
        Ok(true) => return true,
        Ok(false) => {}
        Err(err) => {
            debug!(key, field_path, error = %err, "type match failed, using kind fallback");
            if kind_fallback_match(value, expected) {
                return true;
            }
        }
    }

    let message = format!(
        "{context}: key `{key}` expected {}{}, got {}",
        type_label(expected),
        example_suffix(field_path, scope),
        value_type_name(value)
    );
    route_message(message, true, scope.strict, summary);
    false
}

/// `" (e.g. <example>)"` when a non-empty example exists for `field_path`.
pub(crate) fn example_suffix(field_path: &str, scope: &Scope<'_>) -> String {
    match example_for_field(field_path, scope.field_examples) {
        Some(example) if !example.is_empty() => format!(" (e.g. {example})"),
        _ => String::new(),
    }
}
