//! Checks for homogeneous lists.

use serde_json::Value;

use crate::error::Result;
use crate::label::{type_label, value_type_name};
use crate::scalar::{example_suffix, validate_scalar_value};
use crate::structure::{Scope, validate_fields};
use crate::summary::{ValidationSummary, route_message};
use crate::types::TypeDecl;

/// Checks that `value` is a list whose every element has type `element`.
///
/// Elements declared as structured types are checked recursively with the
/// context `<context>.<key>[<i>]`; other elements are checked as scalars
/// under the key `<key>[<i>]`. Every element is visited even after a
/// failure.
///
/// # Errors
///
/// Propagates [`SchemaError::MissingFields`](crate::SchemaError::MissingFields)
/// from nested structure checks.
pub fn validate_list_value(
    context: &str,
    key: &str,
    value: &Value,
    element: &TypeDecl,
    scope: &Scope<'_>,
    summary: &mut ValidationSummary,
    field_path: &str,
) -> Result<bool> {
    let Some(items) = value.as_array() else {
        let message = format!(
            "{context}: key `{key}` expected list[{}]{}, got {}",
            type_label(element),
            example_suffix(field_path, scope),
            value_type_name(value)
        );
        route_message(message, true, scope.strict, summary);
        return Ok(false);
    };

    let mut valid = true;
    for (i, item) in items.iter().enumerate() {
        let item_path = format!("{field_path}[{i}]");

        if let Some(struct_type) = element.as_struct() {
            if !item.is_object() {
                let message = format!(
                    "{context}: key `{key}` #{} expected an object with named keys for {}, got {}",
                    i + 1,
                    struct_type.name(),
                    value_type_name(item)
                );
                route_message(message, true, scope.strict, summary);
                valid = false;
                continue;
            }
            valid &= validate_fields(
                &format!("{context}.{key}[{i}]"),
                item,
                struct_type,
                scope,
                summary,
                None,
                &item_path,
            )?;
        } else {
            valid &= validate_scalar_value(
                context,
                &format!("{key}[{i}]"),
                item,
                element,
                scope,
                summary,
                &item_path,
            );
        }
    }
    Ok(valid)
}
