//! Recursive conformance checks of mappings against structured types.
//!
//! This module is the walk itself. It visits every declared field that is
//! present, dispatches to the list, scalar or nested-structure check, and
//! finishes each mapping with the unknown-key check. Nothing short-circuits:
//! a failing field never hides findings about its siblings.
//!
//! # Example
//!
//! ```
//! use config_conformance_core::{
//!     Fields, TOP_LEVEL_CONTEXT, TypeDecl, ValidateOptions, ValidationSummary,
//!     check_schema_conformance,
//! };
//! use serde_json::json;
//!
//! let mut fields = Fields::new();
//! fields.insert("foo".into(), TypeDecl::str());
//!
//! let mut summary = ValidationSummary::new(false);
//! let ok = check_schema_conformance(
//!     &json!({"foo": 123}),
//!     &fields,
//!     TOP_LEVEL_CONTEXT,
//!     false,
//!     &mut summary,
//!     &ValidateOptions::default(),
//! )
//! .unwrap();
//!
//! assert!(!ok);
//! assert!(summary.errors[0].contains("expected str"));
//! assert!(summary.errors[0].contains("got int"));
//! ```

use std::collections::HashSet;

use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::examples::FieldExamples;
use crate::label::{type_label, value_type_name};
use crate::list::validate_list_value;
use crate::scalar::validate_scalar_value;
use crate::summary::{ValidationSummary, route_message};
use crate::types::{Fields, StructType, TypeDecl};
use crate::unknown::check_unknown_keys;

/// Context marker for the outermost mapping of a document.
///
/// When a context contains it, nested structures are located by field name
/// alone and unknown keys by the text that follows it.
pub const TOP_LEVEL_CONTEXT: &str = "in top-level configuration.";

/// Field path used for the root of [`check_schema_conformance`].
pub const DEFAULT_BASE_PATH: &str = "root";

/// Type name given to the field map passed to [`check_schema_conformance`].
pub const ANONYMOUS_STRUCT_NAME: &str = "config";

/// Set of configuration keys.
pub type KeySet = HashSet<String>;

/// Optional inputs of a structure check.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidateOptions<'a> {
    /// Keys already reported elsewhere; skipped at every depth.
    pub prewarn: Option<&'a KeySet>,
    /// Keys skipped at the top level only.
    pub ignore_keys: Option<&'a KeySet>,
    /// Field path of the value being checked.
    pub field_path: Option<&'a str>,
    /// Examples quoted in type errors.
    pub field_examples: Option<&'a FieldExamples>,
}

/// Settings that stay fixed for a whole walk.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    /// Whether advisory findings are strict warnings.
    pub strict: bool,
    /// Keys skipped at every depth.
    pub prewarn: Option<&'a KeySet>,
    /// Examples quoted in type errors.
    pub field_examples: Option<&'a FieldExamples>,
}

impl Scope<'_> {
    pub(crate) fn is_prewarned(&self, key: &str) -> bool {
        self.prewarn.is_some_and(|keys| keys.contains(key))
    }
}

/// Checks `value` against `struct_type`, recording findings in `summary`.
///
/// Returns `Ok(false)` if anything fatal was found, or if an unknown key was
/// found in strict mode.
///
/// # Errors
///
/// Returns [`SchemaError::MissingFields`](crate::SchemaError::MissingFields)
/// when the walk reaches a structured type that was declared but never
/// defined. The whole check is abandoned in that case.
pub fn validate_structure(
    context: &str,
    value: &Value,
    struct_type: &StructType,
    strict: bool,
    summary: &mut ValidationSummary,
    options: &ValidateOptions<'_>,
) -> Result<bool> {
    let scope = Scope {
        strict,
        prewarn: options.prewarn,
        field_examples: options.field_examples,
    };
    validate_fields(
        context,
        value,
        struct_type,
        &scope,
        summary,
        options.ignore_keys,
        options.field_path.unwrap_or_default(),
    )
}

/// Checks a document against a bare field map.
///
/// The map is treated as an anonymous structured type and the field path
/// defaults to [`DEFAULT_BASE_PATH`]. The fields are copied into a fresh
/// [`StructType`] on every call; callers that already hold a `StructType`,
/// or check many documents against one map, should build it once and call
/// [`validate_structure`] directly.
///
/// # Errors
///
/// As [`validate_structure`].
pub fn check_schema_conformance(
    value: &Value,
    fields: &Fields,
    context: &str,
    strict_config: bool,
    summary: &mut ValidationSummary,
    options: &ValidateOptions<'_>,
) -> Result<bool> {
    let root = StructType::new(ANONYMOUS_STRUCT_NAME, fields.clone());
    let options = ValidateOptions {
        field_path: Some(options.field_path.unwrap_or(DEFAULT_BASE_PATH)),
        ..*options
    };
    validate_structure(context, value, &root, strict_config, summary, &options)
}

pub(crate) fn validate_fields(
    context: &str,
    value: &Value,
    struct_type: &StructType,
    scope: &Scope<'_>,
    summary: &mut ValidationSummary,
    ignore_keys: Option<&KeySet>,
    field_path: &str,
) -> Result<bool> {
    let Some(map) = value.as_object() else {
        let message = format!(
            "{context}: expected an object with named keys for {}, got {}",
            struct_type.name(),
            value_type_name(value)
        );
        route_message(message, true, scope.strict, summary);
        return Ok(false);
    };

    let fields = struct_type.schema()?;
    debug!(
        context,
        field_path,
        type_name = struct_type.name(),
        keys = map.len(),
        "checking structure"
    );

    let mut valid = true;
    for (field, decl) in fields {
        let Some(inner) = map.get(field) else {
            continue;
        };
        if scope.is_prewarned(field) || ignore_keys.is_some_and(|keys| keys.contains(field)) {
            continue;
        }

        let current_path = if field_path.is_empty() {
            field.clone()
        } else {
            format!("{field_path}.{field}")
        };

        match decl.required_form() {
            TypeDecl::List(element) => {
                valid &= validate_list_value(
                    context,
                    field,
                    inner,
                    element,
                    scope,
                    summary,
                    &current_path,
                )?;
            }
            TypeDecl::Struct(nested) => {
                let location = if context.contains(TOP_LEVEL_CONTEXT) {
                    field.clone()
                } else {
                    format!("{context}.{field}")
                };
                valid &=
                    validate_fields(&location, inner, nested, scope, summary, None, &current_path)?;
            }
            required => {
                if !validate_scalar_value(
                    context,
                    field,
                    inner,
                    required,
                    scope,
                    summary,
                    &current_path,
                ) {
                    let message = format!(
                        "{context}: key `{field}` expected {}, got {}",
                        type_label(decl),
                        value_type_name(inner)
                    );
                    route_message(message, true, scope.strict, summary);
                    valid = false;
                }
            }
        }
    }

    valid &= check_unknown_keys(context, map, fields, scope, summary);
    Ok(valid)
}
