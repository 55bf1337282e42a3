//! Schema conformance checks for nested configuration data.
//!
//! This crate checks configuration documents (JSON-like values) against a
//! declarative schema of named structured types, and reports *every* problem
//! in one pass instead of stopping at the first:
//!
//! - [`check_schema_conformance`] / [`validate_structure`] walk a document,
//!   recording type errors and unknown keys in a [`ValidationSummary`].
//! - [`warn_keys_once`] and [`flush_aggregator`] report classes of keys
//!   (deprecated spellings, ignored options) once per class, listing every
//!   place they occurred.
//! - [`SchemaDocument`] describes a schema as serde data; [`StructType`] and
//!   [`TypeDecl`] build one in code.
//!
//! Findings are split into errors, strict warnings and warnings. Advisory
//! findings become strict warnings, and fail the check, when a run is
//! strict.
//!
//! # Example
//!
//! ```
//! use config_conformance_core::*;
//! use serde_json::json;
//!
//! let build = StructType::builder("BuildConfig")
//!     .optional("include", TypeDecl::list(TypeDecl::str()))
//!     .optional("output", TypeDecl::str())
//!     .build();
//!
//! let mut summary = ValidationSummary::new(false);
//! let ok = validate_structure(
//!     TOP_LEVEL_CONTEXT,
//!     &json!({"include": ["src", 3], "outpt": "dist"}),
//!     &build,
//!     false,
//!     &mut summary,
//!     &ValidateOptions::default(),
//! )
//! .unwrap();
//!
//! assert!(!ok);
//! assert_eq!(summary.errors.len(), 1);
//! assert!(summary.warnings[0].contains("'outpt' → 'output'"));
//! ```

mod aggregate;
mod document;
mod error;
mod examples;
mod label;
mod list;
mod scalar;
mod structure;
mod summary;
mod text;
mod typecheck;
mod types;
mod unknown;

pub use aggregate::{
    AggregateSeverity, AggregatorEntry, ErrorAggregator, KeyWarning, flush_aggregator,
    render_template, warn_keys_once,
};
pub use document::{CompiledSchema, CompositeSpec, SchemaDocument, TypeSpec};
pub use error::{Result, SchemaError, TypeMatchError};
pub use examples::{FieldExamples, example_for_field};
pub use label::{type_label, value_type_name};
pub use list::validate_list_value;
pub use scalar::validate_scalar_value;
pub use structure::{
    ANONYMOUS_STRUCT_NAME, DEFAULT_BASE_PATH, KeySet, Scope, TOP_LEVEL_CONTEXT, ValidateOptions,
    check_schema_conformance, validate_structure,
};
pub use summary::{ValidationSummary, route_message};
pub use text::{DEFAULT_HINT_CUTOFF, closest_matches, glob_match, plural_suffix};
pub use typecheck::{kind_fallback_match, type_match};
pub use types::*;
pub use unknown::check_unknown_keys;
