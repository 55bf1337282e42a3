//! Error types for schema construction and conformance checks.
//!
//! Validation *findings* are never errors: they are collected into a
//! [`ValidationSummary`](crate::ValidationSummary). The types here cover the
//! remaining failure modes, which signal a problem with the schema itself
//! rather than with the data being checked.

use thiserror::Error;

/// Schema construction and invariant errors.
///
/// Each variant describes a programming or schema-authoring problem. The
/// `Display` impl provides a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A structured type was declared but its fields were never defined.
    ///
    /// Raised when a conformance check reaches such a type; it aborts the
    /// whole check instead of being recorded as a finding.
    #[error("internal schema invariant violated: `{name}` has no field declarations")]
    MissingFields {
        /// Name of the structured type.
        name: String,
    },
    /// [`StructType::define`](crate::StructType::define) was called twice.
    #[error("structured type `{name}` is already defined")]
    AlreadyDefined {
        /// Name of the structured type.
        name: String,
    },
    /// A schema description references a type name that is not declared.
    #[error("unknown type `{name}` referenced by `{owner}.{field}`")]
    UnknownType {
        /// The unresolved type name.
        name: String,
        /// Structured type that owns the field.
        owner: String,
        /// Field whose declaration references the name.
        field: String,
    },
    /// A schema description names a root type it does not declare.
    #[error("root type `{0}` is not declared")]
    UnknownRoot(String),
}

/// Returned by [`type_match`](crate::type_match) for declarations it cannot
/// introspect.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeMatchError {
    /// Opaque types carry no checkable structure beyond their base kind.
    #[error("cannot introspect opaque type `{0}`")]
    Opaque(String),
}

/// Convenience alias for results with [`SchemaError`].
pub type Result<T> = std::result::Result<T, SchemaError>;
