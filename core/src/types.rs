//! Schema type definitions for configuration conformance checks.
//!
//! A schema is a [`Fields`] map from field name to [`TypeDecl`]. Structured
//! types ([`StructType`]) give a name to such a map so it can be nested,
//! listed and referenced from several places. Schemas are built once, usually
//! at startup, and are never mutated while a check runs.

use std::fmt;
use std::sync::{Arc, OnceLock};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, SchemaError};

/// Declared fields of a structured type, in declaration order.
pub type Fields = IndexMap<String, TypeDecl>;

/// Runtime kind of a configuration value.
///
/// # Examples
///
/// ```
/// use config_conformance_core::ValueKind;
/// use serde_json::json;
///
/// assert_eq!(ValueKind::of(&json!(3)), ValueKind::Int);
/// assert_eq!(ValueKind::of(&json!(3.5)), ValueKind::Float);
/// assert_eq!(ValueKind::of(&json!({"a": 1})).name(), "dict");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// `null` / `~`.
    Null,
    /// `true` / `false`.
    Bool,
    /// Integral number.
    Int,
    /// Non-integral number.
    Float,
    /// String.
    Str,
    /// Sequence.
    Array,
    /// Mapping with string keys.
    Object,
}

impl ValueKind {
    /// Classifies a value.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Bool,
            Value::Number(n) if n.is_f64() => Self::Float,
            Value::Number(_) => Self::Int,
            Value::String(_) => Self::Str,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }

    /// Short name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Str => "str",
            Self::Array => "list",
            Self::Object => "dict",
        }
    }
}

/// Non-container type a value can be checked against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScalarType {
    /// Accepts anything.
    Any,
    /// String.
    Str,
    /// Integral number.
    Int,
    /// Any number; integers are accepted where a float is expected.
    Float,
    /// Boolean.
    Bool,
    /// `null`.
    Null,
    /// Any mapping, contents unchecked.
    Object,
    /// Any sequence, contents unchecked.
    Array,
    /// A named type the matcher cannot look inside.
    ///
    /// Only the `base` kind is checked, through the scalar fallback path.
    Opaque {
        /// Name shown in diagnostics.
        name: String,
        /// Kind a value must have.
        base: ValueKind,
    },
}

/// Expected-type declaration for one field.
///
/// # Examples
///
/// ```
/// use config_conformance_core::{StructType, TypeDecl, type_label};
///
/// let build = StructType::builder("BuildConfig")
///     .field("include", TypeDecl::list(TypeDecl::str()))
///     .field("out", TypeDecl::str())
///     .build();
///
/// assert_eq!(type_label(&TypeDecl::list(TypeDecl::str())), "list[str]");
/// assert_eq!(type_label(&TypeDecl::optional(TypeDecl::structure(&build))), "BuildConfig");
/// ```
#[derive(Debug, Clone)]
pub enum TypeDecl {
    /// A single non-container value.
    Scalar(ScalarType),
    /// A nested structured type.
    Struct(Arc<StructType>),
    /// A homogeneous list.
    List(Box<TypeDecl>),
    /// A field that may be left out.
    Optional(Box<TypeDecl>),
    /// Any one of several declarations.
    Union(Vec<TypeDecl>),
    /// One of a fixed set of values.
    Literal(Vec<Value>),
}

impl TypeDecl {
    /// `str`
    pub fn str() -> Self {
        Self::Scalar(ScalarType::Str)
    }

    /// `int`
    pub fn int() -> Self {
        Self::Scalar(ScalarType::Int)
    }

    /// `float`
    pub fn float() -> Self {
        Self::Scalar(ScalarType::Float)
    }

    /// `bool`
    pub fn bool() -> Self {
        Self::Scalar(ScalarType::Bool)
    }

    /// `null`
    pub fn null() -> Self {
        Self::Scalar(ScalarType::Null)
    }

    /// `Any`
    pub fn any() -> Self {
        Self::Scalar(ScalarType::Any)
    }

    /// Untyped mapping.
    pub fn object() -> Self {
        Self::Scalar(ScalarType::Object)
    }

    /// Untyped sequence.
    pub fn array() -> Self {
        Self::Scalar(ScalarType::Array)
    }

    /// Homogeneous list of `element`.
    pub fn list(element: TypeDecl) -> Self {
        Self::List(Box::new(element))
    }

    /// Optional field wrapping `inner`.
    pub fn optional(inner: TypeDecl) -> Self {
        Self::Optional(Box::new(inner))
    }

    /// Reference to a structured type.
    pub fn structure(ty: &Arc<StructType>) -> Self {
        Self::Struct(Arc::clone(ty))
    }

    /// Union of `members`.
    pub fn union(members: Vec<TypeDecl>) -> Self {
        Self::Union(members)
    }

    /// One of `values`.
    pub fn literal(values: Vec<Value>) -> Self {
        Self::Literal(values)
    }

    /// Opaque named type checked only by its base kind.
    pub fn opaque(name: impl Into<String>, base: ValueKind) -> Self {
        Self::Scalar(ScalarType::Opaque {
            name: name.into(),
            base,
        })
    }

    /// Strips any number of [`Optional`](TypeDecl::Optional) wrappers.
    pub fn required_form(&self) -> &TypeDecl {
        let mut decl = self;
        while let Self::Optional(inner) = decl {
            decl = inner;
        }
        decl
    }

    /// Returns the structured type behind this declaration, if any.
    pub fn as_struct(&self) -> Option<&Arc<StructType>> {
        match self.required_form() {
            Self::Struct(ty) => Some(ty),
            _ => None,
        }
    }

    /// Kind used by the exact-kind fallback check.
    ///
    /// Declarations without a single primitive form (unions, literals,
    /// `Any`) return `None`.
    pub fn primitive_kind(&self) -> Option<ValueKind> {
        match self.required_form() {
            Self::Scalar(scalar) => match scalar {
                ScalarType::Any => None,
                ScalarType::Str => Some(ValueKind::Str),
                ScalarType::Int => Some(ValueKind::Int),
                ScalarType::Float => Some(ValueKind::Float),
                ScalarType::Bool => Some(ValueKind::Bool),
                ScalarType::Null => Some(ValueKind::Null),
                ScalarType::Object => Some(ValueKind::Object),
                ScalarType::Array => Some(ValueKind::Array),
                ScalarType::Opaque { base, .. } => Some(*base),
            },
            Self::Struct(_) => Some(ValueKind::Object),
            Self::List(_) => Some(ValueKind::Array),
            Self::Optional(_) | Self::Union(_) | Self::Literal(_) => None,
        }
    }
}

/// Named record-like type describing expected fields.
///
/// Fields may be supplied at construction or later through
/// [`define`](StructType::define), which allows forward and self
/// references. A type whose fields were never defined cannot be checked
/// against: [`schema`](StructType::schema) reports
/// [`SchemaError::MissingFields`].
///
/// Self-referencing schemas form `Arc` cycles; they are meant to be built
/// once and kept for the life of the program.
///
/// # Examples
///
/// ```
/// use config_conformance_core::{StructType, TypeDecl};
///
/// // A tree whose children are trees
/// let node = StructType::declare("Node");
/// let mut fields = config_conformance_core::Fields::new();
/// fields.insert("label".into(), TypeDecl::str());
/// fields.insert("children".into(), TypeDecl::list(TypeDecl::structure(&node)));
/// node.define(fields).unwrap();
///
/// assert_eq!(node.schema().unwrap().len(), 2);
/// assert!(node.define(Default::default()).is_err());
/// ```
pub struct StructType {
    name: String,
    fields: OnceLock<Fields>,
}

impl StructType {
    /// Creates a fully defined structured type.
    pub fn new(name: impl Into<String>, fields: Fields) -> Arc<Self> {
        let ty = Self::declare(name);
        let _ = ty.fields.set(fields);
        ty
    }

    /// Declares a structured type whose fields are supplied later.
    pub fn declare(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            fields: OnceLock::new(),
        })
    }

    /// Starts a [`StructBuilder`].
    pub fn builder(name: impl Into<String>) -> StructBuilder {
        StructBuilder {
            name: name.into(),
            fields: Fields::new(),
        }
    }

    /// Supplies the fields of a declared type.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::AlreadyDefined`] if fields were already set.
    pub fn define(&self, fields: Fields) -> Result<()> {
        self.fields
            .set(fields)
            .map_err(|_| SchemaError::AlreadyDefined {
                name: self.name.clone(),
            })
    }

    /// Type name as shown in diagnostics.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared fields, if defined.
    pub fn fields(&self) -> Option<&Fields> {
        self.fields.get()
    }

    /// Declared fields, or the invariant error used to abort a check.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::MissingFields`] for a declared-only type.
    pub fn schema(&self) -> Result<&Fields> {
        self.fields.get().ok_or_else(|| SchemaError::MissingFields {
            name: self.name.clone(),
        })
    }
}

// Field types are summarized by label so self-referencing schemas print.
impl fmt::Debug for StructType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("StructType");
        out.field("name", &self.name);
        match self.fields.get() {
            Some(fields) => out.field(
                "fields",
                &fields
                    .iter()
                    .map(|(name, decl)| (name.as_str(), crate::type_label(decl)))
                    .collect::<Vec<_>>(),
            ),
            None => out.field("fields", &"<undefined>"),
        };
        out.finish()
    }
}

/// Chained construction of a [`StructType`].
#[derive(Debug)]
pub struct StructBuilder {
    name: String,
    fields: Fields,
}

impl StructBuilder {
    /// Adds a field. Re-adding a name replaces its declaration in place.
    pub fn field(mut self, name: impl Into<String>, decl: TypeDecl) -> Self {
        self.fields.insert(name.into(), decl);
        self
    }

    /// Adds an optional field.
    pub fn optional(self, name: impl Into<String>, decl: TypeDecl) -> Self {
        self.field(name, TypeDecl::optional(decl))
    }

    /// Finishes the type.
    pub fn build(self) -> Arc<StructType> {
        StructType::new(self.name, self.fields)
    }
}
