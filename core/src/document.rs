//! Serializable schema descriptions.
//!
//! A [`SchemaDocument`] describes a set of named structured types as plain
//! data, so schemas can live in JSON or YAML files next to the configuration
//! they govern:
//!
//! ```yaml
//! root: Project
//! types:
//!   Project:
//!     name: str
//!     builds: { list: Build }
//!   Build:
//!     out: { optional: str }
//!     include: { list: str }
//!     mode: { literal: [fast, slow] }
//! examples:
//!   root.builds*include: '["src/"]'
//! deprecated:
//!   - tag: dry-run
//!     keys: [dry_run]
//!     message: "Ignored config key(s) {keys} {ctx}."
//! ```
//!
//! [`SchemaDocument::compile`] turns the description into [`StructType`]s.
//! Types may reference each other, and themselves, in any order.

use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::aggregate::KeyWarning;
use crate::error::{Result, SchemaError};
use crate::examples::FieldExamples;
use crate::types::{Fields, StructType, TypeDecl, ValueKind};

/// A schema as data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaDocument {
    /// Name of the type documents are checked against.
    pub root: String,
    /// Structured types by name, each a map of field name to type.
    #[serde(default)]
    pub types: IndexMap<String, IndexMap<String, TypeSpec>>,
    /// Field-path examples quoted in type errors.
    #[serde(default)]
    pub examples: FieldExamples,
    /// Keys reported once per tag instead of as unknown keys.
    #[serde(default)]
    pub deprecated: Vec<KeyWarning>,
}

/// Type of one field in a [`SchemaDocument`].
///
/// Either a type name (`"str"`, `"int"`, `"float"`, `"bool"`, `"null"`,
/// `"Any"`, `"dict"`, `"list"` or a declared type) or a single-key map
/// naming a composite form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeSpec {
    /// Scalar or declared type name.
    Name(String),
    /// Composite form.
    Composite(CompositeSpec),
}

/// Composite forms of [`TypeSpec`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositeSpec {
    /// `{ list: <spec> }`
    List(Box<TypeSpec>),
    /// `{ optional: <spec> }`
    Optional(Box<TypeSpec>),
    /// `{ union: [<spec>, ...] }`
    Union(Vec<TypeSpec>),
    /// `{ literal: [<value>, ...] }`
    Literal(Vec<Value>),
    /// `{ opaque: { name: <name>, base: <kind> } }`
    Opaque {
        /// Name shown in diagnostics.
        name: String,
        /// Kind a value must have.
        base: ValueKind,
    },
}

/// A [`SchemaDocument`] resolved into checkable types.
#[derive(Debug, Clone)]
pub struct CompiledSchema {
    /// Type documents are checked against.
    pub root: Arc<StructType>,
    /// Every declared type, in declaration order.
    pub types: IndexMap<String, Arc<StructType>>,
    /// Field-path examples.
    pub examples: FieldExamples,
    /// Once-per-tag key rules.
    pub deprecated: Vec<KeyWarning>,
}

impl SchemaDocument {
    /// Resolves every type reference.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownRoot`] if `root` is not declared and
    /// [`SchemaError::UnknownType`] for a field referencing an undeclared
    /// name.
    pub fn compile(&self) -> Result<CompiledSchema> {
        let types: IndexMap<String, Arc<StructType>> = self
            .types
            .keys()
            .map(|name| (name.clone(), StructType::declare(name.as_str())))
            .collect();

        let root = types
            .get(&self.root)
            .cloned()
            .ok_or_else(|| SchemaError::UnknownRoot(self.root.clone()))?;

        for (owner, specs) in &self.types {
            let mut fields = Fields::new();
            for (field, spec) in specs {
                let decl = resolve(spec, &types, owner, field)?;
                fields.insert(field.clone(), decl);
            }
            if let Some(ty) = types.get(owner) {
                ty.define(fields)?;
            }
        }

        debug!(root = %self.root, types = types.len(), "compiled schema document");

        Ok(CompiledSchema {
            root,
            types,
            examples: self.examples.clone(),
            deprecated: self.deprecated.clone(),
        })
    }
}

fn resolve(
    spec: &TypeSpec,
    types: &IndexMap<String, Arc<StructType>>,
    owner: &str,
    field: &str,
) -> Result<TypeDecl> {
    match spec {
        TypeSpec::Name(name) => {
            if let Some(decl) = scalar_by_name(name) {
                return Ok(decl);
            }
            types
                .get(name)
                .map(TypeDecl::structure)
                .ok_or_else(|| SchemaError::UnknownType {
                    name: name.clone(),
                    owner: owner.to_string(),
                    field: field.to_string(),
                })
        }
        TypeSpec::Composite(composite) => match composite {
            CompositeSpec::List(inner) => Ok(TypeDecl::list(resolve(inner, types, owner, field)?)),
            CompositeSpec::Optional(inner) => {
                Ok(TypeDecl::optional(resolve(inner, types, owner, field)?))
            }
            CompositeSpec::Union(members) => members
                .iter()
                .map(|member| resolve(member, types, owner, field))
                .collect::<Result<Vec<_>>>()
                .map(TypeDecl::union),
            CompositeSpec::Literal(values) => Ok(TypeDecl::literal(values.clone())),
            CompositeSpec::Opaque { name, base } => Ok(TypeDecl::opaque(name.as_str(), *base)),
        },
    }
}

fn scalar_by_name(name: &str) -> Option<TypeDecl> {
    Some(match name {
        "str" => TypeDecl::str(),
        "int" => TypeDecl::int(),
        "float" => TypeDecl::float(),
        "bool" => TypeDecl::bool(),
        "null" => TypeDecl::null(),
        "Any" | "any" => TypeDecl::any(),
        "dict" => TypeDecl::object(),
        "list" => TypeDecl::array(),
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::type_label;

    const PROJECT: &str = r#"
root: Project
types:
  Project:
    name: str
    builds: { list: Build }
    tree: { optional: Node }
  Build:
    out: { optional: str }
    include: { list: str }
    mode: { literal: [fast, slow] }
    path: { opaque: { name: PathLike, base: str } }
    retries: { union: [int, "null"] }
  Node:
    children: { list: Node }
examples:
  root.builds*include: '["src/"]'
deprecated:
  - tag: dry-run
    keys: [dry_run]
    message: "Ignored config key(s) {keys} {ctx}."
"#;

    fn labels(ty: &StructType) -> Vec<(String, String)> {
        ty.schema()
            .unwrap()
            .iter()
            .map(|(name, decl)| (name.clone(), type_label(decl)))
            .collect()
    }

    #[test]
    fn test_compile_yaml_document() {
        let doc: SchemaDocument = serde_yaml::from_str(PROJECT).unwrap();
        let compiled = doc.compile().unwrap();

        assert_eq!(compiled.root.name(), "Project");
        assert_eq!(
            compiled.types.keys().collect::<Vec<_>>(),
            vec!["Project", "Build", "Node"]
        );
        assert_eq!(
            labels(&compiled.root),
            vec![
                ("name".to_string(), "str".to_string()),
                ("builds".to_string(), "list[Build]".to_string()),
                ("tree".to_string(), "Node".to_string()),
            ]
        );
        assert_eq!(
            labels(&compiled.types["Build"])[2..],
            [
                ("mode".to_string(), r#"Literal["fast", "slow"]"#.to_string()),
                ("path".to_string(), "PathLike".to_string()),
                ("retries".to_string(), "int | null".to_string()),
            ]
        );
        assert_eq!(compiled.examples.len(), 1);
        assert_eq!(compiled.deprecated[0].tag, "dry-run");
    }

    #[test]
    fn test_self_reference_resolves() {
        let doc: SchemaDocument = serde_yaml::from_str(PROJECT).unwrap();
        let compiled = doc.compile().unwrap();
        let node = &compiled.types["Node"];
        let children = &node.schema().unwrap()["children"];
        let TypeDecl::List(element) = children else {
            panic!("children should be a list");
        };
        assert!(Arc::ptr_eq(element.as_struct().unwrap(), node));
    }

    #[test]
    fn test_unknown_type_is_reported_with_location() {
        let doc: SchemaDocument = serde_json::from_value(serde_json::json!({
            "root": "Cfg",
            "types": {"Cfg": {"items": {"list": "Missing"}}}
        }))
        .unwrap();
        assert_eq!(
            doc.compile().unwrap_err(),
            SchemaError::UnknownType {
                name: "Missing".to_string(),
                owner: "Cfg".to_string(),
                field: "items".to_string(),
            }
        );
    }

    #[test]
    fn test_unknown_root() {
        let doc: SchemaDocument = serde_json::from_value(serde_json::json!({
            "root": "Nope",
            "types": {"Cfg": {}}
        }))
        .unwrap();
        assert_eq!(
            doc.compile().unwrap_err(),
            SchemaError::UnknownRoot("Nope".to_string())
        );
    }

    #[test]
    fn test_unknown_document_fields_are_rejected() {
        let result: std::result::Result<SchemaDocument, _> =
            serde_json::from_value(serde_json::json!({"root": "Cfg", "typos": {}}));
        assert!(result.is_err());
    }
}
