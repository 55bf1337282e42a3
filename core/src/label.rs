//! Human-readable names for type declarations and runtime values.

use serde_json::Value;

use crate::types::{ScalarType, TypeDecl, ValueKind};

/// Renders a declaration for diagnostics (e.g. `list[str]`, `BuildConfig`).
///
/// Optional wrappers are unwrapped: an optional field is labelled by the
/// type it holds.
///
/// # Examples
///
/// ```
/// use config_conformance_core::{TypeDecl, type_label};
/// use serde_json::json;
///
/// assert_eq!(type_label(&TypeDecl::optional(TypeDecl::int())), "int");
/// assert_eq!(type_label(&TypeDecl::list(TypeDecl::any())), "list[Any]");
/// assert_eq!(
///     type_label(&TypeDecl::union(vec![TypeDecl::str(), TypeDecl::null()])),
///     "str | null"
/// );
/// assert_eq!(
///     type_label(&TypeDecl::literal(vec![json!("fast"), json!(3)])),
///     r#"Literal["fast", 3]"#
/// );
/// ```
pub fn type_label(decl: &TypeDecl) -> String {
    match decl {
        TypeDecl::Optional(inner) => type_label(inner),
        TypeDecl::List(element) => format!("list[{}]", type_label(element)),
        TypeDecl::Struct(ty) => ty.name().to_string(),
        TypeDecl::Scalar(scalar) => scalar_label(scalar).to_string(),
        TypeDecl::Union(members) => members
            .iter()
            .map(type_label)
            .collect::<Vec<_>>()
            .join(" | "),
        TypeDecl::Literal(values) => format!(
            "Literal[{}]",
            values
                .iter()
                .map(Value::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        ),
    }
}

fn scalar_label(scalar: &ScalarType) -> &str {
    match scalar {
        ScalarType::Any => "Any",
        ScalarType::Str => ValueKind::Str.name(),
        ScalarType::Int => ValueKind::Int.name(),
        ScalarType::Float => ValueKind::Float.name(),
        ScalarType::Bool => ValueKind::Bool.name(),
        ScalarType::Null => ValueKind::Null.name(),
        ScalarType::Object => ValueKind::Object.name(),
        ScalarType::Array => ValueKind::Array.name(),
        ScalarType::Opaque { name, .. } => name,
    }
}

/// Name of a value's runtime kind (`str`, `int`, `dict`, ...).
pub fn value_type_name(value: &Value) -> &'static str {
    ValueKind::of(value).name()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::StructType;

    #[test]
    fn test_basic_labels() {
        assert_eq!(type_label(&TypeDecl::str()), "str");
        assert_eq!(type_label(&TypeDecl::object()), "dict");
        assert_eq!(type_label(&TypeDecl::list(TypeDecl::str())), "list[str]");
    }

    #[test]
    fn test_struct_label_uses_type_name() {
        let build = StructType::builder("MiniBuild")
            .field("out", TypeDecl::str())
            .build();
        assert_eq!(type_label(&TypeDecl::structure(&build)), "MiniBuild");
        assert_eq!(
            type_label(&TypeDecl::list(TypeDecl::structure(&build))),
            "list[MiniBuild]"
        );
    }

    #[test]
    fn test_optional_never_leaks_into_label() {
        let decl = TypeDecl::optional(TypeDecl::list(TypeDecl::optional(TypeDecl::str())));
        let label = type_label(&decl);
        assert_eq!(label, "list[str]");
        assert!(!label.to_lowercase().contains("optional"));
    }

    #[test]
    fn test_opaque_label_is_its_name() {
        assert_eq!(
            type_label(&TypeDecl::opaque("PathLike", crate::ValueKind::Str)),
            "PathLike"
        );
    }

    #[test]
    fn test_value_type_names() {
        assert_eq!(value_type_name(&json!("x")), "str");
        assert_eq!(value_type_name(&json!(1)), "int");
        assert_eq!(value_type_name(&json!(true)), "bool");
        assert_eq!(value_type_name(&json!({})), "dict");
    }
}
