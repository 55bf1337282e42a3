//! Runtime type matching of configuration values.
//!
//! [`type_match`] is the primitive the validators build on. It reports
//! [`TypeMatchError`] for declarations it cannot look inside; callers fall
//! back to [`kind_fallback_match`], an exact check against the declaration's
//! primitive kind.

use serde_json::Value;

use crate::error::TypeMatchError;
use crate::types::{ScalarType, TypeDecl, ValueKind};

/// Checks whether `value` has the declared type.
///
/// Structures are matched shallowly (any mapping matches); their fields are
/// the structure validator's business. Lists check every element.
///
/// # Errors
///
/// Returns [`TypeMatchError::Opaque`] when the answer depends on an opaque
/// type. Inside a union, an opaque member is checked by its base kind and
/// the error is only returned when no member matched.
///
/// # Examples
///
/// ```
/// use config_conformance_core::{TypeDecl, ValueKind, type_match};
/// use serde_json::json;
///
/// assert_eq!(type_match(&json!(2), &TypeDecl::float()), Ok(true));
/// assert_eq!(type_match(&json!(true), &TypeDecl::int()), Ok(false));
/// assert!(type_match(&json!("a"), &TypeDecl::opaque("Path", ValueKind::Str)).is_err());
/// ```
pub fn type_match(value: &Value, decl: &TypeDecl) -> Result<bool, TypeMatchError> {
    match decl {
        TypeDecl::Optional(inner) => type_match(value, inner),
        TypeDecl::Scalar(scalar) => scalar_match(value, scalar),
        TypeDecl::Struct(_) => Ok(value.is_object()),
        TypeDecl::List(element) => match value.as_array() {
            Some(items) => {
                for item in items {
                    if !type_match(item, element)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            None => Ok(false),
        },
        TypeDecl::Union(members) => {
            let mut deferred = None;
            for member in members {
                match type_match(value, member) {
                    Ok(true) => return Ok(true),
                    Ok(false) => {}
                    Err(_) if kind_fallback_match(value, member) => return Ok(true),
                    Err(err) => {
                        deferred.get_or_insert(err);
                    }
                }
            }
            deferred.map_or(Ok(false), Err)
        }
        TypeDecl::Literal(values) => Ok(values.contains(value)),
    }
}

fn scalar_match(value: &Value, scalar: &ScalarType) -> Result<bool, TypeMatchError> {
    let kind = ValueKind::of(value);
    Ok(match scalar {
        ScalarType::Any => true,
        ScalarType::Str => kind == ValueKind::Str,
        ScalarType::Int => kind == ValueKind::Int,
        ScalarType::Float => matches!(kind, ValueKind::Float | ValueKind::Int),
        ScalarType::Bool => kind == ValueKind::Bool,
        ScalarType::Null => kind == ValueKind::Null,
        ScalarType::Object => kind == ValueKind::Object,
        ScalarType::Array => kind == ValueKind::Array,
        ScalarType::Opaque { name, .. } => return Err(TypeMatchError::Opaque(name.clone())),
    })
}

/// Exact kind comparison against the declaration's primitive form.
///
/// Declarations without a primitive form never match here.
pub fn kind_fallback_match(value: &Value, decl: &TypeDecl) -> bool {
    decl.primitive_kind() == Some(ValueKind::of(value))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::StructType;

    #[test]
    fn test_scalars() {
        assert_eq!(type_match(&json!("x"), &TypeDecl::str()), Ok(true));
        assert_eq!(type_match(&json!(1), &TypeDecl::str()), Ok(false));
        assert_eq!(type_match(&json!(1.5), &TypeDecl::int()), Ok(false));
        assert_eq!(type_match(&json!(null), &TypeDecl::null()), Ok(true));
        assert_eq!(type_match(&json!([1]), &TypeDecl::any()), Ok(true));
    }

    #[test]
    fn test_float_accepts_integers() {
        assert_eq!(type_match(&json!(3), &TypeDecl::float()), Ok(true));
        assert_eq!(type_match(&json!(3.25), &TypeDecl::float()), Ok(true));
        assert_eq!(type_match(&json!("3"), &TypeDecl::float()), Ok(false));
    }

    #[test]
    fn test_structs_match_any_mapping() {
        let ty = StructType::builder("Cfg").field("a", TypeDecl::int()).build();
        let decl = TypeDecl::structure(&ty);
        assert_eq!(type_match(&json!({"other": 1}), &decl), Ok(true));
        assert_eq!(type_match(&json!([]), &decl), Ok(false));
    }

    #[test]
    fn test_lists_check_every_element() {
        let decl = TypeDecl::list(TypeDecl::int());
        assert_eq!(type_match(&json!([1, 2, 3]), &decl), Ok(true));
        assert_eq!(type_match(&json!([1, "2"]), &decl), Ok(false));
        assert_eq!(type_match(&json!("12"), &decl), Ok(false));
    }

    #[test]
    fn test_union_prefers_a_match_over_an_opaque_error() {
        let decl = TypeDecl::union(vec![
            TypeDecl::opaque("Path", ValueKind::Str),
            TypeDecl::int(),
        ]);
        assert_eq!(type_match(&json!(4), &decl), Ok(true));
        assert_eq!(
            type_match(&json!(false), &decl),
            Err(TypeMatchError::Opaque("Path".to_string()))
        );
    }

    #[test]
    fn test_union_checks_opaque_members_by_base_kind() {
        let decl = TypeDecl::union(vec![
            TypeDecl::opaque("PathLike", ValueKind::Str),
            TypeDecl::null(),
        ]);
        assert_eq!(type_match(&json!("dist"), &decl), Ok(true));
        assert_eq!(type_match(&json!(null), &decl), Ok(true));
        assert_eq!(
            type_match(&json!(3), &decl),
            Err(TypeMatchError::Opaque("PathLike".to_string()))
        );
    }

    #[test]
    fn test_bool_is_not_an_int() {
        assert_eq!(type_match(&json!(true), &TypeDecl::int()), Ok(false));
        assert_eq!(type_match(&json!(false), &TypeDecl::float()), Ok(false));
        assert_eq!(type_match(&json!(1), &TypeDecl::bool()), Ok(false));
    }

    #[test]
    fn test_literals() {
        let decl = TypeDecl::literal(vec![json!("fast"), json!("slow")]);
        assert_eq!(type_match(&json!("fast"), &decl), Ok(true));
        assert_eq!(type_match(&json!("medium"), &decl), Ok(false));
    }

    #[test]
    fn test_kind_fallback_is_exact() {
        let path = TypeDecl::opaque("Path", ValueKind::Str);
        assert!(kind_fallback_match(&json!("a/b"), &path));
        assert!(!kind_fallback_match(&json!(1), &path));
        assert!(!kind_fallback_match(&json!(1), &TypeDecl::float()));
        assert!(!kind_fallback_match(
            &json!("a"),
            &TypeDecl::union(vec![TypeDecl::str()])
        ));
    }
}
