//! Type mapping from schema type references to target syntax.
//!
//! Both mappings are pure and total over [`TypeRef`]. Template filters hand
//! type references over as JSON, so [`type_ref_from_value`] is the single
//! place where a filter argument can fail to be a type reference.
//!
//! # Type Mappings
//!
//! | TypeRef | Native | Stub |
//! |---------|--------|------|
//! | `Scalar("u32")` | `u32` | `int` |
//! | `Scalar("String")` | `String` | `str` |
//! | `Scalar("Foo")` | `Foo` | `Foo` / `module.Foo` |
//! | `List(T)` | `VecWrap<T>` | `typing.List[T]` |
//! | `Set(T)` | `BTreeSetWrap<T>` | `typing.Set[T]` |
//! | `Optional(T)` | `Option<T>` | `typing.Optional[T]` |
//! | `Boxed(T)` | `BoxWrap<T>` | `T` |
//! | `Tuple(A, B)` | `(A, B)` | `typing.Tuple[A, B]` |

use crate::schema::{TypeRef, WrapperKind};
use owlgen_core::MappingError;
use serde_json::Value;

/// Output target of a generation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// Rust declarations used by the binding layer
    Native,
    /// Python stub-generation input
    Stub,
}

impl Target {
    pub const ALL: [Target; 2] = [Target::Native, Target::Stub];

    /// Template name suffix for this target
    pub fn extension(&self) -> &'static str {
        match self {
            Target::Native => "rs",
            Target::Stub => "pyi",
        }
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Target::Native => write!(f, "native"),
            Target::Stub => write!(f, "stub"),
        }
    }
}

/// Scalar alias for one target
struct ScalarAlias {
    schema_name: &'static str,
    target_name: &'static str,
}

const NATIVE_ALIASES: &[ScalarAlias] = &[ScalarAlias {
    schema_name: "str",
    target_name: "String",
}];

const STUB_ALIASES: &[ScalarAlias] = &[
    ScalarAlias {
        schema_name: "u8",
        target_name: "int",
    },
    ScalarAlias {
        schema_name: "u16",
        target_name: "int",
    },
    ScalarAlias {
        schema_name: "u32",
        target_name: "int",
    },
    ScalarAlias {
        schema_name: "u64",
        target_name: "int",
    },
    ScalarAlias {
        schema_name: "usize",
        target_name: "int",
    },
    ScalarAlias {
        schema_name: "i8",
        target_name: "int",
    },
    ScalarAlias {
        schema_name: "i16",
        target_name: "int",
    },
    ScalarAlias {
        schema_name: "i32",
        target_name: "int",
    },
    ScalarAlias {
        schema_name: "i64",
        target_name: "int",
    },
    ScalarAlias {
        schema_name: "isize",
        target_name: "int",
    },
    ScalarAlias {
        schema_name: "f32",
        target_name: "float",
    },
    ScalarAlias {
        schema_name: "f64",
        target_name: "float",
    },
    ScalarAlias {
        schema_name: "bool",
        target_name: "bool",
    },
    ScalarAlias {
        schema_name: "String",
        target_name: "str",
    },
    ScalarAlias {
        schema_name: "str",
        target_name: "str",
    },
    ScalarAlias {
        schema_name: "StringWrapper",
        target_name: "str",
    },
];

fn lookup(aliases: &[ScalarAlias], name: &str) -> Option<&'static str> {
    aliases
        .iter()
        .find(|a| a.schema_name == name)
        .map(|a| a.target_name)
}

/// Map a type reference to native Rust syntax.
///
/// Lists and sets go through the boundary-safe wrapper aliases; boxes are
/// kept so that recursive entries stay representable.
pub fn native_type(ty: &TypeRef) -> String {
    match ty {
        TypeRef::Scalar(name) => lookup(NATIVE_ALIASES, name)
            .map(str::to_string)
            .unwrap_or_else(|| name.clone()),
        TypeRef::Wrapper { kind, inner } => {
            let inner = native_type(inner);
            match kind {
                WrapperKind::List => format!("VecWrap<{inner}>"),
                WrapperKind::Set => format!("BTreeSetWrap<{inner}>"),
                WrapperKind::Optional => format!("Option<{inner}>"),
                WrapperKind::Boxed => format!("BoxWrap<{inner}>"),
            }
        }
        TypeRef::Tuple(items) => {
            let items: Vec<_> = items.iter().map(native_type).collect();
            if items.len() == 1 {
                format!("({},)", items[0])
            } else {
                format!("({})", items.join(", "))
            }
        }
    }
}

/// Map a type reference to Python stub syntax.
///
/// Unaliased scalars are assumed to name other model entries and are prefixed
/// with `module` when one is given. Boxes are erased.
pub fn stub_type(ty: &TypeRef, module: Option<&str>) -> String {
    match ty {
        TypeRef::Scalar(name) => match (lookup(STUB_ALIASES, name), module) {
            (Some(alias), _) => alias.to_string(),
            (None, Some(module)) => format!("{module}.{name}"),
            (None, None) => name.clone(),
        },
        TypeRef::Wrapper { kind, inner } => {
            let inner = stub_type(inner, module);
            match kind {
                WrapperKind::List => format!("typing.List[{inner}]"),
                WrapperKind::Set => format!("typing.Set[{inner}]"),
                WrapperKind::Optional => format!("typing.Optional[{inner}]"),
                WrapperKind::Boxed => inner,
            }
        }
        TypeRef::Tuple(items) => {
            let items: Vec<_> = items.iter().map(|t| stub_type(t, module)).collect();
            format!("typing.Tuple[{}]", items.join(", "))
        }
    }
}

/// Map a type reference for the given target.
pub fn map_type(ty: &TypeRef, target: Target, module: Option<&str>) -> String {
    match target {
        Target::Native => native_type(ty),
        Target::Stub => stub_type(ty, module),
    }
}

/// Decode a type reference handed to a template filter.
///
/// Accepts the serialized [`TypeRef`] form as well as the raw schema
/// notation (bare string, array, `{type, inner}` object), so templates can
/// pass either a field's `ty` or a value copied from the document.
pub fn type_ref_from_value(value: &Value) -> Result<TypeRef, MappingError> {
    if let Ok(ty) = serde_json::from_value::<TypeRef>(value.clone()) {
        return Ok(ty);
    }

    let not_a_type_ref = || MappingError::NotATypeRef {
        value: value.to_string(),
    };

    match value {
        Value::String(name) if !name.is_empty() => Ok(TypeRef::Scalar(name.clone())),
        Value::Array(items) if !items.is_empty() => items
            .iter()
            .map(type_ref_from_value)
            .collect::<Result<Vec<_>, _>>()
            .map(TypeRef::Tuple),
        Value::Object(obj) => {
            let typ = obj
                .get("type")
                .or_else(|| obj.get("kind"))
                .and_then(Value::as_str)
                .ok_or_else(not_a_type_ref)?;

            match obj.get("inner") {
                Some(inner) => {
                    let kind = WrapperKind::parse(typ).ok_or_else(|| {
                        MappingError::UnknownWrapper {
                            kind: typ.to_string(),
                        }
                    })?;
                    Ok(TypeRef::wrap(kind, type_ref_from_value(inner)?))
                }
                None => Ok(TypeRef::Scalar(typ.to_string())),
            }
        }
        _ => Err(not_a_type_ref()),
    }
}
