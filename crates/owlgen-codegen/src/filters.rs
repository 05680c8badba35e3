//! Template filters and tests.
//!
//! Every filter reads only the value it is applied to. Field sets reach
//! templates as `{shape, items}` objects, so a template that needs to branch
//! on the shape does it explicitly with the `positional` test.
//!
//! | Name | Kind | Input | Output |
//! |------|------|-------|--------|
//! | `fields` | filter | field set, JSON object or JSON array | `[{key, value}]` |
//! | `storage_name` | filter | field | name or position |
//! | `public_name` | filter | field | override, name or ordinal |
//! | `native_type` | filter | type reference | Rust type |
//! | `stub_type(module=...)` | filter | type reference | Python annotation |
//! | `snake_case` | filter | string | snake_case identifier |
//! | `rust_ident` | filter | string | identifier with Rust keywords escaped |
//! | `positional` | test | field set or field | bool |

use crate::naming::{self, NameResolver};
use crate::schema::FieldSpec;
use crate::types;
use serde_json::{Map, Value, json};
use std::collections::HashMap;
use tera::{Filter, Tera};

pub const SHAPE_NAMED: &str = "named";
pub const SHAPE_POSITIONAL: &str = "positional";

/// Register all filters and tests on a template engine.
pub fn register(tera: &mut Tera, resolver: NameResolver, namespace: Option<String>) {
    tera.register_filter("fields", fields);
    tera.register_filter("storage_name", storage_name);
    tera.register_filter("public_name", PublicName { resolver });
    tera.register_filter("native_type", native_type);
    tera.register_filter("stub_type", StubType { namespace });
    tera.register_filter("snake_case", snake_case);
    tera.register_filter("rust_ident", rust_ident);
    tera.register_tester("positional", positional);
}

/// Normalize a field collection into ordered `{key, value}` pairs.
pub fn fields(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let pairs: Vec<Value> = match value {
        Value::Null => Vec::new(),
        Value::Object(obj) if obj.contains_key("shape") => {
            let items = obj
                .get("items")
                .and_then(Value::as_array)
                .ok_or_else(|| tera::Error::msg("field set has no 'items' list"))?;
            items
                .iter()
                .map(|item| {
                    let field = decode_field(item)?;
                    Ok(json!({"key": naming::storage_name(&field), "value": item}))
                })
                .collect::<tera::Result<_>>()?
        }
        Value::Object(obj) => obj
            .iter()
            .map(|(key, value)| json!({"key": key, "value": value}))
            .collect(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, value)| json!({"key": index.to_string(), "value": value}))
            .collect(),
        other => {
            return Err(tera::Error::msg(format!(
                "`fields` expects a field collection, got {other}"
            )));
        }
    };

    Ok(Value::Array(pairs))
}

/// Storage name of a field.
pub fn storage_name(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let field = decode_field(value)?;
    Ok(Value::String(naming::storage_name(&field)))
}

/// Public name of a field, backed by the schema's ordinal table.
pub struct PublicName {
    resolver: NameResolver,
}

impl Filter for PublicName {
    fn filter(&self, value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
        let field = decode_field(value)?;
        Ok(Value::String(self.resolver.public_name(&field)))
    }
}

/// Native type of a type reference.
pub fn native_type(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let ty = types::type_ref_from_value(value)
        .map_err(|e| tera::Error::chain("not a mappable type reference", e))?;
    Ok(Value::String(types::native_type(&ty)))
}

/// Stub annotation of a type reference.
///
/// Model references are prefixed with the run's namespace, or with the
/// `module` argument when one is given.
pub struct StubType {
    namespace: Option<String>,
}

impl Filter for StubType {
    fn filter(&self, value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
        let ty = types::type_ref_from_value(value)
            .map_err(|e| tera::Error::chain("not a mappable type reference", e))?;

        let module = match args.get("module") {
            Some(Value::String(module)) if module.is_empty() => None,
            Some(Value::String(module)) => Some(module.as_str()),
            Some(Value::Null) => None,
            Some(other) => {
                return Err(tera::Error::msg(format!(
                    "`stub_type` module must be a string, got {other}"
                )));
            }
            None => self.namespace.as_deref(),
        };

        Ok(Value::String(types::stub_type(&ty, module)))
    }
}

/// snake_case form of an identifier.
pub fn snake_case(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let s = value
        .as_str()
        .ok_or_else(|| tera::Error::msg(format!("`snake_case` expects a string, got {value}")))?;
    Ok(Value::String(naming::to_snake_case(s)))
}

/// Identifier usable as a Rust binding: keywords get a trailing `_`.
pub fn rust_ident(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let s = value
        .as_str()
        .ok_or_else(|| tera::Error::msg(format!("`rust_ident` expects a string, got {value}")))?;
    Ok(Value::String(naming::escape_keyword(s.to_string())))
}

/// True for positional field sets and positional fields.
pub fn positional(value: Option<&Value>, _args: &[Value]) -> tera::Result<bool> {
    let Some(value) = value else {
        return Err(tera::Error::msg("`positional` test applied to an undefined value"));
    };

    Ok(match value {
        Value::Object(obj) => match obj.get("shape") {
            Some(shape) => shape.as_str() == Some(SHAPE_POSITIONAL),
            None => is_unnamed_field(obj),
        },
        Value::Array(_) => true,
        _ => false,
    })
}

fn is_unnamed_field(obj: &Map<String, Value>) -> bool {
    obj.contains_key("position") && obj.get("name").is_none_or(Value::is_null)
}

fn decode_field(value: &Value) -> tera::Result<FieldSpec> {
    serde_json::from_value(value.clone())
        .map_err(|e| tera::Error::chain(format!("value {value} is not a field"), e))
}
