//! Model schema: the declarative description that drives generation.
//!
//! A schema document is a JSON list of model entries. Each entry is a struct
//! with a field collection or an enum with variants. Field collections are
//! either *named* (a JSON object, order preserved) or *positional* (a JSON
//! array whose fields have no names).
//!
//! # Document Shape
//!
//! ```json
//! [
//!   {"name": "Point", "kind": "struct", "fields": {"x": "u32", "y": "u32"}},
//!   {"name": "Pair", "kind": "struct", "fields": ["u32", {"type": "String", "display_name": "label"}]},
//!   {"name": "Shape", "kind": "enum", "variants": {
//!       "Empty": {"doc": "Nothing at all"},
//!       "Circle": {"fields": [{"type": "Box", "inner": "Point"}, "u32"]}
//!   }}
//! ]
//! ```
//!
//! # Type References
//!
//! - a string is a scalar (`"u32"`, `"IRI"`)
//! - an array is a tuple (`["u32", "String"]`)
//! - an object with `type` and `inner` is a wrapper (`Vec`, `Option`, `BTreeSet`, `Box`)
//! - an object with `type` but no `inner` is a scalar
//!
//! The loader is the only place where schema invariants are checked: every
//! wrapper owns an inner type, entry names are unique, and every entry has a
//! kind.

use owlgen_core::SchemaError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::path::Path;

/// Discriminant of a model entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Struct,
    Enum,
}

impl EntryKind {
    /// Name used in documents and template names.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Struct => "struct",
            EntryKind::Enum => "enum",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "struct" => Some(EntryKind::Struct),
            "enum" => Some(EntryKind::Enum),
            _ => None,
        }
    }
}

/// Type constructor wrapping an inner type reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WrapperKind {
    List,
    Optional,
    Set,
    Boxed,
}

impl WrapperKind {
    /// Parse a wrapper kind as written in schema documents.
    ///
    /// Both the Rust collection names (`Vec`, `Option`, `BTreeSet`, `Box`) and
    /// the abstract names (`List`, `Optional`, `Set`, `Boxed`) are accepted.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "Vec" | "List" | "list" => Some(WrapperKind::List),
            "Option" | "Optional" | "optional" => Some(WrapperKind::Optional),
            "BTreeSet" | "Set" | "set" => Some(WrapperKind::Set),
            "Box" | "Boxed" | "boxed" => Some(WrapperKind::Boxed),
            _ => None,
        }
    }
}

/// Recursive type reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeRef {
    /// Named type: a primitive or another model entry.
    Scalar(String),

    /// Wrapper around an inner type.
    Wrapper {
        kind: WrapperKind,
        inner: Box<TypeRef>,
    },

    /// Fixed-arity tuple.
    Tuple(Vec<TypeRef>),
}

impl TypeRef {
    pub fn scalar(name: impl Into<String>) -> Self {
        TypeRef::Scalar(name.into())
    }

    pub fn wrap(kind: WrapperKind, inner: TypeRef) -> Self {
        TypeRef::Wrapper {
            kind,
            inner: Box::new(inner),
        }
    }

    pub fn list(inner: TypeRef) -> Self {
        Self::wrap(WrapperKind::List, inner)
    }

    pub fn optional(inner: TypeRef) -> Self {
        Self::wrap(WrapperKind::Optional, inner)
    }

    pub fn set(inner: TypeRef) -> Self {
        Self::wrap(WrapperKind::Set, inner)
    }

    pub fn boxed(inner: TypeRef) -> Self {
        Self::wrap(WrapperKind::Boxed, inner)
    }
}

/// A field of a struct or variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Ordinal position in the field collection.
    pub position: usize,

    /// Field name; `None` for positional fields.
    pub name: Option<String>,

    /// Field type.
    pub ty: TypeRef,

    /// Host-facing name overriding the field name or ordinal.
    pub display_name: Option<String>,
}

impl FieldSpec {
    pub fn is_positional(&self) -> bool {
        self.name.is_none()
    }
}

/// Ordered field collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSet {
    /// Fields declared as a JSON object.
    Named(Vec<FieldSpec>),

    /// Fields declared as a JSON array.
    Positional(Vec<FieldSpec>),
}

impl FieldSet {
    pub fn fields(&self) -> &[FieldSpec] {
        match self {
            FieldSet::Named(fields) | FieldSet::Positional(fields) => fields,
        }
    }

    pub fn is_positional(&self) -> bool {
        matches!(self, FieldSet::Positional(_))
    }

    pub fn len(&self) -> usize {
        self.fields().len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields().is_empty()
    }
}

/// Enum variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantSpec {
    pub name: String,
    pub doc: Option<String>,
    pub fields: FieldSet,
}

impl VariantSpec {
    /// Variant without fields.
    pub fn is_unit(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Struct fields or enum variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryBody {
    Struct(FieldSet),
    Enum(Vec<VariantSpec>),
}

/// One struct or enum definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelEntry {
    pub name: String,
    pub doc: Option<String>,
    pub body: EntryBody,
}

impl ModelEntry {
    pub fn kind(&self) -> EntryKind {
        match self.body {
            EntryBody::Struct(_) => EntryKind::Struct,
            EntryBody::Enum(_) => EntryKind::Enum,
        }
    }

    /// Every field collection of the entry, in declaration order.
    pub fn field_sets(&self) -> Vec<&FieldSet> {
        match &self.body {
            EntryBody::Struct(fields) => vec![fields],
            EntryBody::Enum(variants) => variants.iter().map(|v| &v.fields).collect(),
        }
    }
}

/// Ordered sequence of model entries with unique names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSchema {
    entries: Vec<ModelEntry>,
}

impl ModelSchema {
    /// Load a schema document from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| SchemaError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let schema = Self::from_json(&content)?;
        tracing::debug!(path = %path.display(), entries = schema.len(), "loaded schema");
        Ok(schema)
    }

    /// Parse a schema document from JSON text.
    pub fn from_json(content: &str) -> Result<Self, SchemaError> {
        let value: Value = serde_json::from_str(content)?;
        Self::from_value(&value)
    }

    /// Build a schema from an already parsed document.
    pub fn from_value(value: &Value) -> Result<Self, SchemaError> {
        let items = value.as_array().ok_or(SchemaError::NotAList)?;

        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(items.len());

        for (index, item) in items.iter().enumerate() {
            let entry = parse_entry(index, item)?;
            if !seen.insert(entry.name.clone()) {
                return Err(SchemaError::DuplicateEntry { entry: entry.name });
            }
            entries.push(entry);
        }

        Ok(Self { entries })
    }

    /// Build a schema from entries, enforcing unique names.
    pub fn from_entries(entries: Vec<ModelEntry>) -> Result<Self, SchemaError> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.name.as_str()) {
                return Err(SchemaError::DuplicateEntry {
                    entry: entry.name.clone(),
                });
            }
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[ModelEntry] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&ModelEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Largest field-list arity of any struct or variant.
    pub fn max_arity(&self) -> usize {
        self.entries
            .iter()
            .flat_map(|e| e.field_sets())
            .map(FieldSet::len)
            .max()
            .unwrap_or(0)
    }
}

impl std::str::FromStr for ModelSchema {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_json(s)
    }
}

fn parse_entry(index: usize, value: &Value) -> Result<ModelEntry, SchemaError> {
    let obj = value
        .as_object()
        .ok_or(SchemaError::MissingName { index })?;

    let name = match obj.get("name").and_then(Value::as_str) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => return Err(SchemaError::MissingName { index }),
    };

    let kind = obj
        .get("kind")
        .or_else(|| obj.get("type"))
        .and_then(Value::as_str)
        .ok_or_else(|| SchemaError::MissingKind {
            entry: name.clone(),
        })?;
    let kind = EntryKind::parse(kind).ok_or_else(|| SchemaError::UnknownKind {
        entry: name.clone(),
        kind: kind.to_string(),
    })?;

    let doc = string_key(obj, "doc");

    let body = match kind {
        EntryKind::Struct => {
            let fields = obj.get("fields").ok_or_else(|| SchemaError::MissingBody {
                entry: name.clone(),
                key: "fields",
            })?;
            EntryBody::Struct(parse_field_set(&name, None, fields)?)
        }
        EntryKind::Enum => {
            let variants = obj.get("variants").ok_or_else(|| SchemaError::MissingBody {
                entry: name.clone(),
                key: "variants",
            })?;
            EntryBody::Enum(parse_variants(&name, variants)?)
        }
    };

    Ok(ModelEntry { name, doc, body })
}

fn parse_variants(entry: &str, value: &Value) -> Result<Vec<VariantSpec>, SchemaError> {
    let mut variants = Vec::new();

    match value {
        Value::Object(map) => {
            for (name, spec) in map {
                variants.push(parse_variant(entry, name, spec)?);
            }
        }
        Value::Array(items) => {
            for item in items {
                let name = item
                    .get("name")
                    .and_then(Value::as_str)
                    .ok_or_else(|| SchemaError::MalformedType {
                        entry: entry.to_string(),
                        field: "variants".to_string(),
                        value: item.to_string(),
                    })?;
                variants.push(parse_variant(entry, name, item)?);
            }
        }
        other => {
            return Err(SchemaError::MalformedType {
                entry: entry.to_string(),
                field: "variants".to_string(),
                value: other.to_string(),
            });
        }
    }

    let mut seen = HashSet::new();
    for variant in &variants {
        if !seen.insert(variant.name.as_str()) {
            return Err(SchemaError::DuplicateEntry {
                entry: format!("{entry}.{}", variant.name),
            });
        }
    }

    Ok(variants)
}

fn parse_variant(entry: &str, name: &str, value: &Value) -> Result<VariantSpec, SchemaError> {
    let (doc, fields) = match value {
        Value::Null => (None, FieldSet::Named(Vec::new())),
        Value::Object(obj) => {
            let fields = match obj.get("fields") {
                Some(fields) => parse_field_set(entry, Some(name), fields)?,
                None => FieldSet::Named(Vec::new()),
            };
            (string_key(obj, "doc"), fields)
        }
        other => {
            return Err(SchemaError::MalformedType {
                entry: entry.to_string(),
                field: name.to_string(),
                value: other.to_string(),
            });
        }
    };

    Ok(VariantSpec {
        name: name.to_string(),
        doc,
        fields,
    })
}

fn parse_field_set(entry: &str, owner: Option<&str>, value: &Value) -> Result<FieldSet, SchemaError> {
    let label = |field: &str| match owner {
        Some(owner) => format!("{owner}.{field}"),
        None => field.to_string(),
    };

    match value {
        Value::Null => Ok(FieldSet::Named(Vec::new())),
        Value::Object(map) => map
            .iter()
            .enumerate()
            .map(|(position, (name, spec))| {
                parse_field(entry, &label(name), position, Some(name.clone()), spec)
            })
            .collect::<Result<Vec<_>, _>>()
            .map(FieldSet::Named),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(position, spec)| {
                parse_field(entry, &label(&position.to_string()), position, None, spec)
            })
            .collect::<Result<Vec<_>, _>>()
            .map(FieldSet::Positional),
        other => Err(SchemaError::MalformedType {
            entry: entry.to_string(),
            field: label("fields"),
            value: other.to_string(),
        }),
    }
}

fn parse_field(
    entry: &str,
    field: &str,
    position: usize,
    name: Option<String>,
    value: &Value,
) -> Result<FieldSpec, SchemaError> {
    let display_name = value
        .as_object()
        .and_then(|obj| string_key(obj, "display_name").or_else(|| string_key(obj, "py_name")));

    Ok(FieldSpec {
        position,
        name,
        ty: parse_type_ref(entry, field, value)?,
        display_name,
    })
}

/// Parse a type reference as written in a schema document.
pub fn parse_type_ref(entry: &str, field: &str, value: &Value) -> Result<TypeRef, SchemaError> {
    let malformed = || SchemaError::MalformedType {
        entry: entry.to_string(),
        field: field.to_string(),
        value: value.to_string(),
    };

    match value {
        Value::String(name) if !name.is_empty() => Ok(TypeRef::Scalar(name.clone())),
        Value::Array(items) if !items.is_empty() => items
            .iter()
            .map(|item| parse_type_ref(entry, field, item))
            .collect::<Result<Vec<_>, _>>()
            .map(TypeRef::Tuple),
        Value::Object(obj) => {
            let typ = obj
                .get("type")
                .and_then(Value::as_str)
                .filter(|t| !t.is_empty())
                .ok_or_else(malformed)?;

            match obj.get("inner") {
                Some(inner) => {
                    let kind =
                        WrapperKind::parse(typ).ok_or_else(|| SchemaError::UnknownWrapper {
                            entry: entry.to_string(),
                            field: field.to_string(),
                            kind: typ.to_string(),
                        })?;
                    Ok(TypeRef::wrap(kind, parse_type_ref(entry, field, inner)?))
                }
                None => Ok(TypeRef::Scalar(typ.to_string())),
            }
        }
        _ => Err(malformed()),
    }
}

fn string_key(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
