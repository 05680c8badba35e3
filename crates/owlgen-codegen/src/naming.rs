//! Field naming for generated code.
//!
//! Positional fields carry no name in the schema. The [`NameResolver`] gives
//! each one an ordinal name (`first`, `second`, ...) so that every generated
//! accessor and constructor parameter has a readable identifier. A field's
//! `display_name` always wins over both its own name and its ordinal.
//!
//! | Field | `storage_name` | `public_name` |
//! |-------|----------------|---------------|
//! | named `x` | `x` | `x` |
//! | positional #1 | `1` | `second` |
//! | positional #1, `display_name: "middle"` | `1` | `middle` |

use crate::schema::{FieldSet, FieldSpec, ModelSchema};
use owlgen_core::SchemaError;

/// Ordinal vocabulary for positional fields
pub const ORDINALS: [&str; 20] = [
    "first",
    "second",
    "third",
    "fourth",
    "fifth",
    "sixth",
    "seventh",
    "eighth",
    "ninth",
    "tenth",
    "eleventh",
    "twelfth",
    "thirteenth",
    "fourteenth",
    "fifteenth",
    "sixteenth",
    "seventeenth",
    "eighteenth",
    "nineteenth",
    "twentieth",
];

const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "box", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "gen", "if", "impl", "in", "let", "loop", "match", "mod",
    "move", "mut", "pub", "ref", "return", "self", "static", "struct", "super", "trait", "true",
    "try", "type", "unsafe", "use", "where", "while", "yield",
];

/// Resolves public and storage names of fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameResolver {
    ordinals: Vec<&'static str>,
}

impl NameResolver {
    /// Build a resolver whose ordinal table covers the widest field list in
    /// the schema.
    pub fn for_schema(schema: &ModelSchema) -> Result<Self, SchemaError> {
        for entry in schema.entries() {
            for fields in entry.field_sets() {
                if fields.is_positional() && fields.len() > ORDINALS.len() {
                    return Err(SchemaError::ArityExceeded {
                        entry: entry.name.clone(),
                        arity: fields.len(),
                        max: ORDINALS.len(),
                    });
                }
            }
        }

        let arity = schema.max_arity().min(ORDINALS.len());
        Ok(Self::with_arity(arity))
    }

    /// Build a resolver with an ordinal table of the given size.
    ///
    /// The size is capped at the vocabulary length.
    pub fn with_arity(arity: usize) -> Self {
        Self {
            ordinals: ORDINALS[..arity.min(ORDINALS.len())].to_vec(),
        }
    }

    /// Number of ordinal names available.
    pub fn arity(&self) -> usize {
        self.ordinals.len()
    }

    /// Ordinal name for a position, if the table covers it.
    pub fn ordinal(&self, position: usize) -> Option<&'static str> {
        self.ordinals.get(position).copied()
    }

    /// Host-facing name: override, then field name, then ordinal.
    ///
    /// Falls back to `field_<position>` for a position beyond the table,
    /// which [`NameResolver::for_schema`] rules out for loaded schemas.
    pub fn public_name(&self, field: &FieldSpec) -> String {
        if let Some(display_name) = &field.display_name {
            return display_name.clone();
        }
        if let Some(name) = &field.name {
            return name.clone();
        }
        match self.ordinal(field.position) {
            Some(ordinal) => ordinal.to_string(),
            None => format!("field_{}", field.position),
        }
    }

    /// Public names of a field collection, in declaration order.
    pub fn resolve(&self, fields: &FieldSet) -> Vec<String> {
        fields
            .fields()
            .iter()
            .map(|f| self.public_name(f))
            .collect()
    }
}

/// Underlying representation name: the field name, or the tuple position.
pub fn storage_name(field: &FieldSpec) -> String {
    match &field.name {
        Some(name) => name.clone(),
        None => field.position.to_string(),
    }
}

/// Convert PascalCase or camelCase to snake_case.
///
/// Acronyms stay together and Rust keywords get a trailing underscore.
///
/// # Examples
///
/// ```
/// use owlgen_codegen::naming::to_snake_case;
///
/// assert_eq!(to_snake_case("ObjectSomeValuesFrom"), "object_some_values_from");
/// assert_eq!(to_snake_case("AnnotatedIRI"), "annotated_iri");
/// assert_eq!(to_snake_case("Type"), "type_");
/// ```
pub fn to_snake_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            let boundary = match prev {
                Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_uppercase() => next.is_some_and(char::is_lowercase),
                _ => false,
            };
            if boundary && !result.ends_with('_') {
                result.push('_');
            }
            result.extend(c.to_lowercase());
        } else {
            result.push(c);
        }
    }

    escape_keyword(result)
}

/// Append `_` to identifiers that are Rust keywords.
pub fn escape_keyword(ident: String) -> String {
    if RUST_KEYWORDS.contains(&ident.as_str()) {
        ident + "_"
    } else {
        ident
    }
}
