//! Template rendering.
//!
//! One template per `(entry kind, target)` pair renders each model entry,
//! and one header template per target is rendered once before them:
//!
//! | Template | Renders |
//! |----------|---------|
//! | `header.rs` / `header.pyi` | static preamble of the artifact |
//! | `struct.rs` / `struct.pyi` | one struct entry |
//! | `enum.rs` / `enum.pyi` | one enum entry |
//!
//! Templates see a single `entry` object built from the schema. Field sets
//! appear as `{shape, items}` where `shape` is `"named"` or `"positional"`
//! and each item is a serialized field (`position`, `name`, `ty`,
//! `display_name`).

use crate::filters::{self, SHAPE_NAMED, SHAPE_POSITIONAL};
use crate::naming::NameResolver;
use crate::schema::{EntryBody, EntryKind, FieldSet, FieldSpec, ModelEntry, ModelSchema};
use crate::types::Target;
use owlgen_core::{GenerateError, MappingError, TemplateError};
use serde::Serialize;
use std::collections::BTreeMap;
use std::error::Error as _;
use std::path::{Path, PathBuf};
use tera::{Context, Tera};

/// Built-in templates shipped with the crate.
mod builtin {
    pub const HEADER_RS: &str = include_str!("../templates/header.rs.tera");
    pub const STRUCT_RS: &str = include_str!("../templates/struct.rs.tera");
    pub const ENUM_RS: &str = include_str!("../templates/enum.rs.tera");
    pub const HEADER_PYI: &str = include_str!("../templates/header.pyi.tera");
    pub const STRUCT_PYI: &str = include_str!("../templates/struct.pyi.tera");
    pub const ENUM_PYI: &str = include_str!("../templates/enum.pyi.tera");
}

/// Name of the template for an entry kind and target, e.g. `enum.pyi`.
pub fn template_name(kind: EntryKind, target: Target) -> String {
    format!("{}.{}", kind.as_str(), target.extension())
}

/// Name of the header template for a target.
pub fn header_name(target: Target) -> String {
    format!("header.{}", target.extension())
}

/// Every template name a complete set provides.
pub fn known_template_names() -> Vec<String> {
    Target::ALL
        .iter()
        .flat_map(|&target| {
            [
                header_name(target),
                template_name(EntryKind::Struct, target),
                template_name(EntryKind::Enum, target),
            ]
        })
        .collect()
}

/// Where a template set came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    Builtin,
    Directory(PathBuf),
}

/// Named template sources, keyed by template name.
#[derive(Debug, Clone)]
pub struct TemplateSet {
    source: TemplateSource,
    templates: BTreeMap<String, String>,
}

impl TemplateSet {
    /// The templates embedded in this crate.
    pub fn builtin() -> Self {
        let templates = [
            ("header.rs", builtin::HEADER_RS),
            ("struct.rs", builtin::STRUCT_RS),
            ("enum.rs", builtin::ENUM_RS),
            ("header.pyi", builtin::HEADER_PYI),
            ("struct.pyi", builtin::STRUCT_PYI),
            ("enum.pyi", builtin::ENUM_PYI),
        ]
        .into_iter()
        .map(|(name, source)| (name.to_string(), source.to_string()))
        .collect();

        Self {
            source: TemplateSource::Builtin,
            templates,
        }
    }

    /// Load `<name>.tera` files from a directory.
    ///
    /// Templates absent from the directory stay absent; rendering an entry
    /// that needs one fails with [`TemplateError::Missing`].
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, TemplateError> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(TemplateError::Read {
                path: dir.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "template directory does not exist",
                ),
            });
        }

        let mut templates = BTreeMap::new();
        for name in known_template_names() {
            let path = dir.join(format!("{name}.tera"));
            if !path.exists() {
                tracing::debug!(template = %name, "template not provided by directory");
                continue;
            }
            let content = std::fs::read_to_string(&path)
                .map_err(|source| TemplateError::Read { path, source })?;
            templates.insert(name, content);
        }

        Ok(Self {
            source: TemplateSource::Directory(dir.to_path_buf()),
            templates,
        })
    }

    /// Replace or add one template.
    pub fn with_template(mut self, name: impl Into<String>, source: impl Into<String>) -> Self {
        self.templates.insert(name.into(), source.into());
        self
    }

    /// Drop one template.
    pub fn without_template(mut self, name: &str) -> Self {
        self.templates.remove(name);
        self
    }

    pub fn source(&self) -> &TemplateSource {
        &self.source
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }
}

/// Options that affect rendered output.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Namespace prefixed to model references in stub output
    pub namespace: Option<String>,
}

/// A rendered entry block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEntry {
    pub name: String,
    pub text: String,
}

#[derive(Debug, Serialize)]
struct FieldSetContext<'a> {
    shape: &'static str,
    items: &'a [FieldSpec],
}

impl<'a> FieldSetContext<'a> {
    fn new(fields: &'a FieldSet) -> Self {
        let shape = if fields.is_positional() {
            SHAPE_POSITIONAL
        } else {
            SHAPE_NAMED
        };
        Self {
            shape,
            items: fields.fields(),
        }
    }
}

#[derive(Debug, Serialize)]
struct VariantContext<'a> {
    name: &'a str,
    doc: Option<&'a str>,
    summary: Option<String>,
    fields: FieldSetContext<'a>,
    unit: bool,
}

#[derive(Debug, Serialize)]
struct EntryContext<'a> {
    name: &'a str,
    kind: &'static str,
    doc: Option<&'a str>,
    doc_lines: Vec<&'a str>,
    fields: Option<FieldSetContext<'a>>,
    variants: Vec<VariantContext<'a>>,
    unit_only: bool,
}

impl<'a> EntryContext<'a> {
    fn new(entry: &'a ModelEntry) -> Self {
        let doc = entry.doc.as_deref();
        let doc_lines = doc.map(|d| d.lines().collect()).unwrap_or_default();

        let (fields, variants) = match &entry.body {
            EntryBody::Struct(fields) => (Some(FieldSetContext::new(fields)), Vec::new()),
            EntryBody::Enum(variants) => (
                None,
                variants
                    .iter()
                    .map(|v| VariantContext {
                        name: &v.name,
                        doc: v.doc.as_deref(),
                        summary: v
                            .doc
                            .as_deref()
                            .map(|d| d.lines().map(str::trim).collect::<Vec<_>>().join(" ")),
                        fields: FieldSetContext::new(&v.fields),
                        unit: v.is_unit(),
                    })
                    .collect(),
            ),
        };
        let unit_only = matches!(&entry.body, EntryBody::Enum(vs) if vs.iter().all(|v| v.is_unit()));

        Self {
            name: &entry.name,
            kind: entry.kind().as_str(),
            doc,
            doc_lines,
            fields,
            variants,
            unit_only,
        }
    }
}

#[derive(Debug, Serialize)]
struct HeaderEntry<'a> {
    name: &'a str,
    kind: &'static str,
}

/// Renders model entries through a template set.
pub struct Renderer {
    tera: Tera,
}

impl Renderer {
    /// Compile a template set and register the filters.
    pub fn new(
        templates: &TemplateSet,
        resolver: NameResolver,
        options: &RenderOptions,
    ) -> Result<Self, TemplateError> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);

        for (name, source) in &templates.templates {
            tera.add_raw_template(name, source)
                .map_err(|e| TemplateError::Syntax {
                    template: name.clone(),
                    message: error_chain(&e),
                })?;
        }

        filters::register(&mut tera, resolver, options.namespace.clone());

        Ok(Self { tera })
    }

    /// Render a whole artifact: header, then every entry in schema order.
    pub fn render(&self, target: Target, schema: &ModelSchema) -> Result<String, GenerateError> {
        let header = self.render_header(target, schema)?;
        let entries = self.render_entries(target, schema)?;

        let mut out = String::from(header.trim_end());
        for entry in &entries {
            if !out.is_empty() {
                out.push_str("\n\n");
            }
            out.push_str(entry.text.trim_end());
        }
        out.push('\n');

        Ok(out)
    }

    /// Render the header template of a target.
    pub fn render_header(
        &self,
        target: Target,
        schema: &ModelSchema,
    ) -> Result<String, GenerateError> {
        let template = header_name(target);
        let entries: Vec<_> = schema
            .entries()
            .iter()
            .map(|e| HeaderEntry {
                name: &e.name,
                kind: e.kind().as_str(),
            })
            .collect();

        let mut context = Context::new();
        context.insert("entries", &entries);
        context.insert("target", &target.to_string());

        self.render_template(&template, "<header>", &context)
    }

    /// Render one block per entry, in schema order.
    pub fn render_entries(
        &self,
        target: Target,
        schema: &ModelSchema,
    ) -> Result<Vec<RenderedEntry>, GenerateError> {
        schema
            .entries()
            .iter()
            .map(|entry| {
                self.render_entry(target, entry).map(|text| RenderedEntry {
                    name: entry.name.clone(),
                    text,
                })
            })
            .collect()
    }

    /// Render a single entry.
    pub fn render_entry(&self, target: Target, entry: &ModelEntry) -> Result<String, GenerateError> {
        let template = template_name(entry.kind(), target);
        tracing::debug!(entry = %entry.name, template = %template, "rendering entry");

        let mut context = Context::new();
        context.insert("entry", &EntryContext::new(entry));
        context.insert("target", &target.to_string());

        self.render_template(&template, &entry.name, &context)
    }

    fn render_template(
        &self,
        template: &str,
        entry: &str,
        context: &Context,
    ) -> Result<String, GenerateError> {
        if !self.tera.get_template_names().any(|name| name == template) {
            return Err(TemplateError::Missing {
                template: template.to_string(),
                entry: entry.to_string(),
            }
            .into());
        }

        self.tera
            .render(template, context)
            .map_err(|e| match find_mapping_error(&e) {
                Some(source) => GenerateError::Mapping {
                    entry: entry.to_string(),
                    source,
                },
                None => TemplateError::Render {
                    entry: entry.to_string(),
                    template: template.to_string(),
                    message: error_chain(&e),
                }
                .into(),
            })
    }
}

fn find_mapping_error(err: &tera::Error) -> Option<MappingError> {
    let mut current = err.source();
    while let Some(source) = current {
        if let Some(mapping) = source.downcast_ref::<MappingError>() {
            return Some(mapping.clone());
        }
        current = source.source();
    }
    None
}

/// Flatten a tera error and its sources into one line.
fn error_chain(err: &tera::Error) -> String {
    let mut message = err.to_string();
    let mut current = err.source();
    while let Some(source) = current {
        message.push_str(": ");
        message.push_str(&source.to_string());
        current = source.source();
    }
    message
}
