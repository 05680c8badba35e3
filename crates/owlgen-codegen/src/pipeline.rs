//! The `generate` run: schema in, two artifacts out.
//!
//! Everything that can fail on content (schema, templates, type mapping,
//! verification) happens before the first write. Only I/O errors can occur
//! once writing starts.

use crate::emit::OutputEmitter;
use crate::naming::NameResolver;
use crate::render::{RenderOptions, RenderedEntry, Renderer, TemplateSet};
use crate::schema::{EntryBody, ModelEntry, ModelSchema};
use crate::types::Target;
use owlgen_core::{GenerateError, GenerateResult, OwlgenConfig};
use std::path::PathBuf;

/// Inputs and outputs of one generation run.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub schema: PathBuf,
    /// Template directory; built-in templates when `None`
    pub templates: Option<PathBuf>,
    pub native_output: PathBuf,
    pub stub_output: PathBuf,
    pub namespace: Option<String>,
    /// Parse the native artifact as Rust before writing anything
    pub verify: bool,
}

impl GenerateOptions {
    pub fn from_config(config: &OwlgenConfig) -> Self {
        let generator = &config.generator;
        Self {
            schema: generator.schema.clone(),
            templates: generator.templates.clone(),
            native_output: generator.native_output.clone(),
            stub_output: generator.stub_output.clone(),
            namespace: generator.namespace.clone(),
            verify: generator.verify,
        }
    }

    /// Configured templates, or the built-in set.
    pub fn template_set(&self) -> GenerateResult<TemplateSet> {
        match &self.templates {
            Some(dir) => Ok(TemplateSet::from_dir(dir)?),
            None => Ok(TemplateSet::builtin()),
        }
    }
}

/// Both rendered artifacts of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    pub native: String,
    pub stub: String,
}

impl Artifacts {
    pub fn get(&self, target: Target) -> &str {
        match target {
            Target::Native => &self.native,
            Target::Stub => &self.stub,
        }
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct GenerateSummary {
    pub entries: usize,
    pub written: Vec<PathBuf>,
}

/// Render both artifacts in memory.
pub fn build_artifacts(
    schema: &ModelSchema,
    templates: &TemplateSet,
    options: &RenderOptions,
) -> GenerateResult<Artifacts> {
    let resolver = NameResolver::for_schema(schema)?;
    let renderer = Renderer::new(templates, resolver, options)?;

    Ok(Artifacts {
        native: renderer.render(Target::Native, schema)?,
        stub: renderer.render(Target::Stub, schema)?,
    })
}

/// Render one stub block per class the binding exports.
///
/// Structs and unit-only enums export a class under the entry name. Any
/// other enum exports one class per variant, so its blocks are keyed by
/// variant name and leave out the union alias. The stub extractor attaches
/// these to the binding's model classes.
pub fn stub_hooks(
    schema: &ModelSchema,
    templates: &TemplateSet,
    options: &RenderOptions,
) -> GenerateResult<Vec<RenderedEntry>> {
    let resolver = NameResolver::for_schema(schema)?;
    let renderer = Renderer::new(templates, resolver, options)?;

    let mut hooks = Vec::with_capacity(schema.len());
    for entry in schema.entries() {
        match &entry.body {
            EntryBody::Enum(variants) if !variants.iter().all(|v| v.is_unit()) => {
                for variant in variants {
                    let class = ModelEntry {
                        name: variant.name.clone(),
                        doc: variant.doc.clone(),
                        body: EntryBody::Struct(variant.fields.clone()),
                    };
                    let text = renderer.render_entry(Target::Stub, &class)?;
                    hooks.push(RenderedEntry { name: class.name, text });
                }
            }
            _ => {
                let text = renderer.render_entry(Target::Stub, entry)?;
                hooks.push(RenderedEntry {
                    name: entry.name.clone(),
                    text,
                });
            }
        }
    }

    Ok(hooks)
}

/// Check that a native artifact parses as a Rust source file.
pub fn verify_native(source: &str) -> GenerateResult<()> {
    syn::parse_file(source).map_err(|e| GenerateError::Verify {
        message: e.to_string(),
    })?;
    Ok(())
}

/// Load the schema, render both targets, then write both artifacts.
pub fn generate(options: &GenerateOptions) -> GenerateResult<GenerateSummary> {
    let schema = ModelSchema::from_file(&options.schema)?;
    let templates = options.template_set()?;
    tracing::debug!(source = ?templates.source(), "using templates");

    let render_options = RenderOptions {
        namespace: options.namespace.clone(),
    };
    let artifacts = build_artifacts(&schema, &templates, &render_options)?;

    if options.verify {
        verify_native(&artifacts.native)?;
        tracing::debug!("native artifact parses");
    }

    let mut emitter = OutputEmitter::new();
    emitter.stage(&options.native_output, artifacts.native);
    emitter.stage(&options.stub_output, artifacts.stub);
    let written = emitter.commit()?;

    tracing::info!(entries = schema.len(), "generation complete");

    Ok(GenerateSummary {
        entries: schema.len(),
        written,
    })
}
