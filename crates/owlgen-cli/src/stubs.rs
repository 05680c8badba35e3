//! `owlgen stubs`

use anyhow::{Context, Result};
use owlgen_codegen::render::RenderOptions;
use owlgen_codegen::{GenerateOptions, ModelSchema, stub_hooks};
use owlgen_core::{GenerateError, OwlgenConfig};
use owlgen_stubs::{ExportRegistry, ExportedModule, ModuleStyle, StubExtractor, StubOptions};
use std::path::{Path, PathBuf};

/// Command-line values that replace `[stubs]` settings.
#[derive(Debug, Default)]
pub struct Overrides {
    pub exports: Option<PathBuf>,
    pub out: Option<PathBuf>,
    pub package: Option<String>,
    pub native_module: Option<String>,
}

pub fn apply_overrides(config: &mut OwlgenConfig, overrides: Overrides) {
    let stubs = &mut config.stubs;

    if let Some(exports) = overrides.exports {
        stubs.exports = exports;
    }
    if let Some(out) = overrides.out {
        stubs.output_dir = out;
    }
    match (overrides.package, overrides.native_module) {
        (Some(package), None) => {
            // The extension module is usually named after its package.
            stubs.native_module = package.clone();
            stubs.package = package;
        }
        (package, native_module) => {
            if let Some(package) = package {
                stubs.package = package;
            }
            if let Some(native_module) = native_module {
                stubs.native_module = native_module;
            }
        }
    }
}

pub fn run(config: &OwlgenConfig, schema: Option<&Path>) -> Result<()> {
    config.validate()?;
    let section = &config.stubs;

    println!("Reading export manifest: {}", section.exports.display());
    let mut registry = ExportRegistry::from_file(&section.exports)?;

    if let Some(schema) = schema {
        let attached = attach_schema_hooks(&mut registry, schema, config)?;
        println!("✓ Stub hooks attached: {attached}");
    }

    let options = StubOptions::from_config(section);
    let report = StubExtractor::new(options.clone())
        .extract(&registry.root)
        .with_context(|| format!("Failed to write stub package {}", options.package_dir().display()))?;

    if report.cleared > 0 {
        println!("✓ Cleared {} stale file(s)", report.cleared);
    }
    for path in &report.files {
        println!("✓ Wrote {}", path.display());
    }
    for degraded in &report.degraded {
        println!("! Untyped placeholder: {degraded}");
    }

    Ok(())
}

/// Render the schema's stub blocks and attach them to every hooked module.
fn attach_schema_hooks(
    registry: &mut ExportRegistry,
    schema: &Path,
    config: &OwlgenConfig,
) -> Result<usize> {
    let model = ModelSchema::from_file(schema).map_err(GenerateError::from)?;
    let templates = GenerateOptions::from_config(config).template_set()?;

    // Hooks are declared inside the model module, so references stay unqualified.
    let hooks = stub_hooks(&model, &templates, &RenderOptions::default())?;

    let mut attached = 0;
    for path in hooked_modules(&registry.root) {
        let pairs = hooks.iter().map(|h| (h.name.as_str(), h.text.as_str()));
        attached += registry.attach_stub_hooks(&path, pairs)?;
    }
    tracing::debug!(hooks = hooks.len(), attached, "schema stub hooks attached");

    Ok(attached)
}

/// Dotted paths of hooked modules below `root`; the root itself is `""`.
fn hooked_modules(root: &ExportedModule) -> Vec<String> {
    fn walk(module: &ExportedModule, path: String, out: &mut Vec<String>) {
        if module.style == ModuleStyle::Hooked {
            out.push(path.clone());
        }
        for child in &module.submodules {
            let child_path = if path.is_empty() {
                child.name.clone()
            } else {
                format!("{path}.{}", child.name)
            };
            walk(child, child_path, out);
        }
    }

    let mut out = Vec::new();
    walk(root, String::new(), &mut out);
    out
}
