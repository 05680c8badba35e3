//! `owlgen check`

use anyhow::Result;
use owlgen_codegen::naming::NameResolver;
use owlgen_codegen::render::{TemplateSource, template_name};
use owlgen_codegen::{EntryKind, GenerateOptions, ModelSchema, Target};
use owlgen_core::{GenerateError, OwlgenConfig, TemplateError};
use std::path::Path;

/// Counts gathered by a successful check.
#[derive(Debug, PartialEq, Eq)]
pub struct CheckSummary {
    pub structs: usize,
    pub enums: usize,
    pub max_arity: usize,
}

/// Validate the configuration, the schema and the template set without writing.
pub fn check(config: &OwlgenConfig) -> Result<CheckSummary> {
    config.validate()?;

    let schema = ModelSchema::from_file(&config.generator.schema).map_err(GenerateError::from)?;
    NameResolver::for_schema(&schema).map_err(GenerateError::from)?;

    let templates = GenerateOptions::from_config(config).template_set()?;
    for entry in schema.entries() {
        for target in Target::ALL {
            let template = template_name(entry.kind(), target);
            if !templates.contains(&template) {
                return Err(GenerateError::from(TemplateError::Missing {
                    template,
                    entry: entry.name.clone(),
                })
                .into());
            }
        }
    }

    let structs = schema
        .entries()
        .iter()
        .filter(|e| e.kind() == EntryKind::Struct)
        .count();

    Ok(CheckSummary {
        structs,
        enums: schema.len() - structs,
        max_arity: schema.max_arity(),
    })
}

/// Check command implementation
pub fn run(config: &OwlgenConfig, config_path: &Path) -> Result<()> {
    println!("Checking configuration: {}", config_path.display());

    let summary = check(config)?;
    let generator = &config.generator;

    println!("✓ Schema: {}", generator.schema.display());
    println!(
        "✓ Entries: {} ({} structs, {} enums)",
        summary.structs + summary.enums,
        summary.structs,
        summary.enums
    );
    println!("✓ Largest field set: {}", summary.max_arity);
    match GenerateOptions::from_config(config).template_set()?.source() {
        TemplateSource::Builtin => println!("✓ Templates: built-in"),
        TemplateSource::Directory(dir) => println!("✓ Templates: {}", dir.display()),
    }
    if config.stubs.exports.exists() {
        println!("✓ Export manifest: {}", config.stubs.exports.display());
    } else {
        println!("- Export manifest not built yet: {}", config.stubs.exports.display());
    }
    println!("\nConfiguration is valid!");

    Ok(())
}
