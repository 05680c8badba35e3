//! `owlgen generate`

use anyhow::Result;
use owlgen_codegen::GenerateOptions;
use owlgen_core::OwlgenConfig;
use std::path::PathBuf;

/// Command-line values that replace `[generator]` settings.
#[derive(Debug, Default)]
pub struct Overrides {
    pub schema: Option<PathBuf>,
    pub templates: Option<PathBuf>,
    pub native_out: Option<PathBuf>,
    pub stub_out: Option<PathBuf>,
    pub namespace: Option<String>,
    pub verify: bool,
}

pub fn apply_overrides(config: &mut OwlgenConfig, overrides: Overrides) {
    let generator = &mut config.generator;

    if let Some(schema) = overrides.schema {
        generator.schema = schema;
    }
    if let Some(templates) = overrides.templates {
        generator.templates = Some(templates);
    }
    if let Some(native_out) = overrides.native_out {
        generator.native_output = native_out;
    }
    if let Some(stub_out) = overrides.stub_out {
        generator.stub_output = stub_out;
    }
    if let Some(namespace) = overrides.namespace {
        generator.namespace = Some(namespace);
    }
    generator.verify |= overrides.verify;
}

pub fn run(config: &OwlgenConfig) -> Result<()> {
    config.validate()?;
    let options = GenerateOptions::from_config(config);

    println!("Generating from schema: {}", options.schema.display());
    if let Some(templates) = &options.templates {
        println!("Using templates: {}", templates.display());
    }

    let summary = owlgen_codegen::generate(&options)?;

    println!("✓ Entries: {}", summary.entries);
    for path in &summary.written {
        println!("✓ Wrote {}", path.display());
    }

    Ok(())
}
