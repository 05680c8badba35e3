//! owlgen CLI - Model code and interface-stub generator
//!
//! Commands:
//! - `owlgen generate` - Render native declarations and stub input from the model schema
//! - `owlgen stubs` - Write the `.pyi` stub package from an export manifest
//! - `owlgen check` - Validate `owlgen.toml` and the model schema
//!
//! Exit codes: 0 on success, 2 schema, 3 template, 4 type mapping,
//! 5 verification, 6 output I/O, 1 for anything else.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use owlgen_core::{DEFAULT_CONFIG_FILE, GenerateError, OwlgenConfig};
use std::path::PathBuf;
use std::process::ExitCode;

mod check;
mod generate;
mod logging;
mod stubs;

#[derive(Parser)]
#[command(name = "owlgen")]
#[command(author, version, about = "Model code and type-stub generator for ontology bindings", long_about = None)]
struct Cli {
    /// Path to owlgen.toml (default: ./owlgen.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off); RUST_LOG takes precedence
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate native model declarations and the stub-generation input
    Generate {
        /// Schema document (JSON)
        #[arg(short, long)]
        schema: Option<PathBuf>,

        /// Directory of `<name>.tera` templates (default: built-in templates)
        #[arg(short, long)]
        templates: Option<PathBuf>,

        /// Output path of the native declarations
        #[arg(long)]
        native_out: Option<PathBuf>,

        /// Output path of the stub-generation input
        #[arg(long)]
        stub_out: Option<PathBuf>,

        /// Namespace prefixed to model references in stub output
        #[arg(short, long)]
        namespace: Option<String>,

        /// Check that the native output parses before writing anything
        #[arg(long)]
        verify: bool,
    },

    /// Write the Python interface-stub package
    Stubs {
        /// Export manifest written by the binding build step
        #[arg(short, long)]
        exports: Option<PathBuf>,

        /// Directory that receives the package directory
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Python package name
        #[arg(short, long)]
        package: Option<String>,

        /// Compiled extension module inside the package (default: package name)
        #[arg(long)]
        native_module: Option<String>,

        /// Model schema; its stub blocks are attached to hooked modules
        #[arg(short, long)]
        schema: Option<PathBuf>,
    },

    /// Validate owlgen.toml and the model schema
    Check,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let (mut config, config_path) = load_config(cli.config)?;
    logging::init(logging::resolve_level(cli.log_level.as_deref(), &config)?);
    tracing::debug!(config = %config_path.display(), "configuration loaded");

    match cli.command {
        Commands::Generate {
            schema,
            templates,
            native_out,
            stub_out,
            namespace,
            verify,
        } => {
            generate::apply_overrides(
                &mut config,
                generate::Overrides {
                    schema,
                    templates,
                    native_out,
                    stub_out,
                    namespace,
                    verify,
                },
            );
            generate::run(&config)?;
        }
        Commands::Stubs {
            exports,
            out,
            package,
            native_module,
            schema,
        } => {
            stubs::apply_overrides(
                &mut config,
                stubs::Overrides {
                    exports,
                    out,
                    package,
                    native_module,
                },
            );
            stubs::run(&config, schema.as_deref())?;
        }
        Commands::Check => {
            check::run(&config, &config_path)?;
        }
    }

    Ok(())
}

/// An explicit `--config` must exist; the default file is optional.
fn load_config(path: Option<PathBuf>) -> Result<(OwlgenConfig, PathBuf)> {
    match path {
        Some(path) => {
            let config = OwlgenConfig::from_file(&path)
                .with_context(|| format!("Failed to load config: {}", path.display()))?;
            Ok((config, path))
        }
        None => {
            let path = PathBuf::from(DEFAULT_CONFIG_FILE);
            let config = OwlgenConfig::load_or_default(&path)
                .with_context(|| format!("Failed to load config: {}", path.display()))?;
            Ok((config, path))
        }
    }
}

fn exit_code(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<GenerateError>()
        .and_then(|e| u8::try_from(e.exit_code()).ok())
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use owlgen_core::SchemaError;

    #[test]
    fn Cli___definition___is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn Cli___global_flags___accepted_after_subcommand() {
        let cli = Cli::try_parse_from(["owlgen", "check", "--config", "x.toml", "--log-level", "debug"])
            .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert!(matches!(cli.command, Commands::Check));
    }

    #[test]
    fn exit_code___generate_error___uses_its_code() {
        let err = anyhow::Error::new(GenerateError::Verify {
            message: "bad".into(),
        });

        assert_eq!(exit_code(&err), 5);
    }

    #[test]
    fn exit_code___wrapped_schema_error___still_found() {
        let err = anyhow::Error::new(GenerateError::from(SchemaError::NotAList)).context("generate");

        assert_eq!(exit_code(&err), 2);
    }

    #[test]
    fn exit_code___other_error___is_one() {
        assert_eq!(exit_code(&anyhow::anyhow!("boom")), 1);
    }

    #[test]
    fn load_config___explicit_missing_file___fails() {
        let dir = tempfile::TempDir::new().unwrap();

        assert!(load_config(Some(dir.path().join("absent.toml"))).is_err());
    }
}
