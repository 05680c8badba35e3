//! owlgen-core - Error taxonomy, configuration and shared types
//!
//! This crate provides the foundations shared by the owlgen crates:
//! - [`SchemaError`], [`TemplateError`], [`MappingError`] and [`GenerateError`]
//!   for the schema-driven generator
//! - [`ReflectionFormatError`] and [`ExtractError`] for the stub extractor
//! - [`OwlgenConfig`] for `owlgen.toml`
//! - [`LogLevel`] for logging configuration

mod config;
mod error;

pub use config::{DEFAULT_CONFIG_FILE, GeneratorSection, LoggingSection, OwlgenConfig, StubSection};
pub use error::{
    ConfigError, ExtractError, GenerateError, GenerateResult, MappingError, ReflectionFormatError,
    SchemaError, TemplateError,
};

/// Log levels accepted in configuration and on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    /// Parse a level name, case-insensitively
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            "off" => Some(LogLevel::Off),
            _ => None,
        }
    }

    /// Directive understood by `tracing_subscriber::EnvFilter`
    pub fn as_directive(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        GenerateError, GenerateResult, LogLevel, MappingError, OwlgenConfig, ReflectionFormatError,
        SchemaError, TemplateError,
    };
}
