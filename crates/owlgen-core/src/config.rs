//! `owlgen.toml` configuration

use crate::LogLevel;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "owlgen.toml";

/// Top-level configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OwlgenConfig {
    #[serde(default)]
    pub generator: GeneratorSection,

    #[serde(default)]
    pub stubs: StubSection,

    #[serde(default)]
    pub logging: LoggingSection,
}

/// Schema-driven generator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorSection {
    /// Schema document describing the model entries
    #[serde(default = "default_schema")]
    pub schema: PathBuf,

    /// Directory of `<name>.tera` templates; built-in templates when unset
    #[serde(default)]
    pub templates: Option<PathBuf>,

    /// Native declaration artifact
    #[serde(default = "default_native_output")]
    pub native_output: PathBuf,

    /// Stub-generation input artifact
    #[serde(default = "default_stub_output")]
    pub stub_output: PathBuf,

    /// Namespace prefixed to model references in stub output
    #[serde(default)]
    pub namespace: Option<String>,

    /// Syntax-check the native artifact before writing it
    #[serde(default)]
    pub verify: bool,
}

/// Stub extractor settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StubSection {
    /// Export manifest written by the binding build step
    #[serde(default = "default_exports")]
    pub exports: PathBuf,

    /// Directory that receives the stub package
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Python package name
    #[serde(default = "default_package")]
    pub package: String,

    /// Name of the compiled extension module inside the package
    #[serde(default = "default_package")]
    pub native_module: String,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSection {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_schema() -> PathBuf {
    PathBuf::from("template/model.json")
}

fn default_native_output() -> PathBuf {
    PathBuf::from("src/model_generated.rs")
}

fn default_stub_output() -> PathBuf {
    PathBuf::from("pyhornedowl/model/model.pyi.in")
}

fn default_exports() -> PathBuf {
    PathBuf::from("target/owlgen/exports.json")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_package() -> String {
    "pyhornedowl".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for GeneratorSection {
    fn default() -> Self {
        Self {
            schema: default_schema(),
            templates: None,
            native_output: default_native_output(),
            stub_output: default_stub_output(),
            namespace: None,
            verify: false,
        }
    }
}

impl Default for StubSection {
    fn default() -> Self {
        Self {
            exports: default_exports(),
            output_dir: default_output_dir(),
            package: default_package(),
            native_module: default_package(),
        }
    }
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl OwlgenConfig {
    /// Load configuration from a file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml(&content)
    }

    /// Load configuration from a file if it exists, defaults otherwise
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Configured log level
    pub fn log_level(&self) -> Option<LogLevel> {
        LogLevel::parse(&self.logging.level)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let paths = [
            ("generator.schema", &self.generator.schema),
            ("generator.native_output", &self.generator.native_output),
            ("generator.stub_output", &self.generator.stub_output),
            ("stubs.exports", &self.stubs.exports),
        ];
        for (key, path) in paths {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::Invalid(format!("{key} cannot be empty")));
            }
        }

        if self.generator.native_output == self.generator.stub_output {
            return Err(ConfigError::Invalid(
                "generator.native_output and generator.stub_output must differ".to_string(),
            ));
        }

        if self.stubs.package.is_empty() {
            return Err(ConfigError::Invalid(
                "stubs.package cannot be empty".to_string(),
            ));
        }

        if let Some(namespace) = &self.generator.namespace {
            if !is_identifier(namespace) {
                return Err(ConfigError::Invalid(format!(
                    "generator.namespace '{namespace}' is not an identifier"
                )));
            }
        }

        if self.log_level().is_none() {
            return Err(ConfigError::Invalid(format!(
                "unknown log level '{}'",
                self.logging.level
            )));
        }

        Ok(())
    }
}

fn is_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

#[cfg(test)]
#[path = "config/config_tests.rs"]
mod config_tests;
