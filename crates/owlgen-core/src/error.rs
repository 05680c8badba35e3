//! Error types for owlgen
//!
//! Schema, template and mapping errors are fatal to a generation run. Reflection
//! format errors are recovered per member by the stub extractor.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for generation runs
pub type GenerateResult<T> = Result<T, GenerateError>;

/// Malformed schema document, entry, field or name collision
#[derive(Error, Debug)]
pub enum SchemaError {
    /// Schema document could not be read
    #[error("failed to read schema {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Schema document is not valid JSON
    #[error("schema is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Schema root is not a list of entries
    #[error("schema root must be a list of model entries")]
    NotAList,

    /// Entry without a usable name
    #[error("entry #{index} has no name")]
    MissingName { index: usize },

    /// Entry without a kind discriminant
    #[error("entry '{entry}' has no kind discriminant")]
    MissingKind { entry: String },

    /// Entry with a kind other than struct or enum
    #[error("entry '{entry}' has unknown kind '{kind}'")]
    UnknownKind { entry: String, kind: String },

    /// Struct without fields, or enum without variants
    #[error("entry '{entry}' is missing its '{key}' collection")]
    MissingBody { entry: String, key: &'static str },

    /// Type reference naming a wrapper kind that does not exist
    #[error("entry '{entry}', field '{field}': unrecognized wrapper kind '{kind}'")]
    UnknownWrapper {
        entry: String,
        field: String,
        kind: String,
    },

    /// Type reference with an unusable shape
    #[error("entry '{entry}', field '{field}': malformed type reference {value}")]
    MalformedType {
        entry: String,
        field: String,
        value: String,
    },

    /// Two entries share a name
    #[error("duplicate entry name '{entry}'")]
    DuplicateEntry { entry: String },

    /// More positional fields than ordinal names
    #[error(
        "entry '{entry}' has {arity} positional fields; ordinal names exist for at most {max}"
    )]
    ArityExceeded {
        entry: String,
        arity: usize,
        max: usize,
    },
}

/// Missing template or template engine failure
#[derive(Error, Debug)]
pub enum TemplateError {
    /// No template registered for an entry kind and target
    #[error("no template '{template}' available for entry '{entry}'")]
    Missing { template: String, entry: String },

    /// Template directory could not be read
    #[error("failed to read template {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Template failed to parse
    #[error("template '{template}' is invalid: {message}")]
    Syntax { template: String, message: String },

    /// Template raised an error while rendering an entry
    #[error("rendering entry '{entry}' with template '{template}' failed: {message}")]
    Render {
        entry: String,
        template: String,
        message: String,
    },
}

/// Value handed to a type filter that cannot be mapped
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    /// Wrapper kind outside list/optional/set/boxed
    #[error("unmappable wrapper kind '{kind}'")]
    UnknownWrapper { kind: String },

    /// Value is not a type reference at all
    #[error("value {value} is not a type reference")]
    NotATypeRef { value: String },
}

/// Member documentation that does not follow the structured stub format
///
/// The expected shape is `<annotation-lines>\n<signature-line>\n\n<body>`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReflectionFormatError {
    /// Member carries no documentation
    #[error("member '{member}' has no documentation")]
    Undocumented { member: String },

    /// Documentation too short to hold a signature and a body
    #[error("member '{member}': documentation has {lines} line(s), expected a signature, a blank line and a body")]
    TooShort { member: String, lines: usize },

    /// Only annotation lines, no signature
    #[error("member '{member}': documentation has no signature line")]
    MissingSignature { member: String },

    /// Signature line not followed by a blank line
    #[error("member '{member}': signature line must be followed by a blank line")]
    MissingSeparator { member: String },
}

impl ReflectionFormatError {
    /// Name of the member whose documentation was rejected
    pub fn member(&self) -> &str {
        match self {
            ReflectionFormatError::Undocumented { member }
            | ReflectionFormatError::TooShort { member, .. }
            | ReflectionFormatError::MissingSignature { member }
            | ReflectionFormatError::MissingSeparator { member } => member,
        }
    }
}

/// Error type for a generation run
#[derive(Error, Debug)]
pub enum GenerateError {
    /// Schema could not be loaded
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Template missing or failed
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// A type filter received something that is not a type reference
    #[error("entry '{entry}': {source}")]
    Mapping {
        entry: String,
        #[source]
        source: MappingError,
    },

    /// Native artifact failed the syntax check
    #[error("generated native source does not parse: {message}")]
    Verify { message: String },

    /// Artifact could not be written
    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GenerateError {
    /// Process exit code for the CLI
    pub fn exit_code(&self) -> i32 {
        match self {
            GenerateError::Schema(_) => 2,
            GenerateError::Template(_) => 3,
            GenerateError::Mapping { .. } => 4,
            GenerateError::Verify { .. } => 5,
            GenerateError::Io { .. } => 6,
        }
    }
}

/// Error type for the stub extraction pass
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Export manifest could not be read
    #[error("failed to read export manifest {}: {source}", .path.display())]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Export manifest is not valid
    #[error("invalid export manifest: {0}")]
    Manifest(#[from] serde_json::Error),

    /// Module path not present in the registry
    #[error("unknown module '{0}'")]
    UnknownModule(String),

    /// Stub file could not be written or cleared
    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Error type for `owlgen.toml`
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for the expected layout
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config values failed validation
    #[error("invalid config: {0}")]
    Invalid(String),
}


#[cfg(test)]
#[path = "error/error_parameterized_tests.rs"]
mod error_parameterized_tests;
