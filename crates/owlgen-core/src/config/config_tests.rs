#![allow(non_snake_case)]

use super::*;

#[test]
fn OwlgenConfig___default___has_expected_values() {
    let config = OwlgenConfig::default();

    assert_eq!(config.generator.schema, PathBuf::from("template/model.json"));
    assert_eq!(
        config.generator.native_output,
        PathBuf::from("src/model_generated.rs")
    );
    assert!(config.generator.templates.is_none());
    assert!(!config.generator.verify);
    assert_eq!(config.stubs.package, "pyhornedowl");
    assert_eq!(config.logging.level, "info");
}

#[test]
fn OwlgenConfig___from_toml___parses_all_sections() {
    let toml = r#"
[generator]
schema = "schema/model.json"
templates = "schema/templates"
native_output = "src/generated.rs"
stub_output = "stubs/model.pyi.in"
namespace = "model"
verify = true

[stubs]
exports = "target/exports.json"
output_dir = "python"
package = "hornedowl"
native_module = "_hornedowl"

[logging]
level = "debug"
"#;

    let config = OwlgenConfig::from_toml(toml).unwrap();

    assert_eq!(config.generator.schema, PathBuf::from("schema/model.json"));
    assert_eq!(
        config.generator.templates,
        Some(PathBuf::from("schema/templates"))
    );
    assert_eq!(config.generator.namespace.as_deref(), Some("model"));
    assert!(config.generator.verify);
    assert_eq!(config.stubs.output_dir, PathBuf::from("python"));
    assert_eq!(config.stubs.native_module, "_hornedowl");
    assert_eq!(config.log_level(), Some(LogLevel::Debug));
}

#[test]
fn OwlgenConfig___from_toml___empty_uses_defaults() {
    let config = OwlgenConfig::from_toml("").unwrap();

    assert_eq!(config.generator.schema, PathBuf::from("template/model.json"));
    assert_eq!(config.stubs.native_module, "pyhornedowl");
    config.validate().unwrap();
}

#[test]
fn OwlgenConfig___from_toml___rejects_unknown_types() {
    let result = OwlgenConfig::from_toml("[generator]\nverify = \"yes\"\n");

    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
fn OwlgenConfig___from_file___missing_file_returns_read_error() {
    let result = OwlgenConfig::from_file("/definitely/not/here/owlgen.toml");

    assert!(matches!(result, Err(ConfigError::Read { .. })));
}

#[test]
fn OwlgenConfig___load_or_default___missing_file_returns_defaults() {
    let config = OwlgenConfig::load_or_default("/definitely/not/here/owlgen.toml").unwrap();

    assert_eq!(config.logging.level, "info");
}

#[test]
fn OwlgenConfig___validate___rejects_empty_schema() {
    let mut config = OwlgenConfig::default();
    config.generator.schema = PathBuf::new();

    let err = config.validate().unwrap_err();

    assert!(err.to_string().contains("generator.schema"));
}

#[test]
fn OwlgenConfig___validate___rejects_identical_outputs() {
    let mut config = OwlgenConfig::default();
    config.generator.stub_output = config.generator.native_output.clone();

    let result = config.validate();

    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}

#[test]
fn OwlgenConfig___validate___rejects_unknown_log_level() {
    let mut config = OwlgenConfig::default();
    config.logging.level = "verbose".to_string();

    let err = config.validate().unwrap_err();

    assert!(err.to_string().contains("verbose"));
}

#[test]
fn OwlgenConfig___validate___rejects_empty_package() {
    let mut config = OwlgenConfig::default();
    config.stubs.package = String::new();

    assert!(config.validate().is_err());
}
