#![allow(non_snake_case)]

use super::*;
use test_case::test_case;

// ============================================================================
// Parameterized exit code mapping tests
// ============================================================================

#[test_case(GenerateError::Schema(SchemaError::NotAList), 2, "Schema")]
#[test_case(
    GenerateError::Template(TemplateError::Missing {
        template: "enum.rs".into(),
        entry: "Color".into(),
    }),
    3,
    "Template"
)]
#[test_case(
    GenerateError::Mapping {
        entry: "Color".into(),
        source: MappingError::NotATypeRef { value: "null".into() },
    },
    4,
    "Mapping"
)]
#[test_case(GenerateError::Verify { message: "expected `;`".into() }, 5, "Verify")]
#[test_case(
    GenerateError::Io {
        path: PathBuf::from("out.rs"),
        source: std::io::Error::other("disk full"),
    },
    6,
    "Io"
)]
fn GenerateError___variant___maps_to_exit_code(
    error: GenerateError,
    expected_code: i32,
    _variant_name: &str,
) {
    assert_eq!(
        error.exit_code(),
        expected_code,
        "{} should map to exit code {}",
        _variant_name,
        expected_code
    );
}

// ============================================================================
// Parameterized reflection format error tests
// ============================================================================

#[test_case(ReflectionFormatError::Undocumented { member: "a".into() }, "a")]
#[test_case(ReflectionFormatError::TooShort { member: "b".into(), lines: 1 }, "b")]
#[test_case(ReflectionFormatError::MissingSignature { member: "c".into() }, "c")]
#[test_case(ReflectionFormatError::MissingSeparator { member: "d".into() }, "d")]
fn ReflectionFormatError___variant___identifies_member(
    error: ReflectionFormatError,
    member: &str,
) {
    assert_eq!(error.member(), member);
    assert!(error.to_string().contains(&format!("'{member}'")));
}
