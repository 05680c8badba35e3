#![allow(non_snake_case)]

use super::*;
use crate::registry::{ExportedModule, ExportedType};
use test_case::test_case;

fn extractor() -> StubExtractor {
    StubExtractor::new(StubOptions::new(".", "pyhornedowl"))
}

fn color() -> ExportedType {
    ExportedType::new("Color")
        .with_doc("A color.\nRED: the color red")
        .with_variant("RED")
        .with_variant("BLUE")
        .with_member(ExportedMember::method(
            "mix",
            "mix(self, other: Color) -> Color\n\nMix two colors.",
        ))
}

fn stub_of(module: &ExportedModule, path: &[&str]) -> (String, Vec<ReflectionFormatError>) {
    let mut degraded = Vec::new();
    let stub = extractor().render_stub(module, path, &mut degraded);
    (stub, degraded)
}

// =============================================================================
// Reflective types
// =============================================================================

#[test]
fn render_stub___enum_like_type___variants_are_self_with_recovered_docs() {
    let module = ExportedModule::new("pyhornedowl").with_type(color());

    let (stub, degraded) = stub_of(&module, &[]);

    let expected = "\
import typing
from typing import *
from typing_extensions import deprecated

class Color:
    \"\"\"
    A color.
    \"\"\"
    RED: typing.Self
    \"\"\"
    the color red
    \"\"\"
    BLUE: typing.Self
    def mix(self, other: Color) -> Color:
        \"\"\"
        Mix two colors.
        \"\"\"
        ...


";
    assert_eq!(stub, expected);
    assert!(degraded.is_empty());
}

#[test]
fn render_stub___recovered_doc___preferred_over_member_doc() {
    let ty = ExportedType::new("Color")
        .with_doc("RED: recovered")
        .with_member(ExportedMember::value("RED", "Color").with_doc("own"));
    let module = ExportedModule::new("m").with_type(ty);

    let (stub, _) = stub_of(&module, &[]);

    assert!(stub.contains("    RED: typing.Self\n    \"\"\"\n    recovered\n    \"\"\"\n"));
    assert!(!stub.contains("own"));
}

#[test]
fn render_stub___value_of_other_type___annotated_with_that_type() {
    let ty = ExportedType::new("Defaults").with_member(ExportedMember::value("ORIGIN", "Point"));
    let module = ExportedModule::new("m").with_type(ty);

    let (stub, _) = stub_of(&module, &[]);

    assert!(stub.contains("class Defaults:\n    ORIGIN: Point\n"));
}

#[test]
fn render_stub___attribute___declared_with_indented_docstring() {
    let ty = ExportedType::new("Ontology").with_member(ExportedMember::attribute(
        "iri",
        "iri: typing.Optional[IRI]\n\nThe ontology IRI.",
    ));
    let module = ExportedModule::new("m").with_type(ty);

    let (stub, _) = stub_of(&module, &[]);

    assert!(stub.contains("    iri: typing.Optional[IRI]\n    \"\"\"\n    The ontology IRI.\n    \"\"\"\n\n"));
}

#[test]
fn render_stub___annotations___written_above_def() {
    let ty = ExportedType::new("Ontology").with_member(ExportedMember::method(
        "get_axioms",
        "@deprecated(\"use axioms\")\nget_axioms(self) -> list\n\nAll axioms.",
    ));
    let module = ExportedModule::new("m").with_type(ty);

    let (stub, _) = stub_of(&module, &[]);

    assert!(stub.contains("    @deprecated(\"use axioms\")\n    def get_axioms(self) -> list:\n"));
}

#[test]
fn render_stub___keyword_parameter___escaped_signature_otherwise_intact() {
    let ty = ExportedType::new("Mapping").with_member(ExportedMember::method(
        "between",
        "between(self, from: IRI, to: IRI) -> Mapping\n\nBuild a mapping.",
    ));
    let module = ExportedModule::new("m").with_type(ty);

    let (stub, _) = stub_of(&module, &[]);

    assert!(stub.contains("    def between(self, from_: IRI, to: IRI) -> Mapping:\n"));
}

#[test]
fn render_stub___empty_class___ellipsis_body() {
    let module = ExportedModule::new("m").with_type(ExportedType::new("Marker"));

    let (stub, _) = stub_of(&module, &[]);

    assert!(stub.contains("class Marker:\n    ...\n"));
}

#[test_case("_private", false)]
#[test_case("__repr__", false)]
#[test_case("__getitem__", true)]
#[test_case("__invert__", true)]
#[test_case("visible", true)]
fn is_visible___magic_allow_list(name: &str, expected: bool) {
    assert_eq!(is_visible(name), expected);
}

#[test]
fn render_stub___underscore_members___skipped_except_magic() {
    let ty = ExportedType::new("Ontology")
        .with_member(ExportedMember::method("_internal", "_internal(self) -> None\n\nHidden."))
        .with_member(ExportedMember::method(
            "__len__",
            "__len__(self) -> int\n\nNumber of axioms.",
        ));
    let module = ExportedModule::new("m").with_type(ty);

    let (stub, _) = stub_of(&module, &[]);

    assert!(!stub.contains("_internal"));
    assert!(stub.contains("    def __len__(self) -> int:\n"));
}

// =============================================================================
// Degradation
// =============================================================================

#[test]
fn render_stub___malformed_docs___placeholders_and_recorded_errors() {
    let ty = ExportedType::new("Ontology")
        .with_member(ExportedMember::method("load", "Loads things.").undocumented())
        .with_member(ExportedMember::attribute("size", "The size.\nIn axioms.\nApproximately."))
        .with_member(ExportedMember::method("ok", "ok(self) -> bool\n\nFine."));
    let module = ExportedModule::new("m").with_type(ty);

    let (stub, degraded) = stub_of(&module, &[]);

    assert!(stub.contains("    def load(self, *args, **kwargs) -> typing.Any: ...\n"));
    assert!(stub.contains("    size: typing.Any\n"));
    assert!(stub.contains("    def ok(self) -> bool:\n"));
    assert_eq!(degraded.len(), 2);
    assert_eq!(degraded[0].member(), "load");
    assert!(matches!(degraded[1], ReflectionFormatError::MissingSeparator { .. }));
}

#[test]
fn render_stub___keyword_placeholder___escaped() {
    let ty = ExportedType::new("Mapping").with_member(ExportedMember::attribute("from", "bad"));
    let module = ExportedModule::new("m").with_type(ty);

    let (stub, degraded) = stub_of(&module, &[]);

    assert!(stub.contains("    from_: typing.Any\n"));
    assert_eq!(degraded.len(), 1);
}

// =============================================================================
// Functions and aliases
// =============================================================================

#[test]
fn render_stub___top_level_function___annotations_at_column_zero() {
    let module = ExportedModule::new("pyhornedowl").with_function(ExportedMember::method(
        "open_ontology",
        "@typing.overload\nopen_ontology(path: str) -> Ontology\n\nOpen an ontology.",
    ));

    let (stub, _) = stub_of(&module, &[]);

    assert!(stub.ends_with(
        "@typing.overload\ndef open_ontology(path: str) -> Ontology:\n    \"\"\"\n    Open an ontology.\n    \"\"\"\n    ...\n\n"
    ));
}

#[test]
fn render_stub___alias___module_prefix_stripped() {
    let module = ExportedModule::new("model")
        .with_style(ModuleStyle::Hooked)
        .with_alias(
            "ClassExpression",
            "typing.Union[pyhornedowl.model.Class, pyhornedowl.model.ObjectUnionOf]",
        );

    let (stub, _) = stub_of(&module, &["model"]);

    assert!(stub.contains("ClassExpression = typing.Union[Class, ObjectUnionOf]\n"));
}

// =============================================================================
// Hooked modules
// =============================================================================

#[test]
fn render_stub___hooked_type___escaped_hook_plus_documented_methods() {
    let hook = "class AnnotationAssertion:\n    subject: IRI\n    def __init__(self, from: IRI, subject: IRI) -> None: ...\n";
    let ty = ExportedType::new("AnnotationAssertion")
        .with_stub_hook(hook)
        .with_member(ExportedMember::method("undocumented", "x").undocumented())
        .with_member(ExportedMember::method(
            "matches",
            "matches(self, other: IRI) -> bool\n\nCompare subjects.",
        ));
    let module = ExportedModule::new("model")
        .with_style(ModuleStyle::Hooked)
        .with_type(ty);

    let (stub, degraded) = stub_of(&module, &["model"]);

    let expected = "\
import typing
from typing import (Any)
from typing_extensions import deprecated

class AnnotationAssertion:
    subject: IRI
    def __init__(self, from_: IRI, subject: IRI) -> None: ...
    def matches(self, other: IRI) -> bool:
        \"\"\"
        Compare subjects.
        \"\"\"
        ...


";
    assert_eq!(stub, expected);
    assert!(degraded.is_empty());
}

#[test]
fn render_stub___hooked_type_without_hook___fallback_class() {
    let ty = ExportedType::new("Facet")
        .with_member(ExportedMember::attribute("value", "v").undocumented())
        .with_member(ExportedMember::attribute("from", "f").undocumented())
        .with_member(ExportedMember::attribute("_hidden", "h").undocumented());
    let module = ExportedModule::new("model")
        .with_style(ModuleStyle::Hooked)
        .with_type(ty);

    let (stub, degraded) = stub_of(&module, &["model"]);

    assert!(stub.contains("class Facet:\n    value: typing.Any\n    ...\n"));
    assert!(degraded.is_empty());
}

// =============================================================================
// Shims
// =============================================================================

#[test]
fn render_shim___root___reexports_types_and_functions() {
    let module = ExportedModule::new("pyhornedowl")
        .with_type(ExportedType::new("PyIndexedOntology"))
        .with_function(ExportedMember::method("open_ontology", "x"));

    let shim = extractor().render_shim(&module, &[]);

    assert_eq!(
        shim,
        "from __future__ import annotations\n\
         from .pyhornedowl import PyIndexedOntology, open_ontology\n\
         \n\
         __all__ = [\"PyIndexedOntology\", \"open_ontology\"]\n"
    );
}

#[test]
fn render_shim___submodule___binds_names_from_native_module() {
    let module = ExportedModule::new("model")
        .with_type(ExportedType::new("IRI"))
        .with_alias("ClassExpression", "typing.Union[IRI]");
    let extractor = StubExtractor::new(StubOptions::new(".", "pyhornedowl").with_native_module("_native"));

    let shim = extractor.render_shim(&module, &["model"]);

    assert_eq!(
        shim,
        "from .._native import model\n\
         import typing\n\
         \n\
         IRI = model.IRI\n\
         ClassExpression = model.ClassExpression\n\
         \n\
         __all__ = [\"IRI\", \"ClassExpression\"]\n"
    );
}

#[test]
fn StubOptions___from_config___copies_section() {
    let section = StubSection {
        output_dir: "out".into(),
        package: "pkg".into(),
        native_module: "_pkg".into(),
        ..StubSection::default()
    };

    let options = StubOptions::from_config(&section);

    assert_eq!(options.package_dir(), PathBuf::from("out/pkg"));
    assert_eq!(options.native_module, "_pkg");
}
