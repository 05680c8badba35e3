//! Property-based tests for type mapping and naming
//!
//! Tests that the two type mappings treat boxes asymmetrically for any type
//! reference, and that ordinal naming is stable for any positional arity.

use owlgen_codegen::naming::{NameResolver, ORDINALS, to_snake_case};
use owlgen_codegen::schema::{FieldSet, FieldSpec, TypeRef, WrapperKind};
use owlgen_codegen::types::{native_type, stub_type, type_ref_from_value};
use proptest::prelude::*;

// Strategy: scalar names, either primitives or model references
fn arb_scalar() -> impl Strategy<Value = TypeRef> {
    prop_oneof![
        prop::sample::select(vec!["u32", "i64", "f64", "bool", "String", "str"])
            .prop_map(|name| TypeRef::scalar(name)),
        "[A-Z][A-Za-z]{0,15}".prop_map(TypeRef::Scalar),
    ]
}

fn arb_wrapper_kind() -> impl Strategy<Value = WrapperKind> {
    prop_oneof![
        Just(WrapperKind::List),
        Just(WrapperKind::Optional),
        Just(WrapperKind::Set),
        Just(WrapperKind::Boxed),
    ]
}

// Strategy: arbitrarily nested type references terminating in scalars
fn arb_type_ref() -> impl Strategy<Value = TypeRef> {
    arb_scalar().prop_recursive(4, 32, 3, |inner| {
        prop_oneof![
            (arb_wrapper_kind(), inner.clone()).prop_map(|(kind, inner)| TypeRef::wrap(kind, inner)),
            prop::collection::vec(inner, 1..4).prop_map(TypeRef::Tuple),
        ]
    })
}

proptest! {
    /// Property: boxing is erased in stubs
    #[test]
    fn proptest_stub_type_erases_box(ty in arb_type_ref()) {
        let boxed = TypeRef::boxed(ty.clone());

        prop_assert_eq!(stub_type(&boxed, None), stub_type(&ty, None));
        prop_assert_eq!(stub_type(&boxed, Some("m")), stub_type(&ty, Some("m")));
    }

    /// Property: boxing is preserved natively
    #[test]
    fn proptest_native_type_preserves_box(ty in arb_type_ref()) {
        let boxed = TypeRef::boxed(ty.clone());

        prop_assert_eq!(native_type(&boxed), format!("BoxWrap<{}>", native_type(&ty)));
    }

    /// Property: stub output never mentions native wrapper aliases
    #[test]
    fn proptest_stub_type_has_no_native_syntax(ty in arb_type_ref()) {
        let stub = stub_type(&ty, None);

        prop_assert!(!stub.contains("Wrap<"));
        prop_assert!(!stub.contains('<'));
    }

    /// Property: a serialized type reference decodes to itself
    #[test]
    fn proptest_type_ref_value_roundtrip(ty in arb_type_ref()) {
        let value = serde_json::to_value(&ty).unwrap();

        prop_assert_eq!(type_ref_from_value(&value).unwrap(), ty);
    }

    /// Property: unnamed positional fields resolve to the ordinal prefix
    #[test]
    fn proptest_ordinal_names_follow_position(arity in 0usize..=20) {
        let fields = FieldSet::Positional(
            (0..arity)
                .map(|position| FieldSpec {
                    position,
                    name: None,
                    ty: TypeRef::scalar("u32"),
                    display_name: None,
                })
                .collect(),
        );

        let names = NameResolver::with_arity(arity).resolve(&fields);

        prop_assert_eq!(names, ORDINALS[..arity].to_vec());
    }

    /// Property: snake_case output has no uppercase letters
    #[test]
    fn proptest_snake_case_is_lowercase(name in "[A-Z][A-Za-z0-9]{0,30}") {
        let snake = to_snake_case(&name);

        prop_assert!(!snake.chars().any(char::is_uppercase));
        prop_assert!(!snake.starts_with('_'));
    }
}
