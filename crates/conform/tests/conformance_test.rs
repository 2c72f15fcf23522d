//! Integration tests for the conformance engine.
//!
//! Covers `satisfies` and `is_subtype` across plain classes, unions,
//! `any`, `optional`, `only`, `options`, containers and predicates.
//!
//! Run with: `cargo test --test conformance_test`

mod common;

use common::{create_test_class, create_test_subclass, developer, greeter_interface, ty};
use conform::runtime::{Value, builtins};
use conform::spec::{
    SpecLiteral, TypeSpec, any, list_of, mapping_of, only, optional, options, predicate, set_of,
    tuple_of, union,
};
use conform::{Error, InvalidSpec, is_subtype, satisfies};

fn number() -> TypeSpec {
    union([builtins::int(), builtins::float()]).unwrap()
}

// ============================================================================
// End-to-end scenarios
// ============================================================================

#[test]
fn test_plain_integer_spec() {
    let spec = ty(builtins::int());
    assert!(satisfies(&Value::Int(5), &spec));
    assert!(!satisfies(&Value::str("5"), &spec));
}

#[test]
fn test_structural_greeter() {
    let spec = TypeSpec::from(&greeter_interface());
    let (_, bob) = developer();
    let value = Value::from(bob.clone());

    assert!(satisfies(&value, &spec));
    bob.remove_attr("age");
    assert!(!satisfies(&value, &spec));
}

#[test]
fn test_mapping_of_tuples() {
    let spec = TypeSpec::from_literal(SpecLiteral::map(
        builtins::int(),
        SpecLiteral::tuple([builtins::str(), builtins::bool()]),
    ))
    .unwrap();

    let good = Value::dict([(Value::Int(1), Value::tuple([Value::str("a"), Value::Bool(false)]))]);
    assert!(satisfies(&good, &spec));
    assert!(!satisfies(&Value::str("string"), &spec));

    let bad_key = Value::dict([(Value::str("1"), Value::tuple([Value::str("a"), Value::Bool(false)]))]);
    assert!(!satisfies(&bad_key, &spec));
}

// ============================================================================
// Any
// ============================================================================

#[test]
fn test_any_accepts_everything() {
    let class = create_test_class("Anything");
    for value in [
        Value::Int(1),
        Value::str("string"),
        Value::None,
        common::instance(&class),
        Value::from(&class),
    ] {
        assert!(satisfies(&value, &any()), "{value:?}");
    }
}

#[test]
fn test_every_class_is_subtype_of_any() {
    assert!(is_subtype(&ty(builtins::int()), &any()));
    assert!(is_subtype(&ty(builtins::str()), &any()));
    assert!(is_subtype(&ty(builtins::type_()), &any()));
    assert!(is_subtype(&any(), &ty(builtins::object())));
    assert!(!is_subtype(&any(), &ty(builtins::int())));
}

// ============================================================================
// Unions
// ============================================================================

#[test]
fn test_union_requires_members() {
    let err = union(Vec::<TypeSpec>::new()).unwrap_err();
    assert_eq!(err, Error::InvalidSpec(InvalidSpec::EmptyUnion));
}

#[test]
fn test_literal_rejects_plain_values() {
    let err = TypeSpec::from_literal(SpecLiteral::tuple([
        SpecLiteral::from(Value::Int(1)),
        SpecLiteral::from(builtins::int()),
    ]))
    .unwrap_err();
    assert!(matches!(err, Error::InvalidSpec(InvalidSpec::NotAType { .. })));
}

#[test]
fn test_union_of_one_collapses() {
    assert_eq!(union([builtins::int()]).unwrap(), ty(builtins::int()));
    assert_eq!(union([builtins::int(), builtins::int()]).unwrap(), ty(builtins::int()));
}

#[test]
fn test_union_instances_of_builtins() {
    let spec = number();
    assert!(satisfies(&Value::Int(1), &spec));
    assert!(satisfies(&Value::Float(1.2), &spec));

    assert!(!satisfies(&Value::str("string"), &spec));
    assert!(!satisfies(&Value::list(Vec::<Value>::new()), &spec));
    assert!(!satisfies(&Value::tuple(Vec::<Value>::new()), &spec));
    assert!(!satisfies(&Value::dict(Vec::<(Value, Value)>::new()), &spec));
}

#[test]
fn test_union_instances_of_classes() {
    let first = create_test_class("First");
    let first_sub = create_test_subclass("FirstSub", &first);
    let second = create_test_class("Second");
    let second_sub = create_test_subclass("SecondSub", &second);
    let other = create_test_class("Other");

    let parents = union([&first, &second]).unwrap();
    let children = union([&first_sub, &second_sub]).unwrap();

    assert!(satisfies(&common::instance(&first), &parents));
    assert!(satisfies(&common::instance(&second_sub), &parents));
    assert!(!satisfies(&common::instance(&other), &parents));
    assert!(!satisfies(&common::instance(&first), &children));
    assert!(!satisfies(&common::instance(&second), &children));
}

#[test]
fn test_union_mixing_classes_and_interfaces() {
    let plain = create_test_class("Plain");
    let greeter = greeter_interface();
    let spec = union([
        TypeSpec::from(builtins::int()),
        TypeSpec::from(&plain),
        TypeSpec::from(&greeter),
    ])
    .unwrap();
    let (_, bob) = developer();

    assert!(satisfies(&Value::Int(1), &spec));
    assert!(satisfies(&common::instance(&plain), &spec));
    assert!(satisfies(&Value::from(bob), &spec));
    assert!(!satisfies(&Value::str("string"), &spec));
    assert!(!satisfies(&common::instance(&create_test_class("Other")), &spec));
}

#[test]
fn test_classes_subtype_of_union() {
    let spec = number();
    assert!(is_subtype(&ty(builtins::int()), &spec));
    assert!(is_subtype(&ty(builtins::float()), &spec));
    assert!(is_subtype(&ty(builtins::bool()), &spec));
    assert!(!is_subtype(&ty(builtins::str()), &spec));
    assert!(!is_subtype(&ty(builtins::list()), &spec));

    let first = create_test_class("First");
    let first_sub = create_test_subclass("FirstSub", &first);
    let second = create_test_class("Second");
    assert!(is_subtype(&ty(&first_sub), &union([&first, &second]).unwrap()));
    assert!(!is_subtype(&ty(&first), &union([&first_sub, &second]).unwrap()));
}

#[test]
fn test_union_subtype_of_union() {
    let int_float = number();
    let float_int = union([builtins::float(), builtins::int()]).unwrap();
    let wider = union([builtins::int(), builtins::float(), builtins::bool()]).unwrap();
    let int_str = union([builtins::int(), builtins::str()]).unwrap();
    let int_str_float = union([builtins::int(), builtins::str(), builtins::float()]).unwrap();

    assert!(is_subtype(&int_float, &int_float));
    assert!(is_subtype(&int_float, &float_int));
    assert!(is_subtype(&int_float, &wider));
    assert!(!is_subtype(&int_float, &int_str));
    assert!(!is_subtype(&int_str_float, &int_float));
}

#[test]
fn test_union_operator() {
    let spec = ty(builtins::int()) | ty(builtins::str());
    assert_eq!(spec, union([builtins::str(), builtins::int()]).unwrap());
    assert_eq!(spec.to_string(), "union[int, str]");
}

// ============================================================================
// Optional, only, options
// ============================================================================

#[test]
fn test_optional_accepts_none() {
    let spec = optional(builtins::str());
    assert!(satisfies(&Value::None, &spec));
    assert!(satisfies(&Value::str("x"), &spec));
    assert!(!satisfies(&Value::Int(1), &spec));
}

#[test]
fn test_plain_spec_rejects_none() {
    assert!(!satisfies(&Value::None, &ty(builtins::int())));
    assert!(satisfies(&Value::None, &ty(builtins::none_type())));
}

#[test]
fn test_only_exact_class() {
    let base = create_test_class("Base");
    let derived = create_test_subclass("Derived", &base);
    let spec = only(&base);

    assert!(satisfies(&common::instance(&base), &spec));
    assert!(!satisfies(&common::instance(&derived), &spec));
    assert!(is_subtype(&only(&base), &ty(&base)));
    assert!(!is_subtype(&ty(&derived), &spec));
}

#[test]
fn test_options_values() {
    let spec = options(["red", "green"]);
    assert!(satisfies(&Value::str("red"), &spec));
    assert!(!satisfies(&Value::str("blue"), &spec));
    assert!(!satisfies(&Value::None, &spec));
    assert_eq!(spec.to_string(), "options[\"red\", \"green\"]");
}

#[test]
fn test_options_compare_large_numbers_exactly() {
    let rounded = options([Value::Float(9_007_199_254_740_992.0)]);
    assert!(!satisfies(&Value::Int(9_007_199_254_740_993), &rounded));
    assert!(satisfies(&Value::Int(9_007_199_254_740_992), &rounded));

    let both = options([Value::Int(9_007_199_254_740_993), Value::Float(9_007_199_254_740_992.0)]);
    assert_eq!(
        both.to_string(),
        "options[9007199254740993, 9007199254740992.0]"
    );
}

// ============================================================================
// Containers
// ============================================================================

#[test]
fn test_list_and_set_elements() {
    let ints = list_of(builtins::int());
    assert!(satisfies(&Value::list([1, 2]), &ints));
    assert!(!satisfies(&Value::list([Value::Int(1), Value::None]), &ints));

    let maybe = list_of(optional(builtins::int()));
    assert!(satisfies(&Value::list([Value::Int(1), Value::None]), &maybe));

    let names = set_of(builtins::str());
    assert!(satisfies(&Value::set(["a", "a", "b"]), &names));
    assert!(!satisfies(&Value::set([1]), &names));
}

#[test]
fn test_tuple_length_must_match() {
    let pair = tuple_of([builtins::int(), builtins::int()]);
    assert!(satisfies(&Value::tuple([1, 2]), &pair));
    assert!(!satisfies(&Value::tuple([1, 2, 3]), &pair));
    assert!(!satisfies(&Value::list([1, 2]), &pair));
}

#[test]
fn test_nested_containers() {
    let spec = mapping_of(builtins::str(), list_of(tuple_of([builtins::int()])));
    let value = Value::dict([("rows", Value::list([Value::tuple([1]), Value::tuple([2])]))]);
    assert!(satisfies(&value, &spec));

    let broken = Value::dict([("rows", Value::list([Value::tuple([1]), Value::tuple(["2"])]))]);
    assert!(!satisfies(&broken, &spec));
}

#[test]
fn test_container_literals() {
    let spec = TypeSpec::from_literal(SpecLiteral::list(SpecLiteral::set(builtins::int()))).unwrap();
    assert_eq!(spec, list_of(set_of(builtins::int())));

    let err = TypeSpec::from_literal(SpecLiteral::List(vec![
        SpecLiteral::from(builtins::int()),
        SpecLiteral::from(builtins::str()),
    ]))
    .unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidSpec(InvalidSpec::MalformedLiteral { container: "list", .. })
    ));
}

#[test]
fn test_container_covariance() {
    assert!(is_subtype(&list_of(builtins::bool()), &list_of(builtins::int())));
    assert!(!is_subtype(&list_of(builtins::int()), &list_of(builtins::bool())));
    assert!(is_subtype(
        &mapping_of(builtins::str(), builtins::bool()),
        &mapping_of(builtins::str(), number())
    ));
}

// ============================================================================
// Predicates and conjunction
// ============================================================================

fn is_positive(value: &Value) -> bool {
    matches!(value, Value::Int(n) if *n > 0)
}

#[test]
fn test_predicate_checks_values() {
    let spec = conform::predicate!(is_positive);
    assert!(satisfies(&Value::Int(3), &spec));
    assert!(!satisfies(&Value::Int(-1), &spec));
    assert!(!satisfies(&Value::str("3"), &spec));
    assert_eq!(spec.to_string(), "is_positive");
}

#[test]
fn test_conjunction() {
    let short = predicate("short", |v| v.as_str().is_some_and(|s| s.len() <= 3));
    let spec = ty(builtins::str()) & short;

    assert!(satisfies(&Value::str("abc"), &spec));
    assert!(!satisfies(&Value::str("abcd"), &spec));
    assert!(!satisfies(&Value::Int(1), &spec));
    assert!(is_subtype(&spec, &ty(builtins::str())));
}

#[test]
#[should_panic(expected = "predicate failed")]
fn test_predicate_panic_propagates() {
    let spec = predicate("explodes", |_| panic!("predicate failed"));
    let _ = satisfies(&Value::Int(1), &spec);
}
