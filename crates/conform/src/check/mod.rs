//! The conformance engine.
//!
//! Two queries, both total and infallible:
//!
//! - [`satisfies`]: does this live value conform to the spec?
//! - [`is_subtype`]: does every value described by one spec conform to
//!   another, judged from the specs alone?
//!
//! # Divergence between the two
//!
//! For `Plain`, `Union`, `Optional`, `Only` and `Any` targets,
//! `satisfies(v, s)` implies `is_subtype(&TypeSpec::from(v.class()), s)`.
//! Predicates, conjunctions, option sets, interface attributes and container
//! element specs are value-level: a class alone says nothing about them, so
//! `is_subtype` only accepts a candidate spec equal to the target there.
//!
//! # Example
//!
//! ```rust
//! use conform::runtime::{Value, builtins};
//! use conform::spec::{TypeSpec, only, optional, union};
//! use conform::{is_subtype, satisfies};
//!
//! let maybe_int = optional(builtins::int());
//! assert!(satisfies(&Value::None, &maybe_int));
//! assert!(satisfies(&Value::Bool(true), &maybe_int));
//! assert!(!satisfies(&Value::Bool(true), &only(builtins::int())));
//!
//! let number = union([builtins::int(), builtins::float()]).unwrap();
//! assert!(is_subtype(&TypeSpec::from(builtins::bool()), &number));
//! assert!(!is_subtype(&number, &TypeSpec::from(builtins::int())));
//! ```

mod matcher;

pub use matcher::signature_conforms;

use crate::runtime::{Class, Value, builtins};
use crate::spec::{SpecKind, TypeSpec};

/// Checks whether `value` conforms to `spec`.
///
/// A panic raised by a predicate propagates to the caller.
#[must_use]
pub fn satisfies(value: &Value, spec: &TypeSpec) -> bool {
    match spec.kind() {
        SpecKind::Any => true,
        SpecKind::Plain(class) => is_instance(value, class),
        SpecKind::Predicate(predicate) => predicate.test(value),
        SpecKind::And(left, right) => satisfies(value, left) && satisfies(value, right),
        SpecKind::Union(members) => members.iter().any(|member| satisfies(value, member)),
        SpecKind::Interface(interface) => matcher::value_implements(value, interface),
        SpecKind::Signature(signature) => matcher::callable_conforms(value, signature),
        SpecKind::List(element) => match value {
            Value::List(items) => items.iter().all(|item| satisfies(item, element)),
            _ => false,
        },
        SpecKind::Set(element) => match value {
            Value::Set(items) => items.iter().all(|item| satisfies(item, element)),
            _ => false,
        },
        SpecKind::Tuple(elements) => match value {
            Value::Tuple(items) => {
                items.len() == elements.len()
                    && items
                        .iter()
                        .zip(elements)
                        .all(|(item, element)| satisfies(item, element))
            }
            _ => false,
        },
        SpecKind::Mapping { key, value: entry } => match value {
            Value::Dict(entries) => entries
                .iter()
                .all(|(k, v)| satisfies(k, key) && satisfies(v, entry)),
            _ => false,
        },
        SpecKind::Optional(inner) => value.is_none() || satisfies(value, inner),
        SpecKind::Only(class) => value.class() == *class,
        SpecKind::Options(values) => values.iter().any(|option| option == value),
    }
}

fn is_instance(value: &Value, class: &Class) -> bool {
    match value {
        Value::Object(object) => object.class().is_subclass_of(class),
        _ => value.class().is_subclass_of(class),
    }
}

fn is_none_type(spec: &TypeSpec) -> bool {
    match spec.kind() {
        SpecKind::Plain(class) | SpecKind::Only(class) => class == builtins::none_type(),
        _ => false,
    }
}

/// Checks whether every value described by `candidate` conforms to
/// `target`, judged from the specs alone.
///
/// Lift a class into a spec with `TypeSpec::from(class)`.
#[must_use]
pub fn is_subtype(candidate: &TypeSpec, target: &TypeSpec) -> bool {
    if candidate == target {
        return true;
    }

    match (candidate.kind(), target.kind()) {
        (_, SpecKind::Any) => true,
        (_, SpecKind::Plain(class)) if class == builtins::object() => true,

        (SpecKind::Union(members), _) => members.iter().all(|member| is_subtype(member, target)),
        (SpecKind::Optional(inner), _) => {
            is_subtype(&TypeSpec::from(builtins::none_type()), target) && is_subtype(inner, target)
        }
        (SpecKind::Options(values), _) => values.iter().all(|value| satisfies(value, target)),
        (SpecKind::And(left, right), _) => is_subtype(left, target) || is_subtype(right, target),

        (_, SpecKind::Union(members)) => members.iter().any(|member| is_subtype(candidate, member)),
        (_, SpecKind::Optional(inner)) => is_none_type(candidate) || is_subtype(candidate, inner),

        (SpecKind::Plain(class) | SpecKind::Only(class), SpecKind::Plain(parent)) => {
            class.is_subclass_of(parent)
        }
        (SpecKind::Plain(class) | SpecKind::Only(class), SpecKind::Only(exact)) => class == exact,
        (SpecKind::Plain(class) | SpecKind::Only(class), SpecKind::Interface(interface)) => {
            matcher::class_implements(class, interface)
        }
        (SpecKind::Interface(narrow), SpecKind::Interface(wide)) => {
            matcher::interface_extends(narrow, wide)
        }
        (SpecKind::Signature(narrow), SpecKind::Signature(wide)) => {
            signature_conforms(narrow, wide)
        }

        (SpecKind::List(narrow), SpecKind::List(wide))
        | (SpecKind::Set(narrow), SpecKind::Set(wide)) => is_subtype(narrow, wide),
        (SpecKind::Tuple(narrow), SpecKind::Tuple(wide)) => {
            narrow.len() == wide.len()
                && narrow.iter().zip(wide).all(|(n, w)| is_subtype(n, w))
        }
        (
            SpecKind::Mapping { key: nk, value: nv },
            SpecKind::Mapping { key: wk, value: wv },
        ) => is_subtype(nk, wk) && is_subtype(nv, wv),

        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{ClassBuilder, Object};
    use crate::spec::{
        any, list_of, mapping_of, only, optional, options, predicate, set_of, tuple_of, union,
    };
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn spec(class: &Class) -> TypeSpec {
        TypeSpec::from(class)
    }

    #[test]
    fn test_plain_types() {
        let int = spec(builtins::int());
        assert!(satisfies(&Value::Int(5), &int));
        assert!(!satisfies(&Value::str("5"), &int));
        assert!(satisfies(&Value::Bool(true), &int));
        assert!(!satisfies(&Value::Float(5.0), &int));
    }

    #[test]
    fn test_user_class_instances() {
        let event = ClassBuilder::new("Event").build();
        let click = ClassBuilder::new("Click").extends(&event).build();
        let value = Value::from(Object::new(&click));

        assert!(satisfies(&value, &spec(&event)));
        assert!(satisfies(&value, &spec(builtins::object())));
        assert!(!satisfies(&Value::from(Object::new(&event)), &spec(&click)));
    }

    #[test]
    fn test_only_rejects_subclasses() {
        let exact = only(builtins::int());
        assert!(satisfies(&Value::Int(1), &exact));
        assert!(!satisfies(&Value::Bool(true), &exact));
    }

    #[test]
    fn test_options_by_value() {
        let spec = options([1, 2]);
        assert!(satisfies(&Value::Int(1), &spec));
        assert!(satisfies(&Value::Float(2.0), &spec));
        assert!(!satisfies(&Value::Int(3), &spec));
        assert!(!satisfies(&Value::Bool(true), &spec));
    }

    #[test]
    fn test_and_short_circuits() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let never = predicate("never", |_| false);
        let counted = predicate("counted", move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            true
        });

        assert!(!satisfies(&Value::Int(1), &(never & counted)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_containers() {
        let ints = list_of(builtins::int());
        assert!(satisfies(&Value::list([1, 2, 3]), &ints));
        assert!(satisfies(&Value::list(Vec::<Value>::new()), &ints));
        assert!(!satisfies(&Value::list([Value::Int(1), Value::str("a")]), &ints));
        assert!(!satisfies(&Value::tuple([1]), &ints));

        let strs = set_of(builtins::str());
        assert!(satisfies(&Value::set(["a", "b"]), &strs));
        assert!(!satisfies(&Value::list(["a"]), &strs));

        let pair = tuple_of([builtins::int(), builtins::str()]);
        assert!(satisfies(&Value::tuple([Value::Int(1), Value::str("a")]), &pair));
        assert!(!satisfies(&Value::tuple([1]), &pair));

        let table = mapping_of(builtins::str(), builtins::int());
        assert!(satisfies(&Value::dict([("a", 1)]), &table));
        assert!(!satisfies(&Value::dict([("a", "b")]), &table));
        assert!(!satisfies(&Value::list([1]), &table));
    }

    #[test]
    fn test_any_is_top() {
        assert!(satisfies(&Value::None, &any()));
        assert!(is_subtype(&list_of(builtins::int()), &any()));
        assert!(!is_subtype(&any(), &spec(builtins::int())));
    }

    #[test]
    fn test_subtype_unions() {
        let int = spec(builtins::int());
        let number = union([builtins::int(), builtins::float()]).unwrap();
        let wide = union([builtins::int(), builtins::float(), builtins::str()]).unwrap();

        assert!(is_subtype(&int, &number));
        assert!(is_subtype(&number, &wide));
        assert!(!is_subtype(&wide, &number));
    }

    #[test]
    fn test_subtype_optional() {
        let none = spec(builtins::none_type());
        let maybe_int = optional(builtins::int());
        assert!(is_subtype(&none, &maybe_int));
        assert!(is_subtype(&spec(builtins::bool()), &maybe_int));
        assert!(is_subtype(&maybe_int, &optional(builtins::int())));
        assert!(!is_subtype(&maybe_int, &spec(builtins::int())));

        let none_or_int = union([builtins::none_type(), builtins::int()]).unwrap();
        assert!(is_subtype(&maybe_int, &none_or_int));
    }

    #[test]
    fn test_subtype_only_and_containers() {
        assert!(is_subtype(&only(builtins::bool()), &spec(builtins::int())));
        assert!(!is_subtype(&spec(builtins::bool()), &only(builtins::int())));

        assert!(is_subtype(&list_of(builtins::bool()), &list_of(builtins::int())));
        assert!(!is_subtype(&list_of(builtins::int()), &set_of(builtins::int())));
        assert!(!is_subtype(
            &tuple_of([builtins::int()]),
            &tuple_of([builtins::int(), builtins::int()])
        ));
    }

    #[test]
    fn test_predicates_are_value_level() {
        let positive = predicate("positive", |v| matches!(v, Value::Int(n) if *n > 0));
        assert!(satisfies(&Value::Int(1), &positive));
        assert!(!is_subtype(&spec(builtins::int()), &positive));
        assert!(is_subtype(&positive, &positive));
    }

    #[test]
    fn test_options_subtype_by_members() {
        assert!(is_subtype(&options([1, 2]), &spec(builtins::int())));
        assert!(!is_subtype(&options([Value::Int(1), Value::str("a")]), &spec(builtins::int())));
    }
}
