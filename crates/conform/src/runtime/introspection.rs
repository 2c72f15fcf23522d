//! Introspection over the host runtime.
//!
//! These are the probes the conformance engine is built on: attribute
//! lookup on a live value, static member lookup on a class, callable
//! signature probing and inheritance queries.
//!
//! # Example
//!
//! ```rust
//! use conform::runtime::{ClassBuilder, builtins, class_hierarchy, is_subclass};
//!
//! let animal = ClassBuilder::new("Animal").build();
//! let dog = ClassBuilder::new("Dog").extends(&animal).build();
//!
//! let names: Vec<_> = class_hierarchy(&dog).iter().map(|c| c.name().to_string()).collect();
//! assert_eq!(names, ["Dog", "Animal", "object"]);
//! assert!(is_subclass(&dog, builtins::object()));
//! ```

use crate::runtime::{Class, Method, Value};
use crate::spec::Signature;
use fxhash::FxHashMap;

/// Returns the inheritance chain from `class` up to `object`, inclusive.
#[must_use]
pub fn class_hierarchy(class: &Class) -> Vec<Class> {
    let mut hierarchy = Vec::new();
    let mut current = Some(class);
    while let Some(class) = current {
        hierarchy.push(class.clone());
        current = class.super_class();
    }
    hierarchy
}

/// Checks whether `child` is `parent` or inherits from it.
#[must_use]
pub fn is_subclass(child: &Class, parent: &Class) -> bool {
    child.is_subclass_of(parent)
}

/// Returns every method an instance of `class` responds to, with
/// overrides resolved, sorted by name.
#[must_use]
pub fn instance_methods(class: &Class) -> Vec<Method> {
    let mut seen: FxHashMap<String, Method> = FxHashMap::default();
    for class in class_hierarchy(class) {
        for method in class.own_methods() {
            seen.entry(method.name().to_string())
                .or_insert_with(|| method.clone());
        }
    }
    let mut methods: Vec<Method> = seen.into_values().collect();
    methods.sort_by(|a, b| a.name().cmp(b.name()));
    methods
}

/// Reads attribute `name` from a live value.
///
/// Lookup order:
/// 1. instance attributes (objects only)
/// 2. class attributes along the inheritance chain
/// 3. methods along the inheritance chain, bound to the value
///
/// For a `Class` value the class's own members are looked up instead, and
/// methods come back unbound with a leading `self` parameter.
#[must_use]
pub fn get_attribute(value: &Value, name: &str) -> Option<Value> {
    if let Value::Class(class) = value {
        return match lookup_static(class, name)? {
            StaticMember::Attribute(attribute) => Some(attribute),
            StaticMember::Method(method) => Some(Value::Function(method.unbound())),
        };
    }

    if let Value::Object(object) = value {
        if let Some(attribute) = object.instance_attr(name) {
            return Some(attribute);
        }
    }

    let class = value.class();
    if let Some(attribute) = class.lookup_attribute(name) {
        return Some(attribute.clone());
    }
    class
        .lookup_method(name)
        .map(|method| Value::Function(method.bind(value.clone())))
}

/// Checks whether a live value has attribute `name`.
#[must_use]
pub fn has_attribute(value: &Value, name: &str) -> bool {
    get_attribute(value, name).is_some()
}

/// A member found on a class without an instance.
#[derive(Debug, Clone)]
pub enum StaticMember {
    /// A class attribute.
    Attribute(Value),
    /// A method, not bound to any receiver.
    Method(Method),
}

/// Looks up `name` on a class: class attributes first, then methods.
#[must_use]
pub fn lookup_static(class: &Class, name: &str) -> Option<StaticMember> {
    if let Some(attribute) = class.lookup_attribute(name) {
        return Some(StaticMember::Attribute(attribute.clone()));
    }
    class
        .lookup_method(name)
        .map(|method| StaticMember::Method(method.clone()))
}

/// Result of probing a value for a callable signature.
#[derive(Debug, Clone, Copy)]
pub enum CallableProbe<'a> {
    /// The value cannot be called.
    NotCallable,
    /// The value is callable but its signature cannot be inspected.
    Opaque,
    /// The value is callable with this signature.
    Inspected(&'a Signature),
}

/// Probes a value for a callable signature.
///
/// Only `Function` values are callable; classes are not treated as
/// constructors.
#[must_use]
pub fn probe_callable(value: &Value) -> CallableProbe<'_> {
    match value {
        Value::Function(function) => match function.signature() {
            Some(signature) => CallableProbe::Inspected(signature),
            None => CallableProbe::Opaque,
        },
        _ => CallableProbe::NotCallable,
    }
}
