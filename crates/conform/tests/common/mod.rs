// Common test utilities for integration tests
//
// This module provides shared helper functions and test fixtures
// for use across all integration tests.

#![allow(dead_code)]

use conform::runtime::{Class, ClassBuilder, Function, Method, Object, Value, builtins};
use conform::spec::{Interface, Signature, TypeSpec};
use std::sync::atomic::{AtomicUsize, Ordering};

static TEST_ID: AtomicUsize = AtomicUsize::new(0);

/// Generates a class name no other test uses
pub fn unique_name(prefix: &str) -> String {
    let id = TEST_ID.fetch_add(1, Ordering::SeqCst);
    format!("{prefix}_{id}")
}

/// Creates an empty class deriving from `object`
pub fn create_test_class(prefix: &str) -> Class {
    ClassBuilder::new(&unique_name(prefix)).build()
}

/// Creates an empty class deriving from `parent`
pub fn create_test_subclass(prefix: &str, parent: &Class) -> Class {
    ClassBuilder::new(&unique_name(prefix)).extends(parent).build()
}

/// Builds a signature from `(name, annotation)` pairs and an optional
/// return spec
pub fn sig(params: &[(&str, Option<TypeSpec>)], returns: Option<TypeSpec>) -> Signature {
    let mut builder = Signature::builder();
    for (name, annotation) in params {
        builder = match annotation {
            Some(spec) => builder.param(name, spec.clone()),
            None => builder.untyped(name),
        };
    }
    if let Some(returns) = returns {
        builder = builder.returns(returns);
    }
    builder.build().expect("Failed to build test signature")
}

/// Shorthand for the spec of a class
pub fn ty(class: &Class) -> TypeSpec {
    TypeSpec::from(class)
}

/// Creates a method that returns `None`
pub fn noop_method(name: &str, signature: Signature) -> Method {
    Method::new(name, signature, |_, _| Ok(Value::None))
}

/// Creates a function that returns its first argument, or `None`
pub fn echo_function(name: &str, signature: Signature) -> Function {
    Function::new(name, signature, |args| {
        Ok(args.first().cloned().unwrap_or(Value::None))
    })
}

/// Creates a class providing a single method
pub fn class_with_method(prefix: &str, method: Method) -> Class {
    ClassBuilder::new(&unique_name(prefix)).method(method).build()
}

/// Wraps a fresh instance of `class` as a value
pub fn instance(class: &Class) -> Value {
    Value::from(Object::new(class))
}

/// `say_hello(name: str) -> str`
pub fn say_hello_signature() -> Signature {
    sig(
        &[("name", Some(ty(builtins::str())))],
        Some(ty(builtins::str())),
    )
}

/// Interface with `name: str`, `age: int` and `say_hello(name: str) -> str`
pub fn greeter_interface() -> Interface {
    Interface::builder("Greeter")
        .attribute("name", builtins::str())
        .attribute("age", builtins::int())
        .method("say_hello", say_hello_signature())
        .build()
        .expect("Failed to build greeter interface")
}

/// A class implementing `say_hello` and an instance carrying `name` and `age`
pub fn developer() -> (Class, Object) {
    let class = ClassBuilder::new(&unique_name("Developer"))
        .method(Method::new("say_hello", say_hello_signature(), |receiver, args| {
            let own = receiver.get_attr("name").unwrap_or(Value::None);
            Ok(Value::str(&format!("hello {}, I am {own}", args[0])))
        }))
        .build();
    let object = Object::new(&class)
        .with_attr("name", "Bob")
        .with_attr("age", 42);
    (class, object)
}
