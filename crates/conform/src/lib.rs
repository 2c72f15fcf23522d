//! # conform
//!
//! Runtime structural type conformance for a dynamic object model.
//!
//! `conform` describes sets of acceptable values with [`TypeSpec`]s and
//! answers two questions about them:
//! - does this value conform? ([`satisfies`])
//! - does every value of this spec conform to that one? ([`is_subtype`])
//!
//! Beyond plain nominal types it supports unions, structural interfaces,
//! callable typedefs, container shapes, predicates and their conjunction,
//! `optional`, `only` and `options`. Annotated functions can be wrapped so
//! that every call is checked ([`typechecked`]), and same-named functions can
//! be dispatched on their annotations ([`Overloaded`]).
//!
//! ## Architecture
//!
//! - **runtime**: the host object model (classes, objects, functions, values)
//!   and its introspection probes
//! - **spec**: the spec model, signatures, interfaces and literal shorthand
//! - **check**: the conformance engine and the structural matcher
//! - **enforce**: call-site enforcement
//! - **overload**: annotation-based dispatch
//! - **error**: the crate-wide [`Error`] type
//!
//! ## Example
//!
//! ```rust
//! use conform::runtime::{ClassBuilder, Method, Object, Value, builtins};
//! use conform::spec::{Interface, Signature, TypeSpec};
//! use conform::satisfies;
//!
//! let say_hello = Signature::builder()
//!     .param("name", builtins::str())
//!     .returns(builtins::str())
//!     .build()
//!     .unwrap();
//!
//! let greeter = Interface::builder("Greeter")
//!     .attribute("name", builtins::str())
//!     .method("say_hello", say_hello.clone())
//!     .build()
//!     .unwrap();
//!
//! let developer = ClassBuilder::new("Developer")
//!     .method(Method::new("say_hello", say_hello, |_, args| {
//!         Ok(Value::str(&format!("hello {}", args[0])))
//!     }))
//!     .build();
//!
//! let bob = Object::new(&developer).with_attr("name", "Bob");
//! assert!(satisfies(&Value::from(bob.clone()), &TypeSpec::from(&greeter)));
//!
//! bob.remove_attr("name");
//! assert!(!satisfies(&Value::from(bob), &TypeSpec::from(&greeter)));
//! ```
//!
//! ## Logging
//!
//! Diagnostics go through `conform-log`. Set `CONFORM_LOG=trace` to see why a
//! structural check failed.

pub mod check;
pub mod enforce;
pub mod error;
pub mod overload;
pub mod runtime;
pub mod spec;

pub use check::{is_subtype, satisfies};
pub use enforce::{EnforceConfig, Enforcer, typechecked};
pub use error::{Error, InvalidSpec, Result};
pub use overload::Overloaded;
pub use runtime::{Args, Class, ClassBuilder, Function, Method, Object, Value};
pub use spec::{
    Interface, Param, Signature, SpecKind, SpecLiteral, TypeSpec, any, list_of, mapping_of, only,
    optional, options, predicate, set_of, tuple_of, typedef, union,
};
