//! Host runtime: the dynamic object model the engine checks values against.
//!
//! Rust has no built-in reflection over arbitrary values, so this module
//! supplies the capabilities a dynamic host would provide for free:
//!
//! - [`class`]: classes with single inheritance, class attributes and methods
//! - [`object`]: instances with a mutable attribute table
//! - [`function`]: callables with inspectable signatures and argument binding
//! - [`value`]: the runtime datum (`Value`) and its value equality
//! - [`builtins`]: classes for primitive values (`int`, `bool`, `str`, ...)
//! - [`introspection`]: the probes the conformance engine relies on
//!
//! Classes, functions and methods are immutable `Arc` handles. Objects keep
//! their attributes behind an `RwLock`, so an object can be mutated and
//! checked from several threads.
//!
//! # Example
//!
//! ```rust
//! use conform::runtime::{ClassBuilder, Object, Value, builtins};
//!
//! let point = ClassBuilder::new("Point").build();
//! let origin = Object::new(&point)
//!     .with_attr("x", 0)
//!     .with_attr("y", 0);
//!
//! let value = Value::from(origin);
//! assert!(value.class().is_subclass_of(builtins::object()));
//! assert_eq!(value.get_attr("x"), Some(Value::Int(0)));
//! ```

pub mod builtins;
pub mod class;
pub mod function;
pub mod introspection;
pub mod object;
pub mod value;

pub use class::{Class, ClassBuilder, Method, MethodImp};
pub use function::{Args, Function, NativeImp};
pub use introspection::{
    CallableProbe, StaticMember, class_hierarchy, get_attribute,
    has_attribute, instance_methods, is_subclass, lookup_static,
    probe_callable,
};
pub use object::Object;
pub use value::Value;

use std::sync::{LockResult, PoisonError};

/// Recovers the guard from a poisoned lock.
///
/// Attribute tables hold plain data, so a panic while a guard was held
/// cannot leave them half-updated.
pub(crate) fn recover<G>(result: LockResult<G>) -> G {
    result.unwrap_or_else(PoisonError::into_inner)
}
