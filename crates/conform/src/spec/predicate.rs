//! Value-level combinators: predicates, `optional`, `only` and `options`.
//!
//! These specs look at the value itself rather than its class, so the
//! type-level relation [`is_subtype`](crate::check::is_subtype) can say
//! little about them. Only `optional` has a type-level reading (`None` or the
//! inner spec).

use crate::runtime::{Class, Value};
use crate::spec::{SpecKind, TypeSpec};
use std::fmt;
use std::sync::Arc;

/// Predicate test function.
pub type PredicateFn = dyn Fn(&Value) -> bool + Send + Sync;

/// A named boolean test over values.
///
/// Two predicates are equal only if they share the same test closure.
#[derive(Clone)]
pub struct Predicate {
    name: Arc<str>,
    test: Arc<PredicateFn>,
}

impl Predicate {
    pub(crate) fn new<F>(name: &str, test: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self {
            name: Arc::from(name),
            test: Arc::new(test),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs the test. A panic inside the test propagates to the caller.
    #[must_use]
    pub fn test(&self, value: &Value) -> bool {
        (self.test)(value)
    }
}

impl PartialEq for Predicate {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.test, &other.test)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Predicate({})", self.name)
    }
}

/// The spec every value satisfies.
#[must_use]
pub fn any() -> TypeSpec {
    TypeSpec::new(SpecKind::Any)
}

/// Wraps a boolean test as a spec.
///
/// # Example
///
/// ```rust
/// use conform::runtime::{Value, builtins};
/// use conform::spec::{TypeSpec, predicate};
/// use conform::satisfies;
///
/// let positive = predicate("positive", |v| matches!(v, Value::Int(n) if *n > 0));
/// let positive_int = TypeSpec::from(builtins::int()) & positive;
///
/// assert!(satisfies(&Value::Int(3), &positive_int));
/// assert!(!satisfies(&Value::Int(-3), &positive_int));
/// ```
pub fn predicate<F>(name: &str, test: F) -> TypeSpec
where
    F: Fn(&Value) -> bool + Send + Sync + 'static,
{
    TypeSpec::new(SpecKind::Predicate(Predicate::new(name, test)))
}

/// Builds a predicate spec from a function path, naming it after the path.
///
/// ```rust
/// use conform::runtime::Value;
///
/// fn is_even(value: &Value) -> bool {
///     matches!(value, Value::Int(n) if n % 2 == 0)
/// }
///
/// let even = conform::predicate!(is_even);
/// assert_eq!(even.to_string(), "is_even");
/// ```
#[macro_export]
macro_rules! predicate {
    ($test:path) => {
        $crate::spec::predicate(stringify!($test), $test)
    };
}

/// Accepts `None` or any value satisfying `inner`.
#[must_use]
pub fn optional(inner: impl Into<TypeSpec>) -> TypeSpec {
    TypeSpec::new(SpecKind::Optional(inner.into()))
}

/// Accepts instances of exactly `class`, rejecting subclasses.
#[must_use]
pub fn only(class: &Class) -> TypeSpec {
    TypeSpec::new(SpecKind::Only(class.clone()))
}

/// Accepts values equal to one of `values`. Duplicates are dropped.
pub fn options<I, T>(values: I) -> TypeSpec
where
    I: IntoIterator<Item = T>,
    T: Into<Value>,
{
    let mut distinct: Vec<Value> = Vec::new();
    for value in values {
        let value = value.into();
        if !distinct.contains(&value) {
            distinct.push(value);
        }
    }
    TypeSpec::new(SpecKind::Options(distinct))
}
