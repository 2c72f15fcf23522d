//! Runtime values.
//!
//! `Value` is the datum every check inspects. Primitive values map onto the
//! builtin classes; `Object`, `Function` and `Class` values carry their own
//! class.
//!
//! Equality is value equality, not identity, except for objects, functions
//! and classes:
//! - `Int` and `Float` compare numerically (`1 == 1.0`)
//! - `Bool` never equals a number
//! - sets and dicts compare without regard to order

use crate::runtime::{Class, Function, Object, builtins, introspection};
use crate::spec::TypeSpec;
use std::fmt;
use std::sync::Arc;

/// A runtime value.
#[derive(Clone)]
pub enum Value {
    /// The absence of a value.
    None,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// A floating-point number.
    Float(f64),
    /// An immutable string.
    Str(Arc<str>),
    /// An ordered, homogeneous-by-convention sequence.
    List(Vec<Value>),
    /// A fixed-length sequence.
    Tuple(Vec<Value>),
    /// Distinct elements; construct with [`Value::set`] to deduplicate.
    Set(Vec<Value>),
    /// Key/value entries with distinct keys; construct with [`Value::dict`].
    Dict(Vec<(Value, Value)>),
    /// An instance of a user class.
    Object(Object),
    /// A callable.
    Function(Function),
    /// A class used as a value.
    Class(Class),
}

impl Value {
    /// Creates a string value.
    #[must_use]
    pub fn str(s: &str) -> Self {
        Value::Str(Arc::from(s))
    }

    /// Creates a list value.
    pub fn list<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    /// Creates a tuple value.
    pub fn tuple<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Value::Tuple(items.into_iter().map(Into::into).collect())
    }

    /// Creates a set value, dropping duplicate elements.
    pub fn set<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        let mut elements: Vec<Value> = Vec::new();
        for item in items {
            let item = item.into();
            if !elements.contains(&item) {
                elements.push(item);
            }
        }
        Value::Set(elements)
    }

    /// Creates a dict value; a repeated key replaces the earlier entry.
    pub fn dict<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Value>,
        V: Into<Value>,
    {
        let mut map: Vec<(Value, Value)> = Vec::new();
        for (key, value) in entries {
            let (key, value) = (key.into(), value.into());
            match map.iter_mut().find(|(existing, _)| *existing == key) {
                Some(entry) => entry.1 = value,
                None => map.push((key, value)),
            }
        }
        Value::Dict(map)
    }

    /// Returns the class of this value.
    ///
    /// Objects report their class, classes report `type`, and primitive
    /// values report the matching builtin class.
    #[must_use]
    pub fn class(&self) -> Class {
        match self {
            Value::None => builtins::none_type().clone(),
            Value::Bool(_) => builtins::bool().clone(),
            Value::Int(_) => builtins::int().clone(),
            Value::Float(_) => builtins::float().clone(),
            Value::Str(_) => builtins::str().clone(),
            Value::List(_) => builtins::list().clone(),
            Value::Tuple(_) => builtins::tuple().clone(),
            Value::Set(_) => builtins::set().clone(),
            Value::Dict(_) => builtins::dict().clone(),
            Value::Object(object) => object.class().clone(),
            Value::Function(_) => builtins::function().clone(),
            Value::Class(_) => builtins::type_().clone(),
        }
    }

    /// Checks whether this is `None`.
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Returns the callable inside a `Function` value.
    #[must_use]
    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Value::Function(function) => Some(function),
            _ => None,
        }
    }

    /// Returns the object inside an `Object` value.
    #[must_use]
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Returns the string inside a `Str` value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Reads an attribute the way attribute access would.
    ///
    /// See [`introspection::get_attribute`] for the lookup order.
    #[must_use]
    pub fn get_attr(&self, name: &str) -> Option<Value> {
        introspection::get_attribute(self, name)
    }

    /// Checks this value against a spec. Shorthand for
    /// [`crate::check::satisfies`].
    #[must_use]
    pub fn is_instance_of(&self, spec: &TypeSpec) -> bool {
        crate::check::satisfies(self, spec)
    }
}

fn same_elements(left: &[Value], right: &[Value]) -> bool {
    left.len() == right.len() && left.iter().all(|item| right.contains(item))
}

fn same_entries(left: &[(Value, Value)], right: &[(Value, Value)]) -> bool {
    left.len() == right.len()
        && left.iter().all(|(key, value)| {
            right
                .iter()
                .any(|(other_key, other_value)| key == other_key && value == other_value)
        })
}

/// Exact integer/float equality: the float must be a whole number inside
/// the `i64` range.
fn int_equals_float(int: i64, float: f64) -> bool {
    // 2^63, exactly representable; i64 covers [-2^63, 2^63).
    const BOUND: f64 = 9_223_372_036_854_775_808.0;
    if !float.is_finite() || float.fract() != 0.0 || float < -BOUND || float >= BOUND {
        return false;
    }
    float as i64 == int
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => {
                int_equals_float(*a, *b)
            }
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) | (Value::Tuple(a), Value::Tuple(b)) => a == b,
            (Value::Set(a), Value::Set(b)) => same_elements(a, b),
            (Value::Dict(a), Value::Dict(b)) => same_entries(a, b),
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => a == b,
            (Value::Class(a), Value::Class(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "{s:?}"),
            _ => fmt::Display::fmt(self, f),
        }
    }
}

fn write_seq(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item:?}")?;
    }
    Ok(())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => f.write_str("None"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x:?}"),
            Value::Str(s) => f.write_str(s),
            Value::List(items) => {
                f.write_str("[")?;
                write_seq(f, items)?;
                f.write_str("]")
            }
            Value::Tuple(items) => {
                f.write_str("(")?;
                write_seq(f, items)?;
                if items.len() == 1 {
                    f.write_str(",")?;
                }
                f.write_str(")")
            }
            Value::Set(items) => {
                f.write_str("{")?;
                write_seq(f, items)?;
                f.write_str("}")
            }
            Value::Dict(entries) => {
                f.write_str("{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key:?}: {value:?}")?;
                }
                f.write_str("}")
            }
            Value::Object(object) => write!(f, "<{} object>", object.class().name()),
            Value::Function(function) => write!(f, "<function {}>", function.name()),
            Value::Class(class) => write!(f, "<class {}>", class.name()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::str(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(Arc::from(s))
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<Object> for Value {
    fn from(object: Object) -> Self {
        Value::Object(object)
    }
}

impl From<Function> for Value {
    fn from(function: Function) -> Self {
        Value::Function(function)
    }
}

impl From<Class> for Value {
    fn from(class: Class) -> Self {
        Value::Class(class)
    }
}

impl From<&Class> for Value {
    fn from(class: &Class) -> Self {
        Value::Class(class.clone())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(option: Option<T>) -> Self {
        option.map_or(Value::None, Into::into)
    }
}
