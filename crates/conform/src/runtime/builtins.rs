//! Builtin classes.
//!
//! Every primitive [`Value`] variant maps to one of these classes, and every
//! class ultimately inherits from [`object`]. `bool` is a subclass of `int`,
//! so `True` satisfies an `int` spec while `only(int)` rejects it.
//!
//! The container classes (`str`, `list`, `tuple`, `set`, `dict`) carry opaque
//! `len` and `contains` methods. They make builtin values usable against
//! interfaces such as "has a `len` method" without declaring signatures.

use crate::error::{Error, Result};
use crate::runtime::{Class, ClassBuilder, Method, Value};
use std::sync::OnceLock;

struct Builtins {
    object: Class,
    none_type: Class,
    int: Class,
    bool: Class,
    float: Class,
    str: Class,
    list: Class,
    tuple: Class,
    set: Class,
    dict: Class,
    function: Class,
    type_: Class,
}

static BUILTINS: OnceLock<Builtins> = OnceLock::new();

fn items_of(receiver: &Value) -> Option<usize> {
    match receiver {
        Value::Str(s) => Some(s.chars().count()),
        Value::List(items) | Value::Tuple(items) | Value::Set(items) => Some(items.len()),
        Value::Dict(entries) => Some(entries.len()),
        _ => None,
    }
}

fn len_method() -> Method {
    Method::opaque("len", |receiver, args| {
        if !args.is_empty() {
            return Err(Error::ArgumentCountMismatch {
                expected: 0,
                got: args.len(),
            });
        }
        let len = items_of(receiver).ok_or_else(|| Error::CallFailed {
            function: "len".to_string(),
            reason: format!("{} has no length", receiver.class().name()),
        })?;
        Ok(Value::Int(i64::try_from(len).unwrap_or(i64::MAX)))
    })
}

fn contains_method() -> Method {
    Method::opaque("contains", |receiver, args| {
        let [item] = args else {
            return Err(Error::ArgumentCountMismatch {
                expected: 1,
                got: args.len(),
            });
        };
        let found = match (receiver, item) {
            (Value::Str(haystack), Value::Str(needle)) => haystack.contains(&**needle),
            (Value::List(items) | Value::Tuple(items) | Value::Set(items), _) => {
                items.contains(item)
            }
            (Value::Dict(entries), _) => entries.iter().any(|(key, _)| key == item),
            _ => false,
        };
        Ok(Value::Bool(found))
    })
}

fn container(name: &str, object: &Class) -> Class {
    ClassBuilder::subclass(name, object)
        .method(len_method())
        .method(contains_method())
        .build()
}

fn table() -> &'static Builtins {
    BUILTINS.get_or_init(|| {
        let object = Class::new_root("object");
        let leaf = |name: &str| ClassBuilder::subclass(name, &object).build();

        let int = leaf("int");
        let bool = ClassBuilder::subclass("bool", &int).build();

        Builtins {
            none_type: leaf("NoneType"),
            float: leaf("float"),
            function: leaf("function"),
            type_: leaf("type"),
            str: container("str", &object),
            list: container("list", &object),
            tuple: container("tuple", &object),
            set: container("set", &object),
            dict: container("dict", &object),
            int,
            bool,
            object,
        }
    })
}

/// The root class.
#[must_use]
pub fn object() -> &'static Class {
    &table().object
}

/// The class of `None`.
#[must_use]
pub fn none_type() -> &'static Class {
    &table().none_type
}

/// The class of integers.
#[must_use]
pub fn int() -> &'static Class {
    &table().int
}

/// The class of booleans, a subclass of `int`.
#[must_use]
pub fn bool() -> &'static Class {
    &table().bool
}

/// The class of floats.
#[must_use]
pub fn float() -> &'static Class {
    &table().float
}

/// The class of strings.
#[must_use]
pub fn str() -> &'static Class {
    &table().str
}

/// The class of lists.
#[must_use]
pub fn list() -> &'static Class {
    &table().list
}

/// The class of tuples.
#[must_use]
pub fn tuple() -> &'static Class {
    &table().tuple
}

/// The class of sets.
#[must_use]
pub fn set() -> &'static Class {
    &table().set
}

/// The class of dicts.
#[must_use]
pub fn dict() -> &'static Class {
    &table().dict
}

/// The class of functions.
#[must_use]
pub fn function() -> &'static Class {
    &table().function
}

/// The class of classes.
#[must_use]
pub fn type_() -> &'static Class {
    &table().type_
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::Args;

    #[test]
    fn test_builtins_are_stable() {
        assert_eq!(int(), int());
        assert_eq!(int().name(), "int");
        assert_eq!(none_type().name(), "NoneType");
    }

    #[test]
    fn test_hierarchy() {
        assert!(bool().is_subclass_of(int()));
        assert!(!int().is_subclass_of(bool()));
        assert!(float().is_subclass_of(object()));
        assert!(!float().is_subclass_of(int()));
    }

    #[test]
    fn test_len_method() {
        let value = Value::list([1, 2, 3]);
        let len = value.get_attr("len").unwrap();
        let result = len.as_function().unwrap().call(Args::new()).unwrap();
        assert_eq!(result, Value::Int(3));

        let text = Value::str("héllo");
        let len = text.get_attr("len").unwrap();
        let result = len.as_function().unwrap().call(Args::new()).unwrap();
        assert_eq!(result, Value::Int(5));
    }

    #[test]
    fn test_contains_method() {
        let dict = Value::dict([("a", 1)]);
        let contains = dict.get_attr("contains").unwrap();
        let function = contains.as_function().unwrap();
        assert_eq!(function.call(Args::new().arg("a")).unwrap(), Value::Bool(true));
        assert_eq!(function.call(Args::new().arg("b")).unwrap(), Value::Bool(false));
        assert!(function.call(Args::new()).is_err());
    }

    #[test]
    fn test_numbers_have_no_len() {
        assert!(Value::Int(1).get_attr("len").is_none());
    }
}
