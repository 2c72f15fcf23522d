//! Literal shorthand for container specs.
//!
//! A literal is a nested description such as "a list of int" or "a mapping
//! from str to a tuple of (int, bool)". [`TypeSpec::from_literal`] converts
//! it into the equivalent spec. Every leaf must be a class or an existing
//! spec; a plain value leaf is rejected.
//!
//! | literal                 | spec                        |
//! |-------------------------|-----------------------------|
//! | `List([T])`             | list whose elements are `T` |
//! | `Set([T])`              | set whose elements are `T`  |
//! | `Tuple([T1, .., Tn])`   | tuple of exactly n elements |
//! | `Map([(K, V)])`         | mapping from `K` to `V`     |
//!
//! `Value` containers holding classes are read the same way, so
//! `Value::list([builtins::int()])` is also "a list of int".

use crate::error::{InvalidSpec, Result};
use crate::runtime::{Class, Value};
use crate::spec::{Interface, SpecKind, TypeSpec};

/// A nested spec description.
#[derive(Debug, Clone)]
pub enum SpecLiteral {
    /// An existing spec.
    Spec(TypeSpec),
    /// A runtime value: a class, or a container of classes.
    Value(Value),
    /// List literal; must hold exactly one element spec.
    List(Vec<SpecLiteral>),
    /// Set literal; must hold exactly one element spec.
    Set(Vec<SpecLiteral>),
    /// Tuple literal; one spec per position.
    Tuple(Vec<SpecLiteral>),
    /// Mapping literal; must hold exactly one key/value pair.
    Map(Vec<(SpecLiteral, SpecLiteral)>),
}

impl SpecLiteral {
    /// "A list of `element`".
    #[must_use]
    pub fn list(element: impl Into<SpecLiteral>) -> Self {
        SpecLiteral::List(vec![element.into()])
    }

    /// "A set of `element`".
    #[must_use]
    pub fn set(element: impl Into<SpecLiteral>) -> Self {
        SpecLiteral::Set(vec![element.into()])
    }

    /// "A tuple of exactly these elements".
    pub fn tuple<I, T>(elements: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<SpecLiteral>,
    {
        SpecLiteral::Tuple(elements.into_iter().map(Into::into).collect())
    }

    /// "A mapping from `key` to `value`".
    #[must_use]
    pub fn map(key: impl Into<SpecLiteral>, value: impl Into<SpecLiteral>) -> Self {
        SpecLiteral::Map(vec![(key.into(), value.into())])
    }
}

impl From<TypeSpec> for SpecLiteral {
    fn from(spec: TypeSpec) -> Self {
        SpecLiteral::Spec(spec)
    }
}

impl From<&TypeSpec> for SpecLiteral {
    fn from(spec: &TypeSpec) -> Self {
        SpecLiteral::Spec(spec.clone())
    }
}

impl From<Class> for SpecLiteral {
    fn from(class: Class) -> Self {
        SpecLiteral::Spec(TypeSpec::from(class))
    }
}

impl From<&Class> for SpecLiteral {
    fn from(class: &Class) -> Self {
        SpecLiteral::Spec(TypeSpec::from(class))
    }
}

impl From<Interface> for SpecLiteral {
    fn from(interface: Interface) -> Self {
        SpecLiteral::Spec(TypeSpec::from(interface))
    }
}

impl From<Value> for SpecLiteral {
    fn from(value: Value) -> Self {
        SpecLiteral::Value(value)
    }
}

fn single(
    container: &'static str,
    mut items: Vec<SpecLiteral>,
) -> std::result::Result<TypeSpec, InvalidSpec> {
    if items.len() != 1 {
        return Err(InvalidSpec::MalformedLiteral {
            container,
            expected: 1,
            got: items.len(),
        });
    }
    match items.pop() {
        Some(item) => to_spec(item),
        None => Err(InvalidSpec::MalformedLiteral {
            container,
            expected: 1,
            got: 0,
        }),
    }
}

fn value_literal(value: Value) -> std::result::Result<TypeSpec, InvalidSpec> {
    let wrap = |items: Vec<Value>| -> Vec<SpecLiteral> {
        items.into_iter().map(SpecLiteral::Value).collect()
    };
    match value {
        Value::Class(class) => Ok(TypeSpec::from(class)),
        Value::List(items) => to_spec(SpecLiteral::List(wrap(items))),
        Value::Set(items) => to_spec(SpecLiteral::Set(wrap(items))),
        Value::Tuple(items) => to_spec(SpecLiteral::Tuple(wrap(items))),
        Value::Dict(entries) => to_spec(SpecLiteral::Map(
            entries
                .into_iter()
                .map(|(key, value)| (SpecLiteral::Value(key), SpecLiteral::Value(value)))
                .collect(),
        )),
        other => Err(InvalidSpec::NotAType {
            found: format!("{other:?}"),
        }),
    }
}

/// Converts a literal into a spec.
pub(crate) fn to_spec(literal: SpecLiteral) -> std::result::Result<TypeSpec, InvalidSpec> {
    match literal {
        SpecLiteral::Spec(spec) => Ok(spec),
        SpecLiteral::Value(value) => value_literal(value),
        SpecLiteral::List(items) => Ok(TypeSpec::new(SpecKind::List(single("list", items)?))),
        SpecLiteral::Set(items) => Ok(TypeSpec::new(SpecKind::Set(single("set", items)?))),
        SpecLiteral::Tuple(items) => {
            let elements = items
                .into_iter()
                .map(to_spec)
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(TypeSpec::new(SpecKind::Tuple(elements)))
        }
        SpecLiteral::Map(mut entries) => {
            if entries.len() != 1 {
                return Err(InvalidSpec::MalformedLiteral {
                    container: "mapping",
                    expected: 1,
                    got: entries.len(),
                });
            }
            let Some((key, value)) = entries.pop() else {
                return Err(InvalidSpec::MalformedLiteral {
                    container: "mapping",
                    expected: 1,
                    got: 0,
                });
            };
            Ok(TypeSpec::new(SpecKind::Mapping {
                key: to_spec(key)?,
                value: to_spec(value)?,
            }))
        }
    }
}

impl TypeSpec {
    /// Converts a literal description into a spec.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidSpec::NotAType`] for a plain value leaf and
    /// [`InvalidSpec::MalformedLiteral`] for a list, set or mapping literal
    /// without exactly one element.
    ///
    /// # Example
    ///
    /// ```rust
    /// use conform::runtime::builtins;
    /// use conform::spec::{SpecLiteral, TypeSpec};
    ///
    /// let spec = TypeSpec::from_literal(SpecLiteral::map(
    ///     builtins::str(),
    ///     SpecLiteral::tuple([builtins::int(), builtins::bool()]),
    /// ))
    /// .unwrap();
    /// assert_eq!(spec.to_string(), "{str: (int, bool)}");
    /// ```
    pub fn from_literal(literal: impl Into<SpecLiteral>) -> Result<TypeSpec> {
        Ok(to_spec(literal.into())?)
    }
}
