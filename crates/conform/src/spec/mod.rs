//! The type specification model.
//!
//! A [`TypeSpec`] is an immutable description of a set of acceptable values.
//! Specs are cheap `Arc` handles and can be shared across threads.
//!
//! # Spec forms
//!
//! | form                       | accepts                                             |
//! |----------------------------|-----------------------------------------------------|
//! | [`any`]                    | every value                                         |
//! | a [`Class`]                | instances of the class or a subclass                |
//! | [`predicate`]              | values for which the test returns `true`            |
//! | `a & b`                    | values accepted by both                             |
//! | [`union`] / `a \| b`       | values accepted by at least one member              |
//! | an [`Interface`]           | values with all required members                    |
//! | [`typedef`]                | callables whose signature conforms                  |
//! | [`list_of`], [`set_of`]    | containers whose every element conforms             |
//! | [`tuple_of`]               | tuples of exactly that length, position by position |
//! | [`mapping_of`]             | dicts whose every key and value conform             |
//! | [`optional`]               | `None` or values accepted by the inner spec         |
//! | [`only`]                   | instances of exactly the class                      |
//! | [`options`]                | values equal to one of the listed values            |
//!
//! # Example
//!
//! ```rust
//! use conform::runtime::{Value, builtins};
//! use conform::spec::{TypeSpec, union};
//! use conform::satisfies;
//!
//! let number = union([builtins::int(), builtins::float()]).unwrap();
//! assert!(satisfies(&Value::Int(3), &number));
//! assert!(satisfies(&Value::Float(1.5), &number));
//! assert!(!satisfies(&Value::str("three"), &number));
//!
//! let same = TypeSpec::from(builtins::int()) | TypeSpec::from(builtins::float());
//! assert_eq!(number, same);
//! ```

mod display;
pub mod interface;
pub mod literal;
pub mod predicate;
pub mod signature;

pub use interface::{Interface, InterfaceBuilder, Member};
pub use literal::SpecLiteral;
pub use predicate::{Predicate, PredicateFn, any, only, optional, options, predicate};
pub use signature::{Param, ParamKind, Signature, SignatureBuilder};

use crate::error::{InvalidSpec, Result};
use crate::runtime::{Class, Value};
use std::ops::{BitAnd, BitOr};
use std::sync::Arc;

/// The shape of a spec.
#[derive(Debug)]
pub enum SpecKind {
    /// Accepts everything.
    Any,
    /// Nominal: instances of the class or a subclass.
    Plain(Class),
    /// A value-level test.
    Predicate(Predicate),
    /// Both specs must accept.
    And(TypeSpec, TypeSpec),
    /// At least one member must accept. Members are flat and distinct.
    Union(Vec<TypeSpec>),
    /// Structural: all members present and conforming.
    Interface(Interface),
    /// A callable whose signature conforms. Never variadic.
    Signature(Signature),
    /// A list of conforming elements.
    List(TypeSpec),
    /// A set of conforming elements.
    Set(TypeSpec),
    /// A tuple with one spec per position.
    Tuple(Vec<TypeSpec>),
    /// A dict with conforming keys and values.
    Mapping {
        /// Spec for every key.
        key: TypeSpec,
        /// Spec for every value.
        value: TypeSpec,
    },
    /// `None` or the inner spec.
    Optional(TypeSpec),
    /// Exactly this class, no subclasses.
    Only(Class),
    /// One of a fixed set of values.
    Options(Vec<Value>),
}

/// A type specification.
#[derive(Clone)]
pub struct TypeSpec {
    kind: Arc<SpecKind>,
}

impl TypeSpec {
    pub(crate) fn new(kind: SpecKind) -> Self {
        Self {
            kind: Arc::new(kind),
        }
    }

    /// Returns the shape of this spec.
    #[must_use]
    pub fn kind(&self) -> &SpecKind {
        &self.kind
    }

    /// Builds `self & other`.
    #[must_use]
    pub fn and(&self, other: &TypeSpec) -> TypeSpec {
        TypeSpec::new(SpecKind::And(self.clone(), other.clone()))
    }

    /// Builds the union of `self` and `other`.
    #[must_use]
    pub fn or(&self, other: &TypeSpec) -> TypeSpec {
        let mut members = Vec::new();
        push_flat(&mut members, self.clone());
        push_flat(&mut members, other.clone());
        from_members(members)
    }

    /// Returns the members of a union, or `None` for other shapes.
    #[must_use]
    pub fn union_members(&self) -> Option<&[TypeSpec]> {
        match self.kind() {
            SpecKind::Union(members) => Some(members.as_slice()),
            _ => None,
        }
    }

    /// Checks whether `value` conforms. Shorthand for
    /// [`crate::check::satisfies`].
    #[must_use]
    pub fn accepts(&self, value: &Value) -> bool {
        crate::check::satisfies(value, self)
    }
}

fn push_flat(members: &mut Vec<TypeSpec>, spec: TypeSpec) {
    match spec.kind() {
        SpecKind::Union(inner) => {
            for member in inner {
                push_flat(members, member.clone());
            }
        }
        _ => {
            if !members.contains(&spec) {
                members.push(spec);
            }
        }
    }
}

fn from_members(mut members: Vec<TypeSpec>) -> TypeSpec {
    if members.len() == 1 {
        if let Some(only_member) = members.pop() {
            return only_member;
        }
    }
    TypeSpec::new(SpecKind::Union(members))
}

/// Builds a union, flattening nested unions and dropping duplicates.
///
/// A union of one distinct member is that member.
///
/// # Errors
///
/// Returns [`InvalidSpec::EmptyUnion`] when `members` is empty.
pub fn union<I, T>(members: I) -> Result<TypeSpec>
where
    I: IntoIterator<Item = T>,
    T: Into<TypeSpec>,
{
    let mut flat = Vec::new();
    for member in members {
        push_flat(&mut flat, member.into());
    }
    if flat.is_empty() {
        return Err(InvalidSpec::EmptyUnion.into());
    }
    Ok(from_members(flat))
}

/// Builds a callable spec from a signature.
///
/// # Errors
///
/// Returns [`InvalidSpec::VariadicSignature`] when the signature declares
/// `*args` or `**kwargs`.
pub fn typedef(signature: Signature) -> Result<TypeSpec> {
    signature.ensure_fixed_arity()?;
    Ok(TypeSpec::new(SpecKind::Signature(signature)))
}

/// "A list whose every element satisfies `element`".
#[must_use]
pub fn list_of(element: impl Into<TypeSpec>) -> TypeSpec {
    TypeSpec::new(SpecKind::List(element.into()))
}

/// "A set whose every element satisfies `element`".
#[must_use]
pub fn set_of(element: impl Into<TypeSpec>) -> TypeSpec {
    TypeSpec::new(SpecKind::Set(element.into()))
}

/// "A tuple of exactly these element specs".
pub fn tuple_of<I, T>(elements: I) -> TypeSpec
where
    I: IntoIterator<Item = T>,
    T: Into<TypeSpec>,
{
    TypeSpec::new(SpecKind::Tuple(elements.into_iter().map(Into::into).collect()))
}

/// "A dict whose keys satisfy `key` and values satisfy `value`".
#[must_use]
pub fn mapping_of(key: impl Into<TypeSpec>, value: impl Into<TypeSpec>) -> TypeSpec {
    TypeSpec::new(SpecKind::Mapping {
        key: key.into(),
        value: value.into(),
    })
}

fn same_members<T: PartialEq>(left: &[T], right: &[T]) -> bool {
    left.len() == right.len() && left.iter().all(|item| right.contains(item))
}

impl PartialEq for TypeSpec {
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.kind, &other.kind) {
            return true;
        }
        match (self.kind(), other.kind()) {
            (SpecKind::Any, SpecKind::Any) => true,
            (SpecKind::Plain(a), SpecKind::Plain(b)) | (SpecKind::Only(a), SpecKind::Only(b)) => {
                a == b
            }
            (SpecKind::Predicate(a), SpecKind::Predicate(b)) => a == b,
            (SpecKind::And(a1, a2), SpecKind::And(b1, b2)) => a1 == b1 && a2 == b2,
            (SpecKind::Union(a), SpecKind::Union(b)) => same_members(a, b),
            (SpecKind::Interface(a), SpecKind::Interface(b)) => a == b,
            (SpecKind::Signature(a), SpecKind::Signature(b)) => a == b,
            (SpecKind::List(a), SpecKind::List(b))
            | (SpecKind::Set(a), SpecKind::Set(b))
            | (SpecKind::Optional(a), SpecKind::Optional(b)) => a == b,
            (SpecKind::Tuple(a), SpecKind::Tuple(b)) => a == b,
            (
                SpecKind::Mapping { key: k1, value: v1 },
                SpecKind::Mapping { key: k2, value: v2 },
            ) => k1 == k2 && v1 == v2,
            (SpecKind::Options(a), SpecKind::Options(b)) => same_members(a, b),
            _ => false,
        }
    }
}

impl From<Class> for TypeSpec {
    fn from(class: Class) -> Self {
        TypeSpec::new(SpecKind::Plain(class))
    }
}

impl From<&Class> for TypeSpec {
    fn from(class: &Class) -> Self {
        TypeSpec::new(SpecKind::Plain(class.clone()))
    }
}

impl From<Interface> for TypeSpec {
    fn from(interface: Interface) -> Self {
        TypeSpec::new(SpecKind::Interface(interface))
    }
}

impl From<&Interface> for TypeSpec {
    fn from(interface: &Interface) -> Self {
        TypeSpec::new(SpecKind::Interface(interface.clone()))
    }
}

impl From<&TypeSpec> for TypeSpec {
    fn from(spec: &TypeSpec) -> Self {
        spec.clone()
    }
}

impl BitAnd for TypeSpec {
    type Output = TypeSpec;

    fn bitand(self, rhs: TypeSpec) -> TypeSpec {
        TypeSpec::new(SpecKind::And(self, rhs))
    }
}

impl BitAnd for &TypeSpec {
    type Output = TypeSpec;

    fn bitand(self, rhs: &TypeSpec) -> TypeSpec {
        self.and(rhs)
    }
}

impl BitOr for TypeSpec {
    type Output = TypeSpec;

    fn bitor(self, rhs: TypeSpec) -> TypeSpec {
        self.or(&rhs)
    }
}

impl BitOr for &TypeSpec {
    type Output = TypeSpec;

    fn bitor(self, rhs: &TypeSpec) -> TypeSpec {
        self.or(rhs)
    }
}
