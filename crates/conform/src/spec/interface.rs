//! Structural interfaces.
//!
//! An [`Interface`] names required members: attributes with a spec, and
//! methods with a signature. A value conforms when every member is present
//! and matches; no declaration of intent is needed. Interfaces can extend
//! other interfaces and inherit all of their members. A redeclared member
//! overrides the inherited one.

use crate::error::{InvalidSpec, Result};
use crate::spec::{Signature, SpecLiteral, TypeSpec, literal};
use std::fmt;
use std::sync::Arc;

/// A required member of an interface.
#[derive(Debug, Clone, PartialEq)]
pub enum Member {
    /// An attribute whose value must satisfy the spec.
    Attribute(TypeSpec),
    /// A method that must conform to the signature.
    Method(Signature),
}

struct InterfaceInner {
    name: String,
    base: Option<Interface>,
    members: Vec<(String, Member)>,
}

/// A named set of required members.
///
/// # Example
///
/// ```rust
/// use conform::runtime::builtins;
/// use conform::spec::{Interface, Signature};
///
/// let greeter = Interface::builder("Greeter")
///     .attribute("name", builtins::str())
///     .method(
///         "say_hello",
///         Signature::builder()
///             .param("name", builtins::str())
///             .returns(builtins::str())
///             .build()
///             .unwrap(),
///     )
///     .build()
///     .unwrap();
///
/// assert_eq!(greeter.all_members().len(), 2);
/// ```
#[derive(Clone)]
pub struct Interface {
    inner: Arc<InterfaceInner>,
}

impl Interface {
    /// Starts building an interface.
    #[must_use]
    pub fn builder(name: &str) -> InterfaceBuilder {
        InterfaceBuilder {
            name: name.to_string(),
            base: None,
            members: Vec::new(),
            error: None,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Returns the interface this one extends.
    #[must_use]
    pub fn base(&self) -> Option<&Interface> {
        self.inner.base.as_ref()
    }

    /// Members declared directly on this interface, in declaration order.
    #[must_use]
    pub fn own_members(&self) -> &[(String, Member)] {
        &self.inner.members
    }

    /// Looks up a member, searching bases when this interface lacks it.
    #[must_use]
    pub fn member(&self, name: &str) -> Option<&Member> {
        let mut current = Some(self);
        while let Some(interface) = current {
            if let Some((_, member)) = interface
                .inner
                .members
                .iter()
                .find(|(member_name, _)| member_name == name)
            {
                return Some(member);
            }
            current = interface.base();
        }
        None
    }

    /// All members, inherited ones first, with overrides resolved.
    #[must_use]
    pub fn all_members(&self) -> Vec<(&str, &Member)> {
        let mut chain = Vec::new();
        let mut current = Some(self);
        while let Some(interface) = current {
            chain.push(interface);
            current = interface.base();
        }

        let mut members: Vec<(&str, &Member)> = Vec::new();
        for interface in chain.into_iter().rev() {
            for (name, member) in &interface.inner.members {
                match members.iter_mut().find(|(existing, _)| *existing == name.as_str()) {
                    Some(slot) => slot.1 = member,
                    None => members.push((name.as_str(), member)),
                }
            }
        }
        members
    }

    /// Checks whether this interface is `other` or extends it.
    #[must_use]
    pub fn extends(&self, other: &Interface) -> bool {
        let mut current = Some(self);
        while let Some(interface) = current {
            if Arc::ptr_eq(&interface.inner, &other.inner) {
                return true;
            }
            current = interface.base();
        }
        false
    }
}

impl PartialEq for Interface {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
            || (self.inner.name == other.inner.name
                && self.inner.base == other.inner.base
                && self.inner.members == other.inner.members)
    }
}

impl fmt::Debug for Interface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interface")
            .field("name", &self.inner.name)
            .field("base", &self.base().map(Interface::name))
            .field("members", &self.inner.members)
            .finish()
    }
}

/// Builder for [`Interface`].
///
/// The first construction error is kept and reported by [`build`].
///
/// [`build`]: InterfaceBuilder::build
pub struct InterfaceBuilder {
    name: String,
    base: Option<Interface>,
    members: Vec<(String, Member)>,
    error: Option<InvalidSpec>,
}

impl InterfaceBuilder {
    /// Inherits every member of `base`.
    #[must_use]
    pub fn extends(mut self, base: &Interface) -> Self {
        self.base = Some(base.clone());
        self
    }

    /// Requires an attribute. The spec may be given in literal form.
    #[must_use]
    pub fn attribute(mut self, name: &str, spec: impl Into<SpecLiteral>) -> Self {
        match literal::to_spec(spec.into()) {
            Ok(spec) => self.push(name, Member::Attribute(spec)),
            Err(invalid) => self.fail(invalid),
        }
        self
    }

    /// Requires a method with the given signature.
    #[must_use]
    pub fn method(mut self, name: &str, signature: Signature) -> Self {
        match signature.ensure_fixed_arity() {
            Ok(()) => self.push(name, Member::Method(signature)),
            Err(invalid) => self.fail(invalid),
        }
        self
    }

    fn push(&mut self, name: &str, member: Member) {
        if self.members.iter().any(|(existing, _)| existing == name) {
            self.fail(InvalidSpec::DuplicateMember {
                name: name.to_string(),
            });
            return;
        }
        self.members.push((name.to_string(), member));
    }

    fn fail(&mut self, invalid: InvalidSpec) {
        self.error.get_or_insert(invalid);
    }

    /// Finishes the interface.
    ///
    /// # Errors
    ///
    /// Returns the first invalid member declaration: a malformed attribute
    /// literal, a variadic method signature, or a duplicated member name.
    pub fn build(self) -> Result<Interface> {
        if let Some(invalid) = self.error {
            return Err(invalid.into());
        }
        Ok(Interface {
            inner: Arc::new(InterfaceInner {
                name: self.name,
                base: self.base,
                members: self.members,
            }),
        })
    }
}
