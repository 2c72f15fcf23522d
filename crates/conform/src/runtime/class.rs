//! Classes and methods for the host runtime.
//!
//! This module implements the class system with:
//! - single inheritance rooted at the builtin `object` class
//! - class-level attributes
//! - methods with optional inspectable signatures
//! - inheritance chain walking for lookup and subclass checks
//!
//! # Architecture
//!
//! A `Class` is an `Arc` handle to immutable metadata. Classes are built once
//! with [`ClassBuilder`] and compared by identity: two classes with the same
//! name are still different types, which is what nominal subtyping needs.
//! A superclass is fixed at construction, so the chain can never form a
//! cycle.

use crate::error::Result;
use crate::runtime::{Function, Value, builtins};
use crate::spec::Signature;
use fxhash::FxHashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_CLASS_ID: AtomicU64 = AtomicU64::new(1);

/// Method implementation: receives the receiver and the bound arguments.
///
/// Bound arguments arrive one per declared parameter, in declaration order.
pub type MethodImp = dyn Fn(&Value, &[Value]) -> Result<Value> + Send + Sync;

/// A method: name, optional signature and implementation.
///
/// The signature never lists the receiver. A method without a signature is
/// *opaque*: it can be called, but structural checks cannot inspect it (the
/// builtin `len` methods are opaque).
#[derive(Clone)]
pub struct Method {
    name: Arc<str>,
    signature: Option<Signature>,
    imp: Arc<MethodImp>,
}

impl Method {
    /// Creates a method with an inspectable signature.
    ///
    /// # Example
    ///
    /// ```rust
    /// use conform::runtime::{Method, Value, builtins};
    /// use conform::spec::Signature;
    ///
    /// let signature = Signature::builder()
    ///     .param("name", builtins::str())
    ///     .returns(builtins::str())
    ///     .build()
    ///     .unwrap();
    ///
    /// let greet = Method::new("say_hello", signature, |_receiver, args| {
    ///     Ok(Value::str(&format!("hello {}", args[0])))
    /// });
    /// assert_eq!(greet.name(), "say_hello");
    /// ```
    pub fn new<F>(name: &str, signature: Signature, imp: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            name: Arc::from(name),
            signature: Some(signature),
            imp: Arc::new(imp),
        }
    }

    /// Creates a method whose signature cannot be inspected.
    pub fn opaque<F>(name: &str, imp: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            name: Arc::from(name),
            signature: None,
            imp: Arc::new(imp),
        }
    }

    /// Returns the method name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the signature, `None` for opaque methods.
    #[must_use]
    pub fn signature(&self) -> Option<&Signature> {
        self.signature.as_ref()
    }

    /// Binds the method to a receiver, producing a callable with the same
    /// signature.
    #[must_use]
    pub fn bind(&self, receiver: Value) -> Function {
        let imp = Arc::clone(&self.imp);
        Function::from_parts(
            self.name.to_string(),
            self.signature.clone(),
            Arc::new(move |args: &[Value]| imp(&receiver, args)),
        )
    }

    /// Returns the method as a plain function taking the receiver first.
    ///
    /// The resulting signature gains a leading unannotated `self` parameter,
    /// the way a method looks when fetched from its class.
    #[must_use]
    pub fn unbound(&self) -> Function {
        let imp = Arc::clone(&self.imp);
        let name = self.name.to_string();
        let missing_receiver = name.clone();
        Function::from_parts(
            name,
            self.signature.as_ref().map(Signature::with_receiver),
            Arc::new(move |args: &[Value]| match args.split_first() {
                Some((receiver, rest)) => imp(receiver, rest),
                None => Err(crate::Error::MissingArgument {
                    name: format!("{missing_receiver}.self"),
                }),
            }),
        )
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

struct ClassInner {
    id: u64,
    name: String,
    super_class: Option<Class>,
    attributes: FxHashMap<String, Value>,
    methods: FxHashMap<String, Method>,
}

/// A runtime class.
///
/// # Example
///
/// ```rust
/// use conform::runtime::{ClassBuilder, builtins};
///
/// let event = ClassBuilder::new("Event").build();
/// let mouse_event = ClassBuilder::new("MouseEvent").extends(&event).build();
///
/// assert!(mouse_event.is_subclass_of(&event));
/// assert!(mouse_event.is_subclass_of(builtins::object()));
/// assert!(!event.is_subclass_of(&mouse_event));
/// ```
#[derive(Clone)]
pub struct Class {
    inner: Arc<ClassInner>,
}

impl Class {
    /// Creates a class with no superclass. Only the builtin `object` class
    /// is a root.
    pub(crate) fn new_root(name: &str) -> Self {
        ClassBuilder {
            name: name.to_string(),
            super_class: None,
            attributes: FxHashMap::default(),
            methods: FxHashMap::default(),
        }
        .build()
    }

    /// Starts building a subclass of `object`.
    #[must_use]
    pub fn builder(name: &str) -> ClassBuilder {
        ClassBuilder::new(name)
    }

    /// Returns the class name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Returns the process-unique identifier of this class.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    /// Returns the superclass, `None` only for `object`.
    #[must_use]
    pub fn super_class(&self) -> Option<&Class> {
        self.inner.super_class.as_ref()
    }

    /// Checks whether this class is `other` or inherits from it.
    ///
    /// A class is a subclass of itself.
    #[must_use]
    pub fn is_subclass_of(&self, other: &Class) -> bool {
        let mut current = Some(self);
        while let Some(class) = current {
            if class == other {
                return true;
            }
            current = class.super_class();
        }
        false
    }

    /// Returns an attribute declared directly on this class.
    #[must_use]
    pub fn own_attribute(&self, name: &str) -> Option<&Value> {
        self.inner.attributes.get(name)
    }

    /// Looks up a class attribute along the inheritance chain.
    #[must_use]
    pub fn lookup_attribute(&self, name: &str) -> Option<&Value> {
        let mut current = Some(self);
        while let Some(class) = current {
            if let Some(value) = class.inner.attributes.get(name) {
                return Some(value);
            }
            current = class.super_class();
        }
        None
    }

    /// Looks up a method along the inheritance chain; subclasses override.
    #[must_use]
    pub fn lookup_method(&self, name: &str) -> Option<&Method> {
        let mut current = Some(self);
        while let Some(class) = current {
            if let Some(method) = class.inner.methods.get(name) {
                return Some(method);
            }
            current = class.super_class();
        }
        None
    }

    /// Returns the methods declared directly on this class, sorted by name.
    #[must_use]
    pub fn own_methods(&self) -> Vec<&Method> {
        let mut methods: Vec<&Method> = self.inner.methods.values().collect();
        methods.sort_by(|a, b| a.name().cmp(b.name()));
        methods
    }

    /// Checks whether a value of this class satisfies `spec` at the type
    /// level. See [`crate::check::is_subtype`].
    #[must_use]
    pub fn is_subtype_of(&self, spec: &crate::spec::TypeSpec) -> bool {
        crate::check::is_subtype(&crate::spec::TypeSpec::from(self), spec)
    }
}

impl PartialEq for Class {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Class {}

impl Hash for Class {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.id.hash(state);
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class")
            .field("name", &self.inner.name)
            .field("super_class", &self.super_class().map(Class::name))
            .field("methods", &self.inner.methods.len())
            .finish()
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Builder for [`Class`].
///
/// Declaring a method or attribute twice keeps the last declaration.
pub struct ClassBuilder {
    name: String,
    super_class: Option<Class>,
    attributes: FxHashMap<String, Value>,
    methods: FxHashMap<String, Method>,
}

impl ClassBuilder {
    /// Starts a class that inherits from `object`.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self::subclass(name, builtins::object())
    }

    /// Starts a class with an explicit superclass. Used while the builtin
    /// table itself is being initialized.
    pub(crate) fn subclass(name: &str, super_class: &Class) -> Self {
        Self {
            name: name.to_string(),
            super_class: Some(super_class.clone()),
            attributes: FxHashMap::default(),
            methods: FxHashMap::default(),
        }
    }

    /// Sets the superclass.
    #[must_use]
    pub fn extends(mut self, super_class: &Class) -> Self {
        self.super_class = Some(super_class.clone());
        self
    }

    /// Declares a class-level attribute.
    #[must_use]
    pub fn attribute(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.to_string(), value.into());
        self
    }

    /// Declares a method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.methods.insert(method.name().to_string(), method);
        self
    }

    /// Finishes the class.
    #[must_use]
    pub fn build(self) -> Class {
        Class {
            inner: Arc::new(ClassInner {
                id: NEXT_CLASS_ID.fetch_add(1, Ordering::Relaxed),
                name: self.name,
                super_class: self.super_class,
                attributes: self.attributes,
                methods: self.methods,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::Args;

    fn noop(name: &str) -> Method {
        Method::new(name, Signature::empty(), |_, _| Ok(Value::None))
    }

    #[test]
    fn test_root_and_default_superclass() {
        let class = ClassBuilder::new("Plain").build();
        assert_eq!(class.super_class(), Some(builtins::object()));
        assert!(builtins::object().super_class().is_none());
    }

    #[test]
    fn test_identity_equality() {
        let first = ClassBuilder::new("Same").build();
        let second = ClassBuilder::new("Same").build();
        assert_eq!(first, first.clone());
        assert_ne!(first, second);
        assert_ne!(first.id(), second.id());
    }

    #[test]
    fn test_subclass_chain() {
        let base = ClassBuilder::new("Base").build();
        let middle = ClassBuilder::new("Middle").extends(&base).build();
        let leaf = ClassBuilder::new("Leaf").extends(&middle).build();

        assert!(leaf.is_subclass_of(&leaf));
        assert!(leaf.is_subclass_of(&base));
        assert!(!base.is_subclass_of(&leaf));
    }

    #[test]
    fn test_method_lookup_inherits_and_overrides() {
        let base = ClassBuilder::new("Base")
            .method(noop("greet"))
            .method(noop("wave"))
            .build();
        let child = ClassBuilder::new("Child")
            .extends(&base)
            .method(Method::opaque("greet", |_, _| Ok(Value::Int(1))))
            .build();

        assert!(child.lookup_method("wave").is_some());
        assert!(child.lookup_method("greet").unwrap().signature().is_none());
        assert!(child.lookup_method("missing").is_none());
        assert_eq!(child.own_methods().len(), 1);
    }

    #[test]
    fn test_attribute_lookup() {
        let base = ClassBuilder::new("Base").attribute("kind", "base").build();
        let child = ClassBuilder::new("Child").extends(&base).build();

        assert_eq!(child.lookup_attribute("kind"), Some(&Value::str("base")));
        assert!(child.own_attribute("kind").is_none());
    }

    #[test]
    fn test_bound_and_unbound_methods() {
        let counter = Method::opaque("echo", |receiver, args| {
            Ok(Value::tuple([receiver.clone(), args[0].clone()]))
        });

        let bound = counter.bind(Value::Int(7));
        let result = bound.call(Args::new().arg(1)).unwrap();
        assert_eq!(result, Value::tuple([Value::Int(7), Value::Int(1)]));

        let unbound = counter.unbound();
        let result = unbound.call(Args::new().arg(3).arg(4)).unwrap();
        assert_eq!(result, Value::tuple([Value::Int(3), Value::Int(4)]));
    }

    #[test]
    fn test_unbound_signature_gains_receiver() {
        let method = noop("run");
        let unbound = method.unbound();
        let signature = unbound.signature().unwrap();
        assert_eq!(signature.params().len(), 1);
        assert_eq!(signature.params()[0].name(), "self");
    }
}
