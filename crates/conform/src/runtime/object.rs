//! Object instances.
//!
//! An object is a class reference plus a table of instance attributes.
//! Attributes can be added and removed after construction, which is what
//! makes interface conformance a runtime question: an object may gain or
//! lose a required member between two checks.

use crate::runtime::{Class, Value, recover};
use fxhash::FxHashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

struct ObjectInner {
    class: Class,
    attributes: RwLock<FxHashMap<String, Value>>,
}

/// An instance of a [`Class`].
///
/// Cloning an `Object` clones the handle: both clones see the same
/// attributes. Equality is identity.
///
/// # Example
///
/// ```rust
/// use conform::runtime::{ClassBuilder, Object, Value};
///
/// let person = ClassBuilder::new("Person").build();
/// let bob = Object::new(&person).with_attr("name", "Bob");
///
/// bob.set_attr("age", 36);
/// assert_eq!(bob.instance_attr("age"), Some(Value::Int(36)));
///
/// bob.remove_attr("age");
/// assert!(bob.instance_attr("age").is_none());
/// ```
#[derive(Clone)]
pub struct Object {
    inner: Arc<ObjectInner>,
}

impl Object {
    /// Creates an instance with no attributes.
    #[must_use]
    pub fn new(class: &Class) -> Self {
        Self {
            inner: Arc::new(ObjectInner {
                class: class.clone(),
                attributes: RwLock::new(FxHashMap::default()),
            }),
        }
    }

    /// Sets an attribute and returns the object, for construction chains.
    #[must_use]
    pub fn with_attr(self, name: &str, value: impl Into<Value>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Returns the class of this object.
    #[must_use]
    pub fn class(&self) -> &Class {
        &self.inner.class
    }

    /// Sets an instance attribute, replacing any previous value.
    pub fn set_attr(&self, name: &str, value: impl Into<Value>) {
        recover(self.inner.attributes.write()).insert(name.to_string(), value.into());
    }

    /// Removes an instance attribute, returning its value.
    pub fn remove_attr(&self, name: &str) -> Option<Value> {
        recover(self.inner.attributes.write()).remove(name)
    }

    /// Reads an instance attribute. Class attributes and methods are not
    /// consulted; use [`Value::get_attr`] for full lookup.
    #[must_use]
    pub fn instance_attr(&self, name: &str) -> Option<Value> {
        recover(self.inner.attributes.read()).get(name).cloned()
    }

    /// Returns the instance attribute names, sorted.
    #[must_use]
    pub fn attr_names(&self) -> Vec<String> {
        let mut names: Vec<String> =
            recover(self.inner.attributes.read()).keys().cloned().collect();
        names.sort();
        names
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("class", &self.inner.class.name())
            .field("attributes", &self.attr_names())
            .finish()
    }
}
