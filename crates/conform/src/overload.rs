//! Overloaded functions: same name, dispatched on argument conformance.
//!
//! Functions are grouped by arity. A call picks, among the functions of
//! matching arity whose annotated parameters accept the arguments, the most
//! specific one: the function whose annotation at every position is at
//! least as narrow as every other applicable function's. An unannotated
//! parameter is the widest possible.
//!
//! # Example
//!
//! ```rust
//! use conform::Overloaded;
//! use conform::runtime::{Function, Value, builtins};
//! use conform::spec::Signature;
//!
//! let mut show = Overloaded::new("show");
//! show.add(Function::new(
//!     "show",
//!     Signature::builder().untyped("x").build().unwrap(),
//!     |_| Ok(Value::str("anything")),
//! ))
//! .unwrap();
//! show.add(Function::new(
//!     "show",
//!     Signature::builder().param("x", builtins::int()).build().unwrap(),
//!     |_| Ok(Value::str("an int")),
//! ))
//! .unwrap();
//!
//! assert_eq!(show.call(&[Value::Int(1)]).unwrap(), Value::str("an int"));
//! assert_eq!(show.call(&[Value::str("s")]).unwrap(), Value::str("anything"));
//! ```

use crate::check::{is_subtype, satisfies};
use crate::error::{Error, InvalidSpec, Result};
use crate::runtime::{Args, Function, Value};
use crate::spec::{Signature, TypeSpec};
use conform_log::{trace, warn};
use fxhash::FxHashMap;
use std::sync::Arc;

/// A set of same-named functions dispatched by argument conformance.
#[derive(Debug, Clone)]
pub struct Overloaded {
    name: String,
    by_arity: FxHashMap<usize, Vec<Function>>,
}

fn annotations(signature: &Signature) -> impl Iterator<Item = Option<&TypeSpec>> {
    signature.params().iter().map(|param| param.annotation())
}

fn signature_of(function: &Function) -> Result<&Signature> {
    function.signature().ok_or_else(|| {
        InvalidSpec::OpaqueSignature {
            function: function.name().to_string(),
        }
        .into()
    })
}

/// `narrow` is strictly more specific than `wide` at one position.
fn narrower(narrow: Option<&TypeSpec>, wide: Option<&TypeSpec>) -> bool {
    if narrow == wide {
        return false;
    }
    match (narrow, wide) {
        (_, None) => true,
        (None, Some(_)) => false,
        (Some(narrow), Some(wide)) => is_subtype(narrow, wide),
    }
}

/// At every position `narrow` is equal to or narrower than `wide`.
fn at_least_as_specific(narrow: &Signature, wide: &Signature) -> bool {
    annotations(narrow)
        .zip(annotations(wide))
        .all(|(n, w)| n == w || narrower(n, w))
}

/// Identical annotations, or each side narrower somewhere.
fn ambiguous(first: &Signature, second: &Signature) -> bool {
    let mut first_narrower = false;
    let mut second_narrower = false;
    let mut identical = true;
    for (a, b) in annotations(first).zip(annotations(second)) {
        if a == b {
            continue;
        }
        identical = false;
        first_narrower |= narrower(a, b);
        second_narrower |= narrower(b, a);
    }
    identical || (first_narrower && second_narrower)
}

fn applicable(signature: &Signature, args: &[Value]) -> bool {
    annotations(signature)
        .zip(args)
        .all(|(annotation, arg)| annotation.is_none_or(|spec| satisfies(arg, spec)))
}

impl Overloaded {
    /// Creates an empty overload set.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            by_arity: FxHashMap::default(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of registered functions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_arity.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registers a function.
    ///
    /// # Errors
    ///
    /// - [`InvalidSpec::OpaqueSignature`] for a function without a signature
    /// - [`InvalidSpec::VariadicSignature`] for `*args` / `**kwargs`
    /// - [`Error::AmbiguousFunction`] when an equivalent function of the same
    ///   arity is already registered
    pub fn add(&mut self, function: Function) -> Result<&mut Self> {
        let signature = signature_of(&function)?;
        signature.ensure_fixed_arity()?;

        let arity = signature.params().len();
        let existing = self.by_arity.entry(arity).or_default();
        for other in existing.iter() {
            if ambiguous(signature, signature_of(other)?) {
                warn!(
                    "{}{signature} is ambiguous with {}{}",
                    self.name,
                    self.name,
                    signature_of(other)?
                );
                return Err(Error::AmbiguousFunction {
                    name: self.name.clone(),
                });
            }
        }
        existing.push(function);
        Ok(self)
    }

    /// Selects the function for `args` without calling it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FunctionNotFound`] when no function of that arity
    /// accepts the arguments, or when no single applicable function is the
    /// most specific.
    pub fn resolve(&self, args: &[Value]) -> Result<&Function> {
        let not_found = || Error::FunctionNotFound {
            name: self.name.clone(),
            arguments: args.iter().map(|arg| arg.class().name().to_string()).collect(),
        };

        let candidates: Vec<(&Function, &Signature)> = self
            .by_arity
            .get(&args.len())
            .into_iter()
            .flatten()
            .filter_map(|function| function.signature().map(|signature| (function, signature)))
            .filter(|(_, signature)| applicable(signature, args))
            .collect();

        let best = candidates.iter().find(|(_, signature)| {
            candidates
                .iter()
                .all(|(_, other)| at_least_as_specific(signature, other))
        });

        match best {
            Some(&(function, signature)) => {
                trace!("{} dispatches to {}{signature}", self.name, function.name());
                Ok(function)
            }
            None => Err(not_found()),
        }
    }

    /// Calls the most specific function accepting `args`.
    ///
    /// # Errors
    ///
    /// Returns the resolution error, or whatever the selected function
    /// returns.
    pub fn call(&self, args: &[Value]) -> Result<Value> {
        self.resolve(args)?.call(Args::from(args))
    }

    /// Turns the set into a single opaque function that dispatches on call.
    #[must_use]
    pub fn into_function(self) -> Function {
        let name = self.name.clone();
        let set = Arc::new(self);
        Function::opaque(&name, move |args| set.call(args))
    }
}
