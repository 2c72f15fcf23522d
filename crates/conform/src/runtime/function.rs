//! Callables and call arguments.
//!
//! A [`Function`] pairs an optional [`Signature`] with a native
//! implementation. Calling a function first binds the caller's [`Args`] to the
//! signature, then hands the implementation exactly one value per declared
//! parameter:
//!
//! - fixed parameters receive their argument or their default
//! - a `*args` parameter receives a `Tuple` of the surplus positionals
//! - a `**kwargs` parameter receives a `Dict` of the surplus keywords
//!
//! A function without a signature is *opaque*: its arguments are passed
//! through unchanged, and structural checks accept it for any typedef.

use crate::error::{Error, Result};
use crate::runtime::Value;
use crate::spec::Signature;
use std::fmt;
use std::sync::Arc;

/// Native implementation of a function: receives the bound arguments.
pub type NativeImp = dyn Fn(&[Value]) -> Result<Value> + Send + Sync;

/// Arguments for a call: positionals in order plus named keywords.
///
/// # Example
///
/// ```rust
/// use conform::runtime::{Args, Value};
///
/// let args = Args::new().arg(1).arg("two").kwarg("flag", true);
/// assert_eq!(args.positional().len(), 2);
/// assert_eq!(args.keywords()[0].0, "flag");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    positional: Vec<Value>,
    keywords: Vec<(String, Value)>,
}

impl Args {
    /// Creates an empty argument list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a positional argument.
    #[must_use]
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Appends a keyword argument.
    #[must_use]
    pub fn kwarg(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.keywords.push((name.to_string(), value.into()));
        self
    }

    /// Returns the positional arguments.
    #[must_use]
    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    /// Returns the keyword arguments in call order.
    #[must_use]
    pub fn keywords(&self) -> &[(String, Value)] {
        &self.keywords
    }

    /// Total number of arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positional.len() + self.keywords.len()
    }

    /// Checks whether no arguments were supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Splits into positionals and keywords.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Value>, Vec<(String, Value)>) {
        (self.positional, self.keywords)
    }
}

impl From<Vec<Value>> for Args {
    fn from(positional: Vec<Value>) -> Self {
        Self {
            positional,
            keywords: Vec::new(),
        }
    }
}

impl From<&[Value]> for Args {
    fn from(positional: &[Value]) -> Self {
        Self::from(positional.to_vec())
    }
}

struct FunctionInner {
    name: String,
    signature: Option<Signature>,
    imp: Arc<NativeImp>,
}

/// A callable value.
///
/// Functions are immutable `Arc` handles; equality is identity.
///
/// # Example
///
/// ```rust
/// use conform::runtime::{Args, Function, Value, builtins};
/// use conform::spec::Signature;
///
/// let signature = Signature::builder()
///     .param("a", builtins::int())
///     .param("b", builtins::int())
///     .returns(builtins::int())
///     .build()
///     .unwrap();
///
/// let add = Function::new("add", signature, |args| match (&args[0], &args[1]) {
///     (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a + b)),
///     _ => Ok(Value::None),
/// });
///
/// let sum = add.call(Args::new().arg(2).kwarg("b", 3)).unwrap();
/// assert_eq!(sum, Value::Int(5));
/// ```
#[derive(Clone)]
pub struct Function {
    inner: Arc<FunctionInner>,
}

impl Function {
    /// Creates a function with an inspectable signature.
    pub fn new<F>(name: &str, signature: Signature, imp: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        Self::from_parts(name.to_string(), Some(signature), Arc::new(imp))
    }

    /// Creates a function whose signature cannot be inspected.
    ///
    /// Opaque functions receive only positional arguments.
    pub fn opaque<F>(name: &str, imp: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        Self::from_parts(name.to_string(), None, Arc::new(imp))
    }

    pub(crate) fn from_parts(
        name: String,
        signature: Option<Signature>,
        imp: Arc<NativeImp>,
    ) -> Self {
        Self {
            inner: Arc::new(FunctionInner {
                name,
                signature,
                imp,
            }),
        }
    }

    /// Returns the function name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Returns the signature, `None` for opaque functions.
    #[must_use]
    pub fn signature(&self) -> Option<&Signature> {
        self.inner.signature.as_ref()
    }

    /// Binds `args` to the signature without calling.
    ///
    /// # Errors
    ///
    /// Returns the binding error for missing, surplus, duplicate or unknown
    /// arguments. Opaque functions reject every keyword argument.
    pub fn bind(&self, args: Args) -> Result<Vec<Value>> {
        match self.signature() {
            Some(signature) => signature.bind(args),
            None => {
                let (positional, keywords) = args.into_parts();
                match keywords.into_iter().next() {
                    Some((name, _)) => Err(Error::UnexpectedArgument { name }),
                    None => Ok(positional),
                }
            }
        }
    }

    /// Binds `args` and runs the implementation.
    ///
    /// # Errors
    ///
    /// Returns any binding error, or whatever the implementation returns.
    pub fn call(&self, args: Args) -> Result<Value> {
        let bound = self.bind(args)?;
        self.invoke_bound(&bound)
    }

    /// Calls with positional arguments only.
    ///
    /// # Errors
    ///
    /// See [`Function::call`].
    pub fn call_positional(&self, args: &[Value]) -> Result<Value> {
        self.call(Args::from(args))
    }

    /// Runs the implementation on already-bound arguments.
    pub(crate) fn invoke_bound(&self, bound: &[Value]) -> Result<Value> {
        (self.inner.imp)(bound)
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.inner.name)
            .field("signature", &self.inner.signature)
            .finish_non_exhaustive()
    }
}
