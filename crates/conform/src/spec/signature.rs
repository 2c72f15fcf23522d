//! Callable signatures.
//!
//! A [`Signature`] is an ordered parameter list plus an optional return
//! spec. Signatures serve two roles:
//! - the inspectable shape of a [`Function`](crate::runtime::Function), used
//!   for argument binding and call-site enforcement
//! - the expected shape in a typedef or interface method, used by the
//!   signature matcher
//!
//! Parameters must appear in this order: required positionals, positionals
//! with defaults, then at most one `*args` and at most one `**kwargs`.

use crate::error::{Error, InvalidSpec, Result};
use crate::runtime::{Args, Value};
use crate::spec::TypeSpec;

/// How a parameter receives arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    /// Accepts one argument by position or by name.
    Positional,
    /// `*args`: collects surplus positional arguments into a tuple.
    VarPositional,
    /// `**kwargs`: collects surplus keyword arguments into a dict.
    VarKeyword,
}

/// One parameter of a signature.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    name: String,
    kind: ParamKind,
    annotation: Option<TypeSpec>,
    default: Option<Value>,
}

impl Param {
    /// Creates an unannotated positional parameter.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: ParamKind::Positional,
            annotation: None,
            default: None,
        }
    }

    /// Creates a `*args` parameter.
    #[must_use]
    pub fn var_positional(name: &str) -> Self {
        Self {
            kind: ParamKind::VarPositional,
            ..Self::new(name)
        }
    }

    /// Creates a `**kwargs` parameter.
    #[must_use]
    pub fn var_keyword(name: &str) -> Self {
        Self {
            kind: ParamKind::VarKeyword,
            ..Self::new(name)
        }
    }

    /// Attaches a type annotation. On a variadic parameter the annotation
    /// applies to each collected element.
    #[must_use]
    pub fn annotated(mut self, spec: impl Into<TypeSpec>) -> Self {
        self.annotation = Some(spec.into());
        self
    }

    /// Attaches a default value. Ignored on variadic parameters.
    #[must_use]
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        if self.kind == ParamKind::Positional {
            self.default = Some(value.into());
        }
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn kind(&self) -> ParamKind {
        self.kind
    }

    #[must_use]
    pub fn annotation(&self) -> Option<&TypeSpec> {
        self.annotation.as_ref()
    }

    #[must_use]
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    #[must_use]
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    #[must_use]
    pub fn is_variadic(&self) -> bool {
        self.kind != ParamKind::Positional
    }
}

/// A callable signature.
///
/// # Example
///
/// ```rust
/// use conform::runtime::builtins;
/// use conform::spec::{Param, Signature};
///
/// let signature = Signature::builder()
///     .param("name", builtins::str())
///     .with(Param::new("times").annotated(builtins::int()).with_default(1))
///     .returns(builtins::str())
///     .build()
///     .unwrap();
///
/// assert_eq!(signature.to_string(), "(name: str, times: int = 1) -> str");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Signature {
    params: Vec<Param>,
    returns: Option<TypeSpec>,
}

impl Signature {
    /// Starts building a signature.
    #[must_use]
    pub fn builder() -> SignatureBuilder {
        SignatureBuilder::default()
    }

    /// A signature with no parameters and no return spec.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Returns the declared return spec, `None` when unconstrained.
    #[must_use]
    pub fn returns(&self) -> Option<&TypeSpec> {
        self.returns.as_ref()
    }

    /// Looks up a parameter by name.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&Param> {
        self.params.iter().find(|param| param.name == name)
    }

    /// Number of fixed (non-variadic) parameters.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.params.iter().filter(|param| !param.is_variadic()).count()
    }

    /// Checks whether the signature declares `*args` or `**kwargs`.
    #[must_use]
    pub fn is_variadic(&self) -> bool {
        self.params.iter().any(Param::is_variadic)
    }

    /// Fails if the signature declares a variadic parameter.
    pub(crate) fn ensure_fixed_arity(&self) -> std::result::Result<(), InvalidSpec> {
        match self.params.iter().find(|param| param.is_variadic()) {
            Some(param) => Err(InvalidSpec::VariadicSignature {
                param: param.name.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Returns this signature with an unannotated `self` parameter first.
    pub(crate) fn with_receiver(&self) -> Signature {
        let mut params = Vec::with_capacity(self.params.len() + 1);
        params.push(Param::new("self"));
        params.extend(self.params.iter().cloned());
        Signature {
            params,
            returns: self.returns.clone(),
        }
    }

    /// Binds call arguments to parameters.
    ///
    /// Returns one value per parameter in declaration order. Missing fixed
    /// arguments take their default; `*args` becomes a `Tuple` and
    /// `**kwargs` a `Dict` keyed by `Str`.
    ///
    /// # Errors
    ///
    /// - [`Error::ArgumentCountMismatch`] for surplus positionals without `*args`
    /// - [`Error::DuplicateArgument`] when a parameter is given twice
    /// - [`Error::UnexpectedArgument`] for an unknown keyword without `**kwargs`
    /// - [`Error::MissingArgument`] for a required parameter left unfilled
    pub fn bind(&self, args: Args) -> Result<Vec<Value>> {
        let (positional, keywords) = args.into_parts();
        let fixed = self.arity();
        let accepts_var_positional = self
            .params
            .iter()
            .any(|param| param.kind == ParamKind::VarPositional);
        let accepts_var_keyword = self
            .params
            .iter()
            .any(|param| param.kind == ParamKind::VarKeyword);

        if positional.len() > fixed && !accepts_var_positional {
            return Err(Error::ArgumentCountMismatch {
                expected: fixed,
                got: positional.len(),
            });
        }

        let mut slots: Vec<Option<Value>> = vec![None; fixed];
        let mut surplus_positional = Vec::new();
        for (index, value) in positional.into_iter().enumerate() {
            match slots.get_mut(index) {
                Some(slot) => *slot = Some(value),
                None => surplus_positional.push(value),
            }
        }

        let mut surplus_keywords: Vec<(Value, Value)> = Vec::new();
        for (name, value) in keywords {
            match self.params[..fixed].iter().position(|param| param.name == name) {
                Some(index) if slots[index].is_some() => {
                    return Err(Error::DuplicateArgument { name });
                }
                Some(index) => slots[index] = Some(value),
                None if accepts_var_keyword => {
                    let key = Value::str(&name);
                    if surplus_keywords.iter().any(|(existing, _)| *existing == key) {
                        return Err(Error::DuplicateArgument { name });
                    }
                    surplus_keywords.push((key, value));
                }
                None => return Err(Error::UnexpectedArgument { name }),
            }
        }

        let mut bound = Vec::with_capacity(self.params.len());
        let mut slots = slots.into_iter();
        for param in &self.params {
            let value = match param.kind {
                ParamKind::Positional => match slots.next().flatten() {
                    Some(value) => value,
                    None => param.default.clone().ok_or_else(|| Error::MissingArgument {
                        name: param.name.clone(),
                    })?,
                },
                ParamKind::VarPositional => Value::Tuple(std::mem::take(&mut surplus_positional)),
                ParamKind::VarKeyword => Value::Dict(std::mem::take(&mut surplus_keywords)),
            };
            bound.push(value);
        }
        Ok(bound)
    }
}

/// Builder for [`Signature`].
#[derive(Debug, Default)]
pub struct SignatureBuilder {
    params: Vec<Param>,
    returns: Option<TypeSpec>,
}

impl SignatureBuilder {
    /// Adds an annotated positional parameter.
    #[must_use]
    pub fn param(self, name: &str, spec: impl Into<TypeSpec>) -> Self {
        self.with(Param::new(name).annotated(spec))
    }

    /// Adds an unannotated positional parameter.
    #[must_use]
    pub fn untyped(self, name: &str) -> Self {
        self.with(Param::new(name))
    }

    /// Adds a fully described parameter.
    #[must_use]
    pub fn with(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    /// Sets the return spec.
    #[must_use]
    pub fn returns(mut self, spec: impl Into<TypeSpec>) -> Self {
        self.returns = Some(spec.into());
        self
    }

    /// Validates parameter names and ordering.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidSpec::DuplicateParameter`],
    /// [`InvalidSpec::NonDefaultAfterDefault`] or
    /// [`InvalidSpec::MisplacedVariadic`] wrapped in [`Error::InvalidSpec`].
    pub fn build(self) -> Result<Signature> {
        let mut seen_default = false;
        let mut seen_var_positional = false;
        let mut seen_var_keyword = false;

        for (index, param) in self.params.iter().enumerate() {
            if self.params[..index].iter().any(|earlier| earlier.name == param.name) {
                return Err(InvalidSpec::DuplicateParameter {
                    name: param.name.clone(),
                }
                .into());
            }

            let misplaced = match param.kind {
                ParamKind::Positional => seen_var_positional || seen_var_keyword,
                ParamKind::VarPositional => seen_var_positional || seen_var_keyword,
                ParamKind::VarKeyword => seen_var_keyword,
            };
            if misplaced {
                return Err(InvalidSpec::MisplacedVariadic {
                    name: param.name.clone(),
                }
                .into());
            }

            match param.kind {
                ParamKind::Positional if param.has_default() => seen_default = true,
                ParamKind::Positional if seen_default => {
                    return Err(InvalidSpec::NonDefaultAfterDefault {
                        name: param.name.clone(),
                    }
                    .into());
                }
                ParamKind::Positional => {}
                ParamKind::VarPositional => seen_var_positional = true,
                ParamKind::VarKeyword => seen_var_keyword = true,
            }
        }

        Ok(Signature {
            params: self.params,
            returns: self.returns,
        })
    }
}
