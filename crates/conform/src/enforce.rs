//! Call-site enforcement.
//!
//! [`typechecked`] and [`Enforcer::wrap`] turn a function with an annotated
//! signature into one that checks its arguments before the body runs and
//! its return value afterwards. Only annotated parameters and returns are
//! checked. The wrapper keeps the name and signature of the original.
//!
//! # Example
//!
//! ```rust
//! use conform::runtime::{Args, Function, Value, builtins};
//! use conform::spec::Signature;
//! use conform::{Error, typechecked};
//!
//! let signature = Signature::builder()
//!     .param("n", builtins::int())
//!     .returns(builtins::int())
//!     .build()
//!     .unwrap();
//! let double = Function::new("double", signature, |args| match &args[0] {
//!     Value::Int(n) => Ok(Value::Int(n * 2)),
//!     _ => Ok(Value::None),
//! });
//!
//! let checked = typechecked(&double).unwrap();
//! assert_eq!(checked.call(Args::new().arg(21)).unwrap(), Value::Int(42));
//! assert!(matches!(
//!     checked.call(Args::new().arg("21")),
//!     Err(Error::TypeMismatch { .. })
//! ));
//! ```

use crate::check::satisfies;
use crate::error::{Error, InvalidSpec, Result};
use crate::runtime::{Function, Value};
use crate::spec::{ParamKind, Signature, TypeSpec};
use conform_log::{debug, warn};
use std::sync::Arc;

/// What an enforced function checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnforceConfig {
    /// Check annotated arguments before the body runs.
    pub check_arguments: bool,
    /// Check the return value against the return annotation.
    pub check_return: bool,
    /// Let `None` through every annotation.
    pub none_passes: bool,
}

impl Default for EnforceConfig {
    fn default() -> Self {
        Self {
            check_arguments: true,
            check_return: true,
            none_passes: false,
        }
    }
}

impl EnforceConfig {
    /// Environment variable read by [`EnforceConfig::from_env`].
    pub const ENV: &'static str = "CONFORM_ENFORCE";

    /// Parses a check selection: `all`, `arguments`, `return` or `off`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] for any other string.
    ///
    /// ```rust
    /// use conform::EnforceConfig;
    ///
    /// let config = EnforceConfig::parse("return").unwrap();
    /// assert!(!config.check_arguments);
    /// assert!(config.check_return);
    /// assert!(EnforceConfig::parse("sometimes").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let (check_arguments, check_return) = match s.trim().to_ascii_lowercase().as_str() {
            "all" => (true, true),
            "arguments" | "args" => (true, false),
            "return" => (false, true),
            "off" | "none" => (false, false),
            _ => {
                return Err(Error::InvalidConfig {
                    value: s.to_string(),
                });
            }
        };
        Ok(Self {
            check_arguments,
            check_return,
            ..Self::default()
        })
    }

    /// Reads `CONFORM_ENFORCE`, falling back to the default when it is unset
    /// or invalid.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_var(std::env::var(Self::ENV).ok().as_deref())
    }

    /// Resolves the raw value of `CONFORM_ENFORCE`.
    fn from_var(raw: Option<&str>) -> Self {
        match raw {
            Some(raw) => Self::parse(raw).unwrap_or_else(|err| {
                warn!("{err}; enforcing all checks");
                Self::default()
            }),
            None => Self::default(),
        }
    }

    /// Sets whether `None` passes every annotation.
    #[must_use]
    pub fn none_passes(mut self, none_passes: bool) -> Self {
        self.none_passes = none_passes;
        self
    }
}

/// Wraps functions with argument and return checks.
#[derive(Debug, Clone, Copy, Default)]
pub struct Enforcer {
    config: EnforceConfig,
}

impl Enforcer {
    #[must_use]
    pub fn new(config: EnforceConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> EnforceConfig {
        self.config
    }

    /// Returns a checked version of `function`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidSpec::OpaqueSignature`] when `function` has no
    /// inspectable signature.
    pub fn wrap(&self, function: &Function) -> Result<Function> {
        let signature = function
            .signature()
            .cloned()
            .ok_or_else(|| InvalidSpec::OpaqueSignature {
                function: function.name().to_string(),
            })?;

        debug!("enforcing {}{signature}", function.name());

        let config = self.config;
        let inner = function.clone();
        let checked = signature.clone();
        Ok(Function::from_parts(
            function.name().to_string(),
            Some(signature),
            Arc::new(move |bound: &[Value]| {
                if config.check_arguments {
                    check_arguments(inner.name(), &checked, bound, config)?;
                }
                let result = inner.invoke_bound(bound)?;
                if config.check_return {
                    if let Some(spec) = checked.returns() {
                        check_value(inner.name(), "return value", &result, spec, config)?;
                    }
                }
                Ok(result)
            }),
        ))
    }
}

/// Wraps `function` with every check enabled.
///
/// # Errors
///
/// See [`Enforcer::wrap`].
pub fn typechecked(function: &Function) -> Result<Function> {
    Enforcer::default().wrap(function)
}

fn check_arguments(
    function: &str,
    signature: &Signature,
    bound: &[Value],
    config: EnforceConfig,
) -> Result<()> {
    for (param, value) in signature.params().iter().zip(bound) {
        let Some(spec) = param.annotation() else {
            continue;
        };
        match (param.kind(), value) {
            (ParamKind::VarPositional, Value::Tuple(items)) => {
                for item in items {
                    check_value(function, param.name(), item, spec, config)?;
                }
            }
            (ParamKind::VarKeyword, Value::Dict(entries)) => {
                for (_, item) in entries {
                    check_value(function, param.name(), item, spec, config)?;
                }
            }
            _ => check_value(function, param.name(), value, spec, config)?,
        }
    }
    Ok(())
}

fn check_value(
    function: &str,
    target: &str,
    value: &Value,
    spec: &TypeSpec,
    config: EnforceConfig,
) -> Result<()> {
    if (config.none_passes && value.is_none()) || satisfies(value, spec) {
        return Ok(());
    }
    let found = value.class().name().to_string();
    debug!("{function}: \"{target}\" expected {spec}, got {found}");
    Err(Error::TypeMismatch {
        target: target.to_string(),
        expected: spec.clone(),
        found,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{Args, builtins};
    use crate::spec::Param;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn identity(returns: Option<&crate::runtime::Class>) -> Function {
        let mut builder = Signature::builder().param("x", builtins::int());
        if let Some(class) = returns {
            builder = builder.returns(class);
        }
        Function::new("identity", builder.build().unwrap(), |args| Ok(args[0].clone()))
    }

    #[test]
    fn test_parse_config() {
        assert_eq!(EnforceConfig::parse("ALL").unwrap(), EnforceConfig::default());
        let off = EnforceConfig::parse("off").unwrap();
        assert!(!off.check_arguments && !off.check_return);
        assert_eq!(
            EnforceConfig::parse("loud"),
            Err(Error::InvalidConfig { value: "loud".into() })
        );
    }

    #[test]
    fn test_config_from_var() {
        assert_eq!(EnforceConfig::from_var(None), EnforceConfig::default());
        assert_eq!(EnforceConfig::from_var(Some("sometimes")), EnforceConfig::default());
        let arguments = EnforceConfig::from_var(Some("arguments"));
        assert!(arguments.check_arguments && !arguments.check_return);
    }

    #[test]
    fn test_config_from_env() {
        // SAFETY: no other test reads or writes CONFORM_ENFORCE.
        unsafe { std::env::set_var(EnforceConfig::ENV, "return") };
        let config = EnforceConfig::from_env();
        assert!(!config.check_arguments && config.check_return);

        unsafe { std::env::set_var(EnforceConfig::ENV, "sometimes") };
        assert_eq!(EnforceConfig::from_env(), EnforceConfig::default());

        unsafe { std::env::remove_var(EnforceConfig::ENV) };
        assert_eq!(EnforceConfig::from_env(), EnforceConfig::default());

        unsafe { std::env::set_var(EnforceConfig::ENV, "off") };
        let checked = Enforcer::new(EnforceConfig::from_env())
            .wrap(&identity(Some(builtins::int())))
            .unwrap();
        unsafe { std::env::remove_var(EnforceConfig::ENV) };
        assert_eq!(checked.call(Args::new().arg("s")).unwrap(), Value::str("s"));
    }

    #[test]
    fn test_argument_checked_before_body() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let signature = Signature::builder()
            .param("n", builtins::int())
            .build()
            .unwrap();
        let body = Function::new("count", signature, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Value::None)
        });

        let checked = typechecked(&body).unwrap();
        let err = checked.call(Args::new().arg("x")).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { ref target, .. } if target == "n"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_return_checked() {
        let wrong = Function::new(
            "wrong",
            Signature::builder().returns(builtins::str()).build().unwrap(),
            |_| Ok(Value::Int(1)),
        );
        let err = typechecked(&wrong).unwrap().call(Args::new()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Incorrect type for \"return value\": expected str, got int"
        );
    }

    #[test]
    fn test_unannotated_return_not_checked() {
        let checked = typechecked(&identity(None)).unwrap();
        assert_eq!(checked.call(Args::new().arg(3)).unwrap(), Value::Int(3));
    }

    #[test]
    fn test_config_switches() {
        let return_only = Enforcer::new(EnforceConfig::parse("return").unwrap());
        let checked = return_only.wrap(&identity(Some(builtins::int()))).unwrap();
        assert_eq!(checked.call(Args::new().arg("s")), Err(Error::TypeMismatch {
            target: "return value".into(),
            expected: TypeSpec::from(builtins::int()),
            found: "str".into(),
        }));

        let lenient = Enforcer::new(EnforceConfig::default().none_passes(true));
        let checked = lenient.wrap(&identity(Some(builtins::int()))).unwrap();
        assert_eq!(checked.call(Args::new().arg(Value::None)).unwrap(), Value::None);
    }

    #[test]
    fn test_variadic_annotations_apply_per_element() {
        let signature = Signature::builder()
            .with(Param::var_positional("values").annotated(builtins::int()))
            .build()
            .unwrap();
        let total = Function::new("total", signature, |args| Ok(args[0].clone()));
        let checked = typechecked(&total).unwrap();

        assert!(checked.call(Args::new().arg(1).arg(2)).is_ok());
        assert!(checked.call(Args::new().arg(1).arg("2")).is_err());
    }

    #[test]
    fn test_opaque_function_rejected() {
        let opaque = Function::opaque("raw", |_| Ok(Value::None));
        assert_eq!(
            typechecked(&opaque).unwrap_err(),
            Error::InvalidSpec(InvalidSpec::OpaqueSignature {
                function: "raw".into()
            })
        );
    }

    #[test]
    fn test_wrapper_keeps_identity_metadata() {
        let original = identity(Some(builtins::int()));
        let checked = typechecked(&original).unwrap();
        assert_eq!(checked.name(), original.name());
        assert_eq!(checked.signature(), original.signature());
        assert_ne!(checked, original);
    }
}
