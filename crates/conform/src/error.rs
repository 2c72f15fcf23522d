//! Error types for the `conform` engine.
//!
//! Construction of a malformed spec fails immediately with
//! [`Error::InvalidSpec`]. Conformance queries never fail: `satisfies` and
//! `is_subtype` answer `false`. The remaining variants come from calling
//! functions: argument binding, call-site enforcement and overload dispatch.

use crate::spec::TypeSpec;
use std::fmt;

/// Ways a spec can be malformed at construction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidSpec {
    /// `union` was given no members.
    EmptyUnion,

    /// A literal leaf was a plain value instead of a class or spec.
    NotAType {
        /// Display form of the offending value.
        found: String,
    },

    /// A container literal had the wrong number of elements.
    MalformedLiteral {
        /// Which container was being built ("list", "set", "mapping").
        container: &'static str,
        /// Number of elements the shape requires.
        expected: usize,
        /// Number of elements supplied.
        got: usize,
    },

    /// A typedef or interface method declared `*args` / `**kwargs`.
    VariadicSignature {
        /// Name of the variadic parameter.
        param: String,
    },

    /// Two parameters of one signature share a name.
    DuplicateParameter {
        /// The repeated name.
        name: String,
    },

    /// A parameter without a default follows one with a default.
    NonDefaultAfterDefault {
        /// The parameter missing a default.
        name: String,
    },

    /// A variadic parameter is repeated or followed by a positional one.
    MisplacedVariadic {
        /// The offending parameter.
        name: String,
    },

    /// An interface declares the same member twice.
    DuplicateMember {
        /// The repeated member name.
        name: String,
    },

    /// The callable has no inspectable signature to enforce or overload on.
    OpaqueSignature {
        /// Name of the callable.
        function: String,
    },
}

impl fmt::Display for InvalidSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidSpec::EmptyUnion => {
                write!(f, "union requires at least one member")
            }
            InvalidSpec::NotAType { found } => {
                write!(f, "expected a type or spec, found value {found}")
            }
            InvalidSpec::MalformedLiteral {
                container,
                expected,
                got,
            } => {
                write!(
                    f,
                    "{container} spec literal needs exactly {expected} element(s), got {got}"
                )
            }
            InvalidSpec::VariadicSignature { param } => {
                write!(
                    f,
                    "variadic parameter '{param}' is not supported in typedefs"
                )
            }
            InvalidSpec::DuplicateParameter { name } => {
                write!(f, "duplicate parameter '{name}'")
            }
            InvalidSpec::NonDefaultAfterDefault { name } => {
                write!(
                    f,
                    "parameter '{name}' without a default follows a parameter with a default"
                )
            }
            InvalidSpec::MisplacedVariadic { name } => {
                write!(f, "misplaced variadic parameter '{name}'")
            }
            InvalidSpec::DuplicateMember { name } => {
                write!(f, "interface member '{name}' declared twice")
            }
            InvalidSpec::OpaqueSignature { function } => {
                write!(f, "function '{function}' has no inspectable signature")
            }
        }
    }
}

/// Errors produced by the `conform` engine and the host runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A spec factory received malformed input.
    InvalidSpec(InvalidSpec),

    /// An enforced argument or return value failed its declared spec.
    TypeMismatch {
        /// Parameter name, or `"return value"`.
        target: String,
        /// The declared spec.
        expected: TypeSpec,
        /// Class name of the offending value.
        found: String,
    },

    /// Too many positional arguments for the signature.
    ArgumentCountMismatch {
        /// Maximum number of positional arguments accepted
        expected: usize,
        /// Actual number of positional arguments provided
        got: usize,
    },

    /// A required parameter received no argument.
    MissingArgument {
        /// The parameter name.
        name: String,
    },

    /// A keyword argument matches no parameter.
    UnexpectedArgument {
        /// The keyword.
        name: String,
    },

    /// A parameter received both a positional and a keyword argument.
    DuplicateArgument {
        /// The parameter name.
        name: String,
    },

    /// The value cannot be called.
    NotCallable {
        /// Class name of the value.
        class: String,
    },

    /// A function with an equivalent signature is already in the overload set.
    AmbiguousFunction {
        /// Name of the overload set.
        name: String,
    },

    /// No function in the overload set accepts the arguments.
    FunctionNotFound {
        /// Name of the overload set.
        name: String,
        /// Class names of the supplied arguments.
        arguments: Vec<String>,
    },

    /// A function body reported a failure.
    CallFailed {
        /// Name of the failing function.
        function: String,
        /// Human-readable reason for failure.
        reason: String,
    },

    /// A configuration string could not be parsed.
    InvalidConfig {
        /// The rejected value.
        value: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidSpec(invalid) => write!(f, "Invalid spec: {invalid}"),
            Error::TypeMismatch {
                target,
                expected,
                found,
            } => {
                write!(
                    f,
                    "Incorrect type for \"{target}\": expected {expected}, got {found}"
                )
            }
            Error::ArgumentCountMismatch { expected, got } => {
                write!(
                    f,
                    "Argument count mismatch: expected at most {expected}, got {got}"
                )
            }
            Error::MissingArgument { name } => {
                write!(f, "Missing argument for parameter '{name}'")
            }
            Error::UnexpectedArgument { name } => {
                write!(f, "Unexpected keyword argument '{name}'")
            }
            Error::DuplicateArgument { name } => {
                write!(f, "Multiple values for argument '{name}'")
            }
            Error::NotCallable { class } => {
                write!(f, "Value of class '{class}' is not callable")
            }
            Error::AmbiguousFunction { name } => {
                write!(f, "Function '{name}' is ambiguous with an existing overload")
            }
            Error::FunctionNotFound { name, arguments } => {
                write!(
                    f,
                    "No overload of '{name}' accepts ({})",
                    arguments.join(", ")
                )
            }
            Error::CallFailed { function, reason } => {
                write!(f, "Call to '{function}' failed: {reason}")
            }
            Error::InvalidConfig { value } => {
                write!(f, "Invalid configuration value '{value}'")
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<InvalidSpec> for Error {
    fn from(invalid: InvalidSpec) -> Self {
        Error::InvalidSpec(invalid)
    }
}

/// Result type for `conform` operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::builtins;

    #[test]
    fn test_error_display() {
        assert_eq!(
            format!("{}", Error::InvalidSpec(InvalidSpec::EmptyUnion)),
            "Invalid spec: union requires at least one member"
        );
        assert_eq!(
            format!("{}", Error::ArgumentCountMismatch { expected: 1, got: 3 }),
            "Argument count mismatch: expected at most 1, got 3"
        );
    }

    #[test]
    fn test_type_mismatch_names_target_and_spec() {
        let err = Error::TypeMismatch {
            target: "n".to_string(),
            expected: TypeSpec::from(builtins::int()),
            found: "str".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Incorrect type for \"n\": expected int, got str"
        );
    }

    #[test]
    fn test_invalid_spec_conversion() {
        let err: Error = InvalidSpec::DuplicateMember {
            name: "age".to_string(),
        }
        .into();
        assert!(matches!(err, Error::InvalidSpec(InvalidSpec::DuplicateMember { .. })));
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(
            Error::MissingArgument { name: "a".into() },
            Error::MissingArgument { name: "a".into() }
        );
        assert_ne!(
            Error::MissingArgument { name: "a".into() },
            Error::MissingArgument { name: "b".into() }
        );
    }
}
