//! Human-readable rendering of specs, used in error messages and logs.

use crate::spec::{Interface, Param, ParamKind, Signature, SpecKind, TypeSpec};
use std::fmt;

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            SpecKind::Any => f.write_str("any"),
            SpecKind::Plain(class) => f.write_str(class.name()),
            SpecKind::Predicate(predicate) => f.write_str(predicate.name()),
            SpecKind::And(left, right) => write!(f, "{left} & {right}"),
            SpecKind::Union(members) => {
                f.write_str("union[")?;
                write_list(f, members)?;
                f.write_str("]")
            }
            SpecKind::Interface(interface) => f.write_str(interface.name()),
            SpecKind::Signature(signature) => write!(f, "typedef{signature}"),
            SpecKind::List(element) => write!(f, "[{element}]"),
            SpecKind::Set(element) => write!(f, "{{{element}}}"),
            SpecKind::Tuple(elements) => {
                f.write_str("(")?;
                write_list(f, elements)?;
                if elements.len() == 1 {
                    f.write_str(",")?;
                }
                f.write_str(")")
            }
            SpecKind::Mapping { key, value } => write!(f, "{{{key}: {value}}}"),
            SpecKind::Optional(inner) => write!(f, "optional[{inner}]"),
            SpecKind::Only(class) => write!(f, "only[{}]", class.name()),
            SpecKind::Options(values) => {
                f.write_str("options[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value:?}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl fmt::Debug for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeSpec({self})")
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            ParamKind::Positional => {}
            ParamKind::VarPositional => f.write_str("*")?,
            ParamKind::VarKeyword => f.write_str("**")?,
        }
        f.write_str(self.name())?;
        if let Some(annotation) = self.annotation() {
            write!(f, ": {annotation}")?;
        }
        if let Some(default) = self.default_value() {
            write!(f, " = {default:?}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        write_list(f, self.params())?;
        f.write_str(")")?;
        if let Some(returns) = self.returns() {
            write!(f, " -> {returns}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Interface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use crate::runtime::{Value, builtins};
    use crate::spec::*;

    #[test]
    fn test_display_forms() {
        let int = TypeSpec::from(builtins::int());
        let str = TypeSpec::from(builtins::str());

        assert_eq!(any().to_string(), "any");
        assert_eq!(union([int.clone(), str.clone()]).unwrap().to_string(), "union[int, str]");
        assert_eq!(list_of(&int).to_string(), "[int]");
        assert_eq!(set_of(&str).to_string(), "{str}");
        assert_eq!(tuple_of([&int]).to_string(), "(int,)");
        assert_eq!(mapping_of(&str, &int).to_string(), "{str: int}");
        assert_eq!(optional(&int).to_string(), "optional[int]");
        assert_eq!(only(builtins::bool()).to_string(), "only[bool]");
        assert_eq!(options([Value::Int(1), Value::str("a")]).to_string(), "options[1, \"a\"]");
        assert_eq!((&int & &str).to_string(), "int & str");
    }

    #[test]
    fn test_signature_display() {
        let signature = Signature::builder()
            .param("a", builtins::int())
            .untyped("b")
            .with(Param::var_positional("rest").annotated(builtins::str()))
            .returns(builtins::bool())
            .build()
            .unwrap();
        assert_eq!(signature.to_string(), "(a: int, b, *rest: str) -> bool");

        let callable = typedef(Signature::empty()).unwrap();
        assert_eq!(callable.to_string(), "typedef()");
    }
}
