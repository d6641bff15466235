//! Display formatting for types and signatures, in declaration-file syntax.

use crate::types::{CallableSignature, Parameter, Type};
use std::fmt;

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Any => f.write_str("any"),
            Type::String => f.write_str("string"),
            Type::Void => f.write_str("void"),
            Type::Function(signature) if **signature == CallableSignature::untyped() => {
                f.write_str("Function")
            }
            Type::Function(signature) => write!(f, "{signature}"),
            Type::Unresolved(name) => f.write_str(name),
            Type::Declared(key) => write!(f, "{key}"),
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.variadic {
            write!(f, "...{}: {}[]", self.name, self.ty)
        } else if self.optional {
            write!(f, "{}?: {}", self.name, self.ty)
        } else {
            write!(f, "{}: {}", self.name, self.ty)
        }
    }
}

impl fmt::Display for CallableSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, parameter) in self.parameters.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{parameter}")?;
        }
        write!(f, ") => {}", self.return_type)
    }
}
