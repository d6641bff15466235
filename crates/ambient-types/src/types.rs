//! Type and signature representation.

use ambient_common::DeclKey;
use serde::{Deserialize, Serialize};

// =============================================================================
// Type
// =============================================================================

/// A type as written in an ambient declaration.
///
/// `Any` is the top type: it is what an omitted annotation means, and it is
/// compatible with every other variant in both directions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Type {
    #[default]
    Any,
    String,
    Void,
    /// A nested callable type.
    Function(Box<CallableSignature>),
    /// A reference to a type declared elsewhere, not yet looked up.
    Unresolved(String),
    /// A reference that was looked up and found in the symbol table.
    Declared(DeclKey),
}

impl Type {
    /// Map a type name as written in a declaration to a type.
    ///
    /// Keywords become intrinsics, `Function` becomes the untyped callable,
    /// and anything else is a reference left for the symbol table to resolve.
    pub fn from_name(name: &str) -> Self {
        match name {
            "any" => Self::Any,
            "string" => Self::String,
            "void" => Self::Void,
            "Function" => Self::untyped_function(),
            other => Self::Unresolved(other.to_string()),
        }
    }

    /// The bare `Function` type: `(...args: any) => any`.
    pub fn untyped_function() -> Self {
        Self::Function(Box::new(CallableSignature::untyped()))
    }

    pub fn function(signature: CallableSignature) -> Self {
        Self::Function(Box::new(signature))
    }

    pub const fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }

    pub const fn is_function(&self) -> bool {
        matches!(self, Self::Function(_))
    }

    /// The nested signature, for function types.
    pub fn as_signature(&self) -> Option<&CallableSignature> {
        match self {
            Self::Function(signature) => Some(signature),
            _ => None,
        }
    }

    /// Structural identity, ignoring parameter names inside function types.
    pub fn is_identical_to(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Function(a), Self::Function(b)) => a.is_identical_to(b),
            _ => self == other,
        }
    }

    /// Visit every unresolved reference in this type, innermost function
    /// types included, replacing it with whatever `resolve` returns.
    pub fn resolve_references(&mut self, resolve: &mut impl FnMut(&str) -> Type) {
        match self {
            Self::Unresolved(name) => *self = resolve(name),
            Self::Function(signature) => signature.resolve_references(resolve),
            Self::Any | Self::String | Self::Void | Self::Declared(_) => {}
        }
    }
}

// =============================================================================
// Parameter
// =============================================================================

/// One parameter of a callable signature.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub ty: Type,
    pub optional: bool,
    /// A rest parameter (`...name`). `ty` is the element type.
    pub variadic: bool,
}

impl Parameter {
    /// A required parameter.
    pub fn required(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            optional: false,
            variadic: false,
        }
    }

    pub fn optional(name: impl Into<String>, ty: Type) -> Self {
        Self {
            optional: true,
            ..Self::required(name, ty)
        }
    }

    pub fn variadic(name: impl Into<String>, element: Type) -> Self {
        Self {
            variadic: true,
            ..Self::required(name, element)
        }
    }

    /// Whether a call may omit this parameter.
    pub const fn may_be_omitted(&self) -> bool {
        self.optional || self.variadic
    }

    fn is_identical_to(&self, other: &Self) -> bool {
        self.optional == other.optional
            && self.variadic == other.variadic
            && self.ty.is_identical_to(&other.ty)
    }
}

// =============================================================================
// CallableSignature
// =============================================================================

/// Parameter list and return type of a callable.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallableSignature {
    pub parameters: Vec<Parameter>,
    pub return_type: Type,
}

impl CallableSignature {
    pub fn new(parameters: Vec<Parameter>, return_type: Type) -> Self {
        Self {
            parameters,
            return_type,
        }
    }

    /// `(...args: any) => any`
    pub fn untyped() -> Self {
        Self::new(vec![Parameter::variadic("args", Type::Any)], Type::Any)
    }

    /// Number of arguments a call must supply.
    pub fn min_arity(&self) -> usize {
        self.parameters
            .iter()
            .take_while(|p| !p.may_be_omitted())
            .count()
    }

    /// Number of arguments a call may supply, `None` when a rest parameter
    /// accepts any number.
    pub fn max_arity(&self) -> Option<usize> {
        if self.parameters.iter().any(|p| p.variadic) {
            None
        } else {
            Some(self.parameters.len())
        }
    }

    /// Same parameter count, parameter types, optionality, variadic flags and
    /// return type. Parameter names do not matter.
    pub fn is_identical_to(&self, other: &Self) -> bool {
        self.parameters.len() == other.parameters.len()
            && self
                .parameters
                .iter()
                .zip(&other.parameters)
                .all(|(a, b)| a.is_identical_to(b))
            && self.return_type.is_identical_to(&other.return_type)
    }

    /// Apply [`Type::resolve_references`] to every parameter and the return
    /// type.
    pub fn resolve_references(&mut self, resolve: &mut impl FnMut(&str) -> Type) {
        for parameter in &mut self.parameters {
            parameter.ty.resolve_references(resolve);
        }
        self.return_type.resolve_references(resolve);
    }

    /// Names of every unresolved reference, in parameter order then return
    /// type, nested function types included.
    pub fn unresolved_references(&self) -> Vec<&str> {
        fn collect<'a>(ty: &'a Type, out: &mut Vec<&'a str>) {
            match ty {
                Type::Unresolved(name) => out.push(name),
                Type::Function(signature) => {
                    for parameter in &signature.parameters {
                        collect(&parameter.ty, out);
                    }
                    collect(&signature.return_type, out);
                }
                Type::Any | Type::String | Type::Void | Type::Declared(_) => {}
            }
        }

        let mut out = Vec::new();
        for parameter in &self.parameters {
            collect(&parameter.ty, &mut out);
        }
        collect(&self.return_type, &mut out);
        out
    }
}
