//! Declaration scopes.
//!
//! Every declaration lives either in the global scope or inside the body of an
//! ambient module (`declare module "name" { ... }`). A declaration is
//! addressed by its `(scope, name)` pair, which is the unit of merging.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The scope a declaration is introduced in.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "camelCase")]
pub enum Scope {
    /// The global (script) scope shared by every fragment.
    Global,
    /// The body of the ambient module with the given specifier.
    Module(String),
}

impl Scope {
    /// Shorthand for `Scope::Module(name.into())`.
    pub fn module(name: impl Into<String>) -> Self {
        Self::Module(name.into())
    }

    pub const fn is_global(&self) -> bool {
        matches!(self, Self::Global)
    }

    /// The module specifier, if this is a module scope.
    pub fn module_name(&self) -> Option<&str> {
        match self {
            Self::Global => None,
            Self::Module(name) => Some(name),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => f.write_str("global"),
            Self::Module(name) => write!(f, "module \"{name}\""),
        }
    }
}

/// Key under which declarations are registered and merged.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DeclKey {
    pub scope: Scope,
    pub name: String,
}

impl DeclKey {
    pub fn new(scope: Scope, name: impl Into<String>) -> Self {
        Self {
            scope,
            name: name.into(),
        }
    }

    /// Key of a global declaration.
    pub fn global(name: impl Into<String>) -> Self {
        Self::new(Scope::Global, name)
    }

    /// Key of the module's own declaration (the `declare module "x"` itself).
    ///
    /// A module declares itself inside its own scope, so the stub for `"x"` is
    /// keyed `(Module("x"), "x")` and never collides with a global named `x`.
    pub fn module_self(module_name: impl Into<String>) -> Self {
        let module_name = module_name.into();
        Self::new(Scope::Module(module_name.clone()), module_name)
    }

    /// Whether this key names the module's own declaration.
    pub fn is_module_self(&self) -> bool {
        self.scope.module_name() == Some(self.name.as_str())
    }
}

impl fmt::Display for DeclKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.scope {
            Scope::Global => f.write_str(&self.name),
            Scope::Module(module) => write!(f, "\"{module}\".{}", self.name),
        }
    }
}
