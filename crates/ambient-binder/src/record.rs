//! Parser-facing input records and fragment ingestion.
//!
//! The parser is not part of this engine. It hands over one record per module
//! stub or interface member, already structured. Records from one declaration
//! file form a [`Fragment`]; ingesting a fragment groups its records into one
//! raw [`Declaration`] per `(scope, name)`, which is a declaration site.

use crate::declaration::{Declaration, Member};
use ambient_common::{DeclKey, DeclarationSite, Scope};
use ambient_types::{CallableSignature, Parameter, Type};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

// =============================================================================
// Records
// =============================================================================

/// A type annotation as the parser saw it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeRef {
    /// A type name: `any`, `string`, `void`, `Function`, or a reference.
    Name(String),
    /// An inline function type.
    Function(FunctionTypeRef),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionTypeRef {
    #[serde(default)]
    pub parameters: Vec<ParameterRecord>,
    #[serde(default)]
    pub return_type_ref: Option<Box<TypeRef>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterRecord {
    pub name: String,
    /// Absent means `any`.
    #[serde(default)]
    pub type_ref: Option<TypeRef>,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub variadic: bool,
}

/// One declaration record handed over by the parser.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DeclarationRecord {
    #[serde(rename_all = "camelCase")]
    ModuleStub { module_name: String },
    #[serde(rename_all = "camelCase")]
    InterfaceMember {
        interface_name: String,
        member_name: String,
        #[serde(default)]
        parameters: Vec<ParameterRecord>,
        /// Absent means `any`.
        #[serde(default)]
        return_type_ref: Option<TypeRef>,
        /// Set when the interface is written inside `declare module "x" { }`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        module: Option<String>,
    },
}

impl DeclarationRecord {
    pub fn module_stub(module_name: impl Into<String>) -> Self {
        Self::ModuleStub {
            module_name: module_name.into(),
        }
    }

    /// A global interface member.
    pub fn member(
        interface_name: impl Into<String>,
        member_name: impl Into<String>,
        parameters: Vec<ParameterRecord>,
        return_type_ref: Option<TypeRef>,
    ) -> Self {
        Self::InterfaceMember {
            interface_name: interface_name.into(),
            member_name: member_name.into(),
            parameters,
            return_type_ref,
            module: None,
        }
    }

    /// The key of the declaration this record contributes to.
    pub fn key(&self) -> DeclKey {
        match self {
            Self::ModuleStub { module_name } => DeclKey::module_self(module_name.clone()),
            Self::InterfaceMember {
                interface_name,
                module,
                ..
            } => {
                let scope = module.clone().map_or(Scope::Global, Scope::Module);
                DeclKey::new(scope, interface_name.clone())
            }
        }
    }
}

impl ParameterRecord {
    pub fn new(name: impl Into<String>, type_ref: Option<TypeRef>) -> Self {
        Self {
            name: name.into(),
            type_ref,
            optional: false,
            variadic: false,
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn variadic(mut self) -> Self {
        self.variadic = true;
        self
    }

    fn lower(&self) -> Parameter {
        let ty = match &self.type_ref {
            None => Type::Any,
            // `...objects: any[]` annotates the collected array; the model
            // stores the element type.
            Some(TypeRef::Name(name)) if self.variadic => {
                Type::from_name(name.strip_suffix("[]").unwrap_or(name))
            }
            Some(type_ref) => type_ref.lower(),
        };
        Parameter {
            name: self.name.clone(),
            ty,
            optional: self.optional,
            variadic: self.variadic,
        }
    }
}

impl TypeRef {
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    /// Convert to the signature model.
    pub fn lower(&self) -> Type {
        match self {
            Self::Name(name) => Type::from_name(name),
            Self::Function(function) => Type::function(lower_signature(
                &function.parameters,
                function.return_type_ref.as_deref(),
            )),
        }
    }
}

fn lower_signature(
    parameters: &[ParameterRecord],
    return_type: Option<&TypeRef>,
) -> CallableSignature {
    CallableSignature::new(
        parameters.iter().map(ParameterRecord::lower).collect(),
        return_type.map_or(Type::Any, TypeRef::lower),
    )
}

// =============================================================================
// Fragments
// =============================================================================

/// Error raised while reading records or options.
#[derive(Debug)]
pub enum IngestError {
    /// The input was not a valid record list or options object.
    Json(serde_json::Error),
    /// An embedded library was requested by a name that does not exist.
    UnknownLib(String),
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(err) => write!(f, "invalid declaration input: {err}"),
            Self::UnknownLib(name) => write!(f, "unknown embedded library '{name}'"),
        }
    }
}

impl std::error::Error for IngestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::UnknownLib(_) => None,
        }
    }
}

impl From<serde_json::Error> for IngestError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

/// The records of one declaration file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Fragment {
    pub file_name: String,
    pub records: Vec<DeclarationRecord>,
}

impl Fragment {
    pub fn new(file_name: impl Into<String>, records: Vec<DeclarationRecord>) -> Self {
        Self {
            file_name: file_name.into(),
            records,
        }
    }

    /// Parse a JSON array of records.
    pub fn from_json(file_name: impl Into<String>, json: &str) -> Result<Self, IngestError> {
        let records: Vec<DeclarationRecord> = serde_json::from_str(json)?;
        Ok(Self::new(file_name, records))
    }

    /// Group records into raw declarations in first-seen order: one per
    /// module stub and one per `(scope, name)` interface. A stub stays its own
    /// site even when an interface in the same fragment shares its key, so
    /// dropping a malformed interface never takes the stub with it.
    ///
    /// A declaration's site points at its first record; each member's site
    /// points at the member's own record.
    pub fn declarations(&self) -> Vec<Declaration> {
        let mut grouped: IndexMap<(DeclKey, bool), Declaration> = IndexMap::new();

        for (ordinal, record) in self.records.iter().enumerate() {
            let site = DeclarationSite::new(self.file_name.clone(), ordinal as u32);
            let key = record.key();
            match record {
                DeclarationRecord::ModuleStub { module_name } => {
                    grouped
                        .entry((key, true))
                        .or_insert_with(|| Declaration::module_stub(module_name.clone(), site));
                }
                DeclarationRecord::InterfaceMember {
                    interface_name,
                    member_name,
                    parameters,
                    return_type_ref,
                    ..
                } => {
                    let signature = lower_signature(parameters, return_type_ref.as_ref());
                    let declaration =
                        grouped.entry((key, false)).or_insert_with_key(|(key, _)| {
                            Declaration::interface(
                                key.scope.clone(),
                                interface_name.clone(),
                                site.clone(),
                                Vec::new(),
                            )
                        });
                    declaration.push_member(Member::new(member_name.clone(), signature, site));
                }
            }
        }

        debug!(
            file = %self.file_name,
            records = self.records.len(),
            declarations = grouped.len(),
            "ingested fragment"
        );
        grouped.into_values().collect()
    }
}
