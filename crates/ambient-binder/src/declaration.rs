//! Declarations, members, and overloads.
//!
//! The same types describe a raw declaration (one site, as ingested) and a
//! merged one (every surviving site folded together). A raw member usually
//! carries a single overload; a merged member carries one per distinct
//! signature, in priority order.

use ambient_common::{DeclKey, DeclarationSite, Scope};
use ambient_types::{CallableSignature, Type, resolve_overload};
use serde::{Deserialize, Serialize};
use smallvec::{SmallVec, smallvec};

/// One signature of a member, tagged with the site that declared it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overload {
    pub signature: CallableSignature,
    pub site: DeclarationSite,
}

/// A member of an interface. Members are modeled uniformly as callables.
///
/// Always carries at least one overload: the list is only built by
/// [`Member::new`] and grown by the merge engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Member {
    pub name: String,
    /// Ordered by priority: a call resolves to the first compatible entry.
    pub(crate) overloads: SmallVec<[Overload; 1]>,
}

impl Member {
    pub fn new(
        name: impl Into<String>,
        signature: CallableSignature,
        site: DeclarationSite,
    ) -> Self {
        Self {
            name: name.into(),
            overloads: smallvec![Overload { signature, site }],
        }
    }

    /// The highest-priority signature.
    pub fn signature(&self) -> &CallableSignature {
        &self.overloads[0].signature
    }

    /// Every overload in priority order.
    pub fn overloads(&self) -> &[Overload] {
        &self.overloads
    }

    pub fn signatures(&self) -> impl Iterator<Item = &CallableSignature> {
        self.overloads.iter().map(|o| &o.signature)
    }

    pub fn is_overloaded(&self) -> bool {
        self.overloads.len() > 1
    }

    /// The first overload that accepts a call with these argument types.
    pub fn resolve_call(&self, arguments: &[Type]) -> Option<&CallableSignature> {
        resolve_overload(self.signatures(), arguments).map(|(_, signature)| signature)
    }
}

/// What a declaration introduces.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DeclarationKind {
    /// `declare module "x" {}`: asserts the module exists, says nothing else.
    ModuleStub,
    /// An interface with callable members.
    Interface { members: Vec<Member> },
}

/// A named entity introduced in a scope.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Declaration {
    pub name: String,
    pub scope: Scope,
    pub kind: DeclarationKind,
    /// Contributing sites in registration order. Raw declarations have one,
    /// merged ones at least one.
    pub(crate) sites: SmallVec<[DeclarationSite; 1]>,
}

impl Declaration {
    /// `declare module "name" {}`
    pub fn module_stub(module_name: impl Into<String>, site: DeclarationSite) -> Self {
        let module_name = module_name.into();
        Self {
            scope: Scope::Module(module_name.clone()),
            name: module_name,
            kind: DeclarationKind::ModuleStub,
            sites: smallvec![site],
        }
    }

    pub fn interface(
        scope: Scope,
        name: impl Into<String>,
        site: DeclarationSite,
        members: Vec<Member>,
    ) -> Self {
        Self {
            name: name.into(),
            scope,
            kind: DeclarationKind::Interface { members },
            sites: smallvec![site],
        }
    }

    pub fn key(&self) -> DeclKey {
        DeclKey::new(self.scope.clone(), self.name.clone())
    }

    /// The first contributing site.
    pub fn site(&self) -> &DeclarationSite {
        &self.sites[0]
    }

    /// Every contributing site in registration order.
    pub fn sites(&self) -> &[DeclarationSite] {
        &self.sites
    }

    pub const fn is_module_stub(&self) -> bool {
        matches!(self.kind, DeclarationKind::ModuleStub)
    }

    /// Members in declaration order; empty for a module stub.
    pub fn members(&self) -> &[Member] {
        match &self.kind {
            DeclarationKind::ModuleStub => &[],
            DeclarationKind::Interface { members } => members,
        }
    }

    pub fn member(&self, name: &str) -> Option<&Member> {
        self.members().iter().find(|m| m.name == name)
    }

    /// Add a member, turning a module stub into an interface.
    pub fn push_member(&mut self, member: Member) {
        match &mut self.kind {
            DeclarationKind::Interface { members } => members.push(member),
            DeclarationKind::ModuleStub => {
                self.kind = DeclarationKind::Interface {
                    members: vec![member],
                };
            }
        }
    }
}
