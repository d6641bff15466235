//! Symbol table builder.
//!
//! Turns a merged table into the frozen [`SymbolTable`] the type checker
//! reads. The only transformation is reference resolution: every
//! `Unresolved(name)` inside a member signature is looked up once in the
//! merged table and becomes `Declared(key)`, or `Any` plus an `UnknownType`
//! diagnostic when nothing by that name exists. Overloads made identical by
//! that fallback collapse into the first one, and any overload-ambiguity
//! warning raised for the dropped overload is withdrawn.
//!
//! Lookup order for a name referenced from scope `S`:
//! 1. `(S, name)`
//! 2. `(Global, name)`
//! 3. the first module scope declaring `name`, when
//!    [`MergeOptions::resolve_across_modules`] is set

use crate::declaration::{Declaration, DeclarationKind, Member, Overload};
use crate::merge::{MergedTable, merge_all_with_options};
use crate::options::MergeOptions;
use crate::registry::DeclarationRegistry;
use ambient_common::{DeclKey, DeclarationSite, Diagnostic, DiagnosticBag, DiagnosticKind, Scope};
use ambient_types::Type;
use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;
use smallvec::SmallVec;
use tracing::{debug, trace};

// =============================================================================
// Module view
// =============================================================================

/// Everything declared for one ambient module.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ModuleDeclaration {
    pub name: String,
    /// Declarations inside the module body, in first-registration order. The
    /// module's own stub is not listed.
    pub declarations: Vec<Declaration>,
}

impl ModuleDeclaration {
    /// A module is opaque when nothing declared for it carries members.
    pub fn is_opaque(&self) -> bool {
        self.declarations.iter().all(|d| d.members().is_empty())
    }

    /// Every member of every declaration in the module.
    pub fn members(&self) -> impl Iterator<Item = &Member> {
        self.declarations.iter().flat_map(|d| d.members())
    }

    pub fn declaration(&self, name: &str) -> Option<&Declaration> {
        self.declarations.iter().find(|d| d.name == name)
    }
}

// =============================================================================
// SymbolTable
// =============================================================================

/// The frozen result of one build.
///
/// There is no mutating API: a new session builds a new table. Lookups take
/// `&self` only, so the table can be shared across threads behind an `Arc`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SymbolTable {
    declarations: Vec<Declaration>,
    modules: Vec<ModuleDeclaration>,
    diagnostics: Vec<Diagnostic>,
    #[serde(skip)]
    declaration_index: FxHashMap<DeclKey, usize>,
    #[serde(skip)]
    module_index: FxHashMap<String, usize>,
}

impl SymbolTable {
    /// Register nothing, merge, and build: an empty table.
    pub fn empty() -> Self {
        build(MergedTable::default(), Vec::new())
    }

    /// Merge `registry` and build its table in one step.
    pub fn from_registry(registry: &DeclarationRegistry, options: &MergeOptions) -> Self {
        let (merged, diagnostics) = merge_all_with_options(registry, options);
        build_with_options(merged, diagnostics, options)
    }

    /// A global declaration by name.
    pub fn lookup_global(&self, name: &str) -> Option<&Declaration> {
        self.lookup(&Scope::Global, name)
    }

    /// An ambient module by specifier.
    pub fn lookup_module(&self, module_name: &str) -> Option<&ModuleDeclaration> {
        self.module_index
            .get(module_name)
            .map(|&index| &self.modules[index])
    }

    pub fn lookup(&self, scope: &Scope, name: &str) -> Option<&Declaration> {
        self.get(&DeclKey::new(scope.clone(), name))
    }

    pub fn get(&self, key: &DeclKey) -> Option<&Declaration> {
        self.declaration_index
            .get(key)
            .map(|&index| &self.declarations[index])
    }

    /// The declaration a resolved reference points at.
    pub fn declaration_of(&self, ty: &Type) -> Option<&Declaration> {
        match ty {
            Type::Declared(key) => self.get(key),
            _ => None,
        }
    }

    /// Diagnostics from merging and building, in the order they were found.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// All declarations, every scope, in first-registration order.
    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    pub fn globals(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.iter().filter(|d| d.scope.is_global())
    }

    pub fn modules(&self) -> &[ModuleDeclaration] {
        &self.modules
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Canonical JSON encoding. Two builds of the same registry encode to
    /// the same bytes.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Build with default options.
pub fn build(merged: MergedTable, diagnostics: Vec<Diagnostic>) -> SymbolTable {
    build_with_options(merged, diagnostics, &MergeOptions::default())
}

/// Resolve references in `merged` and freeze it. `diagnostics` are the merge
/// diagnostics; resolution diagnostics are appended after them.
#[tracing::instrument(level = "debug", skip_all, fields(entries = merged.len()))]
pub fn build_with_options(
    merged: MergedTable,
    diagnostics: Vec<Diagnostic>,
    options: &MergeOptions,
) -> SymbolTable {
    let mut diagnostics = DiagnosticBag::from(diagnostics);
    let resolver = Resolver::new(&merged, options.resolve_across_modules);
    let mut entries = merged.into_entries();

    let mut collapsed: FxHashSet<DeclarationSite> = FxHashSet::default();
    for (key, declaration) in entries.iter_mut() {
        resolve_declaration(key, declaration, &resolver, &mut diagnostics, &mut collapsed);
    }
    if !collapsed.is_empty() {
        diagnostics.retain(|d| {
            d.kind != DiagnosticKind::OverloadAmbiguity || !collapsed.contains(&d.site)
        });
    }

    let (declarations, modules) = freeze(entries);
    let declaration_index = declarations
        .iter()
        .enumerate()
        .map(|(index, d)| (d.key(), index))
        .collect();
    let module_index = modules
        .iter()
        .enumerate()
        .map(|(index, m)| (m.name.clone(), index))
        .collect();

    debug!(
        declarations = declarations.len(),
        modules = modules.len(),
        diagnostics = diagnostics.len(),
        "symbol table built"
    );
    SymbolTable {
        declarations,
        modules,
        diagnostics: diagnostics.into_vec(),
        declaration_index,
        module_index,
    }
}

/// Name lookup over the merged table, captured before it is mutated.
struct Resolver {
    keys: FxHashSet<DeclKey>,
    /// First module-scoped declaration of each name.
    module_fallback: FxHashMap<String, DeclKey>,
    across_modules: bool,
}

impl Resolver {
    fn new(merged: &MergedTable, across_modules: bool) -> Self {
        let mut module_fallback = FxHashMap::default();
        for key in merged.keys().filter(|key| !key.scope.is_global()) {
            module_fallback
                .entry(key.name.clone())
                .or_insert_with(|| key.clone());
        }
        Self {
            keys: merged.keys().cloned().collect(),
            module_fallback,
            across_modules,
        }
    }

    fn lookup(&self, from: &Scope, name: &str) -> Option<DeclKey> {
        let own = DeclKey::new(from.clone(), name);
        if self.keys.contains(&own) {
            return Some(own);
        }
        if !from.is_global() {
            let global = DeclKey::global(name);
            if self.keys.contains(&global) {
                return Some(global);
            }
        }
        if self.across_modules {
            return self.module_fallback.get(name).cloned();
        }
        None
    }
}

/// Resolve every reference in `declaration`. Overloads that only differed by
/// a reference that fell back to `any` collapse into the earlier overload;
/// their sites are added to `collapsed`.
fn resolve_declaration(
    key: &DeclKey,
    declaration: &mut Declaration,
    resolver: &Resolver,
    diagnostics: &mut DiagnosticBag,
    collapsed: &mut FxHashSet<DeclarationSite>,
) {
    let DeclarationKind::Interface { members } = &mut declaration.kind else {
        return;
    };

    for member in members {
        let mut changed = false;
        for overload in &mut member.overloads {
            let names: Vec<String> = overload
                .signature
                .unresolved_references()
                .into_iter()
                .map(str::to_string)
                .collect();
            if names.is_empty() {
                continue;
            }

            let mut resolved: FxHashMap<String, Type> = FxHashMap::default();
            for name in names {
                if resolved.contains_key(&name) {
                    continue;
                }
                let ty = match resolver.lookup(&key.scope, &name) {
                    Some(target) => {
                        trace!(from = %key, reference = %name, to = %target, "resolved reference");
                        Type::Declared(target)
                    }
                    None => {
                        let qualified = format!("{key}.{}", member.name);
                        diagnostics.add(Diagnostic::new(
                            DiagnosticKind::UnknownType,
                            overload.site.clone(),
                            &[&name, &qualified],
                        ));
                        Type::Any
                    }
                };
                resolved.insert(name, ty);
            }

            overload.signature.resolve_references(&mut |name: &str| {
                resolved.get(name).cloned().unwrap_or_default()
            });
            changed = true;
        }

        if changed && member.overloads.len() > 1 {
            collapse_identical_overloads(key, member, collapsed);
        }
    }
}

fn collapse_identical_overloads(
    key: &DeclKey,
    member: &mut Member,
    collapsed: &mut FxHashSet<DeclarationSite>,
) {
    let mut kept: SmallVec<[Overload; 1]> = SmallVec::with_capacity(member.overloads.len());
    for overload in member.overloads.drain(..) {
        if kept.iter().any(|k| k.signature.is_identical_to(&overload.signature)) {
            debug!(
                declaration = %key,
                member = %member.name,
                site = %overload.site,
                "overload collapsed after resolution"
            );
            collapsed.insert(overload.site);
        } else {
            kept.push(overload);
        }
    }
    member.overloads = kept;
}

/// Split resolved entries into the flat declaration list and the per-module
/// views.
fn freeze(entries: IndexMap<DeclKey, Declaration>) -> (Vec<Declaration>, Vec<ModuleDeclaration>) {
    let mut modules: IndexMap<String, ModuleDeclaration> = IndexMap::new();
    for (key, declaration) in &entries {
        let Scope::Module(module_name) = &key.scope else {
            continue;
        };
        let module = modules
            .entry(module_name.clone())
            .or_insert_with(|| ModuleDeclaration {
                name: module_name.clone(),
                declarations: Vec::new(),
            });
        if !(key.is_module_self() && declaration.is_module_stub()) {
            module.declarations.push(declaration.clone());
        }
    }

    (entries.into_values().collect(), modules.into_values().collect())
}
