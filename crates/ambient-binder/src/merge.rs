//! Merge engine.
//!
//! Reduces each registry key's full site list into one logical declaration:
//!
//! - Sites with a malformed signature are dropped whole (`MalformedSignature`).
//! - If every surviving site is a module stub, the result is one opaque stub.
//! - Otherwise members are unioned into a single interface. A member name seen
//!   at several sites keeps one copy per structurally distinct signature; a
//!   second distinct signature turns the member into an overload list ordered
//!   by registration (`OverloadAmbiguity`, informational).
//!
//! The union is insensitive to registration order except for overload
//! priority, and merging the same registry twice gives identical output.

use crate::declaration::{Declaration, DeclarationKind, Member};
use crate::options::MergeOptions;
use crate::registry::DeclarationRegistry;
use ambient_common::{DeclKey, Diagnostic, DiagnosticBag, DiagnosticKind};
use indexmap::IndexMap;
use smallvec::smallvec;
use tracing::{debug, trace};

/// Merged declarations, one per key, in first-registration order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MergedTable {
    entries: IndexMap<DeclKey, Declaration>,
}

impl MergedTable {
    pub fn get(&self, key: &DeclKey) -> Option<&Declaration> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &DeclKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &DeclKey> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DeclKey, &Declaration)> {
        self.entries.iter()
    }

    pub(crate) fn into_entries(self) -> IndexMap<DeclKey, Declaration> {
        self.entries
    }
}

/// Merge every key of `registry` with default options.
pub fn merge_all(registry: &DeclarationRegistry) -> (MergedTable, Vec<Diagnostic>) {
    merge_all_with_options(registry, &MergeOptions::default())
}

/// Merge every key of `registry`.
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(keys = registry.len(), sites = registry.site_count())
)]
pub fn merge_all_with_options(
    registry: &DeclarationRegistry,
    options: &MergeOptions,
) -> (MergedTable, Vec<Diagnostic>) {
    let mut diagnostics = DiagnosticBag::new();
    let mut entries = IndexMap::with_capacity(registry.len());

    for (key, sites) in registry.iter() {
        if let Some(merged) = merge_key(key, sites, options, &mut diagnostics) {
            entries.insert(key.clone(), merged);
        } else {
            debug!(key = %key, "every site dropped; key omitted from merged table");
        }
    }

    debug!(
        merged = entries.len(),
        diagnostics = diagnostics.len(),
        "merge complete"
    );
    (MergedTable { entries }, diagnostics.into_vec())
}

fn merge_key(
    key: &DeclKey,
    sites: &[Declaration],
    options: &MergeOptions,
    diagnostics: &mut DiagnosticBag,
) -> Option<Declaration> {
    let surviving: Vec<&Declaration> = sites
        .iter()
        .filter(|site| check_site(key, site, diagnostics))
        .collect();

    let first = surviving.first()?;
    let merged_sites = surviving.iter().map(|site| site.site().clone()).collect();

    if surviving.iter().all(|site| site.is_module_stub()) {
        trace!(key = %key, sites = surviving.len(), "merged opaque module stub");
        return Some(Declaration {
            name: first.name.clone(),
            scope: first.scope.clone(),
            kind: DeclarationKind::ModuleStub,
            sites: merged_sites,
        });
    }

    let mut members: IndexMap<&str, Member> = IndexMap::new();
    for site in &surviving {
        for member in site.members() {
            for overload in &member.overloads {
                let Some(existing) = members.get_mut(member.name.as_str()) else {
                    members.insert(
                        &member.name,
                        Member {
                            name: member.name.clone(),
                            overloads: smallvec![overload.clone()],
                        },
                    );
                    continue;
                };

                if existing
                    .signatures()
                    .any(|signature| signature.is_identical_to(&overload.signature))
                {
                    continue;
                }

                existing.overloads.push(overload.clone());
                trace!(
                    key = %key,
                    member = %member.name,
                    overloads = existing.overloads.len(),
                    "member became an overload list"
                );
                if options.report_overload_ambiguity {
                    let qualified = format!("{key}.{}", member.name);
                    let signature = overload.signature.to_string();
                    let position = existing.overloads.len().to_string();
                    let leading = &existing.overloads[0];
                    diagnostics.add(
                        Diagnostic::new(
                            DiagnosticKind::OverloadAmbiguity,
                            overload.site.clone(),
                            &[&qualified, &signature, &position],
                        )
                        .with_related(
                            leading.site.clone(),
                            format!(
                                "Highest-priority overload '{}' is declared here.",
                                leading.signature
                            ),
                        ),
                    );
                }
            }
        }
    }

    trace!(key = %key, sites = surviving.len(), members = members.len(), "merged interface");
    Some(Declaration {
        name: first.name.clone(),
        scope: first.scope.clone(),
        kind: DeclarationKind::Interface {
            members: members.into_values().collect(),
        },
        sites: merged_sites,
    })
}

/// Validate every signature of a site. Reports each malformed member and
/// returns whether the site may take part in the merge.
fn check_site(key: &DeclKey, site: &Declaration, diagnostics: &mut DiagnosticBag) -> bool {
    let mut well_formed = true;
    for member in site.members() {
        for overload in &member.overloads {
            if let Err(err) = overload.signature.validate() {
                well_formed = false;
                let qualified = format!("{key}.{}", member.name);
                diagnostics.add(Diagnostic::new(
                    DiagnosticKind::MalformedSignature,
                    overload.site.clone(),
                    &[&qualified, &err.to_string(), &key.to_string()],
                ));
            }
        }
    }
    if !well_formed {
        debug!(key = %key, site = %site.site(), "dropping malformed declaration site");
    }
    well_formed
}
