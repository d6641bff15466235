//! Declaration registry.
//!
//! Collects raw declarations from any number of fragments. Nothing is merged
//! or validated here: every site is kept, in registration order, so the merge
//! engine can reduce each key's complete site list in one go.

use crate::declaration::Declaration;
use crate::record::Fragment;
use ambient_common::DeclKey;
use indexmap::IndexMap;
use tracing::trace;

/// Raw declarations keyed by `(scope, name)`.
///
/// Key iteration order is first-registration order, which keeps merge output
/// and diagnostics deterministic.
#[derive(Clone, Debug, Default)]
pub struct DeclarationRegistry {
    entries: IndexMap<DeclKey, Vec<Declaration>>,
    site_count: usize,
}

impl DeclarationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a declaration site under its key. Never overwrites.
    pub fn register(&mut self, declaration: Declaration) {
        let key = declaration.key();
        trace!(key = %key, site = %declaration.site(), "register declaration");
        self.entries.entry(key).or_default().push(declaration);
        self.site_count += 1;
    }

    /// Register every declaration site of a fragment.
    pub fn register_fragment(&mut self, fragment: &Fragment) {
        for declaration in fragment.declarations() {
            self.register(declaration);
        }
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of registered sites across all keys.
    pub fn site_count(&self) -> usize {
        self.site_count
    }

    /// Keys in first-registration order.
    pub fn keys(&self) -> impl Iterator<Item = &DeclKey> {
        self.entries.keys()
    }

    /// Every site registered under `key`, in registration order.
    pub fn sites(&self, key: &DeclKey) -> &[Declaration] {
        self.entries.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DeclKey, &[Declaration])> {
        self.entries
            .iter()
            .map(|(key, sites)| (key, sites.as_slice()))
    }
}

impl Extend<Declaration> for DeclarationRegistry {
    fn extend<I: IntoIterator<Item = Declaration>>(&mut self, iter: I) {
        for declaration in iter {
            self.register(declaration);
        }
    }
}

impl FromIterator<Declaration> for DeclarationRegistry {
    fn from_iter<I: IntoIterator<Item = Declaration>>(iter: I) -> Self {
        let mut registry = Self::new();
        registry.extend(iter);
        registry
    }
}
