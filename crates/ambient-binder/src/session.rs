//! Build sessions and table publication.
//!
//! A [`Session`] is the only mutable stage: it collects fragments, then
//! `build` merges and resolves them into a frozen [`SymbolTable`]. Readers
//! hold `Arc<SymbolTable>` snapshots; [`SharedSymbolTable`] swaps in a newer
//! table without disturbing readers that still hold the old one.

use crate::embedded_libs::load_libs;
use crate::options::MergeOptions;
use crate::record::{Fragment, IngestError};
use crate::registry::DeclarationRegistry;
use crate::symbol_table::SymbolTable;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info};

/// Collects declaration fragments for one build.
#[derive(Debug)]
pub struct Session {
    options: MergeOptions,
    registry: DeclarationRegistry,
}

impl Session {
    /// Start a session, registering the embedded libs named in
    /// `options.libs` ahead of any user fragment.
    pub fn new(options: MergeOptions) -> Result<Self, IngestError> {
        let mut registry = DeclarationRegistry::new();
        for fragment in load_libs(&options.libs)? {
            debug!(file = %fragment.file_name, "registering embedded lib");
            registry.register_fragment(&fragment);
        }
        Ok(Self { options, registry })
    }

    /// A session with no embedded libs.
    pub fn without_libs() -> Self {
        Self {
            options: MergeOptions::without_libs(),
            registry: DeclarationRegistry::new(),
        }
    }

    pub fn options(&self) -> &MergeOptions {
        &self.options
    }

    pub fn registry(&self) -> &DeclarationRegistry {
        &self.registry
    }

    pub fn add_fragment(&mut self, fragment: &Fragment) -> &mut Self {
        self.registry.register_fragment(fragment);
        self
    }

    /// Parse and register a JSON record list. On error nothing is registered.
    pub fn add_records_json(
        &mut self,
        file_name: &str,
        json: &str,
    ) -> Result<&mut Self, IngestError> {
        let fragment = Fragment::from_json(file_name, json)?;
        Ok(self.add_fragment(&fragment))
    }

    /// Merge, resolve, and freeze everything registered so far.
    ///
    /// The session is left untouched, so building twice yields equal tables.
    pub fn build(&self) -> Arc<SymbolTable> {
        let table = SymbolTable::from_registry(&self.registry, &self.options);
        info!(
            declarations = table.len(),
            modules = table.modules().len(),
            diagnostics = table.diagnostics().len(),
            "built symbol table"
        );
        Arc::new(table)
    }
}

/// The currently published table.
///
/// `snapshot` hands out the table current at the time of the call; a later
/// `publish` only affects snapshots taken after it.
#[derive(Debug)]
pub struct SharedSymbolTable {
    current: RwLock<Arc<SymbolTable>>,
}

impl Default for SharedSymbolTable {
    fn default() -> Self {
        Self::new(Arc::new(SymbolTable::empty()))
    }
}

impl SharedSymbolTable {
    pub fn new(table: Arc<SymbolTable>) -> Self {
        Self {
            current: RwLock::new(table),
        }
    }

    pub fn snapshot(&self) -> Arc<SymbolTable> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Replace the current table. Returns the one it replaced.
    pub fn publish(&self, table: Arc<SymbolTable>) -> Arc<SymbolTable> {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        debug!(declarations = table.len(), "publishing symbol table");
        std::mem::replace(&mut *current, table)
    }
}
