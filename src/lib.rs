//! Ambient declaration resolution and merging.
//!
//! Collects type-only declarations (`declare module "x" {}`, global
//! interfaces) from any number of declaration fragments, merges every site
//! declaring the same name into one logical declaration, and freezes the
//! result into an immutable [`SymbolTable`] a type checker can query from
//! many threads.
//!
//! The engine lives in the workspace crates; this crate re-exports them and
//! adds the file-level conveniences and the `ambient` binary.
//!
//! ```rust
//! use ambient::{MergeOptions, Session};
//!
//! let table = Session::new(MergeOptions::default()).unwrap().build();
//! let log = table.lookup_global("console").unwrap().member("log").unwrap();
//! assert!(log.signature().parameters[0].variadic);
//! ```

pub use ambient_binder::{
    Declaration, DeclarationKind, DeclarationRecord, DeclarationRegistry, EmbeddedLib, Fragment,
    IngestError, Member, MergeOptions, MergedTable, ModuleDeclaration, Overload, Session,
    SharedSymbolTable, SymbolTable, embedded_libs, merge_all, merge_all_with_options, symbol_table,
};
pub use ambient_common::{
    DeclKey, DeclarationSite, Diagnostic, DiagnosticBag, DiagnosticCategory, DiagnosticKind, Scope,
};
pub use ambient_types::{CallableSignature, Parameter, Type};

pub mod cli;
pub mod tracing_config;

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;

/// Read a JSON record file into a fragment named after the file.
pub fn load_fragment(path: &Path) -> Result<Fragment> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let fragment = Fragment::from_json(path.display().to_string(), &json)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(fragment)
}

/// Read `MergeOptions` from a JSON file.
pub fn load_options(path: &Path) -> Result<MergeOptions> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    MergeOptions::from_json(&json).with_context(|| format!("invalid options in {}", path.display()))
}

/// Build a symbol table from the embedded libs in `options` plus the record
/// files at `paths`, registered in the order given.
pub fn build_symbol_table<P: AsRef<Path>>(
    options: MergeOptions,
    paths: &[P],
) -> Result<Arc<SymbolTable>> {
    let mut session = Session::new(options).context("failed to start session")?;
    for path in paths {
        session.add_fragment(&load_fragment(path.as_ref())?);
    }
    Ok(session.build())
}
