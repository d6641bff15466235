//! Ambient declaration registry, merge engine, and symbol table.
//!
//! Pipeline:
//! 1. [`Fragment`]s of parser records are ingested into a
//!    [`DeclarationRegistry`], one raw [`Declaration`] per site.
//! 2. [`merge_all`] reduces each key's sites into one logical declaration.
//! 3. [`symbol_table::build`] resolves type references and freezes the result
//!    into a [`SymbolTable`].
//!
//! [`Session`] drives all three and registers the embedded libs first.

// Declaration model
pub mod declaration;
pub use declaration::{Declaration, DeclarationKind, Member, Overload};

// Parser records and ingestion
pub mod record;
pub use record::{
    DeclarationRecord, Fragment, FunctionTypeRef, IngestError, ParameterRecord, TypeRef,
};

pub mod registry;
pub use registry::DeclarationRegistry;

pub mod options;
pub use options::MergeOptions;

// Merge engine
pub mod merge;
pub use merge::{MergedTable, merge_all, merge_all_with_options};

// Frozen lookup structure
pub mod symbol_table;
pub use symbol_table::{ModuleDeclaration, SymbolTable};

pub mod embedded_libs;
pub use embedded_libs::{EmbeddedLib, get_all_libs, get_lib};

pub mod session;
pub use session::{Session, SharedSymbolTable};
