//! Common types for the ambient declaration merging engine.
//!
//! This crate provides foundational types shared by the other crates:
//! - Declaration scopes and keys (`Scope`, `DeclKey`)
//! - Declaration site location hints (`DeclarationSite`)
//! - Diagnostics (`Diagnostic`, `DiagnosticBag`, `DiagnosticKind`)

// Scopes and declaration keys
pub mod scope;
pub use scope::{DeclKey, Scope};

// Location hints for declaration sites
pub mod site;
pub use site::DeclarationSite;

// Diagnostic collection and message templates
pub mod diagnostics;
pub use diagnostics::{
    Diagnostic, DiagnosticBag, DiagnosticCategory, DiagnosticKind, DiagnosticMessage,
    DiagnosticRelatedInformation, diagnostic_codes, format_message,
};
