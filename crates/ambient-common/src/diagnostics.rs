//! Diagnostic types and message lookup for the merging engine.
//!
//! Every condition the engine detects is recoverable, so nothing here is an
//! `Err`: problems are collected into a [`DiagnosticBag`] in the order they
//! are found and handed to the caller alongside the symbol table.

use crate::site::DeclarationSite;
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Diagnostic Kinds and Messages
// =============================================================================

/// Diagnostic category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticCategory {
    Warning = 0,
    Error = 1,
    Suggestion = 2,
    Message = 3,
}

impl DiagnosticCategory {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Suggestion => "suggestion",
            Self::Message => "message",
        }
    }
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What went wrong.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DiagnosticKind {
    /// A required parameter follows an optional/variadic one, or the variadic
    /// parameter is repeated or not last. The declaration site is dropped.
    MalformedSignature,
    /// A type reference names nothing in the merged table. The reference
    /// falls back to `any`.
    UnknownType,
    /// A member was declared with differing signatures and became an overload
    /// list. Informational.
    OverloadAmbiguity,
}

impl DiagnosticKind {
    /// The message definition for this kind.
    pub const fn message(self) -> &'static DiagnosticMessage {
        match self {
            Self::MalformedSignature => &MALFORMED_SIGNATURE,
            Self::UnknownType => &UNKNOWN_TYPE,
            Self::OverloadAmbiguity => &OVERLOAD_AMBIGUITY,
        }
    }

    pub const fn code(self) -> u32 {
        self.message().code
    }

    pub const fn category(self) -> DiagnosticCategory {
        self.message().category
    }
}

/// A diagnostic message definition with code, category, and message template.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

pub mod diagnostic_codes {
    pub const MALFORMED_SIGNATURE: u32 = 9001;
    pub const UNKNOWN_TYPE: u32 = 9002;
    pub const OVERLOAD_AMBIGUITY: u32 = 9003;
}

const MALFORMED_SIGNATURE: DiagnosticMessage = DiagnosticMessage {
    code: diagnostic_codes::MALFORMED_SIGNATURE,
    category: DiagnosticCategory::Error,
    message: "Malformed signature for '{0}': {1}. Declaration of '{2}' at this site is ignored.",
};

const UNKNOWN_TYPE: DiagnosticMessage = DiagnosticMessage {
    code: diagnostic_codes::UNKNOWN_TYPE,
    category: DiagnosticCategory::Error,
    message: "Cannot find type '{0}' referenced by '{1}'. Treating it as 'any'.",
};

const OVERLOAD_AMBIGUITY: DiagnosticMessage = DiagnosticMessage {
    code: diagnostic_codes::OVERLOAD_AMBIGUITY,
    category: DiagnosticCategory::Message,
    message: "'{0}' is declared with differing signatures; '{1}' becomes overload {2}.",
};

/// All known message definitions, in code order.
pub const DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] =
    &[MALFORMED_SIGNATURE, UNKNOWN_TYPE, OVERLOAD_AMBIGUITY];

/// Look up a diagnostic message definition by code.
#[must_use]
pub fn get_diagnostic_message(code: u32) -> Option<&'static DiagnosticMessage> {
    DIAGNOSTIC_MESSAGES.iter().find(|m| m.code == code)
}

/// Format a diagnostic message by replacing {0}, {1}, etc. with arguments.
#[must_use]
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

// =============================================================================
// Diagnostic
// =============================================================================

/// Related information for a diagnostic (e.g. the site of an earlier overload).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticRelatedInformation {
    pub site: DeclarationSite,
    pub message_text: String,
}

/// A single engine diagnostic.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub code: u32,
    pub category: DiagnosticCategory,
    /// Location hint: the declaration site the diagnostic is attached to.
    pub site: DeclarationSite,
    pub message_text: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub related_information: Vec<DiagnosticRelatedInformation>,
}

impl Diagnostic {
    /// Create a diagnostic of `kind`, filling the kind's message template.
    #[must_use]
    pub fn new(kind: DiagnosticKind, site: DeclarationSite, args: &[&str]) -> Self {
        let message = kind.message();
        Self {
            kind,
            code: message.code,
            category: message.category,
            site,
            message_text: format_message(message.message, args),
            related_information: Vec::new(),
        }
    }

    /// Add related information to this diagnostic.
    #[must_use]
    pub fn with_related(mut self, site: DeclarationSite, message: impl Into<String>) -> Self {
        self.related_information.push(DiagnosticRelatedInformation {
            site,
            message_text: message.into(),
        });
        self
    }

    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} AMB{}: {}",
            self.site, self.category, self.code, self.message_text
        )
    }
}

// =============================================================================
// DiagnosticBag
// =============================================================================

/// An ordered collection of diagnostics for one build.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticBag {
    diagnostics: Vec<Diagnostic>,
    error_count: usize,
}

impl DiagnosticBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic.
    pub fn add(&mut self, diagnostic: Diagnostic) {
        if diagnostic.is_error() {
            self.error_count += 1;
        }
        self.diagnostics.push(diagnostic);
    }

    /// Append every diagnostic from `other`, keeping order.
    pub fn extend(&mut self, other: impl IntoIterator<Item = Diagnostic>) {
        for diagnostic in other {
            self.add(diagnostic);
        }
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Get all diagnostics as a slice.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    /// Diagnostics of one kind, in insertion order.
    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.kind == kind)
    }

    /// Keep only the diagnostics matching `keep`, in order.
    pub fn retain(&mut self, mut keep: impl FnMut(&Diagnostic) -> bool) {
        self.diagnostics.retain(|d| keep(d));
        self.error_count = self.diagnostics.iter().filter(|d| d.is_error()).count();
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl From<Vec<Diagnostic>> for DiagnosticBag {
    fn from(diagnostics: Vec<Diagnostic>) -> Self {
        let mut bag = Self::new();
        bag.extend(diagnostics);
        bag
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_message_fills_placeholders_in_order() {
        assert_eq!(format_message("{0} and {1}", &["a", "b"]), "a and b");
        assert_eq!(format_message("{1}{0}{1}", &["x", "y"]), "yxy");
    }

    #[test]
    fn every_kind_has_a_registered_message() {
        for kind in [
            DiagnosticKind::MalformedSignature,
            DiagnosticKind::UnknownType,
            DiagnosticKind::OverloadAmbiguity,
        ] {
            let message = get_diagnostic_message(kind.code()).unwrap();
            assert_eq!(message.category, kind.category());
        }
    }

    #[test]
    fn overload_ambiguity_is_not_an_error() {
        let diagnostic = Diagnostic::new(
            DiagnosticKind::OverloadAmbiguity,
            DeclarationSite::new("a.d.ts", 3),
            &["Foo.bar", "(x: string) => any", "2"],
        );
        assert!(!diagnostic.is_error());
        assert_eq!(diagnostic.code, 9003);

        let mut bag = DiagnosticBag::new();
        bag.add(diagnostic);
        assert!(!bag.has_errors());
        assert_eq!(bag.len(), 1);
    }

    #[test]
    fn bag_counts_errors_and_filters_by_kind() {
        let mut bag = DiagnosticBag::new();
        bag.add(Diagnostic::new(
            DiagnosticKind::UnknownType,
            DeclarationSite::new("a.d.ts", 0),
            &["Missing", "Foo.bar"],
        ));
        bag.add(Diagnostic::new(
            DiagnosticKind::OverloadAmbiguity,
            DeclarationSite::new("a.d.ts", 1),
            &["Foo.baz", "() => any", "2"],
        ));
        assert_eq!(bag.error_count(), 1);
        assert_eq!(bag.of_kind(DiagnosticKind::UnknownType).count(), 1);
        assert_eq!(
            bag.diagnostics()[0].message_text,
            "Cannot find type 'Missing' referenced by 'Foo.bar'. Treating it as 'any'."
        );
    }

    #[test]
    fn retain_recounts_errors() {
        let mut bag = DiagnosticBag::new();
        bag.add(Diagnostic::new(
            DiagnosticKind::UnknownType,
            DeclarationSite::new("a.d.ts", 0),
            &["Missing", "Foo.bar"],
        ));
        bag.add(Diagnostic::new(
            DiagnosticKind::OverloadAmbiguity,
            DeclarationSite::new("a.d.ts", 1),
            &["Foo.bar", "() => any", "2"],
        ));
        bag.retain(|d| d.kind != DiagnosticKind::UnknownType);
        assert_eq!(bag.len(), 1);
        assert!(!bag.has_errors());
        assert_eq!(bag.diagnostics()[0].site.ordinal, 1);
    }

    #[test]
    fn display_includes_site_and_code() {
        let diagnostic = Diagnostic::new(
            DiagnosticKind::UnknownType,
            DeclarationSite::new("lib.d.ts", 4),
            &["Node", "Document.body"],
        );
        assert!(diagnostic.to_string().starts_with("lib.d.ts#4: error AMB9002: "));
    }
}
