//! Location hints for declaration sites.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a declaration came from.
///
/// The engine never sees source text, so the hint is the fragment (file) name
/// plus the ordinal of the record that opened the site within that fragment.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DeclarationSite {
    /// Fragment file name (e.g. "lib.stdlib.d.ts"). Empty when unknown.
    pub file: String,
    /// Zero-based index of the record within its fragment: the opening record
    /// for a declaration, the member's own record for an overload.
    pub ordinal: u32,
}

impl DeclarationSite {
    pub fn new(file: impl Into<String>, ordinal: u32) -> Self {
        Self {
            file: file.into(),
            ordinal,
        }
    }
}

impl fmt::Display for DeclarationSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.file.is_empty() {
            write!(f, "<input>#{}", self.ordinal)
        } else {
            write!(f, "{}#{}", self.file, self.ordinal)
        }
    }
}
