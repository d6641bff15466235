//! Merge configuration.

use crate::record::IngestError;
use serde::{Deserialize, Serialize};

/// Configuration options for merging and building.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MergeOptions {
    /// Emit an informational diagnostic whenever a member becomes an
    /// overload list.
    pub report_overload_ambiguity: bool,
    /// Let a type reference fall back to declarations in other module scopes
    /// when neither its own scope nor the global scope declares the name.
    pub resolve_across_modules: bool,
    /// Embedded libraries a session registers before user fragments.
    pub libs: Vec<String>,
}

impl Default for MergeOptions {
    fn default() -> Self {
        MergeOptions {
            report_overload_ambiguity: true,
            resolve_across_modules: true,
            libs: vec!["stdlib".to_string()],
        }
    }
}

impl MergeOptions {
    /// Options with no embedded libraries.
    pub fn without_libs() -> Self {
        Self {
            libs: Vec::new(),
            ..Self::default()
        }
    }

    /// Parse a JSON options object. Missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, IngestError> {
        Ok(serde_json::from_str(json)?)
    }
}
