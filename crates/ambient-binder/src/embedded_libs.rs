//! Embedded declaration libraries.
//!
//! Library overlays ship inside the binary as parser-record JSON via
//! `include_str!`, so a session can register the host runtime's globals
//! without touching the filesystem.
//!
//! # Usage
//!
//! ```rust
//! use ambient_binder::embedded_libs::get_lib;
//!
//! let stdlib = get_lib("stdlib").unwrap();
//! let fragment = stdlib.fragment().unwrap();
//! assert_eq!(fragment.file_name, "lib.stdlib.d.ts");
//! ```

use crate::record::{Fragment, IngestError};

/// An embedded declaration library.
#[derive(Debug, Clone, Copy)]
pub struct EmbeddedLib {
    /// The lib name (e.g., "stdlib")
    pub name: &'static str,
    /// The declaration file the records were produced from
    pub file_name: &'static str,
    /// JSON array of declaration records
    pub content: &'static str,
}

impl EmbeddedLib {
    /// Parse the embedded records.
    pub fn fragment(&self) -> Result<Fragment, IngestError> {
        Fragment::from_json(self.file_name, self.content)
    }
}

/// Host runtime globals: the `javascript` module, `JSON`, and `console`.
pub const LIB_STDLIB: EmbeddedLib = EmbeddedLib {
    name: "stdlib",
    file_name: "lib.stdlib.d.ts",
    content: include_str!("../lib/stdlib.json"),
};

static ALL_LIBS: [EmbeddedLib; 1] = [LIB_STDLIB];

/// Get an embedded lib by name.
pub fn get_lib(name: &str) -> Option<&'static EmbeddedLib> {
    ALL_LIBS.iter().find(|lib| lib.name == name)
}

/// Get an embedded lib by its declaration file name.
pub fn get_lib_by_file_name(file_name: &str) -> Option<&'static EmbeddedLib> {
    ALL_LIBS.iter().find(|lib| lib.file_name == file_name)
}

pub fn get_all_libs() -> &'static [EmbeddedLib] {
    &ALL_LIBS
}

/// Parse the named libs, failing on the first unknown name.
pub fn load_libs<S: AsRef<str>>(names: &[S]) -> Result<Vec<Fragment>, IngestError> {
    names
        .iter()
        .map(|name| {
            let name = name.as_ref();
            get_lib(name)
                .ok_or_else(|| IngestError::UnknownLib(name.to_string()))?
                .fragment()
        })
        .collect()
}
