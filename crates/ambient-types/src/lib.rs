//! Signature model for ambient declarations.
//!
//! Ambient declarations carry no implementation, only shapes. This crate is
//! the closed type universe those shapes are written in:
//!
//! - [`Type`]: `any`, `string`, `void`, nested function types, and named
//!   references (unresolved while merging, resolved by the symbol table)
//! - [`CallableSignature`] / [`Parameter`]: parameter lists with optional and
//!   variadic markers
//! - Signature validation ([`SignatureError`])
//! - Structural compatibility and overload selection for call sites

pub mod types;
pub use types::{CallableSignature, Parameter, Type};

pub mod validate;
pub use validate::SignatureError;

pub mod compatibility;
pub use compatibility::{is_assignable_to, resolve_overload};

mod format;
