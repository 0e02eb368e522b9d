//! Stowage Storage Library
//!
//! Naming engine and backend dispatch for storage policies.
//!
//! # Naming rules
//!
//! A policy carries two rules: a directory rule and a file name rule. Both are
//! plain strings with `{token}` placeholders:
//!
//! - `{uid}`, `{timestamp}`, `{datetime}`, `{date}`, `{randomkey8}`, `{randomkey16}`
//! - `{path}` in directory rules only
//! - `{originname}` in file name rules only; some object storage providers get
//!   their own callback variable instead of the literal name
//!
//! Unknown placeholders are copied to the output unchanged.
//!
//! # Backends
//!
//! Everything that differs between backends lives in one table in the
//! [`backend`] module.

pub mod backend;
pub mod naming;
pub mod policy;

// Re-export commonly used types
pub use backend::{traits_for, BackendTraits, OriginName};
pub use naming::{expand, ResolutionContext, RuleKind, Token};
pub use policy::PolicyExt;
pub use stowage_core::{StorageBackend, StoragePolicy};
