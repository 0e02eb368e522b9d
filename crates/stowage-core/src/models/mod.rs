//! Data models for storage policies.

mod policy;

pub use policy::*;
