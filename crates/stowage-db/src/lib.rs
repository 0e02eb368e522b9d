//! Stowage DB Library
//!
//! Loading and saving storage policies: the options codec that keeps the
//! persisted `options` column in sync with the structured option bag, and the
//! repositories policies are looked up from.

pub mod codec;
pub mod repository;

pub use codec::{decode_options, encode_options, hydrate_after_load, prepare_for_save};
#[cfg(feature = "postgres")]
pub use repository::PgPolicyRepository;
pub use repository::{CachedPolicyRepository, InMemoryPolicyRepository, PolicyRepository};
