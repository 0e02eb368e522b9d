//! Policy repositories.
//!
//! Every repository returns policies with `options_serialized` decoded from
//! the stored `options` string. A missing policy is `AppError::NotFound`.

mod cached;
mod memory;
#[cfg(feature = "postgres")]
mod postgres;

pub use cached::CachedPolicyRepository;
pub use memory::InMemoryPolicyRepository;
#[cfg(feature = "postgres")]
pub use postgres::PgPolicyRepository;

use std::sync::Arc;

use async_trait::async_trait;
use stowage_core::{AppError, StoragePolicy};

/// Read access to stored storage policies.
#[async_trait]
pub trait PolicyRepository: Send + Sync {
    /// Fetch a policy by id.
    async fn get_by_id(&self, id: i64) -> Result<StoragePolicy, AppError>;
}

#[async_trait]
impl<T: PolicyRepository + ?Sized> PolicyRepository for Arc<T> {
    async fn get_by_id(&self, id: i64) -> Result<StoragePolicy, AppError> {
        (**self).get_by_id(id).await
    }
}
