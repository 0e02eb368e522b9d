//! In-memory policy store used by tests and the CLI.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use stowage_core::{AppError, PolicyOptions, StoragePolicy};

use super::PolicyRepository;
use crate::codec::{hydrate_after_load, prepare_for_save};

/// Stores policies the way a database row would hold them: only the encoded
/// `options` string is kept, and the option bag is decoded on every read.
#[derive(Default)]
pub struct InMemoryPolicyRepository {
    rows: RwLock<HashMap<i64, StoragePolicy>>,
}

impl InMemoryPolicyRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a policy, encoding its options first.
    pub fn insert(&self, mut policy: StoragePolicy) -> Result<(), AppError> {
        prepare_for_save(&mut policy)?;
        policy.options_serialized = PolicyOptions::default();

        self.write().insert(policy.id, policy);
        Ok(())
    }

    /// Insert a row as-is, without running the save hook.
    #[cfg(test)]
    pub(crate) fn insert_raw(&self, row: StoragePolicy) {
        self.write().insert(row.id, row);
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Rows are whole values, so a panic while the lock was held cannot leave
    // a half-written entry behind. A poisoned lock is recovered, not fatal.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<i64, StoragePolicy>> {
        self.rows.read().unwrap_or_else(|poisoned| {
            tracing::warn!("Policy store lock poisoned, recovering");
            PoisonError::into_inner(poisoned)
        })
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<i64, StoragePolicy>> {
        self.rows.write().unwrap_or_else(|poisoned| {
            tracing::warn!("Policy store lock poisoned, recovering");
            PoisonError::into_inner(poisoned)
        })
    }
}

#[async_trait]
impl PolicyRepository for InMemoryPolicyRepository {
    #[tracing::instrument(skip(self), fields(db.table = "policies", db.record_id = id))]
    async fn get_by_id(&self, id: i64) -> Result<StoragePolicy, AppError> {
        let row = self.read().get(&id).cloned();

        let mut policy = row.ok_or(AppError::NotFound(id))?;
        hydrate_after_load(&mut policy)?;
        Ok(policy)
    }
}
