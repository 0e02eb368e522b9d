//! LRU cache in front of another policy repository.

use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use lru::LruCache;
use stowage_core::{AppError, StoragePolicy};

use super::PolicyRepository;

/// Caches successful lookups of an inner repository. Failed lookups are not cached.
pub struct CachedPolicyRepository<R> {
    inner: R,
    cache: Mutex<LruCache<i64, StoragePolicy>>,
}

impl<R: PolicyRepository> CachedPolicyRepository<R> {
    pub fn new(inner: R, capacity: NonZeroUsize) -> Self {
        Self {
            inner,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Drop a cached policy, e.g. after it was updated.
    pub fn invalidate(&self, id: i64) {
        self.lock().pop(&id);
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    fn cached(&self, id: i64) -> Option<StoragePolicy> {
        self.lock().get(&id).cloned()
    }

    // Same recovery policy as the in-memory store: entries are whole values.
    fn lock(&self) -> MutexGuard<'_, LruCache<i64, StoragePolicy>> {
        self.cache.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("Policy cache lock poisoned, recovering");
            PoisonError::into_inner(poisoned)
        })
    }
}

#[async_trait]
impl<R: PolicyRepository> PolicyRepository for CachedPolicyRepository<R> {
    async fn get_by_id(&self, id: i64) -> Result<StoragePolicy, AppError> {
        if let Some(policy) = self.cached(id) {
            tracing::trace!(policy_id = id, "Policy cache hit");
            return Ok(policy);
        }

        let policy = self.inner.get_by_id(id).await?;
        self.lock().put(id, policy.clone());
        Ok(policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryPolicyRepository;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use stowage_core::PolicyOptions;

    struct CountingRepository {
        inner: InMemoryPolicyRepository,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PolicyRepository for CountingRepository {
        async fn get_by_id(&self, id: i64) -> Result<StoragePolicy, AppError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.get_by_id(id).await
        }
    }

    fn counting_repo() -> CountingRepository {
        let inner = InMemoryPolicyRepository::new();
        inner
            .insert(StoragePolicy {
                id: 22,
                name: "Default storage policy".to_string(),
                options_serialized: PolicyOptions {
                    op_name: "123".to_string(),
                    ..Default::default()
                },
                ..Default::default()
            })
            .unwrap();
        CountingRepository {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    fn capacity(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[tokio::test]
    async fn test_hit_does_not_reach_inner() {
        let repo = CachedPolicyRepository::new(counting_repo(), capacity(4));

        let first = repo.get_by_id(22).await.unwrap();
        let second = repo.get_by_id(22).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(second.options_serialized.op_name, "123");
        assert_eq!(repo.inner().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_not_found_is_not_cached() {
        let repo = CachedPolicyRepository::new(counting_repo(), capacity(4));

        assert!(matches!(
            repo.get_by_id(23).await,
            Err(AppError::NotFound(23))
        ));
        assert!(repo.get_by_id(23).await.is_err());
        assert_eq!(repo.inner().calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_invalidate_forces_reload() {
        let repo = CachedPolicyRepository::new(counting_repo(), capacity(4));

        repo.get_by_id(22).await.unwrap();
        repo.invalidate(22);
        repo.get_by_id(22).await.unwrap();

        assert_eq!(repo.inner().calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_capacity_evicts_least_recently_used() {
        let counting = counting_repo();
        counting
            .inner
            .insert(StoragePolicy {
                id: 23,
                ..Default::default()
            })
            .unwrap();
        let repo = CachedPolicyRepository::new(counting, capacity(1));

        repo.get_by_id(22).await.unwrap();
        repo.get_by_id(23).await.unwrap();
        repo.get_by_id(22).await.unwrap();

        assert_eq!(repo.inner().calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_poisoned_cache_keeps_serving() {
        let repo = CachedPolicyRepository::new(counting_repo(), capacity(4));
        repo.get_by_id(22).await.unwrap();

        let poisoner = std::thread::scope(|s| {
            s.spawn(|| {
                let _guard = repo.cache.lock().unwrap();
                panic!("reader panicked while holding the cache");
            })
            .join()
        });
        assert!(poisoner.is_err());
        assert!(repo.cache.is_poisoned());

        assert_eq!(repo.get_by_id(22).await.unwrap().id, 22);
        assert_eq!(repo.inner().calls.load(Ordering::SeqCst), 1);

        repo.invalidate(22);
        repo.get_by_id(22).await.unwrap();
        assert_eq!(repo.inner().calls.load(Ordering::SeqCst), 2);
    }
}
