use crate::models::{JobId, JobPosting, SkillRecord, WorkerId, WorkerProfile};
use crate::services::store::{MarketplaceStore, StoreError};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Store decorator that caches worker skills in process
///
/// Recommendation requests look up a worker's skills on every call, and
/// batch runs tend to revisit the same workers. Only successful lookups are
/// cached; every other call goes straight to the inner store.
pub struct CachedStore<S> {
    inner: S,
    skills: moka::future::Cache<WorkerId, Arc<Vec<SkillRecord>>>,
}

impl<S: MarketplaceStore> CachedStore<S> {
    pub fn new(inner: S, capacity: u64, ttl_secs: u64) -> Self {
        let skills = moka::future::CacheBuilder::new(capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { inner, skills }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Drop the cached skills of one worker
    pub async fn invalidate_worker(&self, id: WorkerId) {
        self.skills.invalidate(&id).await;
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.skills.entry_count(),
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: u64,
}

#[async_trait]
impl<S: MarketplaceStore> MarketplaceStore for CachedStore<S> {
    async fn find_job_by_id(&self, id: JobId) -> Result<Option<JobPosting>, StoreError> {
        self.inner.find_job_by_id(id).await
    }

    async fn find_nearby_workers(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    ) -> Result<Vec<WorkerProfile>, StoreError> {
        self.inner.find_nearby_workers(latitude, longitude, radius_km).await
    }

    async fn find_worker_by_id(&self, id: WorkerId) -> Result<Option<WorkerProfile>, StoreError> {
        self.inner.find_worker_by_id(id).await
    }

    async fn find_skills_by_worker(&self, id: WorkerId) -> Result<Vec<SkillRecord>, StoreError> {
        if let Some(skills) = self.skills.get(&id).await {
            tracing::trace!("Skills cache hit: worker {}", id);
            return Ok(skills.as_ref().clone());
        }

        let skills = self.inner.find_skills_by_worker(id).await?;
        self.skills.insert(id, Arc::new(skills.clone())).await;
        tracing::trace!("Skills cache miss: worker {}", id);

        Ok(skills)
    }

    async fn find_nearby_jobs(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    ) -> Result<Vec<JobPosting>, StoreError> {
        self.inner.find_nearby_jobs(latitude, longitude, radius_km).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SkillCategory;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts skill lookups and fails on demand
    struct CountingStore {
        skill_calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl MarketplaceStore for CountingStore {
        async fn find_job_by_id(&self, _id: JobId) -> Result<Option<JobPosting>, StoreError> {
            Ok(None)
        }

        async fn find_nearby_workers(&self, _: f64, _: f64, _: f64) -> Result<Vec<WorkerProfile>, StoreError> {
            Ok(vec![])
        }

        async fn find_worker_by_id(&self, _id: WorkerId) -> Result<Option<WorkerProfile>, StoreError> {
            Ok(None)
        }

        async fn find_skills_by_worker(&self, _id: WorkerId) -> Result<Vec<SkillRecord>, StoreError> {
            self.skill_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(StoreError::Unavailable("skills offline".to_string()));
            }
            Ok(vec![SkillRecord::new("Masonry", SkillCategory::Masonry, Some(6))])
        }

        async fn find_nearby_jobs(&self, _: f64, _: f64, _: f64) -> Result<Vec<JobPosting>, StoreError> {
            Ok(vec![])
        }
    }

    #[tokio::test]
    async fn test_skills_are_cached() {
        let cached = CachedStore::new(
            CountingStore { skill_calls: AtomicUsize::new(0), fail: false },
            100,
            60,
        );

        let first = cached.find_skills_by_worker(1).await.unwrap();
        let second = cached.find_skills_by_worker(1).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(cached.inner().skill_calls.load(Ordering::SeqCst), 1);

        cached.skills.run_pending_tasks().await;
        assert_eq!(cached.stats(), CacheStats { entries: 1 });

        cached.invalidate_worker(1).await;
        cached.skills.run_pending_tasks().await;
        assert_eq!(cached.stats(), CacheStats { entries: 0 });

        cached.find_skills_by_worker(1).await.unwrap();
        assert_eq!(cached.inner().skill_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let cached = CachedStore::new(
            CountingStore { skill_calls: AtomicUsize::new(0), fail: true },
            100,
            60,
        );

        assert!(cached.find_skills_by_worker(1).await.is_err());
        assert!(cached.find_skills_by_worker(1).await.is_err());
        assert_eq!(cached.inner().skill_calls.load(Ordering::SeqCst), 2);

        cached.skills.run_pending_tasks().await;
        assert_eq!(cached.stats().entries, 0);
    }
}
