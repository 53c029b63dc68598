use crate::models::{JobId, JobPosting, SkillRecord, WorkerId, WorkerProfile};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised by a marketplace data source
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Invalid row: {0}")]
    InvalidRow(String),

    #[error("Data source unavailable: {0}")]
    Unavailable(String),
}

/// Read-only access to the marketplace data the matching engine needs
///
/// Absence is never an error: lookups return `Ok(None)` or an empty vector.
/// Implementations do not retry.
#[async_trait]
pub trait MarketplaceStore: Send + Sync {
    async fn find_job_by_id(&self, id: JobId) -> Result<Option<JobPosting>, StoreError>;

    /// Available workers with coordinates within `radius_km`, nearest first,
    /// with their skills loaded
    async fn find_nearby_workers(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    ) -> Result<Vec<WorkerProfile>, StoreError>;

    /// Worker profile without skills; load those with `find_skills_by_worker`
    async fn find_worker_by_id(&self, id: WorkerId) -> Result<Option<WorkerProfile>, StoreError>;

    async fn find_skills_by_worker(&self, id: WorkerId) -> Result<Vec<SkillRecord>, StoreError>;

    /// Jobs within `radius_km`, nearest first
    async fn find_nearby_jobs(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    ) -> Result<Vec<JobPosting>, StoreError>;
}

#[async_trait]
impl<T: MarketplaceStore + ?Sized> MarketplaceStore for Arc<T> {
    async fn find_job_by_id(&self, id: JobId) -> Result<Option<JobPosting>, StoreError> {
        (**self).find_job_by_id(id).await
    }

    async fn find_nearby_workers(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    ) -> Result<Vec<WorkerProfile>, StoreError> {
        (**self).find_nearby_workers(latitude, longitude, radius_km).await
    }

    async fn find_worker_by_id(&self, id: WorkerId) -> Result<Option<WorkerProfile>, StoreError> {
        (**self).find_worker_by_id(id).await
    }

    async fn find_skills_by_worker(&self, id: WorkerId) -> Result<Vec<SkillRecord>, StoreError> {
        (**self).find_skills_by_worker(id).await
    }

    async fn find_nearby_jobs(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    ) -> Result<Vec<JobPosting>, StoreError> {
        (**self).find_nearby_jobs(latitude, longitude, radius_km).await
    }
}
