use crate::core::distance::haversine_distance;
use crate::models::{JobId, JobPosting, SkillRecord, WorkerId, WorkerProfile};
use crate::services::store::{MarketplaceStore, StoreError};
use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Snapshot-backed store
///
/// Holds immutable copies of workers and jobs and answers lookups with the
/// same filtering and ordering contract as the PostgreSQL store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    workers: HashMap<WorkerId, WorkerProfile>,
    jobs: HashMap<JobId, JobPosting>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_worker(mut self, worker: WorkerProfile) -> Self {
        self.workers.insert(worker.id, worker);
        self
    }

    pub fn with_job(mut self, job: JobPosting) -> Self {
        self.jobs.insert(job.id, job);
        self
    }

    pub fn from_snapshot(workers: Vec<WorkerProfile>, jobs: Vec<JobPosting>) -> Self {
        Self {
            workers: workers.into_iter().map(|w| (w.id, w)).collect(),
            jobs: jobs.into_iter().map(|j| (j.id, j)).collect(),
        }
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }
}

/// Sort by distance, then id, so results are deterministic
fn nearest_first<T>(items: &mut [(f64, i64, T)]) {
    items.sort_by(|a, b| {
        a.0.partial_cmp(&b.0)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.1.cmp(&b.1))
    });
}

#[async_trait]
impl MarketplaceStore for InMemoryStore {
    async fn find_job_by_id(&self, id: JobId) -> Result<Option<JobPosting>, StoreError> {
        Ok(self.jobs.get(&id).cloned())
    }

    async fn find_nearby_workers(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    ) -> Result<Vec<WorkerProfile>, StoreError> {
        let mut nearby: Vec<(f64, i64, WorkerProfile)> = self
            .workers
            .values()
            .filter(|worker| worker.availability)
            .filter_map(|worker| {
                let (lat, lon) = worker.location()?;
                let distance = haversine_distance(latitude, longitude, lat, lon);
                (distance <= radius_km).then(|| (distance, worker.id, worker.clone()))
            })
            .collect();

        nearest_first(&mut nearby);
        Ok(nearby.into_iter().map(|(_, _, worker)| worker).collect())
    }

    async fn find_worker_by_id(&self, id: WorkerId) -> Result<Option<WorkerProfile>, StoreError> {
        Ok(self.workers.get(&id).map(|worker| WorkerProfile {
            skills: Vec::new(),
            ..worker.clone()
        }))
    }

    async fn find_skills_by_worker(&self, id: WorkerId) -> Result<Vec<SkillRecord>, StoreError> {
        Ok(self
            .workers
            .get(&id)
            .map(|worker| worker.skills.clone())
            .unwrap_or_default())
    }

    async fn find_nearby_jobs(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    ) -> Result<Vec<JobPosting>, StoreError> {
        let mut nearby: Vec<(f64, i64, JobPosting)> = self
            .jobs
            .values()
            .filter(|job| job.has_valid_location())
            .filter_map(|job| {
                let distance = haversine_distance(latitude, longitude, job.latitude, job.longitude);
                (distance <= radius_km).then(|| (distance, job.id, job.clone()))
            })
            .collect();

        nearest_first(&mut nearby);
        Ok(nearby.into_iter().map(|(_, _, job)| job).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{JobStatus, SkillCategory};

    fn worker(id: i64, lat: Option<f64>, available: bool) -> WorkerProfile {
        WorkerProfile {
            id,
            name: format!("Worker {}", id),
            latitude: lat,
            longitude: lat.map(|_| 77.60),
            trust_score: 3.0,
            availability: available,
            skills: vec![SkillRecord::new("Painting", SkillCategory::Painting, Some(2))],
        }
    }

    fn job(id: i64, lat: f64) -> JobPosting {
        JobPosting {
            id,
            title: format!("Job {}", id),
            skill_required: "Painting".to_string(),
            skill_category: Some(SkillCategory::Painting),
            latitude: lat,
            longitude: 77.60,
            offered_price: None,
            is_urgent: false,
            status: JobStatus::Posted,
        }
    }

    #[tokio::test]
    async fn test_nearby_workers_filters_and_orders() {
        let store = InMemoryStore::new()
            .with_worker(worker(1, Some(13.00), true)) // ~11km
            .with_worker(worker(2, Some(12.91), true)) // ~1km
            .with_worker(worker(3, Some(12.91), false)) // unavailable
            .with_worker(worker(4, None, true)) // no location
            .with_worker(worker(5, Some(13.40), true)); // ~55km

        let nearby = store.find_nearby_workers(12.90, 77.60, 25.0).await.unwrap();
        let ids: Vec<i64> = nearby.iter().map(|w| w.id).collect();

        assert_eq!(ids, vec![2, 1]);
        assert_eq!(nearby[0].skills.len(), 1);
    }

    #[tokio::test]
    async fn test_nearby_jobs_within_radius() {
        let store = InMemoryStore::from_snapshot(vec![], vec![job(1, 13.10), job(2, 12.90), job(3, 14.00)]);

        let nearby = store.find_nearby_jobs(12.90, 77.60, 30.0).await.unwrap();
        let ids: Vec<i64> = nearby.iter().map(|j| j.id).collect();

        assert_eq!(ids, vec![2, 1]);
    }

    #[tokio::test]
    async fn test_lookups() {
        let store = InMemoryStore::new().with_worker(worker(1, Some(12.9), true)).with_job(job(9, 12.9));

        assert!(store.find_job_by_id(9).await.unwrap().is_some());
        assert!(store.find_job_by_id(10).await.unwrap().is_none());
        assert!(store.find_worker_by_id(2).await.unwrap().is_none());
        assert!(store.find_worker_by_id(1).await.unwrap().unwrap().skills.is_empty());
        assert_eq!(store.find_skills_by_worker(1).await.unwrap().len(), 1);
        assert!(store.find_skills_by_worker(2).await.unwrap().is_empty());
    }
}
