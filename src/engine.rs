use crate::core::{JobRecommender, WorkerMatcher};
use crate::models::{JobId, JobRecommendation, MatchResult, WorkerId};
use crate::services::{MarketplaceStore, StoreError};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors surfaced by the matching engine
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Upstream data access failed: {0}")]
    Upstream(#[from] StoreError),
}

/// Entry point for both ranking directions
///
/// Each call reads its own snapshot from the store and computes a complete
/// ranking; nothing is shared between calls besides the read-only scoring
/// configuration. Unknown ids produce an empty ranking. A store failure
/// aborts the call and no partial ranking is returned.
pub struct MatchingEngine<S> {
    store: S,
    matcher: WorkerMatcher,
    recommender: JobRecommender,
}

impl<S: MarketplaceStore> MatchingEngine<S> {
    pub fn new(store: S, matcher: WorkerMatcher, recommender: JobRecommender) -> Self {
        Self {
            store,
            matcher,
            recommender,
        }
    }

    /// Engine with the default weights, radii, thresholds and limits
    pub fn with_defaults(store: S) -> Self {
        Self::new(store, WorkerMatcher::default(), JobRecommender::default())
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Best workers for a job, highest score first
    pub async fn find_best_workers(&self, job_id: JobId) -> Result<Vec<MatchResult>, EngineError> {
        let Some(job) = self.store.find_job_by_id(job_id).await? else {
            info!("Job {} not found, no workers to match", job_id);
            return Ok(Vec::new());
        };

        if !job.has_valid_location() {
            warn!("Job {} has invalid coordinates, skipping matching", job_id);
            return Ok(Vec::new());
        }

        let radius_km = self.matcher.policy().radius_km;
        let candidates = self
            .store
            .find_nearby_workers(job.latitude, job.longitude, radius_km)
            .await?;

        debug!("Found {} candidate workers within {}km of job {}", candidates.len(), radius_km, job_id);

        let ranking = self.matcher.rank(&job, candidates);

        info!(
            "Returning {} workers for job {} (from {} candidates)",
            ranking.matches.len(),
            job_id,
            ranking.total_candidates
        );

        Ok(ranking.matches)
    }

    /// Recommended jobs for a worker, highest score first
    pub async fn recommend_jobs(&self, worker_id: WorkerId) -> Result<Vec<JobRecommendation>, EngineError> {
        let Some(worker) = self.store.find_worker_by_id(worker_id).await? else {
            info!("Worker {} not found, no recommendations", worker_id);
            return Ok(Vec::new());
        };

        let Some((latitude, longitude)) = worker.location() else {
            info!("Worker {} has no location, no recommendations", worker_id);
            return Ok(Vec::new());
        };

        let skills = self.store.find_skills_by_worker(worker_id).await?;
        if skills.is_empty() {
            info!("Worker {} has no skills, no recommendations", worker_id);
            return Ok(Vec::new());
        }

        let radius_km = self.recommender.policy().radius_km;
        let candidates = self
            .store
            .find_nearby_jobs(latitude, longitude, radius_km)
            .await?;

        debug!("Found {} candidate jobs within {}km of worker {}", candidates.len(), radius_km, worker_id);

        let ranking = self.recommender.rank(&worker, &skills, candidates);

        info!(
            "Returning {} recommendations for worker {} (from {} candidates)",
            ranking.recommendations.len(),
            worker_id,
            ranking.total_candidates
        );

        Ok(ranking.recommendations)
    }
}
