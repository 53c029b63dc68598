use crate::core::{
    distance::haversine_distance,
    filters::{passes_threshold, JobRequirement},
    scoring::calculate_match_score,
};
use crate::models::{JobPosting, MatchResult, RankingPolicy, ScoringWeights, WorkerProfile};
use std::cmp::Ordering;

/// Ranked workers for one job
#[derive(Debug)]
pub struct WorkerRanking {
    pub matches: Vec<MatchResult>,
    pub total_candidates: usize,
}

/// Ranks candidate workers for a job
///
/// # Pipeline Stages
/// 1. Drop candidates without coordinates
/// 2. Weighted five-component scoring
/// 3. Exclusive minimum-score filter
/// 4. Stable descending sort and truncation
#[derive(Debug, Clone)]
pub struct WorkerMatcher {
    weights: ScoringWeights,
    policy: RankingPolicy,
}

impl WorkerMatcher {
    pub fn new(weights: ScoringWeights, policy: RankingPolicy) -> Self {
        Self { weights, policy }
    }

    pub fn with_default_weights() -> Self {
        Self::new(ScoringWeights::default(), RankingPolicy::workers())
    }

    pub fn policy(&self) -> &RankingPolicy {
        &self.policy
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Score a single worker against a job; `None` if the worker has no coordinates
    pub fn score_worker(
        &self,
        job: &JobPosting,
        requirement: &JobRequirement,
        worker: &WorkerProfile,
    ) -> Option<MatchResult> {
        let (lat, lon) = worker.location()?;
        let distance_km = haversine_distance(job.latitude, job.longitude, lat, lon);

        let (match_score, score_breakdown) =
            calculate_match_score(requirement, worker, Some(distance_km), &self.weights);

        Some(MatchResult {
            worker_id: worker.id,
            worker_name: worker.name.clone(),
            match_score,
            score_breakdown,
            distance_km,
        })
    }

    /// Rank a candidate snapshot for a job
    ///
    /// Candidates are not re-checked against the search radius; the caller
    /// decides which workers are in the pool.
    pub fn rank(&self, job: &JobPosting, candidates: Vec<WorkerProfile>) -> WorkerRanking {
        let total_candidates = candidates.len();
        let requirement = JobRequirement::from_job(job);

        let mut matches: Vec<MatchResult> = candidates
            .iter()
            .filter_map(|worker| self.score_worker(job, &requirement, worker))
            .filter(|result| passes_threshold(result.match_score, self.policy.min_score))
            .collect();

        // Vec::sort_by is stable, so equal scores keep candidate order
        matches.sort_by(|a, b| {
            b.match_score
                .partial_cmp(&a.match_score)
                .unwrap_or(Ordering::Equal)
        });
        matches.truncate(self.policy.limit);

        WorkerRanking {
            matches,
            total_candidates,
        }
    }
}

impl Default for WorkerMatcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}
