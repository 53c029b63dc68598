use crate::core::{
    distance::haversine_distance,
    filters::{passes_threshold, JobRequirement},
    scoring::{linear_distance_score, price_score, NAME_MATCH_SCORE},
};
use crate::models::{
    JobPosting, JobRecommendation, JobStatus, RankingPolicy, RecommendationWeights, SkillRecord,
    WorkerProfile,
};
use std::cmp::Ordering;
use std::collections::BTreeMap;

pub const REASON_SKILL_MATCH: &str = "skillMatch";
pub const REASON_PROXIMITY: &str = "proximity";
pub const REASON_GOOD_PAY: &str = "goodPay";
pub const REASON_URGENT: &str = "urgent";

/// Ranked jobs for one worker
#[derive(Debug)]
pub struct JobRanking {
    pub recommendations: Vec<JobRecommendation>,
    pub total_candidates: usize,
}

/// Ranks nearby jobs for a worker and explains each pick
///
/// Unlike [`crate::core::WorkerMatcher`], skill compatibility is decided by
/// the first of the worker's skills (in the given order) that the job names
/// or shares a category with, not the best one.
#[derive(Debug, Clone)]
pub struct JobRecommender {
    weights: RecommendationWeights,
    policy: RankingPolicy,
}

impl JobRecommender {
    pub fn new(weights: RecommendationWeights, policy: RankingPolicy) -> Self {
        Self { weights, policy }
    }

    pub fn with_default_weights() -> Self {
        Self::new(RecommendationWeights::default(), RankingPolicy::jobs())
    }

    pub fn policy(&self) -> &RankingPolicy {
        &self.policy
    }

    /// Score one job for a located worker. The score is not clamped.
    pub fn score_job(
        &self,
        (worker_lat, worker_lon): (f64, f64),
        skills: &[SkillRecord],
        job: &JobPosting,
    ) -> JobRecommendation {
        let weights = &self.weights;
        let mut reasons = BTreeMap::new();
        let mut total = 0.0;

        let requirement = JobRequirement::from_job(job);
        if let Some(skill) = skills.iter().find(|skill| requirement.is_directly_relevant(skill)) {
            total += NAME_MATCH_SCORE * weights.skill;
            reasons.insert(
                REASON_SKILL_MATCH.to_string(),
                format!("Your {} skill matches this job", skill.skill_name),
            );
        }

        let distance_km = haversine_distance(job.latitude, job.longitude, worker_lat, worker_lon);
        total += linear_distance_score(distance_km, weights.distance_decay_km) * weights.distance;
        if distance_km < weights.proximity_reason_km {
            reasons.insert(
                REASON_PROXIMITY.to_string(),
                format!(
                    "Job is within {}km of your location",
                    weights.proximity_reason_km
                ),
            );
        }

        if let Some(price) = job.offered_price {
            total += price_score(price, weights) * weights.price;
            if price > weights.good_pay_threshold {
                reasons.insert(
                    REASON_GOOD_PAY.to_string(),
                    "Competitive payment offered".to_string(),
                );
            }
        }

        if job.is_urgent {
            total += weights.urgency_bonus;
            reasons.insert(
                REASON_URGENT.to_string(),
                "Urgent job - quick earning opportunity".to_string(),
            );
        }

        JobRecommendation {
            job_id: job.id,
            job_title: job.title.clone(),
            match_score: total,
            reasons,
            distance_km,
        }
    }

    /// Rank a candidate job snapshot for a worker
    ///
    /// Returns nothing for a worker without coordinates or without skills.
    /// Only jobs still in `POSTED` status are considered.
    pub fn rank(
        &self,
        worker: &WorkerProfile,
        skills: &[SkillRecord],
        candidates: Vec<JobPosting>,
    ) -> JobRanking {
        let total_candidates = candidates.len();

        let Some(location) = worker.location() else {
            return JobRanking {
                recommendations: Vec::new(),
                total_candidates,
            };
        };
        if skills.is_empty() {
            return JobRanking {
                recommendations: Vec::new(),
                total_candidates,
            };
        }

        let mut recommendations: Vec<JobRecommendation> = candidates
            .iter()
            .filter(|job| job.status == JobStatus::Posted && job.has_valid_location())
            .map(|job| self.score_job(location, skills, job))
            .filter(|rec| passes_threshold(rec.match_score, self.policy.min_score))
            .collect();

        recommendations.sort_by(|a, b| {
            b.match_score
                .partial_cmp(&a.match_score)
                .unwrap_or(Ordering::Equal)
        });
        recommendations.truncate(self.policy.limit);

        JobRanking {
            recommendations,
            total_candidates,
        }
    }
}

impl Default for JobRecommender {
    fn default() -> Self {
        Self::with_default_weights()
    }
}
