use serde::{Deserialize, Serialize};
use crate::models::domain::{JobId, JobRecommendation, MatchResult, WorkerId};

/// Ranked workers for one job
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerMatchesResponse {
    pub job_id: JobId,
    pub matches: Vec<MatchResult>,
    pub total_matches: usize,
}

impl WorkerMatchesResponse {
    pub fn new(job_id: JobId, matches: Vec<MatchResult>) -> Self {
        Self {
            job_id,
            total_matches: matches.len(),
            matches,
        }
    }
}

/// Ranked jobs for one worker
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecommendationsResponse {
    pub worker_id: WorkerId,
    pub recommendations: Vec<JobRecommendation>,
    pub total_recommendations: usize,
    pub message: String,
}

impl JobRecommendationsResponse {
    pub fn new(worker_id: WorkerId, recommendations: Vec<JobRecommendation>) -> Self {
        let message = if recommendations.is_empty() {
            "No recommendations found. Try updating your skills and location.".to_string()
        } else {
            format!("Found {} job recommendations for you!", recommendations.len())
        };

        Self {
            worker_id,
            total_recommendations: recommendations.len(),
            recommendations,
            message,
        }
    }
}

/// Output of one batch run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResponse<T> {
    pub results: Vec<T>,
    pub generated_at: chrono::DateTime<chrono::Utc>,
}

impl<T> BatchResponse<T> {
    pub fn new(results: Vec<T>) -> Self {
        Self {
            results,
            generated_at: chrono::Utc::now(),
        }
    }
}
