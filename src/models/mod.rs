// Model exports
pub mod domain;
pub mod responses;

pub use domain::{
    JobId, JobPosting, JobRecommendation, JobStatus, MatchResult, RankingPolicy,
    RecommendationWeights, ScoreBreakdown, ScoringWeights, SkillCategory, SkillRecord,
    UnknownVariant, WorkerId, WorkerProfile,
};
pub use responses::{BatchResponse, JobRecommendationsResponse, WorkerMatchesResponse};
