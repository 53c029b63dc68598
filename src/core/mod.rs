// Core algorithm exports
pub mod distance;
pub mod filters;
pub mod matcher;
pub mod recommender;
pub mod scoring;

pub use distance::{calculate_bounding_box, haversine_distance, is_within_bounding_box, BoundingBox};
pub use filters::{partial_word_match, JobRequirement, SkillRelevance};
pub use matcher::{WorkerMatcher, WorkerRanking};
pub use recommender::{JobRanking, JobRecommender};
pub use scoring::{calculate_match_score, experience_score, linear_distance_score, location_score, skill_match_score};
