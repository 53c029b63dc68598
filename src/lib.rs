//! Workwise Match - worker/job matching engine for the Workwise labor marketplace
//!
//! Given a job posting, ranks nearby workers by fitness; given a worker,
//! ranks nearby jobs with human-readable reasons. Data is read through the
//! [`services::MarketplaceStore`] trait and never written.

pub mod config;
pub mod core;
pub mod engine;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use crate::core::{haversine_distance, JobRecommender, WorkerMatcher};
pub use engine::{EngineError, MatchingEngine};
pub use models::{JobPosting, JobRecommendation, MatchResult, SkillRecord, WorkerProfile};
pub use services::{InMemoryStore, MarketplaceStore, StoreError};
