use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::models::{RankingPolicy, RecommendationWeights, ScoringWeights};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database: DatabaseSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_skills_ttl_secs")]
    pub skills_ttl_secs: u64,
    #[serde(default = "default_skills_capacity")]
    pub skills_capacity: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            skills_ttl_secs: default_skills_ttl_secs(),
            skills_capacity: default_skills_capacity(),
        }
    }
}

fn default_skills_ttl_secs() -> u64 { 300 }
fn default_skills_capacity() -> u64 { 10_000 }

/// Candidate radius, score threshold and result size per ranking side
#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_worker_radius_km")]
    pub worker_radius_km: f64,
    #[serde(default = "default_worker_min_score")]
    pub worker_min_score: f64,
    #[serde(default = "default_worker_limit")]
    pub worker_limit: usize,
    #[serde(default = "default_job_radius_km")]
    pub job_radius_km: f64,
    #[serde(default = "default_job_min_score")]
    pub job_min_score: f64,
    #[serde(default = "default_job_limit")]
    pub job_limit: usize,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            worker_radius_km: default_worker_radius_km(),
            worker_min_score: default_worker_min_score(),
            worker_limit: default_worker_limit(),
            job_radius_km: default_job_radius_km(),
            job_min_score: default_job_min_score(),
            job_limit: default_job_limit(),
        }
    }
}

fn default_worker_radius_km() -> f64 { 25.0 }
fn default_worker_min_score() -> f64 { 0.30 }
fn default_worker_limit() -> usize { 20 }
fn default_job_radius_km() -> f64 { 30.0 }
fn default_job_min_score() -> f64 { 0.40 }
fn default_job_limit() -> usize { 15 }

impl MatchingSettings {
    pub fn worker_policy(&self) -> RankingPolicy {
        RankingPolicy {
            radius_km: self.worker_radius_km,
            min_score: self.worker_min_score,
            limit: self.worker_limit,
        }
    }

    pub fn job_policy(&self) -> RankingPolicy {
        RankingPolicy {
            radius_km: self.job_radius_km,
            min_score: self.job_min_score,
            limit: self.job_limit,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
    #[serde(default)]
    pub recommendation: RecommendationConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_skill_weight")]
    pub skill: f64,
    #[serde(default = "default_location_weight")]
    pub location: f64,
    #[serde(default = "default_experience_weight")]
    pub experience: f64,
    #[serde(default = "default_trust_weight")]
    pub trust: f64,
    #[serde(default = "default_availability_weight")]
    pub availability: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            skill: default_skill_weight(),
            location: default_location_weight(),
            experience: default_experience_weight(),
            trust: default_trust_weight(),
            availability: default_availability_weight(),
        }
    }
}

fn default_skill_weight() -> f64 { 0.40 }
fn default_location_weight() -> f64 { 0.25 }
fn default_experience_weight() -> f64 { 0.20 }
fn default_trust_weight() -> f64 { 0.10 }
fn default_availability_weight() -> f64 { 0.05 }

impl From<&WeightsConfig> for ScoringWeights {
    fn from(config: &WeightsConfig) -> Self {
        Self {
            skill: config.skill,
            location: config.location,
            experience: config.experience,
            trust: config.trust,
            availability: config.availability,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationConfig {
    #[serde(default = "default_rec_skill_weight")]
    pub skill: f64,
    #[serde(default = "default_rec_distance_weight")]
    pub distance: f64,
    #[serde(default = "default_rec_price_weight")]
    pub price: f64,
    #[serde(default = "default_urgency_bonus")]
    pub urgency_bonus: f64,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            skill: default_rec_skill_weight(),
            distance: default_rec_distance_weight(),
            price: default_rec_price_weight(),
            urgency_bonus: default_urgency_bonus(),
        }
    }
}

fn default_rec_skill_weight() -> f64 { 0.4 }
fn default_rec_distance_weight() -> f64 { 0.3 }
fn default_rec_price_weight() -> f64 { 0.2 }
fn default_urgency_bonus() -> f64 { 0.1 }

impl From<&RecommendationConfig> for RecommendationWeights {
    fn from(config: &RecommendationConfig) -> Self {
        Self {
            skill: config.skill,
            distance: config.distance,
            price: config.price,
            urgency_bonus: config.urgency_bonus,
            ..RecommendationWeights::default()
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with WORKWISE_)
    /// 5. DATABASE_URL, if set
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., WORKWISE__MATCHING__WORKER_LIMIT -> matching.worker_limit
            .add_source(
                Environment::with_prefix("WORKWISE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        apply_database_url(settings)?.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("WORKWISE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        apply_database_url(settings)?.try_deserialize()
    }
}

/// Let the conventional DATABASE_URL variable win over file configuration
fn apply_database_url(settings: Config) -> Result<Config, ConfigError> {
    match std::env::var("DATABASE_URL") {
        Ok(url) => Config::builder()
            .add_source(settings)
            .set_override("database.url", url)?
            .build(),
        Err(_) => Ok(settings),
    }
}
