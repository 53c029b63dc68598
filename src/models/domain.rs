use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub type JobId = i64;
pub type WorkerId = i64;

/// Skill categories shared by job postings and worker skills
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SkillCategory {
    // Construction & building trades
    Construction,
    Electrical,
    Plumbing,
    Carpentry,
    Painting,
    Masonry,
    // Agriculture
    Farming,
    CropHarvesting,
    Livestock,
    Irrigation,
    AgriculturalMachinery,
    OrganicFarming,
    // Domestic
    Cleaning,
    Cooking,
    Childcare,
    Eldercare,
    Gardening,
    Laundry,
    // Retail & commercial
    RetailAssistance,
    InventoryManagement,
    Cashier,
    Delivery,
    CustomerService,
    // Creative
    Photography,
    Videography,
    GraphicDesign,
    EventDecoration,
    Music,
    // Transport
    Driving,
    Logistics,
    MovingServices,
    // Technology
    ComputerRepair,
    MobileRepair,
    DataEntry,
    // Others
    GeneralLabor,
    Security,
    Maintenance,
    Tailoring,
    BeautyServices,
    Tutoring,
    Other,
}

impl SkillCategory {
    pub const ALL: [SkillCategory; 41] = [
        SkillCategory::Construction,
        SkillCategory::Electrical,
        SkillCategory::Plumbing,
        SkillCategory::Carpentry,
        SkillCategory::Painting,
        SkillCategory::Masonry,
        SkillCategory::Farming,
        SkillCategory::CropHarvesting,
        SkillCategory::Livestock,
        SkillCategory::Irrigation,
        SkillCategory::AgriculturalMachinery,
        SkillCategory::OrganicFarming,
        SkillCategory::Cleaning,
        SkillCategory::Cooking,
        SkillCategory::Childcare,
        SkillCategory::Eldercare,
        SkillCategory::Gardening,
        SkillCategory::Laundry,
        SkillCategory::RetailAssistance,
        SkillCategory::InventoryManagement,
        SkillCategory::Cashier,
        SkillCategory::Delivery,
        SkillCategory::CustomerService,
        SkillCategory::Photography,
        SkillCategory::Videography,
        SkillCategory::GraphicDesign,
        SkillCategory::EventDecoration,
        SkillCategory::Music,
        SkillCategory::Driving,
        SkillCategory::Logistics,
        SkillCategory::MovingServices,
        SkillCategory::ComputerRepair,
        SkillCategory::MobileRepair,
        SkillCategory::DataEntry,
        SkillCategory::GeneralLabor,
        SkillCategory::Security,
        SkillCategory::Maintenance,
        SkillCategory::Tailoring,
        SkillCategory::BeautyServices,
        SkillCategory::Tutoring,
        SkillCategory::Other,
    ];

    /// Stored (database / wire) name of the category
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillCategory::Construction => "CONSTRUCTION",
            SkillCategory::Electrical => "ELECTRICAL",
            SkillCategory::Plumbing => "PLUMBING",
            SkillCategory::Carpentry => "CARPENTRY",
            SkillCategory::Painting => "PAINTING",
            SkillCategory::Masonry => "MASONRY",
            SkillCategory::Farming => "FARMING",
            SkillCategory::CropHarvesting => "CROP_HARVESTING",
            SkillCategory::Livestock => "LIVESTOCK",
            SkillCategory::Irrigation => "IRRIGATION",
            SkillCategory::AgriculturalMachinery => "AGRICULTURAL_MACHINERY",
            SkillCategory::OrganicFarming => "ORGANIC_FARMING",
            SkillCategory::Cleaning => "CLEANING",
            SkillCategory::Cooking => "COOKING",
            SkillCategory::Childcare => "CHILDCARE",
            SkillCategory::Eldercare => "ELDERCARE",
            SkillCategory::Gardening => "GARDENING",
            SkillCategory::Laundry => "LAUNDRY",
            SkillCategory::RetailAssistance => "RETAIL_ASSISTANCE",
            SkillCategory::InventoryManagement => "INVENTORY_MANAGEMENT",
            SkillCategory::Cashier => "CASHIER",
            SkillCategory::Delivery => "DELIVERY",
            SkillCategory::CustomerService => "CUSTOMER_SERVICE",
            SkillCategory::Photography => "PHOTOGRAPHY",
            SkillCategory::Videography => "VIDEOGRAPHY",
            SkillCategory::GraphicDesign => "GRAPHIC_DESIGN",
            SkillCategory::EventDecoration => "EVENT_DECORATION",
            SkillCategory::Music => "MUSIC",
            SkillCategory::Driving => "DRIVING",
            SkillCategory::Logistics => "LOGISTICS",
            SkillCategory::MovingServices => "MOVING_SERVICES",
            SkillCategory::ComputerRepair => "COMPUTER_REPAIR",
            SkillCategory::MobileRepair => "MOBILE_REPAIR",
            SkillCategory::DataEntry => "DATA_ENTRY",
            SkillCategory::GeneralLabor => "GENERAL_LABOR",
            SkillCategory::Security => "SECURITY",
            SkillCategory::Maintenance => "MAINTENANCE",
            SkillCategory::Tailoring => "TAILORING",
            SkillCategory::BeautyServices => "BEAUTY_SERVICES",
            SkillCategory::Tutoring => "TUTORING",
            SkillCategory::Other => "OTHER",
        }
    }
}

impl fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SkillCategory {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SkillCategory::ALL
            .iter()
            .copied()
            .find(|category| category.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownVariant::new("skill category", s))
    }
}

/// Lifecycle status of a job posting. Transitions are owned by the job service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Posted,
    ApplicationsReceived,
    WorkerAssigned,
    InProgress,
    Completed,
    Cancelled,
    PaymentPending,
    PaymentCompleted,
    Disputed,
}

impl JobStatus {
    pub const ALL: [JobStatus; 9] = [
        JobStatus::Posted,
        JobStatus::ApplicationsReceived,
        JobStatus::WorkerAssigned,
        JobStatus::InProgress,
        JobStatus::Completed,
        JobStatus::Cancelled,
        JobStatus::PaymentPending,
        JobStatus::PaymentCompleted,
        JobStatus::Disputed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Posted => "POSTED",
            JobStatus::ApplicationsReceived => "APPLICATIONS_RECEIVED",
            JobStatus::WorkerAssigned => "WORKER_ASSIGNED",
            JobStatus::InProgress => "IN_PROGRESS",
            JobStatus::Completed => "COMPLETED",
            JobStatus::Cancelled => "CANCELLED",
            JobStatus::PaymentPending => "PAYMENT_PENDING",
            JobStatus::PaymentCompleted => "PAYMENT_COMPLETED",
            JobStatus::Disputed => "DISPUTED",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JobStatus::ALL
            .iter()
            .copied()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownVariant::new("job status", s))
    }
}

/// Returned when a stored enum name is not recognised
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value:?}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}


/// A single skill declared by a worker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillRecord {
    #[serde(rename = "skillName")]
    pub skill_name: String,
    pub category: SkillCategory,
    #[serde(rename = "experienceYears", default)]
    pub experience_years: Option<u32>,
}

impl SkillRecord {
    pub fn new(skill_name: impl Into<String>, category: SkillCategory, experience_years: Option<u32>) -> Self {
        Self {
            skill_name: skill_name.into(),
            category,
            experience_years,
        }
    }

    /// Experience in years, treating an unknown value as zero
    pub fn years(&self) -> u32 {
        self.experience_years.unwrap_or(0)
    }
}

/// Read-only worker snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerProfile {
    pub id: WorkerId,
    pub name: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    /// 0.0 to 5.0, maintained by the rating service
    #[serde(rename = "trustScore", default)]
    pub trust_score: f64,
    #[serde(default = "default_true")]
    pub availability: bool,
    #[serde(default)]
    pub skills: Vec<SkillRecord>,
}

impl WorkerProfile {
    /// Coordinates, if both are present and finite
    pub fn location(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => Some((lat, lon)),
            _ => None,
        }
    }
}

fn default_true() -> bool { true }

/// Read-only job posting snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: JobId,
    pub title: String,
    #[serde(rename = "skillRequired")]
    pub skill_required: String,
    #[serde(rename = "skillCategory", default)]
    pub skill_category: Option<SkillCategory>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "offeredPrice", default)]
    pub offered_price: Option<f64>,
    #[serde(rename = "isUrgent", default)]
    pub is_urgent: bool,
    pub status: JobStatus,
}

impl JobPosting {
    pub fn has_valid_location(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

/// Per-component scores behind a worker's match score, each in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub skill_match: f64,
    pub location_score: f64,
    pub experience_score: f64,
    pub trust_score: f64,
    pub availability_score: f64,
}

/// A ranked worker for a job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub worker_id: WorkerId,
    pub worker_name: String,
    pub match_score: f64,
    pub score_breakdown: ScoreBreakdown,
    pub distance_km: f64,
}

/// A ranked job for a worker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecommendation {
    pub job_id: JobId,
    pub job_title: String,
    pub match_score: f64,
    pub reasons: BTreeMap<String, String>,
    pub distance_km: f64,
}

/// Weights for the worker matcher; the defaults sum to 1.0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub skill: f64,
    pub location: f64,
    pub experience: f64,
    pub trust: f64,
    pub availability: f64,
}

impl ScoringWeights {
    pub fn sum(&self) -> f64 {
        self.skill + self.location + self.experience + self.trust + self.availability
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            skill: 0.40,
            location: 0.25,
            experience: 0.20,
            trust: 0.10,
            availability: 0.05,
        }
    }
}

/// Weights and thresholds for job recommendations
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecommendationWeights {
    pub skill: f64,
    pub distance: f64,
    pub price: f64,
    /// Flat, unweighted bonus for urgent jobs
    pub urgency_bonus: f64,
    /// Distance at which the linear distance score reaches zero
    pub distance_decay_km: f64,
    /// Offered price that earns the full price score
    pub price_normalization: f64,
    pub good_pay_threshold: f64,
    pub proximity_reason_km: f64,
}

impl Default for RecommendationWeights {
    fn default() -> Self {
        Self {
            skill: 0.4,
            distance: 0.3,
            price: 0.2,
            urgency_bonus: 0.1,
            distance_decay_km: 50.0,
            price_normalization: 1000.0,
            good_pay_threshold: 500.0,
            proximity_reason_km: 10.0,
        }
    }
}

/// Candidate radius, minimum score (exclusive) and result size for one ranking side
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankingPolicy {
    pub radius_km: f64,
    pub min_score: f64,
    pub limit: usize,
}

impl RankingPolicy {
    pub fn workers() -> Self {
        Self {
            radius_km: 25.0,
            min_score: 0.30,
            limit: 20,
        }
    }

    pub fn jobs() -> Self {
        Self {
            radius_km: 30.0,
            min_score: 0.40,
            limit: 15,
        }
    }
}
