use crate::core::filters::{JobRequirement, SkillRelevance};
use crate::models::{RecommendationWeights, ScoreBreakdown, ScoringWeights, SkillRecord, WorkerProfile};

/// Base score when the job requirement names the skill
pub const NAME_MATCH_SCORE: f64 = 0.9;
/// Base score when only the category matches
pub const CATEGORY_MATCH_SCORE: f64 = 0.7;
/// Base score for a partial word overlap
pub const PARTIAL_MATCH_SCORE: f64 = 0.5;

const MAX_EXPERIENCE_BONUS: f64 = 0.2;
const EXPERIENCE_BONUS_PER_YEAR: f64 = 0.02;
/// Years of experience that count as a full experience score
const EXPERIENCE_SATURATION_YEARS: f64 = 10.0;
const MAX_TRUST_SCORE: f64 = 5.0;

/// Calculate the combined match score (0-1) for a worker against a job
///
/// Scoring formula:
/// score = (
///     skill_match * 0.40 +         # best matching skill
///     location_score * 0.25 +      # step function of distance
///     experience_score * 0.20 +    # mean years on relevant skills
///     trust_score * 0.10 +         # trust / 5
///     availability * 0.05          # 1 if available
/// )
pub fn calculate_match_score(
    requirement: &JobRequirement,
    worker: &WorkerProfile,
    distance_km: Option<f64>,
    weights: &ScoringWeights,
) -> (f64, ScoreBreakdown) {
    let breakdown = ScoreBreakdown {
        skill_match: skill_match_score(requirement, &worker.skills),
        location_score: location_score(distance_km),
        experience_score: experience_score(requirement, &worker.skills),
        trust_score: trust_score(worker.trust_score),
        availability_score: availability_score(worker.availability),
    };

    let total = breakdown.skill_match * weights.skill
        + breakdown.location_score * weights.location
        + breakdown.experience_score * weights.experience
        + breakdown.trust_score * weights.trust
        + breakdown.availability_score * weights.availability;

    (total.clamp(0.0, 1.0), breakdown)
}

/// Best score over all of a worker's skills, capped at 1.0
pub fn skill_match_score(requirement: &JobRequirement, skills: &[SkillRecord]) -> f64 {
    skills
        .iter()
        .map(|skill| single_skill_score(requirement, skill))
        .fold(0.0, f64::max)
        .min(1.0)
}

/// Score of one skill: base relevance plus experience bonus
#[inline]
pub fn single_skill_score(requirement: &JobRequirement, skill: &SkillRecord) -> f64 {
    let base = match requirement.relevance(skill) {
        Some(SkillRelevance::NameInRequirement) => NAME_MATCH_SCORE,
        Some(SkillRelevance::SameCategory) => CATEGORY_MATCH_SCORE,
        Some(SkillRelevance::PartialWord) => PARTIAL_MATCH_SCORE,
        None => return 0.0,
    };

    base + experience_bonus(skill.experience_years)
}

/// min(0.2, years * 0.02); no bonus when experience is unknown
#[inline]
pub fn experience_bonus(experience_years: Option<u32>) -> f64 {
    experience_years
        .map(|years| (years as f64 * EXPERIENCE_BONUS_PER_YEAR).min(MAX_EXPERIENCE_BONUS))
        .unwrap_or(0.0)
}

/// Location proximity step function
///
/// ≤5km → 1.0, ≤10 → 0.8, ≤20 → 0.6, ≤30 → 0.4, ≤50 → 0.2, beyond → 0.0.
/// A worker without coordinates scores 0.
#[inline]
pub fn location_score(distance_km: Option<f64>) -> f64 {
    let Some(distance) = distance_km else {
        return 0.0;
    };

    if distance <= 5.0 {
        1.0
    } else if distance <= 10.0 {
        0.8
    } else if distance <= 20.0 {
        0.6
    } else if distance <= 30.0 {
        0.4
    } else if distance <= 50.0 {
        0.2
    } else {
        0.0
    }
}

/// Mean experience over skills relevant by name or category, normalized by 10 years
pub fn experience_score(requirement: &JobRequirement, skills: &[SkillRecord]) -> f64 {
    let (count, total_years) = skills
        .iter()
        .filter(|skill| requirement.is_directly_relevant(skill))
        .fold((0usize, 0.0f64), |(count, total), skill| {
            (count + 1, total + skill.years() as f64)
        });

    if count == 0 {
        return 0.0;
    }

    let average = total_years / count as f64;
    (average / EXPERIENCE_SATURATION_YEARS).min(1.0)
}

#[inline]
pub fn trust_score(trust: f64) -> f64 {
    (trust / MAX_TRUST_SCORE).clamp(0.0, 1.0)
}

#[inline]
pub fn availability_score(available: bool) -> f64 {
    if available { 1.0 } else { 0.0 }
}

/// Linear distance decay used for recommendations: 1 at 0km, 0 at the decay distance
#[inline]
pub fn linear_distance_score(distance_km: f64, decay_km: f64) -> f64 {
    (1.0 - distance_km / decay_km).max(0.0)
}

/// Price attractiveness: offered price over the normalization amount, capped at 1
#[inline]
pub fn price_score(offered_price: f64, weights: &RecommendationWeights) -> f64 {
    (offered_price / weights.price_normalization).min(1.0)
}
