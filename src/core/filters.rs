//! Pure text heuristics for deciding whether a worker skill is relevant to a job.
//!
//! The `*_normalized` functions expect lower-cased input so callers can
//! normalize a job's requirement once and reuse it across every candidate.

use crate::models::{JobPosting, SkillCategory, SkillRecord};

/// How a skill relates to a job's requirement, strongest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SkillRelevance {
    /// The requirement text contains the skill name
    NameInRequirement,
    /// Same skill category
    SameCategory,
    /// Some word of one contains some word of the other
    PartialWord,
}

/// A job's requirement, lower-cased once for repeated matching
#[derive(Debug, Clone)]
pub struct JobRequirement {
    pub text: String,
    pub category: Option<SkillCategory>,
}

impl JobRequirement {
    pub fn from_job(job: &JobPosting) -> Self {
        Self {
            text: job.skill_required.to_lowercase(),
            category: job.skill_category,
        }
    }

    /// Relevance of a skill by name or category only (no partial words)
    #[inline]
    pub fn is_directly_relevant(&self, skill: &SkillRecord) -> bool {
        matches!(
            self.relevance(skill),
            Some(SkillRelevance::NameInRequirement) | Some(SkillRelevance::SameCategory)
        )
    }

    /// Strongest relation between this requirement and a skill, if any
    pub fn relevance(&self, skill: &SkillRecord) -> Option<SkillRelevance> {
        let name = skill.skill_name.to_lowercase();

        if contains_normalized(&self.text, &name) {
            Some(SkillRelevance::NameInRequirement)
        } else if self.category == Some(skill.category) {
            Some(SkillRelevance::SameCategory)
        } else if partial_word_match_normalized(&self.text, &name) {
            Some(SkillRelevance::PartialWord)
        } else {
            None
        }
    }
}

/// Substring test on already lower-cased strings
#[inline]
pub fn contains_normalized(haystack: &str, needle: &str) -> bool {
    haystack.contains(needle)
}

/// True if any whitespace-separated word of `a` contains a word of `b` or vice versa.
/// Inputs must already be lower-cased. Blank input has no words and never matches.
pub fn partial_word_match_normalized(a: &str, b: &str) -> bool {
    a.split_whitespace().any(|left| {
        b.split_whitespace()
            .any(|right| left.contains(right) || right.contains(left))
    })
}

/// Case-insensitive convenience wrapper over [`partial_word_match_normalized`]
pub fn partial_word_match(a: &str, b: &str) -> bool {
    partial_word_match_normalized(&a.to_lowercase(), &b.to_lowercase())
}

/// Check whether a score clears an exclusive minimum
#[inline]
pub fn passes_threshold(score: f64, min_score: f64) -> bool {
    score > min_score
}
