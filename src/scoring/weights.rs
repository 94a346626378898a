//! Named scoring constants and component weights
//!
//! The numeric thresholds here define the expected scores of the engine; they
//! are exposed through `ScoringConfig` so they can be tuned without touching
//! the algorithm.

use serde::{Deserialize, Serialize};

pub const KEYWORD_MATCH_WEIGHT: f64 = 0.4;
pub const SKILLS_ALIGNMENT_WEIGHT: f64 = 0.3;
pub const FORMATTING_WEIGHT: f64 = 0.2;
pub const PROFILE_STRENGTH_WEIGHT: f64 = 0.1;

/// Inclusive lower bound of the ideal resume length, in whitespace tokens
pub const PROFILE_MIN_TOKENS: usize = 50;
/// Inclusive upper bound of the ideal resume length, in whitespace tokens
pub const PROFILE_MAX_TOKENS: usize = 200;
pub const IDEAL_PROFILE_SCORE: f64 = 100.0;
pub const LONG_PROFILE_SCORE: f64 = 70.0;
pub const SHORT_PROFILE_SCORE: f64 = 50.0;

pub const CLEAN_FORMATTING_SCORE: f64 = 100.0;
pub const FORMATTING_PENALTY_SCORE: f64 = 50.0;

/// Terms that hint at ATS-hostile layout elements
pub const FORBIDDEN_FORMATTING_TERMS: [&str; 3] = ["table", "graphic", "image"];

/// Skills used when the extraction response cannot be parsed
pub const DEFAULT_SKILLS: [&str; 5] = [
    "python",
    "sql",
    "data analysis",
    "machine learning",
    "communication",
];

const WEIGHT_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub keyword_match: f64,
    pub skills_alignment: f64,
    pub formatting: f64,
    pub profile_strength: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            keyword_match: KEYWORD_MATCH_WEIGHT,
            skills_alignment: SKILLS_ALIGNMENT_WEIGHT,
            formatting: FORMATTING_WEIGHT,
            profile_strength: PROFILE_STRENGTH_WEIGHT,
        }
    }
}

impl ScoringWeights {
    pub fn sum(&self) -> f64 {
        self.keyword_match + self.skills_alignment + self.formatting + self.profile_strength
    }

    /// Weights must be non-negative and sum to 1.0
    pub fn is_valid(&self) -> bool {
        let all_non_negative = [
            self.keyword_match,
            self.skills_alignment,
            self.formatting,
            self.profile_strength,
        ]
        .iter()
        .all(|w| *w >= 0.0);

        all_non_negative && (self.sum() - 1.0).abs() < WEIGHT_TOLERANCE
    }
}
