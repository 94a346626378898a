//! Composite ATS scoring
//!
//! The engine blends four independent heuristics into one score:
//!
//! | Dimension        | Weight | Heuristic                                          |
//! |------------------|--------|----------------------------------------------------|
//! | Keyword Match    | 0.4    | share of JD tokens not reported missing            |
//! | Skills Alignment | 0.3    | share of required skills found in the resume       |
//! | Formatting       | 0.2    | penalty when layout-hostile terms appear           |
//! | Profile Strength | 0.1    | resume length against an ideal token range         |
//!
//! Every function here is pure: the same inputs always produce the same score.

use crate::config::ScoringConfig;
use crate::error::{AtsScorerError, Result};
use crate::scoring::skills::SkillList;
use crate::scoring::weights::{
    ScoringWeights, CLEAN_FORMATTING_SCORE, IDEAL_PROFILE_SCORE,
};
use aho_corasick::AhoCorasick;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    KeywordMatch,
    SkillsAlignment,
    Formatting,
    ProfileStrength,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::KeywordMatch,
        Dimension::SkillsAlignment,
        Dimension::Formatting,
        Dimension::ProfileStrength,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Dimension::KeywordMatch => "Keyword Match",
            Dimension::SkillsAlignment => "Skills Alignment",
            Dimension::Formatting => "Formatting",
            Dimension::ProfileStrength => "Profile Strength",
        }
    }

    /// What the dimension measures, for report readers
    pub fn description(&self) -> &'static str {
        match self {
            Dimension::KeywordMatch => {
                "Share of the job description's terms not flagged as missing from the resume. Fewer missing keywords score higher."
            }
            Dimension::SkillsAlignment => {
                "Share of the skills the job asks for that appear in the resume."
            }
            Dimension::Formatting => {
                "Whether the resume avoids layout an ATS parses badly, such as tables, graphics or images."
            }
            Dimension::ProfileStrength => {
                "Resume length: 50 to 200 words is ideal, longer resumes lose some credit and shorter ones more."
            }
        }
    }

    pub fn weight(&self, weights: &ScoringWeights) -> f64 {
        match self {
            Dimension::KeywordMatch => weights.keyword_match,
            Dimension::SkillsAlignment => weights.skills_alignment,
            Dimension::Formatting => weights.formatting,
            Dimension::ProfileStrength => weights.profile_strength,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-dimension scores, each in [0, 100]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub keyword_match: f64,
    pub skills_alignment: f64,
    pub formatting: f64,
    pub profile_strength: f64,
}

impl ScoreBreakdown {
    pub fn get(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::KeywordMatch => self.keyword_match,
            Dimension::SkillsAlignment => self.skills_alignment,
            Dimension::Formatting => self.formatting,
            Dimension::ProfileStrength => self.profile_strength,
        }
    }

    pub fn entries(&self) -> [(Dimension, f64); 4] {
        Dimension::ALL.map(|d| (d, self.get(d)))
    }

    /// Fixed linear combination of the four dimensions, rounded to 2 decimals
    pub fn weighted_total(&self, weights: &ScoringWeights) -> f64 {
        let total: f64 = self
            .entries()
            .iter()
            .map(|(dimension, score)| dimension.weight(weights) * score)
            .sum();
        round2(total)
    }

    /// Each dimension's share of the weighted total, in percent.
    ///
    /// All shares are zero when the weighted total is zero.
    pub fn weighted_shares(&self, weights: &ScoringWeights) -> Vec<(Dimension, f64)> {
        let weighted: Vec<(Dimension, f64)> = self
            .entries()
            .iter()
            .map(|(dimension, score)| (*dimension, dimension.weight(weights) * score))
            .collect();

        let total: f64 = weighted.iter().map(|(_, w)| w).sum();

        weighted
            .into_iter()
            .map(|(dimension, w)| {
                let share = if total > 0.0 { w / total * 100.0 } else { 0.0 };
                (dimension, round2(share))
            })
            .collect()
    }

    fn rounded(self) -> Self {
        Self {
            keyword_match: round2(self.keyword_match),
            skills_alignment: round2(self.skills_alignment),
            formatting: round2(self.formatting),
            profile_strength: round2(self.profile_strength),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AtsScore {
    pub composite: f64,
    pub breakdown: ScoreBreakdown,
}

/// Deterministic, explainable ATS scorer
pub struct ScoreEngine {
    config: ScoringConfig,
    formatting_matcher: AhoCorasick,
}

impl ScoreEngine {
    pub fn new(config: ScoringConfig) -> Result<Self> {
        config.validate()?;

        let terms: Vec<String> = config
            .forbidden_terms
            .iter()
            .map(|t| t.to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();

        // terms are lower-cased here and the resume in `formatting_score`,
        // so folding covers non-ASCII letters too
        let formatting_matcher = AhoCorasick::builder()
            .build(&terms)
            .map_err(|e| AtsScorerError::Configuration(format!("Failed to build formatting matcher: {}", e)))?;

        Ok(Self {
            config,
            formatting_matcher,
        })
    }

    pub fn with_defaults() -> Result<Self> {
        Self::new(ScoringConfig::default())
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.config.weights
    }

    /// Score a resume against a job description.
    ///
    /// `missing_keywords` and `skills` come from the generative service; the
    /// engine never calls out itself.
    pub fn compute_score(
        &self,
        resume_text: &str,
        job_description_text: &str,
        missing_keywords: &[String],
        skills: &SkillList,
    ) -> AtsScore {
        let raw = ScoreBreakdown {
            keyword_match: self.keyword_match_score(job_description_text, missing_keywords),
            skills_alignment: self.skills_alignment_score(resume_text, skills),
            formatting: self.formatting_score(resume_text),
            profile_strength: self.profile_strength_score(resume_text),
        };

        log::debug!(
            "raw breakdown: keyword={:.4} skills={:.4} formatting={:.1} profile={:.1}",
            raw.keyword_match,
            raw.skills_alignment,
            raw.formatting,
            raw.profile_strength
        );

        AtsScore {
            composite: raw.weighted_total(&self.config.weights),
            breakdown: raw.rounded(),
        }
    }

    /// `100 * (1 - missing / jd_tokens)` over naive lower-cased whitespace tokens
    pub fn keyword_match_score(&self, job_description_text: &str, missing_keywords: &[String]) -> f64 {
        let total_terms = job_description_text.to_lowercase().split_whitespace().count();
        if total_terms == 0 {
            return 0.0;
        }

        let score = 100.0 * (1.0 - missing_keywords.len() as f64 / total_terms as f64);
        if self.config.clamp_keyword_match {
            score.clamp(0.0, 100.0)
        } else {
            score
        }
    }

    pub fn skills_alignment_score(&self, resume_text: &str, skills: &SkillList) -> f64 {
        if skills.is_empty() {
            return 0.0;
        }
        let matched = skills.matched_in(resume_text).len();
        100.0 * matched as f64 / skills.len() as f64
    }

    pub fn formatting_score(&self, resume_text: &str) -> f64 {
        if self.formatting_matcher.is_match(&resume_text.to_lowercase()) {
            self.config.formatting_penalty_score
        } else {
            CLEAN_FORMATTING_SCORE
        }
    }

    pub fn profile_strength_score(&self, resume_text: &str) -> f64 {
        let profile_length = resume_text.split_whitespace().count();

        if profile_length < self.config.profile_min_tokens {
            self.config.short_profile_score
        } else if profile_length <= self.config.profile_max_tokens {
            IDEAL_PROFILE_SCORE
        } else {
            self.config.long_profile_score
        }
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> ScoreEngine {
        ScoreEngine::with_defaults().unwrap()
    }

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    fn keywords(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("kw{}", i)).collect()
    }

    fn default_skills() -> SkillList {
        SkillList::fallback(&ScoringConfig::default().default_skills)
    }

    #[test]
    fn test_keyword_match_formula() {
        let engine = engine();
        let jd = words(20);
        assert_eq!(engine.keyword_match_score(&jd, &keywords(5)), 75.0);
        assert_eq!(engine.keyword_match_score(&jd, &keywords(20)), 0.0);
    }

    #[test]
    fn test_keyword_match_without_missing_is_perfect() {
        let engine = engine();
        assert_eq!(engine.keyword_match_score("Senior Rust engineer", &[]), 100.0);
    }

    #[test]
    fn test_keyword_match_monotonically_decreasing() {
        let engine = engine();
        let jd = words(10);
        let scores: Vec<f64> = (0..=10)
            .map(|k| engine.keyword_match_score(&jd, &keywords(k)))
            .collect();
        assert!(scores.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn test_keyword_match_empty_jd_is_zero() {
        let engine = engine();
        assert_eq!(engine.keyword_match_score("   \n\t ", &keywords(3)), 0.0);
    }

    #[test]
    fn test_keyword_match_tokenization_is_naive() {
        let engine = engine();
        // "rust," and "rust" are distinct tokens and duplicates are kept
        let jd = "Rust, rust RUST python.";
        assert_eq!(engine.keyword_match_score(jd, &keywords(1)), 75.0);
    }

    #[test]
    fn test_keyword_match_clamped_by_default() {
        let engine = engine();
        assert_eq!(engine.keyword_match_score("two tokens", &keywords(6)), 0.0);
    }

    #[test]
    fn test_keyword_match_unclamped_when_configured() {
        let config = ScoringConfig {
            clamp_keyword_match: false,
            ..ScoringConfig::default()
        };
        let engine = ScoreEngine::new(config).unwrap();
        assert_eq!(engine.keyword_match_score("two tokens", &keywords(6)), -200.0);
    }

    #[test]
    fn test_skills_alignment_empty_resume_is_zero() {
        let engine = engine();
        assert_eq!(engine.skills_alignment_score("", &default_skills()), 0.0);
    }

    #[test]
    fn test_skills_alignment_all_skills_present() {
        let engine = engine();
        let resume = "Python, SQL, Data Analysis, Machine Learning and Communication";
        assert_eq!(engine.skills_alignment_score(resume, &default_skills()), 100.0);
    }

    #[test]
    fn test_skills_alignment_partial() {
        let engine = engine();
        let skills = SkillList::extracted(vec![
            "rust".to_string(),
            "tokio".to_string(),
            "kafka".to_string(),
            "grpc".to_string(),
        ]);
        let resume = "Wrote async services in Rust on Tokio";
        assert_eq!(engine.skills_alignment_score(resume, &skills), 50.0);
    }

    #[test]
    fn test_skills_alignment_empty_list_is_zero() {
        let engine = engine();
        let skills = SkillList::extracted(vec![]);
        assert_eq!(engine.skills_alignment_score("python", &skills), 0.0);
    }

    #[test]
    fn test_formatting_penalty() {
        let engine = engine();
        assert_eq!(engine.formatting_score("Plain text resume"), 100.0);
        assert_eq!(engine.formatting_score("See the TABLE below"), 50.0);
        assert_eq!(engine.formatting_score("Graphic designer"), 50.0);
        assert_eq!(engine.formatting_score("imagery and images"), 50.0);
    }

    #[test]
    fn test_formatting_terms_fold_non_ascii_case() {
        let config = ScoringConfig {
            forbidden_terms: vec!["ÉMOJI".to_string(), "straße".to_string()],
            ..ScoringConfig::default()
        };
        let engine = ScoreEngine::new(config).unwrap();

        assert_eq!(engine.formatting_score("Heavy émoji usage"), 50.0);
        assert_eq!(engine.formatting_score("Lives on HAUPTSTRASSE"), 100.0);
        assert_eq!(engine.formatting_score("Lives on STRASSE"), 100.0);
        assert_eq!(engine.formatting_score("Lives on Hauptstraße"), 50.0);
        assert_eq!(engine.formatting_score("Plain text"), 100.0);
    }

    #[test]
    fn test_formatting_penalty_is_binary() {
        let engine = engine();
        assert_eq!(engine.formatting_score("table graphic image"), 50.0);
    }

    #[test]
    fn test_profile_strength_breakpoints() {
        let engine = engine();
        assert_eq!(engine.profile_strength_score(&words(0)), 50.0);
        assert_eq!(engine.profile_strength_score(&words(49)), 50.0);
        assert_eq!(engine.profile_strength_score(&words(50)), 100.0);
        assert_eq!(engine.profile_strength_score(&words(200)), 100.0);
        assert_eq!(engine.profile_strength_score(&words(201)), 70.0);
    }

    #[test]
    fn test_composite_from_breakdown() {
        let weights = ScoringWeights::default();

        let perfect = ScoreBreakdown {
            keyword_match: 100.0,
            skills_alignment: 100.0,
            formatting: 100.0,
            profile_strength: 100.0,
        };
        assert_eq!(perfect.weighted_total(&weights), 100.0);

        let zero = ScoreBreakdown {
            keyword_match: 0.0,
            skills_alignment: 0.0,
            formatting: 0.0,
            profile_strength: 0.0,
        };
        assert_eq!(zero.weighted_total(&weights), 0.0);

        let mixed = ScoreBreakdown {
            keyword_match: 80.0,
            skills_alignment: 60.0,
            formatting: 100.0,
            profile_strength: 50.0,
        };
        assert_eq!(mixed.weighted_total(&weights), 75.0);
    }

    #[test]
    fn test_compute_score_end_to_end() {
        let engine = engine();
        // 100 tokens, no formatting terms, mentions python and sql
        let resume = format!("python sql {}", words(98));
        let jd = words(40);
        let missing = keywords(10);

        let score = engine.compute_score(&resume, &jd, &missing, &default_skills());

        assert_eq!(score.breakdown.keyword_match, 75.0);
        assert_eq!(score.breakdown.skills_alignment, 40.0);
        assert_eq!(score.breakdown.formatting, 100.0);
        assert_eq!(score.breakdown.profile_strength, 100.0);
        // 0.4*75 + 0.3*40 + 0.2*100 + 0.1*100
        assert_eq!(score.composite, 72.0);
    }

    #[test]
    fn test_breakdown_rounded_to_two_decimals() {
        let engine = engine();
        let jd = words(3);
        let score = engine.compute_score("", &jd, &keywords(1), &default_skills());
        assert_eq!(score.breakdown.keyword_match, 66.67);
    }

    #[test]
    fn test_compute_score_is_idempotent() {
        let engine = engine();
        let resume = "Data analyst with SQL and Tableau experience";
        let jd = "Looking for a data analyst fluent in SQL, Python and Tableau";
        let missing = vec!["python".to_string()];
        let skills = default_skills();

        let first = engine.compute_score(resume, jd, &missing, &skills);
        let second = engine.compute_score(resume, jd, &missing, &skills);
        assert_eq!(first, second);
    }

    #[test]
    fn test_breakdown_entries_use_display_names() {
        let breakdown = ScoreBreakdown {
            keyword_match: 1.0,
            skills_alignment: 2.0,
            formatting: 3.0,
            profile_strength: 4.0,
        };
        let labels: Vec<&str> = breakdown.entries().iter().map(|(d, _)| d.label()).collect();
        assert_eq!(
            labels,
            vec!["Keyword Match", "Skills Alignment", "Formatting", "Profile Strength"]
        );
    }

    #[test]
    fn test_weighted_shares_sum_to_hundred() {
        let breakdown = ScoreBreakdown {
            keyword_match: 80.0,
            skills_alignment: 60.0,
            formatting: 100.0,
            profile_strength: 50.0,
        };
        let shares = breakdown.weighted_shares(&ScoringWeights::default());
        let total: f64 = shares.iter().map(|(_, s)| s).sum();
        assert!((total - 100.0).abs() < 0.05);
        // 32 / 75
        assert_eq!(shares[0], (Dimension::KeywordMatch, 42.67));
    }

    #[test]
    fn test_weighted_shares_zero_total() {
        let breakdown = ScoreBreakdown {
            keyword_match: 0.0,
            skills_alignment: 0.0,
            formatting: 0.0,
            profile_strength: 0.0,
        };
        let shares = breakdown.weighted_shares(&ScoringWeights::default());
        assert!(shares.iter().all(|(_, s)| *s == 0.0));
    }

    #[test]
    fn test_engine_rejects_invalid_weights() {
        let mut config = ScoringConfig::default();
        config.weights.keyword_match = 0.9;
        assert!(ScoreEngine::new(config).is_err());
    }
}
