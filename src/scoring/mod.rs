//! Scoring: the composite ATS score and its supporting heuristics

pub mod engine;
pub mod similarity;
pub mod skills;
pub mod suggestions;
pub mod weights;

pub use engine::{AtsScore, Dimension, ScoreBreakdown, ScoreEngine};
pub use skills::{SkillList, SkillSource};
