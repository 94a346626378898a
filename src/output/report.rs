//! Report structures handed to the formatters

use crate::llm::analyzer::AtsAnalysis;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub analysis: AtsAnalysis,
    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub scorer_version: String,
    pub resume_file: String,
    pub job_file: String,
    /// `None` when scoring ran without the generative service
    pub model: Option<String>,
}

impl ReportMetadata {
    pub fn new(resume_file: impl Into<String>, job_file: impl Into<String>, model: Option<String>) -> Self {
        Self {
            generated_at: Utc::now(),
            scorer_version: env!("CARGO_PKG_VERSION").to_string(),
            resume_file: resume_file.into(),
            job_file: job_file.into(),
            model,
        }
    }
}

impl AnalysisReport {
    pub fn new(analysis: AtsAnalysis, metadata: ReportMetadata) -> Self {
        Self { analysis, metadata }
    }

    pub fn overall_score(&self) -> f64 {
        self.analysis.ats_score.composite
    }

    pub fn verdict(&self) -> &'static str {
        score_label(self.overall_score())
    }
}

/// Qualitative label for a 0-100 score
pub fn score_label(score: f64) -> &'static str {
    match score {
        s if s >= 90.0 => "Excellent",
        s if s >= 80.0 => "Very Good",
        s if s >= 70.0 => "Good",
        s if s >= 60.0 => "Fair",
        s if s >= 50.0 => "Below Average",
        _ => "Poor",
    }
}
