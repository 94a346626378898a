//! TF-IDF cosine similarity between a job description and a resume

use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};

/// Tokens of two or more word characters, as in the usual TF-IDF vectoriser
const TOKEN_PATTERN: &str = r"\b\w\w+\b";

pub struct TfIdfSimilarity {
    token_regex: Regex,
}

impl TfIdfSimilarity {
    pub fn new() -> Self {
        Self {
            token_regex: Regex::new(TOKEN_PATTERN).expect("Invalid token regex"),
        }
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        self.token_regex
            .find_iter(&lowered)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// Cosine similarity of the two documents' TF-IDF vectors, as a percentage.
    ///
    /// Uses smoothed idf (`ln((1 + n) / (1 + df)) + 1`) fitted on just these two
    /// documents and L2-normalised vectors. Returns 0 when either document has
    /// no tokens.
    pub fn similarity(&self, job_description_text: &str, resume_text: &str) -> f64 {
        let jd_counts = self.term_counts(job_description_text);
        let resume_counts = self.term_counts(resume_text);

        if jd_counts.is_empty() || resume_counts.is_empty() {
            return 0.0;
        }

        let vocabulary: BTreeSet<&String> = jd_counts.keys().chain(resume_counts.keys()).collect();
        let n_docs = 2.0_f64;

        let mut dot = 0.0;
        let mut jd_norm = 0.0;
        let mut resume_norm = 0.0;

        for term in vocabulary {
            let jd_tf = *jd_counts.get(term).unwrap_or(&0) as f64;
            let resume_tf = *resume_counts.get(term).unwrap_or(&0) as f64;

            let df = (jd_tf > 0.0) as u8 as f64 + (resume_tf > 0.0) as u8 as f64;
            let idf = ((1.0 + n_docs) / (1.0 + df)).ln() + 1.0;

            let a = jd_tf * idf;
            let b = resume_tf * idf;
            dot += a * b;
            jd_norm += a * a;
            resume_norm += b * b;
        }

        if jd_norm == 0.0 || resume_norm == 0.0 {
            return 0.0;
        }

        dot / (jd_norm.sqrt() * resume_norm.sqrt()) * 100.0
    }

    fn term_counts(&self, text: &str) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for token in self.tokenize(text) {
            *counts.entry(token).or_insert(0) += 1;
        }
        counts
    }
}

impl Default for TfIdfSimilarity {
    fn default() -> Self {
        Self::new()
    }
}
