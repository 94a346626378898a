//! Keyword suggestions and keyword frequency data

use std::collections::HashMap;

pub const SUGGESTION_SUFFIX: &str = " (consider related terms)";

/// Turn each missing keyword into a suggestion, preserving order
pub fn suggest(missing_keywords: &[String]) -> Vec<String> {
    missing_keywords
        .iter()
        .map(|keyword| format!("{}{}", keyword, SUGGESTION_SUFFIX))
        .collect()
}

/// Word frequencies across the missing keywords, most frequent first.
///
/// This is the data a word cloud would be drawn from. Ties are broken
/// alphabetically so the output is stable.
pub fn keyword_frequencies(missing_keywords: &[String]) -> Vec<(String, usize)> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for word in missing_keywords.iter().flat_map(|k| k.split_whitespace()) {
        *counts.entry(word.to_lowercase()).or_insert(0) += 1;
    }

    let mut frequencies: Vec<(String, usize)> = counts.into_iter().collect();
    frequencies.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    frequencies
}
