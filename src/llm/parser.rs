//! Strict parsing of generative-service responses
//!
//! Responses are parsed as JSON and checked against an explicit schema. Nothing
//! is ever evaluated, and a response that does not match is rejected whole.

use crate::error::{AtsScorerError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The JD-match object: `{"JD Match": "85%", "MissingKeywords": [...], "Profile Summary": "..."}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JdMatch {
    /// Percentage in 0..=100
    pub match_percent: u8,
    pub missing_keywords: Vec<String>,
    pub profile_summary: String,
}

impl JdMatch {
    /// Matched versus missing share of the job description, in percent
    pub fn breakdown(&self) -> [(&'static str, f64); 2] {
        let matched = f64::from(self.match_percent);
        [("Match", matched), ("Missing", 100.0 - matched)]
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawJdMatch {
    #[serde(rename = "JD Match")]
    jd_match: Value,
    #[serde(rename = "MissingKeywords")]
    missing_keywords: Vec<String>,
    #[serde(rename = "Profile Summary")]
    profile_summary: String,
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let stripped = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```JSON"))
        .or_else(|| text.strip_prefix("```"));

    match stripped {
        Some(inner) => inner
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(inner.trim()),
        None => text,
    }
}

/// Parse a skills-extraction response: a JSON array whose elements are all strings.
pub fn parse_skill_list(response: &str) -> Result<Vec<String>> {
    let body = strip_json_fences(response);

    let value: Value = serde_json::from_str(body).map_err(|e| {
        AtsScorerError::MalformedModelResponse(format!("skills response is not valid JSON: {}", e))
    })?;

    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(AtsScorerError::MalformedModelResponse(format!(
                "skills response must be a list, got {}",
                json_type(&other)
            )))
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::String(skill) => Ok(skill),
            other => Err(AtsScorerError::MalformedModelResponse(format!(
                "skills list element {} must be a string, got {}",
                i,
                json_type(&other)
            ))),
        })
        .collect()
}

/// Parse the JD-match response. Missing keys, unknown keys and wrong types are all rejected.
pub fn parse_jd_match(response: &str) -> Result<JdMatch> {
    let body = strip_json_fences(response);

    let raw: RawJdMatch = serde_json::from_str(body).map_err(|e| {
        AtsScorerError::MalformedModelResponse(format!("JD match response does not match schema: {}", e))
    })?;

    Ok(JdMatch {
        match_percent: parse_percentage(&raw.jd_match)?,
        missing_keywords: raw.missing_keywords,
        profile_summary: raw.profile_summary,
    })
}

/// Accepts `"85%"`, `"85"` or `85`; the value must be a whole number in 0..=100.
fn parse_percentage(value: &Value) -> Result<u8> {
    let parsed = match value {
        Value::String(s) => {
            let digits = s.trim();
            let digits = digits.strip_suffix('%').unwrap_or(digits).trim();
            digits.parse::<u64>().ok()
        }
        Value::Number(n) => n.as_u64(),
        _ => None,
    };

    match parsed {
        Some(p) if p <= 100 => Ok(p as u8),
        _ => Err(AtsScorerError::MalformedModelResponse(format!(
            "\"JD Match\" must be a whole percentage between 0 and 100, got {}",
            value
        ))),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
