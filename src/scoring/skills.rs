//! Skill lists used by the skills-alignment dimension

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a skill list came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillSource {
    /// Parsed from the generative service's extraction response
    Extracted,
    /// Fixed fallback used when the extraction response was unusable
    Default,
}

impl fmt::Display for SkillSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkillSource::Extracted => write!(f, "extracted"),
            SkillSource::Default => write!(f, "default"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillList {
    pub skills: Vec<String>,
    pub source: SkillSource,
}

impl SkillList {
    pub fn extracted(skills: Vec<String>) -> Self {
        Self {
            skills,
            source: SkillSource::Extracted,
        }
    }

    pub fn fallback(default_skills: &[String]) -> Self {
        Self {
            skills: default_skills.to_vec(),
            source: SkillSource::Default,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == SkillSource::Default
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    /// Skills found (case-insensitively) anywhere in `text`, in list order
    pub fn matched_in<'a>(&'a self, text: &str) -> Vec<&'a str> {
        let haystack = text.to_lowercase();
        self.skills
            .iter()
            .filter(|skill| haystack.contains(&skill.to_lowercase()))
            .map(|skill| skill.as_str())
            .collect()
    }
}
