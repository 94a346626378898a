//! Configuration management for the ATS scorer

use crate::error::{AtsScorerError, Result};
use crate::scoring::weights::{
    ScoringWeights, DEFAULT_SKILLS, FORBIDDEN_FORMATTING_TERMS, FORMATTING_PENALTY_SCORE,
    LONG_PROFILE_SCORE, PROFILE_MAX_TOKENS, PROFILE_MIN_TOKENS, SHORT_PROFILE_SCORE,
};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub scoring: ScoringConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub endpoint: String,
    pub model: String,
    /// Name of the environment variable holding the API credential
    pub api_key_env: String,
    pub timeout_secs: u64,
    /// Zero keeps the call fail-fast
    pub max_retries: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub profile_min_tokens: usize,
    pub profile_max_tokens: usize,
    pub long_profile_score: f64,
    pub short_profile_score: f64,
    pub formatting_penalty_score: f64,
    pub forbidden_terms: Vec<String>,
    pub default_skills: Vec<String>,
    pub clamp_keyword_match: bool,
    pub weights: ScoringWeights,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color_output: bool,
    pub include_tips: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
    Html,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com/v1beta/models".to_string(),
            model: "gemini-pro".to_string(),
            api_key_env: "GOOGLE_API_KEY".to_string(),
            timeout_secs: 60,
            max_retries: 0,
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            profile_min_tokens: PROFILE_MIN_TOKENS,
            profile_max_tokens: PROFILE_MAX_TOKENS,
            long_profile_score: LONG_PROFILE_SCORE,
            short_profile_score: SHORT_PROFILE_SCORE,
            formatting_penalty_score: FORMATTING_PENALTY_SCORE,
            forbidden_terms: FORBIDDEN_FORMATTING_TERMS.iter().map(|t| t.to_string()).collect(),
            default_skills: DEFAULT_SKILLS.iter().map(|s| s.to_string()).collect(),
            clamp_keyword_match: true,
            weights: ScoringWeights::default(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            color_output: true,
            include_tips: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: ServiceConfig::default(),
            scoring: ScoringConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.weights.is_valid() {
            return Err(AtsScorerError::Configuration(format!(
                "Scoring weights must be non-negative and sum to 1.0 (got {:.4})",
                self.weights.sum()
            )));
        }

        if self.profile_min_tokens > self.profile_max_tokens {
            return Err(AtsScorerError::Configuration(format!(
                "profile_min_tokens ({}) exceeds profile_max_tokens ({})",
                self.profile_min_tokens, self.profile_max_tokens
            )));
        }

        let scores = [
            self.long_profile_score,
            self.short_profile_score,
            self.formatting_penalty_score,
        ];
        if scores.iter().any(|s| !(0.0..=100.0).contains(s)) {
            return Err(AtsScorerError::Configuration(
                "Heuristic scores must lie in [0, 100]".to_string(),
            ));
        }

        Ok(())
    }
}

impl Config {
    /// Load the config from the default location, writing defaults on first use
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| AtsScorerError::Configuration(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| AtsScorerError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("ats-scorer")
            .join("config.toml")
    }

    pub fn validate(&self) -> Result<()> {
        if self.service.timeout_secs == 0 {
            return Err(AtsScorerError::Configuration(
                "service.timeout_secs must be greater than zero".to_string(),
            ));
        }
        self.scoring.validate()
    }

    /// Read the service credential from the environment (and `.env`, if present).
    ///
    /// This is the only place ambient state is consulted; the value is handed to
    /// the client explicitly at construction.
    pub fn api_key(&self) -> Result<String> {
        dotenvy::dotenv().ok();

        let key = std::env::var(&self.service.api_key_env).with_context(|| {
            format!(
                "Required environment variable '{}' is not set",
                self.service.api_key_env
            )
        });

        match key {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            Ok(_) => Err(AtsScorerError::Configuration(format!(
                "Environment variable '{}' is empty",
                self.service.api_key_env
            ))),
            Err(e) => Err(AtsScorerError::Configuration(format!("{:#}", e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.scoring.profile_min_tokens, 50);
        assert_eq!(config.scoring.profile_max_tokens, 200);
        assert_eq!(config.scoring.default_skills.len(), 5);
        assert_eq!(config.service.max_retries, 0);
    }

    #[test]
    fn test_config_round_trips_through_toml_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.service.model = "gemini-1.5-flash".to_string();
        config.scoring.clamp_keyword_match = false;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.service.model, "gemini-1.5-flash");
        assert!(!loaded.scoring.clamp_keyword_match);
        assert_eq!(loaded.output.format, OutputFormat::Console);
    }

    #[test]
    fn test_invalid_weights_rejected_on_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.scoring.weights.formatting = 0.5;
        config.save_to(&path).unwrap();

        let result = Config::load_from(&path);
        assert!(matches!(result, Err(AtsScorerError::Configuration(_))));
    }

    #[test]
    fn test_inverted_profile_bounds_rejected() {
        let mut config = ScoringConfig::default();
        config.profile_min_tokens = 300;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_api_key_is_configuration_error() {
        let mut config = Config::default();
        config.service.api_key_env = "ATS_SCORER_TEST_KEY_THAT_IS_NEVER_SET".to_string();

        let result = config.api_key();
        assert!(matches!(result, Err(AtsScorerError::Configuration(_))));
    }
}
