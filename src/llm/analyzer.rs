//! Request-scoped ATS analysis pipeline
//!
//! One submission runs sequentially: JD-match call, skills extraction call,
//! scoring, and an optional tips call. Only a malformed skills response is
//! recovered from; every other failure aborts the submission.

use crate::config::Config;
use crate::error::{AtsScorerError, Result};
use crate::llm::client::GenerativeService;
use crate::llm::parser::{parse_jd_match, parse_skill_list, JdMatch};
use crate::llm::prompts::{PromptParams, PromptTemplates};
use crate::scoring::engine::{AtsScore, Dimension, ScoreEngine};
use crate::scoring::similarity::TfIdfSimilarity;
use crate::scoring::skills::SkillList;
use crate::scoring::suggestions::{keyword_frequencies, suggest};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::time::Instant;

pub const SKILLS_FALLBACK_WARNING: &str =
    "Could not extract skills dynamically. Falling back to default skills.";

/// Everything computed for one submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtsAnalysis {
    /// Absent when the caller supplied missing keywords directly
    pub jd_match: Option<JdMatch>,
    pub missing_keywords: Vec<String>,
    pub ats_score: AtsScore,
    /// Percent share of each dimension in the weighted total
    pub weighted_shares: Vec<(Dimension, f64)>,
    pub skills: SkillList,
    pub matched_skills: Vec<String>,
    pub suggestions: Vec<String>,
    pub keyword_frequencies: Vec<(String, usize)>,
    pub tfidf_similarity: f64,
    pub tips: Option<String>,
    pub warnings: Vec<String>,
    pub processing_time_ms: u64,
}

impl AtsAnalysis {
    /// Score with collaborator outputs that are already in hand; no service calls.
    ///
    /// A blank resume or job description is reported instead of scored.
    pub fn from_parts(
        engine: &ScoreEngine,
        resume_text: &str,
        job_text: &str,
        missing_keywords: Vec<String>,
        skills: SkillList,
    ) -> Result<Self> {
        ensure_documents(resume_text, job_text)?;

        let ats_score = engine.compute_score(resume_text, job_text, &missing_keywords, &skills);
        let matched_skills = skills
            .matched_in(resume_text)
            .into_iter()
            .map(str::to_string)
            .collect();

        Ok(Self {
            jd_match: None,
            weighted_shares: ats_score.breakdown.weighted_shares(engine.weights()),
            suggestions: suggest(&missing_keywords),
            keyword_frequencies: keyword_frequencies(&missing_keywords),
            tfidf_similarity: TfIdfSimilarity::new().similarity(job_text, resume_text),
            missing_keywords,
            ats_score,
            skills,
            matched_skills,
            tips: None,
            warnings: Vec::new(),
            processing_time_ms: 0,
        })
    }
}

pub struct AtsAnalyzer<S: GenerativeService> {
    service: S,
    engine: ScoreEngine,
    prompts: PromptTemplates,
    default_skills: Vec<String>,
    include_tips: bool,
}

impl<S: GenerativeService> AtsAnalyzer<S> {
    pub fn new(service: S, config: &Config) -> Result<Self> {
        Ok(Self {
            service,
            engine: ScoreEngine::new(config.scoring.clone())?,
            prompts: PromptTemplates::default(),
            default_skills: config.scoring.default_skills.clone(),
            include_tips: config.output.include_tips,
        })
    }

    pub fn with_tips(mut self, include_tips: bool) -> Self {
        self.include_tips = include_tips;
        self
    }

    pub fn engine(&self) -> &ScoreEngine {
        &self.engine
    }

    pub async fn analyze(&self, resume_text: &str, job_text: &str) -> Result<AtsAnalysis> {
        let start_time = Instant::now();
        ensure_documents(resume_text, job_text)?;

        let params = PromptParams {
            resume_content: resume_text.to_string(),
            job_content: job_text.to_string(),
        };
        let mut warnings = Vec::new();

        info!("Requesting JD match evaluation");
        let jd_response = self
            .service
            .generate(&self.prompts.render_jd_match(&params))
            .await?;
        let jd_match = parse_jd_match(&jd_response)?;
        info!(
            "JD match {}% with {} missing keywords",
            jd_match.match_percent,
            jd_match.missing_keywords.len()
        );

        let (skills, skills_warning) = self.extract_skills(&params).await?;
        warnings.extend(skills_warning);

        let mut analysis = AtsAnalysis::from_parts(
            &self.engine,
            resume_text,
            job_text,
            jd_match.missing_keywords.clone(),
            skills,
        )?;
        info!("Overall ATS score: {:.2}%", analysis.ats_score.composite);

        if self.include_tips {
            info!("Requesting resume tips");
            let tips = self
                .service
                .generate(&self.prompts.render_resume_tips(&params))
                .await?;
            analysis.tips = Some(tips);
        }

        analysis.jd_match = Some(jd_match);
        analysis.warnings = warnings;
        analysis.processing_time_ms = start_time.elapsed().as_millis() as u64;
        Ok(analysis)
    }

    /// Ask the service for the JD's required skills.
    ///
    /// A response that is not a list of strings degrades to the default skill
    /// list plus a warning. A failed call is still an error.
    pub async fn extract_skills(&self, params: &PromptParams) -> Result<(SkillList, Option<String>)> {
        info!("Requesting skills extraction");
        let response = self
            .service
            .generate(&self.prompts.render_skills_extraction(params))
            .await?;

        match parse_skill_list(&response) {
            Ok(skills) => {
                info!("Extracted {} required skills", skills.len());
                Ok((SkillList::extracted(skills), None))
            }
            Err(e) => {
                warn!("{} ({})", SKILLS_FALLBACK_WARNING, e);
                Ok((
                    SkillList::fallback(&self.default_skills),
                    Some(SKILLS_FALLBACK_WARNING.to_string()),
                ))
            }
        }
    }
}

/// Fails with `MissingInput` when either document is empty or whitespace only
pub fn ensure_documents(resume_text: &str, job_text: &str) -> Result<()> {
    ensure_present(resume_text, "resume")?;
    ensure_present(job_text, "job description")
}

fn ensure_present(text: &str, what: &str) -> Result<()> {
    if text.trim().is_empty() {
        Err(AtsScorerError::MissingInput(format!(
            "Please provide a {} to calculate the ATS score",
            what
        )))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::skills::SkillSource;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays canned responses in order and records the prompts it received
    struct ScriptedService {
        responses: Mutex<VecDeque<Result<String>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedService {
        fn new(responses: Vec<Result<String>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    impl GenerativeService for ScriptedService {
        async fn generate(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(AtsScorerError::UpstreamService("script exhausted".to_string())))
        }
    }

    impl GenerativeService for &ScriptedService {
        async fn generate(&self, prompt: &str) -> Result<String> {
            (**self).generate(prompt).await
        }
    }

    const JD_RESPONSE: &str =
        r#"{"JD Match":"80%","MissingKeywords":["kubernetes","terraform"],"Profile Summary":"Solid analyst."}"#;

    fn resume() -> String {
        let filler = vec!["experience"; 60].join(" ");
        format!("Data analyst skilled in Python and SQL. {}", filler)
    }

    fn job() -> String {
        "Data analyst needed with python sql kubernetes terraform and communication skills required".to_string()
    }

    fn analyzer(service: &ScriptedService, tips: bool) -> AtsAnalyzer<&ScriptedService> {
        AtsAnalyzer::new(service, &Config::default())
            .unwrap()
            .with_tips(tips)
    }

    #[tokio::test]
    async fn test_full_pipeline() {
        let service = ScriptedService::new(vec![
            Ok(JD_RESPONSE.to_string()),
            Ok(r#"["python", "sql", "tableau", "communication"]"#.to_string()),
            Ok("- Add Kubernetes projects".to_string()),
        ]);

        let analysis = analyzer(&service, true).analyze(&resume(), &job()).await.unwrap();

        assert_eq!(service.calls(), 3);
        assert_eq!(analysis.jd_match.as_ref().unwrap().match_percent, 80);
        assert_eq!(analysis.skills.source, SkillSource::Extracted);
        assert_eq!(analysis.matched_skills, vec!["python", "sql"]);
        // 12 JD tokens, 2 missing
        assert_eq!(analysis.ats_score.breakdown.keyword_match, 83.33);
        assert_eq!(analysis.ats_score.breakdown.skills_alignment, 50.0);
        assert_eq!(analysis.ats_score.breakdown.formatting, 100.0);
        assert_eq!(analysis.ats_score.breakdown.profile_strength, 100.0);
        assert_eq!(
            analysis.suggestions,
            vec![
                "kubernetes (consider related terms)",
                "terraform (consider related terms)"
            ]
        );
        assert_eq!(analysis.tips.as_deref(), Some("- Add Kubernetes projects"));
        assert!(analysis.warnings.is_empty());
        assert!(analysis.tfidf_similarity > 0.0);
    }

    #[tokio::test]
    async fn test_malformed_skills_falls_back_to_defaults() {
        let service = ScriptedService::new(vec![
            Ok(JD_RESPONSE.to_string()),
            Ok("Skills: python, rust, go".to_string()),
        ]);

        let analysis = analyzer(&service, false).analyze(&resume(), &job()).await.unwrap();

        assert!(analysis.skills.is_fallback());
        assert_eq!(analysis.skills.len(), 5);
        // python and sql of the five defaults are in the resume
        assert_eq!(analysis.ats_score.breakdown.skills_alignment, 40.0);
        assert_eq!(analysis.warnings, vec![SKILLS_FALLBACK_WARNING.to_string()]);
    }

    #[tokio::test]
    async fn test_partially_valid_skills_list_is_not_used() {
        let service = ScriptedService::new(vec![
            Ok(JD_RESPONSE.to_string()),
            Ok(r#"["python", {"name": "sql"}]"#.to_string()),
        ]);

        let analysis = analyzer(&service, false).analyze(&resume(), &job()).await.unwrap();
        assert_eq!(analysis.skills.source, SkillSource::Default);
        assert_eq!(analysis.skills.skills, Config::default().scoring.default_skills);
    }

    #[tokio::test]
    async fn test_malformed_jd_match_is_fatal() {
        let service = ScriptedService::new(vec![Ok("{'JD Match': '80%'}".to_string())]);

        let err = analyzer(&service, false).analyze(&resume(), &job()).await.unwrap_err();
        assert!(matches!(err, AtsScorerError::MalformedModelResponse(_)));
        assert_eq!(service.calls(), 1);
    }

    #[tokio::test]
    async fn test_upstream_failure_is_fatal() {
        let service = ScriptedService::new(vec![
            Ok(JD_RESPONSE.to_string()),
            Err(AtsScorerError::UpstreamService("status 401: unauthorized".to_string())),
        ]);

        let err = analyzer(&service, false).analyze(&resume(), &job()).await.unwrap_err();
        assert!(matches!(err, AtsScorerError::UpstreamService(_)));
    }

    #[tokio::test]
    async fn test_missing_input_skips_all_calls() {
        let service = ScriptedService::new(vec![]);
        let analyzer = analyzer(&service, false);

        let err = analyzer.analyze("   ", &job()).await.unwrap_err();
        assert!(matches!(err, AtsScorerError::MissingInput(_)));

        let err = analyzer.analyze(&resume(), "").await.unwrap_err();
        assert!(matches!(err, AtsScorerError::MissingInput(_)));

        assert_eq!(service.calls(), 0);
    }

    #[tokio::test]
    async fn test_identical_inputs_give_identical_scores() {
        let script = || {
            ScriptedService::new(vec![
                Ok(JD_RESPONSE.to_string()),
                Ok(r#"["python", "sql"]"#.to_string()),
            ])
        };
        let first_service = script();
        let second_service = script();

        let first = analyzer(&first_service, false).analyze(&resume(), &job()).await.unwrap();
        let second = analyzer(&second_service, false).analyze(&resume(), &job()).await.unwrap();

        assert_eq!(first.ats_score, second.ats_score);
        assert_eq!(first.weighted_shares, second.weighted_shares);
    }

    #[test]
    fn test_from_parts_scores_without_service() {
        let engine = ScoreEngine::with_defaults().unwrap();
        let skills = SkillList::extracted(vec!["python".to_string(), "spark".to_string()]);

        let analysis = AtsAnalysis::from_parts(
            &engine,
            &resume(),
            &job(),
            vec!["terraform".to_string()],
            skills,
        )
        .unwrap();

        assert!(analysis.jd_match.is_none());
        assert!(analysis.tips.is_none());
        assert_eq!(analysis.matched_skills, vec!["python"]);
        assert_eq!(analysis.ats_score.breakdown.skills_alignment, 50.0);
        assert_eq!(analysis.suggestions, vec!["terraform (consider related terms)"]);
        assert_eq!(analysis.weighted_shares.len(), 4);
    }

    #[test]
    fn test_from_parts_rejects_blank_documents() {
        let engine = ScoreEngine::with_defaults().unwrap();
        let fallback = || SkillList::fallback(&Config::default().scoring.default_skills);

        let blank_resume = AtsAnalysis::from_parts(&engine, "   \n", &job(), vec![], fallback());
        assert!(matches!(blank_resume, Err(AtsScorerError::MissingInput(_))));

        let blank_job = AtsAnalysis::from_parts(&engine, &resume(), "\t", vec![], fallback());
        assert!(matches!(blank_job, Err(AtsScorerError::MissingInput(_))));
    }

    #[test]
    fn test_ensure_documents() {
        assert!(ensure_documents(&resume(), &job()).is_ok());
        assert!(matches!(
            ensure_documents("", &job()),
            Err(AtsScorerError::MissingInput(msg)) if msg.contains("resume")
        ));
        assert!(matches!(
            ensure_documents(&resume(), " "),
            Err(AtsScorerError::MissingInput(msg)) if msg.contains("job description")
        ));
    }
}
