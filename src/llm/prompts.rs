//! Prompt templates for the generative service

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct PromptTemplates {
    pub jd_match: String,
    pub skills_extraction: String,
    pub resume_tips: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            jd_match: JD_MATCH_TEMPLATE.to_string(),
            skills_extraction: SKILLS_EXTRACTION_TEMPLATE.to_string(),
            resume_tips: RESUME_TIPS_TEMPLATE.to_string(),
        }
    }
}

/// Parameters for prompt template substitution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptParams {
    pub resume_content: String,
    pub job_content: String,
}

impl PromptTemplates {
    pub fn render_jd_match(&self, params: &PromptParams) -> String {
        render(&self.jd_match, params)
    }

    pub fn render_skills_extraction(&self, params: &PromptParams) -> String {
        render(&self.skills_extraction, params)
    }

    pub fn render_resume_tips(&self, params: &PromptParams) -> String {
        render(&self.resume_tips, params)
    }
}

/// Single-pass substitution of `{resume}` and `{job}`.
///
/// Placeholders that appear inside the substituted documents are left alone.
fn render(template: &str, params: &PromptParams) -> String {
    let mut output = String::with_capacity(
        template.len() + params.resume_content.len() + params.job_content.len(),
    );
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        output.push_str(&rest[..start]);
        let tail = &rest[start..];

        if let Some(after) = tail.strip_prefix("{resume}") {
            output.push_str(&params.resume_content);
            rest = after;
        } else if let Some(after) = tail.strip_prefix("{job}") {
            output.push_str(&params.job_content);
            rest = after;
        } else {
            output.push('{');
            rest = &tail[1..];
        }
    }

    output.push_str(rest);
    output
}

const JD_MATCH_TEMPLATE: &str = r#"Act as an experienced Applicant Tracking System (ATS) with a deep understanding of software engineering, data science, data analysis and big data engineering.
Evaluate the resume against the job description. The job market is very competitive, so give the best possible assistance for improving the resume.
Assign a percentage match against the job description and list the keywords from the job description that are missing from the resume.

<RESUME>
{resume}
</RESUME>

<JOB DESCRIPTION>
{job}
</JOB DESCRIPTION>

Respond with a single JSON object and nothing else, using exactly these keys:
{"JD Match": "<integer 0-100>%", "MissingKeywords": ["<keyword>", ...], "Profile Summary": "<summary>"}"#;

const SKILLS_EXTRACTION_TEMPLATE: &str = r#"Extract the list of required skills from the following job description.

<JOB DESCRIPTION>
{job}
</JOB DESCRIPTION>

Respond with a single JSON array of strings and nothing else, for example:
["skill1", "skill2", "skill3"]"#;

const RESUME_TIPS_TEMPLATE: &str = r#"Act as a resume improvement expert. Based on the resume and job description below, suggest 3 to 5 tips to improve the resume for better ATS compatibility.

<RESUME>
{resume}
</RESUME>

<JOB DESCRIPTION>
{job}
</JOB DESCRIPTION>

Provide the response as a bullet-point list."#;
