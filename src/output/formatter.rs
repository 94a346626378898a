//! Output formatters: console, JSON, Markdown and HTML

use crate::config::OutputFormat;
use crate::error::{AtsScorerError, Result};
use crate::output::report::{score_label, AnalysisReport};
use crate::scoring::engine::Dimension;
use crate::scoring::weights::ScoringWeights;
use askama::Template;
use colored::{Color, Colorize};
use std::path::Path;

/// Trait for formatting analysis reports
pub trait OutputFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with colors and text bar charts
pub struct ConsoleFormatter {
    use_colors: bool,
    weights: ScoringWeights,
}

/// JSON formatter for API integration and structured data
pub struct JsonFormatter {
    pretty: bool,
}

/// Markdown formatter for documentation and reports
pub struct MarkdownFormatter {
    include_metadata: bool,
    weights: ScoringWeights,
}

/// HTML formatter with embedded styling
pub struct HtmlFormatter {
    include_styles: bool,
    weights: ScoringWeights,
}

/// Report generator that coordinates different formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
    html_formatter: HtmlFormatter,
}

const BAR_WIDTH: usize = 20;

fn bar(score: f64) -> String {
    let filled = ((score.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

fn weight_percent(dimension: Dimension, weights: &ScoringWeights) -> f64 {
    dimension.weight(weights) * 100.0
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, weights: ScoringWeights) -> Self {
        Self { use_colors, weights }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_score_badge(&self, score: f64) -> String {
        let label = score_label(score).to_uppercase();
        let color = match score {
            s if s >= 80.0 => Color::Green,
            s if s >= 60.0 => Color::Yellow,
            _ => Color::Red,
        };

        if self.use_colors {
            format!("[{}]", label.color(color).bold())
        } else {
            format!("[{}]", label)
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let analysis = &report.analysis;
        let mut output = String::new();

        output.push_str(&self.format_header("ATS SCORE ANALYSIS", 1));
        output.push_str(&format!(
            "Generated: {} | Processing time: {}ms\n",
            report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            analysis.processing_time_ms
        ));

        output.push_str(&self.format_header("Overall ATS Score", 2));
        output.push_str(&format!(
            "Overall ATS Score: {:.2}% {}\n",
            analysis.ats_score.composite,
            self.format_score_badge(analysis.ats_score.composite)
        ));
        if let Some(jd_match) = &analysis.jd_match {
            output.push_str(&format!("JD Match: {}%\n", jd_match.match_percent));
        }
        output.push_str(&format!("TF-IDF Similarity: {:.1}%\n", analysis.tfidf_similarity));

        if let Some(jd_match) = &analysis.jd_match {
            output.push_str(&self.format_header("JD Match Breakdown", 3));
            for (label, percent) in jd_match.breakdown() {
                output.push_str(&format!(
                    "  {:<17} {:>6.2}%  {}\n",
                    label,
                    percent,
                    self.colorize(&bar(percent), Color::Blue)
                ));
            }
        }

        output.push_str(&self.format_header("Score Breakdown", 3));
        for (dimension, score) in analysis.ats_score.breakdown.entries() {
            output.push_str(&format!(
                "  {:<17} {:>6.2}%  {}  (weight {:.0}%)\n",
                dimension.label(),
                score,
                self.colorize(&bar(score), Color::Cyan),
                weight_percent(dimension, &self.weights)
            ));
        }

        output.push_str(&self.format_header("Weighted Contribution", 3));
        for (dimension, share) in &analysis.weighted_shares {
            output.push_str(&format!(
                "  {:<17} {:>6.2}%  {}\n",
                dimension.label(),
                share,
                self.colorize(&bar(*share), Color::Magenta)
            ));
        }

        output.push_str(&self.format_header(
            &format!("Skills ({} list)", analysis.skills.source),
            3,
        ));
        for skill in &analysis.skills.skills {
            let found = analysis.matched_skills.contains(skill);
            let mark = if found {
                self.colorize("✓", Color::Green)
            } else {
                self.colorize("✗", Color::Red)
            };
            output.push_str(&format!("  {} {}\n", mark, skill));
        }

        if !analysis.suggestions.is_empty() {
            output.push_str(&self.format_header("Keyword Suggestions", 3));
            for suggestion in &analysis.suggestions {
                output.push_str(&format!("  • {}\n", suggestion));
            }
        }

        if !analysis.keyword_frequencies.is_empty() {
            output.push_str(&self.format_header("Missing Keyword Cloud", 3));
            let cloud: Vec<String> = analysis
                .keyword_frequencies
                .iter()
                .map(|(word, count)| format!("{}×{}", word, count))
                .collect();
            output.push_str(&format!("  {}\n", cloud.join("  ")));
        }

        if let Some(jd_match) = &analysis.jd_match {
            if !jd_match.profile_summary.is_empty() {
                output.push_str(&self.format_header("Profile Summary", 3));
                output.push_str(&format!("{}\n", jd_match.profile_summary));
            }
        }

        if let Some(tips) = &analysis.tips {
            output.push_str(&self.format_header("Resume Tips", 3));
            output.push_str(&format!("{}\n", tips.trim()));
        }

        output.push_str(&self.format_header("Understanding the Scores", 3));
        for dimension in Dimension::ALL {
            output.push_str(&format!("  {}: {}\n", dimension.label(), dimension.description()));
        }

        if !analysis.warnings.is_empty() {
            output.push_str(&self.format_header("Warnings", 3));
            for warning in &analysis.warnings {
                output.push_str(&format!("  ⚠️  {}\n", self.colorize(warning, Color::Yellow)));
            }
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool, weights: ScoringWeights) -> Self {
        Self {
            include_metadata,
            weights,
        }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let analysis = &report.analysis;
        let mut md = String::new();

        md.push_str("# Resume Analysis Report\n\n");
        md.push_str(&format!(
            "**Overall ATS Score:** {:.2}% ({})\n\n",
            analysis.ats_score.composite,
            report.verdict()
        ));
        if let Some(jd_match) = &analysis.jd_match {
            md.push_str(&format!("**JD Match:** {}%\n\n", jd_match.match_percent));
        }
        md.push_str(&format!("**TF-IDF Similarity:** {:.1}%\n\n", analysis.tfidf_similarity));

        if let Some(jd_match) = &analysis.jd_match {
            md.push_str("## JD Match Breakdown\n\n");
            md.push_str("| Part | Share |\n");
            md.push_str("|------|------:|\n");
            for (label, percent) in jd_match.breakdown() {
                md.push_str(&format!("| {} | {:.0}% |\n", label, percent));
            }
            md.push('\n');
        }

        md.push_str("## Score Breakdown\n\n");
        md.push_str("| Dimension | Score | Weight | Share of total |\n");
        md.push_str("|-----------|------:|-------:|---------------:|\n");
        for ((dimension, score), (_, share)) in analysis
            .ats_score
            .breakdown
            .entries()
            .iter()
            .zip(analysis.weighted_shares.iter())
        {
            md.push_str(&format!(
                "| {} | {:.2}% | {:.0}% | {:.2}% |\n",
                dimension.label(),
                score,
                weight_percent(*dimension, &self.weights),
                share
            ));
        }
        md.push('\n');

        md.push_str(&format!("## Skills ({} list)\n\n", analysis.skills.source));
        for skill in &analysis.skills.skills {
            let checked = if analysis.matched_skills.contains(skill) { "x" } else { " " };
            md.push_str(&format!("- [{}] {}\n", checked, skill));
        }
        md.push('\n');

        if !analysis.missing_keywords.is_empty() {
            md.push_str("## Missing Keywords\n\n");
            for keyword in &analysis.missing_keywords {
                md.push_str(&format!("- {}\n", keyword));
            }
            md.push('\n');

            md.push_str("## Keyword Suggestions\n\n");
            for suggestion in &analysis.suggestions {
                md.push_str(&format!("- {}\n", suggestion));
            }
            md.push('\n');
        }

        if let Some(jd_match) = &analysis.jd_match {
            md.push_str("## Profile Summary\n\n");
            md.push_str(&format!("{}\n\n", jd_match.profile_summary));
        }

        if let Some(tips) = &analysis.tips {
            md.push_str("## Resume Tips\n\n");
            md.push_str(&format!("{}\n\n", tips.trim()));
        }

        md.push_str("## Understanding the Scores\n\n");
        for dimension in Dimension::ALL {
            md.push_str(&format!("**{}:** {}\n\n", dimension.label(), dimension.description()));
        }

        if !analysis.warnings.is_empty() {
            md.push_str("## Warnings\n\n");
            for warning in &analysis.warnings {
                md.push_str(&format!("> ⚠️ {}\n", warning));
            }
            md.push('\n');
        }

        if self.include_metadata {
            md.push_str("---\n\n");
            md.push_str(&format!(
                "*Generated {} by ats-scorer v{} | resume: `{}` | job: `{}` | model: {}*\n",
                report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                report.metadata.scorer_version,
                report.metadata.resume_file,
                report.metadata.job_file,
                report.metadata.model.as_deref().unwrap_or("none")
            ));
        }

        Ok(md)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

#[derive(Debug, Clone)]
struct HtmlDimension {
    label: String,
    description: String,
    score: String,
    weight: String,
    share: String,
}

#[derive(Debug, Clone)]
struct HtmlShare {
    label: String,
    percent: String,
}

#[derive(Debug, Clone)]
struct HtmlSkill {
    name: String,
    class: &'static str,
    mark: &'static str,
}

/// Askama template for HTML output
#[derive(Template)]
#[template(
    ext = "html",
    source = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Resume Analysis Report</title>
    {% if include_styles %}
    <style>
        body { font-family: -apple-system, 'Segoe UI', Roboto, sans-serif; max-width: 860px; margin: 0 auto; padding: 20px; color: #333; }
        h1 { border-bottom: 3px solid #4C4C6D; padding-bottom: 10px; }
        .score { font-size: 2em; font-weight: bold; }
        table { border-collapse: collapse; width: 100%; }
        th, td { padding: 6px 10px; border-bottom: 1px solid #e9ecef; text-align: left; }
        .bar { background: #e9ecef; height: 10px; border-radius: 5px; }
        .bar > div { background: #6A5ACD; height: 10px; border-radius: 5px; }
        .matched { color: #28a745; }
        .missing { color: #dc3545; }
        .warning { background: #fff3cd; padding: 8px; border-radius: 4px; }
    </style>
    {% endif %}
</head>
<body>
    <h1>Resume Analysis Report</h1>
    <p class="score">Overall ATS Score: {{ overall_score }}% ({{ verdict }})</p>
    {% if has_jd_match %}<p>JD Match: {{ jd_match }}%</p>{% endif %}
    <p>TF-IDF Similarity: {{ similarity }}%</p>

    {% if has_jd_match %}
    <h2>JD Match Breakdown</h2>
    <table>
        {% for part in jd_breakdown %}
        <tr><td>{{ part.label }}</td><td>{{ part.percent }}%</td>
            <td style="width: 60%"><div class="bar"><div style="width: {{ part.percent }}%"></div></div></td></tr>
        {% endfor %}
    </table>
    {% endif %}

    <h2>Score Breakdown</h2>
    <table>
        <tr><th>Dimension</th><th>Score</th><th>Weight</th><th>Share of total</th><th></th></tr>
        {% for d in dimensions %}
        <tr><td>{{ d.label }}</td><td>{{ d.score }}%</td><td>{{ d.weight }}%</td><td>{{ d.share }}%</td>
            <td style="width: 30%"><div class="bar"><div style="width: {{ d.score }}%"></div></div></td></tr>
        {% endfor %}
    </table>

    <h2>Skills ({{ skill_source }} list)</h2>
    <ul>
        {% for s in skills %}
        <li class="{{ s.class }}">{{ s.mark|safe }} {{ s.name }}</li>
        {% endfor %}
    </ul>

    {% if has_suggestions %}
    <h2>Keyword Suggestions</h2>
    <ul>
        {% for suggestion in suggestions %}<li>{{ suggestion }}</li>{% endfor %}
    </ul>
    {% endif %}

    {% if has_profile_summary %}
    <h2>Profile Summary</h2>
    <p>{{ profile_summary }}</p>
    {% endif %}

    {% if has_tips %}
    <h2>Resume Tips</h2>
    <pre>{{ tips }}</pre>
    {% endif %}

    <h2>Understanding the Scores</h2>
    <dl>
        {% for d in dimensions %}<dt>{{ d.label }}</dt><dd>{{ d.description }}</dd>{% endfor %}
    </dl>

    {% for warning in warnings %}<p class="warning">{{ warning }}</p>{% endfor %}

    <footer><small>Generated {{ generated_at }} by ats-scorer v{{ version }}</small></footer>
</body>
</html>"#
)]
struct HtmlTemplate {
    include_styles: bool,
    overall_score: String,
    verdict: String,
    has_jd_match: bool,
    jd_match: u8,
    jd_breakdown: Vec<HtmlShare>,
    similarity: String,
    dimensions: Vec<HtmlDimension>,
    skill_source: String,
    skills: Vec<HtmlSkill>,
    has_suggestions: bool,
    suggestions: Vec<String>,
    has_profile_summary: bool,
    profile_summary: String,
    has_tips: bool,
    tips: String,
    warnings: Vec<String>,
    generated_at: String,
    version: String,
}

impl HtmlFormatter {
    pub fn new(include_styles: bool, weights: ScoringWeights) -> Self {
        Self {
            include_styles,
            weights,
        }
    }

    fn create_template_data(&self, report: &AnalysisReport) -> HtmlTemplate {
        let analysis = &report.analysis;

        let dimensions = analysis
            .ats_score
            .breakdown
            .entries()
            .iter()
            .zip(analysis.weighted_shares.iter())
            .map(|((dimension, score), (_, share))| HtmlDimension {
                label: dimension.label().to_string(),
                description: dimension.description().to_string(),
                score: format!("{:.2}", score.clamp(0.0, 100.0)),
                weight: format!("{:.0}", weight_percent(*dimension, &self.weights)),
                share: format!("{:.2}", share),
            })
            .collect();

        let skills = analysis
            .skills
            .skills
            .iter()
            .map(|skill| {
                let (class, mark) = if analysis.matched_skills.contains(skill) {
                    ("matched", "&#10003;")
                } else {
                    ("missing", "&#10007;")
                };
                HtmlSkill {
                    name: skill.clone(),
                    class,
                    mark,
                }
            })
            .collect();

        let jd_breakdown = analysis
            .jd_match
            .iter()
            .flat_map(|m| m.breakdown())
            .map(|(label, percent)| HtmlShare {
                label: label.to_string(),
                percent: format!("{:.0}", percent),
            })
            .collect();

        let profile_summary = analysis
            .jd_match
            .as_ref()
            .map(|m| m.profile_summary.clone())
            .unwrap_or_default();

        HtmlTemplate {
            include_styles: self.include_styles,
            overall_score: format!("{:.2}", analysis.ats_score.composite),
            verdict: report.verdict().to_string(),
            has_jd_match: analysis.jd_match.is_some(),
            jd_match: analysis.jd_match.as_ref().map(|m| m.match_percent).unwrap_or(0),
            jd_breakdown,
            similarity: format!("{:.1}", analysis.tfidf_similarity),
            dimensions,
            skill_source: analysis.skills.source.to_string(),
            skills,
            has_suggestions: !analysis.suggestions.is_empty(),
            suggestions: analysis.suggestions.clone(),
            has_profile_summary: !profile_summary.is_empty(),
            profile_summary,
            has_tips: analysis.tips.is_some(),
            tips: analysis.tips.clone().unwrap_or_default(),
            warnings: analysis.warnings.clone(),
            generated_at: report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            version: report.metadata.scorer_version.clone(),
        }
    }
}

impl OutputFormatter for HtmlFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        self.create_template_data(report)
            .render()
            .map_err(|e| AtsScorerError::OutputFormatting(format!("Failed to render HTML: {}", e)))
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Html
    }
}

impl ReportGenerator {
    pub fn new(weights: ScoringWeights) -> Self {
        Self::with_options(weights, true, true, true, true)
    }

    pub fn with_options(
        weights: ScoringWeights,
        use_colors: bool,
        pretty_json: bool,
        include_metadata: bool,
        include_html_styles: bool,
    ) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, weights),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata, weights),
            html_formatter: HtmlFormatter::new(include_html_styles, weights),
        }
    }

    pub fn generate_report(&self, report: &AnalysisReport, format: &OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
            OutputFormat::Html => self.html_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new(ScoringWeights::default())
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}

pub fn suggest_filename(format: &OutputFormat, resume_name: &str, timestamp: bool) -> String {
    let base_name = Path::new(resume_name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    let extension = match format {
        OutputFormat::Console => "txt",
        OutputFormat::Json => "json",
        OutputFormat::Markdown => "md",
        OutputFormat::Html => "html",
    };

    format!("{}_ats{}.{}", base_name, timestamp_suffix, extension)
}
