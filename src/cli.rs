//! CLI interface for the ATS scorer

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ats-scorer")]
#[command(about = "Score a resume against a job description the way an applicant tracking system would")]
#[command(long_about = "Evaluate resume/job-description fit with a generative language service, a weighted four-dimension ATS score, keyword suggestions and a TF-IDF similarity check")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Full evaluation using the generative service
    Analyze {
        /// Path to resume file (PDF, TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,

        /// Path to job description file (TXT, MD, PDF)
        #[arg(short, long)]
        job: PathBuf,

        /// Output format: console, json, markdown, html
        #[arg(short, long)]
        output: Option<String>,

        /// Save the formatted report to this file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Also write the JD-match summary as a PDF
        #[arg(long)]
        pdf_report: Option<PathBuf>,

        /// Skip the resume tips request
        #[arg(long)]
        no_tips: bool,
    },

    /// Offline score from keywords and skills you already have
    Score {
        /// Path to resume file (PDF, TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,

        /// Path to job description file (TXT, MD, PDF)
        #[arg(short, long)]
        job: PathBuf,

        /// Missing keyword (repeatable)
        #[arg(short, long = "missing")]
        missing: Vec<String>,

        /// File holding a skills-extraction response (JSON list of strings)
        #[arg(long)]
        skills_response: Option<PathBuf>,

        /// Output format: console, json, markdown, html
        #[arg(short, long)]
        output: Option<String>,

        /// Save the formatted report to this file
        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// TF-IDF cosine similarity between resume and job description
    Similarity {
        /// Path to resume file (PDF, TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,

        /// Path to job description file (TXT, MD, PDF)
        #[arg(short, long)]
        job: PathBuf,
    },

    /// Show or manage configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file path
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<crate::config::OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(crate::config::OutputFormat::Console),
        "json" => Ok(crate::config::OutputFormat::Json),
        "markdown" | "md" => Ok(crate::config::OutputFormat::Markdown),
        "html" => Ok(crate::config::OutputFormat::Html),
        _ => Err(format!("Invalid output format: {}. Supported: console, json, markdown, html", format)),
    }
}
