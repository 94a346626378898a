//! ATS scorer: rate a resume against a job description

use ats_scorer::cli::{self, Cli, Commands, ConfigAction};
use ats_scorer::config::{Config, OutputFormat};
use ats_scorer::error::{AtsScorerError, Result};
use ats_scorer::input::file_detector::FileType;
use ats_scorer::input::InputManager;
use ats_scorer::llm::analyzer::{ensure_documents, SKILLS_FALLBACK_WARNING};
use ats_scorer::llm::parser::parse_skill_list;
use ats_scorer::llm::{AtsAnalysis, AtsAnalyzer, GeminiClient};
use ats_scorer::output::formatter::{save_report_to_file, suggest_filename, ReportGenerator};
use ats_scorer::output::{AnalysisReport, PdfReportWriter, ReportMetadata};
use ats_scorer::scoring::similarity::TfIdfSimilarity;
use ats_scorer::scoring::{ScoreEngine, SkillList};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

const DOCUMENT_TYPES: &[FileType] = &[FileType::Pdf, FileType::Text, FileType::Markdown];

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, cli.config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config, config_file: Option<PathBuf>) -> Result<()> {
    match command {
        Commands::Analyze {
            resume,
            job,
            output,
            save,
            pdf_report,
            no_tips,
        } => {
            let format = resolve_format(output.as_deref(), &config)?;
            let (resume_text, job_text) = read_documents(&resume, &job).await?;
            ensure_documents(&resume_text, &job_text)?;

            let client = GeminiClient::new(&config.service, config.api_key()?)?;
            let model = client.model().to_string();
            let analyzer = AtsAnalyzer::new(client, &config)?
                .with_tips(config.output.include_tips && !no_tips);

            let spinner = spinner(&format!("Evaluating resume with {}...", model));
            let result = analyzer.analyze(&resume_text, &job_text).await;
            spinner.finish_and_clear();
            let analysis = result?;

            if let (Some(path), Some(jd_match)) = (&pdf_report, &analysis.jd_match) {
                PdfReportWriter::new().write_to_file(jd_match, path)?;
                println!("📄 PDF report written to {}", path.display());
            }

            let report = AnalysisReport::new(analysis, ReportMetadata::new(display(&resume), display(&job), Some(model)));
            emit(&report, &format, &config, save.as_deref(), &resume)?;
        }

        Commands::Score {
            resume,
            job,
            missing,
            skills_response,
            output,
            save,
        } => {
            let format = resolve_format(output.as_deref(), &config)?;
            let (resume_text, job_text) = read_documents(&resume, &job).await?;
            let engine = ScoreEngine::new(config.scoring.clone())?;

            let mut warnings = Vec::new();
            let skills = match skills_response {
                Some(path) => {
                    let response = tokio::fs::read_to_string(&path).await?;
                    match parse_skill_list(&response) {
                        Ok(skills) => SkillList::extracted(skills),
                        Err(e) => {
                            warn!("Unusable skills response in {}: {}", path.display(), e);
                            warnings.push(SKILLS_FALLBACK_WARNING.to_string());
                            SkillList::fallback(&config.scoring.default_skills)
                        }
                    }
                }
                None => SkillList::fallback(&config.scoring.default_skills),
            };

            let mut analysis = AtsAnalysis::from_parts(&engine, &resume_text, &job_text, missing, skills)?;
            analysis.warnings = warnings;
            info!("Overall ATS score: {:.2}%", analysis.ats_score.composite);

            let report = AnalysisReport::new(analysis, ReportMetadata::new(display(&resume), display(&job), None));
            emit(&report, &format, &config, save.as_deref(), &resume)?;
        }

        Commands::Similarity { resume, job } => {
            let (resume_text, job_text) = read_documents(&resume, &job).await?;
            let similarity = TfIdfSimilarity::new().similarity(&job_text, &resume_text);
            println!("📈 TF-IDF cosine similarity: {:.2}%", similarity);
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                println!("⚙️  Current Configuration\n");
                println!("Service endpoint: {}", config.service.endpoint);
                println!("Model: {}", config.service.model);
                println!("API key variable: {}", config.service.api_key_env);
                println!("Timeout: {}s, retries: {}", config.service.timeout_secs, config.service.max_retries);
                println!("\nScoring Weights:");
                println!("  Keyword Match: {:.1}%", config.scoring.weights.keyword_match * 100.0);
                println!("  Skills Alignment: {:.1}%", config.scoring.weights.skills_alignment * 100.0);
                println!("  Formatting: {:.1}%", config.scoring.weights.formatting * 100.0);
                println!("  Profile Strength: {:.1}%", config.scoring.weights.profile_strength * 100.0);
                println!("\nDefault skills: {}", config.scoring.default_skills.join(", "));
                println!("Forbidden formatting terms: {}", config.scoring.forbidden_terms.join(", "));
            }

            Some(ConfigAction::Reset) => {
                println!("🔄 Resetting configuration to defaults...");
                let default_config = Config::default();
                match &config_file {
                    Some(path) => default_config.save_to(path)?,
                    None => default_config.save()?,
                }
                println!("✅ Configuration reset successfully!");
            }

            Some(ConfigAction::Path) => {
                let path = config_file.unwrap_or_else(Config::config_path);
                println!("{}", path.display());
            }
        },
    }

    Ok(())
}

fn resolve_format(output: Option<&str>, config: &Config) -> Result<OutputFormat> {
    match output {
        Some(format) => cli::parse_output_format(format).map_err(AtsScorerError::InvalidInput),
        None => Ok(config.output.format),
    }
}

async fn read_documents(resume: &Path, job: &Path) -> Result<(String, String)> {
    let mut input_manager = InputManager::new();

    info!("Reading resume: {}", resume.display());
    let resume_text = input_manager.extract_text_as(resume, DOCUMENT_TYPES).await?;

    info!("Reading job description: {}", job.display());
    let job_text = input_manager.extract_text_as(job, DOCUMENT_TYPES).await?;

    Ok((resume_text, job_text))
}

fn emit(
    report: &AnalysisReport,
    format: &OutputFormat,
    config: &Config,
    save: Option<&Path>,
    resume: &Path,
) -> Result<()> {
    let generator = ReportGenerator::with_options(config.scoring.weights, config.output.color_output, true, true, true);
    let content = generator.generate_report(report, format)?;
    println!("{}", content);

    if let Some(path) = save {
        // saved copies never carry terminal colour codes
        let content = if *format == OutputFormat::Console && config.output.color_output {
            ReportGenerator::with_options(config.scoring.weights, false, true, true, true)
                .generate_report(report, format)?
        } else {
            content
        };
        let path = if path.is_dir() {
            path.join(suggest_filename(format, &display(resume), true))
        } else {
            path.to_path_buf()
        };
        save_report_to_file(&content, &path)?;
        println!("💾 Report saved to {}", path.display());
    }

    Ok(())
}

fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

fn display(path: &Path) -> String {
    path.display().to_string()
}
