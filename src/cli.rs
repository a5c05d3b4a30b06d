//! CLI interface for the curriculum aligner

use crate::config::{OutputFormat, ProviderKind, RecommenderKind};
use crate::error::Result;
use crate::processing::gap_analyzer::ThresholdConfig;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "curriculum-aligner")]
#[command(about = "Curriculum-to-market skill gap analysis tool")]
#[command(long_about = "Compare a course's learning outcomes with job postings and academic standards, rank the skill gaps and suggest course enhancements")]
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
    /// Analyze a course against market and standards demand
    Analyze {
        /// Course name from the outcomes dataset
        #[arg(long, conflicts_with_all = ["outcome", "outcome_file"])]
        course: Option<String>,

        /// Custom learning outcome text
        #[arg(long, conflicts_with = "outcome_file")]
        outcome: Option<String>,

        /// File holding a custom learning outcome (TXT, MD, PDF)
        #[arg(long)]
        outcome_file: Option<PathBuf>,

        /// Restrict the analysis to a skill category (repeatable)
        #[arg(long = "category")]
        categories: Vec<String>,

        /// Minimum job score for a skill to count as in demand
        #[arg(long, value_parser = parse_unit_interval)]
        job_threshold: Option<f32>,

        /// Course score at which a skill counts as covered
        #[arg(long, value_parser = parse_unit_interval)]
        course_threshold: Option<f32>,

        /// Minimum overall gap for a skill to be reported
        #[arg(long, value_parser = parse_unit_interval)]
        gap_threshold: Option<f32>,

        /// Score provider: static, computed
        #[arg(long, value_parser = parse_provider)]
        provider: Option<ProviderKind>,

        /// Request course enhancement recommendations
        #[arg(short, long)]
        recommend: bool,

        /// Recommendation backend: local, simulated, remote
        #[arg(long, value_parser = parse_recommender)]
        recommender: Option<RecommenderKind>,

        /// Output format: console, json, markdown, html
        #[arg(short, long, value_parser = parse_output_format)]
        output: Option<OutputFormat>,

        /// Save output to file (a directory gets a suggested file name)
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Output detailed analysis
        #[arg(short, long)]
        detailed: bool,

        /// Show the recommendation request trace
        #[arg(long)]
        trace: bool,
    },

    /// List available course names
    Courses,

    /// List the skill catalog grouped by category
    Skills,

    /// Embedding model management commands
    Models {
        #[command(subcommand)]
        action: ModelAction,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ModelAction {
    /// List available embedding models
    List,

    /// Download an embedding model
    Download {
        /// Model id, name or HuggingFace repo ID
        model: String,
    },

    /// Show model information
    Info {
        /// Model id, name or HuggingFace repo ID
        model: String,
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

pub fn parse_output_format(format: &str) -> std::result::Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        "html" => Ok(OutputFormat::Html),
        _ => Err(format!("Invalid output format: {}. Supported: console, json, markdown, html", format)),
    }
}

pub fn parse_provider(kind: &str) -> std::result::Result<ProviderKind, String> {
    match kind.to_lowercase().as_str() {
        "static" => Ok(ProviderKind::Static),
        "computed" | "embeddings" => Ok(ProviderKind::Computed),
        _ => Err(format!("Invalid provider: {}. Supported: static, computed", kind)),
    }
}

pub fn parse_recommender(kind: &str) -> std::result::Result<RecommenderKind, String> {
    match kind.to_lowercase().as_str() {
        "local" => Ok(RecommenderKind::Local),
        "simulated" => Ok(RecommenderKind::Simulated),
        "remote" => Ok(RecommenderKind::Remote),
        _ => Err(format!("Invalid recommender: {}. Supported: local, simulated, remote", kind)),
    }
}

pub fn parse_unit_interval(value: &str) -> std::result::Result<f32, String> {
    let parsed: f32 = value
        .parse()
        .map_err(|_| format!("'{}' is not a number", value))?;
    if (0.0..=1.0).contains(&parsed) {
        Ok(parsed)
    } else {
        Err(format!("{} is outside [0, 1]", parsed))
    }
}

/// Apply command-line overrides on top of the configured thresholds
pub fn resolve_thresholds(
    base: ThresholdConfig,
    job: Option<f32>,
    course: Option<f32>,
    gap: Option<f32>,
) -> Result<ThresholdConfig> {
    ThresholdConfig::new(
        job.unwrap_or(base.job_relevance_threshold),
        course.unwrap_or(base.course_coverage_threshold),
        gap.unwrap_or(base.gap_severity_threshold),
    )
}

/// Trimmed outcome text, or `None` when it is blank
pub fn non_blank_outcome(outcome: Option<String>) -> Option<String> {
    outcome
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> std::result::Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}
