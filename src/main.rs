//! Curriculum aligner: course-to-market skill gap analysis tool

use clap::Parser;
use curriculum_aligner::catalog::SkillCatalog;
use curriculum_aligner::cli::{self, Cli, Commands, ConfigAction, ModelAction};
use curriculum_aligner::config::{Config, OutputFormat};
use curriculum_aligner::context::AppContext;
use curriculum_aligner::error::{AlignerError, Result};
use curriculum_aligner::input::InputManager;
use curriculum_aligner::output::{save_report_to_file, suggest_filename, ReportGenerator};
use curriculum_aligner::processing::analyzer::AnalysisRequest;
use curriculum_aligner::processing::embedding_manager::EmbeddingModelManager;
use curriculum_aligner::processing::similarity::CourseQuery;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use std::path::PathBuf;
use std::process;
use std::time::Duration;

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

async fn run_command(command: Commands, mut config: Config, config_path: Option<PathBuf>) -> Result<()> {
    match command {
        Commands::Analyze {
            course,
            outcome,
            outcome_file,
            categories,
            job_threshold,
            course_threshold,
            gap_threshold,
            provider,
            recommend,
            recommender,
            output,
            save,
            detailed,
            trace,
        } => {
            info!("Starting curriculum alignment analysis");

            let thresholds = cli::resolve_thresholds(
                config.thresholds,
                job_threshold,
                course_threshold,
                gap_threshold,
            )?;
            if let Some(kind) = provider {
                config.provider.kind = kind;
            }
            if let Some(kind) = recommender {
                config.recommender.kind = kind;
            }
            let output_format = output.unwrap_or(config.output.format);
            let detailed = detailed || config.output.detailed;
            let show_trace = trace || config.output.show_trace;
            let use_colors = config.output.color_output && save.is_none();

            let query = match (course, cli::non_blank_outcome(outcome), outcome_file) {
                (Some(name), _, _) => CourseQuery::Named(name),
                (None, Some(text), _) => CourseQuery::Custom { outcome: text },
                (None, None, Some(path)) => {
                    cli::validate_file_extension(&path, &["txt", "md", "pdf"])
                        .map_err(|e| AlignerError::InvalidInput(format!("Outcome file: {}", e)))?;
                    println!("📄 Reading learning outcome from {}", path.display());
                    let mut input_manager = InputManager::new();
                    CourseQuery::Custom {
                        outcome: input_manager.read_outcome(&path).await?,
                    }
                }
                (None, None, None) => CourseQuery::Named(config.provider.default_course.clone()),
            };

            if output_format == OutputFormat::Console {
                println!("🚀 Curriculum alignment analysis");
                println!("📚 Course: {}", query.display_name());
                println!("🧠 Score provider: {:?}", config.provider.kind);
                println!(
                    "🎚️  Thresholds: job {:.2} | course {:.2} | gap {:.2}",
                    thresholds.job_relevance_threshold,
                    thresholds.course_coverage_threshold,
                    thresholds.gap_severity_threshold
                );
            }

            let context = AppContext::build(config).await?;
            let report = context.analyze(&AnalysisRequest {
                query,
                categories,
                thresholds,
            })?;

            let recommendations = if recommend {
                let spinner = ProgressBar::new_spinner();
                spinner.set_style(
                    ProgressStyle::default_spinner()
                        .template("{spinner:.green} {msg}")
                        .unwrap_or_else(|_| ProgressStyle::default_spinner()),
                );
                spinner.set_message(format!(
                    "Requesting recommendations ({:?})...",
                    context.recommender.kind()
                ));
                spinner.enable_steady_tick(Duration::from_millis(100));
                let set = context.recommend(&report).await;
                spinner.finish_and_clear();
                Some(set)
            } else {
                None
            };

            let dashboard = context.dashboard(report, recommendations);
            let generator = ReportGenerator::with_options(use_colors, detailed, show_trace);
            let rendered = generator.generate_report(&dashboard, output_format)?;

            match save {
                Some(path) => {
                    let path = if path.is_dir() {
                        path.join(suggest_filename(output_format, &dashboard.summary.course_name, true))
                    } else {
                        path
                    };
                    save_report_to_file(&rendered, &path)?;
                    println!("💾 Report saved to {}", path.display());
                }
                None => println!("{}", rendered),
            }
        }

        Commands::Courses => {
            let context = AppContext::build(config).await?;
            println!("📚 Available Courses\n");
            for name in context.course_names() {
                println!("  • {}", name);
            }
            if context.datasets.origin.courses_mocked {
                println!("\n⚠️  Course dataset unavailable; sample courses shown");
            }
        }

        Commands::Skills => {
            let catalog = match &config.data.catalog_path {
                Some(path) => SkillCatalog::from_file(path)?,
                None => SkillCatalog::default(),
            };
            println!("🧩 Skill Catalog ({} skills)\n", catalog.len());
            for category in catalog.categories() {
                println!("{}:", category);
                for skill in catalog.skills_in_category(&category) {
                    println!("  • {}", skill.name);
                }
            }
        }

        Commands::Models { action } => {
            let mut model_manager = EmbeddingModelManager::new(config.models_dir().clone()).await?;

            match action {
                ModelAction::List => {
                    println!("📚 Available Embedding Models\n");
                    for model in model_manager.list_available_models() {
                        let status = if model_manager.is_model_downloaded(&model.id) {
                            "✅ Downloaded"
                        } else {
                            "⬇️  Available"
                        };
                        println!(
                            "  • {} ({}) - {} MB, {} dims [{}]",
                            model.id, model.repo_id, model.size_mb, model.dimensions, status
                        );
                        println!("    {}", model.description);
                    }
                    println!("\n💡 Configured model: {}", config.provider.embedding_model);
                }

                ModelAction::Download { model } => {
                    let model_id = model_manager
                        .resolve_model_id(&model)
                        .ok_or_else(|| AlignerError::ModelError(format!("Unknown model: {}", model)))?;

                    if model_manager.is_model_downloaded(&model_id) {
                        println!("✅ Model '{}' is already downloaded!", model_id);
                        return Ok(());
                    }

                    match model_manager.download_model(&model_id).await {
                        Ok(model_path) => {
                            println!("✅ Model '{}' downloaded successfully!", model_id);
                            println!("📁 Location: {}", model_path.display());
                        }
                        Err(e) => {
                            println!("❌ Failed to download model '{}': {}", model_id, e);
                            return Err(e);
                        }
                    }
                }

                ModelAction::Info { model } => {
                    let model_id = model_manager
                        .resolve_model_id(&model)
                        .ok_or_else(|| AlignerError::ModelError(format!("Unknown model: {}", model)))?;
                    let info = model_manager
                        .get_model_info(&model_id)
                        .ok_or_else(|| AlignerError::ModelError(format!("Unknown model: {}", model)))?;

                    println!("📋 Model Information for '{}'\n", info.id);
                    println!("Name: {}", info.name);
                    println!("Repository: {}", info.repo_id);
                    println!("Size: {} MB", info.size_mb);
                    println!("Dimensions: {}", info.dimensions);
                    println!("Description: {}", info.description);

                    match model_manager.get_model_path(&model_id) {
                        Some(path) => println!("Status: ✅ Downloaded ({})", path.display()),
                        None => {
                            println!("Status: ⬇️  Available for download");
                            println!("\n💡 To download this model, run:");
                            println!("   curriculum-aligner models download {}", info.id);
                        }
                    }
                }
            }
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                println!("⚙️  Current Configuration\n");
                let content = toml::to_string_pretty(&config)
                    .map_err(|e| AlignerError::Configuration(format!("Failed to serialize config: {}", e)))?;
                println!("{}", content);
            }

            Some(ConfigAction::Reset) => {
                println!("🔄 Resetting configuration to defaults...");
                let path = config_path.unwrap_or_else(Config::config_path);
                Config::default().save_to(&path)?;
                println!("✅ Configuration reset: {}", path.display());
            }

            Some(ConfigAction::Path) => {
                let path = config_path.unwrap_or_else(Config::config_path);
                println!("{}", path.display());
            }
        },
    }

    Ok(())
}
