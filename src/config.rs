//! Configuration management for the curriculum aligner

use crate::error::{AlignerError, Result};
use crate::processing::gap_analyzer::{GapWeights, ThresholdConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub data: DataConfig,
    pub thresholds: ThresholdConfig,
    pub scoring: GapWeights,
    pub provider: ProviderConfig,
    pub recommender: RecommenderConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    pub courses_path: PathBuf,
    pub jobs_path: PathBuf,
    pub standards_paths: Vec<PathBuf>,
    /// Optional TOML skill catalog replacing the built-in one
    pub catalog_path: Option<PathBuf>,
    /// Value used when an expected CSV column is missing
    pub placeholder: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// Precomputed similarity lookup table
    Static,
    /// Embedding cosine similarity against the loaded corpora
    Computed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    /// Course used when the requested course has no table entry
    pub default_course: String,
    /// Optional JSON similarity table replacing the built-in one
    pub table_path: Option<PathBuf>,
    pub models_dir: PathBuf,
    pub embedding_model: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommenderKind {
    Local,
    Simulated,
    Remote,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommenderConfig {
    pub kind: RecommenderKind,
    pub endpoint: String,
    pub model: String,
    /// Name of the environment variable holding the API token
    pub token_env: String,
    pub timeout_secs: u64,
    pub simulated_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
    pub show_trace: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
    Html,
}

impl Default for Config {
    fn default() -> Self {
        let models_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".curriculum-aligner")
            .join("models");

        Self {
            data: DataConfig {
                courses_path: PathBuf::from("data/cs_course_outcomes.csv"),
                jobs_path: PathBuf::from("data/cs_job_postings_500.csv"),
                standards_paths: vec![
                    PathBuf::from("data/cs2023_standards.csv"),
                    PathBuf::from("data/csta_standards.csv"),
                    PathBuf::from("data/abet_standards.csv"),
                    PathBuf::from("data/global_cs_standards.csv"),
                ],
                catalog_path: None,
                placeholder: "Not specified".to_string(),
            },
            thresholds: ThresholdConfig::default(),
            scoring: GapWeights::default(),
            provider: ProviderConfig {
                kind: ProviderKind::Static,
                default_course: "Introduction to Programming".to_string(),
                table_path: None,
                models_dir,
                embedding_model: "potion-base-8M".to_string(),
            },
            recommender: RecommenderConfig {
                kind: RecommenderKind::Simulated,
                endpoint: "https://api-inference.huggingface.co/models".to_string(),
                model: "google/flan-t5-base".to_string(),
                token_env: "HF_API_TOKEN".to_string(),
                timeout_secs: 30,
                simulated_delay_ms: 1500,
            },
            output: OutputConfig {
                format: OutputFormat::Console,
                detailed: false,
                color_output: true,
                show_trace: false,
            },
        }
    }
}

impl Config {
    /// Load the user configuration, writing defaults on first use
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

    /// Load an explicit configuration file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| AlignerError::Configuration(format!("Failed to parse config: {}", e)))?;
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
            .map_err(|e| AlignerError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("curriculum-aligner")
            .join("config.toml")
    }

    pub fn validate(&self) -> Result<()> {
        self.thresholds.validate()?;
        self.scoring.validate()?;
        if self.provider.default_course.trim().is_empty() {
            return Err(AlignerError::Configuration(
                "provider.default_course must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn models_dir(&self) -> &PathBuf {
        &self.provider.models_dir
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
        assert_eq!(config.scoring.job_weight, 0.7);
        assert_eq!(config.scoring.standard_weight, 0.3);
        assert_eq!(config.provider.kind, ProviderKind::Static);
    }

    #[test]
    fn test_round_trip_through_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.thresholds.gap_severity_threshold = 0.35;
        config.recommender.kind = RecommenderKind::Remote;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.thresholds.gap_severity_threshold, 0.35);
        assert_eq!(loaded.recommender.kind, RecommenderKind::Remote);
    }

    #[test]
    fn test_out_of_range_threshold_rejected_on_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        let mut config = Config::default();
        config.thresholds.job_relevance_threshold = 1.4;
        config.save_to(&path).unwrap();

        let result = Config::load_from(&path);
        assert!(matches!(result, Err(AlignerError::InvalidThreshold { .. })));
    }
}
