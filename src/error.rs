//! Error handling for the curriculum aligner

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AlignerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("Embedding generation error: {0}")]
    Embedding(String),

    #[error("Model error: {0}")]
    ModelError(String),

    #[error("Processing error: {0}")]
    Processing(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid threshold '{name}': {value} is outside [0, 1]")]
    InvalidThreshold { name: String, value: f32 },

    #[error("Invalid {field} for skill '{skill}': {value} is outside [0, 1]")]
    InvalidScore {
        skill: String,
        field: &'static str,
        value: f32,
    },

    #[error("Invalid input: no skills selected for analysis")]
    EmptySelection,

    #[error("Dataset unavailable: {0}")]
    DataUnavailable(String),

    #[error("Recommendation backend failed: {0}")]
    UpstreamRecommendation(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, AlignerError>;

/// The embedding library reports failures through anyhow
impl From<anyhow::Error> for AlignerError {
    fn from(err: anyhow::Error) -> Self {
        AlignerError::Embedding(err.to_string())
    }
}

impl From<reqwest::Error> for AlignerError {
    fn from(err: reqwest::Error) -> Self {
        AlignerError::Network(err.to_string())
    }
}
