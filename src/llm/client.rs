//! HTTP client for the hosted text-generation endpoint

use crate::config::RecommenderConfig;
use crate::error::{AlignerError, Result};
use log::debug;
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

pub struct InferenceClient {
    client: reqwest::Client,
    url: String,
    token: Option<String>,
}

#[derive(Deserialize)]
struct Generation {
    generated_text: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Batch(Vec<Generation>),
    Single(Generation),
    Error { error: String },
}

impl InferenceClient {
    pub fn new(config: &RecommenderConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AlignerError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: model_url(&config.endpoint, &config.model),
            token: read_token(&config.token_env),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Send the prompt and return the generated text
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let mut request = self.client.post(&self.url).json(&json!({
            "inputs": prompt,
            "options": { "wait_for_model": true },
        }));
        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!("Inference endpoint answered {} ({} bytes)", status, body.len());

        if !status.is_success() {
            return Err(AlignerError::UpstreamRecommendation(format!(
                "HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        extract_generated_text(&body)
    }
}

fn model_url(endpoint: &str, model: &str) -> String {
    format!("{}/{}", endpoint.trim_end_matches('/'), model.trim_start_matches('/'))
}

/// Token from the named environment variable; blank values count as unset
fn read_token(var: &str) -> Option<String> {
    let raw = std::env::var(var).ok()?;
    let token = raw.trim();
    (!token.is_empty()).then(|| token.to_string())
}

/// Generated text from a JSON response, or the body itself when it is not JSON
pub fn extract_generated_text(body: &str) -> Result<String> {
    match serde_json::from_str::<InferenceResponse>(body) {
        Ok(InferenceResponse::Batch(generations)) => generations
            .into_iter()
            .next()
            .map(|g| g.generated_text)
            .ok_or_else(|| AlignerError::UpstreamRecommendation("Empty generation list".to_string())),
        Ok(InferenceResponse::Single(generation)) => Ok(generation.generated_text),
        Ok(InferenceResponse::Error { error }) => Err(AlignerError::UpstreamRecommendation(error)),
        Err(_) => Ok(body.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_url() {
        assert_eq!(
            model_url("https://api-inference.huggingface.co/models/", "google/flan-t5-base"),
            "https://api-inference.huggingface.co/models/google/flan-t5-base"
        );
    }

    #[test]
    fn test_extract_generated_text() {
        assert_eq!(
            extract_generated_text(r#"[{"generated_text": "Output: 1. A"}]"#).unwrap(),
            "Output: 1. A"
        );
        assert_eq!(
            extract_generated_text(r#"{"generated_text": "hi"}"#).unwrap(),
            "hi"
        );
        assert_eq!(extract_generated_text("plain text").unwrap(), "plain text");
        assert!(matches!(
            extract_generated_text(r#"{"error": "Model is loading"}"#),
            Err(AlignerError::UpstreamRecommendation(_))
        ));
        assert!(extract_generated_text("[]").is_err());
    }

    #[test]
    fn test_blank_token_is_ignored() {
        std::env::set_var("CURRICULUM_ALIGNER_TEST_BLANK_TOKEN", "   ");
        assert_eq!(read_token("CURRICULUM_ALIGNER_TEST_BLANK_TOKEN"), None);
        assert_eq!(read_token("CURRICULUM_ALIGNER_TEST_UNSET_TOKEN"), None);
    }
}
