//! Text embeddings using Model2Vec static models

use crate::config::Config;
use crate::error::{AlignerError, Result};
use crate::processing::embedding_manager::EmbeddingModelManager;
use log::{debug, info};
use model2vec_rs::model::StaticModel;
use std::path::Path;
use std::time::Instant;

/// Anything that turns texts into fixed-size vectors
pub trait TextEncoder: Send + Sync {
    fn encode(&self, texts: &[String]) -> Vec<Vec<f32>>;

    fn model_name(&self) -> &str;
}

pub struct EmbeddingEngine {
    model: StaticModel,
    model_name: String,
    batch_size: usize,
}

const MAX_TOKENS: usize = 512;
const DEFAULT_BATCH_SIZE: usize = 256;

impl EmbeddingEngine {
    pub fn new(model_path: &Path, model_name: &str) -> Result<Self> {
        let start_time = Instant::now();
        info!("Loading Model2Vec embedding model from: {}", model_path.display());

        let model = StaticModel::from_pretrained(
            model_path,
            None, // token
            None, // normalize
            None, // subfolder
        )
        .map_err(|e| AlignerError::Embedding(format!("Failed to load model: {}", e)))?;

        info!("Model loaded in {:.2?}", start_time.elapsed());

        Ok(Self {
            model,
            model_name: model_name.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
        })
    }

    /// Load the configured model, downloading it first if needed
    pub async fn from_config(config: &Config) -> Result<Self> {
        let mut manager = EmbeddingModelManager::new(config.models_dir().clone()).await?;
        let model_id = manager
            .resolve_model_id(&config.provider.embedding_model)
            .ok_or_else(|| {
                AlignerError::ModelError(format!(
                    "Unknown embedding model: {}",
                    config.provider.embedding_model
                ))
            })?;
        let model_path = manager.ensure_model_available(&model_id).await?;
        Self::new(&model_path, &model_id)
    }
}

impl TextEncoder for EmbeddingEngine {
    fn encode(&self, texts: &[String]) -> Vec<Vec<f32>> {
        let start_time = Instant::now();
        let embeddings = self
            .model
            .encode_with_args(texts, Some(MAX_TOKENS), self.batch_size);
        debug!("Encoded {} texts in {:.2?}", texts.len(), start_time.elapsed());
        embeddings
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

/// Cosine similarity of two embeddings. Zero-norm or empty vectors score 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(AlignerError::Embedding(format!(
            "Embedding dimensions don't match: {} vs {}",
            a.len(),
            b.len()
        )));
    }

    if a.is_empty() {
        return Ok(0.0);
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        Ok(0.0)
    } else {
        Ok(dot_product / (norm_a * norm_b))
    }
}

/// Highest similarity between `query` and any of `corpus`; 0 for an empty corpus
pub fn max_similarity(query: &[f32], corpus: &[Vec<f32>]) -> Result<f32> {
    let mut best = 0.0_f32;
    for entry in corpus {
        best = best.max(cosine_similarity(query, entry)?);
    }
    Ok(best)
}

/// Mean similarity between `query` and every entry of `corpus`
pub fn mean_similarity(query: &[f32], corpus: &[Vec<f32>]) -> Result<f32> {
    if corpus.is_empty() {
        return Ok(0.0);
    }
    let mut total = 0.0_f32;
    for entry in corpus {
        total += cosine_similarity(query, entry)?;
    }
    Ok(total / corpus.len() as f32)
}

/// Element-wise average of equally sized vectors
pub fn mean_embedding(embeddings: &[Vec<f32>]) -> Option<Vec<f32>> {
    let first = embeddings.first()?;
    let mut mean = vec![0.0_f32; first.len()];
    for embedding in embeddings {
        if embedding.len() != mean.len() {
            return None;
        }
        for (acc, value) in mean.iter_mut().zip(embedding) {
            *acc += value;
        }
    }
    let count = embeddings.len() as f32;
    mean.iter_mut().for_each(|v| *v /= count);
    Some(mean)
}
