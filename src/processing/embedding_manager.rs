//! Downloading and locating Model2Vec embedding models

use crate::error::{AlignerError, Result};
use hf_hub::api::tokio::Api;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::fs;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingModelInfo {
    pub id: String,
    pub name: String,
    pub repo_id: String,
    pub size_mb: u64,
    pub description: String,
    pub dimensions: u32,
}

/// Files fetched for a model; the model is usable once the required ones exist
const REQUIRED_FILES: &[&str] = &["model.safetensors", "tokenizer.json", "config.json"];
const OPTIONAL_FILES: &[&str] = &["README.md"];

pub struct EmbeddingModelManager {
    models_dir: PathBuf,
    available_models: Vec<EmbeddingModelInfo>,
    downloaded_models: HashSet<String>,
}

impl EmbeddingModelManager {
    pub async fn new(models_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&models_dir).await.map_err(|e| {
            AlignerError::ModelError(format!("Failed to create models directory: {}", e))
        })?;

        let mut manager = Self {
            models_dir,
            available_models: known_models(),
            downloaded_models: HashSet::new(),
        };
        manager.scan_downloaded_models().await?;
        Ok(manager)
    }

    async fn scan_downloaded_models(&mut self) -> Result<()> {
        let mut entries = fs::read_dir(&self.models_dir).await.map_err(|e| {
            AlignerError::ModelError(format!("Failed to scan models directory: {}", e))
        })?;

        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() && is_model_directory(&entry.path()).await {
                self.downloaded_models
                    .insert(entry.file_name().to_string_lossy().to_string());
            }
        }

        Ok(())
    }

    /// Download a model from the Hugging Face Hub into the models directory
    pub async fn download_model(&mut self, model_id: &str) -> Result<PathBuf> {
        let info = self
            .get_model_info(model_id)
            .cloned()
            .ok_or_else(|| AlignerError::ModelError(format!("Unknown embedding model: {}", model_id)))?;

        let model_dir = self.models_dir.join(&info.id);
        if self.downloaded_models.contains(&info.id) {
            return Ok(model_dir);
        }

        println!("📥 Downloading embedding model: {} ({} MB)", info.name, info.size_mb);
        println!("📍 Repository: {}", info.repo_id);

        fs::create_dir_all(&model_dir).await?;

        let api = Api::new()
            .map_err(|e| AlignerError::ModelError(format!("Failed to initialize HF API: {}", e)))?;
        let repo = api.model(info.repo_id.clone());

        for file in REQUIRED_FILES.iter().chain(OPTIONAL_FILES) {
            match repo.get(file).await {
                Ok(cached_path) => {
                    fs::copy(&cached_path, model_dir.join(file)).await.map_err(|e| {
                        AlignerError::ModelError(format!("Failed to copy {}: {}", file, e))
                    })?;
                    println!("  ✅ Downloaded: {}", file);
                }
                Err(e) if OPTIONAL_FILES.contains(file) => {
                    warn!("Optional file {} not found: {}", file, e);
                }
                Err(e) => {
                    return Err(AlignerError::ModelError(format!(
                        "Failed to download required file {}: {}",
                        file, e
                    )));
                }
            }
        }

        self.downloaded_models.insert(info.id.clone());
        info!("Embedding model {} stored in {}", info.id, model_dir.display());
        Ok(model_dir)
    }

    pub fn get_model_path(&self, model_id: &str) -> Option<PathBuf> {
        self.downloaded_models
            .contains(model_id)
            .then(|| self.models_dir.join(model_id))
    }

    pub async fn ensure_model_available(&mut self, model_id: &str) -> Result<PathBuf> {
        match self.get_model_path(model_id) {
            Some(path) => Ok(path),
            None => self.download_model(model_id).await,
        }
    }

    pub fn list_available_models(&self) -> &[EmbeddingModelInfo] {
        &self.available_models
    }

    pub fn get_model_info(&self, model_id: &str) -> Option<&EmbeddingModelInfo> {
        self.available_models.iter().find(|m| m.id == model_id)
    }

    pub fn is_model_downloaded(&self, model_id: &str) -> bool {
        self.downloaded_models.contains(model_id)
    }

    /// Resolve a model by id, repository id or display name
    pub fn resolve_model_id(&self, input: &str) -> Option<String> {
        let input_lower = input.to_lowercase();
        self.available_models
            .iter()
            .find(|m| m.id == input || m.repo_id == input || m.name.to_lowercase() == input_lower)
            .map(|m| m.id.clone())
    }
}

async fn is_model_directory(path: &Path) -> bool {
    for file in REQUIRED_FILES {
        if fs::metadata(path.join(file)).await.is_err() {
            return false;
        }
    }
    true
}

fn known_models() -> Vec<EmbeddingModelInfo> {
    vec![
        EmbeddingModelInfo {
            id: "potion-base-8M".to_string(),
            name: "Potion Base 8M".to_string(),
            repo_id: "minishlab/potion-base-8M".to_string(),
            size_mb: 30,
            description: "Compact general-purpose static embeddings".to_string(),
            dimensions: 256,
        },
        EmbeddingModelInfo {
            id: "potion-retrieval-32M".to_string(),
            name: "Potion Retrieval 32M".to_string(),
            repo_id: "minishlab/potion-retrieval-32M".to_string(),
            size_mb: 130,
            description: "Larger static embeddings tuned for retrieval".to_string(),
            dimensions: 512,
        },
        EmbeddingModelInfo {
            id: "m2v-base".to_string(),
            name: "Model2Vec Base".to_string(),
            repo_id: "minishlab/M2V_base_output".to_string(),
            size_mb: 90,
            description: "Distilled base embeddings".to_string(),
            dimensions: 256,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_manager_creation_lists_models() {
        let temp_dir = TempDir::new().unwrap();
        let manager = EmbeddingModelManager::new(temp_dir.path().to_path_buf())
            .await
            .unwrap();
        assert!(!manager.list_available_models().is_empty());
        assert!(!manager.is_model_downloaded("potion-base-8M"));
        assert!(manager.get_model_path("potion-base-8M").is_none());
    }

    #[tokio::test]
    async fn test_resolve_model_id() {
        let temp_dir = TempDir::new().unwrap();
        let manager = EmbeddingModelManager::new(temp_dir.path().to_path_buf())
            .await
            .unwrap();

        assert_eq!(manager.resolve_model_id("potion-base-8M"), Some("potion-base-8M".to_string()));
        assert_eq!(
            manager.resolve_model_id("minishlab/potion-base-8M"),
            Some("potion-base-8M".to_string())
        );
        assert_eq!(manager.resolve_model_id("potion base 8m"), Some("potion-base-8M".to_string()));
        assert_eq!(manager.resolve_model_id("bert-large"), None);
    }

    #[tokio::test]
    async fn test_scan_detects_complete_model_directories() {
        let temp_dir = TempDir::new().unwrap();
        let complete = temp_dir.path().join("potion-base-8M");
        let partial = temp_dir.path().join("m2v-base");
        std::fs::create_dir_all(&complete).unwrap();
        std::fs::create_dir_all(&partial).unwrap();
        for file in REQUIRED_FILES {
            std::fs::write(complete.join(file), b"{}").unwrap();
        }
        std::fs::write(partial.join("tokenizer.json"), b"{}").unwrap();

        let manager = EmbeddingModelManager::new(temp_dir.path().to_path_buf())
            .await
            .unwrap();
        assert!(manager.is_model_downloaded("potion-base-8M"));
        assert!(!manager.is_model_downloaded("m2v-base"));
        assert_eq!(manager.get_model_path("potion-base-8M"), Some(complete));
    }
}
