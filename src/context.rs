//! Application context: everything one invocation needs, built once

use crate::catalog::SkillCatalog;
use crate::config::{Config, ProviderConfig, ProviderKind};
use crate::error::Result;
use crate::input::Datasets;
use crate::llm::{RecommendationRequest, RecommendationRequester, RecommendationSet, Recommender};
use crate::output::DashboardReport;
use crate::processing::analyzer::{AlignmentReport, AnalysisEngine, AnalysisRequest};
use crate::processing::embeddings::EmbeddingEngine;
use crate::processing::similarity::{EmbeddingProvider, ScoreSource, StaticTableProvider};
use crate::processing::static_table::SimilarityTable;
use log::{debug, info};

pub struct AppContext {
    pub config: Config,
    pub catalog: SkillCatalog,
    pub datasets: Datasets,
    pub provider: ScoreSource,
    pub recommender: RecommendationRequester,
}

impl AppContext {
    /// Load the catalog and datasets, then construct the configured provider
    /// and recommender. The computed provider may download its model.
    pub async fn build(config: Config) -> Result<Self> {
        config.validate()?;

        let catalog = match &config.data.catalog_path {
            Some(path) => SkillCatalog::from_file(path)?,
            None => SkillCatalog::default(),
        };
        let datasets = Datasets::load(&config.data);

        let provider = match config.provider.kind {
            ProviderKind::Static => {
                let table = load_similarity_table(&config.provider)?;
                ScoreSource::Static(StaticTableProvider::new(table, &config.provider.default_course)?)
            }
            ProviderKind::Computed => {
                let engine = EmbeddingEngine::from_config(&config).await?;
                ScoreSource::Computed(EmbeddingProvider::new(
                    Box::new(engine),
                    catalog.skills(),
                    &datasets,
                    &config.provider.default_course,
                )?)
            }
        };
        let recommender = RecommendationRequester::from_config(&config.recommender)?;

        info!(
            "Context ready: {} skills, {} course outcomes, {:?} provider, {:?} recommender",
            catalog.len(),
            datasets.courses.len(),
            config.provider.kind,
            recommender.kind()
        );

        Ok(Self::from_parts(config, catalog, datasets, provider, recommender))
    }

    pub fn from_parts(
        config: Config,
        catalog: SkillCatalog,
        datasets: Datasets,
        provider: ScoreSource,
        recommender: RecommendationRequester,
    ) -> Self {
        Self {
            config,
            catalog,
            datasets,
            provider,
            recommender,
        }
    }

    pub fn analyze(&self, request: &AnalysisRequest) -> Result<AlignmentReport> {
        AnalysisEngine::new(&self.catalog, &self.datasets, &self.provider, self.config.scoring)
            .with_embedding_model(self.provider.embedding_model())
            .analyze(request)
    }

    pub async fn recommend(&self, report: &AlignmentReport) -> RecommendationSet {
        self.recommender
            .recommend(&RecommendationRequest::from_report(report))
            .await
    }

    pub fn dashboard(
        &self,
        report: AlignmentReport,
        recommendations: Option<RecommendationSet>,
    ) -> DashboardReport {
        DashboardReport::new(report, recommendations, self.datasets.origin)
    }

    /// Dataset courses first, then table-only courses, without duplicates
    pub fn course_names(&self) -> Vec<String> {
        let mut names = self.datasets.course_names();
        if let ScoreSource::Static(provider) = &self.provider {
            for name in provider.course_names() {
                if !names.iter().any(|n| n.eq_ignore_ascii_case(name)) {
                    names.push(name.to_string());
                }
            }
        }
        names
    }
}

pub fn load_similarity_table(config: &ProviderConfig) -> Result<SimilarityTable> {
    match &config.table_path {
        Some(path) => {
            debug!("Loading similarity table from {}", path.display());
            SimilarityTable::from_file(path)
        }
        None => Ok(SimilarityTable::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RecommenderKind;
    use crate::processing::gap_analyzer::ThresholdConfig;
    use crate::processing::similarity::CourseQuery;
    use std::path::PathBuf;

    fn offline_config() -> Config {
        let mut config = Config::default();
        config.data.courses_path = PathBuf::from("/nonexistent/courses.csv");
        config.data.jobs_path = PathBuf::from("/nonexistent/jobs.csv");
        config.data.standards_paths = vec![PathBuf::from("/nonexistent/standards.csv")];
        config.recommender.kind = RecommenderKind::Local;
        config
    }

    #[tokio::test]
    async fn test_build_with_static_provider() {
        let context = AppContext::build(offline_config()).await.unwrap();
        assert!(context.datasets.origin.courses_mocked);
        assert_eq!(context.recommender.kind(), RecommenderKind::Local);

        let names = context.course_names();
        assert!(names.iter().any(|n| n == "Introduction to Programming"));
        let unique: std::collections::HashSet<_> = names.iter().map(|n| n.to_lowercase()).collect();
        assert_eq!(unique.len(), names.len());
    }

    #[tokio::test]
    async fn test_analyze_and_recommend() {
        let context = AppContext::build(offline_config()).await.unwrap();
        let report = context
            .analyze(&AnalysisRequest {
                query: CourseQuery::Named("Web Development".to_string()),
                categories: Vec::new(),
                thresholds: ThresholdConfig::default(),
            })
            .unwrap();

        let set = context.recommend(&report).await;
        assert!(!set.items.is_empty() && set.items.len() <= 3);

        let dashboard = context.dashboard(report, Some(set));
        assert!(dashboard.uses_sample_data());
        assert!(dashboard.recommendations.is_some());
    }

    #[tokio::test]
    async fn test_build_rejects_invalid_config() {
        let mut config = offline_config();
        config.thresholds.job_relevance_threshold = 1.5;
        assert!(AppContext::build(config).await.is_err());
    }
}
