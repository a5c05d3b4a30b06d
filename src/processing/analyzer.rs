//! Analysis engine: resolves the selection, fetches scores, runs the gap
//! analyzer and assembles the alignment report

use crate::catalog::SkillCatalog;
use crate::config::ProviderKind;
use crate::error::{AlignerError, Result};
use crate::input::Datasets;
use crate::processing::frequency::{skill_frequencies, SkillFrequency};
use crate::processing::gap_analyzer::{GapAnalysis, GapAnalyzer, GapWeights, ThresholdConfig};
use crate::processing::scores::CorpusAlignment;
use crate::processing::similarity::{CourseQuery, SimilarityProvider};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub query: CourseQuery,
    /// Empty selects every category
    pub categories: Vec<String>,
    pub thresholds: ThresholdConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseSummary {
    pub requested_course: String,
    pub resolved_course: String,
    pub fell_back: bool,
    pub provider: ProviderKind,
    /// Selected skills at or above the coverage threshold, catalog order
    pub taught_skills: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlignmentReport {
    pub course: CourseSummary,
    pub selected_categories: Vec<String>,
    pub thresholds: ThresholdConfig,
    pub weights: GapWeights,
    pub analysis: GapAnalysis,
    pub frequencies: Vec<SkillFrequency>,
    pub corpus_alignment: Option<CorpusAlignment>,
    pub embedding_model: Option<String>,
    pub processing_time_ms: u64,
}

impl AlignmentReport {
    pub fn course_name(&self) -> &str {
        &self.course.requested_course
    }
}

pub struct AnalysisEngine<'a> {
    catalog: &'a SkillCatalog,
    datasets: &'a Datasets,
    provider: &'a dyn SimilarityProvider,
    weights: GapWeights,
    embedding_model: Option<String>,
}

impl<'a> AnalysisEngine<'a> {
    pub fn new(
        catalog: &'a SkillCatalog,
        datasets: &'a Datasets,
        provider: &'a dyn SimilarityProvider,
        weights: GapWeights,
    ) -> Self {
        Self {
            catalog,
            datasets,
            provider,
            weights,
            embedding_model: None,
        }
    }

    pub fn with_embedding_model(mut self, model: Option<&str>) -> Self {
        self.embedding_model = model.map(str::to_string);
        self
    }

    pub fn analyze(&self, request: &AnalysisRequest) -> Result<AlignmentReport> {
        let start_time = Instant::now();

        let selected = self.catalog.select(&request.categories)?;
        let selected_categories = {
            let mut categories: Vec<String> = Vec::new();
            for skill in &selected {
                if !categories.contains(&skill.category) {
                    categories.push(skill.category.clone());
                }
            }
            categories
        };
        debug!(
            "Selected {} skills in {} categories",
            selected.len(),
            selected_categories.len()
        );

        let course_scores = self.provider.get_scores(&request.query)?;

        let analyzer = GapAnalyzer::new(request.thresholds)?.with_weights(self.weights)?;
        let analysis = match analyzer.analyze(&selected, &course_scores.scores) {
            Ok(analysis) => analysis,
            Err(AlignerError::EmptySelection) => {
                info!("No skills selected; reporting an empty analysis");
                GapAnalysis::empty()
            }
            Err(e) => return Err(e),
        };

        let taught_skills = selected
            .iter()
            .filter(|skill| {
                course_scores
                    .get(&skill.name)
                    .is_some_and(|t| t.course_score >= request.thresholds.course_coverage_threshold)
            })
            .map(|skill| skill.name.clone())
            .collect();

        let course_texts: Vec<&str> = match &request.query {
            CourseQuery::Custom { outcome } => vec![outcome.as_str()],
            CourseQuery::Named(_) => self.datasets.outcomes_for(&course_scores.resolved_course),
        };
        let job_texts: Vec<&str> = self.datasets.job_descriptions.iter().map(String::as_str).collect();
        let frequencies = skill_frequencies(&selected, &course_texts, &job_texts)?;

        let processing_time_ms = start_time.elapsed().as_millis() as u64;
        info!(
            "Analyzed '{}': {} gaps, health {:.1}% ({} ms)",
            course_scores.requested_course,
            analysis.gaps.len(),
            analysis.metrics.health_score,
            processing_time_ms
        );

        Ok(AlignmentReport {
            course: CourseSummary {
                requested_course: course_scores.requested_course,
                resolved_course: course_scores.resolved_course,
                fell_back: course_scores.fell_back,
                provider: self.provider.kind(),
                taught_skills,
            },
            selected_categories,
            thresholds: *analyzer.thresholds(),
            weights: *analyzer.weights(),
            analysis,
            frequencies,
            corpus_alignment: course_scores.corpus_alignment,
            embedding_model: self.embedding_model.clone(),
            processing_time_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Skill;
    use crate::processing::static_table::SimilarityTable;
    use crate::processing::similarity::StaticTableProvider;

    fn provider() -> StaticTableProvider {
        StaticTableProvider::new(SimilarityTable::default(), "Introduction to Programming").unwrap()
    }

    fn request(course: &str, categories: &[&str]) -> AnalysisRequest {
        AnalysisRequest {
            query: CourseQuery::Named(course.to_string()),
            categories: categories.iter().map(|c| c.to_string()).collect(),
            thresholds: ThresholdConfig::default(),
        }
    }

    #[test]
    fn test_analyze_named_course() {
        let catalog = SkillCatalog::default();
        let datasets = Datasets::mock();
        let provider = provider();
        let engine = AnalysisEngine::new(&catalog, &datasets, &provider, GapWeights::default());

        let report = engine.analyze(&request("Web Development", &[])).unwrap();
        assert_eq!(report.course.resolved_course, "Web Development");
        assert!(!report.course.fell_back);
        assert_eq!(report.course.provider, ProviderKind::Static);
        assert!(report.course.taught_skills.contains(&"React".to_string()));
        assert!(report.analysis.gaps.iter().any(|g| g.skill == "Python"));
        assert!(!report.analysis.gaps.iter().any(|g| g.skill == "HTML"));
        assert!(report.frequencies.iter().any(|f| f.skill == "React" && f.course_count > 0));
    }

    #[test]
    fn test_report_records_applied_settings() {
        let catalog = SkillCatalog::default();
        let datasets = Datasets::mock();
        let provider = provider();
        let weights = GapWeights {
            job_weight: 0.5,
            standard_weight: 0.5,
        };
        let engine = AnalysisEngine::new(&catalog, &datasets, &provider, weights);

        let mut strict = request("Web Development", &[]);
        strict.thresholds = ThresholdConfig::new(0.6, 0.7, 0.1).unwrap();
        let report = engine.analyze(&strict).unwrap();
        assert_eq!(report.thresholds, strict.thresholds);
        assert_eq!(report.weights, weights);
    }

    #[test]
    fn test_category_filter_restricts_gaps() {
        let catalog = SkillCatalog::default();
        let datasets = Datasets::mock();
        let provider = provider();
        let engine = AnalysisEngine::new(&catalog, &datasets, &provider, GapWeights::default());

        let report = engine
            .analyze(&request("Web Development", &["Cloud & DevOps"]))
            .unwrap();
        assert_eq!(report.selected_categories, vec!["Cloud & DevOps"]);
        assert!(report.analysis.gaps.iter().all(|g| g.category == "Cloud & DevOps"));
        assert!(!report.analysis.gaps.is_empty());
    }

    #[test]
    fn test_empty_catalog_yields_empty_analysis() {
        let catalog = SkillCatalog::new(Vec::new()).unwrap();
        let datasets = Datasets::mock();
        let provider = provider();
        let engine = AnalysisEngine::new(&catalog, &datasets, &provider, GapWeights::default());

        let report = engine.analyze(&request("Machine Learning", &[])).unwrap();
        assert!(report.analysis.gaps.is_empty());
        assert_eq!(report.analysis.metrics.health_score, 0.0);
    }

    #[test]
    fn test_skills_without_scores_are_reported() {
        let mut skills = SkillCatalog::default().skills().to_vec();
        skills.push(Skill::new("Haskell", "Programming Languages"));
        let catalog = SkillCatalog::new(skills).unwrap();
        let datasets = Datasets::mock();
        let provider = provider();
        let engine = AnalysisEngine::new(&catalog, &datasets, &provider, GapWeights::default());

        let report = engine
            .analyze(&request("Machine Learning", &["Programming Languages"]))
            .unwrap();
        assert_eq!(report.analysis.excluded_skills, vec!["Haskell".to_string()]);
    }
}
