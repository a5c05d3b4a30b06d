//! Dashboard report: everything a formatter needs to render one analysis

use crate::config::ProviderKind;
use crate::input::datasets::DatasetOrigin;
use crate::llm::RecommendationSet;
use crate::processing::analyzer::AlignmentReport;
use crate::processing::frequency::SkillFrequency;
use crate::processing::gap_analyzer::{
    CategoryCoverage, CoverageMetrics, GapRecord, GapWeights, ThresholdConfig,
};
use crate::processing::scores::CorpusAlignment;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardReport {
    pub summary: DashboardSummary,
    pub thresholds: ThresholdConfig,
    pub weights: GapWeights,
    pub gaps: Vec<GapRecord>,
    pub category_coverage: Vec<CategoryCoverage>,
    pub frequencies: Vec<SkillFrequency>,
    pub taught_skills: Vec<String>,
    pub excluded_skills: Vec<String>,
    pub selected_categories: Vec<String>,
    pub recommendations: Option<RecommendationSet>,
    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub course_name: String,
    pub resolved_course: String,
    pub fell_back: bool,
    pub provider: ProviderKind,
    pub metrics: CoverageMetrics,
    pub verdict: Verdict,
    pub well_aligned: bool,
    pub corpus_alignment: Option<CorpusAlignment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Strong,
    Moderate,
    Weak,
    Poor,
}

impl Verdict {
    pub fn from_health_score(health_score: f32) -> Self {
        match health_score {
            h if h >= 80.0 => Verdict::Strong,
            h if h >= 60.0 => Verdict::Moderate,
            h if h >= 40.0 => Verdict::Weak,
            _ => Verdict::Poor,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Strong => "STRONG",
            Verdict::Moderate => "MODERATE",
            Verdict::Weak => "WEAK",
            Verdict::Poor => "POOR",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Verdict::Strong => "The course covers most skills that employers and standards ask for.",
            Verdict::Moderate => "The course covers the core skills but misses several in-demand ones.",
            Verdict::Weak => "Large parts of the in-demand skill set are not covered.",
            Verdict::Poor => "The course covers few of the skills employers and standards ask for.",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub tool_version: String,
    pub processing_time_ms: u64,
    pub embedding_model: Option<String>,
    pub data_origin: DatasetOrigin,
}

impl DashboardReport {
    pub fn new(
        report: AlignmentReport,
        recommendations: Option<RecommendationSet>,
        data_origin: DatasetOrigin,
    ) -> Self {
        let analysis = report.analysis;
        let well_aligned = analysis.is_well_aligned();
        let metrics = analysis.metrics;

        Self {
            summary: DashboardSummary {
                course_name: report.course.requested_course,
                resolved_course: report.course.resolved_course,
                fell_back: report.course.fell_back,
                provider: report.course.provider,
                verdict: Verdict::from_health_score(metrics.health_score),
                well_aligned,
                metrics,
                corpus_alignment: report.corpus_alignment,
            },
            thresholds: report.thresholds,
            weights: report.weights,
            gaps: analysis.gaps,
            category_coverage: analysis.category_coverage,
            frequencies: report.frequencies,
            taught_skills: report.course.taught_skills,
            excluded_skills: analysis.excluded_skills,
            selected_categories: report.selected_categories,
            recommendations,
            metadata: ReportMetadata {
                generated_at: Utc::now(),
                tool_version: env!("CARGO_PKG_VERSION").to_string(),
                processing_time_ms: report.processing_time_ms,
                embedding_model: report.embedding_model,
                data_origin,
            },
        }
    }

    pub fn uses_sample_data(&self) -> bool {
        let origin = &self.metadata.data_origin;
        origin.courses_mocked || origin.jobs_mocked || origin.standards_mocked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_thresholds() {
        assert_eq!(Verdict::from_health_score(100.0), Verdict::Strong);
        assert_eq!(Verdict::from_health_score(80.0), Verdict::Strong);
        assert_eq!(Verdict::from_health_score(79.9), Verdict::Moderate);
        assert_eq!(Verdict::from_health_score(40.0), Verdict::Weak);
        assert_eq!(Verdict::from_health_score(0.0), Verdict::Poor);
    }
}
