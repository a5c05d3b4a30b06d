//! Skill-gap scoring: decides which skills a course under-teaches relative
//! to job-market and standards relevance, ranks them by severity and
//! computes coverage metrics.
//!
//! A skill is a gap when all of the following hold:
//! - `job_score >= job_relevance_threshold`
//! - `course_score < course_coverage_threshold`
//! - `overall_gap >= gap_severity_threshold`
//!
//! where `overall_gap = job_weight * max(0, job - course)
//! + standard_weight * max(0, standard - course)`.
//!
//! Standards coverage filters on the *job* relevance threshold; there is no
//! separate standards threshold.

use crate::catalog::Skill;
use crate::error::{AlignerError, Result};
use crate::processing::scores::ScoreTriple;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    pub job_relevance_threshold: f32,
    pub course_coverage_threshold: f32,
    pub gap_severity_threshold: f32,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            job_relevance_threshold: 0.5,
            course_coverage_threshold: 0.7,
            gap_severity_threshold: 0.2,
        }
    }
}

impl ThresholdConfig {
    pub fn new(job_relevance: f32, course_coverage: f32, gap_severity: f32) -> Result<Self> {
        let thresholds = Self {
            job_relevance_threshold: job_relevance,
            course_coverage_threshold: course_coverage,
            gap_severity_threshold: gap_severity,
        };
        thresholds.validate()?;
        Ok(thresholds)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("job_relevance_threshold", self.job_relevance_threshold),
            ("course_coverage_threshold", self.course_coverage_threshold),
            ("gap_severity_threshold", self.gap_severity_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(AlignerError::InvalidThreshold {
                    name: name.to_string(),
                    value,
                });
            }
        }
        Ok(())
    }
}

/// Weighting of the job-market and standards terms of `overall_gap`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GapWeights {
    pub job_weight: f32,
    pub standard_weight: f32,
}

impl Default for GapWeights {
    fn default() -> Self {
        Self {
            job_weight: 0.7,
            standard_weight: 0.3,
        }
    }
}

impl GapWeights {
    pub fn validate(&self) -> Result<()> {
        let in_range = |w: f32| (0.0..=1.0).contains(&w);
        if !in_range(self.job_weight) || !in_range(self.standard_weight) {
            return Err(AlignerError::Configuration(format!(
                "Gap weights must lie in [0, 1] (job: {}, standard: {})",
                self.job_weight, self.standard_weight
            )));
        }
        // Sum above 1 would let overall_gap leave [0, 1]
        if self.job_weight + self.standard_weight > 1.0 + f32::EPSILON {
            return Err(AlignerError::Configuration(format!(
                "Gap weights must sum to at most 1 (got {})",
                self.job_weight + self.standard_weight
            )));
        }
        Ok(())
    }

    pub fn overall_gap(&self, triple: &ScoreTriple) -> f32 {
        let job_term = (triple.job_score - triple.course_score).max(0.0);
        let standard_term = (triple.standard_score - triple.course_score).max(0.0);
        (self.job_weight * job_term + self.standard_weight * standard_term).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapRecord {
    pub skill: String,
    pub category: String,
    pub course_score: f32,
    pub job_score: f32,
    pub standard_score: f32,
    pub overall_gap: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageMetrics {
    pub market_coverage_pct: f32,
    pub standards_coverage_pct: f32,
    pub gap_count: usize,
    pub health_score: f32,
    pub analyzed_skills: usize,
    pub job_relevant_count: usize,
    pub standard_relevant_count: usize,
}

impl CoverageMetrics {
    fn zero() -> Self {
        Self {
            market_coverage_pct: 0.0,
            standards_coverage_pct: 0.0,
            gap_count: 0,
            health_score: 0.0,
            analyzed_skills: 0,
            job_relevant_count: 0,
            standard_relevant_count: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCoverage {
    pub category: String,
    pub total: usize,
    pub job_relevant: usize,
    pub covered: usize,
    pub coverage_pct: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapAnalysis {
    /// Most severe gap first
    pub gaps: Vec<GapRecord>,
    pub metrics: CoverageMetrics,
    pub category_coverage: Vec<CategoryCoverage>,
    /// Selected skills without score data
    pub excluded_skills: Vec<String>,
}

impl GapAnalysis {
    /// Result shown when nothing was selected
    pub fn empty() -> Self {
        Self {
            gaps: Vec::new(),
            metrics: CoverageMetrics::zero(),
            category_coverage: Vec::new(),
            excluded_skills: Vec::new(),
        }
    }

    pub fn is_well_aligned(&self) -> bool {
        self.gaps.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GapAnalyzer {
    thresholds: ThresholdConfig,
    weights: GapWeights,
}

impl GapAnalyzer {
    pub fn new(thresholds: ThresholdConfig) -> Result<Self> {
        thresholds.validate()?;
        Ok(Self {
            thresholds,
            weights: GapWeights::default(),
        })
    }

    pub fn with_weights(mut self, weights: GapWeights) -> Result<Self> {
        weights.validate()?;
        self.weights = weights;
        Ok(self)
    }

    pub fn thresholds(&self) -> &ThresholdConfig {
        &self.thresholds
    }

    pub fn weights(&self) -> &GapWeights {
        &self.weights
    }

    /// Whether a triple qualifies as a gap; returns its overall gap if so
    pub fn qualifies(&self, triple: &ScoreTriple) -> Option<f32> {
        let t = &self.thresholds;
        if triple.job_score < t.job_relevance_threshold {
            return None;
        }
        if triple.course_score >= t.course_coverage_threshold {
            return None;
        }
        let overall_gap = self.weights.overall_gap(triple);
        (overall_gap >= t.gap_severity_threshold).then_some(overall_gap)
    }

    /// Analyze the selected skills against their scores.
    ///
    /// Skills missing from `scores` are excluded from both the gap list and
    /// the coverage denominators.
    pub fn analyze(
        &self,
        selected_skills: &[Skill],
        scores: &HashMap<String, ScoreTriple>,
    ) -> Result<GapAnalysis> {
        if selected_skills.is_empty() {
            return Err(AlignerError::EmptySelection);
        }

        let mut scored: Vec<(&Skill, &ScoreTriple)> = Vec::with_capacity(selected_skills.len());
        let mut excluded_skills = Vec::new();
        for skill in selected_skills {
            match scores.get(&skill.name) {
                Some(triple) => {
                    triple.validate(&skill.name)?;
                    scored.push((skill, triple));
                }
                None => excluded_skills.push(skill.name.clone()),
            }
        }

        let mut gaps: Vec<GapRecord> = scored
            .iter()
            .filter_map(|(skill, triple)| {
                self.qualifies(triple).map(|overall_gap| GapRecord {
                    skill: skill.name.clone(),
                    category: skill.category.clone(),
                    course_score: triple.course_score,
                    job_score: triple.job_score,
                    standard_score: triple.standard_score,
                    overall_gap,
                })
            })
            .collect();

        // sort_by is stable: equal gaps keep catalog order
        gaps.sort_by(|a, b| {
            b.overall_gap
                .partial_cmp(&a.overall_gap)
                .unwrap_or(Ordering::Equal)
        });

        let metrics = self.coverage_metrics(&scored, gaps.len());
        let category_coverage = self.category_coverage(&scored);

        Ok(GapAnalysis {
            gaps,
            metrics,
            category_coverage,
            excluded_skills,
        })
    }

    fn coverage_metrics(&self, scored: &[(&Skill, &ScoreTriple)], gap_count: usize) -> CoverageMetrics {
        let t = &self.thresholds;
        let covered = |triple: &ScoreTriple| triple.course_score >= t.course_coverage_threshold;

        let job_relevant: Vec<&ScoreTriple> = scored
            .iter()
            .map(|(_, triple)| *triple)
            .filter(|triple| triple.job_score >= t.job_relevance_threshold)
            .collect();
        let standard_relevant: Vec<&ScoreTriple> = scored
            .iter()
            .map(|(_, triple)| *triple)
            .filter(|triple| triple.standard_score >= t.job_relevance_threshold)
            .collect();

        let market_coverage_pct = percentage(
            job_relevant.iter().filter(|triple| covered(triple)).count(),
            job_relevant.len(),
        );
        let standards_coverage_pct = percentage(
            standard_relevant.iter().filter(|triple| covered(triple)).count(),
            standard_relevant.len(),
        );

        CoverageMetrics {
            market_coverage_pct,
            standards_coverage_pct,
            gap_count,
            health_score: (market_coverage_pct + standards_coverage_pct) / 2.0,
            analyzed_skills: scored.len(),
            job_relevant_count: job_relevant.len(),
            standard_relevant_count: standard_relevant.len(),
        }
    }

    fn category_coverage(&self, scored: &[(&Skill, &ScoreTriple)]) -> Vec<CategoryCoverage> {
        let t = &self.thresholds;
        let mut rows: Vec<CategoryCoverage> = Vec::new();

        for (skill, triple) in scored {
            let index = match rows.iter().position(|r| r.category == skill.category) {
                Some(index) => index,
                None => {
                    rows.push(CategoryCoverage {
                        category: skill.category.clone(),
                        total: 0,
                        job_relevant: 0,
                        covered: 0,
                        coverage_pct: 0.0,
                    });
                    rows.len() - 1
                }
            };
            let row = &mut rows[index];
            row.total += 1;
            if triple.job_score >= t.job_relevance_threshold {
                row.job_relevant += 1;
                if triple.course_score >= t.course_coverage_threshold {
                    row.covered += 1;
                }
            }
        }

        rows.retain(|r| r.job_relevant > 0);
        for row in &mut rows {
            row.coverage_pct = percentage(row.covered, row.job_relevant);
        }
        rows
    }
}

fn percentage(part: usize, whole: usize) -> f32 {
    if whole == 0 {
        0.0
    } else {
        100.0 * part as f32 / whole as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triple(course: f32, job: f32, standard: f32) -> ScoreTriple {
        ScoreTriple {
            course_score: course,
            job_score: job,
            standard_score: standard,
        }
    }

    fn fixture(rows: &[(&str, &str, f32, f32, f32)]) -> (Vec<Skill>, HashMap<String, ScoreTriple>) {
        let skills = rows
            .iter()
            .map(|(name, category, ..)| Skill::new(*name, *category))
            .collect();
        let scores = rows
            .iter()
            .map(|(name, _, c, j, s)| (name.to_string(), triple(*c, *j, *s)))
            .collect();
        (skills, scores)
    }

    fn example_thresholds() -> ThresholdConfig {
        ThresholdConfig::new(0.5, 0.3, 0.2).unwrap()
    }

    #[test]
    fn test_course_score_equal_to_threshold_is_not_a_gap() {
        let (skills, scores) = fixture(&[
            ("Python", "Languages", 0.85, 0.90, 0.75),
            ("Java", "Languages", 0.30, 0.85, 0.65),
        ]);
        let analyzer = GapAnalyzer::new(example_thresholds()).unwrap();
        let analysis = analyzer.analyze(&skills, &scores).unwrap();
        assert!(analysis.gaps.is_empty());
    }

    #[test]
    fn test_course_score_below_threshold_is_a_gap() {
        let (skills, scores) = fixture(&[
            ("Python", "Languages", 0.85, 0.90, 0.75),
            ("Java", "Languages", 0.29, 0.85, 0.65),
        ]);
        let analyzer = GapAnalyzer::new(example_thresholds()).unwrap();
        let analysis = analyzer.analyze(&skills, &scores).unwrap();

        assert_eq!(analysis.gaps.len(), 1);
        let gap = &analysis.gaps[0];
        assert_eq!(gap.skill, "Java");
        assert_eq!(gap.category, "Languages");
        assert!((gap.overall_gap - 0.50).abs() < 1e-4);
        assert_eq!(analysis.metrics.gap_count, 1);
    }

    #[test]
    fn test_gap_requires_job_relevance() {
        let analyzer = GapAnalyzer::new(example_thresholds()).unwrap();
        // Large standards gap alone does not qualify
        assert_eq!(analyzer.qualifies(&triple(0.0, 0.49, 1.0)), None);
        assert!(analyzer.qualifies(&triple(0.0, 0.5, 1.0)).is_some());
    }

    #[test]
    fn test_gap_requires_severity() {
        let analyzer = GapAnalyzer::new(ThresholdConfig::new(0.5, 0.8, 0.3).unwrap()).unwrap();
        // 0.7 * 0.2 + 0.3 * 0.0 = 0.14 < 0.3
        assert_eq!(analyzer.qualifies(&triple(0.6, 0.8, 0.5)), None);
    }

    #[test]
    fn test_negative_differences_are_clamped() {
        let weights = GapWeights::default();
        // job above course, standard below course
        let gap = weights.overall_gap(&triple(0.5, 0.9, 0.1));
        assert!((gap - 0.28).abs() < 1e-6);
        assert_eq!(weights.overall_gap(&triple(0.9, 0.2, 0.1)), 0.0);
    }

    #[test]
    fn test_ranking_descending_with_stable_ties() {
        let (skills, scores) = fixture(&[
            ("A", "X", 0.1, 0.6, 0.6),
            ("B", "X", 0.0, 1.0, 1.0),
            ("C", "Y", 0.1, 0.6, 0.6),
            ("D", "Y", 0.2, 0.9, 0.2),
        ]);
        let analyzer = GapAnalyzer::new(ThresholdConfig::new(0.5, 0.5, 0.1).unwrap()).unwrap();
        let analysis = analyzer.analyze(&skills, &scores).unwrap();

        let order: Vec<&str> = analysis.gaps.iter().map(|g| g.skill.as_str()).collect();
        // B = 1.0, D = 0.49, A = C = 0.5
        assert_eq!(order, vec!["B", "A", "C", "D"]);
        for pair in analysis.gaps.windows(2) {
            assert!(pair[0].overall_gap >= pair[1].overall_gap);
        }
    }

    #[test]
    fn test_soundness_and_completeness_over_grid() {
        let values = [0.0_f32, 0.2, 0.3, 0.5, 0.7, 1.0];
        let mut rows = Vec::new();
        let mut names = Vec::new();
        for (i, c) in values.iter().enumerate() {
            for (j, jb) in values.iter().enumerate() {
                for (k, s) in values.iter().enumerate() {
                    names.push(format!("s{}{}{}", i, j, k));
                    rows.push((*c, *jb, *s));
                }
            }
        }
        let skills: Vec<Skill> = names.iter().map(|n| Skill::new(n.clone(), "Grid")).collect();
        let scores: HashMap<String, ScoreTriple> = names
            .iter()
            .zip(rows.iter())
            .map(|(n, (c, j, s))| (n.clone(), triple(*c, *j, *s)))
            .collect();

        for thresholds in [(0.5, 0.3, 0.2), (0.0, 1.0, 0.0), (1.0, 0.5, 0.5), (0.3, 0.7, 0.1)] {
            let t = ThresholdConfig::new(thresholds.0, thresholds.1, thresholds.2).unwrap();
            let analyzer = GapAnalyzer::new(t).unwrap();
            let analysis = analyzer.analyze(&skills, &scores).unwrap();
            let weights = GapWeights::default();

            for gap in &analysis.gaps {
                assert!(gap.job_score >= t.job_relevance_threshold);
                assert!(gap.course_score < t.course_coverage_threshold);
                assert!(gap.overall_gap >= t.gap_severity_threshold);
                assert!((0.0..=1.0).contains(&gap.overall_gap));
            }

            for (name, score) in &scores {
                let expected = score.job_score >= t.job_relevance_threshold
                    && score.course_score < t.course_coverage_threshold
                    && weights.overall_gap(score) >= t.gap_severity_threshold;
                let found = analysis.gaps.iter().any(|g| &g.skill == name);
                assert_eq!(expected, found, "skill {} with thresholds {:?}", name, thresholds);
            }
        }
    }

    #[test]
    fn test_coverage_metrics() {
        let (skills, scores) = fixture(&[
            // job relevant, covered; standard relevant
            ("A", "X", 0.8, 0.9, 0.9),
            // job relevant, not covered; standard not relevant
            ("B", "X", 0.2, 0.7, 0.1),
            // not job relevant; standard relevant, not covered
            ("C", "Y", 0.1, 0.2, 0.6),
        ]);
        let analyzer = GapAnalyzer::new(ThresholdConfig::new(0.5, 0.5, 0.2).unwrap()).unwrap();
        let metrics = analyzer.analyze(&skills, &scores).unwrap().metrics;

        assert_eq!(metrics.job_relevant_count, 2);
        assert_eq!(metrics.standard_relevant_count, 2);
        assert!((metrics.market_coverage_pct - 50.0).abs() < 1e-4);
        assert!((metrics.standards_coverage_pct - 50.0).abs() < 1e-4);
        assert!((metrics.health_score - 50.0).abs() < 1e-4);
        assert_eq!(metrics.analyzed_skills, 3);
    }

    #[test]
    fn test_standards_coverage_uses_job_threshold() {
        // Standard score 0.55 is relevant with job threshold 0.5 even though
        // the coverage threshold is higher
        let (skills, scores) = fixture(&[("A", "X", 0.9, 0.1, 0.55)]);
        let analyzer = GapAnalyzer::new(ThresholdConfig::new(0.5, 0.8, 0.2).unwrap()).unwrap();
        let metrics = analyzer.analyze(&skills, &scores).unwrap().metrics;
        assert_eq!(metrics.standard_relevant_count, 1);
        assert_eq!(metrics.standards_coverage_pct, 100.0);
        assert_eq!(metrics.job_relevant_count, 0);
        assert_eq!(metrics.market_coverage_pct, 0.0);
    }

    #[test]
    fn test_empty_relevant_sets_yield_zero() {
        let (skills, scores) = fixture(&[("A", "X", 0.9, 0.1, 0.1)]);
        let analyzer = GapAnalyzer::new(ThresholdConfig::new(0.5, 0.5, 0.2).unwrap()).unwrap();
        let metrics = analyzer.analyze(&skills, &scores).unwrap().metrics;
        assert_eq!(metrics.market_coverage_pct, 0.0);
        assert_eq!(metrics.standards_coverage_pct, 0.0);
        assert!(!metrics.health_score.is_nan());
    }

    #[test]
    fn test_missing_skills_are_excluded() {
        let (mut skills, scores) = fixture(&[("A", "X", 0.1, 0.9, 0.9)]);
        skills.push(Skill::new("Missing", "X"));
        let analyzer = GapAnalyzer::new(ThresholdConfig::new(0.5, 0.5, 0.2).unwrap()).unwrap();
        let analysis = analyzer.analyze(&skills, &scores).unwrap();

        assert_eq!(analysis.excluded_skills, vec!["Missing".to_string()]);
        assert_eq!(analysis.metrics.analyzed_skills, 1);
        assert_eq!(analysis.metrics.job_relevant_count, 1);
        assert_eq!(analysis.category_coverage[0].total, 1);
    }

    #[test]
    fn test_category_coverage_omits_irrelevant_categories() {
        let (skills, scores) = fixture(&[
            ("A", "X", 0.9, 0.9, 0.1),
            ("B", "X", 0.1, 0.8, 0.1),
            ("C", "X", 0.1, 0.1, 0.1),
            ("D", "Y", 0.9, 0.1, 0.9),
        ]);
        let analyzer = GapAnalyzer::new(ThresholdConfig::new(0.5, 0.5, 0.2).unwrap()).unwrap();
        let rows = analyzer.analyze(&skills, &scores).unwrap().category_coverage;

        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.category, "X");
        assert_eq!(row.total, 3);
        assert_eq!(row.job_relevant, 2);
        assert_eq!(row.covered, 1);
        assert!((row.coverage_pct - 50.0).abs() < 1e-4);
    }

    #[test]
    fn test_empty_selection_is_rejected() {
        let analyzer = GapAnalyzer::new(ThresholdConfig::default()).unwrap();
        let result = analyzer.analyze(&[], &HashMap::new());
        assert!(matches!(result, Err(AlignerError::EmptySelection)));

        let empty = GapAnalysis::empty();
        assert!(empty.gaps.is_empty());
        assert_eq!(empty.metrics.market_coverage_pct, 0.0);
        assert_eq!(empty.metrics.standards_coverage_pct, 0.0);
    }

    #[test]
    fn test_invalid_thresholds_rejected() {
        assert!(matches!(
            ThresholdConfig::new(1.1, 0.5, 0.5),
            Err(AlignerError::InvalidThreshold { .. })
        ));
        assert!(ThresholdConfig::new(0.5, -0.01, 0.5).is_err());
        assert!(ThresholdConfig::new(0.5, 0.5, f32::NAN).is_err());

        let bad = ThresholdConfig {
            job_relevance_threshold: 0.5,
            course_coverage_threshold: 0.5,
            gap_severity_threshold: 2.0,
        };
        assert!(GapAnalyzer::new(bad).is_err());
    }

    #[test]
    fn test_invalid_scores_rejected() {
        let (skills, mut scores) = fixture(&[("A", "X", 0.1, 0.9, 0.9)]);
        scores.insert("A".to_string(), triple(0.1, 1.3, 0.9));
        let analyzer = GapAnalyzer::new(ThresholdConfig::default()).unwrap();
        assert!(matches!(
            analyzer.analyze(&skills, &scores),
            Err(AlignerError::InvalidScore { .. })
        ));
    }

    #[test]
    fn test_custom_weights() {
        let weights = GapWeights {
            job_weight: 0.5,
            standard_weight: 0.5,
        };
        let analyzer = GapAnalyzer::new(ThresholdConfig::new(0.5, 0.5, 0.0).unwrap())
            .unwrap()
            .with_weights(weights)
            .unwrap();
        let gap = analyzer.qualifies(&triple(0.0, 0.6, 0.2)).unwrap();
        assert!((gap - 0.4).abs() < 1e-6);

        let too_heavy = GapWeights {
            job_weight: 0.8,
            standard_weight: 0.4,
        };
        assert!(GapAnalyzer::new(ThresholdConfig::default())
            .unwrap()
            .with_weights(too_heavy)
            .is_err());
    }

    #[test]
    fn test_analysis_is_idempotent() {
        let (skills, scores) = fixture(&[
            ("A", "X", 0.1, 0.9, 0.6),
            ("B", "Y", 0.2, 0.8, 0.7),
            ("C", "X", 0.6, 0.6, 0.6),
        ]);
        let analyzer = GapAnalyzer::new(ThresholdConfig::default()).unwrap();
        let first = serde_json::to_string(&analyzer.analyze(&skills, &scores).unwrap()).unwrap();
        let second = serde_json::to_string(&analyzer.analyze(&skills, &scores).unwrap()).unwrap();
        assert_eq!(first, second);
    }
}
