//! Similarity providers: sources of per-skill score triples for a course

use crate::catalog::Skill;
use crate::config::ProviderKind;
use crate::error::{AlignerError, Result};
use crate::input::Datasets;
use crate::processing::embeddings::{max_similarity, mean_embedding, mean_similarity, TextEncoder};
use crate::processing::scores::{clamp_unit, CorpusAlignment, CourseScores, ScoreTriple};
use crate::processing::static_table::SimilarityTable;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::time::Instant;

pub const CUSTOM_COURSE_NAME: &str = "Custom Course";

/// What to score: a named course or free-text outcomes
#[derive(Debug, Clone, PartialEq)]
pub enum CourseQuery {
    Named(String),
    Custom { outcome: String },
}

impl CourseQuery {
    pub fn display_name(&self) -> &str {
        match self {
            CourseQuery::Named(name) => name,
            CourseQuery::Custom { .. } => CUSTOM_COURSE_NAME,
        }
    }
}

pub trait SimilarityProvider {
    /// Scores for every skill the provider knows about, each in [0, 1]
    fn get_scores(&self, query: &CourseQuery) -> Result<CourseScores>;

    fn kind(&self) -> ProviderKind;
}

/// Lookup in a precomputed table; unknown courses use the default course
pub struct StaticTableProvider {
    table: SimilarityTable,
    default_course: String,
}

impl StaticTableProvider {
    pub fn new(table: SimilarityTable, default_course: &str) -> Result<Self> {
        if table.course(default_course).is_none() {
            return Err(AlignerError::Configuration(format!(
                "Default course '{}' is not in the similarity table",
                default_course
            )));
        }
        Ok(Self {
            table,
            default_course: default_course.to_string(),
        })
    }

    pub fn course_names(&self) -> Vec<&str> {
        self.table.course_names()
    }
}

impl SimilarityProvider for StaticTableProvider {
    fn get_scores(&self, query: &CourseQuery) -> Result<CourseScores> {
        let requested = query.display_name().to_string();
        let found = match query {
            CourseQuery::Named(name) => self.table.course(name),
            CourseQuery::Custom { .. } => None,
        };

        let (resolved, row, fell_back) = match found {
            Some((name, row)) => (name, row, false),
            None => {
                let (name, row) = self.table.course(&self.default_course).ok_or_else(|| {
                    AlignerError::Configuration(format!(
                        "Default course '{}' is not in the similarity table",
                        self.default_course
                    ))
                })?;
                info!("No table entry for '{}'; using '{}'", requested, name);
                (name, row, true)
            }
        };

        let scores = self
            .table
            .market
            .iter()
            .map(|(skill, market)| {
                let triple = ScoreTriple::clamped(
                    self.table.course_score(row, skill),
                    market.job_score,
                    market.standard_score,
                );
                (skill.clone(), triple)
            })
            .collect();

        Ok(CourseScores {
            requested_course: requested,
            resolved_course: resolved.to_string(),
            fell_back,
            scores,
            corpus_alignment: None,
        })
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Static
    }
}

/// Max cosine similarity between skill and corpus embeddings
pub struct EmbeddingProvider {
    encoder: Box<dyn TextEncoder>,
    skill_names: Vec<String>,
    skill_embeddings: Vec<Vec<f32>>,
    job_embeddings: Vec<Vec<f32>>,
    standard_embeddings: Vec<Vec<f32>>,
    /// (job, standard) per skill, computed once
    market_scores: Vec<(f32, f32)>,
    course_outcomes: HashMap<String, Vec<String>>,
    default_course: String,
}

impl EmbeddingProvider {
    pub fn new(
        encoder: Box<dyn TextEncoder>,
        skills: &[Skill],
        datasets: &Datasets,
        default_course: &str,
    ) -> Result<Self> {
        let start_time = Instant::now();
        let skill_names: Vec<String> = skills.iter().map(|s| s.name.clone()).collect();

        let skill_embeddings = encoder.encode(&skill_names);
        let job_embeddings = encoder.encode(&datasets.job_descriptions);
        let standard_embeddings = encoder.encode(&datasets.standard_competencies);

        let mut market_scores = Vec::with_capacity(skill_names.len());
        for embedding in &skill_embeddings {
            market_scores.push((
                max_similarity(embedding, &job_embeddings)?,
                max_similarity(embedding, &standard_embeddings)?,
            ));
        }

        let mut course_outcomes: HashMap<String, Vec<String>> = HashMap::new();
        for row in &datasets.courses {
            course_outcomes
                .entry(row.course_name.to_lowercase())
                .or_default()
                .push(row.outcome.clone());
        }

        info!(
            "Embedded {} skills, {} job postings and {} competencies with {} in {:.2?}",
            skill_names.len(),
            job_embeddings.len(),
            standard_embeddings.len(),
            encoder.model_name(),
            start_time.elapsed()
        );

        Ok(Self {
            encoder,
            skill_names,
            skill_embeddings,
            job_embeddings,
            standard_embeddings,
            market_scores,
            course_outcomes,
            default_course: default_course.to_string(),
        })
    }

    pub fn model_name(&self) -> &str {
        self.encoder.model_name()
    }

    fn resolve_course(&self, query: &CourseQuery) -> Result<(String, Vec<String>, bool)> {
        match query {
            CourseQuery::Custom { outcome } => {
                Ok((CUSTOM_COURSE_NAME.to_string(), vec![outcome.clone()], false))
            }
            CourseQuery::Named(name) => {
                if let Some(outcomes) = self.course_outcomes.get(&name.trim().to_lowercase()) {
                    return Ok((name.clone(), outcomes.clone(), false));
                }
                warn!("No outcomes for '{}'; using '{}'", name, self.default_course);
                let outcomes = self
                    .course_outcomes
                    .get(&self.default_course.to_lowercase())
                    .ok_or_else(|| {
                        AlignerError::InvalidInput(format!(
                            "Unknown course '{}' and default course '{}' has no outcomes",
                            name, self.default_course
                        ))
                    })?;
                Ok((self.default_course.clone(), outcomes.clone(), true))
            }
        }
    }

    fn corpus_alignment(&self, course_embeddings: &[Vec<f32>]) -> Result<Option<CorpusAlignment>> {
        let Some(mean) = mean_embedding(course_embeddings) else {
            return Ok(None);
        };
        let to_pct = |similarity: f32| clamp_unit(similarity) * 100.0;
        Ok(Some(CorpusAlignment {
            market_alignment_pct: to_pct(mean_similarity(&mean, &self.job_embeddings)?),
            standards_alignment_pct: to_pct(mean_similarity(&mean, &self.standard_embeddings)?),
        }))
    }
}

impl SimilarityProvider for EmbeddingProvider {
    fn get_scores(&self, query: &CourseQuery) -> Result<CourseScores> {
        let (resolved, outcomes, fell_back) = self.resolve_course(query)?;
        let course_embeddings = self.encoder.encode(&outcomes);

        let mut scores = HashMap::with_capacity(self.skill_names.len());
        for ((skill, embedding), (job, standard)) in self
            .skill_names
            .iter()
            .zip(&self.skill_embeddings)
            .zip(&self.market_scores)
        {
            let course = max_similarity(embedding, &course_embeddings)?;
            scores.insert(skill.clone(), ScoreTriple::clamped(course, *job, *standard));
        }

        debug!("Computed {} score triples for '{}'", scores.len(), resolved);

        Ok(CourseScores {
            requested_course: query.display_name().to_string(),
            resolved_course: resolved,
            fell_back,
            scores,
            corpus_alignment: self.corpus_alignment(&course_embeddings)?,
        })
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Computed
    }
}

/// Provider chosen by configuration
pub enum ScoreSource {
    Static(StaticTableProvider),
    Computed(EmbeddingProvider),
}

impl ScoreSource {
    pub fn embedding_model(&self) -> Option<&str> {
        match self {
            ScoreSource::Static(_) => None,
            ScoreSource::Computed(provider) => Some(provider.model_name()),
        }
    }
}

impl SimilarityProvider for ScoreSource {
    fn get_scores(&self, query: &CourseQuery) -> Result<CourseScores> {
        match self {
            ScoreSource::Static(provider) => provider.get_scores(query),
            ScoreSource::Computed(provider) => provider.get_scores(query),
        }
    }

    fn kind(&self) -> ProviderKind {
        match self {
            ScoreSource::Static(provider) => provider.kind(),
            ScoreSource::Computed(provider) => provider.kind(),
        }
    }
}
