//! Per-skill similarity scores produced by the similarity providers

use crate::error::{AlignerError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Scores for one (course, skill) pair. All values lie in [0, 1] and are
/// independent of each other.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreTriple {
    pub course_score: f32,
    pub job_score: f32,
    pub standard_score: f32,
}

impl ScoreTriple {
    /// Build a validated triple
    pub fn new(skill: &str, course_score: f32, job_score: f32, standard_score: f32) -> Result<Self> {
        let triple = Self {
            course_score,
            job_score,
            standard_score,
        };
        triple.validate(skill)?;
        Ok(triple)
    }

    /// Build a triple from raw similarity values, clamping into [0, 1].
    /// Non-finite values collapse to 0.
    pub fn clamped(course_score: f32, job_score: f32, standard_score: f32) -> Self {
        Self {
            course_score: clamp_unit(course_score),
            job_score: clamp_unit(job_score),
            standard_score: clamp_unit(standard_score),
        }
    }

    pub fn validate(&self, skill: &str) -> Result<()> {
        for (field, value) in [
            ("course_score", self.course_score),
            ("job_score", self.job_score),
            ("standard_score", self.standard_score),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(AlignerError::InvalidScore {
                    skill: skill.to_string(),
                    field,
                    value,
                });
            }
        }
        Ok(())
    }
}

pub fn clamp_unit(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Mean similarity between a course and whole corpora, in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorpusAlignment {
    pub market_alignment_pct: f32,
    pub standards_alignment_pct: f32,
}

/// Scores a provider returned for one course
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseScores {
    /// Course name as requested by the caller
    pub requested_course: String,
    /// Course whose data was used
    pub resolved_course: String,
    pub fell_back: bool,
    pub scores: HashMap<String, ScoreTriple>,
    pub corpus_alignment: Option<CorpusAlignment>,
}

impl CourseScores {
    pub fn get(&self, skill: &str) -> Option<&ScoreTriple> {
        self.scores.get(skill)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_out_of_range() {
        let result = ScoreTriple::new("Python", 0.5, 1.2, 0.3);
        match result {
            Err(AlignerError::InvalidScore { skill, field, .. }) => {
                assert_eq!(skill, "Python");
                assert_eq!(field, "job_score");
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(ScoreTriple::new("Python", f32::NAN, 0.5, 0.5).is_err());
    }

    #[test]
    fn test_boundaries_are_valid() {
        assert!(ScoreTriple::new("Git", 0.0, 1.0, 0.0).is_ok());
    }

    #[test]
    fn test_clamped_bounds_raw_similarity() {
        let triple = ScoreTriple::clamped(-0.2, 1.0001, f32::NAN);
        assert_eq!(triple.course_score, 0.0);
        assert_eq!(triple.job_score, 1.0);
        assert_eq!(triple.standard_score, 0.0);
        assert!(triple.validate("any").is_ok());
    }
}
