//! Precomputed similarity table keyed by course name

use crate::error::{AlignerError, Result};
use crate::processing::scores::clamp_unit;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Course-independent relevance of a skill
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketScores {
    pub job_score: f32,
    pub standard_score: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityTable {
    /// Course score of a skill the course row does not list
    #[serde(default)]
    pub baseline_course_score: f32,
    pub market: BTreeMap<String, MarketScores>,
    pub courses: BTreeMap<String, BTreeMap<String, f32>>,
}

const MARKET: &[(&str, f32, f32)] = &[
    ("Python", 0.92, 0.85),
    ("Java", 0.78, 0.72),
    ("C++", 0.62, 0.60),
    ("JavaScript", 0.84, 0.55),
    ("React", 0.74, 0.30),
    ("Node.js", 0.68, 0.28),
    ("HTML", 0.58, 0.52),
    ("CSS", 0.55, 0.48),
    ("SQL", 0.88, 0.80),
    ("MongoDB", 0.52, 0.25),
    ("PostgreSQL", 0.60, 0.35),
    ("Spark", 0.57, 0.22),
    ("Tableau", 0.45, 0.18),
    ("AWS", 0.86, 0.40),
    ("Kubernetes", 0.72, 0.25),
    ("Docker", 0.80, 0.30),
    ("Git", 0.83, 0.75),
    ("Linux", 0.70, 0.62),
    ("cloud", 0.81, 0.66),
    ("TensorFlow", 0.63, 0.30),
    ("machine learning", 0.79, 0.68),
    ("NLP", 0.54, 0.33),
    ("OpenCV", 0.41, 0.20),
    ("Wireshark", 0.38, 0.45),
    ("encryption", 0.56, 0.71),
    ("Solidity", 0.24, 0.08),
    ("ROS", 0.27, 0.12),
    ("Agile", 0.75, 0.64),
    ("Scrum", 0.61, 0.50),
];

const COURSES: &[(&str, &[(&str, f32)])] = &[
    (
        "Introduction to Programming",
        &[
            ("Python", 0.88),
            ("Git", 0.74),
            ("Java", 0.35),
            ("C++", 0.30),
            ("JavaScript", 0.28),
            ("Linux", 0.32),
            ("Agile", 0.15),
        ],
    ),
    (
        "Data Structures and Algorithms",
        &[("Java", 0.86), ("C++", 0.82), ("Python", 0.55), ("Git", 0.30)],
    ),
    (
        "Database Systems",
        &[
            ("SQL", 0.93),
            ("PostgreSQL", 0.85),
            ("MongoDB", 0.72),
            ("Python", 0.35),
            ("Spark", 0.30),
            ("cloud", 0.25),
        ],
    ),
    (
        "Web Development",
        &[
            ("HTML", 0.91),
            ("CSS", 0.89),
            ("JavaScript", 0.90),
            ("React", 0.80),
            ("Node.js", 0.76),
            ("Git", 0.50),
            ("MongoDB", 0.40),
            ("SQL", 0.35),
        ],
    ),
    (
        "Machine Learning",
        &[
            ("Python", 0.85),
            ("machine learning", 0.94),
            ("TensorFlow", 0.81),
            ("NLP", 0.73),
            ("OpenCV", 0.71),
            ("Spark", 0.25),
        ],
    ),
    (
        "Cloud Computing",
        &[
            ("cloud", 0.92),
            ("AWS", 0.84),
            ("Docker", 0.80),
            ("Linux", 0.78),
            ("Kubernetes", 0.45),
            ("Git", 0.40),
        ],
    ),
    (
        "Cybersecurity Fundamentals",
        &[
            ("Wireshark", 0.87),
            ("encryption", 0.90),
            ("Linux", 0.65),
            ("Python", 0.40),
        ],
    ),
];

impl Default for SimilarityTable {
    fn default() -> Self {
        Self {
            baseline_course_score: 0.1,
            market: MARKET
                .iter()
                .map(|(skill, job_score, standard_score)| {
                    (
                        skill.to_string(),
                        MarketScores {
                            job_score: *job_score,
                            standard_score: *standard_score,
                        },
                    )
                })
                .collect(),
            courses: COURSES
                .iter()
                .map(|(course, rows)| {
                    (
                        course.to_string(),
                        rows.iter().map(|(skill, score)| (skill.to_string(), *score)).collect(),
                    )
                })
                .collect(),
        }
    }
}

impl SimilarityTable {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let table: SimilarityTable = serde_json::from_str(&content)?;
        if table.market.is_empty() {
            return Err(AlignerError::Configuration(format!(
                "Similarity table {} has no market scores",
                path.display()
            )));
        }
        Ok(table)
    }

    /// Course row whose name matches case-insensitively
    pub fn course(&self, name: &str) -> Option<(&str, &BTreeMap<String, f32>)> {
        let name = name.trim();
        self.courses
            .iter()
            .find(|(course, _)| course.eq_ignore_ascii_case(name))
            .map(|(course, row)| (course.as_str(), row))
    }

    pub fn course_names(&self) -> Vec<&str> {
        self.courses.keys().map(String::as_str).collect()
    }

    /// Course score for a skill, clamped into [0, 1]
    pub fn course_score(&self, row: &BTreeMap<String, f32>, skill: &str) -> f32 {
        clamp_unit(row.get(skill).copied().unwrap_or(self.baseline_course_score))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_builtin_table_is_in_range() {
        let table = SimilarityTable::default();
        assert_eq!(table.market.len(), 29);
        for scores in table.market.values() {
            assert!((0.0..=1.0).contains(&scores.job_score));
            assert!((0.0..=1.0).contains(&scores.standard_score));
        }
        for row in table.courses.values() {
            for skill in row.keys() {
                assert!(table.market.contains_key(skill), "unknown skill {}", skill);
            }
        }
    }

    #[test]
    fn test_course_lookup_is_case_insensitive() {
        let table = SimilarityTable::default();
        let (name, row) = table.course("  database SYSTEMS ").unwrap();
        assert_eq!(name, "Database Systems");
        assert_eq!(table.course_score(row, "SQL"), 0.93);
        assert_eq!(table.course_score(row, "ROS"), 0.1);
        assert!(table.course("Underwater Basket Weaving").is_none());
    }

    #[test]
    fn test_load_from_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("table.json");
        std::fs::write(
            &path,
            r#"{
                "market": { "Rust": { "job_score": 0.7, "standard_score": 0.4 } },
                "courses": { "Systems": { "Rust": 1.5 } }
            }"#,
        )
        .unwrap();

        let table = SimilarityTable::from_file(&path).unwrap();
        assert_eq!(table.baseline_course_score, 0.0);
        let (_, row) = table.course("systems").unwrap();
        assert_eq!(table.course_score(row, "Rust"), 1.0);
    }
}
