//! Skill catalog: the fixed, ordered set of skills tracked across courses,
//! job postings and standards, each belonging to exactly one category.

use crate::error::{AlignerError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    pub category: String,
}

impl Skill {
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillCatalog {
    skills: Vec<Skill>,
}

#[derive(Deserialize)]
struct CatalogFile {
    skills: Vec<Skill>,
}

const DEFAULT_CATALOG: &[(&str, &str)] = &[
    ("Python", "Programming Languages"),
    ("Java", "Programming Languages"),
    ("C++", "Programming Languages"),
    ("JavaScript", "Programming Languages"),
    ("React", "Web Development"),
    ("Node.js", "Web Development"),
    ("HTML", "Web Development"),
    ("CSS", "Web Development"),
    ("SQL", "Data & Databases"),
    ("MongoDB", "Data & Databases"),
    ("PostgreSQL", "Data & Databases"),
    ("Spark", "Data & Databases"),
    ("Tableau", "Data & Databases"),
    ("AWS", "Cloud & DevOps"),
    ("Kubernetes", "Cloud & DevOps"),
    ("Docker", "Cloud & DevOps"),
    ("Git", "Cloud & DevOps"),
    ("Linux", "Cloud & DevOps"),
    ("cloud", "Cloud & DevOps"),
    ("TensorFlow", "AI & Machine Learning"),
    ("machine learning", "AI & Machine Learning"),
    ("NLP", "AI & Machine Learning"),
    ("OpenCV", "AI & Machine Learning"),
    ("Wireshark", "Security & Networking"),
    ("encryption", "Security & Networking"),
    ("Solidity", "Emerging Technologies"),
    ("ROS", "Emerging Technologies"),
    ("Agile", "Professional Practice"),
    ("Scrum", "Professional Practice"),
];

impl Default for SkillCatalog {
    fn default() -> Self {
        Self {
            skills: DEFAULT_CATALOG
                .iter()
                .map(|(name, category)| Skill::new(*name, *category))
                .collect(),
        }
    }
}

impl SkillCatalog {
    /// Build a catalog, rejecting duplicate or blank skill names
    pub fn new(skills: Vec<Skill>) -> Result<Self> {
        let mut seen = HashSet::new();
        for skill in &skills {
            if skill.name.trim().is_empty() || skill.category.trim().is_empty() {
                return Err(AlignerError::Configuration(
                    "Skill names and categories must not be blank".to_string(),
                ));
            }
            if !seen.insert(skill.name.to_lowercase()) {
                return Err(AlignerError::Configuration(format!(
                    "Duplicate skill in catalog: {}",
                    skill.name
                )));
            }
        }
        Ok(Self { skills })
    }

    /// Load a catalog from a TOML file with `[[skills]]` entries
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let file: CatalogFile = toml::from_str(&content).map_err(|e| {
            AlignerError::Configuration(format!(
                "Failed to parse skill catalog {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::new(file.skills)
    }

    pub fn skills(&self) -> &[Skill] {
        &self.skills
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Skill> {
        self.skills.iter().find(|s| s.name == name)
    }

    /// Categories in order of first appearance
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = Vec::new();
        for skill in &self.skills {
            if !categories.contains(&skill.category) {
                categories.push(skill.category.clone());
            }
        }
        categories
    }

    pub fn skills_in_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Skill> {
        self.skills.iter().filter(move |s| s.category == category)
    }

    /// Restrict the catalog to the given categories, keeping catalog order.
    /// An empty filter selects every category. Category names match
    /// case-insensitively; unknown names are rejected.
    pub fn select(&self, categories: &[String]) -> Result<Vec<Skill>> {
        if categories.is_empty() {
            return Ok(self.skills.clone());
        }

        let known = self.categories();
        let mut wanted = HashSet::new();
        for requested in categories {
            let matched = known
                .iter()
                .find(|c| c.eq_ignore_ascii_case(requested.trim()))
                .ok_or_else(|| {
                    AlignerError::InvalidInput(format!(
                        "Unknown skill category: {}. Available: {}",
                        requested,
                        known.join(", ")
                    ))
                })?;
            wanted.insert(matched.clone());
        }

        Ok(self
            .skills
            .iter()
            .filter(|s| wanted.contains(&s.category))
            .cloned()
            .collect())
    }
}
