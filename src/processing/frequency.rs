//! Skill mention counts in course outcomes versus job postings

use crate::catalog::Skill;
use crate::error::{AlignerError, Result};
use aho_corasick::{AhoCorasick, MatchKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillFrequency {
    pub skill: String,
    pub course_count: usize,
    pub job_count: usize,
}

/// Case-insensitive, whole-word matcher over catalog skill names
pub struct SkillMatcher {
    automaton: AhoCorasick,
    skills: Vec<String>,
}

impl SkillMatcher {
    pub fn new(skills: &[Skill]) -> Result<Self> {
        let names: Vec<String> = skills.iter().map(|s| s.name.clone()).collect();
        let automaton = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(MatchKind::LeftmostLongest)
            .build(&names)
            .map_err(|e| AlignerError::Processing(format!("Failed to build skill matcher: {}", e)))?;

        Ok(Self {
            automaton,
            skills: names,
        })
    }

    /// Mentions of each skill across `texts`, indexed like the catalog
    pub fn count<'a>(&self, texts: impl IntoIterator<Item = &'a str>) -> Vec<usize> {
        let mut counts = vec![0; self.skills.len()];
        for text in texts {
            for mat in self.automaton.find_iter(text) {
                if is_word_boundary(text, mat.start(), mat.end()) {
                    counts[mat.pattern().as_usize()] += 1;
                }
            }
        }
        counts
    }
}

fn is_word_boundary(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
}

/// Skills mentioned in either source, each once, in catalog order
pub fn skill_frequencies(
    skills: &[Skill],
    course_texts: &[&str],
    job_texts: &[&str],
) -> Result<Vec<SkillFrequency>> {
    if skills.is_empty() {
        return Ok(Vec::new());
    }

    let matcher = SkillMatcher::new(skills)?;
    let course_counts = matcher.count(course_texts.iter().copied());
    let job_counts = matcher.count(job_texts.iter().copied());

    Ok(skills
        .iter()
        .zip(course_counts.into_iter().zip(job_counts))
        .filter(|(_, (course_count, job_count))| course_count + job_count > 0)
        .map(|(skill, (course_count, job_count))| SkillFrequency {
            skill: skill.name.clone(),
            course_count,
            job_count,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skills(names: &[&str]) -> Vec<Skill> {
        names.iter().map(|n| Skill::new(*n, "Test")).collect()
    }

    #[test]
    fn test_counts_case_insensitive_whole_words() {
        let skills = skills(&["Java", "JavaScript", "SQL", "machine learning"]);
        let freqs = skill_frequencies(
            &skills,
            &["Learn java and SQL. Apply Machine Learning."],
            &["JavaScript developer", "Javanese speaker", "NoSQL stores", "sql, SQL"],
        )
        .unwrap();

        assert_eq!(
            freqs,
            vec![
                SkillFrequency { skill: "Java".into(), course_count: 1, job_count: 0 },
                SkillFrequency { skill: "JavaScript".into(), course_count: 0, job_count: 1 },
                SkillFrequency { skill: "SQL".into(), course_count: 1, job_count: 2 },
                SkillFrequency { skill: "machine learning".into(), course_count: 1, job_count: 0 },
            ]
        );
    }

    #[test]
    fn test_symbol_skills_match() {
        let skills = skills(&["C++", "Node.js"]);
        let freqs = skill_frequencies(&skills, &["Systems in C++"], &["Node.js, C++ and Go"]).unwrap();
        assert_eq!(freqs[0].course_count, 1);
        assert_eq!(freqs[0].job_count, 1);
        assert_eq!(freqs[1].job_count, 1);
    }

    #[test]
    fn test_unmentioned_skills_omitted() {
        let skills = skills(&["Rust", "Python"]);
        let freqs = skill_frequencies(&skills, &["Python"], &[]).unwrap();
        assert_eq!(freqs.len(), 1);
        assert_eq!(freqs[0].skill, "Python");
        assert_eq!(freqs[0].job_count, 0);
    }
}
