//! CSV datasets: course outcomes, job postings and standard competencies.
//!
//! Loading never fails. A missing or empty file is reported as
//! `DataUnavailable`, logged, and replaced with the built-in sample data for
//! that source. A missing column yields the configured placeholder.

use crate::config::DataConfig;
use crate::error::{AlignerError, Result};
use crate::input::mock::{MOCK_COURSE_OUTCOMES, MOCK_JOB_DESCRIPTIONS, MOCK_STANDARD_COMPETENCIES};
use csv::{ReaderBuilder, Trim};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const COURSE_NAME_COLUMN: &str = "Course_Name";
pub const OUTCOME_COLUMN: &str = "Outcome";
pub const DESCRIPTION_COLUMN: &str = "Description";
pub const COMPETENCY_COLUMN: &str = "Competency";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseOutcome {
    pub course_name: String,
    pub outcome: String,
}

/// Where each dataset came from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetOrigin {
    pub courses_mocked: bool,
    pub jobs_mocked: bool,
    pub standards_mocked: bool,
}

#[derive(Debug, Clone)]
pub struct Datasets {
    pub courses: Vec<CourseOutcome>,
    pub job_descriptions: Vec<String>,
    pub standard_competencies: Vec<String>,
    pub origin: DatasetOrigin,
}

impl Datasets {
    pub fn load(config: &DataConfig) -> Self {
        let placeholder = config.placeholder.as_str();
        let mut origin = DatasetOrigin::default();

        let courses = match read_columns(
            &config.courses_path,
            &[COURSE_NAME_COLUMN, OUTCOME_COLUMN],
            placeholder,
        ) {
            Ok(rows) => rows
                .into_iter()
                .map(|mut row| {
                    let outcome = row.pop().unwrap_or_default();
                    let course_name = row.pop().unwrap_or_default();
                    CourseOutcome { course_name, outcome }
                })
                .collect(),
            Err(e) => {
                warn!("{}; using sample course outcomes", e);
                origin.courses_mocked = true;
                mock_courses()
            }
        };

        let job_descriptions = match read_column(&config.jobs_path, DESCRIPTION_COLUMN, placeholder) {
            Ok(values) => values,
            Err(e) => {
                warn!("{}; using sample job postings", e);
                origin.jobs_mocked = true;
                to_strings(MOCK_JOB_DESCRIPTIONS)
            }
        };

        let mut standard_competencies = Vec::new();
        for path in &config.standards_paths {
            match read_column(path, COMPETENCY_COLUMN, placeholder) {
                Ok(values) => standard_competencies.extend(values),
                Err(e) => warn!("{}; skipping", e),
            }
        }
        if standard_competencies.is_empty() {
            warn!("No standards file could be read; using sample competencies");
            origin.standards_mocked = true;
            standard_competencies = to_strings(MOCK_STANDARD_COMPETENCIES);
        }

        info!(
            "Loaded {} course outcomes, {} job postings, {} competencies",
            courses.len(),
            job_descriptions.len(),
            standard_competencies.len()
        );

        Self {
            courses,
            job_descriptions,
            standard_competencies,
            origin,
        }
    }

    /// Built-in sample data for every source
    pub fn mock() -> Self {
        Self {
            courses: mock_courses(),
            job_descriptions: to_strings(MOCK_JOB_DESCRIPTIONS),
            standard_competencies: to_strings(MOCK_STANDARD_COMPETENCIES),
            origin: DatasetOrigin {
                courses_mocked: true,
                jobs_mocked: true,
                standards_mocked: true,
            },
        }
    }

    /// Distinct course names in order of first appearance
    pub fn course_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for row in &self.courses {
            if !names.contains(&row.course_name) {
                names.push(row.course_name.clone());
            }
        }
        names
    }

    /// Outcomes of a course, matched case-insensitively
    pub fn outcomes_for(&self, course_name: &str) -> Vec<&str> {
        self.courses
            .iter()
            .filter(|row| row.course_name.eq_ignore_ascii_case(course_name.trim()))
            .map(|row| row.outcome.as_str())
            .collect()
    }

    pub fn has_course(&self, course_name: &str) -> bool {
        !self.outcomes_for(course_name).is_empty()
    }
}

fn mock_courses() -> Vec<CourseOutcome> {
    MOCK_COURSE_OUTCOMES
        .iter()
        .map(|(course_name, outcome)| CourseOutcome {
            course_name: course_name.to_string(),
            outcome: outcome.to_string(),
        })
        .collect()
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

pub fn read_column(path: &Path, column: &str, placeholder: &str) -> Result<Vec<String>> {
    Ok(read_columns(path, &[column], placeholder)?
        .into_iter()
        .filter_map(|mut row| row.pop())
        .collect())
}

/// Read the named columns of every record. Columns absent from the header
/// are filled with `placeholder`.
pub fn read_columns(path: &Path, columns: &[&str], placeholder: &str) -> Result<Vec<Vec<String>>> {
    if !path.is_file() {
        return Err(AlignerError::DataUnavailable(format!(
            "{} not found",
            path.display()
        )));
    }

    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    let indices: Vec<Option<usize>> = columns
        .iter()
        .map(|column| {
            let index = headers.iter().position(|h| h == *column);
            if index.is_none() {
                warn!(
                    "Column '{}' missing from {}; using \"{}\"",
                    column,
                    path.display(),
                    placeholder
                );
            }
            index
        })
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row = indices
            .iter()
            .map(|index| {
                index
                    .and_then(|i| record.get(i))
                    .filter(|value| !value.is_empty())
                    .unwrap_or(placeholder)
                    .to_string()
            })
            .collect();
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(AlignerError::DataUnavailable(format!(
            "{} contains no records",
            path.display()
        )));
    }

    debug!("Read {} records from {}", rows.len(), path.display());
    Ok(rows)
}
