//! Curriculum aligner library

pub mod catalog;
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod input;
pub mod llm;
pub mod output;
pub mod processing;

pub use catalog::{Skill, SkillCatalog};
pub use config::Config;
pub use context::AppContext;
pub use error::{AlignerError, Result};
