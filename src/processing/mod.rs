//! Scoring, gap analysis and the analysis engine

pub mod analyzer;
pub mod embedding_manager;
pub mod embeddings;
pub mod frequency;
pub mod gap_analyzer;
pub mod scores;
pub mod similarity;
pub mod static_table;
