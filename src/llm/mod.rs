//! Recommendation backends: local templates, simulated delay, hosted model

pub mod client;
pub mod prompts;
pub mod recommender;

pub use recommender::{
    RecommendationRequest, RecommendationRequester, RecommendationSet, RecommendationSource,
    RecommendationTrace, Recommender,
};
