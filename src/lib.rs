//! Service Recommender - explainable matching of business services
//!
//! This library provides the recommendation pipeline: catalog normalization,
//! categorical encoding, multi-method ranking, match-quality classification
//! and natural-language explanations.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{EngineConfig, RankingMethod, RecommendationEngine};
pub use error::RecommendError;
pub use models::{
    RawServiceRecord, RecommendationRequest, RecommendationResponse, ScoredRecommendation,
    ServiceRecord, UserPreferences,
};
pub use services::EngineHandle;
