use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use crate::core::normalizer::CleaningReport;
use crate::models::domain::{MatchQuality, ScoredRecommendation};

/// Aggregate view over one response's recommendations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationSummary {
    #[serde(rename = "totalRecommendations")]
    pub total_recommendations: usize,
    #[serde(rename = "averageMatchScore")]
    pub average_match_score: f64,
    #[serde(rename = "qualityDistribution")]
    pub quality_distribution: BTreeMap<MatchQuality, usize>,
    #[serde(rename = "topRecommendation")]
    pub top_recommendation: Option<String>,
    pub insight: String,
}

/// Response for the recommendations endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResponse {
    #[serde(rename = "requestId")]
    pub request_id: String,
    pub method: String,
    pub recommendations: Vec<ScoredRecommendation>,
    pub summary: RecommendationSummary,
}

/// Descriptive statistics about the loaded catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogStatistics {
    #[serde(rename = "totalServices")]
    pub total_services: usize,
    #[serde(rename = "originalServices")]
    pub original_services: usize,
    #[serde(rename = "businessTypes")]
    pub business_types: usize,
    #[serde(rename = "priceCategories")]
    pub price_categories: BTreeMap<String, usize>,
    #[serde(rename = "languageSupport")]
    pub language_support: BTreeMap<String, usize>,
    pub locations: usize,
    #[serde(rename = "cleaningReport")]
    pub cleaning_report: CleaningReport,
}

/// Catalog reload response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReloadResponse {
    pub success: bool,
    pub report: CleaningReport,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    #[serde(rename = "catalogSize")]
    pub catalog_size: usize,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<String>,
}
