use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::UserPreferences;

/// Request for a ranked shortlist of services
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecommendationRequest {
    #[validate(nested)]
    pub preferences: UserPreferences,
    #[validate(range(min = 1, message = "count must be a positive integer"))]
    #[serde(default)]
    pub count: Option<usize>,
    /// One of `weighted`, `cosine`, `knn`; the configured default when absent
    #[serde(default)]
    pub method: Option<String>,
}

impl RecommendationRequest {
    pub fn new(preferences: UserPreferences) -> Self {
        Self {
            preferences,
            count: None,
            method: None,
        }
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }
}

/// Request to explain how one catalog entry matches a set of preferences
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ExplainServiceRequest {
    #[validate(length(min = 1, message = "serviceId is required"))]
    #[serde(rename = "serviceId", alias = "service_id")]
    pub service_id: String,
    #[validate(nested)]
    pub preferences: UserPreferences,
}
