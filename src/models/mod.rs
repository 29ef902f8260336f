// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Attribute, AttributeWeights, MatchQuality, RawServiceRecord, ScoredRecommendation, ServiceRecord, UserPreferences};
pub use requests::{ExplainServiceRequest, RecommendationRequest};
pub use responses::{CatalogStatistics, ErrorResponse, HealthResponse, RecommendationResponse, RecommendationSummary, ReloadResponse};
