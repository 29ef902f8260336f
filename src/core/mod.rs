// Core pipeline exports
pub mod encoder;
pub mod engine;
pub mod explanation;
pub mod filters;
pub mod normalizer;
pub mod ranking;
pub mod scoring;
pub mod similarity;

pub use encoder::{standardize, CategoryEncoder, EncodedCatalog, Vocabulary, UNKNOWN_CODE};
pub use engine::{EngineConfig, RecommendationEngine};
pub use explanation::ExplanationGenerator;
pub use filters::{candidate_rows, exact_matches, matches_business_type};
pub use normalizer::{canonicalize, CleaningReport, Normalizer};
pub use ranking::{RankedRow, RankingEngine, RankingMethod, UserVector};
pub use scoring::{QualityClassifier, QualityThresholds};
