use crate::core::filters::exact_matches;
use crate::error::RecommendError;
use crate::models::{Attribute, MatchQuality, ServiceRecord, UserPreferences};
use serde::{Deserialize, Serialize};

/// Largest bonus granted when every attribute matches literally
pub const EXACT_MATCH_BONUS: f64 = 0.2;

/// Lower bounds of the High and Medium tiers (inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityThresholds {
    pub high: f64,
    pub medium: f64,
}

impl QualityThresholds {
    pub fn validate(&self) -> Result<(), RecommendError> {
        let in_range = |t: f64| (0.0..=1.0).contains(&t);
        if !in_range(self.high) || !in_range(self.medium) || self.medium > self.high {
            return Err(RecommendError::Configuration(format!(
                "quality thresholds must satisfy 0 <= medium ({}) <= high ({}) <= 1",
                self.medium, self.high
            )));
        }
        Ok(())
    }
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            high: 0.75,
            medium: 0.50,
        }
    }
}

/// Turns a raw similarity into a bounded match score and a quality tier
///
/// Scoring formula:
/// match_score = clamp(raw + (exact_matches / attribute_count) * 0.2, 0, 1)
///
/// The bonus rewards literal agreement on top of whatever the ranking
/// method measured. Method ranges are not re-normalized before the bonus.
#[derive(Debug, Clone)]
pub struct QualityClassifier {
    attributes: Vec<Attribute>,
    thresholds: QualityThresholds,
}

impl QualityClassifier {
    pub fn new(attributes: Vec<Attribute>, thresholds: QualityThresholds) -> Self {
        Self {
            attributes,
            thresholds,
        }
    }

    pub fn thresholds(&self) -> &QualityThresholds {
        &self.thresholds
    }

    /// Bounded match score for one record
    pub fn score(
        &self,
        preferences: &UserPreferences,
        record: &ServiceRecord,
        raw_similarity: f64,
    ) -> f64 {
        let total = self.attributes.len();
        let bonus = if total == 0 {
            0.0
        } else {
            let matched = exact_matches(record, preferences, &self.attributes).len();
            (matched as f64 / total as f64) * EXACT_MATCH_BONUS
        };

        (raw_similarity + bonus).clamp(0.0, 1.0)
    }

    /// Tier for a match score, thresholds checked from the top down
    pub fn classify(&self, match_score: f64) -> MatchQuality {
        if match_score >= self.thresholds.high {
            MatchQuality::High
        } else if match_score >= self.thresholds.medium {
            MatchQuality::Medium
        } else {
            MatchQuality::Low
        }
    }
}

impl Default for QualityClassifier {
    fn default() -> Self {
        Self::new(Attribute::ALL.to_vec(), QualityThresholds::default())
    }
}
