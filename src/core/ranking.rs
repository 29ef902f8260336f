use crate::core::encoder::EncodedCatalog;
use crate::core::filters::candidate_rows;
use crate::core::similarity::{
    cosine_with_norms, distance_to_similarity, euclidean_distance, norm, to_vector,
};
use crate::error::RecommendError;
use crate::models::{AttributeWeights, UserPreferences};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Interchangeable similarity methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankingMethod {
    /// Sum of weights of attributes whose codes agree; in [0, 1]
    Weighted,
    /// Cosine of the angle between coded vectors; in [-1, 1]
    Cosine,
    /// `1 / (1 + euclidean distance)` between coded vectors; in (0, 1]
    Knn,
}

impl RankingMethod {
    pub const ALL: [RankingMethod; 3] = [RankingMethod::Weighted, RankingMethod::Cosine, RankingMethod::Knn];

    pub fn as_str(&self) -> &'static str {
        match self {
            RankingMethod::Weighted => "weighted",
            RankingMethod::Cosine => "cosine",
            RankingMethod::Knn => "knn",
        }
    }
}

impl fmt::Display for RankingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RankingMethod {
    type Err = RecommendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weighted" => Ok(RankingMethod::Weighted),
            "cosine" => Ok(RankingMethod::Cosine),
            "knn" => Ok(RankingMethod::Knn),
            _ => Err(RecommendError::UnknownMethod(s.to_string())),
        }
    }
}

/// One ranked catalog row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedRow {
    /// Position in the encoded catalog
    pub row: usize,
    /// Raw similarity produced by the ranking method
    pub score: f64,
}

/// User coded vector with the float form and norm computed once per request
#[derive(Debug, Clone)]
pub struct UserVector {
    codes: Vec<i32>,
    values: Vec<f64>,
    norm: f64,
}

impl UserVector {
    pub fn new(codes: Vec<i32>) -> Self {
        let values = to_vector(&codes);
        let norm = norm(&values);
        Self { codes, values, norm }
    }

    pub fn codes(&self) -> &[i32] {
        &self.codes
    }
}

/// Scores every catalog row against a user vector and returns the top rows
///
/// The float feature matrix and row norms are built once at construction
/// and shared read-only by every request.
#[derive(Debug, Clone)]
pub struct RankingEngine {
    catalog: EncodedCatalog,
    weights: AttributeWeights,
    matrix: Vec<Vec<f64>>,
    norms: Vec<f64>,
}

impl RankingEngine {
    pub fn new(catalog: EncodedCatalog, weights: AttributeWeights) -> Self {
        let matrix: Vec<Vec<f64>> = (0..catalog.len())
            .map(|row| to_vector(catalog.row_codes(row)))
            .collect();
        let norms = matrix.iter().map(|v| norm(v)).collect();

        tracing::debug!(
            rows = matrix.len(),
            dimensions = catalog.attributes().len(),
            "Built feature matrix"
        );

        Self {
            catalog,
            weights,
            matrix,
            norms,
        }
    }

    pub fn catalog(&self) -> &EncodedCatalog {
        &self.catalog
    }

    pub fn weights(&self) -> &AttributeWeights {
        &self.weights
    }

    /// Raw similarity of one row
    #[inline]
    pub fn score_row(&self, method: RankingMethod, row: usize, user: &UserVector) -> f64 {
        match method {
            RankingMethod::Weighted => self.weighted_score(row, user),
            RankingMethod::Cosine => {
                cosine_with_norms(&self.matrix[row], self.norms[row], &user.values, user.norm)
            }
            RankingMethod::Knn => {
                distance_to_similarity(euclidean_distance(&self.matrix[row], &user.values))
            }
        }
    }

    fn weighted_score(&self, row: usize, user: &UserVector) -> f64 {
        self.catalog
            .attributes()
            .iter()
            .zip(self.catalog.row_codes(row))
            .zip(&user.codes)
            .filter(|((_, row_code), user_code)| row_code == user_code)
            .map(|((attr, _), _)| self.weights.weight(*attr))
            .sum()
    }

    /// Rank catalog rows for a user
    ///
    /// # Arguments
    /// * `preferences` - Standardized preferences, used by the pre-filter
    /// * `user` - The preferences encoded in the catalog's vocabulary space
    /// * `n` - Number of rows wanted; clamped to the candidate count
    /// * `method` - Similarity method
    /// * `prefilter` - Narrow to exact business-type matches first
    ///
    /// # Returns
    /// Rows by descending score, ties in catalog order
    pub fn rank(
        &self,
        preferences: &UserPreferences,
        user: &UserVector,
        n: usize,
        method: RankingMethod,
        prefilter: bool,
    ) -> Vec<RankedRow> {
        let candidates = candidate_rows(&self.catalog, preferences, prefilter);
        let total_candidates = candidates.len();

        let mut ranked: Vec<RankedRow> = candidates
            .into_iter()
            .map(|row| RankedRow {
                row,
                score: self.score_row(method, row, user),
            })
            .collect();

        // sort_by is stable, so equal scores keep catalog order
        ranked.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        ranked.truncate(n.min(total_candidates));

        tracing::debug!(
            method = %method,
            candidates = total_candidates,
            returned = ranked.len(),
            "Ranked catalog"
        );

        ranked
    }
}
