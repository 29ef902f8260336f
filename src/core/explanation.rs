//! Human-readable rationale for recommendations.
//!
//! Each explanation is assembled from up to four clauses: a templated
//! opening chosen for the match band, the attributes that matched
//! literally, an excerpt of the service description and a list of
//! feature highlights. Clauses with nothing to say are omitted.

use crate::core::filters::{exact_matches, same_label};
use crate::models::{Attribute, MatchQuality, ScoredRecommendation, ServiceRecord, UserPreferences};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::sync::Mutex;

/// Score at which a High-tier match is described as perfect
pub const PERFECT_MATCH_SCORE: f64 = 0.9;

/// Descriptions longer than this are truncated
pub const INSIGHT_TRUNCATE_ABOVE: usize = 100;
/// Characters kept from a truncated description
pub const INSIGHT_EXCERPT_LEN: usize = 80;
/// Descriptions must be longer than this to be quoted at all
pub const INSIGHT_MIN_LEN: usize = 20;

const PERFECT_TEMPLATES: [&str; 3] = [
    "Perfect match! This service aligns perfectly with all your requirements.",
    "Excellent choice! Matches all your specified preferences.",
    "Outstanding fit! This service meets every criterion you specified.",
];

const HIGH_TEMPLATES: [&str; 3] = [
    "Great match! This service strongly aligns with your needs.",
    "Highly recommended! Closely matches your business requirements.",
    "Excellent fit! This service is well-suited for your preferences.",
];

const MEDIUM_TEMPLATES: [&str; 3] = [
    "Good option! This service meets most of your requirements.",
    "Solid choice! Aligns well with your key preferences.",
    "Recommended! A good fit for your business needs.",
];

const LOW_TEMPLATES: [&str; 3] = [
    "Alternative option that might work for your needs.",
    "Consider this service as a potential alternative.",
    "May be worth exploring based on partial matches.",
];

/// Template pool an explanation opens from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplanationBand {
    Perfect,
    High,
    Medium,
    Low,
}

impl ExplanationBand {
    pub fn for_match(match_score: f64, tier: MatchQuality) -> Self {
        match tier {
            MatchQuality::High if match_score >= PERFECT_MATCH_SCORE => ExplanationBand::Perfect,
            MatchQuality::High => ExplanationBand::High,
            MatchQuality::Medium => ExplanationBand::Medium,
            MatchQuality::Low => ExplanationBand::Low,
        }
    }

    pub fn templates(&self) -> &'static [&'static str] {
        match self {
            ExplanationBand::Perfect => &PERFECT_TEMPLATES,
            ExplanationBand::High => &HIGH_TEMPLATES,
            ExplanationBand::Medium => &MEDIUM_TEMPLATES,
            ExplanationBand::Low => &LOW_TEMPLATES,
        }
    }
}

/// Generates per-recommendation explanations and response summaries
///
/// Template choice is the only source of variation; pass a seed to make
/// it reproducible.
#[derive(Debug)]
pub struct ExplanationGenerator {
    attributes: Vec<Attribute>,
    rng: Mutex<StdRng>,
}

impl ExplanationGenerator {
    pub fn new(attributes: Vec<Attribute>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Self {
            attributes,
            rng: Mutex::new(rng),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(Attribute::ALL.to_vec(), Some(seed))
    }

    /// Explanation for one recommended record
    pub fn explain(
        &self,
        preferences: &UserPreferences,
        record: &ServiceRecord,
        match_score: f64,
        tier: MatchQuality,
    ) -> String {
        let mut parts: Vec<String> = Vec::with_capacity(4);

        parts.push(self.opening(ExplanationBand::for_match(match_score, tier)).to_string());

        let matched = exact_matches(record, preferences, &self.attributes);
        if let Some(text) = match_text(&matched, record) {
            parts.push(text);
        }

        if let Some(insight) = description_insight(&record.description) {
            parts.push(insight);
        }

        if let Some(features) = highlights(record, preferences) {
            parts.push(features);
        }

        parts.join(" ")
    }

    /// One-paragraph insight over a whole response
    pub fn summarize(
        &self,
        recommendations: &[ScoredRecommendation],
        preferences: &UserPreferences,
    ) -> String {
        let total = recommendations.len();
        let average = mean_match_score(recommendations);
        let high = recommendations
            .iter()
            .filter(|r| r.match_quality == MatchQuality::High)
            .count();

        let mut parts: Vec<String> = Vec::with_capacity(3);

        let overall = if average >= 0.8 {
            "Excellent! We found highly relevant services for you."
        } else if average >= 0.6 {
            "Good results! Several services match your needs well."
        } else {
            "Here are some services that may interest you."
        };
        parts.push(overall.to_string());

        if high > 0 {
            parts.push(format!("{} out of {} are high-quality matches.", high, total));
        }

        let business = preferences.business_type.trim();
        if !business.is_empty() {
            parts.push(format!("All recommendations are tailored for {} businesses.", business));
        }

        parts.join(" ")
    }

    fn opening(&self, band: ExplanationBand) -> &'static str {
        let templates = band.templates();
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        templates.choose(&mut *rng).copied().unwrap_or(templates[0])
    }
}

/// Mean match score, zero for an empty slice
pub fn mean_match_score(recommendations: &[ScoredRecommendation]) -> f64 {
    if recommendations.is_empty() {
        return 0.0;
    }
    recommendations.iter().map(|r| r.match_score).sum::<f64>() / recommendations.len() as f64
}

/// Sentence naming the attributes that matched literally
pub fn match_text(matched: &[Attribute], record: &ServiceRecord) -> Option<String> {
    match matched {
        [] => None,
        [only] => Some(format!(
            "Matches your {} requirement ({}).",
            only.description(),
            record.attribute(*only)
        )),
        [first, second] => Some(format!(
            "Matches your {} and {} requirements.",
            first.description(),
            second.description()
        )),
        [init @ .., last] => {
            let listed: Vec<&str> = init.iter().map(|a| a.description()).collect();
            Some(format!(
                "Matches your {}, and {} requirements.",
                listed.join(", "),
                last.description()
            ))
        }
    }
}

/// Excerpt of a description worth quoting
pub fn description_insight(description: &str) -> Option<String> {
    let description = description.trim();
    let len = description.chars().count();

    if len > INSIGHT_TRUNCATE_ABOVE {
        let excerpt: String = description.chars().take(INSIGHT_EXCERPT_LEN).collect();
        Some(format!("Specializes in {}...", excerpt.trim_end()))
    } else if len > INSIGHT_MIN_LEN {
        Some(description.to_string())
    } else {
        None
    }
}

/// Domain highlights for a record
pub fn highlights(record: &ServiceRecord, preferences: &UserPreferences) -> Option<String> {
    let mut features: Vec<String> = Vec::new();

    match record.price_tier.as_str() {
        "Low" => features.push("cost-effective solution".to_string()),
        "High" => features.push("premium quality service".to_string()),
        _ => {}
    }

    if record.language == "Both" {
        features.push("bilingual support available".to_string());
    }

    if record.location.to_lowercase().contains("remote") {
        features.push("remote service available".to_string());
    } else if !record.location.is_empty() && same_label(&record.location, &preferences.location) {
        features.push(format!("local service in {}", record.location));
    }

    if features.is_empty() {
        None
    } else {
        Some(format!("Features: {}.", features.join(", ")))
    }
}
