use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use validator::{Validate, ValidationError};

/// Categorical attribute used for matching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    BusinessType,
    PriceTier,
    Language,
    Location,
}

impl Attribute {
    /// All attributes in canonical order
    pub const ALL: [Attribute; 4] = [
        Attribute::BusinessType,
        Attribute::PriceTier,
        Attribute::Language,
        Attribute::Location,
    ];

    /// Column name in the tabular catalog
    pub fn column(&self) -> &'static str {
        match self {
            Attribute::BusinessType => "Target_Business_Type",
            Attribute::PriceTier => "Price_Category",
            Attribute::Language => "Language_Support",
            Attribute::Location => "Location_Area",
        }
    }

    /// Phrase used when explaining a match on this attribute
    pub fn description(&self) -> &'static str {
        match self {
            Attribute::BusinessType => "business type",
            Attribute::PriceTier => "budget range",
            Attribute::Language => "language preference",
            Attribute::Location => "location requirement",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Attribute::BusinessType => "business_type",
            Attribute::PriceTier => "price_tier",
            Attribute::Language => "language",
            Attribute::Location => "location",
        };
        f.write_str(name)
    }
}

/// Catalog row as it arrives from ingestion, before cleaning
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawServiceRecord {
    #[serde(rename = "Service_ID", default)]
    pub service_id: Option<String>,
    #[serde(rename = "Service_Name", default)]
    pub name: Option<String>,
    #[serde(rename = "Target_Business_Type", default)]
    pub business_type: Option<String>,
    #[serde(rename = "Price_Category", default)]
    pub price_tier: Option<String>,
    #[serde(rename = "Language_Support", default)]
    pub language: Option<String>,
    #[serde(rename = "Location_Area", default)]
    pub location: Option<String>,
    #[serde(rename = "Description", default)]
    pub description: Option<String>,
}

impl RawServiceRecord {
    /// Raw value of a categorical attribute
    pub fn attribute(&self, attribute: Attribute) -> Option<&str> {
        match attribute {
            Attribute::BusinessType => self.business_type.as_deref(),
            Attribute::PriceTier => self.price_tier.as_deref(),
            Attribute::Language => self.language.as_deref(),
            Attribute::Location => self.location.as_deref(),
        }
    }

    pub(crate) fn attribute_mut(&mut self, attribute: Attribute) -> &mut Option<String> {
        match attribute {
            Attribute::BusinessType => &mut self.business_type,
            Attribute::PriceTier => &mut self.price_tier,
            Attribute::Language => &mut self.language,
            Attribute::Location => &mut self.location,
        }
    }
}

/// Cleaned catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRecord {
    #[serde(rename = "serviceId")]
    pub service_id: String,
    pub name: String,
    #[serde(rename = "businessType")]
    pub business_type: String,
    #[serde(rename = "priceTier")]
    pub price_tier: String,
    #[serde(rename = "languageSupport")]
    pub language: String,
    #[serde(rename = "locationArea")]
    pub location: String,
    pub description: String,
}

impl ServiceRecord {
    pub fn attribute(&self, attribute: Attribute) -> &str {
        match attribute {
            Attribute::BusinessType => &self.business_type,
            Attribute::PriceTier => &self.price_tier,
            Attribute::Language => &self.language,
            Attribute::Location => &self.location,
        }
    }
}

/// User preferences for one recommendation request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_budget"))]
pub struct UserPreferences {
    #[validate(custom(function = "not_blank"))]
    #[serde(rename = "businessType", alias = "business_type", default)]
    pub business_type: String,
    #[validate(custom(function = "not_blank"))]
    #[serde(rename = "priceTier", alias = "price_tier", default)]
    pub price_tier: String,
    #[validate(custom(function = "not_blank"))]
    #[serde(rename = "languageSupport", alias = "language", default)]
    pub language: String,
    #[validate(custom(function = "not_blank"))]
    #[serde(rename = "locationArea", alias = "location", default)]
    pub location: String,
    #[serde(rename = "budgetMin", alias = "budget_min", default)]
    pub budget_min: Option<f64>,
    #[serde(rename = "budgetMax", alias = "budget_max", default)]
    pub budget_max: Option<f64>,
}

impl UserPreferences {
    pub fn new(
        business_type: impl Into<String>,
        price_tier: impl Into<String>,
        language: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            business_type: business_type.into(),
            price_tier: price_tier.into(),
            language: language.into(),
            location: location.into(),
            budget_min: None,
            budget_max: None,
        }
    }

    pub fn attribute(&self, attribute: Attribute) -> &str {
        match attribute {
            Attribute::BusinessType => &self.business_type,
            Attribute::PriceTier => &self.price_tier,
            Attribute::Language => &self.language,
            Attribute::Location => &self.location,
        }
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some(Cow::from("value is required and must not be blank"));
        return Err(err);
    }
    Ok(())
}

fn validate_budget(preferences: &UserPreferences) -> Result<(), ValidationError> {
    let bounds = [preferences.budget_min, preferences.budget_max];
    if bounds.iter().flatten().any(|b| !b.is_finite() || *b < 0.0) {
        let mut err = ValidationError::new("budget");
        err.message = Some(Cow::from("budget bounds must be finite, non-negative numbers"));
        return Err(err);
    }

    if let (Some(min), Some(max)) = (preferences.budget_min, preferences.budget_max) {
        if min > max {
            let mut err = ValidationError::new("budget_range");
            err.message = Some(Cow::from("minimum budget cannot exceed maximum budget"));
            return Err(err);
        }
    }

    Ok(())
}

/// Discrete match quality tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MatchQuality {
    High,
    Medium,
    Low,
}

impl fmt::Display for MatchQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MatchQuality::High => "High",
            MatchQuality::Medium => "Medium",
            MatchQuality::Low => "Low",
        };
        f.write_str(label)
    }
}

/// Ranked, scored and explained catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRecommendation {
    #[serde(rename = "serviceId")]
    pub service_id: String,
    pub name: String,
    #[serde(rename = "businessType")]
    pub business_type: String,
    #[serde(rename = "priceTier")]
    pub price_tier: String,
    #[serde(rename = "languageSupport")]
    pub language: String,
    #[serde(rename = "locationArea")]
    pub location: String,
    pub description: String,
    #[serde(rename = "similarityScore")]
    pub similarity_score: f64,
    #[serde(rename = "matchScore")]
    pub match_score: f64,
    #[serde(rename = "matchQuality")]
    pub match_quality: MatchQuality,
    pub explanation: String,
}

impl ScoredRecommendation {
    pub fn from_record(
        record: &ServiceRecord,
        similarity_score: f64,
        match_score: f64,
        match_quality: MatchQuality,
        explanation: String,
    ) -> Self {
        Self {
            service_id: record.service_id.clone(),
            name: record.name.clone(),
            business_type: record.business_type.clone(),
            price_tier: record.price_tier.clone(),
            language: record.language.clone(),
            location: record.location.clone(),
            description: record.description.clone(),
            similarity_score,
            match_score,
            match_quality,
            explanation,
        }
    }
}

/// Per-attribute weights for the weighted ranking method
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttributeWeights {
    pub business_type: f64,
    pub price_tier: f64,
    pub language: f64,
    pub location: f64,
}

impl AttributeWeights {
    pub fn weight(&self, attribute: Attribute) -> f64 {
        match attribute {
            Attribute::BusinessType => self.business_type,
            Attribute::PriceTier => self.price_tier,
            Attribute::Language => self.language,
            Attribute::Location => self.location,
        }
    }

    /// Sum of the weights of the given attributes
    pub fn total(&self, attributes: &[Attribute]) -> f64 {
        attributes.iter().map(|a| self.weight(*a)).sum()
    }
}

impl Default for AttributeWeights {
    fn default() -> Self {
        Self {
            business_type: 0.35,
            price_tier: 0.25,
            language: 0.20,
            location: 0.20,
        }
    }
}
