use crate::core::normalizer::canonicalize;
use crate::error::RecommendError;
use crate::models::{Attribute, ServiceRecord, UserPreferences};
use std::collections::{BTreeSet, HashMap};

/// Code assigned to values absent from a fitted vocabulary
pub const UNKNOWN_CODE: i32 = -1;

/// Value-to-code mapping for one attribute
///
/// Codes are contiguous from zero in sorted value order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    values: Vec<String>,
    codes: HashMap<String, i32>,
}

impl Vocabulary {
    fn fit<'a>(observed: impl IntoIterator<Item = &'a str>) -> Self {
        let values: Vec<String> = observed
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(String::from)
            .collect();

        let codes = values
            .iter()
            .enumerate()
            .map(|(idx, value)| (value.clone(), idx as i32))
            .collect();

        Self { values, codes }
    }

    pub fn encode(&self, value: &str) -> i32 {
        self.codes.get(value).copied().unwrap_or(UNKNOWN_CODE)
    }

    pub fn decode(&self, code: i32) -> Option<&str> {
        usize::try_from(code)
            .ok()
            .and_then(|idx| self.values.get(idx))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }
}

/// Catalog records plus one code per record per fitted attribute
#[derive(Debug, Clone)]
pub struct EncodedCatalog {
    records: Vec<ServiceRecord>,
    attributes: Vec<Attribute>,
    codes: Vec<Vec<i32>>,
}

impl EncodedCatalog {
    pub fn records(&self) -> &[ServiceRecord] {
        &self.records
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Coded vector of one row, in attribute order
    pub fn row_codes(&self, row: usize) -> &[i32] {
        &self.codes[row]
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn position(&self, service_id: &str) -> Option<usize> {
        self.records.iter().position(|r| r.service_id == service_id)
    }
}

/// Maps categorical values to dense integer codes
///
/// Vocabularies are read-only after `fit`; unknown values encode to
/// [`UNKNOWN_CODE`] without touching them. A catalog change requires a
/// fresh `fit` followed by a fresh `transform`.
#[derive(Debug, Clone, Default)]
pub struct CategoryEncoder {
    attributes: Vec<Attribute>,
    vocabularies: HashMap<Attribute, Vocabulary>,
    fitted: bool,
}

impl CategoryEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build one vocabulary per attribute from the observed values
    pub fn fit(&mut self, records: &[ServiceRecord], attributes: &[Attribute]) {
        self.attributes = attributes.to_vec();
        self.vocabularies = attributes
            .iter()
            .map(|attr| {
                let vocabulary = Vocabulary::fit(records.iter().map(|r| r.attribute(*attr)));
                tracing::debug!(attribute = %attr, values = vocabulary.len(), "Fitted vocabulary");
                (*attr, vocabulary)
            })
            .collect();
        self.fitted = true;

        tracing::info!(
            attributes = self.attributes.len(),
            records = records.len(),
            "Category encoder fitted"
        );
    }

    /// Encode every record against the fitted vocabularies
    pub fn transform(&self, records: Vec<ServiceRecord>) -> Result<EncodedCatalog, RecommendError> {
        if !self.fitted {
            return Err(RecommendError::NotFitted);
        }

        let codes = records
            .iter()
            .map(|record| {
                self.attributes
                    .iter()
                    .map(|attr| self.encode_value(*attr, record.attribute(*attr)))
                    .collect()
            })
            .collect();

        Ok(EncodedCatalog {
            records,
            attributes: self.attributes.clone(),
            codes,
        })
    }

    pub fn fit_transform(
        &mut self,
        records: Vec<ServiceRecord>,
        attributes: &[Attribute],
    ) -> Result<EncodedCatalog, RecommendError> {
        self.fit(&records, attributes);
        self.transform(records)
    }

    /// Code for a single already-canonical value
    pub fn encode_value(&self, attribute: Attribute, value: &str) -> i32 {
        self.vocabularies
            .get(&attribute)
            .map(|v| v.encode(value))
            .unwrap_or(UNKNOWN_CODE)
    }

    /// Code for a user-supplied value, canonicalized first
    pub fn encode_user_value(&self, attribute: Attribute, value: &str) -> i32 {
        self.encode_value(attribute, &canonicalize(attribute, value))
    }

    /// Coded vector for a preference set, in fitted attribute order
    pub fn encode_preferences(&self, preferences: &UserPreferences) -> Result<Vec<i32>, RecommendError> {
        if !self.fitted {
            return Err(RecommendError::NotFitted);
        }

        Ok(self
            .attributes
            .iter()
            .map(|attr| self.encode_user_value(*attr, preferences.attribute(*attr)))
            .collect())
    }

    pub fn vocabulary(&self, attribute: Attribute) -> Option<&Vocabulary> {
        self.vocabularies.get(&attribute)
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted
    }
}

/// Standardize preferences with the catalog's canonicalization rules
pub fn standardize(preferences: &UserPreferences) -> UserPreferences {
    UserPreferences {
        business_type: canonicalize(Attribute::BusinessType, &preferences.business_type),
        price_tier: canonicalize(Attribute::PriceTier, &preferences.price_tier),
        language: canonicalize(Attribute::Language, &preferences.language),
        location: canonicalize(Attribute::Location, &preferences.location),
        budget_min: preferences.budget_min,
        budget_max: preferences.budget_max,
    }
}
