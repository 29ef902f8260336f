use crate::core::encoder::EncodedCatalog;
use crate::models::{Attribute, ServiceRecord, UserPreferences};

/// Case-insensitive label equality, Unicode-aware
#[inline]
pub(crate) fn same_label(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// Check if a record serves the preferred business type
#[inline]
pub fn matches_business_type(record: &ServiceRecord, preferences: &UserPreferences) -> bool {
    same_label(&record.business_type, &preferences.business_type)
}

/// Attributes whose values agree literally (case-insensitive) between
/// the preferences and the record, in the order given
#[inline]
pub fn exact_matches(
    record: &ServiceRecord,
    preferences: &UserPreferences,
    attributes: &[Attribute],
) -> Vec<Attribute> {
    attributes
        .iter()
        .copied()
        .filter(|attr| same_label(record.attribute(*attr), preferences.attribute(*attr)))
        .collect()
}

/// Candidate rows for ranking
///
/// With `prefilter` on, narrows to exact business-type matches. An empty
/// narrowed set falls back to the full catalog so that an overly strict
/// filter never produces an empty result.
pub fn candidate_rows(
    catalog: &EncodedCatalog,
    preferences: &UserPreferences,
    prefilter: bool,
) -> Vec<usize> {
    let all = || (0..catalog.len()).collect::<Vec<_>>();

    if !prefilter {
        return all();
    }

    let filtered: Vec<usize> = catalog
        .records()
        .iter()
        .enumerate()
        .filter(|(_, record)| matches_business_type(record, preferences))
        .map(|(idx, _)| idx)
        .collect();

    if filtered.is_empty() {
        tracing::warn!(
            business_type = %preferences.business_type,
            "No exact business type matches, ranking the full catalog"
        );
        return all();
    }

    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::encoder::CategoryEncoder;

    fn create_test_record(id: &str, business: &str, location: &str) -> ServiceRecord {
        ServiceRecord {
            service_id: id.to_string(),
            name: "Test Service".to_string(),
            business_type: business.to_string(),
            price_tier: "Low".to_string(),
            language: "Both".to_string(),
            location: location.to_string(),
            description: "Test description text".to_string(),
        }
    }

    fn create_test_catalog() -> EncodedCatalog {
        let records = vec![
            create_test_record("1", "Technology", "Mumbai"),
            create_test_record("2", "Retail", "Delhi"),
            create_test_record("3", "Technology", "Remote"),
        ];
        CategoryEncoder::new()
            .fit_transform(records, &Attribute::ALL)
            .unwrap()
    }

    #[test]
    fn test_business_type_match_ignores_case() {
        let record = create_test_record("1", "Technology", "Mumbai");
        let prefs = UserPreferences::new("technology", "Low", "Both", "Mumbai");
        assert!(matches_business_type(&record, &prefs));
    }

    #[test]
    fn test_non_ascii_labels_agree_across_prefilter_and_matches() {
        let record = create_test_record("1", "Éducation", "Zürich");
        let prefs = UserPreferences::new("éducation", "Low", "Both", "ZÜRICH");

        assert!(matches_business_type(&record, &prefs));
        assert_eq!(
            exact_matches(&record, &prefs, &Attribute::ALL),
            vec![
                Attribute::BusinessType,
                Attribute::PriceTier,
                Attribute::Language,
                Attribute::Location
            ]
        );
    }

    #[test]
    fn test_exact_matches() {
        let record = create_test_record("1", "Technology", "Delhi");
        let prefs = UserPreferences::new("Technology", "low", "Hindi", "Mumbai");

        let matched = exact_matches(&record, &prefs, &Attribute::ALL);

        assert_eq!(matched, vec![Attribute::BusinessType, Attribute::PriceTier]);
    }

    #[test]
    fn test_prefilter_narrows_candidates() {
        let catalog = create_test_catalog();
        let prefs = UserPreferences::new("Technology", "Low", "Both", "Mumbai");

        assert_eq!(candidate_rows(&catalog, &prefs, true), vec![0, 2]);
        assert_eq!(candidate_rows(&catalog, &prefs, false), vec![0, 1, 2]);
    }

    #[test]
    fn test_prefilter_falls_back_to_full_catalog() {
        let catalog = create_test_catalog();
        let prefs = UserPreferences::new("Aviation", "Low", "Both", "Mumbai");

        assert_eq!(candidate_rows(&catalog, &prefs, true), vec![0, 1, 2]);
    }
}
