use crate::models::{Attribute, RawServiceRecord, ServiceRecord};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Shortest description a record may carry and still be kept
pub const MIN_DESCRIPTION_LEN: usize = 10;

pub const UNKNOWN_LABEL: &str = "Unknown";
pub const UNNAMED_SERVICE: &str = "Unnamed Service";
pub const MISSING_DESCRIPTION: &str = "No description available for this service.";

pub const PRICE_LABELS: [&str; 3] = ["Low", "Medium", "High"];
pub const LANGUAGE_LABELS: [&str; 3] = ["Hindi", "English", "Both"];

static DISALLOWED_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s.,!?-]").unwrap());
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Report of the actions taken by one normalization pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningReport {
    #[serde(rename = "originalRecords")]
    pub original_records: usize,
    #[serde(rename = "finalRecords")]
    pub final_records: usize,
    #[serde(rename = "recordsRemoved")]
    pub records_removed: usize,
    #[serde(rename = "duplicatesRemoved")]
    pub duplicates_removed: usize,
    #[serde(rename = "missingValuesFilled")]
    pub missing_values_filled: usize,
    #[serde(rename = "invalidRecordsRemoved")]
    pub invalid_records_removed: usize,
    #[serde(rename = "invalidPrice")]
    pub invalid_price: usize,
    #[serde(rename = "invalidLanguage")]
    pub invalid_language: usize,
    #[serde(rename = "shortDescription")]
    pub short_description: usize,
}

/// Cleans and standardizes raw catalog rows
///
/// # Pipeline Stages
/// 1. Exact-row and identifier deduplication (first occurrence wins)
/// 2. Missing-value fill (generated id, placeholders, per-attribute mode)
/// 3. Free-text cleanup
/// 4. Category canonicalization through the synonym tables
/// 5. Removal of records with unrecognized price/language or short descriptions
///
/// Malformed rows are filtered out, never raised as errors.
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer;

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    pub fn normalize(&self, raw: Vec<RawServiceRecord>) -> (Vec<ServiceRecord>, CleaningReport) {
        let mut report = CleaningReport {
            original_records: raw.len(),
            ..CleaningReport::default()
        };

        // Keep the raw position so generated ids are stable across runs
        let rows: Vec<(usize, RawServiceRecord)> = raw
            .into_iter()
            .map(blank_to_missing)
            .enumerate()
            .collect();

        let rows = remove_duplicates(rows);
        report.duplicates_removed = report.original_records - rows.len();
        tracing::debug!(removed = report.duplicates_removed, "Removed duplicate records");

        let modes = attribute_modes(&rows);
        let mut taken_ids: HashSet<String> = rows
            .iter()
            .filter_map(|(_, row)| row.service_id.clone())
            .collect();
        let mut records = Vec::with_capacity(rows.len());
        for (position, row) in rows {
            let (record, filled) = fill_missing(position, row, &modes, &mut taken_ids);
            report.missing_values_filled += filled;
            records.push(clean_record(record));
        }
        tracing::debug!(filled = report.missing_values_filled, "Filled missing values");

        let before_validation = records.len();
        records.retain(|record| {
            if !is_recognized(&record.price_tier, &PRICE_LABELS) {
                report.invalid_price += 1;
                return false;
            }
            if !is_recognized(&record.language, &LANGUAGE_LABELS) {
                report.invalid_language += 1;
                return false;
            }
            if record.description.chars().count() < MIN_DESCRIPTION_LEN {
                report.short_description += 1;
                return false;
            }
            true
        });
        report.invalid_records_removed = before_validation - records.len();
        if report.invalid_records_removed > 0 {
            tracing::warn!(
                invalid_price = report.invalid_price,
                invalid_language = report.invalid_language,
                short_description = report.short_description,
                "Dropped incomplete catalog records"
            );
        }

        report.final_records = records.len();
        report.records_removed = report.original_records - report.final_records;

        tracing::info!(
            original_records = report.original_records,
            final_records = report.final_records,
            duplicates_removed = report.duplicates_removed,
            missing_values_filled = report.missing_values_filled,
            invalid_records_removed = report.invalid_records_removed,
            "Catalog cleaning complete"
        );

        (records, report)
    }
}

/// Canonical form of a categorical value
///
/// Shared by catalog cleaning and preference standardization; idempotent.
pub fn canonicalize(attribute: Attribute, value: &str) -> String {
    let collapsed = collapse_whitespace(value);
    let lowered = collapsed.to_lowercase();

    let mapped = match attribute {
        Attribute::BusinessType => None,
        Attribute::PriceTier => match lowered.as_str() {
            "low" | "cheap" | "affordable" => Some("Low"),
            "medium" | "med" => Some("Medium"),
            "high" | "expensive" => Some("High"),
            _ => None,
        },
        Attribute::Language => match lowered.as_str() {
            "hindi" => Some("Hindi"),
            "english" => Some("English"),
            "both" | "bilingual" | "hindi/english" | "english/hindi" => Some("Both"),
            _ => None,
        },
        Attribute::Location => match lowered.as_str() {
            "online" | "virtual" | "anywhere" | "remote" => Some("Remote"),
            _ => None,
        },
    };

    match mapped {
        Some(label) => label.to_string(),
        None => title_case(&collapsed),
    }
}

/// Strip disallowed characters and collapse whitespace runs
pub fn clean_text(value: &str) -> String {
    let stripped = DISALLOWED_CHARS.replace_all(value, "");
    collapse_whitespace(&stripped)
}

fn collapse_whitespace(value: &str) -> String {
    WHITESPACE_RUN.replace_all(value.trim(), " ").into_owned()
}

/// Title-case: uppercase a letter that follows a non-letter, lowercase the rest
pub fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut prev_is_letter = false;
    for c in value.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }
    out
}

fn is_recognized(value: &str, labels: &[&str]) -> bool {
    value == UNKNOWN_LABEL || labels.contains(&value)
}

fn blank_to_missing(mut row: RawServiceRecord) -> RawServiceRecord {
    // Identifiers compare trimmed, so dedup sees " S1 " and "S1" as one id
    row.service_id = row.service_id.map(|id| id.trim().to_string());

    let fields = [
        &mut row.service_id,
        &mut row.name,
        &mut row.business_type,
        &mut row.price_tier,
        &mut row.language,
        &mut row.location,
        &mut row.description,
    ];
    for field in fields {
        if field.as_deref().is_some_and(|v| v.trim().is_empty()) {
            *field = None;
        }
    }
    row
}

fn remove_duplicates(rows: Vec<(usize, RawServiceRecord)>) -> Vec<(usize, RawServiceRecord)> {
    let mut seen_rows = HashSet::new();
    let mut seen_ids = HashSet::new();

    rows.into_iter()
        .filter(|(_, row)| seen_rows.insert(row.clone()))
        .filter(|(_, row)| match &row.service_id {
            Some(id) => seen_ids.insert(id.clone()),
            None => true,
        })
        .collect()
}

/// Most frequent raw value per attribute; ties go to the smallest value
fn attribute_modes(rows: &[(usize, RawServiceRecord)]) -> HashMap<Attribute, String> {
    let mut modes = HashMap::new();
    for attribute in Attribute::ALL {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for (_, row) in rows {
            if let Some(value) = row.attribute(attribute) {
                *counts.entry(value).or_default() += 1;
            }
        }

        let mode = counts
            .into_iter()
            .max_by(|(a_val, a_n), (b_val, b_n)| a_n.cmp(b_n).then_with(|| b_val.cmp(a_val)))
            .map(|(value, _)| value.to_string());

        if let Some(mode) = mode {
            modes.insert(attribute, mode);
        }
    }
    modes
}

fn fill_missing(
    position: usize,
    mut row: RawServiceRecord,
    modes: &HashMap<Attribute, String>,
    taken_ids: &mut HashSet<String>,
) -> (ServiceRecord, usize) {
    let mut filled = 0;

    for attribute in Attribute::ALL {
        let slot = row.attribute_mut(attribute);
        if slot.is_none() {
            *slot = Some(
                modes
                    .get(&attribute)
                    .cloned()
                    .unwrap_or_else(|| UNKNOWN_LABEL.to_string()),
            );
            filled += 1;
        }
    }

    let service_id = match row.service_id {
        Some(id) => id,
        None => {
            filled += 1;
            generate_id(position, taken_ids)
        }
    };

    let mut take = |value: Option<String>, fallback: String| {
        value.unwrap_or_else(|| {
            filled += 1;
            fallback
        })
    };

    let name = take(row.name, UNNAMED_SERVICE.to_string());
    let description = take(row.description, MISSING_DESCRIPTION.to_string());

    let record = ServiceRecord {
        service_id,
        name,
        business_type: row.business_type.unwrap_or_default(),
        price_tier: row.price_tier.unwrap_or_default(),
        language: row.language.unwrap_or_default(),
        location: row.location.unwrap_or_default(),
        description,
    };

    (record, filled)
}

/// `SRV_{position}`, suffixed when an explicit id already holds that name
fn generate_id(position: usize, taken_ids: &mut HashSet<String>) -> String {
    let base = format!("SRV_{:04}", position);
    let mut candidate = base.clone();
    let mut suffix = 1;
    while taken_ids.contains(&candidate) {
        candidate = format!("{}_{}", base, suffix);
        suffix += 1;
    }
    taken_ids.insert(candidate.clone());
    candidate
}

fn clean_record(mut record: ServiceRecord) -> ServiceRecord {
    record.name = title_case(&clean_text(&record.name));
    record.description = clean_text(&record.description);
    for attribute in Attribute::ALL {
        let canonical = canonicalize(attribute, record.attribute(attribute));
        match attribute {
            Attribute::BusinessType => record.business_type = canonical,
            Attribute::PriceTier => record.price_tier = canonical,
            Attribute::Language => record.language = canonical,
            Attribute::Location => record.location = canonical,
        }
    }
    record
}
