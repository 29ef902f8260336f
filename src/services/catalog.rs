use crate::models::RawServiceRecord;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

/// Columns every catalog file must carry
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "Service_ID",
    "Service_Name",
    "Target_Business_Type",
    "Price_Category",
    "Language_Support",
    "Location_Area",
    "Description",
];

/// Errors that can occur while ingesting a catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Schema error: {}", .0.join("; "))]
    Schema(Vec<String>),
}

impl CatalogError {
    pub fn violations(&self) -> Vec<String> {
        match self {
            CatalogError::Schema(v) => v.clone(),
            other => vec![other.to_string()],
        }
    }
}

/// Load a catalog CSV file from disk
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Vec<RawServiceRecord>, CatalogError> {
    let path = path.as_ref();
    tracing::info!("Loading service catalog from {}", path.display());

    let file = std::fs::File::open(path)?;
    read_catalog(file)
}

/// Read a catalog from any CSV source
///
/// Headers are checked before any row is parsed. Blank cells become
/// missing values for the normalizer to fill.
pub fn read_catalog<R: Read>(source: R) -> Result<Vec<RawServiceRecord>, CatalogError> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(source);

    let headers = reader.headers()?.clone();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .map(|col| format!("missing required column: {}", col))
        .collect();

    if !missing.is_empty() {
        tracing::warn!(missing = missing.len(), "Catalog rejected by schema check");
        return Err(CatalogError::Schema(missing));
    }

    let records = reader
        .deserialize::<RawServiceRecord>()
        .collect::<Result<Vec<_>, _>>()?;

    if records.is_empty() {
        return Err(CatalogError::Schema(vec!["dataset contains no records".to_string()]));
    }

    tracing::debug!(records = records.len(), "Catalog rows read");

    Ok(records)
}
