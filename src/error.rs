use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

/// Errors surfaced by the recommendation pipeline
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RecommendError {
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("unknown ranking method '{0}' (expected one of: weighted, cosine, knn)")]
    UnknownMethod(String),

    #[error("dataset schema error: {}", .0.join("; "))]
    DatasetSchema(Vec<String>),

    #[error("catalog has {size} records, exceeding the configured limit of {limit}")]
    CatalogTooLarge { size: usize, limit: usize },

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("category encoder used before fit")]
    NotFitted,

    #[error("service not found: {0}")]
    ServiceNotFound(String),
}

impl RecommendError {
    /// Specific violations carried by validation and schema errors
    pub fn violations(&self) -> &[String] {
        match self {
            RecommendError::Validation(v) | RecommendError::DatasetSchema(v) => v,
            _ => &[],
        }
    }
}

impl From<ValidationErrors> for RecommendError {
    fn from(errors: ValidationErrors) -> Self {
        let mut violations = Vec::new();
        collect_violations("", &errors, &mut violations);
        // map iteration order is unspecified
        violations.sort();
        RecommendError::Validation(violations)
    }
}

fn collect_violations(prefix: &str, errors: &ValidationErrors, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let path = match (prefix.is_empty(), *field == "__all__") {
            (true, _) => field.to_string(),
            (false, true) => prefix.to_string(),
            (false, false) => format!("{}.{}", prefix, field),
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for err in field_errors {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| err.code.to_string());
                    out.push(format!("{}: {}", path, message));
                }
            }
            ValidationErrorsKind::Struct(inner) => collect_violations(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (idx, inner) in items {
                    collect_violations(&format!("{}[{}]", path, idx), inner, out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RecommendationRequest, UserPreferences};
    use validator::Validate;

    #[test]
    fn test_validation_errors_are_listed_per_field() {
        let request = RecommendationRequest::new(UserPreferences::new("", "Low", "", "Mumbai"))
            .with_count(0);

        let err = RecommendError::from(request.validate().unwrap_err());
        let violations = err.violations();

        assert_eq!(violations.len(), 3, "got {:?}", violations);
        assert!(violations.iter().any(|v| v.starts_with("count:")));
        assert!(violations.iter().any(|v| v.starts_with("preferences.business_type:")));
        assert!(violations.iter().any(|v| v.starts_with("preferences.language:")));
    }

    #[test]
    fn test_unknown_method_message() {
        let err = RecommendError::UnknownMethod("pagerank".to_string());
        assert!(err.to_string().contains("pagerank"));
        assert!(err.violations().is_empty());
    }
}
