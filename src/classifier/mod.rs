//! Category assist: asks an external text classifier for a category label and
//! falls back to [`FALLBACK_CATEGORY`] when it cannot answer.

pub mod http;

use thiserror::Error;
use tracing::warn;

use crate::domain::category::FALLBACK_CATEGORY;

pub use http::HttpClassifier;

/// Failures of a single classification round trip.
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Category assist is disabled.")]
    Disabled,
    #[error("Classifier request failed: {0}")]
    Transport(String),
    #[error("Classifier responded with HTTP status {0}")]
    Status(u16),
    #[error("Classifier response could not be read: {0}")]
    Payload(String),
    #[error("Classifier response did not include a category")]
    MissingCategory,
}

/// Maps free-text descriptions to category labels.
pub trait CategoryClassifier {
    /// Performs one request/response exchange. Implementations never retry.
    fn classify(&self, description: &str) -> Result<String, ClassifierError>;
}

/// Classifier used when category assist is switched off.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledClassifier;

impl CategoryClassifier for DisabledClassifier {
    fn classify(&self, _description: &str) -> Result<String, ClassifierError> {
        Err(ClassifierError::Disabled)
    }
}

/// Outcome of category assist. `warning` carries the message to show the user
/// when the fallback label was used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySuggestion {
    pub category: String,
    pub warning: Option<String>,
}

impl CategorySuggestion {
    pub fn is_fallback(&self) -> bool {
        self.warning.is_some()
    }
}

/// Consults `classifier` once; any failure becomes the fallback label.
pub fn assist_category(classifier: &dyn CategoryClassifier, description: &str) -> CategorySuggestion {
    match classifier.classify(description) {
        Ok(category) => CategorySuggestion {
            category,
            warning: None,
        },
        Err(err) => {
            warn!(error = %err, "category assist failed, using fallback");
            CategorySuggestion {
                category: FALLBACK_CATEGORY.to_string(),
                warning: Some(err.to_string()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(&'static str);

    impl CategoryClassifier for Fixed {
        fn classify(&self, _description: &str) -> Result<String, ClassifierError> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn successful_prediction_has_no_warning() {
        let suggestion = assist_category(&Fixed("Food & Dining"), "Coffee");
        assert_eq!(suggestion.category, "Food & Dining");
        assert!(!suggestion.is_fallback());
    }

    #[test]
    fn disabled_classifier_falls_back() {
        let suggestion = assist_category(&DisabledClassifier, "Coffee");
        assert_eq!(suggestion.category, FALLBACK_CATEGORY);
        assert_eq!(
            suggestion.warning.as_deref(),
            Some("Category assist is disabled.")
        );
    }
}
