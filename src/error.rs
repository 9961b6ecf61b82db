//! Error types for `chainprompt`.
//!
//! Every failure is surfaced synchronously to the caller at construction
//! time; there is no partial-success or warning-only mode. Each variant
//! names the offending field and, where applicable, the allowed set.

use thiserror::Error;

use crate::config::validation::ALLOWED_PLACEHOLDERS;

/// Result type alias for `chainprompt` operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Configuration construction errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A template references a placeholder outside the allowed set.
    #[error(
        "unknown template placeholder '{name}'; allowed placeholders are: {}",
        ALLOWED_PLACEHOLDERS.join(", ")
    )]
    UnknownTemplatePlaceholder {
        /// The offending placeholder name.
        name: String,
    },

    /// `idx_range` is neither the "all" sentinel nor an ordered integer pair.
    #[error("invalid idx_range: got {got}, expected \"all\" or a pair of integers with start < end")]
    InvalidIndexRange {
        /// Rendering of the rejected value.
        got: String,
    },

    /// An enum-valued field was set to an unrecognized value.
    #[error("invalid value for '{field}': got '{value}', expected {expected}")]
    InvalidEnumValue {
        /// Name of the field.
        field: &'static str,
        /// The actual value provided.
        value: String,
        /// Description of what was expected.
        expected: &'static str,
    },

    /// A key-list field is not a sequence of fragment keys and absent markers.
    #[error("invalid shape for '{field}': got {got}, expected \"all\" or a sequence of fragment keys and nulls")]
    InvalidKeyListShape {
        /// Name of the key-list field.
        field: &'static str,
        /// Description of the rejected shape.
        got: String,
    },

    /// A scalar field failed its declared type check.
    #[error("invalid type for '{field}': got {got}, expected {expected}")]
    InvalidFieldType {
        /// Name of the field.
        field: &'static str,
        /// Description of what was expected.
        expected: &'static str,
        /// Description of the rejected value.
        got: String,
    },

    /// Construction from a mapping was given a key with no matching field.
    #[error(
        "unknown configuration parameter '{name}'{}",
        .suggestion.as_deref().map(|s| format!(" (did you mean '{s}'?)")).unwrap_or_default()
    )]
    UnknownParameterName {
        /// The unrecognized key.
        name: String,
        /// Closest known field name, if one is near enough.
        suggestion: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_placeholder_lists_allowed_set() {
        let err = ConfigError::UnknownTemplatePlaceholder {
            name: "price".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("'price'"), "message: {message}");
        for allowed in ALLOWED_PLACEHOLDERS {
            assert!(message.contains(allowed), "missing '{allowed}': {message}");
        }
    }

    #[test]
    fn unknown_parameter_with_suggestion() {
        let err = ConfigError::UnknownParameterName {
            name: "tempertaure".to_string(),
            suggestion: Some("temperature".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "unknown configuration parameter 'tempertaure' (did you mean 'temperature'?)"
        );
    }

    #[test]
    fn unknown_parameter_without_suggestion() {
        let err = ConfigError::UnknownParameterName {
            name: "frobnicate".to_string(),
            suggestion: None,
        };
        assert_eq!(err.to_string(), "unknown configuration parameter 'frobnicate'");
    }

    #[test]
    fn invalid_field_type_display() {
        let err = ConfigError::InvalidFieldType {
            field: "temperature",
            expected: "a number",
            got: "a string".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid type for 'temperature': got a string, expected a number"
        );
    }
}
