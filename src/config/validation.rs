//! Semantic validation of a resolved configuration.
//!
//! Runs once per construction, after normalization. The first violated rule
//! aborts construction; the rule order is fixed so equal inputs produce
//! equal error messages.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::schema::{Configuration, IndexRange};
use crate::error::{ConfigError, Result};

/// Placeholder names templates may reference.
pub const ALLOWED_PLACEHOLDERS: [&str; 6] = [
    "instruction",
    "question",
    "answer_choices",
    "cot_trigger",
    "cot",
    "answer_extraction",
];

/// Matches `{...}` template placeholders.
static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^{}]*)\}").expect("valid regex"));

/// Extracts placeholder names from a template, duplicates collapsed,
/// first-occurrence order kept.
pub(crate) fn placeholder_names(template: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for caps in PLACEHOLDER_RE.captures_iter(template) {
        let name = &caps[1];
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Checks the semantic rules a normalized configuration must satisfy.
///
/// Order: template placeholders first (over the concatenation of both
/// templates), then index range ordering.
pub(crate) fn validate(config: &Configuration) -> Result<()> {
    let combined = format!(
        "{}{}",
        config.template_cot_generation, config.template_answer_extraction
    );
    for name in placeholder_names(&combined) {
        if !ALLOWED_PLACEHOLDERS.contains(&name.as_str()) {
            return Err(ConfigError::UnknownTemplatePlaceholder { name });
        }
    }

    if let IndexRange::Span(start, end) = config.idx_range
        && start >= end
    {
        return Err(ConfigError::InvalidIndexRange {
            got: format!("[{start}, {end}]"),
        });
    }

    Ok(())
}

impl Configuration {
    /// Reports mismatches between template placeholders and key lists: a
    /// template referencing a fragment variable whose key list selects no
    /// fragment, or a key list selecting fragments no template references.
    ///
    /// These are advisories, not errors: the default configuration itself
    /// trips the rule (its generation template references `{instruction}`
    /// while `instruction_keys` holds only the absent marker), so
    /// construction never fails on a mismatch.
    #[must_use]
    pub fn template_key_mismatches(&self) -> Vec<String> {
        let combined = format!(
            "{}{}",
            self.template_cot_generation, self.template_answer_extraction
        );
        let referenced = placeholder_names(&combined);

        let checks: [(&str, &[Option<String>]); 3] = [
            ("instruction", &self.instruction_keys),
            ("cot_trigger", &self.cot_trigger_keys),
            ("answer_extraction", &self.answer_extraction_keys),
        ];

        let mut mismatches = Vec::new();
        for (placeholder, keys) in checks {
            let in_template = referenced.iter().any(|n| n == placeholder);
            let has_fragment = keys.iter().any(Option::is_some);
            if in_template && !has_fragment {
                mismatches.push(format!(
                    "templates reference '{{{placeholder}}}' but the corresponding key list selects no fragment"
                ));
            } else if !in_template && has_fragment {
                mismatches.push(format!(
                    "key list selects fragments but no template references '{{{placeholder}}}'"
                ));
            }
        }
        mismatches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::KeySelection;

    #[test]
    fn placeholder_extraction_dedups_and_keeps_order() {
        let names = placeholder_names("{question} {cot} {question} {answer_choices}");
        assert_eq!(names, ["question", "cot", "answer_choices"]);
    }

    #[test]
    fn empty_braces_extract_an_empty_name() {
        assert_eq!(placeholder_names("{} literal"), [""]);
    }

    #[test]
    fn literal_text_without_braces_extracts_nothing() {
        assert!(placeholder_names("no placeholders here").is_empty());
    }

    #[test]
    fn unknown_placeholder_fails_validation() {
        let err = Configuration::builder()
            .template_cot_generation("{question}\n{price}")
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnknownTemplatePlaceholder {
                name: "price".to_string()
            }
        );
    }

    #[test]
    fn reversed_span_fails_validation() {
        let err = Configuration::builder()
            .idx_range(IndexRange::Span(5, 2))
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidIndexRange { .. }));
    }

    #[test]
    fn equal_span_bounds_fail_validation() {
        let err = Configuration::builder()
            .idx_range(IndexRange::Span(3, 3))
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidIndexRange { .. }));
    }

    #[test]
    fn placeholder_rule_is_checked_before_range_order() {
        // Both rules are violated; the placeholder error must win.
        let err = Configuration::builder()
            .template_answer_extraction("{price}")
            .idx_range(IndexRange::Span(5, 2))
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownTemplatePlaceholder { .. }));
    }

    #[test]
    fn default_configuration_reports_the_instruction_gap() {
        let config = Configuration::builder().build().unwrap();
        let mismatches = config.template_key_mismatches();
        assert!(
            mismatches.iter().any(|m| m.contains("{instruction}")),
            "mismatches: {mismatches:?}"
        );
    }

    #[test]
    fn consistent_configuration_reports_no_mismatches() {
        let config = Configuration::builder()
            .instruction_keys(KeySelection::Explicit(vec![Some("qa-01".to_string())]))
            .build()
            .unwrap();
        assert!(config.template_key_mismatches().is_empty());
    }
}
