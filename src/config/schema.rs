//! Configuration schema types.
//!
//! The sentinel-typed fields of the run configuration ("all" vs. an explicit
//! list vs. nothing chosen) are modeled as dedicated sum types so that every
//! state a caller can express is a distinct variant rather than an untyped
//! marker value.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::config::builder::ConfigBuilder;

/// Sentinel accepted wherever "use every catalog entry" applies.
pub(crate) const ALL_SENTINEL: &str = "all";

/// Default model input for the chain-of-thought generation step.
pub const DEFAULT_TEMPLATE_COT_GENERATION: &str =
    "{instruction}\n\n{question}\n{answer_choices}\n\n{cot_trigger}";

/// Default model input for the answer extraction step.
pub const DEFAULT_TEMPLATE_ANSWER_EXTRACTION: &str =
    "{instruction}\n\n{question}\n{answer_choices}\n\n{cot_trigger}{cot}\n{answer_extraction}";

/// Which slice of the dataset the pipeline processes.
///
/// Serializes as the string `"all"` or as a two-integer array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexRange {
    /// Every item.
    All,
    /// Only items whose index falls between `start` and `end`.
    /// `start` must be strictly less than `end`.
    Span(i64, i64),
}

impl Serialize for IndexRange {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match *self {
            Self::All => serializer.serialize_str(ALL_SENTINEL),
            Self::Span(start, end) => (start, end).serialize(serializer),
        }
    }
}

/// Draft state of a key-list field before normalization.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum KeySelection {
    /// Every key of the corresponding catalog section, preceded by the
    /// absent marker.
    All,
    /// Nothing chosen; normalizes to the absent marker alone.
    #[default]
    Unset,
    /// An explicit ordered selection. `None` is the absent marker: the
    /// pipeline runs that condition without a fragment of this kind.
    Explicit(Vec<Option<String>>),
}

impl KeySelection {
    /// Resolves the selection against a catalog section.
    ///
    /// Resolving an already-explicit, non-empty selection is the identity.
    pub(crate) fn resolve(self, section: &IndexMap<String, String>) -> Vec<Option<String>> {
        match self {
            Self::All => std::iter::once(None)
                .chain(section.keys().cloned().map(Some))
                .collect(),
            Self::Unset => vec![None],
            Self::Explicit(keys) if keys.is_empty() => vec![None],
            Self::Explicit(keys) => keys,
        }
    }
}

/// How multiple-choice answer options are indexed when rendered.
///
/// The field holding this is optional; `None` means the choices are listed
/// without an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChoiceFormat {
    /// A, B, C, ...
    Letters,
    /// 1, 2, 3, ...
    Numbers,
}

/// A validated, immutable parameter set for one generation/extraction run.
///
/// Constructed through [`Configuration::builder`] or
/// [`Configuration::from_value`]; both normalize the key-list fields
/// against a fragment catalog and validate before returning, so an instance
/// in hand always satisfies the field invariants. Serializes with the same
/// field names and sentinel encodings the mapping constructor accepts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Configuration {
    pub(crate) idx_range: IndexRange,
    pub(crate) multiple_choice_answer_format: Option<ChoiceFormat>,
    pub(crate) instruction_keys: Vec<Option<String>>,
    pub(crate) cot_trigger_keys: Vec<Option<String>>,
    pub(crate) answer_extraction_keys: Vec<Option<String>>,
    pub(crate) template_cot_generation: String,
    pub(crate) template_answer_extraction: String,
    pub(crate) author: String,
    pub(crate) api_service: String,
    pub(crate) engine: String,
    pub(crate) temperature: f64,
    pub(crate) max_tokens: u32,
    pub(crate) api_time_interval: f64,
    pub(crate) verbose: bool,
    pub(crate) warn: bool,
}

impl Configuration {
    /// Starts a builder with every field at its default.
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Dataset index window.
    #[must_use]
    pub const fn idx_range(&self) -> IndexRange {
        self.idx_range
    }

    /// Multiple-choice index style, or `None` for unindexed choices.
    #[must_use]
    pub const fn multiple_choice_answer_format(&self) -> Option<ChoiceFormat> {
        self.multiple_choice_answer_format
    }

    /// Instruction keys to iterate over, absent marker included.
    #[must_use]
    pub fn instruction_keys(&self) -> &[Option<String>] {
        &self.instruction_keys
    }

    /// Chain-of-thought trigger keys to iterate over.
    #[must_use]
    pub fn cot_trigger_keys(&self) -> &[Option<String>] {
        &self.cot_trigger_keys
    }

    /// Answer extraction keys to iterate over.
    #[must_use]
    pub fn answer_extraction_keys(&self) -> &[Option<String>] {
        &self.answer_extraction_keys
    }

    /// Model input template for the generation step.
    #[must_use]
    pub fn template_cot_generation(&self) -> &str {
        &self.template_cot_generation
    }

    /// Model input template for the answer extraction step.
    #[must_use]
    pub fn template_answer_extraction(&self) -> &str {
        &self.template_answer_extraction
    }

    /// Name of the person responsible for the run.
    #[must_use]
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Name of the API service backend.
    #[must_use]
    pub fn api_service(&self) -> &str {
        &self.api_service
    }

    /// Name of the model engine.
    #[must_use]
    pub fn engine(&self) -> &str {
        &self.engine
    }

    /// Sampling temperature.
    #[must_use]
    pub const fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Maximum length of generated output, in tokens.
    #[must_use]
    pub const fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    /// Pause between two API calls, in seconds.
    #[must_use]
    pub const fn api_time_interval(&self) -> f64 {
        self.api_time_interval
    }

    /// Whether the pipeline reports progress.
    #[must_use]
    pub const fn verbose(&self) -> bool {
        self.verbose
    }

    /// Whether the pipeline prints warnings about excessive API usage.
    #[must_use]
    pub const fn warn(&self) -> bool {
        self.warn
    }
}
