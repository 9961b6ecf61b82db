//! Configuration construction.
//!
//! Two entry points: [`ConfigBuilder`] for explicit named parameters and
//! [`Configuration::from_value`] for untyped key-to-value mappings. Both
//! funnel into the same normalize-then-validate pipeline; a parameter set
//! that fails any check never yields an instance.

use serde_json::Value;

use crate::config::schema::{
    ALL_SENTINEL, ChoiceFormat, Configuration, DEFAULT_TEMPLATE_ANSWER_EXTRACTION,
    DEFAULT_TEMPLATE_COT_GENERATION, IndexRange, KeySelection,
};
use crate::config::validation;
use crate::error::{ConfigError, Result};
use crate::fragments::{FragmentCatalog, FragmentKind};

const DEFAULT_FRAGMENT_KEY: &str = "kojima-01";
const DEFAULT_API_SERVICE: &str = "huggingface_hub";
const DEFAULT_ENGINE: &str = "google/flan-t5-xl";
const DEFAULT_TEMPERATURE: f64 = 0.0;
const DEFAULT_MAX_TOKENS: u32 = 128;
const DEFAULT_API_TIME_INTERVAL: f64 = 1.0;

/// Field names accepted by the mapping constructor, in schema order.
const FIELD_NAMES: [&str; 15] = [
    "idx_range",
    "multiple_choice_answer_format",
    "instruction_keys",
    "cot_trigger_keys",
    "answer_extraction_keys",
    "template_cot_generation",
    "template_answer_extraction",
    "author",
    "api_service",
    "engine",
    "temperature",
    "max_tokens",
    "api_time_interval",
    "verbose",
    "warn",
];

/// Builder for [`Configuration`].
///
/// Every setter is optional; unset fields take the documented defaults.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    idx_range: IndexRange,
    multiple_choice_answer_format: Option<ChoiceFormat>,
    instruction_keys: KeySelection,
    cot_trigger_keys: KeySelection,
    answer_extraction_keys: KeySelection,
    template_cot_generation: String,
    template_answer_extraction: String,
    author: String,
    api_service: String,
    engine: String,
    temperature: f64,
    max_tokens: u32,
    api_time_interval: f64,
    verbose: bool,
    warn: bool,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self {
            idx_range: IndexRange::All,
            multiple_choice_answer_format: Some(ChoiceFormat::Letters),
            instruction_keys: KeySelection::Unset,
            cot_trigger_keys: KeySelection::Explicit(vec![Some(DEFAULT_FRAGMENT_KEY.to_string())]),
            answer_extraction_keys: KeySelection::Explicit(vec![Some(
                DEFAULT_FRAGMENT_KEY.to_string(),
            )]),
            template_cot_generation: DEFAULT_TEMPLATE_COT_GENERATION.to_string(),
            template_answer_extraction: DEFAULT_TEMPLATE_ANSWER_EXTRACTION.to_string(),
            author: String::new(),
            api_service: DEFAULT_API_SERVICE.to_string(),
            engine: DEFAULT_ENGINE.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            api_time_interval: DEFAULT_API_TIME_INTERVAL,
            verbose: true,
            warn: true,
        }
    }
}

impl ConfigBuilder {
    /// Sets the dataset index window.
    #[must_use]
    pub const fn idx_range(mut self, range: IndexRange) -> Self {
        self.idx_range = range;
        self
    }

    /// Sets the multiple-choice index style; `None` renders choices
    /// without an index.
    #[must_use]
    pub const fn multiple_choice_answer_format(mut self, format: Option<ChoiceFormat>) -> Self {
        self.multiple_choice_answer_format = format;
        self
    }

    /// Selects the instruction fragments to iterate over.
    #[must_use]
    pub fn instruction_keys(mut self, keys: KeySelection) -> Self {
        self.instruction_keys = keys;
        self
    }

    /// Selects the chain-of-thought trigger fragments to iterate over.
    #[must_use]
    pub fn cot_trigger_keys(mut self, keys: KeySelection) -> Self {
        self.cot_trigger_keys = keys;
        self
    }

    /// Selects the answer extraction fragments to iterate over.
    #[must_use]
    pub fn answer_extraction_keys(mut self, keys: KeySelection) -> Self {
        self.answer_extraction_keys = keys;
        self
    }

    /// Sets the model input template for the generation step.
    #[must_use]
    pub fn template_cot_generation(mut self, template: impl Into<String>) -> Self {
        self.template_cot_generation = template.into();
        self
    }

    /// Sets the model input template for the answer extraction step.
    #[must_use]
    pub fn template_answer_extraction(mut self, template: impl Into<String>) -> Self {
        self.template_answer_extraction = template.into();
        self
    }

    /// Sets the author recorded for the run.
    #[must_use]
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Sets the API service backend name.
    #[must_use]
    pub fn api_service(mut self, api_service: impl Into<String>) -> Self {
        self.api_service = api_service.into();
        self
    }

    /// Sets the model engine name.
    #[must_use]
    pub fn engine(mut self, engine: impl Into<String>) -> Self {
        self.engine = engine.into();
        self
    }

    /// Sets the sampling temperature.
    #[must_use]
    pub const fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Sets the maximum generated output length, in tokens.
    #[must_use]
    pub const fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Sets the pause between two API calls, in seconds.
    #[must_use]
    pub const fn api_time_interval(mut self, interval: f64) -> Self {
        self.api_time_interval = interval;
        self
    }

    /// Sets whether the pipeline reports progress.
    #[must_use]
    pub const fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Sets whether the pipeline prints API usage warnings.
    #[must_use]
    pub const fn warn(mut self, warn: bool) -> Self {
        self.warn = warn;
        self
    }

    /// Normalizes and validates against the bundled catalog.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule; see [`crate::error::ConfigError`].
    pub fn build(self) -> Result<Configuration> {
        self.build_with(FragmentCatalog::bundled())
    }

    /// Normalizes and validates against a caller-supplied catalog.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule; see [`crate::error::ConfigError`].
    pub fn build_with(self, catalog: &FragmentCatalog) -> Result<Configuration> {
        let config = Configuration {
            idx_range: self.idx_range,
            multiple_choice_answer_format: self.multiple_choice_answer_format,
            instruction_keys: self
                .instruction_keys
                .resolve(catalog.section(FragmentKind::Instruction)),
            cot_trigger_keys: self
                .cot_trigger_keys
                .resolve(catalog.section(FragmentKind::CotTrigger)),
            answer_extraction_keys: self
                .answer_extraction_keys
                .resolve(catalog.section(FragmentKind::AnswerExtraction)),
            template_cot_generation: self.template_cot_generation,
            template_answer_extraction: self.template_answer_extraction,
            author: self.author,
            api_service: self.api_service,
            engine: self.engine,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            api_time_interval: self.api_time_interval,
            verbose: self.verbose,
            warn: self.warn,
        };

        validation::validate(&config)?;

        tracing::debug!(
            instruction_keys = config.instruction_keys.len(),
            cot_trigger_keys = config.cot_trigger_keys.len(),
            answer_extraction_keys = config.answer_extraction_keys.len(),
            "configuration constructed"
        );
        for gap in config.template_key_mismatches() {
            tracing::debug!("{gap}");
        }

        Ok(config)
    }
}

impl Configuration {
    /// Constructs a configuration from an untyped key-to-value mapping,
    /// resolving against the bundled catalog.
    ///
    /// # Errors
    ///
    /// See [`Configuration::from_value_with`].
    pub fn from_value(value: &Value) -> Result<Self> {
        Self::from_value_with(value, FragmentCatalog::bundled())
    }

    /// Constructs a configuration from an untyped key-to-value mapping,
    /// resolving against a caller-supplied catalog.
    ///
    /// Unspecified fields take their defaults, exactly as with the builder.
    ///
    /// # Errors
    ///
    /// Rejects keys with no matching field (`UnknownParameterName`, with a
    /// nearest-name suggestion where one is close enough) and any field
    /// whose value does not match the declared shape, then applies the same
    /// validation as the builder path.
    pub fn from_value_with(value: &Value, catalog: &FragmentCatalog) -> Result<Self> {
        let Value::Object(map) = value else {
            return Err(ConfigError::InvalidFieldType {
                field: "configuration",
                expected: "a key-to-value mapping",
                got: json_type_name(value).to_string(),
            });
        };

        for key in map.keys() {
            if !FIELD_NAMES.contains(&key.as_str()) {
                return Err(ConfigError::UnknownParameterName {
                    name: key.clone(),
                    suggestion: suggest_field(key),
                });
            }
        }

        let mut builder = ConfigBuilder::default();
        if let Some(v) = map.get("idx_range") {
            builder.idx_range = parse_idx_range(v)?;
        }
        if let Some(v) = map.get("multiple_choice_answer_format") {
            builder.multiple_choice_answer_format = parse_choice_format(v)?;
        }
        if let Some(v) = map.get("instruction_keys") {
            builder.instruction_keys = parse_key_selection("instruction_keys", v)?;
        }
        if let Some(v) = map.get("cot_trigger_keys") {
            builder.cot_trigger_keys = parse_key_selection("cot_trigger_keys", v)?;
        }
        if let Some(v) = map.get("answer_extraction_keys") {
            builder.answer_extraction_keys = parse_key_selection("answer_extraction_keys", v)?;
        }
        if let Some(v) = map.get("template_cot_generation") {
            builder.template_cot_generation = parse_string("template_cot_generation", v)?;
        }
        if let Some(v) = map.get("template_answer_extraction") {
            builder.template_answer_extraction = parse_string("template_answer_extraction", v)?;
        }
        if let Some(v) = map.get("author") {
            builder.author = parse_string("author", v)?;
        }
        if let Some(v) = map.get("api_service") {
            builder.api_service = parse_string("api_service", v)?;
        }
        if let Some(v) = map.get("engine") {
            builder.engine = parse_string("engine", v)?;
        }
        if let Some(v) = map.get("temperature") {
            builder.temperature = parse_number("temperature", v)?;
        }
        if let Some(v) = map.get("max_tokens") {
            builder.max_tokens = parse_integer("max_tokens", v)?;
        }
        if let Some(v) = map.get("api_time_interval") {
            builder.api_time_interval = parse_number("api_time_interval", v)?;
        }
        if let Some(v) = map.get("verbose") {
            builder.verbose = parse_bool("verbose", v)?;
        }
        if let Some(v) = map.get("warn") {
            builder.warn = parse_bool("warn", v)?;
        }

        builder.build_with(catalog)
    }
}

fn parse_idx_range(value: &Value) -> Result<IndexRange> {
    match value {
        Value::String(s) if s == ALL_SENTINEL => Ok(IndexRange::All),
        Value::Array(items) => {
            if let [a, b] = items.as_slice()
                && let (Some(start), Some(end)) = (a.as_i64(), b.as_i64())
            {
                return Ok(IndexRange::Span(start, end));
            }
            Err(ConfigError::InvalidIndexRange {
                got: render_value(value),
            })
        }
        _ => Err(ConfigError::InvalidIndexRange {
            got: render_value(value),
        }),
    }
}

fn parse_choice_format(value: &Value) -> Result<Option<ChoiceFormat>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) if s == "Letters" => Ok(Some(ChoiceFormat::Letters)),
        Value::String(s) if s == "Numbers" => Ok(Some(ChoiceFormat::Numbers)),
        _ => Err(ConfigError::InvalidEnumValue {
            field: "multiple_choice_answer_format",
            value: render_value(value),
            expected: "\"Letters\", \"Numbers\" or null",
        }),
    }
}

fn parse_key_selection(field: &'static str, value: &Value) -> Result<KeySelection> {
    match value {
        Value::String(s) if s == ALL_SENTINEL => Ok(KeySelection::All),
        Value::Null => Ok(KeySelection::Unset),
        Value::Array(items) => {
            let mut keys = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::Null => keys.push(None),
                    Value::String(s) => keys.push(Some(s.clone())),
                    _ => {
                        return Err(ConfigError::InvalidKeyListShape {
                            field,
                            got: format!("a sequence containing {}", json_type_name(item)),
                        });
                    }
                }
            }
            Ok(KeySelection::Explicit(keys))
        }
        _ => Err(ConfigError::InvalidKeyListShape {
            field,
            got: json_type_name(value).to_string(),
        }),
    }
}

fn parse_string(field: &'static str, value: &Value) -> Result<String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ConfigError::InvalidFieldType {
            field,
            expected: "a string",
            got: json_type_name(value).to_string(),
        })
}

fn parse_number(field: &'static str, value: &Value) -> Result<f64> {
    value.as_f64().ok_or_else(|| ConfigError::InvalidFieldType {
        field,
        expected: "a number",
        got: json_type_name(value).to_string(),
    })
}

fn parse_integer(field: &'static str, value: &Value) -> Result<u32> {
    value
        .as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| ConfigError::InvalidFieldType {
            field,
            expected: "a non-negative integer",
            got: match value {
                Value::Number(_) => render_value(value),
                _ => json_type_name(value).to_string(),
            },
        })
}

fn parse_bool(field: &'static str, value: &Value) -> Result<bool> {
    value.as_bool().ok_or_else(|| ConfigError::InvalidFieldType {
        field,
        expected: "a boolean",
        got: json_type_name(value).to_string(),
    })
}

/// Renders a value for an error message: strings bare, everything else as
/// compact JSON.
fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        _ => value.to_string(),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Suggests the closest field name for an unknown parameter.
fn suggest_field(input: &str) -> Option<String> {
    FIELD_NAMES
        .iter()
        .map(|name| (*name, strsim::damerau_levenshtein(input, name)))
        .filter(|(_, dist)| *dist <= 3)
        .min_by_key(|(_, dist)| *dist)
        .map(|(name, _)| name.to_string())
}
