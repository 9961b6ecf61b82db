//! `chainprompt`: configuration for chain-of-thought prompt generation and
//! answer extraction.
//!
//! This crate models the parameter set that drives a generation/extraction
//! pipeline: which prompt fragments to combine, how multiple-choice answers
//! are indexed, and which slice of a dataset is processed. Construction
//! normalizes shorthand selections ("all", nothing chosen) against a
//! read-only [`FragmentCatalog`] and validates the result; an invalid
//! parameter set never yields an instance.
//!
//! ```
//! use chainprompt::{Configuration, IndexRange, KeySelection};
//!
//! let config = Configuration::builder()
//!     .idx_range(IndexRange::Span(0, 100))
//!     .instruction_keys(KeySelection::All)
//!     .build()?;
//! assert_eq!(config.instruction_keys().first(), Some(&None));
//! # Ok::<(), chainprompt::ConfigError>(())
//! ```

pub mod config;
pub mod error;
pub mod fragments;

pub use config::{ChoiceFormat, ConfigBuilder, Configuration, IndexRange, KeySelection};
pub use error::{ConfigError, Result};
pub use fragments::{FragmentCatalog, FragmentKind};
