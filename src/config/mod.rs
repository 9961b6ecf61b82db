//! Configuration construction, schema, and validation.
//!
//! [`Configuration`] is built either from explicit named parameters
//! ([`ConfigBuilder`]) or from an untyped key-to-value mapping
//! ([`Configuration::from_value`]). Both paths normalize the key-list
//! fields against a fragment catalog and validate before returning.

pub mod builder;
pub mod schema;
pub mod validation;

pub use builder::ConfigBuilder;
pub use schema::{ChoiceFormat, Configuration, IndexRange, KeySelection};
pub use validation::ALLOWED_PLACEHOLDERS;
