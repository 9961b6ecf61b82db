//! Bundled fragment library.
//!
//! Prompt fragments (instructions, chain-of-thought triggers, and answer
//! extraction prompts) are keyed by short identifiers and grouped into
//! three sections. The bundled catalog is embedded at compile time and
//! parsed once per process; it is never mutated after load, so sharing it
//! across threads needs no locking.

use std::sync::OnceLock;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Raw bundled catalog document.
const BUNDLED_FRAGMENTS: &str = include_str!("../data/fragments.json");

/// Which section of the catalog a key refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FragmentKind {
    /// Task instructions, inserted under `{instruction}`.
    Instruction,
    /// Chain-of-thought triggers, inserted under `{cot_trigger}`.
    CotTrigger,
    /// Answer extraction prompts, inserted under `{answer_extraction}`.
    AnswerExtraction,
}

impl FragmentKind {
    /// Section name as it appears in the catalog document.
    #[must_use]
    pub const fn section_name(self) -> &'static str {
        match self {
            Self::Instruction => "instructions",
            Self::CotTrigger => "cot_triggers",
            Self::AnswerExtraction => "answer_extractions",
        }
    }
}

/// A read-only library of prompt fragments.
///
/// Section maps preserve document order; "all" normalization enumerates
/// keys in exactly this order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragmentCatalog {
    /// Instruction fragments.
    pub instructions: IndexMap<String, String>,
    /// Chain-of-thought trigger fragments.
    pub cot_triggers: IndexMap<String, String>,
    /// Answer extraction fragments.
    pub answer_extractions: IndexMap<String, String>,
}

impl FragmentCatalog {
    /// Returns the catalog bundled with the crate.
    ///
    /// Parsed on first use and shared for the lifetime of the process.
    #[must_use]
    pub fn bundled() -> &'static Self {
        static CATALOG: OnceLock<FragmentCatalog> = OnceLock::new();
        CATALOG.get_or_init(|| {
            serde_json::from_str(BUNDLED_FRAGMENTS).expect("bundled fragments.json is well-formed")
        })
    }

    /// Parses a catalog from a JSON document.
    ///
    /// Lets callers substitute their own fragment library (or a minimal one
    /// in tests) for the bundled data.
    ///
    /// # Errors
    ///
    /// Returns the parse error if the document does not match the
    /// three-section catalog shape.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Returns the section for `kind`.
    #[must_use]
    pub const fn section(&self, kind: FragmentKind) -> &IndexMap<String, String> {
        match kind {
            FragmentKind::Instruction => &self.instructions,
            FragmentKind::CotTrigger => &self.cot_triggers,
            FragmentKind::AnswerExtraction => &self.answer_extractions,
        }
    }

    /// Looks up a fragment text by section and key.
    #[must_use]
    pub fn fragment(&self, kind: FragmentKind, key: &str) -> Option<&str> {
        self.section(kind).get(key).map(String::as_str)
    }
}
