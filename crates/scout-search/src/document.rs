//! Engine-side values carried by search hits: documents, highlights and suggestions.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A stored document as returned in a hit's `_source`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Document id.
    id: String,
    /// Stored fields; empty when `_source` was filtered out.
    content: Map<String, Value>,
}

impl Document {
    /// Creates a document.
    pub fn new(id: impl Into<String>, content: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            content,
        }
    }

    /// Returns the document id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the stored fields.
    pub fn content(&self) -> &Map<String, Value> {
        &self.content
    }

    /// Returns one stored field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.content.get(field)
    }

    /// Consumes the document, returning its fields.
    pub fn into_content(self) -> Map<String, Value> {
        self.content
    }
}

/// Highlighted fragments of one hit, keyed by field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Highlight {
    /// Raw `highlight` object from the hit.
    raw: Map<String, Value>,
}

impl Highlight {
    /// Wraps a raw `highlight` object.
    pub fn new(raw: Map<String, Value>) -> Self {
        Self { raw }
    }

    /// Returns the raw object.
    pub fn raw(&self) -> &Map<String, Value> {
        &self.raw
    }

    /// Returns the highlighted fields.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.raw.keys().map(String::as_str)
    }

    /// Returns the fragments of one field. Non-string fragments are skipped.
    pub fn snippets(&self, field: &str) -> Vec<&str> {
        self.raw
            .get(field)
            .and_then(Value::as_array)
            .map(|fragments| fragments.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }
}

/// One entry of a suggester's output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Analyzed text the entry suggests for.
    pub text: String,
    /// Offset of the text in the suggest input.
    pub offset: usize,
    /// Length of the text.
    pub length: usize,
    /// Suggested options, as returned by the engine.
    #[serde(default)]
    pub options: Vec<Value>,
}

impl Suggestion {
    /// Returns the `text` of each option.
    pub fn option_texts(&self) -> Vec<&str> {
        self.options
            .iter()
            .filter_map(|option| option.get("text").and_then(Value::as_str))
            .collect()
    }
}
