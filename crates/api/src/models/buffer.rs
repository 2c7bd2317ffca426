use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a placeholder within one template expansion.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, JsonSchema,
)]
pub struct PlaceholderId(pub usize);

impl fmt::Display for PlaceholderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A live placeholder in the rendered text. All offsets share the same value (linked editing).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
pub struct PlaceholderSpan {
    pub id: PlaceholderId,
    pub name: String,
    /// Byte offsets of every occurrence in `RenderedBuffer::text`.
    pub offsets: Vec<usize>,
    /// Byte length of the rendered value.
    pub length: usize,
    /// Values the user may cycle through; empty for plain placeholders.
    pub choices: Vec<String>,
    /// Index into `choices` of the active value.
    pub current: usize,
}

/// Result of expanding a template.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, JsonSchema)]
pub struct RenderedBuffer {
    pub text: String,
    pub placeholders: Vec<PlaceholderSpan>,
    /// Offset of the `${cursor}` placeholder, if the template has one.
    pub cursor: Option<usize>,
}

impl RenderedBuffer {
    pub fn placeholder(&self, name: &str) -> Option<&PlaceholderSpan> {
        self.placeholders.iter().find(|p| p.name == name)
    }
}
