use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Location in a source document where a template is expanded.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, JsonSchema)]
pub struct PositionContext {
    pub uri: String,
    pub line: u32,
    pub char: u32,
}

impl PositionContext {
    pub fn new(uri: impl Into<String>, line: u32, char: u32) -> Self {
        Self {
            uri: uri.into(),
            line,
            char,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, JsonSchema)]
pub enum CompletionKind {
    LocalVariableRef,
    FieldRef,
    /// Methods, types, packages, keywords, ...
    Other,
}

/// A single proposal reported by the code-completion collaborator.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
pub struct CompletionItem {
    pub kind: CompletionKind,
    pub name: String,
    /// Declared type in Java source syntax, e.g. "java.util.List<java.lang.String>"
    pub type_descriptor: String,
}

impl CompletionItem {
    pub fn local(name: impl Into<String>, type_descriptor: impl Into<String>) -> Self {
        Self {
            kind: CompletionKind::LocalVariableRef,
            name: name.into(),
            type_descriptor: type_descriptor.into(),
        }
    }

    pub fn field(name: impl Into<String>, type_descriptor: impl Into<String>) -> Self {
        Self {
            kind: CompletionKind::FieldRef,
            name: name.into(),
            type_descriptor: type_descriptor.into(),
        }
    }
}

/// Everything the completion collaborator knows at a position.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, JsonSchema)]
pub struct CompletionResult {
    /// Proposals in completion-engine order.
    pub items: Vec<CompletionItem>,
    /// FQN of the primary type enclosing the position; simple names are qualified against it.
    pub enclosing_type: Option<String>,
    /// FQNs of all types declared in the compilation unit.
    pub unit_types: Vec<String>,
}
