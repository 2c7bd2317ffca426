//! Template expansion.
//!
//! A template is parsed into placeholders, each placeholder gets a resolver
//! from its type, and a [`TemplateSession`] resolves them against the
//! symbols visible at the expansion position. Placeholders computed from
//! another placeholder are linked in a [`DependencyGraph`] so that cycling
//! the master's choices keeps every slave consistent.

mod engine;
mod graph;
mod parse;
mod placeholder;
mod resolvers;
mod session;

pub use engine::TemplateEngine;
pub use graph::DependencyGraph;
pub use parse::{ParsedTemplate, Segment, TemplateVariable, parse_template};
pub use placeholder::{Choice, ChoiceKey, MultiChoice, Placeholder, PlaceholderValue};
pub use session::{SessionState, TemplateSession};
