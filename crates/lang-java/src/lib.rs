//! Java template variable resolution.
//!
//! Expands code templates such as
//! `for (${t:elemType(list)} ${e:newName(list)} : ${list:iterableVar})`
//! against the symbols visible at an editor position: it finds candidate
//! variables, computes element types through generic supertypes, and keeps
//! dependent placeholders consistent while the user cycles choices.

pub mod adapters;
pub mod binding;
pub mod catalog;
pub mod config;
pub mod error;
pub mod naming;
pub mod template;
pub mod types;

pub use config::{NamingConfig, TemplateConfig};
pub use error::{Result, TemplateError};
pub use template::{TemplateEngine, TemplateSession};
pub use types::JavaTypeSystem;
