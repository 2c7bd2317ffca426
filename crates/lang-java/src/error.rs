use naviscope_api::{ApiError, PlaceholderId};
use thiserror::Error;

pub use crate::binding::BindingError;
pub use crate::types::TypeParseError;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Template syntax error at offset {offset}: {message}")]
    Syntax { offset: usize, message: String },
    #[error("Unknown placeholder: {0}")]
    UnknownPlaceholder(PlaceholderId),
    #[error("Choice {index} out of range for placeholder {placeholder} ({len} choices)")]
    InvalidChoice {
        placeholder: PlaceholderId,
        index: usize,
        len: usize,
    },
    #[error("Template session already terminated")]
    SessionTerminated,
    #[error("Dependency {master} -> {slave} would create a cycle")]
    DependencyCycle {
        master: PlaceholderId,
        slave: PlaceholderId,
    },
}

pub type Result<T> = std::result::Result<T, TemplateError>;

impl From<TemplateError> for ApiError {
    fn from(err: TemplateError) -> Self {
        match err {
            TemplateError::UnknownPlaceholder(id) => ApiError::NotFound(id.to_string()),
            TemplateError::SessionTerminated => ApiError::NoActiveSession,
            TemplateError::Syntax { .. } | TemplateError::InvalidChoice { .. } => {
                ApiError::InvalidArgument(err.to_string())
            }
            TemplateError::DependencyCycle { .. } => ApiError::Internal(err.to_string()),
        }
    }
}
