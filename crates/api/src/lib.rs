pub mod error;
pub mod models;
pub mod semantic;
pub mod template;

// Re-export commonly used types
pub use error::{ApiError, ApiResult};
pub use models::*;
pub use semantic::{CompletionProvider, LookupError, LookupResult, ScopeResolver, TypeHierarchy};
pub use template::TemplateService;
