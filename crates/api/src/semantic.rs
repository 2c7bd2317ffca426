use crate::models::{CompletionResult, PositionContext, TypeHandle, TypeRef};
use thiserror::Error;

/// Failure reported by an external collaborator.
///
/// The template engine never surfaces these to the user; they degrade
/// suggestions to `java.lang.Object` or to an empty candidate list.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("Type not found: {0}")]
    TypeNotFound(String),
    #[error("Project model unavailable: {0}")]
    Unavailable(String),
    #[error("Completion failed: {0}")]
    Completion(String),
}

pub type LookupResult<T> = std::result::Result<T, LookupError>;

// ============================================================================
// Collaborators consumed by the template engine
// ============================================================================

/// Code completion at a source position.
pub trait CompletionProvider: Send + Sync {
    /// Report every proposal visible at `position`, in completion-engine order.
    fn complete_at(&self, position: &PositionContext) -> LookupResult<CompletionResult>;
}

/// Type hierarchy queries over the project model.
pub trait TypeHierarchy: Send + Sync {
    /// Whether `type_fqn` equals or (transitively) extends/implements `supertype_fqn`.
    fn is_subtype_of(&self, type_fqn: &str, supertype_fqn: &str) -> LookupResult<bool>;

    /// Look up a type by fully qualified name. `Ok(None)` when the type does not exist.
    fn find_type(&self, fqn: &str) -> LookupResult<Option<TypeHandle>>;

    /// Direct supertype signatures of `ty` as declared in source: superclass first, then interfaces.
    ///
    /// Type arguments referring to the type's own parameters are `TypeRef::Variable`.
    fn supertype_signatures_of(&self, ty: &TypeHandle) -> LookupResult<Vec<TypeRef>>;

    /// Types among `within` that directly extend or implement `ty`, in `within` order.
    fn direct_subtypes_of(
        &self,
        ty: &TypeHandle,
        within: &[TypeHandle],
    ) -> LookupResult<Vec<TypeHandle>>;
}

/// Resolution of simple type names.
pub trait ScopeResolver: Send + Sync {
    /// Qualified names a simple `name` may denote when referenced from inside type `scope`.
    fn resolve_simple_name_in_scope(&self, name: &str, scope: &str) -> LookupResult<Vec<String>>;
}
