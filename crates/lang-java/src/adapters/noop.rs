use naviscope_api::models::{TypeHandle, TypeRef};
use naviscope_api::semantic::{LookupResult, ScopeResolver, TypeHierarchy};

/// A type system that knows no types.
/// Useful when no project model is loaded: templates still expand, with `Object` everywhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpTypeSystem;

impl TypeHierarchy for NoOpTypeSystem {
    fn is_subtype_of(&self, type_fqn: &str, supertype_fqn: &str) -> LookupResult<bool> {
        Ok(type_fqn == supertype_fqn)
    }

    fn find_type(&self, _fqn: &str) -> LookupResult<Option<TypeHandle>> {
        Ok(None)
    }

    fn supertype_signatures_of(&self, _ty: &TypeHandle) -> LookupResult<Vec<TypeRef>> {
        Ok(vec![])
    }

    fn direct_subtypes_of(
        &self,
        _ty: &TypeHandle,
        _within: &[TypeHandle],
    ) -> LookupResult<Vec<TypeHandle>> {
        Ok(vec![])
    }
}

impl ScopeResolver for NoOpTypeSystem {
    fn resolve_simple_name_in_scope(&self, _name: &str, _scope: &str) -> LookupResult<Vec<String>> {
        Ok(vec![])
    }
}
