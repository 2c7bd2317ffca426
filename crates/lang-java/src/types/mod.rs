//! Type descriptor algebra.
//!
//! The only place that understands type syntax: parsing descriptor text,
//! wildcard bounds, erasure and qualification. Everything here is pure
//! except [`qualify`], which asks a [`ScopeResolver`] for simple names.

mod bounds;
mod parse;

pub use bounds::{
    element_type, erasure_fqn, has_package_qualifier, is_java_lang_object, is_primitive,
    lower_bound, qualify, simple_name, simple_type_name, upper_bound,
};
pub use parse::{
    TypeParseError, mark_variables, parse_type, parse_type_or_object, parse_type_with_variables,
};

use naviscope_api::models::TypeHandle;
use naviscope_api::semantic::{LookupError, LookupResult, ScopeResolver, TypeHierarchy};

/// The combined type system interface consumed by the engine.
pub trait JavaTypeSystem: TypeHierarchy + ScopeResolver {
    /// Like `find_type`, but a missing type is a lookup failure.
    fn require_type(&self, fqn: &str) -> LookupResult<TypeHandle> {
        self.find_type(fqn)?
            .ok_or_else(|| LookupError::TypeNotFound(fqn.to_string()))
    }
}

// Blanket implementation: any host implementing both collaborators is a JavaTypeSystem
impl<T: TypeHierarchy + ScopeResolver> JavaTypeSystem for T {}
