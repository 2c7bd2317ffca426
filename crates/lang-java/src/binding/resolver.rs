use super::{BindingError, BoundSet, SupertypeHierarchy};
use crate::types::{
    JavaTypeSystem, erasure_fqn, has_package_qualifier, is_java_lang_object, is_primitive,
    qualify, simple_name, upper_bound,
};
use naviscope_api::models::{TypeHandle, TypeRef};

const DEFAULT_MAX_DEPTH: usize = 32;

/// Computes the binding of a supertype's type parameter for one declared type.
///
/// The walk goes from the target supertype down to the declared type,
/// following the first subtype path the type system reports. When the
/// target is reachable through several paths with different arguments,
/// only the first path contributes.
pub struct TypeParameterResolver<'a> {
    ts: &'a dyn JavaTypeSystem,
    hierarchy: &'a SupertypeHierarchy,
    declared_type: &'a TypeRef,
    scope: Option<&'a str>,
    local_types: &'a [String],
    max_depth: usize,
    bounds: BoundSet,
}

impl<'a> TypeParameterResolver<'a> {
    /// `declared_type` must be an instantiation of `hierarchy.root()`; its
    /// simple names are qualified against `scope`.
    pub fn new(
        ts: &'a dyn JavaTypeSystem,
        hierarchy: &'a SupertypeHierarchy,
        declared_type: &'a TypeRef,
        scope: Option<&'a str>,
    ) -> Self {
        Self {
            ts,
            hierarchy,
            declared_type,
            scope,
            local_types: &[],
            max_depth: DEFAULT_MAX_DEPTH,
            bounds: BoundSet::new(),
        }
    }

    /// FQNs of the types declared in the current compilation unit.
    pub fn with_local_types(mut self, local_types: &'a [String]) -> Self {
        self.local_types = local_types;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Bounds of type parameter `index` of `super_fqn` as seen from the declared type.
    pub fn compute_binding(
        &mut self,
        super_fqn: &str,
        index: usize,
    ) -> Result<Vec<TypeRef>, BindingError> {
        let super_type = self.ts.require_type(super_fqn)?;
        self.compute_binding_for(&super_type, index)
    }

    pub fn compute_binding_for(
        &mut self,
        super_type: &TypeHandle,
        index: usize,
    ) -> Result<Vec<TypeRef>, BindingError> {
        self.bounds = BoundSet::new();
        self.compute_type_parameter_binding(super_type, index, 0)?;
        Ok(self.bounds.as_slice().to_vec())
    }

    fn compute_type_parameter_binding(
        &mut self,
        super_type: &TypeHandle,
        index: usize,
        depth: usize,
    ) -> Result<(), BindingError> {
        if super_type.type_parameters.len() <= index {
            return Err(BindingError::OutOfBounds {
                supertype: super_type.fqn.clone(),
                index,
            });
        }
        if depth > self.max_depth {
            return Err(BindingError::IllegalHierarchy {
                subtype: self.hierarchy.root().fqn.clone(),
                supertype: super_type.fqn.clone(),
            });
        }

        let sub_types = self
            .ts
            .direct_subtypes_of(super_type, self.hierarchy.types())?;

        // All paths lead to the declared type, take the first one
        let Some(sub_type) = sub_types.into_iter().next() else {
            if super_type.fqn != self.hierarchy.root().fqn {
                return Err(BindingError::OutOfBounds {
                    supertype: super_type.fqn.clone(),
                    index,
                });
            }
            let argument = self.find_matching_type_argument(self.declared_type, index, self.scope)?;
            // Concrete or not, the argument is visible at the template position
            self.add_bound(upper_bound(&argument));
            return Ok(());
        };

        let signature = self.find_matching_supertype_signature(&sub_type, super_type)?;
        let argument =
            self.find_matching_type_argument(&signature, index, Some(sub_type.fqn.as_str()))?;

        if self.is_concrete_type(&argument, &sub_type) {
            self.add_bound(argument);
            return Ok(());
        }

        let variable = erasure_fqn(&argument);
        if let Some((k, parameter)) = sub_type
            .type_parameters
            .iter()
            .enumerate()
            .find(|(_, p)| p.name == variable)
        {
            for bound in &parameter.bounds {
                let bound = qualify(bound, Some(sub_type.fqn.as_str()), self.ts);
                self.add_bound(bound);
            }
            return self.compute_type_parameter_binding(&sub_type, k, depth + 1);
        }

        // A type variable of an enclosing type; its declaration is visible from here
        self.add_bound(argument);
        Ok(())
    }

    fn find_matching_type_argument(
        &self,
        signature: &TypeRef,
        index: usize,
        context: Option<&str>,
    ) -> Result<TypeRef, BindingError> {
        let arguments = signature.type_arguments();
        if arguments.is_empty() {
            // raw binding
            return Ok(TypeRef::object());
        }
        let Some(argument) = arguments.get(index) else {
            return Err(BindingError::OutOfBounds {
                supertype: erasure_fqn(signature),
                index,
            });
        };
        Ok(qualify(&upper_bound(argument), context, self.ts))
    }

    fn find_matching_supertype_signature(
        &self,
        sub_type: &TypeHandle,
        super_type: &TypeHandle,
    ) -> Result<TypeRef, BindingError> {
        let is_local = self.local_types.contains(&super_type.fqn);
        self.hierarchy
            .signatures_of(&sub_type.fqn)
            .iter()
            .find(|signature| {
                let fqn = erasure_fqn(signature);
                fqn == super_type.fqn || (is_local && simple_name(&fqn) == super_type.simple_name())
            })
            .cloned()
            .ok_or_else(|| BindingError::IllegalHierarchy {
                subtype: sub_type.fqn.clone(),
                supertype: super_type.fqn.clone(),
            })
    }

    fn is_concrete_type(&self, ty: &TypeRef, context: &TypeHandle) -> bool {
        if matches!(ty, TypeRef::Variable(_)) {
            return false;
        }
        if is_primitive(ty) {
            return true;
        }
        let name = erasure_fqn(ty);
        if name.is_empty() {
            return false;
        }
        let resolved = if has_package_qualifier(&name) {
            self.ts.find_type(&name).map(|t| t.is_some())
        } else {
            self.ts
                .resolve_simple_name_in_scope(&name, &context.fqn)
                .map(|names| !names.is_empty())
        };
        resolved.unwrap_or_else(|e| {
            tracing::trace!("Cannot resolve {} in {}: {}", name, context.fqn, e);
            false
        })
    }

    fn add_bound(&mut self, bound: TypeRef) {
        let ts = self.ts;
        self.bounds
            .add(bound, |sub, sup| is_true_subtype_of(ts, sub, sup));
    }
}

/// Whether `sub` equals or is a proper subtype of `sup`. Lookup failures answer `false`.
fn is_true_subtype_of(ts: &dyn JavaTypeSystem, sub: &TypeRef, sup: &TypeRef) -> bool {
    if sub == sup {
        return true;
    }
    // Object has no super types
    if is_java_lang_object(sub) {
        return false;
    }
    if !is_primitive(sub) && is_java_lang_object(sup) {
        return true;
    }
    let is_class = |t: &TypeRef| matches!(t, TypeRef::Id(_) | TypeRef::Generic { .. });
    if !is_class(sub) || !is_class(sup) {
        return false;
    }

    let sub_fqn = erasure_fqn(sub);
    let sup_fqn = erasure_fqn(sup);
    if sub_fqn == sup_fqn {
        return false;
    }
    match ts.is_subtype_of(&sub_fqn, &sup_fqn) {
        Ok(result) => result,
        Err(e) => {
            tracing::trace!("Subtype check {} <: {} failed: {}", sub_fqn, sup_fqn, e);
            false
        }
    }
}
