use crate::binding::{BindingError, SupertypeHierarchy, TypeParameterResolver};
use crate::config::TemplateConfig;
use crate::types::{
    JavaTypeSystem, element_type, erasure_fqn, has_package_qualifier, is_primitive, simple_name,
    simple_type_name,
};
use naviscope_api::models::{JAVA_LANG_OBJECT, TypeHandle, TypeRef};
use naviscope_api::semantic::LookupError;
use once_cell::unsync::OnceCell;
use std::fmt;

/// Index of a symbol within its catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub usize);

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sym{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolOrigin {
    Local,
    Field,
}

/// How a symbol can be iterated over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Array,
    /// Implements the configured collection type (and therefore the iterable type).
    Collection,
    Iterable,
    Plain,
}

/// Everything the lazy facets of a symbol are computed against.
#[derive(Clone, Copy)]
pub struct TypeContext<'a> {
    pub ts: &'a dyn JavaTypeSystem,
    pub config: &'a TemplateConfig,
    /// Type enclosing the template position; simple names are qualified against it.
    pub scope: Option<&'a str>,
    /// FQNs of the types declared in the current compilation unit.
    pub unit_types: &'a [String],
}

/// A local variable or field visible at the template position.
pub struct Symbol {
    id: SymbolId,
    name: String,
    declared_type: TypeRef,
    origin: SymbolOrigin,
    container: OnceCell<ContainerKind>,
    hierarchy: OnceCell<Option<SupertypeHierarchy>>,
    element_types: OnceCell<Vec<TypeRef>>,
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Symbol")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("declared_type", &self.declared_type.to_string())
            .field("origin", &self.origin)
            .finish()
    }
}

impl Symbol {
    pub fn new(
        id: SymbolId,
        name: impl Into<String>,
        declared_type: TypeRef,
        origin: SymbolOrigin,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            declared_type,
            origin,
            container: OnceCell::new(),
            hierarchy: OnceCell::new(),
            element_types: OnceCell::new(),
        }
    }

    pub fn id(&self) -> SymbolId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn declared_type(&self) -> &TypeRef {
        &self.declared_type
    }

    pub fn origin(&self) -> SymbolOrigin {
        self.origin
    }

    pub fn is_local(&self) -> bool {
        self.origin == SymbolOrigin::Local
    }

    pub fn is_array(&self) -> bool {
        self.declared_type.dimensions() > 0
    }

    pub fn container_kind(&self, cx: &TypeContext<'_>) -> ContainerKind {
        *self.container.get_or_init(|| {
            if self.is_array() {
                ContainerKind::Array
            } else if self.is_subtype_of(cx, &cx.config.collection_type) {
                ContainerKind::Collection
            } else if self.is_subtype_of(cx, &cx.config.iterable_type) {
                ContainerKind::Iterable
            } else {
                ContainerKind::Plain
            }
        })
    }

    pub fn is_collection(&self, cx: &TypeContext<'_>) -> bool {
        self.container_kind(cx) == ContainerKind::Collection
    }

    /// Arrays are not iterables here, even though both work in a for-each loop.
    pub fn is_iterable(&self, cx: &TypeContext<'_>) -> bool {
        matches!(
            self.container_kind(cx),
            ContainerKind::Collection | ContainerKind::Iterable
        )
    }

    /// Whether the declared type is assignable to `supertype`.
    ///
    /// `supertype` is Java source text and may carry array brackets
    /// (`java.lang.Object[]`). A simple name matches any supertype with that
    /// simple name.
    pub fn is_subtype_of(&self, cx: &TypeContext<'_>, supertype: &str) -> bool {
        let implementor = erasure_fqn(&self.declared_type);
        if implementor.is_empty() {
            return false;
        }

        let implementor_dims = self.declared_type.dimensions();
        let (supertype, super_dims) = match supertype.find("[]") {
            Some(pos) => (supertype[..pos].trim(), (supertype.len() - pos) / 2),
            None => (supertype.trim(), 0),
        };
        if implementor_dims > super_dims {
            return supertype == JAVA_LANG_OBJECT;
        }
        if implementor_dims != super_dims {
            return false;
        }

        let qualified = supertype.contains('.');
        if implementor == supertype || (!qualified && simple_name(&implementor) == supertype) {
            return true;
        }
        if is_primitive(self.element_or_self()) {
            return false;
        }

        if qualified {
            match cx.ts.is_subtype_of(&implementor, supertype) {
                Ok(result) => result,
                Err(e) => {
                    tracing::debug!("Subtype check {} <: {} failed: {}", implementor, supertype, e);
                    false
                }
            }
        } else {
            self.hierarchy(cx)
                .is_some_and(|h| !h.find_by_simple_name(supertype).is_empty())
        }
    }

    fn element_or_self(&self) -> &TypeRef {
        match &self.declared_type {
            TypeRef::Array { element, .. } => element,
            other => other,
        }
    }

    /// Supertype hierarchy of the declared type, `None` for arrays, primitives and unknown types.
    pub fn hierarchy(&self, cx: &TypeContext<'_>) -> Option<&SupertypeHierarchy> {
        self.hierarchy
            .get_or_init(|| {
                if self.is_array() || is_primitive(&self.declared_type) {
                    return None;
                }
                let fqn = erasure_fqn(&self.declared_type);
                if fqn.is_empty() {
                    return None;
                }
                SupertypeHierarchy::build(cx.ts, &fqn, cx.config.max_hierarchy_depth)
                    .map_err(|e| tracing::debug!("No hierarchy for {}: {}", self.name, e))
                    .ok()
            })
            .as_ref()
    }

    /// Bounds of the element type: the component type of an array, the
    /// iterated type of an iterable, `Object` otherwise.
    ///
    /// Never empty. More than one bound only when the element type is
    /// constrained by several unrelated types.
    pub fn element_types(&self, cx: &TypeContext<'_>) -> &[TypeRef] {
        self.element_types
            .get_or_init(|| self.compute_element_types(cx))
    }

    /// First bound of the element type.
    pub fn element_type(&self, cx: &TypeContext<'_>) -> &TypeRef {
        &self.element_types(cx)[0]
    }

    fn compute_element_types(&self, cx: &TypeContext<'_>) -> Vec<TypeRef> {
        if let Some(element) = element_type(&self.declared_type) {
            return vec![element];
        }
        if !self.is_iterable(cx) {
            return vec![TypeRef::object()];
        }

        let bounds = match self.binding(cx, &cx.config.iterable_type, 0) {
            Err(BindingError::Lookup(e)) => {
                tracing::debug!(
                    "Cannot bind {} for {}, trying {}: {}",
                    cx.config.iterable_type,
                    self.name,
                    cx.config.collection_type,
                    e
                );
                self.binding(cx, &cx.config.collection_type, 0)
            }
            other => other,
        };

        match bounds {
            Ok(bounds) if !bounds.is_empty() => bounds,
            Ok(_) => vec![TypeRef::object()],
            Err(e) => {
                tracing::debug!("Element type of {} falls back to Object: {}", self.name, e);
                vec![TypeRef::object()]
            }
        }
    }

    fn binding(
        &self,
        cx: &TypeContext<'_>,
        super_fqn: &str,
        index: usize,
    ) -> Result<Vec<TypeRef>, BindingError> {
        let hierarchy = self.hierarchy(cx).ok_or_else(|| {
            BindingError::Lookup(LookupError::TypeNotFound(erasure_fqn(&self.declared_type)))
        })?;
        self.resolver(cx, hierarchy)
            .compute_binding(super_fqn, index)
    }

    fn resolver<'a>(
        &'a self,
        cx: &TypeContext<'a>,
        hierarchy: &'a SupertypeHierarchy,
    ) -> TypeParameterResolver<'a> {
        TypeParameterResolver::new(cx.ts, hierarchy, &self.declared_type, cx.scope)
            .with_local_types(cx.unit_types)
            .with_max_depth(cx.config.max_hierarchy_depth)
    }

    /// Bounds of type argument `index` of `supertype` as seen from this symbol.
    ///
    /// A simple `supertype` name matches every supertype with that simple
    /// name and their bounds are concatenated. Falls back to `[Object]`.
    pub fn type_argument_bounds(
        &self,
        cx: &TypeContext<'_>,
        supertype: &str,
        index: usize,
    ) -> Vec<TypeRef> {
        let mut all = Vec::new();
        if let Some(hierarchy) = self.hierarchy(cx) {
            let targets: Vec<&TypeHandle> = if supertype.contains('.') {
                hierarchy.get(supertype).into_iter().collect()
            } else {
                hierarchy.find_by_simple_name(supertype)
            };
            for target in targets {
                match self.resolver(cx, hierarchy).compute_binding_for(target, index) {
                    Ok(bounds) => all.extend(bounds),
                    Err(e) => tracing::trace!(
                        "No binding of {}#{} for {}: {}",
                        target.fqn,
                        index,
                        self.name,
                        e
                    ),
                }
            }
        }
        if all.is_empty() {
            all.push(TypeRef::object());
        }
        all
    }

    /// Element types as they would be written in the current compilation unit.
    pub fn member_type_names(&self, cx: &TypeContext<'_>) -> Vec<String> {
        self.element_types(cx)
            .iter()
            .map(|ty| type_name_in_unit(ty, cx.unit_types))
            .collect()
    }

    /// Bounds of type argument `index` as they would be written in the current compilation unit.
    pub fn type_argument_bound_names(
        &self,
        cx: &TypeContext<'_>,
        supertype: &str,
        index: usize,
    ) -> Vec<String> {
        self.type_argument_bounds(cx, supertype, index)
            .iter()
            .map(|ty| type_name_in_unit(ty, cx.unit_types))
            .collect()
    }
}

/// Render `ty` by simple name; types declared in the unit keep their
/// enclosing type path (`Outer.Inner`).
pub(crate) fn type_name_in_unit(ty: &TypeRef, unit_types: &[String]) -> String {
    let fqn = erasure_fqn(ty);
    if unit_types.iter().any(|t| *t == fqn) && has_package_qualifier(&fqn) {
        let local = strip_package(&fqn);
        return format!("{}{}", local, "[]".repeat(ty.dimensions()));
    }
    simple_type_name(ty)
}

fn strip_package(fqn: &str) -> &str {
    let mut rest = fqn;
    while let Some((head, tail)) = rest.split_once('.') {
        if !head.chars().next().is_some_and(char::is_lowercase) {
            break;
        }
        rest = tail;
    }
    rest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_types_keep_enclosing_path() {
        let unit = vec!["com.shop.Cart.Line".to_string()];
        let ty = TypeRef::array(TypeRef::id("com.shop.Cart.Line"), 1);
        assert_eq!(type_name_in_unit(&ty, &unit), "Cart.Line[]");
    }

    #[test]
    fn test_foreign_types_use_simple_names() {
        let ty = TypeRef::generic(
            "java.util.List",
            vec![TypeRef::id("java.lang.String")],
        );
        assert_eq!(type_name_in_unit(&ty, &[]), "List<String>");
    }
}
