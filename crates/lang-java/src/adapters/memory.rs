use crate::types::{erasure_fqn, has_package_qualifier, parse_type_with_variables, simple_name};
use naviscope_api::models::{JAVA_LANG_OBJECT, TypeHandle, TypeKind, TypeParameter, TypeRef};
use naviscope_api::semantic::{LookupResult, ScopeResolver, TypeHierarchy};
use std::collections::{HashMap, HashSet, VecDeque};

/// A project model held in memory.
///
/// Built with a fluent API from Java source text:
///
/// ```ignore
/// let ts = InMemoryTypeSystem::new()
///     .add_interface("java.lang.Iterable", &["T"], &[])
///     .add_interface("java.util.Collection", &["E"], &["Iterable<E>"])
///     .add_class("com.shop.OrderList", &[], &["java.util.ArrayList<Order>"]);
/// ```
///
/// Imports are not modeled: a simple name resolves to member types of the
/// scope, then its package, then `java.lang`, then any type with that name.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTypeSystem {
    types: HashMap<String, TypeHandle>,
    /// Declared supertypes, superclass first.
    supertypes: HashMap<String, Vec<TypeRef>>,
}

impl InMemoryTypeSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a class.
    ///
    /// `type_parameters` are declarations such as `E` or `N extends Number`.
    /// `supertypes` may refer to them.
    pub fn add_class(self, fqn: &str, type_parameters: &[&str], supertypes: &[&str]) -> Self {
        self.declare(fqn, TypeKind::Class, type_parameters, supertypes)
    }

    pub fn add_interface(self, fqn: &str, type_parameters: &[&str], supertypes: &[&str]) -> Self {
        self.declare(fqn, TypeKind::Interface, type_parameters, supertypes)
    }

    /// Add a type from already structured parts.
    pub fn add_type(mut self, handle: TypeHandle, supertypes: Vec<TypeRef>) -> Self {
        self.supertypes.insert(handle.fqn.clone(), supertypes);
        self.types.insert(handle.fqn.clone(), handle);
        self
    }

    /// Add a supertype to an existing type.
    pub fn implements(mut self, fqn: &str, supertype: &str) -> Self {
        let variables: Vec<String> = self
            .types
            .get(fqn)
            .map(|t| t.type_parameters.iter().map(|p| p.name.clone()).collect())
            .unwrap_or_default();
        let variables: Vec<&str> = variables.iter().map(String::as_str).collect();
        match parse_type_with_variables(supertype, &variables) {
            Ok(sig) => self.supertypes.entry(fqn.to_string()).or_default().push(sig),
            Err(e) => tracing::warn!("Ignoring supertype of {}: {}", fqn, e),
        }
        self
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    fn declare(
        self,
        fqn: &str,
        kind: TypeKind,
        type_parameters: &[&str],
        supertypes: &[&str],
    ) -> Self {
        let names: Vec<&str> = type_parameters
            .iter()
            .map(|decl| decl.split_whitespace().next().unwrap_or(decl))
            .collect();

        let type_parameters = type_parameters
            .iter()
            .zip(&names)
            .map(|(decl, name)| {
                let bounds = match decl.split_once(" extends ") {
                    Some((_, bounds)) => bounds
                        .split('&')
                        .filter_map(|b| parse_or_warn(fqn, b.trim(), &names))
                        .collect(),
                    None => Vec::new(),
                };
                TypeParameter::bounded(*name, bounds)
            })
            .collect();

        let supertypes = supertypes
            .iter()
            .filter_map(|s| parse_or_warn(fqn, s, &names))
            .collect();

        self.add_type(
            TypeHandle {
                fqn: fqn.to_string(),
                kind,
                type_parameters,
            },
            supertypes,
        )
    }

    /// Qualified names of the direct supertypes of `fqn`.
    fn direct_supertypes(&self, fqn: &str) -> Vec<String> {
        self.supertypes
            .get(fqn)
            .map(|sigs| {
                sigs.iter()
                    .map(|sig| self.qualify_name(&erasure_fqn(sig), fqn))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn qualify_name(&self, name: &str, scope: &str) -> String {
        if has_package_qualifier(name) {
            return name.to_string();
        }
        self.candidates(name, scope)
            .into_iter()
            .next()
            .unwrap_or_else(|| name.to_string())
    }

    fn candidates(&self, name: &str, scope: &str) -> Vec<String> {
        let mut result: Vec<String> = Vec::new();
        let mut push = |fqn: String| {
            if !result.contains(&fqn) {
                result.push(fqn);
            }
        };

        // Member types of the scope and of its enclosing types
        let mut enclosing = scope;
        while !enclosing.is_empty() && !simple_name(enclosing).starts_with(char::is_lowercase) {
            let member = format!("{}.{}", enclosing, name);
            if self.types.contains_key(&member) {
                push(member);
            }
            enclosing = enclosing.rsplit_once('.').map_or("", |(head, _)| head);
        }

        // `enclosing` is now the package of the scope
        let same_package = if enclosing.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", enclosing, name)
        };
        if self.types.contains_key(&same_package) {
            push(same_package);
        }

        let java_lang = format!("java.lang.{}", name);
        if self.types.contains_key(&java_lang) {
            push(java_lang);
        }

        let mut others: Vec<&String> = self
            .types
            .keys()
            .filter(|fqn| simple_name(fqn) == name)
            .collect();
        others.sort();
        for fqn in others {
            push(fqn.clone());
        }
        result
    }
}

fn parse_or_warn(owner: &str, text: &str, variables: &[&str]) -> Option<TypeRef> {
    parse_type_with_variables(text, variables)
        .map_err(|e| tracing::warn!("Ignoring type in declaration of {}: {}", owner, e))
        .ok()
}

impl TypeHierarchy for InMemoryTypeSystem {
    fn is_subtype_of(&self, type_fqn: &str, supertype_fqn: &str) -> LookupResult<bool> {
        if type_fqn == supertype_fqn {
            return Ok(true);
        }
        if !self.types.contains_key(type_fqn) {
            return Ok(false);
        }
        if supertype_fqn == JAVA_LANG_OBJECT {
            return Ok(true);
        }

        let mut visited = HashSet::new();
        let mut queue = VecDeque::from([type_fqn.to_string()]);
        while let Some(current) = queue.pop_front() {
            if !visited.insert(current.clone()) {
                continue;
            }
            for sup in self.direct_supertypes(&current) {
                if sup == supertype_fqn {
                    return Ok(true);
                }
                queue.push_back(sup);
            }
        }
        Ok(false)
    }

    fn find_type(&self, fqn: &str) -> LookupResult<Option<TypeHandle>> {
        Ok(self.types.get(fqn).cloned())
    }

    fn supertype_signatures_of(&self, ty: &TypeHandle) -> LookupResult<Vec<TypeRef>> {
        Ok(self.supertypes.get(&ty.fqn).cloned().unwrap_or_default())
    }

    fn direct_subtypes_of(
        &self,
        ty: &TypeHandle,
        within: &[TypeHandle],
    ) -> LookupResult<Vec<TypeHandle>> {
        Ok(within
            .iter()
            .filter(|candidate| self.direct_supertypes(&candidate.fqn).contains(&ty.fqn))
            .cloned()
            .collect())
    }
}

impl ScopeResolver for InMemoryTypeSystem {
    fn resolve_simple_name_in_scope(&self, name: &str, scope: &str) -> LookupResult<Vec<String>> {
        Ok(self.candidates(name, scope))
    }
}
