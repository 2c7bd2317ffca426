use crate::types::{JavaTypeSystem, erasure_fqn, qualify, simple_name};
use naviscope_api::models::{TypeHandle, TypeRef};
use naviscope_api::semantic::LookupResult;
use std::collections::{HashMap, HashSet, VecDeque};

/// A type together with all of its (transitive) supertypes.
///
/// Types are stored in BFS order starting from the root. Supertype
/// signatures are qualified against the type declaring them.
#[derive(Debug, Clone)]
pub struct SupertypeHierarchy {
    types: Vec<TypeHandle>,
    signatures: HashMap<String, Vec<TypeRef>>,
}

impl SupertypeHierarchy {
    /// Walk the supertypes of `root_fqn`.
    ///
    /// Fails only when the root itself cannot be found; unreachable
    /// supertypes are left out of the hierarchy.
    pub fn build(ts: &dyn JavaTypeSystem, root_fqn: &str, max_depth: usize) -> LookupResult<Self> {
        let root = ts.require_type(root_fqn)?;

        let mut types = Vec::new();
        let mut signatures = HashMap::new();
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        visited.insert(root.fqn.clone());
        queue.push_back((root, 0usize));

        while let Some((ty, depth)) = queue.pop_front() {
            let declared = ts.supertype_signatures_of(&ty).unwrap_or_else(|e| {
                tracing::debug!("Cannot read supertypes of {}: {}", ty.fqn, e);
                Vec::new()
            });
            let qualified: Vec<TypeRef> = declared
                .iter()
                .map(|sig| qualify(sig, Some(ty.fqn.as_str()), ts))
                .collect();

            if depth < max_depth {
                for sig in &qualified {
                    let fqn = erasure_fqn(sig);
                    if !visited.insert(fqn.clone()) {
                        continue;
                    }
                    match ts.find_type(&fqn) {
                        Ok(Some(sup)) => queue.push_back((sup, depth + 1)),
                        Ok(None) => tracing::trace!("Supertype {} of {} not found", fqn, ty.fqn),
                        Err(e) => tracing::debug!("Lookup of {} failed: {}", fqn, e),
                    }
                }
            } else {
                tracing::warn!(
                    "Supertype walk from {} stopped at depth {}",
                    root_fqn,
                    max_depth
                );
            }

            signatures.insert(ty.fqn.clone(), qualified);
            types.push(ty);
        }

        Ok(Self { types, signatures })
    }

    /// The type the hierarchy was built for.
    pub fn root(&self) -> &TypeHandle {
        &self.types[0]
    }

    pub fn types(&self) -> &[TypeHandle] {
        &self.types
    }

    pub fn contains(&self, fqn: &str) -> bool {
        self.types.iter().any(|t| t.fqn == fqn)
    }

    pub fn get(&self, fqn: &str) -> Option<&TypeHandle> {
        self.types.iter().find(|t| t.fqn == fqn)
    }

    /// Qualified direct supertype signatures of a member of the hierarchy.
    pub fn signatures_of(&self, fqn: &str) -> &[TypeRef] {
        self.signatures.get(fqn).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Members whose simple name is `name`, e.g. every `List` in the hierarchy.
    pub fn find_by_simple_name(&self, name: &str) -> Vec<&TypeHandle> {
        self.types
            .iter()
            .filter(|t| simple_name(&t.fqn) == name)
            .collect()
    }
}
