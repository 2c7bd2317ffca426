use crate::types::is_java_lang_object;
use naviscope_api::models::TypeRef;

/// Best-known upper bounds of one type parameter.
///
/// Starts as `{Object}`. Invariant: no member is a supertype of another
/// member, and `Object` is never kept next to another bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundSet {
    bounds: Vec<TypeRef>,
}

impl Default for BoundSet {
    fn default() -> Self {
        Self::new()
    }
}

impl BoundSet {
    pub fn new() -> Self {
        Self {
            bounds: vec![TypeRef::object()],
        }
    }

    /// Add `bound`, keeping the finer of any two related bounds.
    ///
    /// `is_subtype(a, b)` answers whether `a` equals or is a subtype of `b`.
    pub fn add<F>(&mut self, bound: TypeRef, is_subtype: F)
    where
        F: Fn(&TypeRef, &TypeRef) -> bool,
    {
        if is_java_lang_object(&bound) {
            return;
        }

        // A finer bound is already known
        if self
            .bounds
            .iter()
            .any(|old| !is_java_lang_object(old) && *old != bound && is_subtype(old, &bound))
        {
            return;
        }

        let mut found = false;
        let mut i = 0;
        while i < self.bounds.len() {
            if is_subtype(&bound, &self.bounds[i]) {
                if found {
                    self.bounds.remove(i);
                    continue;
                }
                self.bounds[i] = bound.clone();
                found = true;
            }
            i += 1;
        }
        if !found {
            self.bounds.push(bound);
        }

        if self.bounds.len() > 1 {
            self.bounds.retain(|b| !is_java_lang_object(b));
        }
    }

    pub fn as_slice(&self) -> &[TypeRef] {
        &self.bounds
    }

    pub fn into_vec(self) -> Vec<TypeRef> {
        self.bounds
    }
}
