//! Pure operations over type descriptors.

use naviscope_api::models::{JAVA_LANG_OBJECT, TypeRef};
use naviscope_api::semantic::ScopeResolver;

/// Upper bound of a descriptor.
///
/// `? super T` and `?` are bounded by `Object`, `? extends T` by the upper bound of `T`.
/// Anything else is its own upper bound.
pub fn upper_bound(ty: &TypeRef) -> TypeRef {
    match ty {
        TypeRef::Wildcard {
            bound: Some(bound),
            is_upper_bound: true,
        } => upper_bound(bound),
        TypeRef::Wildcard { .. } => TypeRef::object(),
        other => other.clone(),
    }
}

/// Lower bound of a descriptor.
///
/// `? extends T` and `?` have the null type as lower bound, `? super T` the
/// lower bound of `T`. A descriptor with a null type nested anywhere in its
/// arguments collapses to the null type.
pub fn lower_bound(ty: &TypeRef) -> TypeRef {
    match ty {
        TypeRef::Wildcard {
            bound: Some(bound),
            is_upper_bound: false,
        } => lower_bound(bound),
        TypeRef::Wildcard { .. } => TypeRef::Null,
        other if contains_null(other) => TypeRef::Null,
        other => other.clone(),
    }
}

fn contains_null(ty: &TypeRef) -> bool {
    match ty {
        TypeRef::Null => true,
        TypeRef::Generic { base, args } => contains_null(base) || args.iter().any(contains_null),
        TypeRef::Array { element, .. } => contains_null(element),
        TypeRef::Wildcard {
            bound: Some(bound), ..
        } => contains_null(bound),
        _ => false,
    }
}

/// Bare name of a descriptor: no type arguments, wildcard markers or array dimensions.
pub fn erasure_fqn(ty: &TypeRef) -> String {
    match ty {
        TypeRef::Raw(name) | TypeRef::Id(name) | TypeRef::Variable(name) => name.clone(),
        TypeRef::Generic { base, .. } => erasure_fqn(base),
        TypeRef::Array { element, .. } => erasure_fqn(element),
        TypeRef::Wildcard {
            bound: Some(bound), ..
        } => erasure_fqn(bound),
        TypeRef::Wildcard { bound: None, .. } => JAVA_LANG_OBJECT.to_string(),
        TypeRef::Null | TypeRef::Unknown => String::new(),
    }
}

/// Last segment of a (possibly qualified) name.
pub fn simple_name(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

/// Render a descriptor with simple names only, e.g. `Map<String, List<Integer>>`.
pub fn simple_type_name(ty: &TypeRef) -> String {
    match ty {
        TypeRef::Id(name) => simple_name(name).to_string(),
        TypeRef::Generic { base, args } => {
            let args: Vec<String> = args.iter().map(simple_type_name).collect();
            format!("{}<{}>", simple_type_name(base), args.join(", "))
        }
        TypeRef::Array {
            element,
            dimensions,
        } => format!("{}{}", simple_type_name(element), "[]".repeat(*dimensions)),
        TypeRef::Wildcard {
            bound: Some(bound),
            is_upper_bound,
        } => {
            let keyword = if *is_upper_bound { "extends" } else { "super" };
            format!("? {} {}", keyword, simple_type_name(bound))
        }
        other => other.to_string(),
    }
}

/// Whether a dotted name starts with a package segment (`java.util.List`, not `Map.Entry`).
pub fn has_package_qualifier(name: &str) -> bool {
    match name.split_once('.') {
        Some((first, _)) => first.chars().next().is_some_and(char::is_lowercase),
        None => false,
    }
}

/// Qualify the class names of `ty` against the type `scope`.
///
/// Names that already carry a package qualifier are left alone. A name the
/// resolver cannot answer for, or answers with an error, stays unchanged.
pub fn qualify<R: ScopeResolver + ?Sized>(ty: &TypeRef, scope: Option<&str>, resolver: &R) -> TypeRef {
    let Some(scope) = scope else {
        return ty.clone();
    };

    match ty {
        TypeRef::Id(name) => TypeRef::Id(qualify_name(name, scope, resolver)),
        TypeRef::Generic { base, args } => TypeRef::Generic {
            base: Box::new(qualify(base, Some(scope), resolver)),
            args: args
                .iter()
                .map(|arg| qualify(arg, Some(scope), resolver))
                .collect(),
        },
        TypeRef::Array {
            element,
            dimensions,
        } => TypeRef::Array {
            element: Box::new(qualify(element, Some(scope), resolver)),
            dimensions: *dimensions,
        },
        TypeRef::Wildcard {
            bound,
            is_upper_bound,
        } => TypeRef::Wildcard {
            bound: bound
                .as_ref()
                .map(|b| Box::new(qualify(b, Some(scope), resolver))),
            is_upper_bound: *is_upper_bound,
        },
        other => other.clone(),
    }
}

fn qualify_name<R: ScopeResolver + ?Sized>(name: &str, scope: &str, resolver: &R) -> String {
    if has_package_qualifier(name) {
        return name.to_string();
    }

    // `Map.Entry` resolves `Map` and keeps the member path
    let (head, rest) = match name.split_once('.') {
        Some((head, rest)) => (head, Some(rest)),
        None => (name, None),
    };

    match resolver.resolve_simple_name_in_scope(head, scope) {
        Ok(candidates) => match candidates.into_iter().next() {
            Some(qualified) => match rest {
                Some(rest) => format!("{}.{}", qualified, rest),
                None => qualified,
            },
            None => name.to_string(),
        },
        Err(e) => {
            tracing::trace!("Cannot qualify {} in {}: {}", name, scope, e);
            name.to_string()
        }
    }
}

/// Element type of an array descriptor (one dimension less); `None` for non-arrays.
pub fn element_type(ty: &TypeRef) -> Option<TypeRef> {
    match ty {
        TypeRef::Array {
            element,
            dimensions,
        } => Some(TypeRef::array((**element).clone(), dimensions - 1)),
        _ => None,
    }
}

pub fn is_java_lang_object(ty: &TypeRef) -> bool {
    matches!(ty, TypeRef::Id(name) if name == JAVA_LANG_OBJECT || name == "Object")
}

pub fn is_primitive(ty: &TypeRef) -> bool {
    matches!(ty, TypeRef::Raw(_))
}
