use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fully qualified name of the root of every reference type.
pub const JAVA_LANG_OBJECT: &str = "java.lang.Object";

/// Structured type descriptor.
///
/// Equality is structural. Arrays are kept flat: the element of an
/// `Array` is never itself an `Array`, the dimension count carries the depth.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash, JsonSchema)]
#[serde(tag = "kind", content = "data")]
pub enum TypeRef {
    /// Primitive type name (e.g., "int", "boolean", "void")
    Raw(String),

    /// Class or interface reference, simple or fully qualified (e.g., "java.util.List")
    Id(String),

    /// Generic instantiation (e.g., List<String>)
    Generic {
        base: Box<TypeRef>,
        args: Vec<TypeRef>,
    },

    /// Array type (e.g., String[])
    Array {
        element: Box<TypeRef>,
        dimensions: usize,
    },

    /// Type variable (e.g., the `E` of `List<E>`)
    Variable(String),

    /// Wildcard type (e.g., ? extends Number)
    Wildcard {
        bound: Option<Box<TypeRef>>,
        is_upper_bound: bool, // true: extends, false: super
    },

    /// The null type, used as the lower bound of unbounded and upper-bounded wildcards
    Null,

    Unknown,
}

impl TypeRef {
    /// Helper to create a Raw type
    pub fn raw(s: impl Into<String>) -> Self {
        TypeRef::Raw(s.into())
    }

    /// Helper to create an Id type
    pub fn id(s: impl Into<String>) -> Self {
        TypeRef::Id(s.into())
    }

    /// Helper to create a type variable
    pub fn var(s: impl Into<String>) -> Self {
        TypeRef::Variable(s.into())
    }

    /// Helper to create a generic instantiation of `base`
    pub fn generic(base: impl Into<String>, args: Vec<TypeRef>) -> Self {
        TypeRef::Generic {
            base: Box::new(TypeRef::Id(base.into())),
            args,
        }
    }

    /// Helper to create an array of `element`, flattening nested arrays.
    pub fn array(element: TypeRef, dimensions: usize) -> Self {
        if dimensions == 0 {
            return element;
        }
        match element {
            TypeRef::Array {
                element,
                dimensions: inner,
            } => TypeRef::Array {
                element,
                dimensions: inner + dimensions,
            },
            other => TypeRef::Array {
                element: Box::new(other),
                dimensions,
            },
        }
    }

    /// `? extends bound`
    pub fn extends(bound: TypeRef) -> Self {
        TypeRef::Wildcard {
            bound: Some(Box::new(bound)),
            is_upper_bound: true,
        }
    }

    /// `? super bound`
    pub fn super_of(bound: TypeRef) -> Self {
        TypeRef::Wildcard {
            bound: Some(Box::new(bound)),
            is_upper_bound: false,
        }
    }

    /// `?`
    pub fn unbounded() -> Self {
        TypeRef::Wildcard {
            bound: None,
            is_upper_bound: true,
        }
    }

    /// `java.lang.Object`
    pub fn object() -> Self {
        TypeRef::Id(JAVA_LANG_OBJECT.to_string())
    }

    /// Number of array dimensions, 0 for non-array types.
    pub fn dimensions(&self) -> usize {
        match self {
            TypeRef::Array { dimensions, .. } => *dimensions,
            _ => 0,
        }
    }

    /// Type arguments of a generic instantiation; empty for every other variant.
    pub fn type_arguments(&self) -> &[TypeRef] {
        match self {
            TypeRef::Generic { args, .. } => args,
            _ => &[],
        }
    }
}

impl Default for TypeRef {
    fn default() -> Self {
        TypeRef::Unknown
    }
}

impl fmt::Display for TypeRef {
    /// Renders the descriptor in Java source syntax.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Raw(name) | TypeRef::Id(name) | TypeRef::Variable(name) => f.write_str(name),
            TypeRef::Generic { base, args } => {
                write!(f, "{}<", base)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                f.write_str(">")
            }
            TypeRef::Array {
                element,
                dimensions,
            } => {
                write!(f, "{}", element)?;
                for _ in 0..*dimensions {
                    f.write_str("[]")?;
                }
                Ok(())
            }
            TypeRef::Wildcard {
                bound: None, ..
            } => f.write_str("?"),
            TypeRef::Wildcard {
                bound: Some(bound),
                is_upper_bound,
            } => {
                let keyword = if *is_upper_bound { "extends" } else { "super" };
                write!(f, "? {} {}", keyword, bound)
            }
            TypeRef::Null => f.write_str("null"),
            TypeRef::Unknown => f.write_str("?unknown"),
        }
    }
}

/// Kind of type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, JsonSchema)]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
    Annotation,
}

/// A generic type parameter declaration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash, JsonSchema)]
pub struct TypeParameter {
    /// Parameter name, e.g., "T"
    pub name: String,
    /// Declared bounds, e.g., [Comparable<T>, Serializable] for `T extends Comparable<T> & Serializable`
    pub bounds: Vec<TypeRef>,
}

impl TypeParameter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bounds: Vec::new(),
        }
    }

    pub fn bounded(name: impl Into<String>, bounds: Vec<TypeRef>) -> Self {
        Self {
            name: name.into(),
            bounds,
        }
    }
}

/// Handle to a type known to the hosting project model.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash, JsonSchema)]
pub struct TypeHandle {
    /// Fully qualified name, e.g., "java.util.List"
    pub fqn: String,
    /// Kind of type
    pub kind: TypeKind,
    /// Generic type parameters, e.g., `<K, V>`
    pub type_parameters: Vec<TypeParameter>,
}

impl TypeHandle {
    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    /// Simple name of the type, e.g. "List" for "java.util.List".
    pub fn simple_name(&self) -> &str {
        self.fqn.rsplit('.').next().unwrap_or(&self.fqn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_generic_wildcard() {
        let ty = TypeRef::generic(
            "java.util.Map",
            vec![TypeRef::id("String"), TypeRef::extends(TypeRef::id("Number"))],
        );
        assert_eq!(ty.to_string(), "java.util.Map<String, ? extends Number>");
    }

    #[test]
    fn test_array_flattens_nested_dimensions() {
        let ty = TypeRef::array(TypeRef::array(TypeRef::raw("int"), 1), 2);
        assert_eq!(ty.dimensions(), 3);
        assert_eq!(ty.to_string(), "int[][][]");
    }

    #[test]
    fn test_serde_shape_is_tagged() {
        let json = serde_json::to_value(TypeRef::id("java.lang.String")).unwrap();
        assert_eq!(json["kind"], "Id");
        assert_eq!(json["data"], "java.lang.String");
    }
}
