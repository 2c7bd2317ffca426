//! Parsing of Java source-syntax type descriptors into [`TypeRef`].

use naviscope_api::models::TypeRef;
use once_cell::sync::Lazy;
use thiserror::Error;
use tree_sitter::{Language, Node, Parser};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Malformed type descriptor `{text}` at offset {offset}: {message}")]
pub struct TypeParseError {
    pub text: String,
    pub offset: usize,
    pub message: String,
}

/// Parse a type descriptor such as `java.util.Map<String, ? extends Number>[]`.
///
/// Every name is parsed as `TypeRef::Id`; use [`parse_type_with_variables`]
/// when the type parameters in scope are known. Annotations are accepted
/// anywhere Java allows them and dropped.
pub fn parse_type(text: &str) -> Result<TypeRef, TypeParseError> {
    let text = text.trim_end();
    match text.strip_suffix("...") {
        Some(element) => parse_wrapped(element).map(|ty| TypeRef::array(ty, 1)),
        None => parse_wrapped(text),
    }
}

/// Parse a descriptor, turning names listed in `variables` into `TypeRef::Variable`.
pub fn parse_type_with_variables(
    text: &str,
    variables: &[&str],
) -> Result<TypeRef, TypeParseError> {
    parse_type(text).map(|ty| mark_variables(ty, variables))
}

/// Parse a descriptor, degrading malformed text to `java.lang.Object`.
pub fn parse_type_or_object(text: &str) -> TypeRef {
    match parse_type(text) {
        Ok(ty) => ty,
        Err(e) => {
            tracing::debug!("{}; treating as java.lang.Object", e);
            TypeRef::object()
        }
    }
}

/// Replace `Id(name)` by `Variable(name)` for every name in `variables`.
pub fn mark_variables(ty: TypeRef, variables: &[&str]) -> TypeRef {
    match ty {
        TypeRef::Id(name) if variables.contains(&name.as_str()) => TypeRef::Variable(name),
        TypeRef::Generic { base, args } => TypeRef::Generic {
            base,
            args: args
                .into_iter()
                .map(|arg| mark_variables(arg, variables))
                .collect(),
        },
        TypeRef::Array {
            element,
            dimensions,
        } => TypeRef::array(mark_variables(*element, variables), dimensions),
        TypeRef::Wildcard {
            bound,
            is_upper_bound,
        } => TypeRef::Wildcard {
            bound: bound.map(|b| Box::new(mark_variables(*b, variables))),
            is_upper_bound,
        },
        other => other,
    }
}

// The descriptor becomes the single type argument of a field type, the one
// position where primitives, wildcards and annotations are all legal.
const PREFIX: &str = "class __Descriptor { __Holder<";
const SUFFIX: &str = "> __value; }";

static JAVA: Lazy<Language> = Lazy::new(|| tree_sitter_java::LANGUAGE.into());

fn parse_wrapped(text: &str) -> Result<TypeRef, TypeParseError> {
    let source = format!("{}{}{}", PREFIX, text, SUFFIX);
    let error = |offset: usize, message: &str| TypeParseError {
        text: text.to_string(),
        offset: offset.min(text.len()),
        message: message.to_string(),
    };

    let mut parser = Parser::new();
    parser
        .set_language(&JAVA)
        .map_err(|e| error(0, &e.to_string()))?;
    let tree = parser
        .parse(&source, None)
        .ok_or_else(|| error(0, "parser produced no tree"))?;

    let root = tree.root_node();
    if let Some(node) = first_error(root) {
        let offset = node.start_byte().saturating_sub(PREFIX.len());
        return Err(if node.is_missing() {
            error(offset, &format!("missing `{}`", node.kind()))
        } else {
            error(offset, "unexpected input")
        });
    }

    let argument = holder_argument(root).ok_or_else(|| error(0, "expected a single type"))?;
    Ok(type_node(argument, &source))
}

fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find_map(first_error);
    found
}

fn is_comment(node: &Node) -> bool {
    matches!(node.kind(), "line_comment" | "block_comment")
}

fn is_annotation(node: &Node) -> bool {
    matches!(node.kind(), "annotation" | "marker_annotation")
}

fn single_named_child<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    let mut children = node.named_children(&mut cursor).filter(|c| !is_comment(c));
    let child = children.next()?;
    if children.next().is_some() || (!kind.is_empty() && child.kind() != kind) {
        return None;
    }
    Some(child)
}

/// The argument of `__Holder<...>`, provided the text closed nothing it didn't open.
fn holder_argument(root: Node) -> Option<Node> {
    let class = single_named_child(root, "class_declaration")?;
    let body = class.child_by_field_name("body")?;
    let field = single_named_child(body, "field_declaration")?;
    let holder = field.child_by_field_name("type")?;
    if holder.kind() != "generic_type" {
        return None;
    }
    let mut cursor = holder.walk();
    let arguments = holder
        .named_children(&mut cursor)
        .find(|c| c.kind() == "type_arguments")?;
    single_named_child(arguments, "")
}

fn text_of<'s>(node: Node, source: &'s str) -> &'s str {
    node.utf8_text(source.as_bytes()).unwrap_or_default()
}

/// Dotted name of a (possibly scoped, possibly parameterized) class type.
/// `Outer<A>.Inner` names `Outer.Inner`.
fn type_name(node: Node, source: &str) -> String {
    match node.kind() {
        "scoped_type_identifier" => {
            let mut cursor = node.walk();
            node.named_children(&mut cursor)
                .filter(|c| !is_annotation(c) && !is_comment(c))
                .map(|c| type_name(c, source))
                .collect::<Vec<_>>()
                .join(".")
        }
        "generic_type" => {
            let mut cursor = node.walk();
            let base = node
                .named_children(&mut cursor)
                .find(|c| c.kind() != "type_arguments");
            base.map(|b| type_name(b, source)).unwrap_or_default()
        }
        _ => text_of(node, source).to_string(),
    }
}

fn type_node(node: Node, source: &str) -> TypeRef {
    match node.kind() {
        "generic_type" => {
            let name = type_name(node, source);
            let mut args = Vec::new();
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                if child.kind() == "type_arguments" {
                    let mut args_cursor = child.walk();
                    for arg in child.named_children(&mut args_cursor) {
                        if !is_comment(&arg) {
                            args.push(type_node(arg, source));
                        }
                    }
                }
            }
            // `List<>`
            if args.is_empty() {
                TypeRef::Id(name)
            } else {
                TypeRef::generic(name, args)
            }
        }
        "array_type" => {
            let element = node
                .child_by_field_name("element")
                .map(|e| type_node(e, source))
                .unwrap_or(TypeRef::Unknown);
            // Dimensions may carry annotations: `String @NonNull []`
            let count = node
                .child_by_field_name("dimensions")
                .map(|d| {
                    let mut cursor = d.walk();
                    let count = d.children(&mut cursor).filter(|c| c.kind() == "[").count();
                    count
                })
                .unwrap_or(1);
            TypeRef::array(element, count)
        }
        "wildcard" => {
            let mut bound = None;
            let mut is_upper = true;
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                match child.kind() {
                    "super" => is_upper = false,
                    _ if is_annotation(&child) || is_comment(&child) => {}
                    _ => bound = Some(type_node(child, source)),
                }
            }
            match bound {
                Some(b) if is_upper => TypeRef::extends(b),
                Some(b) => TypeRef::super_of(b),
                None => TypeRef::unbounded(),
            }
        }
        "annotated_type" => {
            let mut cursor = node.walk();
            let inner = node
                .named_children(&mut cursor)
                .filter(|c| !is_annotation(c) && !is_comment(c))
                .last();
            inner
                .map(|t| type_node(t, source))
                .unwrap_or(TypeRef::Unknown)
        }
        "integral_type" | "floating_point_type" | "boolean_type" | "void_type" => {
            TypeRef::Raw(text_of(node, source).to_string())
        }
        "type_identifier" | "scoped_type_identifier" => TypeRef::Id(type_name(node, source)),
        _ => {
            let text = text_of(node, source);
            if text.is_empty() {
                TypeRef::Unknown
            } else {
                TypeRef::Id(text.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_generics() {
        let ty = parse_type("java.util.Map<java.lang.String, java.util.List<Integer>>").unwrap();
        assert_eq!(
            ty,
            TypeRef::generic(
                "java.util.Map",
                vec![
                    TypeRef::id("java.lang.String"),
                    TypeRef::generic("java.util.List", vec![TypeRef::id("Integer")]),
                ]
            )
        );
    }

    #[test]
    fn test_parse_arrays_and_varargs() {
        assert_eq!(
            parse_type("int[][]").unwrap(),
            TypeRef::array(TypeRef::raw("int"), 2)
        );
        assert_eq!(
            parse_type("String...").unwrap(),
            TypeRef::array(TypeRef::id("String"), 1)
        );
    }

    #[test]
    fn test_parse_wildcards() {
        assert_eq!(
            parse_type("List<? super Number>").unwrap(),
            TypeRef::generic("List", vec![TypeRef::super_of(TypeRef::id("Number"))])
        );
        assert_eq!(
            parse_type("Class<?>").unwrap(),
            TypeRef::generic("Class", vec![TypeRef::unbounded()])
        );
    }

    #[test]
    fn test_parse_marks_variables() {
        let ty = parse_type_with_variables("Map<K, List<V>>", &["K", "V"]).unwrap();
        assert_eq!(
            ty,
            TypeRef::generic(
                "Map",
                vec![
                    TypeRef::var("K"),
                    TypeRef::generic("List", vec![TypeRef::var("V")]),
                ]
            )
        );
    }

    #[test]
    fn test_parse_inner_type_of_generic_outer() {
        let ty = parse_type("Outer<String>.Inner<Integer>").unwrap();
        assert_eq!(
            ty,
            TypeRef::generic("Outer.Inner", vec![TypeRef::id("Integer")])
        );
    }

    #[test]
    fn test_parse_skips_annotations() {
        assert_eq!(
            parse_type("@NonNull java.lang.String").unwrap(),
            TypeRef::id("java.lang.String")
        );
        let list = TypeRef::generic("java.util.List", vec![TypeRef::id("String")]);
        assert_eq!(
            parse_type("@Size(max = 3) java.util.List<String>").unwrap(),
            list
        );
        assert_eq!(
            parse_type("java.util.List<@Size(max = 3) String>").unwrap(),
            list
        );
        assert_eq!(parse_type("java.util.@NonNull List<String>").unwrap(), list);
    }

    #[test]
    fn test_parse_annotated_dimensions() {
        assert_eq!(
            parse_type("String @NonNull []").unwrap(),
            TypeRef::array(TypeRef::id("String"), 1)
        );
        assert_eq!(
            parse_type("int @A [] @B(1) []").unwrap(),
            TypeRef::array(TypeRef::raw("int"), 2)
        );
    }

    #[test]
    fn test_parse_diamond_is_raw() {
        assert_eq!(parse_type("java.util.List<>").unwrap(), TypeRef::id("java.util.List"));
    }

    #[test]
    fn test_malformed_is_rejected() {
        let err = parse_type("List<String").unwrap_err();
        assert!(err.offset <= "List<String".len());
        assert_eq!(err.text, "List<String");
        for text in ["", "  ", "Map<,>", "String, Integer", "A> __x; int y; __Holder<B"] {
            assert!(parse_type(text).is_err(), "accepted {:?}", text);
        }
        assert_eq!(parse_type_or_object("List<<"), TypeRef::object());
    }
}
