mod common;

use common::{FailingCompletions, FixedCompletions, catalog, jdk, position};
use naviscope_api::models::{CompletionItem, CompletionKind, TypeRef};
use naviscope_java::TemplateConfig;
use naviscope_java::catalog::{ContainerKind, SymbolCatalog, SymbolOrigin, arrange};
use std::collections::HashSet;
use std::sync::Arc;

fn names<'a>(symbols: impl IntoIterator<Item = &'a naviscope_java::catalog::Symbol>) -> Vec<&'a str> {
    symbols.into_iter().map(|s| s.name()).collect()
}

#[test]
fn test_most_recent_locals_first() {
    let catalog = catalog(
        FixedCompletions::new()
            .local("first", "java.lang.String")
            .field("total", "java.lang.Integer")
            .local("second", "java.lang.String")
            .field("owner", "com.shop.User"),
    );

    assert_eq!(names(catalog.all()), vec!["second", "first", "owner", "total"]);
    assert_eq!(catalog.local_names(), vec!["second", "first"]);
    assert_eq!(catalog.field_names(), vec!["owner", "total"]);
    assert_eq!(catalog.find_by_name("owner").unwrap().origin(), SymbolOrigin::Field);
}

#[test]
fn test_other_completion_kinds_are_skipped() {
    let mut method = CompletionItem::local("size", "int");
    method.kind = CompletionKind::Other;
    let catalog = catalog(FixedCompletions::new().item(method).local("count", "int"));

    assert_eq!(names(catalog.all()), vec!["count"]);
    assert!(!catalog.has_errors());
}

#[test]
fn test_simple_names_are_qualified_against_the_enclosing_type() {
    let catalog = catalog(
        FixedCompletions::new()
            .local("orders", "List<Order>")
            .local("line", "Line"),
    );

    let orders = catalog.find_by_name("orders").unwrap();
    assert_eq!(
        orders.declared_type(),
        &TypeRef::generic("java.util.List", vec![TypeRef::id("com.shop.Order")])
    );
    let line = catalog.find_by_name("line").unwrap();
    assert_eq!(line.declared_type(), &TypeRef::id("com.shop.Shop.Line"));
}

#[test]
fn test_container_kinds() {
    let catalog = catalog(
        FixedCompletions::new()
            .local("counts", "int[]")
            .local("tags", "java.util.HashSet<String>")
            .local("bag", "NumberBag<Integer>")
            .local("order", "Order"),
    );
    let cx = catalog.context();

    let kind = |name: &str| catalog.find_by_name(name).unwrap().container_kind(&cx);
    assert_eq!(kind("counts"), ContainerKind::Array);
    assert_eq!(kind("tags"), ContainerKind::Collection);
    assert_eq!(kind("bag"), ContainerKind::Iterable);
    assert_eq!(kind("order"), ContainerKind::Plain);

    assert_eq!(names(catalog.find_arrays()), vec!["counts"]);
    assert_eq!(names(catalog.find_iterables()), vec!["bag", "tags", "counts"]);
    assert_eq!(names(catalog.find_collections()), vec!["tags"]);
}

#[test]
fn test_element_types() {
    let catalog = catalog(
        FixedCompletions::new()
            .local("counts", "int[]")
            .local("grid", "String[][]")
            .local("orders", "OrderList")
            .local("bag", "NumberBag")
            .field("lines", "java.util.List<Line>"),
    );
    let cx = catalog.context();
    let element = |name: &str| catalog.find_by_name(name).unwrap().member_type_names(&cx);

    assert_eq!(element("counts"), vec!["int"]);
    assert_eq!(element("grid"), vec!["String[]"]);
    assert_eq!(element("orders"), vec!["Order"]);
    assert_eq!(element("bag"), vec!["Number"]);
    // Types declared in the unit keep their enclosing type
    assert_eq!(element("lines"), vec!["Shop.Line"]);
}

#[test]
fn test_plain_symbol_iterates_object() {
    let catalog = catalog(FixedCompletions::new().local("order", "Order"));
    let cx = catalog.context();
    let order = catalog.find_by_name("order").unwrap();
    assert_eq!(order.element_type(&cx), &TypeRef::object());
}

#[test]
fn test_assignability_queries() {
    let catalog = catalog(
        FixedCompletions::new()
            .local("names", "String[]")
            .local("counts", "int[]")
            .local("orders", "java.util.ArrayList<Order>")
            .local("count", "java.lang.Integer")
            .field("label", "String"),
    );

    assert_eq!(names(catalog.find_locals("java.lang.Number")), vec!["count"]);
    assert_eq!(names(catalog.find_locals("Collection")), vec!["orders"]);
    assert_eq!(names(catalog.find_locals("java.lang.Object[]")), vec!["names"]);
    assert_eq!(names(catalog.find_locals("int[]")), vec!["counts"]);
    assert_eq!(names(catalog.find_fields("CharSequence")), vec!["label"]);

    // Every reference type, arrays included, is an Object
    let objects = catalog.find_locals("java.lang.Object");
    assert_eq!(names(objects), vec!["count", "orders", "counts", "names"]);
}

#[test]
fn test_type_argument_bounds_by_simple_name() {
    let catalog = catalog(FixedCompletions::new().field("registry", "Registry<String, Order>"));
    let cx = catalog.context();
    let registry = catalog.find_by_name("registry").unwrap();

    assert_eq!(
        registry.type_argument_bound_names(&cx, "Map", 0),
        vec!["String"]
    );
    assert_eq!(
        registry.type_argument_bound_names(&cx, "com.shop.Registry", 1),
        vec!["Order"]
    );
    // Not a supertype
    assert_eq!(
        registry.type_argument_bounds(&cx, "java.util.Set", 0),
        vec![TypeRef::object()]
    );
}

#[test]
fn test_arrange_moves_used_symbols_last() {
    let catalog = catalog(
        FixedCompletions::new()
            .local("a", "int[]")
            .local("b", "int[]")
            .local("c", "int[]"),
    );
    let mut symbols = catalog.find_arrays();
    let used: HashSet<String> = ["c".to_string()].into_iter().collect();
    arrange(&mut symbols, &used);
    assert_eq!(names(symbols), vec!["b", "a", "c"]);
}

#[test]
fn test_failing_completion_yields_empty_catalog() {
    common::init_tracing();
    let catalog = SymbolCatalog::collect(
        &FailingCompletions,
        Arc::new(jdk()),
        Arc::new(TemplateConfig::default()),
        &position(),
    );
    assert!(catalog.has_errors());
    assert!(catalog.is_empty());
    assert!(catalog.find_iterables().is_empty());
}
