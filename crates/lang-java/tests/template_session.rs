mod common;

use common::{FixedCompletions, jdk, position};
use naviscope_api::models::PlaceholderId;
use naviscope_java::template::{PlaceholderValue, SessionState};
use naviscope_java::{TemplateConfig, TemplateError, TemplateSession};
use std::sync::Arc;

const FOREACH: &str = "for (${t:elemType(list)} ${e:newName(list)} : ${list:iterableVar}) {\n\t${cursor}\n}";

fn session(template: &str, completions: FixedCompletions) -> TemplateSession {
    session_with(template, completions, TemplateConfig::default())
}

fn session_with(
    template: &str,
    completions: FixedCompletions,
    config: TemplateConfig,
) -> TemplateSession {
    common::init_tracing();
    TemplateSession::new(
        template,
        position(),
        Arc::new(jdk()),
        Arc::new(completions),
        Arc::new(config),
    )
    .unwrap()
}

fn id(session: &TemplateSession, name: &str) -> PlaceholderId {
    session.placeholder_by_name(name).unwrap().id()
}

fn orders_and_users() -> FixedCompletions {
    FixedCompletions::new()
        .local("orders", "java.util.List<Order>")
        .local("users", "java.util.ArrayList<User>")
}

#[test]
fn test_foreach_over_the_latest_iterable() {
    let mut session = session(FOREACH, orders_and_users());
    assert_eq!(session.state(), SessionState::Start);

    let buffer = session.resolve().unwrap();
    assert_eq!(session.state(), SessionState::Interactive);
    assert_eq!(buffer.text, "for (User user : users) {\n\t\n}");

    let list = buffer.placeholder("list").unwrap();
    assert_eq!(list.choices, vec!["users", "orders"]);
    assert_eq!(list.current, 0);
    assert_eq!(list.offsets, vec![17]);
    assert_eq!(buffer.placeholder("t").unwrap().offsets, vec![5]);
    assert_eq!(buffer.cursor, Some(buffer.text.find("\n}").unwrap()));
}

#[test]
fn test_annotated_declarations_stay_iterable() {
    let completions = FixedCompletions::new()
        .local("orders", "@Size(max = 3) java.util.List<Order>")
        .local("lines", "com.shop.Shop.Line @NonNull []");
    let mut session = session(FOREACH, completions);
    let buffer = session.resolve().unwrap();
    assert_eq!(buffer.text, "for (Shop.Line line : lines) {\n\t\n}");
    assert_eq!(buffer.placeholder("list").unwrap().choices, vec!["lines", "orders"]);

    let buffer = session.select_choice(id(&session, "list"), 1).unwrap();
    assert_eq!(buffer.text, "for (Order order : orders) {\n\t\n}");
}

#[test]
fn test_selecting_the_master_updates_its_slaves() {
    let mut session = session(FOREACH, orders_and_users());
    session.resolve().unwrap();
    let list = id(&session, "list");

    let buffer = session.select_choice(list, 1).unwrap();
    assert_eq!(buffer.text, "for (Order order : orders) {\n\t\n}");

    // Back again: the old name is not kept as used
    let buffer = session.select_choice(list, 0).unwrap();
    assert_eq!(buffer.text, "for (User user : users) {\n\t\n}");
    assert!(!session.used_names().contains("order"));
}

#[test]
fn test_element_type_follows_master_without_recomputing() {
    let mut session = session(FOREACH, orders_and_users());
    session.resolve().unwrap();
    let list = id(&session, "list");

    let t = session.placeholder_by_name("t").unwrap();
    let PlaceholderValue::MultiChoice(mc) = t.value() else {
        panic!("element type should offer choices: {:?}", t.value());
    };
    assert_eq!(mc.choices().len(), 1);

    session.select_choice(list, 1).unwrap();
    assert_eq!(session.current_value("t"), Some("Order"));
}

#[test]
fn test_edit_survives_until_the_master_changes_symbol() {
    let mut session = session(FOREACH, orders_and_users());
    session.resolve().unwrap();
    let list = id(&session, "list");
    let e = id(&session, "e");

    let buffer = session.edit(e, "customer").unwrap();
    assert_eq!(buffer.text, "for (User customer : users) {\n\t\n}");

    // Same symbol again
    session.select_choice(list, 0).unwrap();
    assert_eq!(session.current_value("e"), Some("customer"));

    session.select_choice(list, 1).unwrap();
    assert_eq!(session.current_value("e"), Some("order"));
}

#[test]
fn test_two_iterables_prefer_distinct_symbols() {
    let mut session = session(
        "${a:iterableVar} ${b:iterableVar}",
        orders_and_users(),
    );
    let buffer = session.resolve().unwrap();
    assert_eq!(buffer.text, "users orders");
    assert_eq!(buffer.placeholder("b").unwrap().choices, vec!["orders", "users"]);
}

#[test]
fn test_new_name_avoids_visible_locals() {
    let completions = FixedCompletions::new()
        .local("user", "User")
        .local("users", "java.util.List<User>");
    let mut session = session(FOREACH, completions);
    let buffer = session.resolve().unwrap();
    assert_eq!(buffer.text, "for (User user2 : users) {\n\t\n}");
}

#[test]
fn test_array_loop_with_index() {
    let template = "for (int ${index} = 0; ${index} < ${array}.length; ${index}++) {\n\t${array_type} ${array_element} = ${array}[${index}];\n}";
    let completions = FixedCompletions::new()
        .local("i", "int")
        .local("items", "OrderItem[]");
    let mut session = session(template, completions);
    let buffer = session.resolve().unwrap();
    assert_eq!(
        buffer.text,
        "for (int j = 0; j < items.length; j++) {\n\tOrderItem orderItem = items[j];\n}"
    );
    assert_eq!(buffer.placeholder("index").unwrap().offsets.len(), 4);
}

#[test]
fn test_consecutive_indices() {
    let mut session = session("${outer:index} ${inner:index}", FixedCompletions::new());
    assert_eq!(session.resolve().unwrap().text, "i j");
}

#[test]
fn test_variables_by_type() {
    let completions = FixedCompletions::new()
        .field("total", "java.lang.Number")
        .local("label", "String")
        .local("count", "java.lang.Integer");

    let mut any = session("${n:var(java.lang.Number)}", completions.clone());
    assert_eq!(any.resolve().unwrap().placeholder("n").unwrap().choices, vec!["count", "total"]);

    let mut local = session("${n:localVar(java.lang.Number)}", completions.clone());
    assert_eq!(local.resolve().unwrap().text, "count");

    let mut field = session("${n:field(java.lang.Number)}", completions.clone());
    assert_eq!(field.resolve().unwrap().text, "total");

    let mut several = session("${x:var(Integer, String)}", completions);
    assert_eq!(
        several.resolve().unwrap().placeholder("x").unwrap().choices,
        vec!["count", "label"]
    );
}

#[test]
fn test_type_arguments_follow_the_map() {
    let completions = FixedCompletions::new()
        .field("registry", "Registry<String, Order>")
        .local("prices", "java.util.HashMap<String, Integer>");
    let mut session = session(
        "${k:argType(m, 0)} -> ${v:argType(m, 1)} in ${m:var(java.util.Map)}",
        completions,
    );
    let buffer = session.resolve().unwrap();
    assert_eq!(buffer.text, "String -> Integer in prices");

    let m = id(&session, "m");
    let buffer = session.select_choice(m, 1).unwrap();
    assert_eq!(buffer.text, "String -> Order in registry");
}

#[test]
fn test_collection_and_link() {
    let completions = FixedCompletions::new()
        .local("bag", "NumberBag<Integer>")
        .local("tags", "java.util.HashSet<String>");
    let mut session = session("${c:collection}.${op:link(clear, 'size'', x')}()", completions);
    let buffer = session.resolve().unwrap();
    assert_eq!(buffer.text, "tags.clear()");
    assert_eq!(buffer.placeholder("op").unwrap().choices, vec!["clear", "size', x"]);
}

#[test]
fn test_untyped_variable_renders_its_name() {
    let mut session = session("${name} = ${value:mystery};", FixedCompletions::new());
    assert_eq!(session.resolve().unwrap().text, "name = value;");
    // No resolver needed the symbols
    assert!(session.catalog().is_none());
}

#[test]
fn test_no_candidates() {
    let mut session = session(FOREACH, FixedCompletions::new());
    let buffer = session.resolve().unwrap();
    assert_eq!(buffer.text, "for (Object object : list) {\n\t\n}");
    assert!(buffer.placeholder("list").unwrap().choices.is_empty());
}

#[test]
fn test_new_name_from_a_type_name() {
    let mut session = session("${e:newName(java.util.Map.Entry)}", FixedCompletions::new());
    assert_eq!(session.resolve().unwrap().text, "entry");
}

#[test]
fn test_naming_style_applies_to_suggestions() {
    let mut config = TemplateConfig::default();
    config.naming.local_prefixes = vec!["l".to_string()];
    let mut session = session_with(
        FOREACH,
        FixedCompletions::new().local("orders", "OrderList"),
        config,
    );
    assert_eq!(session.resolve().unwrap().text, "for (Order lOrder : orders) {\n\t\n}");
}

#[test]
fn test_invalid_choice() {
    let mut session = session(FOREACH, orders_and_users());
    session.resolve().unwrap();
    let list = id(&session, "list");

    let err = session.select_choice(list, 5).unwrap_err();
    assert!(
        matches!(err, TemplateError::InvalidChoice { index: 5, len: 2, .. }),
        "{:?}",
        err
    );
    let err = session.select_choice(PlaceholderId(42), 0).unwrap_err();
    assert!(matches!(err, TemplateError::UnknownPlaceholder(PlaceholderId(42))));
    // Still usable
    assert_eq!(session.state(), SessionState::Interactive);
}

#[test]
fn test_accept_and_cancel_end_the_session() {
    let mut session = session(FOREACH, orders_and_users());
    let list = id(&session, "list");

    // Selecting before resolving resolves first
    session.select_choice(list, 1).unwrap();
    assert_eq!(session.accept().unwrap(), "for (Order order : orders) {\n\t\n}");
    assert_eq!(session.state(), SessionState::Terminal);
    assert!(matches!(
        session.select_choice(list, 0),
        Err(TemplateError::SessionTerminated)
    ));

    let mut cancelled = self::session(FOREACH, orders_and_users());
    cancelled.resolve().unwrap();
    cancelled.cancel();
    assert!(matches!(cancelled.accept(), Err(TemplateError::SessionTerminated)));
    assert!(matches!(cancelled.resolve(), Err(TemplateError::SessionTerminated)));
}

#[test]
fn test_syntax_errors() {
    for template in ["for (${e:newName(list) : x)", "a $ b", "${:array}", "${x:array} ${x:index}"] {
        let err = TemplateSession::new(
            template,
            position(),
            Arc::new(jdk()),
            Arc::new(FixedCompletions::new()),
            Arc::new(TemplateConfig::default()),
        )
        .err()
        .unwrap_or_else(|| panic!("{} should not parse", template));
        assert!(matches!(err, TemplateError::Syntax { .. }), "{}: {:?}", template, err);
    }
}
