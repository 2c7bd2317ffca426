use naviscope_api::models::{
    CompletionItem, CompletionResult, PositionContext, TypeHandle, TypeRef,
};
use naviscope_api::semantic::{
    CompletionProvider, LookupError, LookupResult, ScopeResolver, TypeHierarchy,
};
use naviscope_java::JavaTypeSystem;
use naviscope_java::adapters::InMemoryTypeSystem;
use naviscope_java::catalog::SymbolCatalog;
use naviscope_java::config::TemplateConfig;
use std::sync::{Arc, Once};

static TRACING: Once = Once::new();

/// Route engine logs to the test output. Filter with `RUST_LOG`.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING.call_once(|| {
        use tracing_subscriber::{EnvFilter, fmt, prelude::*};
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_test_writer())
            .try_init();
    });
}

/// Enclosing type of every test position.
#[allow(dead_code)]
pub const SHOP: &str = "com.shop.Shop";

/// A JDK subset plus a small shop domain.
#[allow(dead_code)]
pub fn jdk() -> InMemoryTypeSystem {
    InMemoryTypeSystem::new()
        .add_class("java.lang.Object", &[], &[])
        .add_interface("java.lang.CharSequence", &[], &[])
        .add_interface("java.lang.Comparable", &["T"], &[])
        .add_interface("java.io.Serializable", &[], &[])
        .add_class(
            "java.lang.String",
            &[],
            &["Object", "CharSequence", "Comparable<String>", "java.io.Serializable"],
        )
        .add_class("java.lang.Number", &[], &["Object", "java.io.Serializable"])
        .add_class("java.lang.Integer", &[], &["Number", "Comparable<Integer>"])
        .add_interface("java.lang.Iterable", &["T"], &[])
        .add_interface("java.util.Collection", &["E"], &["Iterable<E>"])
        .add_interface("java.util.List", &["E"], &["Collection<E>"])
        .add_interface("java.util.Set", &["E"], &["Collection<E>"])
        .add_interface("java.util.RandomAccess", &[], &[])
        .add_class(
            "java.util.AbstractCollection",
            &["E"],
            &["Object", "Collection<E>"],
        )
        .add_class(
            "java.util.AbstractList",
            &["E"],
            &["AbstractCollection<E>", "List<E>"],
        )
        .add_class(
            "java.util.ArrayList",
            &["E"],
            &["AbstractList<E>", "List<E>", "RandomAccess", "java.io.Serializable"],
        )
        .add_class("java.util.HashSet", &["E"], &["AbstractCollection<E>", "Set<E>"])
        .add_interface("java.util.Map", &["K", "V"], &[])
        .add_interface("java.util.Map.Entry", &["K", "V"], &[])
        .add_class("java.util.HashMap", &["K", "V"], &["Object", "Map<K, V>"])
        .add_class("com.shop.Order", &[], &["Object"])
        .add_class("com.shop.User", &[], &["Object"])
        .add_class("com.shop.OrderItem", &[], &["Object"])
        .add_class("com.shop.OrderList", &[], &["java.util.ArrayList<Order>"])
        .add_class(
            "com.shop.NumberBag",
            &["N extends Number"],
            &["Object", "Iterable<N>"],
        )
        .add_class(
            "com.shop.Registry",
            &["K", "V"],
            &["java.util.HashMap<K, java.util.List<V>>"],
        )
        .add_class("com.shop.Shop", &[], &["Object"])
        .add_class("com.shop.Shop.Line", &[], &["Object"])
}

#[allow(dead_code)]
pub fn position() -> PositionContext {
    PositionContext::new("file:///src/com/shop/Shop.java", 12, 8)
}

/// Completion collaborator answering a fixed result.
#[allow(dead_code)]
#[derive(Debug, Clone, Default)]
pub struct FixedCompletions {
    result: CompletionResult,
}

#[allow(dead_code)]
impl FixedCompletions {
    /// Completions inside `com.shop.Shop`.
    pub fn new() -> Self {
        Self {
            result: CompletionResult {
                items: Vec::new(),
                enclosing_type: Some(SHOP.to_string()),
                unit_types: vec![SHOP.to_string(), format!("{}.Line", SHOP)],
            },
        }
    }

    /// Declare a local; later declarations shadow earlier ones.
    pub fn local(mut self, name: &str, ty: &str) -> Self {
        self.result.items.push(CompletionItem::local(name, ty));
        self
    }

    pub fn field(mut self, name: &str, ty: &str) -> Self {
        self.result.items.push(CompletionItem::field(name, ty));
        self
    }

    pub fn item(mut self, item: CompletionItem) -> Self {
        self.result.items.push(item);
        self
    }
}

impl CompletionProvider for FixedCompletions {
    fn complete_at(&self, _position: &PositionContext) -> LookupResult<CompletionResult> {
        Ok(self.result.clone())
    }
}

/// Completion collaborator that always fails.
#[allow(dead_code)]
pub struct FailingCompletions;

impl CompletionProvider for FailingCompletions {
    fn complete_at(&self, _position: &PositionContext) -> LookupResult<CompletionResult> {
        Err(LookupError::Completion("index not ready".to_string()))
    }
}

/// Project model that fails on every call.
#[allow(dead_code)]
pub struct FailingTypeSystem;

#[allow(dead_code)]
fn unavailable<T>() -> LookupResult<T> {
    Err(LookupError::Unavailable("project model offline".to_string()))
}

impl TypeHierarchy for FailingTypeSystem {
    fn is_subtype_of(&self, _type_fqn: &str, _supertype_fqn: &str) -> LookupResult<bool> {
        unavailable()
    }

    fn find_type(&self, _fqn: &str) -> LookupResult<Option<TypeHandle>> {
        unavailable()
    }

    fn supertype_signatures_of(&self, _ty: &TypeHandle) -> LookupResult<Vec<TypeRef>> {
        unavailable()
    }

    fn direct_subtypes_of(
        &self,
        _ty: &TypeHandle,
        _within: &[TypeHandle],
    ) -> LookupResult<Vec<TypeHandle>> {
        unavailable()
    }
}

impl ScopeResolver for FailingTypeSystem {
    fn resolve_simple_name_in_scope(&self, _name: &str, _scope: &str) -> LookupResult<Vec<String>> {
        unavailable()
    }
}

/// Catalog over the JDK model.
#[allow(dead_code)]
pub fn catalog(completions: FixedCompletions) -> SymbolCatalog {
    init_tracing();
    let ts: Arc<dyn JavaTypeSystem> = Arc::new(jdk());
    SymbolCatalog::collect(
        &completions,
        ts,
        Arc::new(TemplateConfig::default()),
        &position(),
    )
}
