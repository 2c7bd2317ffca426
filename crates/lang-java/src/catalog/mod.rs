//! Symbols visible at a template position.
//!
//! The catalog asks the completion collaborator once, keeps local variables
//! and fields, and answers the queries the placeholder resolvers need.
//! Queries return the most recently declared symbols first, locals before fields.

mod symbol;

pub use symbol::{ContainerKind, Symbol, SymbolId, SymbolOrigin, TypeContext};

use crate::config::TemplateConfig;
use crate::types::{JavaTypeSystem, parse_type_or_object, qualify};
use naviscope_api::models::{CompletionKind, CompletionResult, PositionContext};
use naviscope_api::semantic::CompletionProvider;
use std::collections::HashSet;
use std::sync::Arc;

pub struct SymbolCatalog {
    type_system: Arc<dyn JavaTypeSystem>,
    config: Arc<TemplateConfig>,
    symbols: Vec<Symbol>,
    enclosing_type: Option<String>,
    unit_types: Vec<String>,
    has_errors: bool,
}

impl SymbolCatalog {
    /// Collect the symbols visible at `position`.
    ///
    /// A failing completion collaborator yields an empty catalog with
    /// [`has_errors`](Self::has_errors) set.
    pub fn collect(
        provider: &dyn CompletionProvider,
        type_system: Arc<dyn JavaTypeSystem>,
        config: Arc<TemplateConfig>,
        position: &PositionContext,
    ) -> Self {
        match provider.complete_at(position) {
            Ok(result) => Self::from_completion(result, type_system, config),
            Err(e) => {
                tracing::warn!("Completion at {}:{} failed: {}", position.uri, position.line, e);
                let mut catalog =
                    Self::from_completion(CompletionResult::default(), type_system, config);
                catalog.has_errors = true;
                catalog
            }
        }
    }

    pub fn from_completion(
        result: CompletionResult,
        type_system: Arc<dyn JavaTypeSystem>,
        config: Arc<TemplateConfig>,
    ) -> Self {
        let scope = result.enclosing_type.as_deref();
        let mut symbols = Vec::new();
        for item in &result.items {
            let origin = match item.kind {
                CompletionKind::LocalVariableRef => SymbolOrigin::Local,
                CompletionKind::FieldRef => SymbolOrigin::Field,
                CompletionKind::Other => continue,
            };
            let declared = parse_type_or_object(&item.type_descriptor);
            let declared = qualify(&declared, scope, type_system.as_ref());
            symbols.push(Symbol::new(
                SymbolId(symbols.len()),
                item.name.clone(),
                declared,
                origin,
            ));
        }
        tracing::debug!(
            "Collected {} symbols from {} completion items",
            symbols.len(),
            result.items.len()
        );

        Self {
            type_system,
            config,
            symbols,
            enclosing_type: result.enclosing_type,
            unit_types: result.unit_types,
            has_errors: false,
        }
    }

    pub fn context(&self) -> TypeContext<'_> {
        TypeContext {
            ts: self.type_system.as_ref(),
            config: &self.config,
            scope: self.enclosing_type.as_deref(),
            unit_types: &self.unit_types,
        }
    }

    /// Whether the completion collaborator failed.
    pub fn has_errors(&self) -> bool {
        self.has_errors
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbol(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.0)
    }

    /// Innermost symbol called `name`.
    pub fn find_by_name(&self, name: &str) -> Option<&Symbol> {
        self.all().find(|s| s.name() == name)
    }

    /// Locals, then fields, most recent declaration first.
    pub fn all(&self) -> impl Iterator<Item = &Symbol> {
        self.locals().chain(self.fields())
    }

    pub fn locals(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter().rev().filter(|s| s.is_local())
    }

    pub fn fields(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter().rev().filter(|s| !s.is_local())
    }

    pub fn local_names(&self) -> Vec<&str> {
        self.locals().map(Symbol::name).collect()
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields().map(Symbol::name).collect()
    }

    pub fn find_arrays(&self) -> Vec<&Symbol> {
        self.all().filter(|s| s.is_array()).collect()
    }

    /// Arrays and iterables, i.e. everything a for-each loop accepts.
    pub fn find_iterables(&self) -> Vec<&Symbol> {
        let cx = self.context();
        self.all()
            .filter(|s| s.is_array() || s.is_iterable(&cx))
            .collect()
    }

    pub fn find_collections(&self) -> Vec<&Symbol> {
        let cx = self.context();
        self.all().filter(|s| s.is_collection(&cx)).collect()
    }

    /// Locals assignable to `ty` (Java source text, simple or qualified).
    pub fn find_locals(&self, ty: &str) -> Vec<&Symbol> {
        let cx = self.context();
        self.locals().filter(|s| s.is_subtype_of(&cx, ty)).collect()
    }

    pub fn find_fields(&self, ty: &str) -> Vec<&Symbol> {
        let cx = self.context();
        self.fields().filter(|s| s.is_subtype_of(&cx, ty)).collect()
    }
}

/// Stable sort moving symbols whose name is in `used` behind the others.
pub fn arrange(symbols: &mut [&Symbol], used: &HashSet<String>) {
    symbols.sort_by_key(|s| used.contains(s.name()));
}
