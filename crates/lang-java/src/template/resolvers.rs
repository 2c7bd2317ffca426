//! Placeholder resolvers, selected by the type of a template variable.

use super::placeholder::{Choice, ChoiceKey, Evaluation, Placeholder};
use crate::catalog::{Symbol, SymbolCatalog, SymbolId, SymbolOrigin, arrange};
use crate::config::TemplateConfig;
use crate::naming::suggest_variable_names;
use crate::types::{erasure_fqn, parse_type_or_object, simple_name};
use naviscope_api::models::{JAVA_LANG_OBJECT, TypeRef};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Resolver {
    /// `arrayVar`, `array`
    Arrays,
    /// `iterableVar`, `iterable`: arrays and iterables
    Iterables,
    Collections,
    /// `var`, `localVar`, `field`: symbols assignable to one of `types`
    Variables {
        types: Vec<String>,
        origin: Option<SymbolOrigin>,
    },
    /// `elemType`, `array_type`, `iterable_type`
    ElementType { master: Option<String> },
    /// `newName`, `array_element`, `iterable_element`
    ElementName { source: Option<String> },
    /// `argType(master, index)`
    TypeArgument { master: Option<String>, index: usize },
    Index,
    Link(Vec<String>),
    Cursor,
    /// Untyped or unknown type: the variable name itself
    Name,
}

impl Resolver {
    pub(crate) fn for_variable(name: &str, type_name: Option<&str>, params: &[String]) -> Self {
        let first = || params.first().cloned();
        let first_or = |default: &str| Some(first().unwrap_or_else(|| default.to_string()));

        match type_name {
            Some("arrayVar" | "array") => Resolver::Arrays,
            Some("iterableVar" | "iterable") => Resolver::Iterables,
            Some("collection") => Resolver::Collections,
            Some("var") => Resolver::variables(params, None),
            Some("localVar") => Resolver::variables(params, Some(SymbolOrigin::Local)),
            Some("field") => Resolver::variables(params, Some(SymbolOrigin::Field)),
            Some("elemType") => Resolver::ElementType { master: first() },
            Some("array_type") => Resolver::ElementType {
                master: first_or("array"),
            },
            Some("iterable_type") => Resolver::ElementType {
                master: first_or("iterable"),
            },
            Some("newName") => Resolver::ElementName { source: first() },
            Some("array_element") => Resolver::ElementName {
                source: first_or("array"),
            },
            Some("iterable_element") => Resolver::ElementName {
                source: first_or("iterable"),
            },
            Some("argType") => {
                let index = match params.get(1) {
                    Some(text) => text.parse().unwrap_or_else(|_| {
                        tracing::debug!("argType index `{}` of {} is not a number", text, name);
                        0
                    }),
                    None => 0,
                };
                Resolver::TypeArgument {
                    master: first(),
                    index,
                }
            }
            Some("index") => Resolver::Index,
            Some("link") => Resolver::Link(params.to_vec()),
            Some("cursor") => Resolver::Cursor,
            Some(other) => {
                tracing::debug!("No resolver for type `{}` of {}", other, name);
                Resolver::Name
            }
            None => Resolver::Name,
        }
    }

    fn variables(params: &[String], origin: Option<SymbolOrigin>) -> Self {
        let types = if params.is_empty() {
            vec![JAVA_LANG_OBJECT.to_string()]
        } else {
            params.to_vec()
        };
        Resolver::Variables { types, origin }
    }

    /// Name of the placeholder this one is computed from.
    pub(crate) fn master(&self) -> Option<&str> {
        match self {
            Resolver::ElementType { master } | Resolver::TypeArgument { master, .. } => {
                master.as_deref()
            }
            Resolver::ElementName { source } => source.as_deref(),
            _ => None,
        }
    }

    /// Keyed resolvers compute one choice set per master candidate up front
    /// and follow the master by switching keys.
    pub(crate) fn is_keyed(&self) -> bool {
        matches!(
            self,
            Resolver::ElementType { .. } | Resolver::TypeArgument { .. }
        )
    }

    pub(crate) fn picks_symbols(&self) -> bool {
        matches!(
            self,
            Resolver::Arrays
                | Resolver::Iterables
                | Resolver::Collections
                | Resolver::Variables { .. }
        )
    }

    /// Whether the value is a name that later suggestions must avoid.
    pub(crate) fn claims_value(&self) -> bool {
        self.picks_symbols() || matches!(self, Resolver::ElementName { .. } | Resolver::Index)
    }

    pub(crate) fn needs_catalog(&self) -> bool {
        !matches!(
            self,
            Resolver::Link(_) | Resolver::Cursor | Resolver::Name
        )
    }

    pub(crate) fn evaluate(
        &self,
        name: &str,
        env: &ResolveEnv<'_>,
        master: Option<&Placeholder>,
    ) -> Evaluation {
        match self {
            Resolver::Link(values) if !values.is_empty() => {
                Evaluation::single(values.iter().map(Choice::text).collect())
            }
            Resolver::Cursor => Evaluation::Simple(String::new()),
            Resolver::Link(_) | Resolver::Name => Evaluation::Simple(name.to_string()),
            _ => match env.catalog {
                Some(catalog) => self.evaluate_in(name, catalog, env, master),
                None => self.fallback(name),
            },
        }
    }

    fn fallback(&self, name: &str) -> Evaluation {
        match self {
            Resolver::ElementType { .. } | Resolver::TypeArgument { .. } => {
                Evaluation::Simple(simple_name(JAVA_LANG_OBJECT).to_string())
            }
            _ => Evaluation::Simple(name.to_string()),
        }
    }

    fn evaluate_in(
        &self,
        name: &str,
        catalog: &SymbolCatalog,
        env: &ResolveEnv<'_>,
        master: Option<&Placeholder>,
    ) -> Evaluation {
        match self {
            Resolver::Arrays => pick(catalog.find_arrays(), env, name),
            Resolver::Iterables => pick(catalog.find_iterables(), env, name),
            Resolver::Collections => pick(catalog.find_collections(), env, name),
            Resolver::Variables { types, origin } => {
                let mut seen = HashSet::new();
                let mut symbols = Vec::new();
                if *origin != Some(SymbolOrigin::Field) {
                    for ty in types {
                        symbols.extend(catalog.find_locals(ty));
                    }
                }
                if *origin != Some(SymbolOrigin::Local) {
                    for ty in types {
                        symbols.extend(catalog.find_fields(ty));
                    }
                }
                symbols.retain(|s| seen.insert(s.id()));
                pick(symbols, env, name)
            }
            Resolver::ElementType { .. } => {
                let cx = catalog.context();
                keyed(catalog, master, |symbol| symbol.member_type_names(&cx))
                    .unwrap_or_else(|| self.fallback(name))
            }
            Resolver::TypeArgument { index, .. } => {
                let cx = catalog.context();
                keyed(catalog, master, |symbol| {
                    let own_type = erasure_fqn(symbol.declared_type());
                    symbol.type_argument_bound_names(&cx, &own_type, *index)
                })
                .unwrap_or_else(|| self.fallback(name))
            }
            Resolver::ElementName { source } => {
                let cx = catalog.context();
                let (key, ty) = match (master, source) {
                    (Some(master), _) => match master.anchor().and_then(|id| catalog.symbol(id)) {
                        Some(symbol) => (
                            ChoiceKey::Symbol(symbol.id()),
                            symbol.element_type(&cx).clone(),
                        ),
                        // A master still resolving (cycle) has no meaningful value yet
                        None if master.resolver.picks_symbols() || !master.is_resolved() => {
                            (ChoiceKey::Default, TypeRef::object())
                        }
                        None => (
                            ChoiceKey::Default,
                            parse_type_or_object(master.current_value()),
                        ),
                    },
                    (None, Some(type_text)) => (ChoiceKey::Default, parse_type_or_object(type_text)),
                    (None, None) => return Evaluation::Simple(name.to_string()),
                };
                let excludes = env.excludes(catalog);
                let names = suggest_variable_names(&ty, &excludes, &env.config.naming);
                if names.is_empty() {
                    return Evaluation::Simple(name.to_string());
                }
                Evaluation::Choices {
                    key,
                    sets: vec![(key, names.into_iter().map(Choice::text).collect())],
                }
            }
            Resolver::Index => {
                let excludes = env.excludes(catalog);
                let free = env
                    .config
                    .index_names
                    .iter()
                    .find(|n| !excludes.contains(&n.as_str()))
                    .cloned();
                let value = free.unwrap_or_else(|| {
                    let base = env.config.index_names.first().map_or("i", String::as_str);
                    (2..)
                        .map(|i| format!("{}{}", base, i))
                        .find(|n| !excludes.contains(&n.as_str()))
                        .unwrap_or_else(|| base.to_string())
                });
                Evaluation::Simple(value)
            }
            Resolver::Link(_) | Resolver::Cursor | Resolver::Name => {
                self.evaluate(name, env, master)
            }
        }
    }
}

/// Inputs shared by every resolver of one session.
#[derive(Clone, Copy)]
pub(crate) struct ResolveEnv<'a> {
    pub catalog: Option<&'a SymbolCatalog>,
    pub config: &'a TemplateConfig,
    /// Names claimed by the other placeholders.
    pub used: &'a HashSet<String>,
}

impl ResolveEnv<'_> {
    /// Names a suggestion must not produce: visible locals and used names.
    fn excludes<'c>(&'c self, catalog: &'c SymbolCatalog) -> Vec<&'c str> {
        let mut excludes = catalog.local_names();
        excludes.extend(self.used.iter().map(String::as_str));
        excludes
    }
}

fn pick(mut symbols: Vec<&Symbol>, env: &ResolveEnv<'_>, name: &str) -> Evaluation {
    if symbols.is_empty() {
        return Evaluation::Simple(name.to_string());
    }
    arrange(&mut symbols, env.used);
    Evaluation::single(
        symbols
            .iter()
            .map(|s| Choice::anchored(s.id(), s.name()))
            .collect(),
    )
}

/// One choice set per symbol the master may pick, keyed by the symbol.
fn keyed<F>(catalog: &SymbolCatalog, master: Option<&Placeholder>, names: F) -> Option<Evaluation>
where
    F: Fn(&Symbol) -> Vec<String>,
{
    let master = master?;
    let mut anchors: Vec<SymbolId> = Vec::new();
    for choice in master.multi_choice()?.choices() {
        if let Some(anchor) = choice.anchor {
            if !anchors.contains(&anchor) {
                anchors.push(anchor);
            }
        }
    }
    if anchors.is_empty() {
        return None;
    }

    let sets = anchors
        .into_iter()
        .filter_map(|id| catalog.symbol(id))
        .map(|symbol| {
            let choices = names(symbol).into_iter().map(Choice::text).collect();
            (ChoiceKey::Symbol(symbol.id()), choices)
        })
        .collect();
    Some(Evaluation::Choices {
        key: master.choice_key(),
        sets,
    })
}
