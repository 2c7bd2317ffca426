use super::resolvers::Resolver;
use crate::catalog::SymbolId;
use crate::error::{Result, TemplateError};
use indexmap::IndexMap;
use naviscope_api::models::{PlaceholderId, PlaceholderSpan};
use std::collections::HashSet;

/// Identity of a choice set: which master choice it was computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChoiceKey {
    /// The only set of a placeholder that does not follow a symbol.
    Default,
    Symbol(SymbolId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    /// Symbol the value stands for, if any.
    pub anchor: Option<SymbolId>,
    pub value: String,
}

impl Choice {
    pub fn anchored(anchor: SymbolId, value: impl Into<String>) -> Self {
        Self {
            anchor: Some(anchor),
            value: value.into(),
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self {
            anchor: None,
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ChoiceSet {
    choices: Vec<Choice>,
    current: usize,
}

/// Placeholder value the user cycles through.
///
/// Holds one choice set per key; the active key selects the set on display.
/// A free-text edit overrides the selected choice until the key changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiChoice {
    sets: IndexMap<ChoiceKey, ChoiceSet>,
    key: ChoiceKey,
    edit: Option<String>,
}

impl MultiChoice {
    pub fn new(key: ChoiceKey, choices: Vec<Choice>) -> Self {
        let mut sets = IndexMap::new();
        sets.insert(key, ChoiceSet {
            choices,
            current: 0,
        });
        Self {
            sets,
            key,
            edit: None,
        }
    }

    /// Make `sets` the only choice sets and activate `key`.
    ///
    /// A set whose choices did not change keeps its selection; the edit
    /// survives only when `key` stays the active key.
    pub fn replace_sets(&mut self, sets: Vec<(ChoiceKey, Vec<Choice>)>, key: ChoiceKey) {
        let mut next = IndexMap::with_capacity(sets.len());
        for (set_key, choices) in sets {
            let current = match self.sets.get(&set_key) {
                Some(old) if old.choices == choices => old.current,
                _ => 0,
            };
            next.insert(set_key, ChoiceSet { choices, current });
        }
        self.sets = next;
        self.set_key(key);
    }

    pub fn key(&self) -> ChoiceKey {
        self.key
    }

    pub fn has_key(&self, key: &ChoiceKey) -> bool {
        self.sets.contains_key(key)
    }

    /// Switch the active set without recomputing it.
    pub fn set_key(&mut self, key: ChoiceKey) {
        if self.key != key {
            self.edit = None;
            self.key = key;
        }
    }

    fn active(&self) -> Option<&ChoiceSet> {
        self.sets
            .get(&self.key)
            .or_else(|| self.sets.get(&ChoiceKey::Default))
    }

    /// Choices of the active set.
    pub fn choices(&self) -> &[Choice] {
        self.active().map(|s| s.choices.as_slice()).unwrap_or(&[])
    }

    pub fn current_index(&self) -> usize {
        self.active().map_or(0, |s| s.current)
    }

    pub fn current_choice(&self) -> Option<&Choice> {
        self.active().and_then(|s| s.choices.get(s.current))
    }

    /// Symbol of the selected choice, ignoring edits.
    pub fn anchor(&self) -> Option<SymbolId> {
        self.current_choice().and_then(|c| c.anchor)
    }

    pub fn select(&mut self, index: usize) -> std::result::Result<(), usize> {
        let key = if self.sets.contains_key(&self.key) {
            self.key
        } else {
            ChoiceKey::Default
        };
        let Some(set) = self.sets.get_mut(&key) else {
            return Err(0);
        };
        if index >= set.choices.len() {
            return Err(set.choices.len());
        }
        set.current = index;
        self.edit = None;
        Ok(())
    }

    pub fn edit(&mut self, text: impl Into<String>) {
        self.edit = Some(text.into());
    }

    pub fn edited(&self) -> Option<&str> {
        self.edit.as_deref()
    }

    pub fn value(&self) -> &str {
        match &self.edit {
            Some(text) => text.as_str(),
            None => self.current_choice().map_or("", |c| c.value.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaceholderValue {
    Simple(String),
    MultiChoice(MultiChoice),
}

/// Result of evaluating a placeholder resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Evaluation {
    Simple(String),
    Choices {
        key: ChoiceKey,
        sets: Vec<(ChoiceKey, Vec<Choice>)>,
    },
}

impl Evaluation {
    pub(crate) fn single(choices: Vec<Choice>) -> Self {
        Evaluation::Choices {
            key: ChoiceKey::Default,
            sets: vec![(ChoiceKey::Default, choices)],
        }
    }
}

/// A template variable with its resolved value.
#[derive(Debug, Clone)]
pub struct Placeholder {
    id: PlaceholderId,
    name: String,
    type_name: Option<String>,
    params: Vec<String>,
    pub(crate) resolver: Resolver,
    value: PlaceholderValue,
    /// Names this placeholder has put to use.
    claims: HashSet<String>,
    resolved: bool,
    generation: u64,
}

impl Placeholder {
    pub(crate) fn new(
        id: PlaceholderId,
        name: impl Into<String>,
        type_name: Option<String>,
        params: Vec<String>,
    ) -> Self {
        let name = name.into();
        let resolver = Resolver::for_variable(&name, type_name.as_deref(), &params);
        Self {
            id,
            value: PlaceholderValue::Simple(name.clone()),
            name,
            type_name,
            params,
            resolver,
            claims: HashSet::new(),
            resolved: false,
            generation: 0,
        }
    }

    pub fn id(&self) -> PlaceholderId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn value(&self) -> &PlaceholderValue {
        &self.value
    }

    pub fn current_value(&self) -> &str {
        match &self.value {
            PlaceholderValue::Simple(text) => text.as_str(),
            PlaceholderValue::MultiChoice(mc) => mc.value(),
        }
    }

    pub fn multi_choice(&self) -> Option<&MultiChoice> {
        match &self.value {
            PlaceholderValue::MultiChoice(mc) => Some(mc),
            PlaceholderValue::Simple(_) => None,
        }
    }

    /// Symbol behind the current value, if the value was picked from the catalog.
    pub fn anchor(&self) -> Option<SymbolId> {
        self.multi_choice().and_then(MultiChoice::anchor)
    }

    /// Key a slave uses to follow this placeholder.
    pub fn choice_key(&self) -> ChoiceKey {
        self.anchor().map_or(ChoiceKey::Default, ChoiceKey::Symbol)
    }

    pub fn claims(&self) -> &HashSet<String> {
        &self.claims
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// Number of times the value was (re)computed.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn apply(&mut self, evaluation: Evaluation) {
        match evaluation {
            Evaluation::Simple(text) => self.value = PlaceholderValue::Simple(text),
            Evaluation::Choices { key, sets } => match &mut self.value {
                PlaceholderValue::MultiChoice(mc) => mc.replace_sets(sets, key),
                PlaceholderValue::Simple(_) => {
                    let mut mc = MultiChoice::new(key, Vec::new());
                    mc.replace_sets(sets, key);
                    self.value = PlaceholderValue::MultiChoice(mc);
                }
            },
        }
        self.resolved = true;
        self.generation += 1;
        self.refresh_claims();
    }

    /// Follow a master's choice without recomputing. Returns `false` when no set matches.
    pub(crate) fn follow(&mut self, key: ChoiceKey) -> bool {
        let PlaceholderValue::MultiChoice(mc) = &mut self.value else {
            return false;
        };
        if !mc.has_key(&key) {
            return false;
        }
        mc.set_key(key);
        self.generation += 1;
        self.refresh_claims();
        true
    }

    pub(crate) fn select(&mut self, index: usize) -> Result<()> {
        let selected = match &mut self.value {
            PlaceholderValue::MultiChoice(mc) => mc.select(index),
            PlaceholderValue::Simple(_) => Err(0),
        };
        match selected {
            Ok(()) => {
                self.refresh_claims();
                Ok(())
            }
            Err(len) => Err(TemplateError::InvalidChoice {
                placeholder: self.id,
                index,
                len,
            }),
        }
    }

    pub(crate) fn edit(&mut self, text: &str) {
        match &mut self.value {
            PlaceholderValue::MultiChoice(mc) => mc.edit(text),
            PlaceholderValue::Simple(value) => *value = text.to_string(),
        }
        self.refresh_claims();
    }

    fn refresh_claims(&mut self) {
        self.claims.clear();
        if self.resolver.claims_value() {
            let value = self.current_value();
            if !value.is_empty() {
                let value = value.to_string();
                self.claims.insert(value);
            }
        }
    }

    pub(crate) fn span(&self, offsets: Vec<usize>) -> PlaceholderSpan {
        let (choices, current) = match &self.value {
            PlaceholderValue::MultiChoice(mc) => (
                mc.choices().iter().map(|c| c.value.clone()).collect(),
                mc.current_index(),
            ),
            PlaceholderValue::Simple(_) => (Vec::new(), 0),
        };
        PlaceholderSpan {
            id: self.id,
            name: self.name.clone(),
            offsets,
            length: self.current_value().len(),
            choices,
            current,
        }
    }
}
