use super::graph::DependencyGraph;
use super::parse::{ParsedTemplate, Segment, parse_template};
use super::placeholder::Placeholder;
use super::resolvers::{ResolveEnv, Resolver};
use crate::catalog::SymbolCatalog;
use crate::config::TemplateConfig;
use crate::error::{Result, TemplateError};
use crate::types::JavaTypeSystem;
use naviscope_api::models::{PlaceholderId, PositionContext, RenderedBuffer};
use naviscope_api::semantic::CompletionProvider;
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Start,
    /// Asking the completion collaborator for visible symbols.
    Collecting,
    Resolving,
    /// Every placeholder has a value; the user may cycle choices.
    Interactive,
    /// Accepted or cancelled.
    Terminal,
}

/// One template expansion, from parsing to accept or cancel.
///
/// Placeholders resolve in declaration order. A placeholder computed from
/// another one resolves its master first and is registered as its slave, so
/// later selections on the master flow down the dependency graph.
pub struct TemplateSession {
    type_system: Arc<dyn JavaTypeSystem>,
    completion: Arc<dyn CompletionProvider>,
    config: Arc<TemplateConfig>,
    position: PositionContext,
    template: ParsedTemplate,
    catalog: Option<SymbolCatalog>,
    placeholders: Vec<Placeholder>,
    graph: DependencyGraph,
    state: SessionState,
    in_progress: HashSet<PlaceholderId>,
}

impl TemplateSession {
    pub fn new(
        template: &str,
        position: PositionContext,
        type_system: Arc<dyn JavaTypeSystem>,
        completion: Arc<dyn CompletionProvider>,
        config: Arc<TemplateConfig>,
    ) -> Result<Self> {
        let template = parse_template(template)?;
        let placeholders = template
            .variables
            .iter()
            .enumerate()
            .map(|(i, v)| {
                Placeholder::new(
                    PlaceholderId(i),
                    v.name.clone(),
                    v.type_name.clone(),
                    v.params.clone(),
                )
            })
            .collect();

        Ok(Self {
            type_system,
            completion,
            config,
            position,
            template,
            catalog: None,
            placeholders,
            graph: DependencyGraph::new(),
            state: SessionState::Start,
            in_progress: HashSet::new(),
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn position(&self) -> &PositionContext {
        &self.position
    }

    /// The symbol catalog, once a resolver asked for it.
    pub fn catalog(&self) -> Option<&SymbolCatalog> {
        self.catalog.as_ref()
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    pub fn placeholders(&self) -> &[Placeholder] {
        &self.placeholders
    }

    pub fn placeholder(&self, id: PlaceholderId) -> Option<&Placeholder> {
        self.placeholders.get(id.0)
    }

    pub fn placeholder_by_name(&self, name: &str) -> Option<&Placeholder> {
        self.placeholders.iter().find(|p| p.name() == name)
    }

    pub fn current_value(&self, name: &str) -> Option<&str> {
        self.placeholder_by_name(name).map(Placeholder::current_value)
    }

    /// Names claimed by any placeholder.
    pub fn used_names(&self) -> HashSet<&str> {
        self.placeholders
            .iter()
            .flat_map(|p| p.claims().iter().map(String::as_str))
            .collect()
    }

    /// Resolve every placeholder and render the buffer.
    ///
    /// Resolution never fails: a placeholder without candidates renders a default.
    pub fn resolve(&mut self) -> Result<RenderedBuffer> {
        match self.state {
            SessionState::Terminal => return Err(TemplateError::SessionTerminated),
            SessionState::Start => {
                self.transition(SessionState::Resolving);
                for i in 0..self.placeholders.len() {
                    self.resolve_placeholder(PlaceholderId(i));
                }
                self.transition(SessionState::Interactive);
            }
            _ => {}
        }
        Ok(self.render())
    }

    /// Make `index` the active choice of `id` and update its dependents.
    pub fn select_choice(&mut self, id: PlaceholderId, index: usize) -> Result<RenderedBuffer> {
        self.ensure_interactive()?;
        self.placeholder_mut(id)?.select(index)?;
        tracing::debug!("Selected choice {} of {}", index, id);
        self.notify_choice_selected(id);
        Ok(self.render())
    }

    /// Replace the value of `id` by free text typed by the user.
    pub fn edit(&mut self, id: PlaceholderId, text: &str) -> Result<RenderedBuffer> {
        self.ensure_interactive()?;
        self.placeholder_mut(id)?.edit(text);
        self.notify_choice_selected(id);
        Ok(self.render())
    }

    /// Re-evaluate every placeholder reachable from `master`, once each, masters first.
    ///
    /// Keyed slaves switch to the choice set of the master's current symbol;
    /// the others are recomputed.
    pub fn notify_choice_selected(&mut self, master: PlaceholderId) {
        for slave in self.graph.dependents_in_order(master) {
            self.reevaluate(slave);
        }
    }

    /// Render the final text and end the session.
    pub fn accept(&mut self) -> Result<String> {
        self.ensure_interactive()?;
        let text = self.render().text;
        self.transition(SessionState::Terminal);
        Ok(text)
    }

    pub fn cancel(&mut self) {
        self.transition(SessionState::Terminal);
    }

    pub fn render(&self) -> RenderedBuffer {
        let mut text = String::new();
        let mut offsets: Vec<Vec<usize>> = vec![Vec::new(); self.placeholders.len()];
        for segment in &self.template.segments {
            match segment {
                Segment::Text(literal) => text.push_str(literal),
                Segment::Variable(i) => {
                    offsets[*i].push(text.len());
                    text.push_str(self.placeholders[*i].current_value());
                }
            }
        }

        let cursor = self
            .placeholders
            .iter()
            .find(|p| matches!(p.resolver, Resolver::Cursor))
            .and_then(|p| offsets[p.id().0].first().copied());
        let placeholders = self
            .placeholders
            .iter()
            .zip(offsets)
            .map(|(p, offsets)| p.span(offsets))
            .collect();

        RenderedBuffer {
            text,
            placeholders,
            cursor,
        }
    }

    fn transition(&mut self, next: SessionState) {
        if self.state != next {
            tracing::debug!("Template session {:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }

    fn ensure_interactive(&mut self) -> Result<()> {
        match self.state {
            SessionState::Terminal => Err(TemplateError::SessionTerminated),
            SessionState::Start => self.resolve().map(|_| ()),
            _ => Ok(()),
        }
    }

    fn placeholder_mut(&mut self, id: PlaceholderId) -> Result<&mut Placeholder> {
        self.placeholders
            .get_mut(id.0)
            .ok_or(TemplateError::UnknownPlaceholder(id))
    }

    fn ensure_catalog(&mut self) {
        if self.catalog.is_some() {
            return;
        }
        let resume = self.state;
        self.transition(SessionState::Collecting);
        self.catalog = Some(SymbolCatalog::collect(
            self.completion.as_ref(),
            self.type_system.clone(),
            self.config.clone(),
            &self.position,
        ));
        self.transition(resume);
    }

    /// The placeholder `id` is computed from, if its master names another placeholder.
    fn master_of(&self, id: PlaceholderId) -> Option<PlaceholderId> {
        let name = self.placeholders[id.0].resolver.master()?;
        let index = self.template.variable_index(name)?;
        (index != id.0).then_some(PlaceholderId(index))
    }

    fn resolve_placeholder(&mut self, id: PlaceholderId) {
        if self.placeholders[id.0].is_resolved() || !self.in_progress.insert(id) {
            return;
        }

        if let Some(master) = self.master_of(id) {
            self.resolve_placeholder(master);
            if let Err(e) = self.graph.add_dependency(master, id) {
                tracing::debug!("{} resolves without following {}: {}", id, master, e);
            }
        }
        self.evaluate(id);

        self.in_progress.remove(&id);
    }

    fn reevaluate(&mut self, id: PlaceholderId) {
        if self.placeholders[id.0].resolver.is_keyed() {
            if let Some(master) = self.master_of(id) {
                let key = self.placeholders[master.0].choice_key();
                if self.placeholders[id.0].follow(key) {
                    return;
                }
            }
        }
        self.evaluate(id);
    }

    fn evaluate(&mut self, id: PlaceholderId) {
        if self.placeholders[id.0].resolver.needs_catalog() {
            self.ensure_catalog();
        }

        let used: HashSet<String> = self
            .placeholders
            .iter()
            .filter(|p| p.id() != id)
            .flat_map(|p| p.claims().iter().cloned())
            .collect();

        let evaluation = {
            let placeholder = &self.placeholders[id.0];
            let master = self.master_of(id).map(|m| &self.placeholders[m.0]);
            let env = ResolveEnv {
                catalog: self.catalog.as_ref(),
                config: &self.config,
                used: &used,
            };
            placeholder
                .resolver
                .evaluate(placeholder.name(), &env, master)
        };

        let placeholder = &mut self.placeholders[id.0];
        placeholder.apply(evaluation);
        tracing::trace!("{} {} = {:?}", id, placeholder.name(), placeholder.current_value());
    }
}
