use crate::error::{Result, TemplateError};
use naviscope_api::models::PlaceholderId;
use petgraph::algo::{has_path_connecting, toposort};
use petgraph::graphmap::DiGraphMap;
use petgraph::visit::Dfs;
use std::collections::HashSet;

/// Master -> slave edges between placeholders. Always acyclic.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    graph: DiGraphMap<PlaceholderId, ()>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `slave` as depending on `master`. Adding an existing edge is a no-op.
    ///
    /// An edge that would close a cycle is rejected and the graph is left unchanged.
    pub fn add_dependency(&mut self, master: PlaceholderId, slave: PlaceholderId) -> Result<()> {
        if self.graph.contains_edge(master, slave) {
            return Ok(());
        }
        if master == slave
            || (self.graph.contains_node(slave)
                && self.graph.contains_node(master)
                && has_path_connecting(&self.graph, slave, master, None))
        {
            tracing::warn!("Rejected dependency {} -> {}: cycle", master, slave);
            return Err(TemplateError::DependencyCycle { master, slave });
        }
        self.graph.add_edge(master, slave, ());
        Ok(())
    }

    pub fn contains_dependency(&self, master: PlaceholderId, slave: PlaceholderId) -> bool {
        self.graph.contains_edge(master, slave)
    }

    pub fn masters_of(&self, slave: PlaceholderId) -> Vec<PlaceholderId> {
        if !self.graph.contains_node(slave) {
            return Vec::new();
        }
        self.graph
            .neighbors_directed(slave, petgraph::Direction::Incoming)
            .collect()
    }

    /// Every placeholder reachable from `master`, each once, masters before their slaves.
    pub fn dependents_in_order(&self, master: PlaceholderId) -> Vec<PlaceholderId> {
        if !self.graph.contains_node(master) {
            return Vec::new();
        }

        let mut reachable = HashSet::new();
        let mut dfs = Dfs::new(&self.graph, master);
        while let Some(node) = dfs.next(&self.graph) {
            if node != master {
                reachable.insert(node);
            }
        }

        match toposort(&self.graph, None) {
            Ok(order) => order
                .into_iter()
                .filter(|node| reachable.contains(node))
                .collect(),
            Err(cycle) => {
                // Unreachable while edges go through add_dependency
                tracing::error!("Dependency graph has a cycle at {}", cycle.node_id());
                let mut nodes: Vec<PlaceholderId> = reachable.into_iter().collect();
                nodes.sort();
                nodes
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.graph.edge_count() == 0
    }
}
