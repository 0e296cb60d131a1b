//! The graph store: single source of truth for the node/edge collections.
//!
//! Every other component (validator, auto-parenter, history, clipboard,
//! deletion) takes the store by reference and proposes mutations through
//! `set_nodes` / `set_edges` functional updates. The store itself carries
//! no policy; it only keeps the derived handle registry in step with the
//! node collection and owns the canvas-wide `locked` flag.

use log::debug;
use wf_core::catalog::Catalog;
use wf_core::geometry::Point;
use wf_core::handles::HandleRegistry;
use wf_core::id::NodeId;
use wf_core::model::{Edge, GraphSnapshot, Node};

pub struct GraphStore {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    registry: HandleRegistry,
    catalog: Catalog,

    /// Canvas-wide lock: mutating entry points become no-ops while set.
    pub locked: bool,
}

impl GraphStore {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            registry: HandleRegistry::default(),
            catalog,
            locked: false,
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn registry(&self) -> &HandleRegistry {
        &self.registry
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Functional update over the node collection. The handle registry is
    /// re-derived afterwards; it is ephemeral state, never persisted.
    pub fn set_nodes(&mut self, update: impl FnOnce(Vec<Node>) -> Vec<Node>) {
        self.nodes = update(std::mem::take(&mut self.nodes));
        self.registry = HandleRegistry::rebuild(&self.catalog, &self.nodes);
    }

    /// Functional update over the edge collection.
    pub fn set_edges(&mut self, update: impl FnOnce(Vec<Edge>) -> Vec<Edge>) {
        self.edges = update(std::mem::take(&mut self.edges));
    }

    /// Create a node from the catalog and append it. On an unknown tag the
    /// graph is left untouched and the error is surfaced to the caller.
    pub fn spawn(&mut self, tag: &str, position: Point) -> Result<NodeId, String> {
        let node = self.catalog.instantiate(tag, position)?;
        let id = node.id;
        debug!("spawn {tag} -> {id}");
        self.set_nodes(|mut nodes| {
            nodes.push(node);
            nodes
        });
        Ok(id)
    }

    /// Full immutable copy of the current graph.
    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
        }
    }

    /// Replace the live graph with a snapshot (undo/redo, document load).
    pub fn restore(&mut self, snapshot: GraphSnapshot) {
        self.nodes = snapshot.nodes;
        self.edges = snapshot.edges;
        self.registry = HandleRegistry::rebuild(&self.catalog, &self.nodes);
    }

    pub fn selected_node_ids(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|n| n.selected)
            .map(|n| n.id)
            .collect()
    }

    pub fn deselect_all(&mut self) {
        for n in &mut self.nodes {
            n.selected = false;
        }
        for e in &mut self.edges {
            e.selected = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wf_core::model::NodeType;

    fn store() -> GraphStore {
        GraphStore::new(Catalog::builtin())
    }

    #[test]
    fn spawn_appends_and_registers_handles() {
        let mut s = store();
        let id = s.spawn("prompt", Point::new(5.0, 5.0)).unwrap();
        assert_eq!(s.nodes().len(), 1);
        assert_eq!(s.node(id).unwrap().node_type, NodeType::Prompt);
        assert!(s.registry().get(id, "text").is_some());
    }

    #[test]
    fn spawn_unknown_tag_leaves_graph_untouched() {
        let mut s = store();
        s.spawn("agent", Point::default()).unwrap();
        let err = s.spawn("widget", Point::default()).unwrap_err();
        assert!(err.contains("widget"));
        assert_eq!(s.nodes().len(), 1);
    }

    #[test]
    fn restore_rederives_registry() {
        let mut s = store();
        let id = s.spawn("tool", Point::default()).unwrap();
        let snap = s.snapshot();

        s.set_nodes(|_| Vec::new());
        assert!(s.registry().get(id, "definition").is_none());

        s.restore(snap);
        assert!(s.registry().get(id, "definition").is_some());
    }
}
