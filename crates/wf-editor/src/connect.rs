//! Connection validation and routing.
//!
//! `is_valid_connection` is the cheap predicate the host queries while a
//! connection is being dragged; `connect` is the commit path that resolves
//! generic placeholder handles to concrete ones and appends the edge.
//! Rejections are silent (no edge, no error) except that `connect`
//! reports the created edge id so the host can select it.

use crate::store::GraphStore;
use log::debug;
use wf_core::handles::{GENERIC_INPUT, GENERIC_OUTPUT, HandleClass};
use wf_core::id::NodeId;
use wf_core::model::{Edge, EdgeKind, NodeType};

/// A proposed edge, as reported by the host's drag gesture.
#[derive(Debug, Clone)]
pub struct Connection {
    pub source: NodeId,
    pub source_handle: String,
    pub target: NodeId,
    pub target_handle: String,
}

/// Self-loops are always invalid. Otherwise the target handle's accepted
/// sets decide, with unknown handles falling back to the open default.
pub fn is_valid_connection(store: &GraphStore, c: &Connection) -> bool {
    if c.source == c.target {
        return false;
    }
    let registry = store.registry();
    match (
        registry.get(c.source, &c.source_handle),
        registry.get(c.target, &c.target_handle),
    ) {
        (Some(src), Some(tgt)) => tgt.spec.accepts(&src.spec),
        _ => true,
    }
}

/// Commit a connection. No-op while the canvas is locked or when the
/// candidate is invalid. Returns the new edge's id when one was created.
pub fn connect(store: &mut GraphStore, candidate: Connection) -> Option<NodeId> {
    if store.locked || !is_valid_connection(store, &candidate) {
        return None;
    }

    let mut source_handle = candidate.source_handle.clone();
    let mut target_handle = candidate.target_handle.clone();

    // A generic "input" on an agent resolves to the concrete sub-handle
    // matching the source handle's output classification.
    if target_handle == GENERIC_INPUT
        && store
            .node(candidate.target)
            .is_some_and(|n| n.node_type == NodeType::Agent)
    {
        let source_class = store
            .registry()
            .get(candidate.source, &source_handle)
            .and_then(|e| e.spec.output_source.clone());
        target_handle = match source_class.as_deref() {
            Some("prompt") => "prompt-input".to_string(),
            Some("tool") => "tools-input".to_string(),
            _ => "data-input".to_string(),
        };
    }

    // A generic "output" resolves only when the source exposes exactly one
    // concrete output; with several it stays ambiguous on the shared handle.
    if source_handle == GENERIC_OUTPUT {
        let outputs = store.registry().concrete_outputs(candidate.source);
        if let [only] = outputs.as_slice() {
            source_handle = only.to_string();
        }
    }

    let class_of = |node: NodeId, handle: &str| {
        store
            .registry()
            .get(node, handle)
            .map(|e| e.spec.class)
            .unwrap_or(HandleClass::Data)
    };
    let source_link = class_of(candidate.source, &source_handle) == HandleClass::Link;
    let target_link = class_of(candidate.target, &target_handle) == HandleClass::Link;

    // Link handles only pair with link handles.
    if source_link != target_link {
        debug!(
            "rejecting mixed link/data connection {} -> {}",
            candidate.source, candidate.target
        );
        return None;
    }

    let mut edge = Edge::new(candidate.source, source_handle, candidate.target, target_handle);
    if source_link {
        edge.kind = EdgeKind::Link;
    }
    let id = edge.id;
    store.set_edges(|mut edges| {
        edges.push(edge);
        edges
    });
    Some(id)
}
