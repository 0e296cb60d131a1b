//! Persistence-collaborator document.
//!
//! The core does not own a file format; it exchanges a
//! `{nodes, edges, viewport}` triple with the hosting layer and
//! guarantees the parent-ordering invariant on the way out. Encoding is
//! compact MessagePack via rmp-serde.

use crate::geometry::Viewport;
use crate::model::{Edge, Node, parents_precede_children, prune_dangling_edges, sort_parents_first};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub viewport: Viewport,
}

impl Document {
    /// Assemble a document for handoff: re-sorts so parents precede
    /// children and drops edges with missing endpoints.
    pub fn from_parts(mut nodes: Vec<Node>, mut edges: Vec<Edge>, viewport: Viewport) -> Self {
        sort_parents_first(&mut nodes);
        prune_dangling_edges(&nodes, &mut edges);
        Self {
            nodes,
            edges,
            viewport,
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, String> {
        debug_assert!(parents_precede_children(&self.nodes));
        rmp_serde::to_vec(self).map_err(|e| format!("encode document: {e}"))
    }

    /// Decode and normalize a document received from the host. Collections
    /// from outside are not trusted to satisfy the ordering invariant.
    pub fn decode(bytes: &[u8]) -> Result<Self, String> {
        let mut doc: Document =
            rmp_serde::from_slice(bytes).map_err(|e| format!("decode document: {e}"))?;
        sort_parents_first(&mut doc.nodes);
        prune_dangling_edges(&doc.nodes, &mut doc.edges);
        Ok(doc)
    }
}
