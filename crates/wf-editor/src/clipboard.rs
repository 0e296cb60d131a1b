//! Clipboard manager: copy/cut/paste with identity remapping.
//!
//! A clipboard snapshot is a full copy of the captured subgraph, detached
//! from the live graph. Paste never moves the snapshot: it clones it with
//! globally fresh ids, so pasting the same snapshot repeatedly mints a new
//! identity every time. Nested children keep their parent-relative
//! coordinates; only top-level nodes are translated to the paste anchor.

use crate::history::History;
use crate::store::GraphStore;
use log::debug;
use std::collections::HashMap;
use wf_core::geometry::Point;
use wf_core::id::NodeId;
use wf_core::model::{Edge, Extent, Node, sort_parents_first};

/// Offset applied when pasting with no explicit anchor and no known
/// pointer position.
const PASTE_FALLBACK_OFFSET: f32 = 40.0;

/// A captured subgraph pending paste, tagged with the originating tab.
#[derive(Debug, Clone)]
pub struct ClipboardSnapshot {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub origin_tab: String,
}

#[derive(Default)]
pub struct Clipboard {
    snapshot: Option<ClipboardSnapshot>,
}

impl Clipboard {
    pub fn is_empty(&self) -> bool {
        self.snapshot.is_none()
    }

    pub fn snapshot(&self) -> Option<&ClipboardSnapshot> {
        self.snapshot.as_ref()
    }

    /// Capture the current selection, expanded to every child of a
    /// selected group, plus the edges internal to the captured set.
    /// An empty selection leaves the previous snapshot in place.
    /// Returns the number of captured nodes.
    pub fn copy(&mut self, store: &GraphStore, origin_tab: &str) -> usize {
        let (nodes, edges) = capture_selection(store);
        if nodes.is_empty() {
            return 0;
        }
        let count = nodes.len();
        debug!("copy {count} nodes / {} edges", edges.len());
        self.snapshot = Some(ClipboardSnapshot {
            nodes,
            edges,
            origin_tab: origin_tab.to_string(),
        });
        count
    }

    /// Copy, then remove the captured nodes and *every* edge now dangling
    /// (not only the captured ones). No-op while the canvas is locked.
    pub fn cut(&mut self, store: &mut GraphStore, history: &mut History, origin_tab: &str) {
        if store.locked {
            return;
        }
        if self.copy(store, origin_tab) == 0 {
            return;
        }
        let removed: Vec<NodeId> = self
            .snapshot
            .as_ref()
            .map(|s| s.nodes.iter().map(|n| n.id).collect())
            .unwrap_or_default();

        history.save_snapshot(store);
        store.set_nodes(|mut nodes| {
            nodes.retain(|n| !removed.contains(&n.id));
            nodes
        });
        store.set_edges(|mut edges| {
            edges.retain(|e| !removed.iter().any(|&id| e.touches(id)));
            edges
        });
    }

    /// Clone the snapshot into the live graph with fresh ids. The anchor
    /// is the explicit `position`, else the last-known pointer position in
    /// canvas coordinates, else a fixed offset from the original center.
    /// Returns the ids of the pasted nodes (empty on no-op).
    pub fn paste(
        &self,
        store: &mut GraphStore,
        history: &mut History,
        position: Option<Point>,
        pointer: Option<Point>,
    ) -> Vec<NodeId> {
        if store.locked {
            return Vec::new();
        }
        let Some(snapshot) = &self.snapshot else {
            return Vec::new();
        };

        history.save_snapshot(store);

        // Fresh prefix-preserving id per clipboard node.
        let id_map: HashMap<NodeId, NodeId> = snapshot
            .nodes
            .iter()
            .map(|n| (n.id, NodeId::fresh(n.node_type.tag())))
            .collect();

        // Top-level: no parent, or parent outside the captured set.
        let is_nested =
            |n: &Node| n.parent.is_some_and(|p| id_map.contains_key(&p));

        let center = top_level_center(&snapshot.nodes, &is_nested);
        let anchor = position.or(pointer).unwrap_or(Point::new(
            center.x + PASTE_FALLBACK_OFFSET,
            center.y + PASTE_FALLBACK_OFFSET,
        ));
        let delta = Point::new(anchor.x - center.x, anchor.y - center.y);

        let mut new_nodes: Vec<Node> = Vec::with_capacity(snapshot.nodes.len());
        for original in &snapshot.nodes {
            let mut node = original.clone();
            node.id = id_map[&original.id];
            node.selected = true;
            node.dragging = false;
            if is_nested(original) {
                // Keep relative position and extent; only remap identity.
                node.parent = original.parent.map(|p| id_map[&p]);
            } else {
                node.parent = None;
                node.extent = Extent::Free;
                node.position = Point::new(node.position.x + delta.x, node.position.y + delta.y);
            }
            new_nodes.push(node);
        }

        let new_edges: Vec<Edge> = snapshot
            .edges
            .iter()
            .map(|original| {
                let mut edge = original.clone();
                edge.id = NodeId::fresh("edge");
                edge.source = id_map[&original.source];
                edge.target = id_map[&original.target];
                edge.selected = false;
                edge
            })
            .collect();

        let pasted_ids: Vec<NodeId> = new_nodes.iter().map(|n| n.id).collect();
        debug!("paste {} nodes at {:?}", pasted_ids.len(), anchor);

        store.deselect_all();
        store.set_nodes(|mut nodes| {
            nodes.extend(new_nodes);
            sort_parents_first(&mut nodes);
            nodes
        });
        store.set_edges(|mut edges| {
            edges.extend(new_edges);
            edges
        });
        pasted_ids
    }
}

/// Selected nodes + one-level children of selected groups, in document
/// order, with the edges whose both endpoints were captured.
fn capture_selection(store: &GraphStore) -> (Vec<Node>, Vec<Edge>) {
    let selected: Vec<NodeId> = store.selected_node_ids();
    let captured: Vec<Node> = store
        .nodes()
        .iter()
        .filter(|n| {
            n.selected || n.parent.is_some_and(|p| selected.contains(&p))
        })
        .cloned()
        .collect();
    let ids: Vec<NodeId> = captured.iter().map(|n| n.id).collect();
    let edges: Vec<Edge> = store
        .edges()
        .iter()
        .filter(|e| ids.contains(&e.source) && ids.contains(&e.target))
        .cloned()
        .collect();
    (captured, edges)
}

fn top_level_center(nodes: &[Node], is_nested: &impl Fn(&Node) -> bool) -> Point {
    let mut min = Point::new(f32::MAX, f32::MAX);
    let mut max = Point::new(f32::MIN, f32::MIN);
    let mut any = false;
    for n in nodes.iter().filter(|n| !is_nested(n)) {
        let size = n.size_or_default();
        min.x = min.x.min(n.position.x);
        min.y = min.y.min(n.position.y);
        max.x = max.x.max(n.position.x + size.width);
        max.y = max.y.max(n.position.y + size.height);
        any = true;
    }
    if !any {
        return Point::default();
    }
    Point::new((min.x + max.x) / 2.0, (min.y + max.y) / 2.0)
}
