//! Auto-parenting engine.
//!
//! Runs once per completed drag gesture, never mid-drag. For every
//! dragged non-group node the engine recomputes group membership from
//! geometry: the node belongs to the *first* group, in document order,
//! whose bounding box contains the node's center. Ties break by group
//! order, not area, matching the hit-test order of the containment
//! model (depth capped at one, groups never nested).

use crate::store::GraphStore;
use log::debug;
use wf_core::geometry::{Point, Rect, to_relative};
use wf_core::id::NodeId;
use wf_core::model::{
    Extent, GROUP_INSET_X, GROUP_INSET_Y, absolute_position, sort_parents_first,
};

enum Reparent {
    Attach { group: NodeId, relative: Point },
    Detach { absolute: Point },
}

/// Recompute group membership for the nodes of a finished drag gesture.
/// No-op while the canvas is locked.
pub fn reparent_dropped(store: &mut GraphStore, dragged: &[NodeId]) {
    if store.locked {
        return;
    }

    store.set_nodes(|mut nodes| {
        // Group bounds in document order. Groups are never parented, so
        // their stored positions are absolute.
        let groups: Vec<(NodeId, Rect)> = nodes
            .iter()
            .filter(|n| n.is_group())
            .map(|g| (g.id, Rect::new(g.position, g.size_or_default())))
            .collect();

        let mut changes: Vec<(usize, Reparent)> = Vec::new();
        for &id in dragged {
            let Some(idx) = nodes.iter().position(|n| n.id == id) else {
                continue; // missing reference: skip silently
            };
            let node = &nodes[idx];
            if node.is_group() {
                continue;
            }

            let abs = absolute_position(&nodes, node);
            let size = node.size_or_default();
            let center = Point::new(abs.x + size.width / 2.0, abs.y + size.height / 2.0);

            let hit = groups.iter().find(|(_, rect)| rect.contains(center));
            match hit {
                Some(&(group, rect)) if node.parent != Some(group) => {
                    let mut relative = to_relative(abs, rect.origin);
                    // Keep the child clear of the group border and header.
                    relative.x = relative.x.max(GROUP_INSET_X);
                    relative.y = relative.y.max(GROUP_INSET_Y);
                    changes.push((idx, Reparent::Attach { group, relative }));
                }
                Some(_) => {}
                None if node.extent == Extent::BoundedToParent => {
                    changes.push((idx, Reparent::Detach { absolute: abs }));
                }
                // Parented but not bounded ("expanded" child): geometry
                // alone never detaches it.
                None => {}
            }
        }

        for (idx, change) in changes {
            let node = &mut nodes[idx];
            match change {
                Reparent::Attach { group, relative } => {
                    debug!("attach {} -> {}", node.id, group);
                    node.parent = Some(group);
                    node.extent = Extent::BoundedToParent;
                    node.position = relative;
                }
                Reparent::Detach { absolute } => {
                    debug!("detach {}", node.id);
                    node.parent = None;
                    node.extent = Extent::Free;
                    node.position = absolute;
                }
            }
        }

        sort_parents_first(&mut nodes);
        nodes
    });
}
