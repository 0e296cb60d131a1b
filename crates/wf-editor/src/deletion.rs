//! Deletion engine.
//!
//! Plain deletion removes the selected deletable nodes, the selected
//! edges, and anything left dangling. When a selected group owns
//! children the operation is deferred to a user decision: delete the
//! group shell only (children unparented in place) or cascade one level.

use crate::history::History;
use crate::store::GraphStore;
use log::debug;
use wf_core::geometry::to_absolute;
use wf_core::id::NodeId;
use wf_core::model::{Extent, Node, find_node};

/// Resolution of a group-with-children deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupDeleteMode {
    /// Remove the groups only; children stay, converted to absolute
    /// positions so they don't visually move.
    GroupOnly,
    /// Remove the groups and all their direct children.
    All,
}

/// What `delete_selection` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Nothing deletable was selected.
    Noop,
    /// Selection removed.
    Deleted,
    /// A selected group owns children; the host must ask the user and
    /// call `delete_groups` with the chosen mode. The graph is untouched.
    PendingGroupDecision { groups: Vec<NodeId> },
}

/// Delete the current selection, skipping non-deletable nodes. Defers to
/// a user decision when a selected deletable group owns children.
pub fn delete_selection(store: &mut GraphStore, history: &mut History) -> DeleteOutcome {
    let doomed: Vec<NodeId> = store
        .nodes()
        .iter()
        .filter(|n| n.selected && n.deletable)
        .map(|n| n.id)
        .collect();
    let selected_edges: Vec<NodeId> = store
        .edges()
        .iter()
        .filter(|e| e.selected)
        .map(|e| e.id)
        .collect();
    if doomed.is_empty() && selected_edges.is_empty() {
        return DeleteOutcome::Noop;
    }

    let groups_with_children: Vec<NodeId> = doomed
        .iter()
        .copied()
        .filter(|&id| {
            store.node(id).is_some_and(Node::is_group)
                && store.nodes().iter().any(|n| n.parent == Some(id))
        })
        .collect();
    if !groups_with_children.is_empty() {
        return DeleteOutcome::PendingGroupDecision {
            groups: groups_with_children,
        };
    }

    history.save_snapshot(store);
    debug!("delete {} nodes / {} edges", doomed.len(), selected_edges.len());
    store.set_nodes(|mut nodes| {
        nodes.retain(|n| !doomed.contains(&n.id));
        nodes
    });
    store.set_edges(|mut edges| {
        edges.retain(|e| {
            !selected_edges.contains(&e.id) && !doomed.iter().any(|&id| e.touches(id))
        });
        edges
    });
    DeleteOutcome::Deleted
}

/// Apply the user's group-deletion decision over the current selection.
/// No-op while the canvas is locked.
pub fn delete_groups(store: &mut GraphStore, history: &mut History, mode: GroupDeleteMode) {
    if store.locked {
        return;
    }
    let groups: Vec<NodeId> = store
        .nodes()
        .iter()
        .filter(|n| n.selected && n.deletable && n.is_group())
        .map(|n| n.id)
        .collect();
    if groups.is_empty() {
        return;
    }
    let others: Vec<NodeId> = store
        .nodes()
        .iter()
        .filter(|n| {
            n.selected
                && n.deletable
                && !n.is_group()
                && !n.parent.is_some_and(|p| groups.contains(&p))
        })
        .map(|n| n.id)
        .collect();

    history.save_snapshot(store);

    match mode {
        GroupDeleteMode::GroupOnly => {
            let removed: Vec<NodeId> = groups.iter().chain(others.iter()).copied().collect();
            store.set_nodes(|mut nodes| {
                // Unparent children first so they keep their place on
                // screen once the group's offset disappears.
                let group_positions: Vec<(NodeId, wf_core::geometry::Point)> = groups
                    .iter()
                    .filter_map(|&gid| find_node(&nodes, gid).map(|g| (gid, g.position)))
                    .collect();
                for n in &mut nodes {
                    if let Some(p) = n.parent
                        && groups.contains(&p)
                    {
                        if n.extent == Extent::BoundedToParent
                            && let Some(&(_, gpos)) =
                                group_positions.iter().find(|(gid, _)| *gid == p)
                        {
                            n.position = to_absolute(n.position, gpos);
                        }
                        n.parent = None;
                        n.extent = Extent::Free;
                    }
                }
                nodes.retain(|n| !removed.contains(&n.id));
                nodes
            });
            store.set_edges(|mut edges| {
                edges.retain(|e| !removed.iter().any(|&id| e.touches(id)));
                edges
            });
        }
        GroupDeleteMode::All => {
            let mut removed: Vec<NodeId> = groups.iter().chain(others.iter()).copied().collect();
            let children: Vec<NodeId> = store
                .nodes()
                .iter()
                .filter(|n| n.parent.is_some_and(|p| groups.contains(&p)))
                .map(|n| n.id)
                .collect();
            removed.extend(children);
            store.set_nodes(|mut nodes| {
                nodes.retain(|n| !removed.contains(&n.id));
                nodes
            });
            store.set_edges(|mut edges| {
                edges.retain(|e| !removed.iter().any(|&id| e.touches(id)));
                edges
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wf_core::catalog::Catalog;
    use wf_core::geometry::Point;

    fn store() -> GraphStore {
        GraphStore::new(Catalog::builtin())
    }

    fn select(store: &mut GraphStore, ids: &[NodeId]) {
        store.set_nodes(|mut nodes| {
            for n in &mut nodes {
                n.selected = ids.contains(&n.id);
            }
            nodes
        });
    }

    fn grouped_fixture(s: &mut GraphStore) -> (NodeId, NodeId, NodeId, NodeId) {
        let g = s.spawn("group", Point::new(100.0, 100.0)).unwrap();
        let c1 = s.spawn("tool", Point::new(10.0, 40.0)).unwrap();
        let c2 = s.spawn("prompt", Point::new(10.0, 120.0)).unwrap();
        let n = s.spawn("agent", Point::new(600.0, 0.0)).unwrap();
        s.set_nodes(|mut nodes| {
            for node in &mut nodes {
                if node.id == c1 || node.id == c2 {
                    node.parent = Some(g);
                    node.extent = Extent::BoundedToParent;
                }
            }
            nodes
        });
        (g, c1, c2, n)
    }

    #[test]
    fn plain_delete_removes_selection_and_dangling_edges() {
        let mut s = store();
        let p = s.spawn("prompt", Point::default()).unwrap();
        let a = s.spawn("agent", Point::default()).unwrap();
        s.set_edges(|mut edges| {
            edges.push(wf_core::model::Edge::new(p, "text", a, "prompt-input"));
            edges
        });
        select(&mut s, &[p]);

        let mut h = History::default();
        assert_eq!(delete_selection(&mut s, &mut h), DeleteOutcome::Deleted);
        assert!(s.node(p).is_none());
        assert!(s.edges().is_empty());
        assert!(h.can_undo());
    }

    #[test]
    fn non_deletable_nodes_survive() {
        let mut s = store();
        let a = s.spawn("agent", Point::default()).unwrap();
        s.set_nodes(|mut nodes| {
            nodes[0].deletable = false;
            nodes
        });
        select(&mut s, &[a]);

        let mut h = History::default();
        assert_eq!(delete_selection(&mut s, &mut h), DeleteOutcome::Noop);
        assert!(s.node(a).is_some());
        assert!(!h.can_undo());
    }

    #[test]
    fn group_with_children_defers_to_decision() {
        let mut s = store();
        let (g, c1, c2, n) = grouped_fixture(&mut s);
        select(&mut s, &[g, n]);

        let mut h = History::default();
        let outcome = delete_selection(&mut s, &mut h);
        assert_eq!(
            outcome,
            DeleteOutcome::PendingGroupDecision { groups: vec![g] }
        );
        // Graph untouched until the decision lands
        assert!(s.node(c1).is_some() && s.node(c2).is_some());
        assert!(!h.can_undo());
    }

    #[test]
    fn group_only_unparents_children_in_place() {
        let mut s = store();
        let (g, c1, c2, n) = grouped_fixture(&mut s);
        select(&mut s, &[g, n]);

        let mut h = History::default();
        delete_groups(&mut s, &mut h, GroupDeleteMode::GroupOnly);

        assert!(s.node(g).is_none());
        assert!(s.node(n).is_none());
        let child = s.node(c1).unwrap();
        assert_eq!(child.parent, None);
        assert_eq!(child.extent, Extent::Free);
        // child (10,40) + group (100,100), visually unchanged
        assert_eq!(child.position, Point::new(110.0, 140.0));
        assert_eq!(s.node(c2).unwrap().position, Point::new(110.0, 220.0));
    }

    #[test]
    fn cascade_removes_group_children_and_edges() {
        let mut s = store();
        let (g, c1, c2, n) = grouped_fixture(&mut s);
        let outside = s.spawn("agent", Point::new(900.0, 0.0)).unwrap();
        s.set_edges(|mut edges| {
            edges.push(wf_core::model::Edge::new(c2, "text", outside, "prompt-input"));
            edges
        });
        select(&mut s, &[g, n]);

        let mut h = History::default();
        delete_groups(&mut s, &mut h, GroupDeleteMode::All);

        for id in [g, c1, c2, n] {
            assert!(s.node(id).is_none());
        }
        assert!(s.node(outside).is_some());
        assert!(s.edges().is_empty());
    }

    #[test]
    fn locked_canvas_blocks_group_delete() {
        let mut s = store();
        let (g, ..) = grouped_fixture(&mut s);
        select(&mut s, &[g]);
        s.locked = true;

        let mut h = History::default();
        delete_groups(&mut s, &mut h, GroupDeleteMode::All);
        assert!(s.node(g).is_some());
    }
}
