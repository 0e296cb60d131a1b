//! History manager: bounded undo/redo over full graph snapshots.
//!
//! The snapshot contract is *before*: callers push the pre-mutation state
//! (delete, cut, paste, group-delete) and then mutate. Undo swaps the live
//! graph with the popped entry; redo is symmetric. Entries are immutable
//! `GraphSnapshot`s, never patched in place.
//!
//! Change notification works on a content fingerprint that strips the
//! transient per-node flags (`selected`, `dragging`) before hashing, so a
//! selection-only change is never reported as a content change.

use crate::store::GraphStore;
use log::debug;
use std::hash::{DefaultHasher, Hash, Hasher};
use wf_core::model::GraphSnapshot;

/// Default undo depth; the oldest entry is evicted beyond this.
pub const DEFAULT_HISTORY_DEPTH: usize = 50;

pub struct History {
    undo_stack: Vec<GraphSnapshot>,
    redo_stack: Vec<GraphSnapshot>,
    max_depth: usize,
    last_fingerprint: Option<u64>,
    on_content_change: Option<Box<dyn FnMut(&GraphSnapshot)>>,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_DEPTH)
    }
}

impl History {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: Vec::with_capacity(max_depth),
            redo_stack: Vec::new(),
            max_depth,
            last_fingerprint: None,
            on_content_change: None,
        }
    }

    /// Register the external observer notified on content changes.
    pub fn set_on_content_change(&mut self, callback: impl FnMut(&GraphSnapshot) + 'static) {
        self.on_content_change = Some(Box::new(callback));
    }

    /// Push the *current* state onto the undo stack, immediately before
    /// a destructive mutation. Starts a fresh redo future.
    pub fn save_snapshot(&mut self, store: &GraphStore) {
        self.record(store.snapshot());
    }

    /// Push an already-captured pre-mutation snapshot. Useful when the
    /// caller only knows after the fact that a mutation landed.
    pub fn record(&mut self, snapshot: GraphSnapshot) {
        self.undo_stack.push(snapshot);
        if self.undo_stack.len() > self.max_depth {
            self.undo_stack.remove(0);
        }
        self.redo_stack.clear();
    }

    /// Swap the live graph with the newest undo entry. No-op when the
    /// stack is exhausted.
    pub fn undo(&mut self, store: &mut GraphStore) -> bool {
        let Some(entry) = self.undo_stack.pop() else {
            return false;
        };
        self.redo_stack.push(store.snapshot());
        store.restore(entry);
        debug!("undo ({} entries left)", self.undo_stack.len());
        true
    }

    /// Symmetric to `undo`, consuming the redo stack.
    pub fn redo(&mut self, store: &mut GraphStore) -> bool {
        let Some(entry) = self.redo_stack.pop() else {
            return false;
        };
        self.undo_stack.push(store.snapshot());
        store.restore(entry);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Compare the store's content fingerprint with the last notified one
    /// and fire the observer when it moved. Returns whether it fired.
    pub fn notify_content_change(&mut self, store: &GraphStore) -> bool {
        let stripped = strip_transient_flags(store.snapshot());
        let fp = fingerprint(&stripped);
        if self.last_fingerprint == Some(fp) {
            return false;
        }
        self.last_fingerprint = Some(fp);
        if let Some(callback) = &mut self.on_content_change {
            callback(&stripped);
        }
        true
    }
}

fn strip_transient_flags(mut snapshot: GraphSnapshot) -> GraphSnapshot {
    for node in &mut snapshot.nodes {
        node.selected = false;
        node.dragging = false;
    }
    for edge in &mut snapshot.edges {
        edge.selected = false;
    }
    snapshot
}

fn fingerprint(snapshot: &GraphSnapshot) -> u64 {
    // Deterministic within a process: serialize the stripped snapshot and
    // hash the bytes.
    let json = serde_json::to_string(snapshot).unwrap_or_default();
    let mut hasher = DefaultHasher::new();
    json.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;
    use wf_core::catalog::Catalog;
    use wf_core::geometry::Point;

    fn store() -> GraphStore {
        GraphStore::new(Catalog::builtin())
    }

    #[test]
    fn undo_beyond_bounds_is_a_noop() {
        let mut s = store();
        let mut h = History::default();
        assert!(!h.undo(&mut s));
        assert!(!h.redo(&mut s));
    }

    #[test]
    fn history_bound_evicts_oldest() {
        let mut s = store();
        let mut h = History::new(DEFAULT_HISTORY_DEPTH);

        for i in 0..(DEFAULT_HISTORY_DEPTH + 5) {
            h.save_snapshot(&s);
            s.spawn("prompt", Point::new(i as f32, 0.0)).unwrap();
        }

        let mut steps = 0;
        while h.undo(&mut s) {
            steps += 1;
        }
        assert_eq!(steps, DEFAULT_HISTORY_DEPTH);
        // 55 spawns, 50 undone
        assert_eq!(s.nodes().len(), 5);
    }

    #[test]
    fn new_snapshot_clears_redo() {
        let mut s = store();
        let mut h = History::default();

        h.save_snapshot(&s);
        s.spawn("agent", Point::default()).unwrap();
        h.undo(&mut s);
        assert!(h.can_redo());

        h.save_snapshot(&s);
        assert!(!h.can_redo());
    }

    #[test]
    fn selection_only_changes_do_not_notify() {
        let mut s = store();
        let id = s.spawn("agent", Point::default()).unwrap();

        let fired = Rc::new(Cell::new(0));
        let counter = fired.clone();
        let mut h = History::default();
        h.set_on_content_change(move |_| counter.set(counter.get() + 1));

        assert!(h.notify_content_change(&s)); // baseline
        assert_eq!(fired.get(), 1);

        s.set_nodes(|mut nodes| {
            for n in &mut nodes {
                n.selected = true;
                n.dragging = true;
            }
            nodes
        });
        assert!(!h.notify_content_change(&s));
        assert_eq!(fired.get(), 1);

        s.set_nodes(|mut nodes| {
            if let Some(n) = nodes.iter_mut().find(|n| n.id == id) {
                n.position = Point::new(42.0, 0.0);
            }
            nodes
        });
        assert!(h.notify_content_change(&s));
        assert_eq!(fired.get(), 2);
    }

    #[test]
    fn data_changes_notify() {
        let mut s = store();
        let id = s.spawn("prompt", Point::default()).unwrap();
        let mut h = History::default();
        h.notify_content_change(&s);

        s.set_nodes(|mut nodes| {
            if let Some(n) = nodes.iter_mut().find(|n| n.id == id) {
                n.data
                    .insert("template".into(), "You are a helpful agent.".into());
            }
            nodes
        });
        assert!(h.notify_content_change(&s));
    }
}
