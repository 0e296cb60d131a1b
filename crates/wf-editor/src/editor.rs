//! Editor facade.
//!
//! Owns the graph store, history, clipboard and the canvas transform, and
//! wires the interaction entry points hosts call from their event loops:
//! pointer tracking, drag lifecycle, connect, clipboard, deletion and
//! undo/redo. Every mutating entry point runs the change-notification
//! check afterwards so the host's dirty flag stays accurate.

use crate::clipboard::Clipboard;
use crate::connect::{self, Connection};
use crate::deletion::{self, DeleteOutcome, GroupDeleteMode};
use crate::history::History;
use crate::parenting::reparent_dropped;
use crate::shortcuts::ShortcutAction;
use crate::store::GraphStore;
use log::debug;
use wf_core::catalog::Catalog;
use wf_core::document::Document;
use wf_core::geometry::{CanvasTransform, Point, Viewport};
use wf_core::id::NodeId;

pub struct Editor {
    pub store: GraphStore,
    pub history: History,
    pub clipboard: Clipboard,
    pub transform: CanvasTransform,
    /// Last pointer position in *screen* coordinates; paste anchors here.
    last_pointer: Option<Point>,
    /// Identifies this canvas for cross-tab clipboard bookkeeping.
    tab: String,
}

impl Editor {
    pub fn new(catalog: Catalog, tab: impl Into<String>) -> Self {
        Self {
            store: GraphStore::new(catalog),
            history: History::default(),
            clipboard: Clipboard::default(),
            transform: CanvasTransform::default(),
            last_pointer: None,
            tab: tab.into(),
        }
    }

    pub fn tab(&self) -> &str {
        &self.tab
    }

    /// Pointer position in canvas coordinates, if the pointer has been
    /// seen at all.
    pub fn pointer_canvas(&self) -> Option<Point> {
        self.last_pointer.map(|p| self.transform.screen_to_canvas(p))
    }

    // ─── Interaction entry points ───────────────────────────────────────

    pub fn pointer_moved(&mut self, screen: Point) {
        self.last_pointer = Some(screen);
    }

    /// Spawn a node from a catalog template, undoably.
    pub fn create_node(&mut self, tag: &str, position: Point) -> Result<NodeId, String> {
        let before = self.store.snapshot();
        let id = self.store.spawn(tag, position)?;
        self.history.record(before);
        self.history.notify_content_change(&self.store);
        Ok(id)
    }

    /// Call when a node drag begins, before the host mutates positions.
    pub fn drag_started(&mut self) {
        self.history.save_snapshot(&self.store);
        self.store.set_nodes(|mut nodes| {
            for n in &mut nodes {
                if n.selected {
                    n.dragging = true;
                }
            }
            nodes
        });
    }

    /// Call when the drag ends. Runs auto-parenting over the dragged
    /// nodes and clears the transient drag flags.
    pub fn drag_stopped(&mut self, dragged: &[NodeId]) {
        reparent_dropped(&mut self.store, dragged);
        self.store.set_nodes(|mut nodes| {
            for n in &mut nodes {
                n.dragging = false;
            }
            nodes
        });
        self.history.notify_content_change(&self.store);
    }

    /// Validate and materialize a connection. Returns the new edge id.
    pub fn connect(&mut self, candidate: Connection) -> Option<NodeId> {
        let before = self.store.snapshot();
        let id = connect::connect(&mut self.store, candidate)?;
        self.history.record(before);
        self.history.notify_content_change(&self.store);
        Some(id)
    }

    pub fn is_valid_connection(&self, candidate: &Connection) -> bool {
        connect::is_valid_connection(&self.store, candidate)
    }

    // ─── Clipboard ──────────────────────────────────────────────────────

    pub fn copy(&mut self) -> usize {
        let tab = self.tab.clone();
        self.clipboard.copy(&self.store, &tab)
    }

    pub fn cut(&mut self) {
        let tab = self.tab.clone();
        self.clipboard.cut(&mut self.store, &mut self.history, &tab);
        self.history.notify_content_change(&self.store);
    }

    /// Paste at an explicit canvas position, or at the pointer, or at a
    /// fixed offset from the copied material when neither is known.
    pub fn paste(&mut self, position: Option<Point>) -> Vec<NodeId> {
        let pointer = self.pointer_canvas();
        let pasted = self
            .clipboard
            .paste(&mut self.store, &mut self.history, position, pointer);
        self.history.notify_content_change(&self.store);
        pasted
    }

    // ─── Deletion ───────────────────────────────────────────────────────

    pub fn delete(&mut self) -> DeleteOutcome {
        let outcome = deletion::delete_selection(&mut self.store, &mut self.history);
        self.history.notify_content_change(&self.store);
        outcome
    }

    /// Apply the user's answer to a `PendingGroupDecision`.
    pub fn resolve_group_delete(&mut self, mode: GroupDeleteMode) {
        deletion::delete_groups(&mut self.store, &mut self.history, mode);
        self.history.notify_content_change(&self.store);
    }

    // ─── History ────────────────────────────────────────────────────────

    pub fn undo(&mut self) -> bool {
        let moved = self.history.undo(&mut self.store);
        if moved {
            self.history.notify_content_change(&self.store);
        }
        moved
    }

    pub fn redo(&mut self) -> bool {
        let moved = self.history.redo(&mut self.store);
        if moved {
            self.history.notify_content_change(&self.store);
        }
        moved
    }

    // ─── Selection and lock ─────────────────────────────────────────────

    pub fn select_all(&mut self) {
        self.store.set_nodes(|mut nodes| {
            for n in &mut nodes {
                n.selected = true;
            }
            nodes
        });
        self.store.set_edges(|mut edges| {
            for e in &mut edges {
                e.selected = true;
            }
            edges
        });
    }

    pub fn deselect(&mut self) {
        self.store.deselect_all();
    }

    pub fn toggle_lock(&mut self) {
        self.store.locked = !self.store.locked;
        debug!("canvas locked: {}", self.store.locked);
    }

    /// Dispatch a resolved shortcut. Returns whether it was handled.
    pub fn apply_shortcut(&mut self, action: ShortcutAction) -> bool {
        match action {
            ShortcutAction::Undo => self.undo(),
            ShortcutAction::Redo => self.redo(),
            ShortcutAction::Delete => self.delete() != DeleteOutcome::Noop,
            ShortcutAction::SelectAll => {
                self.select_all();
                true
            }
            ShortcutAction::Copy => self.copy() > 0,
            ShortcutAction::Cut => {
                self.cut();
                true
            }
            ShortcutAction::Paste => !self.paste(None).is_empty(),
            ShortcutAction::ToggleLock => {
                self.toggle_lock();
                true
            }
            ShortcutAction::Deselect => {
                self.deselect();
                true
            }
        }
    }

    // ─── Persistence ────────────────────────────────────────────────────

    /// Serialize the live graph and view state.
    pub fn save_document(&self) -> Result<Vec<u8>, String> {
        let viewport = Viewport {
            x: self.transform.offset.x,
            y: self.transform.offset.y,
            zoom: self.transform.zoom,
        };
        Document::from_parts(self.store.nodes().to_vec(), self.store.edges().to_vec(), viewport)
            .encode()
    }

    /// Replace the live graph with a decoded document. Ordering is
    /// normalized and the handle registry re-derived on the way in.
    pub fn load_document(&mut self, bytes: &[u8]) -> Result<(), String> {
        let doc = Document::decode(bytes)?;
        self.transform = CanvasTransform {
            offset: Point::new(doc.viewport.x, doc.viewport.y),
            zoom: doc.viewport.zoom,
        };
        self.store.restore(wf_core::model::GraphSnapshot {
            nodes: doc.nodes,
            edges: doc.edges,
        });
        self.history = History::default();
        self.history.notify_content_change(&self.store);
        Ok(())
    }
}
