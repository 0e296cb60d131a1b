//! Core data model for workflow diagrams.
//!
//! The document is a flat, *ordered* node collection plus an edge
//! collection. Group containment is a weak `parent` reference layered on
//! top, not a nested structure, with depth capped at one level.
//! The ordering invariant is load-bearing: a node with a `parent` must
//! appear after that parent in the collection.

use crate::geometry::{Point, Size, to_absolute};
use crate::id::NodeId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ─── Defaults ────────────────────────────────────────────────────────────

/// Fallback dimensions for a node that has not been measured yet.
pub const DEFAULT_NODE_SIZE: Size = Size::new(200.0, 100.0);

/// Default bounding box of a group container.
pub const DEFAULT_GROUP_SIZE: Size = Size::new(300.0, 200.0);

/// Minimum inset of a child inside its group; y clears the group header.
pub const GROUP_INSET_X: f32 = 10.0;
pub const GROUP_INSET_Y: f32 = 40.0;

// ─── Node ────────────────────────────────────────────────────────────────

/// The node kinds placed from the palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Agent,
    Prompt,
    Tool,
    Group,
    Connector,
}

impl NodeType {
    pub fn tag(&self) -> &'static str {
        match self {
            NodeType::Agent => "agent",
            NodeType::Prompt => "prompt",
            NodeType::Tool => "tool",
            NodeType::Group => "group",
            NodeType::Connector => "connector",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "agent" => Some(NodeType::Agent),
            "prompt" => Some(NodeType::Prompt),
            "tool" => Some(NodeType::Tool),
            "group" => Some(NodeType::Group),
            "connector" => Some(NodeType::Connector),
            _ => None,
        }
    }
}

/// How a node's `position` is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Extent {
    /// Position is absolute, even when `parent` is set (a temporarily
    /// expanded child that visually escapes its group).
    #[default]
    Free,
    /// Position is relative to the parent group's origin.
    BoundedToParent,
}

/// A single node on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub node_type: NodeType,

    /// Relative to the parent when `extent == BoundedToParent`, absolute
    /// otherwise.
    pub position: Point,

    /// Weak containment reference: the parent group, if any. The parent
    /// must precede this node in the collection order.
    #[serde(default)]
    pub parent: Option<NodeId>,

    #[serde(default)]
    pub extent: Extent,

    /// Measured dimensions; `None` until the host has measured the node.
    #[serde(default)]
    pub size: Option<Size>,

    /// Transient UI flags, stripped before content fingerprinting.
    #[serde(default)]
    pub selected: bool,
    #[serde(default)]
    pub dragging: bool,

    /// A node flagged non-deletable survives delete operations.
    #[serde(default = "default_true")]
    pub deletable: bool,

    /// Opaque per-node payload (template defaults, user edits).
    #[serde(default)]
    pub data: Map<String, Value>,
}

fn default_true() -> bool {
    true
}

impl Node {
    pub fn new(id: NodeId, node_type: NodeType, position: Point) -> Self {
        Self {
            id,
            node_type,
            position,
            parent: None,
            extent: Extent::Free,
            size: None,
            selected: false,
            dragging: false,
            deletable: true,
            data: Map::new(),
        }
    }

    pub fn is_group(&self) -> bool {
        self.node_type == NodeType::Group
    }

    /// Measured size, falling back to the type's default dimensions.
    pub fn size_or_default(&self) -> Size {
        self.size.unwrap_or(if self.is_group() {
            DEFAULT_GROUP_SIZE
        } else {
            DEFAULT_NODE_SIZE
        })
    }
}

// ─── Edge ────────────────────────────────────────────────────────────────

/// Distinguishes data-flow connections from `Link`-class relations
/// between same-category nodes. Link edges render dashed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    #[default]
    Data,
    Link,
}

impl EdgeKind {
    pub fn is_dashed(&self) -> bool {
        matches!(self, EdgeKind::Link)
    }
}

/// A directed handle-to-handle connection between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: NodeId,
    pub source: NodeId,
    pub source_handle: String,
    pub target: NodeId,
    pub target_handle: String,
    #[serde(default)]
    pub kind: EdgeKind,
    #[serde(default)]
    pub selected: bool,
}

impl Edge {
    pub fn new(
        source: NodeId,
        source_handle: impl Into<String>,
        target: NodeId,
        target_handle: impl Into<String>,
    ) -> Self {
        Self {
            id: NodeId::fresh("edge"),
            source,
            source_handle: source_handle.into(),
            target,
            target_handle: target_handle.into(),
            kind: EdgeKind::Data,
            selected: false,
        }
    }

    /// True if either endpoint references `node`.
    pub fn touches(&self, node: NodeId) -> bool {
        self.source == node || self.target == node
    }
}

// ─── Snapshot ────────────────────────────────────────────────────────────

/// An immutable full copy of the graph, the history entry shape and the
/// clipboard payload's base.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

// ─── Collection helpers ──────────────────────────────────────────────────

/// Look up a node by id.
pub fn find_node(nodes: &[Node], id: NodeId) -> Option<&Node> {
    nodes.iter().find(|n| n.id == id)
}

/// Absolute position of a node: one addition when bounded to a parent,
/// identity otherwise. A dangling parent reference degrades to the
/// stored position.
pub fn absolute_position(nodes: &[Node], node: &Node) -> Point {
    if node.extent != Extent::BoundedToParent {
        return node.position;
    }
    match node.parent.and_then(|pid| find_node(nodes, pid)) {
        Some(parent) => to_absolute(node.position, parent.position),
        None => node.position,
    }
}

/// Re-establish the ordering invariant: every parent precedes its
/// children. Stable sort keyed on "has parent" only; with containment
/// depth capped at 1, parentless nodes (all groups included) sort first
/// and relative order within each partition is preserved.
pub fn sort_parents_first(nodes: &mut [Node]) {
    nodes.sort_by_key(|n| n.parent.is_some());
}

/// Check the ordering invariant without mutating.
pub fn parents_precede_children(nodes: &[Node]) -> bool {
    nodes.iter().enumerate().all(|(i, n)| match n.parent {
        Some(pid) => nodes[..i].iter().any(|p| p.id == pid),
        None => true,
    })
}

/// Drop every edge with a missing endpoint.
pub fn prune_dangling_edges(nodes: &[Node], edges: &mut Vec<Edge>) {
    edges.retain(|e| {
        find_node(nodes, e.source).is_some() && find_node(nodes, e.target).is_some()
    });
}
