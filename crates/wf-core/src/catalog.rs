//! Node-type catalog.
//!
//! The schema collaborator supplies, per node type tag, a default-data
//! template and a static handle layout. The core treats the payload as
//! opaque; only the handle layout and default geometry are interpreted
//! here. `instantiate` is the one operation whose failure (unknown tag)
//! must be distinguishable from success, so the host can surface it.

use crate::geometry::{Point, Size};
use crate::handles::{HandleClass, HandleDef, HandleSpec};
use crate::id::NodeId;
use crate::model::{DEFAULT_GROUP_SIZE, Node, NodeType};
use serde_json::{Map, Value, json};
use smallvec::{SmallVec, smallvec};

/// Per-type creation template.
#[derive(Debug, Clone)]
pub struct NodeTemplate {
    pub node_type: NodeType,
    pub default_size: Option<Size>,
    pub default_data: Map<String, Value>,
    pub handles: SmallVec<[HandleDef; 6]>,
}

/// The set of known node templates, keyed by type tag.
#[derive(Debug, Clone)]
pub struct Catalog {
    templates: Vec<NodeTemplate>,
}

impl Catalog {
    /// The built-in templates for the five palette types.
    pub fn builtin() -> Self {
        let source = |s: &str| HandleSpec {
            output_source: Some(s.to_string()),
            ..Default::default()
        };
        let typed_source = |s: &str, t: &str| HandleSpec {
            output_source: Some(s.to_string()),
            output_type: Some(t.to_string()),
            ..Default::default()
        };
        let accepts_source = |s: &str| HandleSpec {
            accepted_sources: Some(vec![s.to_string()]),
            ..Default::default()
        };
        let link = HandleSpec {
            class: HandleClass::Link,
            ..Default::default()
        };

        let templates = vec![
            NodeTemplate {
                node_type: NodeType::Agent,
                default_size: None,
                default_data: obj(json!({
                    "name": "Agent",
                    "model": "",
                    "instructions": "",
                })),
                handles: smallvec![
                    // Generic placeholder the router resolves to a
                    // concrete sub-handle by source classification.
                    HandleDef::input("input", HandleSpec::default()),
                    HandleDef::input("prompt-input", accepts_source("prompt")),
                    HandleDef::input("tools-input", accepts_source("tool")),
                    HandleDef::input("data-input", HandleSpec::default()),
                    HandleDef::output("output", source("agent")),
                    HandleDef::output("response", typed_source("agent", "message")),
                    HandleDef::output("context", typed_source("agent", "context")),
                ],
            },
            NodeTemplate {
                node_type: NodeType::Prompt,
                default_size: None,
                default_data: obj(json!({ "template": "" })),
                handles: smallvec![
                    HandleDef::output("output", source("prompt")),
                    HandleDef::output("text", typed_source("prompt", "string")),
                ],
            },
            NodeTemplate {
                node_type: NodeType::Tool,
                default_size: None,
                default_data: obj(json!({ "tool_name": "", "parameters": {} })),
                handles: smallvec![
                    HandleDef::output("output", source("tool")),
                    HandleDef::output("definition", typed_source("tool", "schema")),
                ],
            },
            NodeTemplate {
                node_type: NodeType::Group,
                default_size: Some(DEFAULT_GROUP_SIZE),
                default_data: obj(json!({ "label": "Group" })),
                handles: smallvec![],
            },
            NodeTemplate {
                node_type: NodeType::Connector,
                default_size: None,
                default_data: obj(json!({ "channel": "" })),
                handles: smallvec![
                    HandleDef::input("in", HandleSpec::default()),
                    HandleDef::output("out", source("connector")),
                    // Teleporter pairing: link handles only connect to
                    // other link handles.
                    HandleDef::output("link", link.clone()),
                ],
            },
        ];

        Self { templates }
    }

    pub fn template(&self, tag: &str) -> Option<&NodeTemplate> {
        self.templates.iter().find(|t| t.node_type.tag() == tag)
    }

    /// Create a node of the given type at `position`, with a fresh
    /// prefix-preserving id and the template's default payload.
    /// Fails on an unknown tag, leaving the caller's graph untouched.
    pub fn instantiate(&self, tag: &str, position: Point) -> Result<Node, String> {
        let template = self
            .template(tag)
            .ok_or_else(|| format!("unknown node type: {tag}"))?;
        let mut node = Node::new(NodeId::fresh(tag), template.node_type, position);
        node.size = template.default_size;
        node.data = template.default_data.clone();
        Ok(node)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn obj(v: Value) -> Map<String, Value> {
    match v {
        Value::Object(m) => m,
        _ => Map::new(),
    }
}
