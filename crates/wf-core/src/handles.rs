//! Handle type registry.
//!
//! Every node exposes named attachment points (handles) whose type
//! descriptors drive connection validation. The registry is a derived
//! lookup, `(node id, handle id) → descriptor`, rebuilt from the node
//! collection and the catalog on every node-collection change, and never
//! persisted.

use crate::catalog::Catalog;
use crate::id::NodeId;
use crate::model::Node;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// `Link`-class handles carry non-data relations between same-category
/// nodes and may only connect to other `Link`-class handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleClass {
    #[default]
    Data,
    Link,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleDirection {
    Input,
    Output,
}

/// Per-handle type descriptor. An unset accepted set means "accept any";
/// an unset output classification only matches open targets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HandleSpec {
    pub output_source: Option<String>,
    pub output_type: Option<String>,
    pub accepted_sources: Option<Vec<String>>,
    pub accepted_types: Option<Vec<String>>,
    #[serde(default)]
    pub class: HandleClass,
}

impl HandleSpec {
    /// Membership test used by the connection validator: does this
    /// (target-side) spec accept an edge from `source`?
    pub fn accepts(&self, source: &HandleSpec) -> bool {
        let sources_ok = match &self.accepted_sources {
            None => true,
            Some(set) => source
                .output_source
                .as_deref()
                .is_some_and(|s| set.iter().any(|a| a == s)),
        };
        let types_ok = match &self.accepted_types {
            None => true,
            Some(set) => source
                .output_type
                .as_deref()
                .is_some_and(|t| set.iter().any(|a| a == t)),
        };
        sources_ok && types_ok
    }
}

/// Static handle declaration inside a node template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandleDef {
    pub id: String,
    pub direction: HandleDirection,
    pub spec: HandleSpec,
}

impl HandleDef {
    pub fn input(id: &str, spec: HandleSpec) -> Self {
        Self {
            id: id.to_string(),
            direction: HandleDirection::Input,
            spec,
        }
    }

    pub fn output(id: &str, spec: HandleSpec) -> Self {
        Self {
            id: id.to_string(),
            direction: HandleDirection::Output,
            spec,
        }
    }
}

/// A resolved registry entry.
#[derive(Debug, Clone, PartialEq)]
pub struct HandleEntry {
    pub direction: HandleDirection,
    pub spec: HandleSpec,
}

/// The generic placeholder ids routed by the connection router.
pub const GENERIC_INPUT: &str = "input";
pub const GENERIC_OUTPUT: &str = "output";

/// Derived lookup from `(node, handle)` to its type descriptor.
#[derive(Debug, Default)]
pub struct HandleRegistry {
    entries: HashMap<(NodeId, String), HandleEntry>,
}

impl HandleRegistry {
    /// Rebuild from the current node collection. Nodes whose type has no
    /// catalog template contribute nothing.
    pub fn rebuild(catalog: &Catalog, nodes: &[Node]) -> Self {
        let mut entries = HashMap::new();
        for node in nodes {
            let Some(template) = catalog.template(node.node_type.tag()) else {
                continue;
            };
            for def in &template.handles {
                entries.insert(
                    (node.id, def.id.clone()),
                    HandleEntry {
                        direction: def.direction,
                        spec: def.spec.clone(),
                    },
                );
            }
        }
        Self { entries }
    }

    pub fn get(&self, node: NodeId, handle: &str) -> Option<&HandleEntry> {
        self.entries.get(&(node, handle.to_string()))
    }

    /// Concrete (non-placeholder, non-link) output handles of a node, in
    /// no particular order.
    pub fn concrete_outputs(&self, node: NodeId) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|((nid, hid), entry)| {
                *nid == node
                    && entry.direction == HandleDirection::Output
                    && entry.spec.class == HandleClass::Data
                    && hid != GENERIC_OUTPUT
            })
            .map(|((_, hid), _)| hid.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    #[test]
    fn unset_accept_sets_accept_anything() {
        let open = HandleSpec::default();
        let typed = HandleSpec {
            output_source: Some("prompt".into()),
            output_type: Some("string".into()),
            ..Default::default()
        };
        assert!(open.accepts(&typed));
        assert!(open.accepts(&HandleSpec::default()));
    }

    #[test]
    fn restricted_target_rejects_unclassified_source() {
        let target = HandleSpec {
            accepted_sources: Some(vec!["tool".into()]),
            ..Default::default()
        };
        assert!(!target.accepts(&HandleSpec::default()));
        assert!(target.accepts(&HandleSpec {
            output_source: Some("tool".into()),
            ..Default::default()
        }));
        assert!(!target.accepts(&HandleSpec {
            output_source: Some("prompt".into()),
            ..Default::default()
        }));
    }

    #[test]
    fn registry_skips_unknown_types_and_lists_concrete_outputs() {
        let catalog = Catalog::builtin();
        let agent = catalog.instantiate("agent", Point::default()).unwrap();
        let prompt = catalog.instantiate("prompt", Point::default()).unwrap();
        let registry = HandleRegistry::rebuild(&catalog, &[agent.clone(), prompt.clone()]);

        assert!(registry.get(agent.id, "prompt-input").is_some());
        assert!(registry.get(agent.id, "no-such-handle").is_none());

        // Prompt exposes exactly one concrete output; the agent more.
        assert_eq!(registry.concrete_outputs(prompt.id), vec!["text"]);
        assert!(registry.concrete_outputs(agent.id).len() > 1);
    }
}
