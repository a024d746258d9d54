//! Exchange-format projection of circuit graphs.
//!
//! Projects a [`Graph`] into a plain JSON document consumed by
//! visualization and downstream tooling, and reads such documents back.
//! The projection is a pure function of the graph: every node and edge
//! appears exactly once, and nothing else is added.

pub mod error;

pub use error::{Error, Result};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use netgraph_core::{Graph, Metadata};

/// Node kind discriminator in the exchange document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    #[serde(rename = "COMPONENT")]
    Component,
    #[serde(rename = "NET")]
    Net,
}

/// One node entry. Components carry a subtype (the primitive keyword) and
/// an optional pair identifier; nets carry neither.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeEntry {
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pair_id: Option<u32>,
}

/// One edge entry: component id, net id, pin label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeEntry {
    pub source: String,
    pub target: String,
    pub pin: String,
}

/// The graph section of the exchange document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSection {
    pub directed: bool,
    pub nodes: BTreeMap<String, NodeEntry>,
    pub edges: Vec<EdgeEntry>,
}

/// The full exchange document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitDocument {
    pub topology_id: u32,
    /// Source netlist identifier, typically the file name.
    pub netlist: String,
    pub metadata: Metadata,
    pub graph: GraphSection,
}

impl CircuitDocument {
    /// Project a graph into its exchange document.
    pub fn from_graph(graph: &Graph) -> Self {
        let mut nodes = BTreeMap::new();

        for (i, comp) in graph.components().iter().enumerate() {
            nodes.insert(
                comp.name.clone(),
                NodeEntry {
                    kind: NodeKind::Component,
                    subtype: Some(comp.ctype.keyword().to_string()),
                    pair_id: graph.pair_ids()[i],
                },
            );
        }
        for net in graph.nets() {
            nodes.insert(
                net.name.clone(),
                NodeEntry {
                    kind: NodeKind::Net,
                    subtype: None,
                    pair_id: None,
                },
            );
        }

        let edges = graph
            .edges()
            .iter()
            .map(|e| EdgeEntry {
                source: graph.components()[e.component].name.clone(),
                target: graph.nets()[e.net].name.clone(),
                pin: e.role.pin_name().to_string(),
            })
            .collect();

        CircuitDocument {
            topology_id: 1,
            netlist: graph.metadata().source.clone(),
            metadata: graph.metadata().clone(),
            graph: GraphSection {
                directed: false,
                nodes,
                edges,
            },
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}
