//! Bipartite component/net graph assembly.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::classify::{classify_net, NetClass};
use crate::component::{ComponentInstance, TerminalRole};

/// Default ambient temperature in Celsius when the scope carries no `tempc`.
const DEFAULT_TEMPC: f64 = 27.0;

/// A net node with its derived classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Net {
    pub name: String,
    pub class: NetClass,
}

/// One component-terminal-to-net connection.
///
/// Indices refer into the graph's component and net lists. The graph is
/// logically undirected; this is the canonical component-to-net view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub component: usize,
    pub net: usize,
    pub role: TerminalRole,
}

/// Global graph metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Ambient temperature in Celsius (scope key `tempc`).
    pub tempc: f64,
    /// Transistor count declared in the scope (key `fet_num`).
    pub fet_count: u32,
    /// Identifier of the source netlist, typically its file name.
    pub source: String,
    /// Externally supplied performance specs, passed through unmodified.
    pub perf_specs: BTreeMap<String, f64>,
}

/// Caller-supplied metadata that does not come from the parameter scope.
#[derive(Debug, Clone, Default)]
pub struct MetadataExtras {
    pub source: String,
    pub perf_specs: BTreeMap<String, f64>,
}

/// Bipartite graph of component and net nodes with role-labeled edges.
///
/// Immutable after construction except for [`Graph::assign_pair_ids`],
/// which only annotates components and never alters topology.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    nets: Vec<Net>,
    components: Vec<ComponentInstance>,
    /// Pair annotations parallel to `components`; all `None` until the
    /// pairing pass runs.
    pair_ids: Vec<Option<u32>>,
    edges: Vec<Edge>,
    metadata: Metadata,
}

impl Graph {
    /// Assemble a graph from flattened components and the global scope.
    ///
    /// Net indices follow the sorted order of the distinct net names;
    /// component indices follow flattening-encounter order. One edge is
    /// emitted per terminal. Duplicate component names (possible only for
    /// malformed input) are disambiguated with a numeric suffix so that
    /// emitted names stay unique.
    pub fn build(
        components: Vec<ComponentInstance>,
        globals: &HashMap<String, f64>,
        extras: MetadataExtras,
    ) -> Graph {
        let mut components = components;
        dedupe_names(&mut components);

        let net_names: BTreeSet<&str> = components
            .iter()
            .flat_map(|c| c.terminals.iter().map(|t| t.net.as_str()))
            .collect();
        let nets: Vec<Net> = net_names
            .iter()
            .map(|name| Net {
                name: (*name).to_string(),
                class: classify_net(name),
            })
            .collect();
        let net_index: HashMap<&str, usize> = nets
            .iter()
            .enumerate()
            .map(|(i, n)| (n.name.as_str(), i))
            .collect();

        let mut edges = Vec::new();
        for (ci, comp) in components.iter().enumerate() {
            for term in &comp.terminals {
                edges.push(Edge {
                    component: ci,
                    net: net_index[term.net.as_str()],
                    role: term.role,
                });
            }
        }

        let metadata = Metadata {
            tempc: globals.get("tempc").copied().unwrap_or(DEFAULT_TEMPC),
            fet_count: globals.get("fet_num").map(|v| *v as u32).unwrap_or(0),
            source: extras.source,
            perf_specs: extras.perf_specs,
        };

        let pair_ids = vec![None; components.len()];
        Graph {
            nets,
            components,
            pair_ids,
            edges,
            metadata,
        }
    }

    /// Net nodes in index order.
    pub fn nets(&self) -> &[Net] {
        &self.nets
    }

    /// Component nodes in index order.
    pub fn components(&self) -> &[ComponentInstance] {
        &self.components
    }

    /// Edges in emission order (component-to-net view).
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Pair annotations parallel to [`Graph::components`].
    pub fn pair_ids(&self) -> &[Option<u32>] {
        &self.pair_ids
    }

    /// Per-net feature: the classification code.
    pub fn net_features(&self) -> Vec<f64> {
        self.nets.iter().map(|n| n.class.code() as f64).collect()
    }

    /// Per-component feature vector: type code plus the five sizing fields.
    pub fn component_features(&self) -> Vec<[f64; 6]> {
        self.components
            .iter()
            .map(|c| {
                [
                    c.ctype.code() as f64,
                    c.sizing.length,
                    c.sizing.width,
                    c.sizing.resistance,
                    c.sizing.capacitance,
                    c.sizing.dc,
                ]
            })
            .collect()
    }

    /// The inverse net-to-component edge view, derived from the canonical
    /// edges on demand. Never stored or mutated independently.
    pub fn edges_net_to_component(
        &self,
    ) -> impl Iterator<Item = (usize, usize, TerminalRole)> + '_ {
        self.edges.iter().map(|e| (e.net, e.component, e.role))
    }

    /// Group components whose (type code, raw-parameter set) signature is
    /// identical and annotate each with a pair identifier, assigned in
    /// first-seen order starting at 1. Topology is untouched.
    ///
    /// Components with an empty raw-parameter set share one vacuous
    /// signature per type.
    pub fn assign_pair_ids(&mut self) {
        let mut seen: HashMap<(u32, &BTreeMap<String, String>), u32> = HashMap::new();
        for (i, comp) in self.components.iter().enumerate() {
            let sig = (comp.ctype.code(), &comp.sizing.raw_params);
            let next = seen.len() as u32 + 1;
            let id = *seen.entry(sig).or_insert(next);
            self.pair_ids[i] = Some(id);
        }
    }
}

/// Append `_2`, `_3`, ... to repeated component names.
fn dedupe_names(components: &mut [ComponentInstance]) {
    let mut seen: HashSet<String> = HashSet::new();
    for comp in components.iter_mut() {
        if !seen.insert(comp.name.clone()) {
            let mut n = 2;
            let mut candidate = format!("{}_{}", comp.name, n);
            while seen.contains(&candidate) {
                n += 1;
                candidate = format!("{}_{}", comp.name, n);
            }
            comp.name = candidate;
            seen.insert(comp.name.clone());
        }
    }
}
