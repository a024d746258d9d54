//! Subcircuit definition extraction and one-level flattening.

use std::collections::HashMap;

use log::warn;

use netgraph_core::ComponentInstance;

use crate::error::{Error, Result};
use crate::scope::{ResolutionMode, Resolver};
use crate::statement::{parse_statement, PortMap};

/// Marker opening the structural region of a netlist.
pub const TOPOLOGY_MARKER: &str = "*--- TOPOLOGY ---*";

/// Marker opening the testbench region, ending the structural region.
pub const TESTBENCH_MARKER: &str = "*--- TESTBENCH ---*";

/// Which top-level statements the flattener considers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegionFilter {
    /// Every top-level statement.
    #[default]
    All,
    /// Only statements between the topology and testbench markers,
    /// excluding measurement and bias circuitry from the structural graph.
    TopologyOnly,
}

/// A named subcircuit template: formal ports plus the unparsed body text.
/// Immutable once extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubcircuitDefinition {
    pub name: String,
    pub ports: Vec<String>,
    pub body: String,
}

/// Extract all `subckt NAME PORT...` / `ends NAME` blocks.
///
/// Only one level of hierarchy is supported: a `subckt` line inside a
/// body is kept as body text, and a block closes only on an `ends` line
/// naming the open definition.
pub fn extract_definitions(text: &str) -> HashMap<String, SubcircuitDefinition> {
    split_blocks(text).1
}

/// Flatten the top-level statements of a netlist into primitive
/// components, expanding subcircuit instantiations one level deep.
///
/// Body statements that are themselves instantiations are not expanded
/// further; this is a documented scope limit, not an oversight.
pub fn flatten(
    text: &str,
    definitions: &HashMap<String, SubcircuitDefinition>,
    resolver: &Resolver<'_>,
    region: RegionFilter,
) -> Result<Vec<ComponentInstance>> {
    let (top_lines, _) = split_blocks(text);
    let empty_ports = PortMap::new();
    let mut components = Vec::new();
    let mut in_region = region == RegionFilter::All;

    for line in top_lines {
        let line = line.trim();

        if region == RegionFilter::TopologyOnly {
            if line.contains(TOPOLOGY_MARKER) {
                in_region = true;
                continue;
            }
            if line.contains(TESTBENCH_MARKER) {
                in_region = false;
                continue;
            }
            if !in_region {
                continue;
            }
        }

        if line.is_empty() || is_directive(line) {
            continue;
        }

        if line.starts_with('x') {
            expand_instantiation(line, definitions, resolver, &mut components)?;
        } else if let Some(c) = parse_statement(line, &empty_ports, resolver, None)? {
            components.push(c);
        }
    }

    Ok(components)
}

/// Expand one `x<instance> <port-args...> <subckt-name>` statement.
fn expand_instantiation(
    line: &str,
    definitions: &HashMap<String, SubcircuitDefinition>,
    resolver: &Resolver<'_>,
    components: &mut Vec<ComponentInstance>,
) -> Result<()> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 3 {
        return Ok(());
    }

    // The leading `x` sigil is not part of the instance name.
    let instance = &parts[0][1..];
    if instance.is_empty() {
        return Ok(());
    }
    let subckt_name = parts[parts.len() - 1];
    let args = &parts[1..parts.len() - 1];

    let Some(def) = definitions.get(subckt_name) else {
        match resolver.mode() {
            ResolutionMode::Lenient => {
                warn!("instance {instance} references unknown subcircuit {subckt_name}; skipped");
                return Ok(());
            }
            ResolutionMode::Strict => {
                return Err(Error::UnknownSubcircuit {
                    instance: instance.to_string(),
                    name: subckt_name.to_string(),
                });
            }
        }
    };

    // Positional binding: formal port name -> actual net argument.
    let port_map: PortMap = def
        .ports
        .iter()
        .cloned()
        .zip(args.iter().map(|a| (*a).to_string()))
        .collect();

    for body_line in def.body.lines() {
        let body_line = body_line.trim();
        if body_line.is_empty() || body_line.starts_with('*') || body_line.starts_with('.') {
            continue;
        }
        if let Some(c) = parse_statement(body_line, &port_map, resolver, Some(instance))? {
            components.push(c);
        }
    }

    Ok(())
}

/// Directive and comment lines invisible to the flattener.
fn is_directive(line: &str) -> bool {
    line.starts_with('*')
        || line.starts_with("simulator")
        || line.starts_with("global")
        || line.starts_with("parameters")
        || line.starts_with("include")
}

/// Split the text into top-level lines and subcircuit definitions.
fn split_blocks(text: &str) -> (Vec<&str>, HashMap<String, SubcircuitDefinition>) {
    let mut top_lines = Vec::new();
    let mut definitions = HashMap::new();
    let mut open: Option<(String, Vec<String>, Vec<&str>)> = None;

    for line in text.lines() {
        let trimmed = line.trim();

        if let Some((name, ports, mut body)) = open.take() {
            let closes = trimmed
                .strip_prefix("ends")
                .and_then(|rest| rest.split_whitespace().next())
                .is_some_and(|n| n == name);
            if closes {
                definitions.insert(
                    name.clone(),
                    SubcircuitDefinition {
                        name,
                        ports,
                        body: body.join("\n"),
                    },
                );
            } else {
                body.push(line);
                open = Some((name, ports, body));
            }
            continue;
        }

        if let Some(rest) = trimmed.strip_prefix("subckt") {
            if rest.starts_with(char::is_whitespace) {
                let mut tokens = rest.split_whitespace();
                if let Some(name) = tokens.next() {
                    let ports: Vec<String> = tokens.map(str::to_string).collect();
                    open = Some((name.to_string(), ports, Vec::new()));
                    continue;
                }
            }
        }
        top_lines.push(line);
    }

    if let Some((name, _, _)) = open {
        warn!("unterminated subcircuit definition: {name}");
    }

    (top_lines, definitions)
}
