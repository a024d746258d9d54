//! Netlist text front end for netgraph.
//!
//! Parses a SPICE-like netlist dialect into a flattened list of primitive
//! component instances plus the global parameter scope, ready for graph
//! assembly by `netgraph-core`.
//!
//! # Example
//!
//! ```
//! use netgraph_parser::{parse_netlist, ParseOptions};
//!
//! let parsed = parse_netlist(
//!     "parameters rload=1k\nR1 in out resistor r=rload\n",
//!     ParseOptions::default(),
//! )
//! .unwrap();
//!
//! assert_eq!(parsed.components.len(), 1);
//! assert_eq!(parsed.components[0].sizing.resistance, 1000.0);
//! ```

pub mod error;
pub mod scope;
pub mod statement;
pub mod subckt;

pub use error::{Error, Result};
pub use scope::{ParameterScope, ResolutionMode, Resolver};
pub use statement::{parse_statement, PortMap};
pub use subckt::{
    extract_definitions, flatten, RegionFilter, SubcircuitDefinition, TESTBENCH_MARKER,
    TOPOLOGY_MARKER,
};

use netgraph_core::ComponentInstance;

/// Options for a whole-netlist parse.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    pub mode: ResolutionMode,
    pub region: RegionFilter,
}

/// Result of parsing a netlist: flattened components plus the global scope.
#[derive(Debug)]
pub struct ParsedNetlist {
    /// Primitive components in flattening-encounter order.
    pub components: Vec<ComponentInstance>,
    /// Global parameter scope, also the source of graph metadata.
    pub scope: ParameterScope,
}

/// Parse a complete netlist text: extract the global scope and subcircuit
/// definitions, then flatten top-level statements into components.
pub fn parse_netlist(text: &str, options: ParseOptions) -> Result<ParsedNetlist> {
    let scope = ParameterScope::extract(text, options.mode)?;
    let definitions = subckt::extract_definitions(text);
    let resolver = scope.resolver(options.mode);
    let components = subckt::flatten(text, &definitions, &resolver, options.region)?;
    Ok(ParsedNetlist { components, scope })
}
