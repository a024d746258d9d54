//! Core circuit-graph representation for netgraph.
//!
//! This crate provides the data model shared by the netlist parser and the
//! exchange-format exporter: primitive component types, terminal roles,
//! net classification, and the bipartite component/net graph itself.

pub mod classify;
pub mod component;
pub mod error;
pub mod graph;
pub mod units;

pub use classify::{classify_net, NetClass};
pub use component::{ComponentInstance, ComponentType, Sizing, Terminal, TerminalRole};
pub use error::{Error, Result};
pub use graph::{Edge, Graph, Metadata, MetadataExtras, Net};
