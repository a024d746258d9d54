//! netgraph command-line interface.
//!
//! Reads a netlist file, converts it into a typed component/net graph,
//! and writes the exchange-format JSON document.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use netgraph_core::graph::{Graph, MetadataExtras};
use netgraph_export::CircuitDocument;
use netgraph_parser::{parse_netlist, ParseOptions, RegionFilter, ResolutionMode};

#[derive(Parser)]
#[command(name = "netgraph")]
#[command(about = "Convert analog netlists into typed circuit graphs", long_about = None)]
#[command(version)]
struct Cli {
    /// Input netlist file
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Write the JSON document here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// JSON object of numeric performance specs to attach to the metadata
    #[arg(long, value_name = "JSON")]
    specs: Option<String>,

    /// Only convert statements between the topology and testbench markers
    #[arg(long)]
    topology_only: bool,

    /// Fail on unresolved values or unknown subcircuit references
    #[arg(long)]
    strict: bool,

    /// Skip the pairing pass over structurally identical components
    #[arg(long)]
    no_pairs: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let content = fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read netlist: {}", cli.input.display()))?;

    let perf_specs = match &cli.specs {
        Some(text) => parse_specs(text)?,
        None => BTreeMap::new(),
    };

    let options = ParseOptions {
        mode: if cli.strict {
            ResolutionMode::Strict
        } else {
            ResolutionMode::Lenient
        },
        region: if cli.topology_only {
            RegionFilter::TopologyOnly
        } else {
            RegionFilter::All
        },
    };

    let parsed = parse_netlist(&content, options)
        .with_context(|| format!("failed to convert netlist: {}", cli.input.display()))?;

    let source = cli
        .input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| cli.input.display().to_string());

    let mut graph = Graph::build(
        parsed.components,
        parsed.scope.values(),
        MetadataExtras { source, perf_specs },
    );
    if !cli.no_pairs {
        graph.assign_pair_ids();
    }

    if cli.verbose {
        eprintln!("nets: {}", graph.nets().len());
        eprintln!("components: {}", graph.components().len());
        eprintln!("edges: {}", graph.edges().len());
    }

    let doc = CircuitDocument::from_graph(&graph);
    let json = doc.to_json()?;

    match &cli.output {
        Some(path) => fs::write(path, json)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{json}"),
    }

    Ok(())
}

/// Parse the performance-spec bag: a JSON object of numeric values.
fn parse_specs(text: &str) -> Result<BTreeMap<String, f64>> {
    let value: serde_json::Value =
        serde_json::from_str(text).context("performance specs are not valid JSON")?;
    let Some(map) = value.as_object() else {
        bail!("performance specs must be a JSON object");
    };
    let mut specs = BTreeMap::new();
    for (key, val) in map {
        let Some(num) = val.as_f64() else {
            bail!("performance spec {key} is not numeric");
        };
        specs.insert(key.clone(), num);
    }
    Ok(specs)
}
