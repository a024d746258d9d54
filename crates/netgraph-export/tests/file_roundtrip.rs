//! End-to-end check: parse a netlist, project it, write the document to
//! disk, and read it back unchanged.

use std::fs;

use netgraph_core::graph::{Graph, MetadataExtras};
use netgraph_export::CircuitDocument;
use netgraph_parser::{parse_netlist, ParseOptions};

const NETLIST: &str = "\
parameters vdd=1.2 rload=10k
M1 (out in 0 0) nfet l=30n nfin=8
R1 (vdd! out) resistor r=rload
V0 (vdd! 0) vsource dc=vdd
";

#[test]
fn test_document_survives_disk_round_trip() {
    let parsed = parse_netlist(NETLIST, ParseOptions::default()).unwrap();
    let mut graph = Graph::build(
        parsed.components,
        parsed.scope.values(),
        MetadataExtras {
            source: "inline.scs".to_string(),
            ..MetadataExtras::default()
        },
    );
    graph.assign_pair_ids();

    let doc = CircuitDocument::from_graph(&graph);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("circuit.json");
    fs::write(&path, doc.to_json().unwrap()).unwrap();

    let restored = CircuitDocument::from_json(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(restored, doc);
    assert_eq!(restored.netlist, "inline.scs");
    assert_eq!(restored.graph.nodes.len(), graph.components().len() + graph.nets().len());
}
