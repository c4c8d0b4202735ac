//! vis-network HTML renderer glue
//!
//! The builder's obligation ends at a valid edge list; this module turns
//! it into a self-contained HTML artifact. Physics and styling values are
//! rendering configuration, not part of any contract.

use govgraph_core::Relationship;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

#[derive(Serialize)]
struct VisNode<'a> {
    id: &'a str,
    label: &'a str,
    title: &'a str,
}

#[derive(Serialize)]
struct VisEdge<'a> {
    from: &'a str,
    to: &'a str,
    title: &'a str,
}

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<script src="https://unpkg.com/vis-network/standalone/umd/vis-network.min.js"></script>
<style>
  body { margin: 0; background-color: #222222; }
  #graph { width: 100%; height: 750px; }
</style>
</head>
<body>
<div id="graph"></div>
<script>
  const nodes = new vis.DataSet(__NODES__);
  const edges = new vis.DataSet(__EDGES__);
  const container = document.getElementById("graph");
  const options = {
    nodes: {
      font: { size: 16, face: "arial", color: "white", strokeWidth: 2 }
    },
    edges: {
      arrows: { to: { enabled: true, scaleFactor: 1 } },
      color: { inherit: "both" },
      smooth: true
    },
    physics: {
      enabled: true,
      solver: "barnesHut",
      barnesHut: {
        gravitationalConstant: -20000,
        centralGravity: 0.04,
        springLength: 200,
        springConstant: 0.01,
        damping: 0.9
      },
      minVelocity: 0.75
    }
  };
  new vis.Network(container, { nodes, edges }, options);
</script>
</body>
</html>
"#;

/// Render the edge list to a self-contained HTML file. Nodes are the
/// unique start/end names; the relationship type becomes the edge label.
pub fn render_html(relationships: &[Relationship], output: &Path) -> std::io::Result<PathBuf> {
    let names: BTreeSet<&str> = relationships
        .iter()
        .flat_map(|r| [r.start_node.as_str(), r.end_node.as_str()])
        .collect();

    let nodes: Vec<VisNode> = names
        .iter()
        .map(|&name| VisNode {
            id: name,
            label: name,
            title: name,
        })
        .collect();

    let edges: Vec<VisEdge> = relationships
        .iter()
        .map(|r| VisEdge {
            from: &r.start_node,
            to: &r.end_node,
            title: &r.relationship_type,
        })
        .collect();

    let page = PAGE_TEMPLATE
        .replace("__NODES__", &serde_json::to_string(&nodes)?)
        .replace("__EDGES__", &serde_json::to_string(&edges)?);

    std::fs::write(output, page)?;
    tracing::info!(path = %output.display(), nodes = nodes.len(), edges = edges.len(), "graph rendered");
    Ok(output.to_path_buf())
}
