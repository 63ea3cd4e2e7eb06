//! Presentation boundary: layout, hit-testing and GraphML export

use crate::error::Result as GraphResult;
use crate::graph::SocialGraph;
use crate::session::Highlight;
use crate::structures::SpatialHashTable;
use anyhow::Result;
use std::f64::consts::TAU;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Default node colour
pub const BASE_COLOR: &str = "#1f77b4";

/// Colour of highlighted nodes
pub const HIGHLIGHT_COLOR: &str = "#d62728";

/// Cluster palette (tab10); indices wrap around
pub const PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// Nodes evenly spaced on the unit circle, in index order
pub fn circular_layout(graph: &SocialGraph) -> Vec<(f64, f64)> {
    let n = graph.node_count();
    if n == 1 {
        return vec![(0.0, 0.0)];
    }
    (0..n)
        .map(|i| {
            let angle = TAU * i as f64 / n as f64;
            (angle.cos(), angle.sin())
        })
        .collect()
}

/// Layout positions indexed for point lookups
pub struct LayoutIndex {
    positions: Vec<(f64, f64)>,
    grid: SpatialHashTable<u32>,
}

impl LayoutIndex {
    pub fn new(positions: Vec<(f64, f64)>, cell_size: f64) -> GraphResult<Self> {
        let mut grid = SpatialHashTable::new(cell_size)?;
        for (node, &(x, y)) in positions.iter().enumerate() {
            grid.insert(x, y, node as u32);
        }
        Ok(Self { positions, grid })
    }

    pub fn position(&self, node: u32) -> Option<(f64, f64)> {
        self.positions.get(node as usize).copied()
    }

    /// Nearest node within `tolerance` of `(x, y)`
    pub fn node_at(&self, x: f64, y: f64, tolerance: f64) -> GraphResult<Option<u32>> {
        let nearest = self
            .grid
            .query_radius(x, y, tolerance)?
            .map(|&node| {
                let (nx, ny) = self.positions[node as usize];
                (node, (nx - x).hypot(ny - y))
            })
            .filter(|&(_, dist)| dist <= tolerance)
            .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)))
            .map(|(node, _)| node);
        Ok(nearest)
    }
}

/// Colour of a node under the given highlight
pub fn node_color(label: &str, highlight: &Highlight) -> &'static str {
    match highlight {
        Highlight::None => BASE_COLOR,
        Highlight::Nodes(nodes) if nodes.contains(label) => HIGHLIGHT_COLOR,
        Highlight::Nodes(_) => BASE_COLOR,
        Highlight::Clusters(colours) => colours
            .get(label)
            .map_or(BASE_COLOR, |&idx| PALETTE[idx % PALETTE.len()]),
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Write the graph as GraphML, colouring nodes by the highlight
pub fn export_graphml(graph: &SocialGraph, highlight: &Highlight, path: &Path) -> Result<()> {
    log::info!("Writing GraphML to {}", path.display());

    let mut file = BufWriter::new(File::create(path)?);
    let layout = circular_layout(graph);

    // Every attribute key used on any edge gets a GraphML key declaration
    let mut edge_keys: Vec<&str> = graph
        .edges()
        .iter()
        .flat_map(|e| e.attributes.keys().map(String::as_str))
        .collect();
    edge_keys.sort_unstable();
    edge_keys.dedup();

    writeln!(file, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>")?;
    writeln!(file, "<graphml xmlns=\"http://graphml.graphdrawing.org/xmlns\">")?;
    writeln!(file, "  <key id=\"label\" for=\"node\" attr.name=\"label\" attr.type=\"string\"/>")?;
    writeln!(file, "  <key id=\"color\" for=\"node\" attr.name=\"color\" attr.type=\"string\"/>")?;
    writeln!(file, "  <key id=\"x\" for=\"node\" attr.name=\"x\" attr.type=\"double\"/>")?;
    writeln!(file, "  <key id=\"y\" for=\"node\" attr.name=\"y\" attr.type=\"double\"/>")?;
    for (i, key) in edge_keys.iter().enumerate() {
        writeln!(
            file,
            "  <key id=\"e{}\" for=\"edge\" attr.name=\"{}\" attr.type=\"string\"/>",
            i,
            escape(key)
        )?;
    }
    writeln!(file, "  <graph id=\"G\" edgedefault=\"undirected\">")?;

    for node in graph.nodes() {
        let label = graph.label(node);
        let (x, y) = layout[node as usize];
        writeln!(file, "    <node id=\"n{}\">", node)?;
        writeln!(file, "      <data key=\"label\">{}</data>", escape(label))?;
        writeln!(file, "      <data key=\"color\">{}</data>", node_color(label, highlight))?;
        writeln!(file, "      <data key=\"x\">{:.6}</data>", x)?;
        writeln!(file, "      <data key=\"y\">{:.6}</data>", y)?;
        writeln!(file, "    </node>")?;
    }

    for (edge_id, edge) in graph.edges().iter().enumerate() {
        writeln!(
            file,
            "    <edge id=\"e{}\" source=\"n{}\" target=\"n{}\">",
            edge_id, edge.source, edge.target
        )?;
        for (key, value) in &edge.attributes {
            if let Ok(i) = edge_keys.binary_search(&key.as_str()) {
                writeln!(file, "      <data key=\"e{}\">{}</data>", i, escape(value))?;
            }
        }
        writeln!(file, "    </edge>")?;
    }

    writeln!(file, "  </graph>")?;
    writeln!(file, "</graphml>")?;
    file.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Attributes, GraphBuilder};
    use std::collections::{BTreeMap, BTreeSet};

    fn square() -> SocialGraph {
        let mut builder = GraphBuilder::new();
        for (a, b) in [("a", "b"), ("b", "c"), ("c", "d"), ("d", "a")] {
            builder.add_edge(a, b, Attributes::new());
        }
        builder.build()
    }

    #[test]
    fn circular_layout_on_unit_circle() {
        let layout = circular_layout(&square());
        assert_eq!(layout.len(), 4);
        for (x, y) in &layout {
            assert!((x.hypot(*y) - 1.0).abs() < 1e-12);
        }
        assert!((layout[1].1 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn hit_testing_finds_nearest_node() {
        let index = LayoutIndex::new(circular_layout(&square()), 0.25).unwrap();
        assert_eq!(index.node_at(0.98, 0.02, 0.1).unwrap(), Some(0));
        assert_eq!(index.node_at(-0.05, -0.97, 0.1).unwrap(), Some(3));
        assert_eq!(index.node_at(0.0, 0.0, 0.1).unwrap(), None);
        assert!(LayoutIndex::new(Vec::new(), 0.0).is_err());
    }

    #[test]
    fn hit_testing_with_huge_or_bad_tolerance() {
        let index = LayoutIndex::new(circular_layout(&square()), 0.25).unwrap();
        assert_eq!(index.node_at(1.0, 0.0, 1.0e9).unwrap(), Some(0));
        assert!(index.node_at(1.0, 0.0, f64::INFINITY).is_err());
        assert!(index.node_at(1.0, 0.0, -0.5).is_err());
    }

    #[test]
    fn colours_follow_highlight() {
        let nodes = Highlight::Nodes(BTreeSet::from(["a".to_string()]));
        assert_eq!(node_color("a", &nodes), HIGHLIGHT_COLOR);
        assert_eq!(node_color("b", &nodes), BASE_COLOR);

        let clusters = Highlight::Clusters(BTreeMap::from([("a".to_string(), 12)]));
        assert_eq!(node_color("a", &clusters), PALETTE[2]);
        assert_eq!(node_color("a", &Highlight::None), BASE_COLOR);
    }
}
