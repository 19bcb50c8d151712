//! Graphviz DOT rendering of the journey topology.
//!
//! Node colours follow their role: boundary nodes light blue, resolutions
//! light green, abandonments light coral, decisions light yellow, everything
//! else white.  Layout hints become pinned `pos` attributes, so
//! `neato -n` reproduces the intended picture.

use std::fmt;
use std::path::Path;

use cs_sim::{JourneyTopology, NodeRole};

use crate::OutputResult;

pub fn role_colour(role: NodeRole) -> &'static str {
    match role {
        NodeRole::Boundary    => "lightblue",
        NodeRole::Resolution  => "lightgreen",
        NodeRole::Abandonment => "lightcoral",
        NodeRole::Decision    => "lightyellow",
        NodeRole::Step        => "white",
    }
}

/// Long names wrap one word per line.
fn display_label(name: &str) -> String {
    if name.len() > 15 {
        name.split(' ').collect::<Vec<_>>().join("\\n")
    } else {
        name.to_owned()
    }
}

/// Formats a topology as a DOT digraph.
struct Dot<'a>(&'a JourneyTopology);

impl fmt::Display for Dot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "digraph journey {{")?;
        writeln!(f, "    node [shape=ellipse, style=filled];")?;
        for node in &self.0.nodes {
            writeln!(
                f,
                "    \"{}\" [label=\"{}\", fillcolor={}, pos=\"{},{}!\"];",
                node.name,
                display_label(node.name),
                role_colour(node.role),
                node.pos.0,
                node.pos.1,
            )?;
        }
        for edge in &self.0.edges {
            match edge.label {
                Some(label) => writeln!(
                    f,
                    "    \"{}\" -> \"{}\" [label=\"{}\", fontcolor=red];",
                    edge.from, edge.to, label,
                )?,
                None => writeln!(f, "    \"{}\" -> \"{}\";", edge.from, edge.to)?,
            }
        }
        writeln!(f, "}}")
    }
}

pub fn render_dot(topology: &JourneyTopology) -> String {
    Dot(topology).to_string()
}

/// Render `topology` and write it to `path`.
pub fn write_dot(path: &Path, topology: &JourneyTopology) -> OutputResult<()> {
    std::fs::write(path, render_dot(topology))?;
    Ok(())
}
