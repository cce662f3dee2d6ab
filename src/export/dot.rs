use std::collections::HashMap;
use std::fmt::Write;

use crate::export::model::{GraphModel, ModelNode};

const FILE_FILL: &str = "#AED6F1";
const EXTERNAL_FILL: &str = "#F9E79F";

/// Escape a string for use inside a double-quoted DOT attribute.
pub fn escape_dot(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

fn node_attrs(node: &ModelNode) -> String {
    // DOT widths are in inches; size 5 maps to the 0.5in floor.
    let width = f64::from(node.size) / 10.0;
    if node.external {
        format!(
            "label=\"{}\" shape=diamond fillcolor=\"{}\" width={:.2}",
            escape_dot(&node.label),
            EXTERNAL_FILL,
            width
        )
    } else {
        format!(
            "label=\"{}\" fillcolor=\"{}\" width={:.2} tooltip=\"{} lines\"",
            escape_dot(&node.label),
            FILE_FILL,
            width,
            node.lines.unwrap_or(0)
        )
    }
}

/// Render the graph as Graphviz DOT. Edges point from the imported module to the importer.
pub fn render_dot(model: &GraphModel) -> String {
    let mut out = String::new();
    writeln!(out, "digraph codeweb {{").unwrap();
    writeln!(out, "    rankdir=LR;").unwrap();
    writeln!(out, "    node [style=filled fontname=monospace];").unwrap();

    let mut ids: HashMap<&str, usize> = HashMap::with_capacity(model.nodes.len());
    for (i, node) in model.nodes.iter().enumerate() {
        ids.insert(node.id.as_str(), i);
        writeln!(out, "    n{} [{}];", i, node_attrs(node)).unwrap();
    }

    for edge in &model.edges {
        let (Some(src), Some(dst)) = (ids.get(edge.from.as_str()), ids.get(edge.to.as_str())) else {
            continue;
        };
        if edge.count > 1 {
            writeln!(out, "    n{} -> n{} [label=\"{}\"];", src, dst, edge.count).unwrap();
        } else {
            writeln!(out, "    n{} -> n{};", src, dst).unwrap();
        }
    }

    writeln!(out, "}}").unwrap();
    out
}
