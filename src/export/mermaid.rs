use std::collections::HashMap;
use std::fmt::Write;

use crate::export::model::GraphModel;

/// Escape a string for safe use in Mermaid node labels (quotes inside labels break the syntax).
fn escape_mermaid_label(s: &str) -> String {
    s.replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('{', "&#123;")
        .replace('}', "&#125;")
}

/// Render the graph as a Mermaid flowchart. External modules use the rhombus shape.
pub fn render_mermaid(model: &GraphModel) -> String {
    let mut out = String::new();
    writeln!(out, "flowchart LR").unwrap();

    let mut ids: HashMap<&str, usize> = HashMap::with_capacity(model.nodes.len());
    for (i, node) in model.nodes.iter().enumerate() {
        ids.insert(node.id.as_str(), i);
        let label = escape_mermaid_label(&node.label);
        if node.external {
            writeln!(out, "    n{}{{\"{}\"}}", i, label).unwrap();
        } else {
            writeln!(out, "    n{}[\"{}\"]", i, label).unwrap();
        }
    }

    for edge in &model.edges {
        let (Some(src), Some(dst)) = (ids.get(edge.from.as_str()), ids.get(edge.to.as_str())) else {
            continue;
        };
        if edge.count > 1 {
            writeln!(out, "    n{} -->|{}| n{}", src, edge.count, dst).unwrap();
        } else {
            writeln!(out, "    n{} --> n{}", src, dst).unwrap();
        }
    }

    out
}
