pub mod dot;
pub mod html;
pub mod mermaid;
pub mod model;

use petgraph::visit::{EdgeRef, IntoEdgeReferences};

use crate::graph::ImportGraph;
use crate::graph::node::GraphNode;

use model::{ExportFormat, GraphModel, ModelEdge, ModelNode, Physics};

/// Render the import graph in the requested format.
pub fn render(graph: &ImportGraph, format: ExportFormat, physics: &Physics) -> anyhow::Result<String> {
    let model = graph_model(graph);
    let content = match format {
        ExportFormat::Html => html::render_html(&model, physics)?,
        ExportFormat::Dot => dot::render_dot(&model),
        ExportFormat::Mermaid => mermaid::render_mermaid(&model),
        ExportFormat::Json => serde_json::to_string_pretty(&model)?,
    };
    Ok(content)
}

/// Flatten the graph into a deterministic model: nodes sorted by id (files
/// before externals), edges sorted by endpoints. External ids carry an `ext:`
/// prefix so they never collide with a file path.
pub fn graph_model(graph: &ImportGraph) -> GraphModel {
    let mut nodes: Vec<ModelNode> = graph
        .graph
        .node_indices()
        .map(|idx| &graph.graph[idx])
        .map(|node| ModelNode {
            id: node.key().to_string(),
            label: node.label().to_owned(),
            size: node.size(),
            shape: node.shape(),
            external: node.is_external(),
            lines: match node {
                GraphNode::File(info) => Some(info.lines),
                GraphNode::External { .. } => None,
            },
        })
        .collect();
    nodes.sort_by(|a, b| (a.external, &a.id).cmp(&(b.external, &b.id)));

    let mut edges: Vec<ModelEdge> = graph
        .graph
        .edge_references()
        .map(|edge| ModelEdge {
            from: graph.graph[edge.source()].key().to_string(),
            to: graph.graph[edge.target()].key().to_string(),
            count: edge.weight().count,
        })
        .collect();
    edges.sort_by(|a, b| (&a.from, &a.to).cmp(&(&b.from, &b.to)));

    GraphModel { nodes, edges }
}
