use serde::{Deserialize, Serialize};

use crate::graph::node::NodeShape;

/// Output format for a rendered graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum, Serialize, Deserialize)]
pub enum ExportFormat {
    /// Standalone interactive page driven by vis-network (default).
    Html,
    /// Graphviz DOT.
    Dot,
    /// Mermaid flowchart. Best for small graphs in markdown.
    Mermaid,
    /// Plain nodes/edges JSON.
    Json,
}

impl ExportFormat {
    pub fn file_extension(&self) -> &'static str {
        match self {
            ExportFormat::Html => "html",
            ExportFormat::Dot => "dot",
            ExportFormat::Mermaid => "mmd",
            ExportFormat::Json => "json",
        }
    }
}

/// Repulsion physics for the HTML view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Physics {
    pub node_distance: f64,
    pub central_gravity: f64,
    pub spring_length: f64,
    pub spring_strength: f64,
    pub damping: f64,
}

impl Default for Physics {
    fn default() -> Self {
        Self {
            node_distance: 150.0,
            central_gravity: 0.2,
            spring_length: 200.0,
            spring_strength: 0.05,
            damping: 0.09,
        }
    }
}

/// A renderer-neutral node, ordered by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelNode {
    pub id: String,
    pub label: String,
    pub size: u32,
    pub shape: NodeShape,
    pub external: bool,
    /// Line count; absent for external nodes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lines: Option<usize>,
}

/// A renderer-neutral edge: `from` is imported by `to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelEdge {
    pub from: String,
    pub to: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphModel {
    pub nodes: Vec<ModelNode>,
    pub edges: Vec<ModelEdge>,
}
