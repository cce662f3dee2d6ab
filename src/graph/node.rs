use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Size of a node with no lines, and of every external node.
pub const BASE_NODE_SIZE: u32 = 5;

/// Sub-linear node size: `5 + round(lines^0.6)`.
pub fn size_for_lines(lines: usize) -> u32 {
    BASE_NODE_SIZE + (lines as f64).powf(0.6).round() as u32
}

/// Identity of a node in the graph.
///
/// Project files and unresolved imports are separate namespaces: an external
/// token equal to some file's relative path still names a distinct node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKey {
    /// Project-relative path with `/` separators.
    File(String),
    /// Raw module token as written in the import.
    External(String),
}

impl NodeKey {
    pub fn file(key: impl Into<String>) -> Self {
        NodeKey::File(key.into())
    }

    pub fn external(specifier: impl Into<String>) -> Self {
        NodeKey::External(specifier.into())
    }
}

/// Exported node id. Files use their relative path, externals an `ext:` prefix.
impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKey::File(key) => f.write_str(key),
            NodeKey::External(specifier) => write!(f, "ext:{specifier}"),
        }
    }
}

/// Visual shape hint passed to renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeShape {
    Dot,
    Diamond,
}

/// A scanned project file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileInfo {
    /// Project-relative path with `/` separators. Unique per graph.
    pub key: String,
    /// Absolute path on disk.
    pub path: PathBuf,
    pub lines: usize,
}

/// A node in the import graph: a project file or an unresolved dependency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GraphNode {
    File(FileInfo),
    /// Keyed by the raw module token as written in the import.
    External { specifier: String },
}

impl GraphNode {
    pub fn key(&self) -> NodeKey {
        match self {
            GraphNode::File(info) => NodeKey::file(info.key.as_str()),
            GraphNode::External { specifier } => NodeKey::external(specifier.as_str()),
        }
    }

    /// Display text: the relative path or the module token.
    pub fn label(&self) -> &str {
        match self {
            GraphNode::File(info) => &info.key,
            GraphNode::External { specifier } => specifier,
        }
    }

    pub fn size(&self) -> u32 {
        match self {
            GraphNode::File(info) => size_for_lines(info.lines),
            GraphNode::External { .. } => BASE_NODE_SIZE,
        }
    }

    pub fn shape(&self) -> NodeShape {
        match self {
            GraphNode::File(_) => NodeShape::Dot,
            GraphNode::External { .. } => NodeShape::Diamond,
        }
    }

    pub fn is_external(&self) -> bool {
        matches!(self, GraphNode::External { .. })
    }
}
