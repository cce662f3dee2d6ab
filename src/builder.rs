//! Orchestrates scanning, import matching and resolution into a caller-supplied graph.

use std::path::{Component, Path};
use std::time::Instant;

use anyhow::Context;
use serde::Serialize;
use tracing::{debug, info};

use crate::graph::GraphSink;
use crate::graph::node::{FileInfo, GraphNode, NodeKey};
use crate::style::{ImportFile, StyleRegistry};
use crate::walker::{SourceFile, scan_project};

/// Counters collected while populating a network.
#[derive(Debug, Default, Clone, Serialize)]
pub struct BuildStats {
    /// Files loaded and added as nodes.
    pub files: usize,
    /// Files skipped because they could not be read.
    pub skipped: usize,
    /// Lines that matched at least one import style (counted once per style match).
    pub import_lines: usize,
    pub internal_imports: usize,
    pub external_imports: usize,
    /// Imports that resolved to the importing file itself.
    pub self_imports: usize,
    /// Internal imports whose target exists on disk but was not scanned.
    pub unscanned_targets: usize,
    pub elapsed_secs: f64,
}

/// A populated graph sink together with the counters from building it.
#[derive(Debug)]
pub struct Network<S> {
    pub graph: S,
    pub stats: BuildStats,
}

/// Builds an import network into a graph supplied by the caller.
///
/// Pass 1 adds one node per scanned file; pass 2 runs every applicable import
/// style over every line and adds an edge from each imported node to the
/// importing file.
pub struct NetworkBuilder<S: GraphSink> {
    graph: S,
    registry: StyleRegistry,
    include_external: bool,
    exclude: Vec<String>,
}

impl<S: GraphSink> NetworkBuilder<S> {
    pub fn new(graph: S, registry: StyleRegistry, include_external: bool) -> Self {
        Self {
            graph,
            registry,
            include_external,
            exclude: Vec::new(),
        }
    }

    /// Glob patterns for files to leave out of the scan.
    pub fn exclude(mut self, patterns: Vec<String>) -> Self {
        self.exclude = patterns;
        self
    }

    /// Scan `project_path` and populate the graph.
    pub fn create_network(self, project_path: &Path) -> anyhow::Result<Network<S>> {
        let start = Instant::now();
        let report = scan_project(project_path, &self.registry.extensions(), &self.exclude)
            .with_context(|| format!("failed to scan {}", project_path.display()))?;

        info!(
            root = %report.root.display(),
            files = report.files.len(),
            skipped = report.skipped.len(),
            "scanned project"
        );

        let skipped = report.skipped.len();
        let mut network = self.populate(&report.root, &report.files);
        network.stats.skipped = skipped;
        network.stats.elapsed_secs = start.elapsed().as_secs_f64();
        Ok(network)
    }

    /// Run both passes over already-loaded files rooted at `root`.
    pub fn populate(mut self, root: &Path, files: &[SourceFile]) -> Network<S> {
        let mut stats = BuildStats::default();

        for file in files {
            if self.add_source_file(root, file) {
                stats.files += 1;
            }
        }

        for file in files {
            let Some(importer) = node_key(root, &file.path).map(NodeKey::File) else {
                continue;
            };
            for line in &file.lines {
                for style in self.registry.styles_for(&file.extension) {
                    if !style.matches(line) {
                        continue;
                    }
                    stats.import_lines += 1;
                    for import in style.extract(&file.path, line) {
                        add_import(
                            &mut self.graph,
                            root,
                            &importer,
                            import,
                            self.include_external,
                            &mut stats,
                        );
                    }
                }
            }
        }

        debug!(?stats, "populated network");
        Network {
            graph: self.graph,
            stats,
        }
    }

    fn add_source_file(&mut self, root: &Path, file: &SourceFile) -> bool {
        let Some(key) = node_key(root, &file.path) else {
            debug!(path = %file.path.display(), "file outside scan root, not added");
            return false;
        };
        if self.graph.contains_node(&NodeKey::file(key.as_str())) {
            return false;
        }
        self.graph.add_node(GraphNode::File(FileInfo {
            key,
            path: file.path.clone(),
            lines: file.line_count(),
        }));
        true
    }
}

fn add_import<S: GraphSink>(
    graph: &mut S,
    root: &Path,
    importer: &NodeKey,
    import: ImportFile,
    include_external: bool,
    stats: &mut BuildStats,
) {
    match import {
        ImportFile::Internal(path) => {
            stats.internal_imports += 1;
            let Some(key) = node_key(root, &path)
                .map(NodeKey::File)
                .filter(|k| graph.contains_node(k))
            else {
                stats.unscanned_targets += 1;
                debug!(%importer, target = %path.display(), "import target was not scanned");
                return;
            };
            if key == *importer {
                stats.self_imports += 1;
                return;
            }
            graph.add_edge(&key, importer);
        }
        ImportFile::External(specifier) => {
            stats.external_imports += 1;
            if !include_external {
                return;
            }
            let key = NodeKey::external(specifier.as_str());
            if !graph.contains_node(&key) {
                graph.add_node(GraphNode::External { specifier });
            }
            graph.add_edge(&key, importer);
        }
    }
}

/// Project-relative node key with `/` separators, or `None` for paths outside `root`.
pub fn node_key(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Option<_>>()?;
    if parts.is_empty() {
        return None;
    }
    Some(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::ImportGraph;
    use crate::graph::node::NodeShape;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn file(key: &str) -> NodeKey {
        NodeKey::file(key)
    }

    fn ext(specifier: &str) -> NodeKey {
        NodeKey::external(specifier)
    }

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("tempdir")
    }

    fn build(dir: &Path, include_external: bool) -> Network<ImportGraph> {
        NetworkBuilder::new(ImportGraph::new(), StyleRegistry::builtin(), include_external)
            .create_network(dir)
            .expect("build network")
    }

    #[test]
    fn test_import_sibling_creates_single_edge() {
        let dir = tmp();
        fs::write(dir.path().join("a.py"), "import b\n").unwrap();
        fs::write(dir.path().join("b.py"), "").unwrap();

        let net = build(dir.path(), false);
        assert_eq!(net.graph.node_count(), 2);
        assert_eq!(net.graph.edge_count(), 1);
        assert!(net.graph.edge(&file("b.py"), &file("a.py")).is_some(), "edge runs imported -> importer");
        assert_eq!(net.graph.external_count(), 0);
        assert_eq!(net.stats.files, 2);
        assert_eq!(net.stats.internal_imports, 1);
    }

    #[test]
    fn test_external_import_suppressed() {
        let dir = tmp();
        fs::write(dir.path().join("a.py"), "import os\n").unwrap();

        let net = build(dir.path(), false);
        assert_eq!(net.graph.node_count(), 1);
        assert_eq!(net.graph.edge_count(), 0);
        assert_eq!(net.graph.external_count(), 0);
        assert_eq!(net.stats.external_imports, 1);
    }

    #[test]
    fn test_external_import_included_as_diamond() {
        let dir = tmp();
        fs::write(dir.path().join("a.py"), "import os\nimport os\n").unwrap();
        fs::write(dir.path().join("b.py"), "from os import path\n").unwrap();

        let net = build(dir.path(), true);
        let os = net.graph.node(&ext("os")).expect("external node");
        assert_eq!(os.shape(), NodeShape::Diamond);
        assert_eq!(net.graph.external_count(), 1, "external node added once");
        assert_eq!(net.graph.edge(&ext("os"), &file("a.py")).map(|e| e.count), Some(2));
        assert!(net.graph.edge(&ext("os"), &file("b.py")).is_some());
    }

    #[test]
    fn test_self_import_never_creates_edge() {
        let dir = tmp();
        let pkg = dir.path().join("pkg");
        fs::create_dir_all(&pkg).unwrap();
        fs::write(pkg.join("a.py"), "from .a import thing\nimport a\n").unwrap();

        let net = build(dir.path(), true);
        assert_eq!(net.graph.edge_count(), 0);
        assert_eq!(net.stats.self_imports, 2);
    }

    #[test]
    fn test_same_name_in_different_dirs_is_disambiguated() {
        let dir = tmp();
        for sub in ["x", "y"] {
            fs::create_dir_all(dir.path().join(sub)).unwrap();
            fs::write(dir.path().join(sub).join("util.py"), "").unwrap();
        }
        fs::write(dir.path().join("x").join("main.py"), "import util\n").unwrap();

        let net = build(dir.path(), false);
        assert!(net.graph.edge(&file("x/util.py"), &file("x/main.py")).is_some());
        assert!(net.graph.edge(&file("y/util.py"), &file("x/main.py")).is_none());
        assert_eq!(net.graph.edge_count(), 1);
    }

    #[test]
    fn test_file_without_imports_is_lone_node() {
        let dir = tmp();
        fs::write(dir.path().join("solo.py"), "x = 1\ny = 2\n").unwrap();

        let net = build(dir.path(), true);
        assert_eq!(net.graph.node_count(), 1);
        assert_eq!(net.graph.edge_count(), 0);
        match net.graph.node(&file("solo.py")) {
            Some(GraphNode::File(info)) => assert_eq!(info.lines, 2),
            other => panic!("expected file node, got {other:?}"),
        }
    }

    #[test]
    fn test_styles_only_apply_to_their_extensions() {
        let dir = tmp();
        fs::write(dir.path().join("b.py"), "").unwrap();
        // A python-looking line inside a C file must not be treated as a python import.
        fs::write(dir.path().join("main.c"), "import b\n#include \"b.h\"\n").unwrap();
        fs::write(dir.path().join("b.h"), "").unwrap();

        let net = build(dir.path(), true);
        assert!(net.graph.edge(&file("b.py"), &file("main.c")).is_none());
        assert!(net.graph.edge(&file("b.h"), &file("main.c")).is_some());
        assert_eq!(net.stats.import_lines, 1);
    }

    #[test]
    fn test_target_outside_root_is_not_linked() {
        let dir = tmp();
        let proj = dir.path().join("proj");
        fs::create_dir_all(&proj).unwrap();
        fs::write(dir.path().join("outside.py"), "").unwrap();
        fs::write(proj.join("a.py"), "from ..outside import x\n").unwrap();

        let net = build(&proj, true);
        assert_eq!(net.graph.node_count(), 1);
        assert_eq!(net.graph.edge_count(), 0);
        assert_eq!(net.stats.unscanned_targets, 1);
    }

    #[test]
    fn test_populate_from_loaded_files() {
        let dir = tmp();
        let root = dir.path().to_path_buf();
        fs::write(root.join("b.py"), "").unwrap();
        let files = vec![
            SourceFile::from_text(root.join("a.py"), "import b\n"),
            SourceFile::from_text(root.join("b.py"), ""),
        ];

        let net = NetworkBuilder::new(ImportGraph::new(), StyleRegistry::builtin(), false)
            .populate(&root, &files);
        assert!(net.graph.edge(&file("b.py"), &file("a.py")).is_some());
        assert_eq!(net.stats.skipped, 0);
    }

    #[test]
    fn test_node_key_is_relative_with_slashes() {
        let root = PathBuf::from("/proj");
        assert_eq!(
            node_key(&root, &root.join("pkg").join("a.py")).as_deref(),
            Some("pkg/a.py")
        );
        assert_eq!(node_key(&root, Path::new("/other/a.py")), None);
        assert_eq!(node_key(&root, &root), None);
    }

    #[test]
    fn test_unresolved_include_matching_root_file_gets_own_node() {
        let dir = tmp();
        fs::write(dir.path().join("util.h"), "").unwrap();
        fs::create_dir_all(dir.path().join("sub")).unwrap();
        // Resolves against sub/, where no util.h exists.
        fs::write(dir.path().join("sub").join("main.c"), "#include \"util.h\"\n").unwrap();

        let net = build(dir.path(), true);
        assert_eq!(net.stats.external_imports, 1);
        assert_eq!(net.stats.internal_imports, 0);
        assert_eq!(net.graph.external_count(), 1);
        assert_eq!(net.graph.file_count(), 2);
        assert!(net.graph.edge(&ext("util.h"), &file("sub/main.c")).is_some());
        assert!(net.graph.edge(&file("util.h"), &file("sub/main.c")).is_none());

        let net = build(dir.path(), false);
        assert_eq!(net.graph.edge_count(), 0);
    }
}
