use serde::Serialize;

use crate::builder::BuildStats;
use crate::graph::ImportGraph;

/// Everything reported after building a network.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub root: String,
    pub file_nodes: usize,
    pub external_nodes: usize,
    pub edges: usize,
    #[serde(flatten)]
    pub stats: BuildStats,
}

impl RunSummary {
    pub fn new(root: String, graph: &ImportGraph, stats: BuildStats) -> Self {
        Self {
            root,
            file_nodes: graph.file_count(),
            external_nodes: graph.external_count(),
            edges: graph.edge_count(),
            stats,
        }
    }
}

/// Print a summary of the run.
///
/// - `json = true`: emit a pretty-printed JSON object to stdout.
/// - `json = false`: emit a cargo-style human-readable summary to stdout.
///
/// Skipped files are reported on **stderr** so that the stdout stream remains
/// clean for downstream JSON consumers.
pub fn print_summary(summary: &RunSummary, json: bool) {
    if json {
        match serde_json::to_string_pretty(summary) {
            Ok(s) => println!("{}", s),
            Err(e) => eprintln!("error serialising summary: {}", e),
        }
        return;
    }

    let stats = &summary.stats;
    println!(
        "Scanned {} files in {:.2}s ({})",
        stats.files, stats.elapsed_secs, summary.root
    );
    println!(
        "  {} file nodes, {} external nodes, {} edges",
        summary.file_nodes, summary.external_nodes, summary.edges
    );
    println!(
        "  {} import lines: {} internal, {} external imports",
        stats.import_lines, stats.internal_imports, stats.external_imports
    );
    if stats.self_imports > 0 || stats.unscanned_targets > 0 {
        println!(
            "  {} self imports ignored, {} targets outside the scan",
            stats.self_imports, stats.unscanned_targets
        );
    }

    if stats.skipped > 0 {
        eprintln!("  {} files skipped (unreadable)", stats.skipped);
    }
}
