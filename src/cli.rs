use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::export::model::ExportFormat;

/// Map the imports of a source tree into an interactive dependency web.
///
/// codeweb matches import/include lines with per-language rules, resolves them
/// to project files, and renders who-imports-whom.
#[derive(Parser, Debug)]
#[command(
    name = "codeweb",
    version,
    about,
    long_about = None,
    propagate_version = true,
)]
pub struct Cli {
    /// Debug-level logging on stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the import graph of a project and render it.
    Graph {
        /// Path to the project root to scan.
        path: PathBuf,

        /// Output format.
        #[arg(long, value_enum, default_value_t = ExportFormat::Html)]
        format: ExportFormat,

        /// Output file (default: codeweb.<ext> in the current directory).
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write the rendered graph to stdout instead of a file.
        #[arg(long, conflicts_with = "output")]
        stdout: bool,

        /// Add unresolved (third-party / standard library) imports as diamond nodes.
        #[arg(long)]
        include_external: bool,

        /// Active rule-sets (comma-separated, e.g. python,c). Defaults to all.
        #[arg(long, value_delimiter = ',')]
        lang: Vec<String>,
    },

    /// Scan a project and print node, edge and import counts.
    Stats {
        /// Path to the project root to scan.
        path: PathBuf,

        /// Output results as JSON instead of human-readable text.
        #[arg(long)]
        json: bool,

        /// Count unresolved imports as external nodes.
        #[arg(long)]
        include_external: bool,

        /// Active rule-sets (comma-separated).
        #[arg(long, value_delimiter = ',')]
        lang: Vec<String>,
    },

    /// List the registered import rule-sets.
    Styles {
        /// Also load user styles from this project's codeweb.toml.
        path: Option<PathBuf>,
    },
}
