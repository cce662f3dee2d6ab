mod builder;
mod cli;
mod config;
mod error;
mod export;
mod graph;
mod logger;
mod output;
mod resolver;
mod style;
mod walker;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use builder::{Network, NetworkBuilder};
use cli::{Cli, Commands};
use config::CodeWebConfig;
use graph::ImportGraph;
use output::{RunSummary, print_summary};
use style::StyleRegistry;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init_logger(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Graph {
            path,
            format,
            output,
            stdout,
            include_external,
            lang,
        } => {
            let config = CodeWebConfig::load(&path);
            let network = build_network(&path, &config, include_external, &lang)?;
            let content = export::render(&network.graph, format, &config.physics())?;

            if stdout {
                print!("{content}");
            } else {
                let target = output
                    .unwrap_or_else(|| PathBuf::from(format!("codeweb.{}", format.file_extension())));
                std::fs::write(&target, &content)
                    .with_context(|| format!("failed to write {}", target.display()))?;
                info!(
                    nodes = network.graph.node_count(),
                    edges = network.graph.edge_count(),
                    "wrote {}",
                    target.display()
                );
            }
        }

        Commands::Stats {
            path,
            json,
            include_external,
            lang,
        } => {
            let config = CodeWebConfig::load(&path);
            let network = build_network(&path, &config, include_external, &lang)?;
            let summary = RunSummary::new(path.display().to_string(), &network.graph, network.stats);
            print_summary(&summary, json);
        }

        Commands::Styles { path } => {
            let registry = match path {
                Some(path) => CodeWebConfig::load(&path).registry(&[])?,
                None => StyleRegistry::builtin(),
            };
            for set in registry.sets() {
                println!("{}", set.name);
                for style in &set.styles {
                    let exts: Vec<&str> = style.extensions().iter().map(String::as_str).collect();
                    println!("  {:<20} [{}]  {}", style.name(), exts.join(", "), style.pattern());
                }
            }
        }
    }

    Ok(())
}

fn build_network(
    path: &Path,
    config: &CodeWebConfig,
    include_external: bool,
    lang: &[String],
) -> Result<Network<ImportGraph>> {
    let registry = config.registry(lang)?;
    NetworkBuilder::new(ImportGraph::new(), registry, config.include_external(include_external))
        .exclude(config.exclude_patterns())
        .create_network(path)
}
