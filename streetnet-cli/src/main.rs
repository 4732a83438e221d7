use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::Parser;
use streetnet_core::prelude::*;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod config;

use crate::config::CliConfig;

#[derive(Parser, Debug)]
#[command(author, version, about = "Street network graphs from line datasets", long_about = None)]
struct Args {
    /// TOML file with logging and build settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Build a graph from a .geojson/.json or .csv (WKT) file and save it
    Convert {
        input: PathBuf,
        /// Output graph file; a `.gz` suffix enables compression
        output: PathBuf,
        /// Field holding the external identifier of start vertices
        #[arg(long)]
        id_field: Option<String>,
        /// Skip invalid features instead of failing
        #[arg(long)]
        skip_invalid: bool,
        /// Leave new end vertices unindexed, as older builds did
        #[arg(long)]
        legacy_indexing: bool,
    },
    /// Shortest path between two external identifiers
    Route {
        graph: PathBuf,
        from: String,
        to: String,
        /// Print the path as a GeoJSON FeatureCollection
        #[arg(long)]
        geojson: bool,
    },
    /// Print vertex and edge counts and the property listing
    Info { graph: PathBuf },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => CliConfig::from_file(path)?,
        None => CliConfig::default(),
    };
    init_logging(&config.log_level);

    match args.cmd {
        Command::Convert {
            input,
            output,
            id_field,
            skip_invalid,
            legacy_indexing,
        } => {
            let mut build = config.build;
            if let Some(id_field) = id_field {
                build.id_field = id_field;
            }
            build.skip_invalid |= skip_invalid;
            if legacy_indexing {
                build.endpoint_indexing = EndpointIndexing::Legacy;
            }
            convert(input, output, build)
        }
        Command::Route {
            graph,
            from,
            to,
            geojson,
        } => route(graph, &from, &to, geojson),
        Command::Info { graph } => show_info(graph),
    }
}

fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn convert(input: PathBuf, output: PathBuf, build: GraphBuildConfig) -> Result<()> {
    let started = Instant::now();
    let mut converter = StreetNetworkConverter::new(build);

    let report = *converter
        .load(&input)
        .with_context(|| format!("failed to build graph from {}", input.display()))?;
    if report.features_skipped > 0 {
        warn!("{} invalid features were skipped", report.features_skipped);
    }

    println!("{}", converter.list_properties()?);

    converter
        .save(&output)
        .with_context(|| format!("failed to save graph to {}", output.display()))?;

    info!(
        "Converted {} features into {} vertices and {} edges in {:.2?}",
        report.features_read,
        report.vertices_created,
        report.edges_created,
        started.elapsed()
    );
    Ok(())
}

fn route(path: PathBuf, from: &str, to: &str, as_geojson: bool) -> Result<()> {
    let mut converter = StreetNetworkConverter::default();
    converter
        .load_graph(&path)
        .with_context(|| format!("failed to load graph {}", path.display()))?;
    let graph = converter.graph()?;

    match shortest_path(graph, from, to) {
        PathOutcome::Found(path) if as_geojson => {
            println!("{}", path.to_geojson_string(graph)?);
        }
        PathOutcome::Found(path) => {
            println!("distance: {}", path.distance);
            let keys: Vec<&str> = path
                .vertices
                .iter()
                .filter_map(|&v| graph.vertex(v))
                .map(|v| v.location_key.as_str())
                .collect();
            println!("vertices: {}", keys.join(" -> "));
            println!("edges: {}", path.edges.len());
        }
        PathOutcome::Unreachable => bail!("no path between {from} and {to}"),
        PathOutcome::NotFound(which) => {
            bail!("no vertex for the {which} identifier ({from} -> {to})")
        }
    }
    Ok(())
}

fn show_info(path: PathBuf) -> Result<()> {
    let graph = BinaryGraphStore::new()
        .load(&path)
        .with_context(|| format!("failed to load graph {}", path.display()))?;

    println!("vertices: {}", graph.vertex_count());
    println!("edges: {}", graph.edge_count());
    println!("endpoint indexing: {:?}", graph.indexing());
    println!("{}", graph.list_properties());
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_convert_flags() {
        let args = Args::parse_from([
            "streetnet",
            "convert",
            "streets.geojson",
            "streets.graph.gz",
            "--id-field",
            "GEOID10",
            "--legacy-indexing",
        ]);

        match args.cmd {
            Command::Convert {
                id_field,
                skip_invalid,
                legacy_indexing,
                ..
            } => {
                assert_eq!(id_field.as_deref(), Some("GEOID10"));
                assert!(!skip_invalid);
                assert!(legacy_indexing);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
