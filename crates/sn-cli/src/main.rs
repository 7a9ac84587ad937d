//! streetnet — geocode addresses and route between them on a street network.
//!
//! Loads a street centreline GeoJSON (and optionally an address CSV), builds
//! the routable network once, runs one query, and prints the result as JSON.
//!
//! ```text
//! streetnet --streets streets.geojson --addresses addresses.csv find-path "123 main" "45 oak"
//! streetnet --streets streets.geojson --geographic snap --lat 46.81 --lon -71.21
//! RUST_LOG=debug streetnet --config network.json --streets streets.geojson analyze
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sn_address::load_addresses_csv;
use sn_core::{EdgeId, NetworkConfig, NodeId, Projector};
use sn_service::{RoutingService, ServiceBuilder};
use sn_spatial::geojson::{load_streets_path, StreetSource};

// ── Arguments ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(author, version, about = "Street network geocoding and routing")]
struct Args {
    /// Network configuration (JSON).  Missing fields take their defaults.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Street centrelines, GeoJSON FeatureCollection of (Multi)LineStrings
    #[arg(long)]
    streets: PathBuf,
    /// Street coordinates are lon/lat rather than projected metres
    #[arg(long)]
    geographic: bool,
    /// Feature property holding the street id
    #[arg(long, default_value = "OBJECTID")]
    id_property: String,
    /// Address CSV (`id,label,longitude,latitude`)
    #[arg(long)]
    addresses: Option<PathBuf>,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Addresses whose label contains the query
    Geocode { query: String },
    /// Matching address labels, truncated to the configured limit
    Suggest { query: String },
    /// Nearest network node to a point
    Snap {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
    },
    /// Nearest street to a point
    NearestStreet {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
    },
    /// Shortest path between two node ids
    Route { start: u32, end: u32 },
    /// Shortest path between the first matches of two address queries
    FindPath { start: String, end: String },
    /// Build report and network diagnostics
    Analyze,
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .with_writer(std::io::stderr)
        .init();

    let service = build_service(&args)?;

    let out = match &args.cmd {
        Command::Geocode { query } => serde_json::to_value(service.geocode(query)?)?,
        Command::Suggest { query } => serde_json::to_value(service.suggest(query)?)?,
        Command::Snap { lat, lon } => serde_json::to_value(service.snap_to_network(*lat, *lon)?)?,
        Command::NearestStreet { lat, lon } => {
            serde_json::to_value(service.nearest_street(*lat, *lon)?)?
        }
        Command::Route { start, end } => {
            serde_json::to_value(service.route(NodeId(*start), NodeId(*end))?)?
        }
        Command::FindPath { start, end } => serde_json::to_value(service.find_path(start, end)?)?,
        Command::Analyze => analysis_json(&service),
    };

    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

// ── Setup ─────────────────────────────────────────────────────────────────────

/// `RUST_LOG` when set and parsable, else `info`.
fn log_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .filter(|s| !s.trim().is_empty())
        .and_then(|s| EnvFilter::try_new(s).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn load_config(path: Option<&Path>) -> Result<NetworkConfig> {
    let Some(path) = path else {
        return Ok(NetworkConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}

fn build_service(args: &Args) -> Result<RoutingService> {
    let config = load_config(args.config.as_deref())?;

    let projector = args.geographic.then_some(&config.projection as &dyn Projector);
    let source = StreetSource { id_property: &args.id_property, projector };
    let streets = load_streets_path(&args.streets, &source)
        .with_context(|| format!("loading streets from {}", args.streets.display()))?;

    let addresses = match &args.addresses {
        Some(path) => load_addresses_csv(path)
            .with_context(|| format!("loading addresses from {}", path.display()))?,
        None => Vec::new(),
    };

    let service = ServiceBuilder::new(config)
        .streets(streets)
        .addresses(addresses)
        .build()
        .context("building street network")?;

    info!(
        nodes = service.graph().node_count(),
        edges = service.graph().edge_count(),
        addresses = service.addresses().len(),
        "service ready"
    );
    Ok(service)
}

fn analysis_json(service: &RoutingService) -> serde_json::Value {
    let r = service.report();
    let a = service.analysis();
    let ids = |v: &[NodeId]| v.iter().map(|n| n.0).collect::<Vec<_>>();
    let edge_ids = |v: &[EdgeId]| v.iter().map(|e| e.0).collect::<Vec<_>>();
    let sample: Vec<serde_json::Value> = r
        .skipped_sample
        .iter()
        .map(|s| json!({ "streetId": s.street.0, "points": s.points }))
        .collect();
    json!({
        "build": {
            "streetsIn":     r.streets_in,
            "streetsUsed":   r.streets_used,
            "nodes":         r.nodes_out,
            "edges":         r.edges_out,
            "repaired":      r.repaired,
            "droppedParts":  r.dropped_parts,
            "selfLoops":     r.self_loops,
            "skipped":       r.skipped,
            "skippedSample": sample
        },
        "analysis": {
            "deadEnds":      ids(&a.dead_ends),
            "isolatedEdges": edge_ids(&a.isolated_edges),
            "rings":         edge_ids(&a.rings),
            "potentialGaps": ids(&a.potential_gaps),
            "components":    a.components
        }
    })
}
