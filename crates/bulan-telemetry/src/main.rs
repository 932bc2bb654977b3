//! BULAN Snapshot CLI
//!
//! Generates one synthetic constellation snapshot and writes it as JSON.
//!
//! Usage:
//!   bulan-snapshot --seed 42 --summary --links
//!   bulan-snapshot --sort packetsLost --desc --search bulan-1 --output table.json

use anyhow::Result;
use bulan_telemetry::{
    assign_links, DownlinkAssignment, FleetSnapshot, FleetSummary, SimulatorConfig, SortDirection,
    SortField, TableRow, TableState, TelemetrySimulator, DEFAULT_FLEET_SIZE,
};
use clap::Parser;
use ground_stations::StationRegistry;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(
    name = "bulan-snapshot",
    about = "Generate a synthetic BULAN constellation telemetry snapshot"
)]
struct Args {
    /// Seed for reproducible output (random if omitted)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of satellites to generate
    #[arg(short = 'n', long, default_value_t = DEFAULT_FLEET_SIZE)]
    fleet_size: u32,

    /// Emit table rows sorted by this field (id, packetsDelivered, packetsLost, deliveryRate)
    #[arg(long)]
    sort: Option<SortField>,

    /// Sort descending
    #[arg(long)]
    desc: bool,

    /// Emit table rows whose name contains this text
    #[arg(long)]
    search: Option<String>,

    /// Include the fleet summary
    #[arg(long)]
    summary: bool,

    /// Include nearest ground station links
    #[arg(long)]
    links: bool,

    /// Output JSON file (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Report {
    #[serde(skip_serializing_if = "Option::is_none")]
    snapshot: Option<FleetSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    table: Option<Vec<TableRow>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<FleetSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    links: Option<Vec<DownlinkAssignment>>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = SimulatorConfig::default().with_fleet_size(args.fleet_size);
    let mut simulator = match args.seed {
        Some(seed) => {
            info!("Seeding simulator with {}", seed);
            TelemetrySimulator::seeded(config, seed)?
        }
        None => TelemetrySimulator::from_entropy(config)?,
    };

    let snapshot = simulator.snapshot()?;
    info!("Generated {} satellites", snapshot.len());

    let summary = snapshot.summary();
    debug!(
        "Fleet delivery {:.2}% ({} good / {} warning / {} poor)",
        summary.delivery_rate_percent,
        summary.status_counts.good,
        summary.status_counts.warning,
        summary.status_counts.poor
    );

    let table = if args.sort.is_some() || args.search.is_some() || args.desc {
        let state = TableState {
            sort_field: args.sort.unwrap_or_default(),
            direction: if args.desc {
                SortDirection::Desc
            } else {
                SortDirection::Asc
            },
            search: args.search.clone().unwrap_or_default(),
        };
        let rows = state.rows(&snapshot.satellites);
        info!("Table view: {} of {} satellites", rows.len(), snapshot.len());
        Some(rows)
    } else {
        None
    };

    let links = if args.links {
        let registry = StationRegistry::with_bulan_network();
        Some(assign_links(&snapshot.satellites, &registry))
    } else {
        None
    };

    let report = Report {
        snapshot: if table.is_none() { Some(snapshot) } else { None },
        table,
        summary: args.summary.then_some(summary),
        links,
    };

    match &args.output {
        Some(path) => {
            info!("Writing output to {:?}", path);
            let writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(writer, &report)?;
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            serde_json::to_writer_pretty(&mut writer, &report)?;
            writeln!(writer)?;
        }
    }

    Ok(())
}
