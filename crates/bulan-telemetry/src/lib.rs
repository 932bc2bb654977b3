//! BULAN Telemetry Library
//!
//! Synthetic telemetry for the 8-satellite BULAN nanosatellite constellation:
//! randomized snapshot generation bounded by orbital path templates, plus the
//! derived metrics (delivery rate, link status, fleet totals) the dashboard
//! consumes.
//!
//! # Snapshot Generation
//!
//! | Quantity | Distribution |
//! |----------|--------------|
//! | Longitude | `base ± range/2`, uniform |
//! | Latitude | `base + sin(2π·progress)·range` |
//! | Altitude | 500-600 km, uniform |
//! | Delivery rate | `0.75 + (id/N)·0.20 ± 0.05`, clamped to `[0, 0.99]` |
//! | Total packets | 10,000-100,000, uniform integer |
//! | Last updated | within the hour before generation |
//!
//! Generation is a pure function of the config, an injected RNG and the
//! clock value, so a fixed seed reproduces a snapshot exactly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod detail;
pub mod generator;
pub mod links;
pub mod metrics;
pub mod orbits;
pub mod view;

pub use detail::SatelliteDetail;
pub use generator::{generate_snapshot, SimulatorConfig, TelemetrySimulator};
pub use links::{assign_links, DownlinkAssignment};
pub use metrics::{FleetSummary, LinkStatus, StatusCounts};
pub use orbits::OrbitalPath;
pub use view::{SelectionState, SortDirection, SortField, TableAction, TableRow, TableState};

/// Name prefix for constellation members
pub const DEFAULT_NAME_PREFIX: &str = "BULAN";

/// Number of satellites in the BULAN constellation
pub const DEFAULT_FLEET_SIZE: u32 = 8;

#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Snapshot generation failed: {0}")]
    GenerationFailure(String),
    #[error("Satellite not found: {0}")]
    SatelliteNotFound(u32),
    #[error("Unknown sort field: {0}")]
    UnknownSortField(String),
}

pub type Result<T> = std::result::Result<T, TelemetryError>;

/// One constellation member at the moment of generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SatelliteRecord {
    pub id: u32,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Kilometers
    pub altitude: f64,
    pub packets_delivered: u64,
    pub packets_lost: u64,
    pub last_updated: DateTime<Utc>,
}

/// A complete, immutable generation of every satellite record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetSnapshot {
    pub generation: u64,
    pub generated_at: DateTime<Utc>,
    /// Ascending by `id`
    pub satellites: Vec<SatelliteRecord>,
}

impl FleetSnapshot {
    pub fn len(&self) -> usize {
        self.satellites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.satellites.is_empty()
    }

    pub fn find(&self, id: u32) -> Result<&SatelliteRecord> {
        self.satellites
            .iter()
            .find(|s| s.id == id)
            .ok_or(TelemetryError::SatelliteNotFound(id))
    }

    pub fn summary(&self) -> FleetSummary {
        FleetSummary::from_records(&self.satellites)
    }
}
