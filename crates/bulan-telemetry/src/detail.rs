//! Per-satellite detail card
//!
//! Link rates and orbital period here are nominal per-id figures, not
//! sampled telemetry.

use ground_stations::StationRegistry;
use serde::{Deserialize, Serialize};

use crate::metrics::LinkStatus;
use crate::SatelliteRecord;

/// Footprint radius drawn around each satellite
pub const COVERAGE_RADIUS_KM: f64 = 1000.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationRef {
    pub id: String,
    pub name: String,
    pub distance_deg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SatelliteDetail {
    #[serde(flatten)]
    pub record: SatelliteRecord,
    pub delivery_rate_percent: f64,
    pub status: LinkStatus,
    pub orbital_period_min: f64,
    pub uplink_rate_pps: f64,
    pub downlink_rate_pps: f64,
    pub coverage_radius_km: f64,
    pub nearest_station: Option<StationRef>,
}

impl SatelliteDetail {
    pub fn from_record(record: &SatelliteRecord, registry: &StationRegistry) -> Self {
        let id = record.id as f64;
        let nearest_station = registry
            .nearest(record.latitude, record.longitude)
            .map(|n| StationRef {
                id: n.station.id.clone(),
                name: n.station.name.clone(),
                distance_deg: n.distance_deg,
            });

        Self {
            record: record.clone(),
            delivery_rate_percent: record.delivery_rate_percent(),
            status: record.status(),
            orbital_period_min: 90.0 + id * 2.0,
            uplink_rate_pps: 10.0 + id * 2.0,
            downlink_rate_pps: 8.0 + id * 1.5,
            coverage_radius_km: COVERAGE_RADIUS_KM,
            nearest_station,
        }
    }
}
