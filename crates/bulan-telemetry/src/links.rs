//! Satellite to ground station link assignment
//!
//! Each satellite downlinks through the nearest ground station, measured in
//! raw latitude/longitude degrees.

use ground_stations::StationRegistry;
use serde::{Deserialize, Serialize};

use crate::SatelliteRecord;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownlinkAssignment {
    pub satellite_id: u32,
    pub satellite_name: String,
    pub station_id: String,
    pub station_name: String,
    pub distance_deg: f64,
}

/// One assignment per satellite, in snapshot order. Empty when the registry is.
pub fn assign_links(
    records: &[SatelliteRecord],
    registry: &StationRegistry,
) -> Vec<DownlinkAssignment> {
    records
        .iter()
        .filter_map(|sat| {
            registry
                .nearest(sat.latitude, sat.longitude)
                .map(|nearest| DownlinkAssignment {
                    satellite_id: sat.id,
                    satellite_name: sat.name.clone(),
                    station_id: nearest.station.id.clone(),
                    station_name: nearest.station.name.clone(),
                    distance_deg: nearest.distance_deg,
                })
        })
        .collect()
}
