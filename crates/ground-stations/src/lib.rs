//! Ground Stations Library
//!
//! Fixed registry of BULAN ground stations and the nearest-station
//! relation used to pair each satellite with a downlink site.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StationError {
    #[error("Station not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, StationError>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GroundStation {
    pub id: String,
    pub name: String,
    pub location: GeoLocation,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoLocation {
    /// Planar distance in raw degree space (not great-circle).
    pub fn degree_distance(&self, latitude: f64, longitude: f64) -> f64 {
        ((self.latitude - latitude).powi(2) + (self.longitude - longitude).powi(2)).sqrt()
    }
}

/// A station paired with its degree-space distance to a query point.
#[derive(Debug, Clone, Copy)]
pub struct NearestStation<'a> {
    pub station: &'a GroundStation,
    pub distance_deg: f64,
}

#[derive(Debug, Clone, Default)]
pub struct StationRegistry {
    stations: Vec<GroundStation>,
}

impl StationRegistry {
    pub fn new() -> Self {
        Self {
            stations: Vec::with_capacity(3),
        }
    }

    /// The three BULAN control sites, in priority order.
    pub fn with_bulan_network() -> Self {
        let mut registry = Self::new();
        registry.load_bulan_network();
        registry
    }

    fn load_bulan_network(&mut self) {
        let sites = [
            ("GS-1", "Main Control Center", 51.5074, -0.1278),
            ("GS-2", "Secondary Station", 40.7128, -74.006),
            ("GS-3", "Backup Station", 35.6762, 139.6503),
        ];

        for (id, name, lat, lon) in sites {
            self.register(id, name, lat, lon);
        }
    }

    /// Appends a station. List order is the tie-break order for [`nearest`](Self::nearest).
    pub fn register(&mut self, id: &str, name: &str, latitude: f64, longitude: f64) {
        self.stations.push(GroundStation {
            id: id.to_string(),
            name: name.to_string(),
            location: GeoLocation {
                latitude,
                longitude,
            },
        });
    }

    pub fn get(&self, id: &str) -> Result<&GroundStation> {
        self.stations
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| StationError::NotFound(id.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &GroundStation> {
        self.stations.iter()
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Closest station to `(latitude, longitude)` in degree space.
    ///
    /// Exact ties resolve to the station registered first.
    pub fn nearest(&self, latitude: f64, longitude: f64) -> Option<NearestStation<'_>> {
        let mut best: Option<NearestStation<'_>> = None;

        for station in &self.stations {
            let distance_deg = station.location.degree_distance(latitude, longitude);
            let closer = best.map_or(true, |current| distance_deg < current.distance_deg);
            if closer {
                best = Some(NearestStation {
                    station,
                    distance_deg,
                });
            }
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bulan_network_loads_three_sites() {
        let registry = StationRegistry::with_bulan_network();
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.get("GS-1").unwrap().name, "Main Control Center");
        assert!(matches!(
            registry.get("GS-9"),
            Err(StationError::NotFound(id)) if id == "GS-9"
        ));
    }

    #[test]
    fn test_nearest_uses_degree_space() {
        let registry = StationRegistry::with_bulan_network();

        // Just off New York
        let nearest = registry.nearest(41.0, -70.0).unwrap();
        assert_eq!(nearest.station.id, "GS-2");

        // Over Japan
        let nearest = registry.nearest(30.0, 130.0).unwrap();
        assert_eq!(nearest.station.id, "GS-3");

        // Exactly on London
        let nearest = registry.nearest(51.5074, -0.1278).unwrap();
        assert_eq!(nearest.station.id, "GS-1");
        assert_eq!(nearest.distance_deg, 0.0);
    }

    #[test]
    fn test_nearest_is_not_great_circle() {
        let mut registry = StationRegistry::new();
        // Across the antimeridian: great-circle says "east" is 2° away,
        // but degree space puts it 358° away.
        registry.register("east", "East", 0.0, 179.0);
        registry.register("west", "West", 0.0, -170.0);

        let nearest = registry.nearest(0.0, -179.0).unwrap();
        assert_eq!(nearest.station.id, "west");
    }

    #[test]
    fn test_nearest_tie_breaks_on_list_order() {
        let mut registry = StationRegistry::new();
        registry.register("a", "A", 10.0, 0.0);
        registry.register("b", "B", -10.0, 0.0);

        let nearest = registry.nearest(0.0, 0.0).unwrap();
        assert_eq!(nearest.station.id, "a");
        assert_eq!(nearest.distance_deg, 10.0);
    }

    #[test]
    fn test_nearest_is_deterministic() {
        let registry = StationRegistry::with_bulan_network();
        let first = registry.nearest(12.34, 56.78).unwrap();
        for _ in 0..10 {
            let again = registry.nearest(12.34, 56.78).unwrap();
            assert_eq!(again.station.id, first.station.id);
            assert_eq!(again.distance_deg, first.distance_deg);
        }
    }

    #[test]
    fn test_empty_registry_has_no_nearest() {
        let registry = StationRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.nearest(0.0, 0.0).is_none());
    }
}
