//! Orbital path templates
//!
//! Static configuration bounding where a satellite may be placed. Satellite
//! `i` uses template `(i - 1) mod M`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrbitalPath {
    pub base_latitude: f64,
    pub base_longitude: f64,
    /// Peak latitude excursion either side of the base
    pub latitude_range: f64,
    /// Full longitude window centred on the base
    pub longitude_range: f64,
}

impl OrbitalPath {
    pub const fn new(
        base_latitude: f64,
        base_longitude: f64,
        latitude_range: f64,
        longitude_range: f64,
    ) -> Self {
        Self {
            base_latitude,
            base_longitude,
            latitude_range,
            longitude_range,
        }
    }

    pub(crate) fn is_well_formed(&self) -> bool {
        self.base_latitude.is_finite()
            && self.base_longitude.is_finite()
            && self.latitude_range.is_finite()
            && self.longitude_range.is_finite()
            && self.latitude_range >= 0.0
            && self.longitude_range >= 0.0
    }
}

/// Five polar planes followed by three equatorial ones.
pub const BULAN_ORBITAL_PATHS: [OrbitalPath; 8] = [
    // Polar
    OrbitalPath::new(0.0, -120.0, 80.0, 40.0),
    OrbitalPath::new(0.0, -60.0, 80.0, 40.0),
    OrbitalPath::new(0.0, 0.0, 80.0, 40.0),
    OrbitalPath::new(0.0, 60.0, 80.0, 40.0),
    OrbitalPath::new(0.0, 120.0, 80.0, 40.0),
    // Equatorial
    OrbitalPath::new(0.0, -150.0, 20.0, 60.0),
    OrbitalPath::new(0.0, -30.0, 20.0, 60.0),
    OrbitalPath::new(0.0, 90.0, 20.0, 60.0),
];
