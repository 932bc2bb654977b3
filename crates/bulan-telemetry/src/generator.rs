//! Snapshot generator
//!
//! Produces a full fleet snapshot from a [`SimulatorConfig`], an injected
//! random source and a clock value. Random draws happen in a fixed order per
//! satellite (orbit progress, longitude, altitude, delivery jitter, packet
//! count, staleness) so a seeded RNG reproduces the same snapshot.

use chrono::{DateTime, Duration, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use crate::orbits::{OrbitalPath, BULAN_ORBITAL_PATHS};
use crate::{
    FleetSnapshot, Result, SatelliteRecord, TelemetryError, DEFAULT_FLEET_SIZE,
    DEFAULT_NAME_PREFIX,
};

/// Every constant that shapes a generated snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulatorConfig {
    pub fleet_size: u32,
    pub name_prefix: String,
    pub orbital_paths: Vec<OrbitalPath>,
    pub altitude_base_km: f64,
    pub altitude_span_km: f64,
    /// Delivery rate of a hypothetical satellite with id 0
    pub base_delivery_rate: f64,
    /// Added in proportion to `id / fleet_size`; newer hardware performs better
    pub delivery_rate_spread: f64,
    /// Symmetric jitter half-width
    pub delivery_jitter: f64,
    pub min_delivery_rate: f64,
    pub max_delivery_rate: f64,
    /// Inclusive
    pub min_packets: u64,
    /// Exclusive
    pub max_packets: u64,
    pub staleness_window_secs: u64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            fleet_size: DEFAULT_FLEET_SIZE,
            name_prefix: DEFAULT_NAME_PREFIX.to_string(),
            orbital_paths: BULAN_ORBITAL_PATHS.to_vec(),
            altitude_base_km: 500.0,
            altitude_span_km: 100.0,
            base_delivery_rate: 0.75,
            delivery_rate_spread: 0.20,
            delivery_jitter: 0.05,
            min_delivery_rate: 0.0,
            max_delivery_rate: 0.99,
            min_packets: 10_000,
            max_packets: 100_000,
            staleness_window_secs: 3600,
        }
    }
}

/// Largest fleet a single snapshot may hold
pub const MAX_FLEET_SIZE: u32 = 10_000;

/// Upper bound on how stale a generated `lastUpdated` may be (one week)
pub const MAX_STALENESS_WINDOW_SECS: u64 = 7 * 24 * 3600;

fn failure(reason: impl Into<String>) -> TelemetryError {
    TelemetryError::GenerationFailure(reason.into())
}

fn check_non_negative(value: f64, what: &str) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(failure(format!("{} must be finite and non-negative, got {}", what, value)))
    }
}

impl SimulatorConfig {
    pub fn with_fleet_size(mut self, fleet_size: u32) -> Self {
        self.fleet_size = fleet_size;
        self
    }

    /// Rejects any configuration that could yield a corrupt record.
    pub fn validate(&self) -> Result<()> {
        if self.fleet_size == 0 {
            return Err(failure("fleet size must be positive"));
        }
        if self.fleet_size > MAX_FLEET_SIZE {
            return Err(failure(format!(
                "fleet size {} exceeds the maximum of {}",
                self.fleet_size, MAX_FLEET_SIZE
            )));
        }
        if self.orbital_paths.is_empty() {
            return Err(failure("at least one orbital path template is required"));
        }
        if let Some(idx) = self.orbital_paths.iter().position(|p| !p.is_well_formed()) {
            return Err(failure(format!("orbital path {} has an invalid range", idx + 1)));
        }

        if !self.altitude_base_km.is_finite() {
            return Err(failure("altitude base must be finite"));
        }
        check_non_negative(self.altitude_span_km, "altitude span")?;
        if !self.base_delivery_rate.is_finite() {
            return Err(failure("base delivery rate must be finite"));
        }
        check_non_negative(self.delivery_rate_spread, "delivery rate spread")?;
        check_non_negative(self.delivery_jitter, "delivery jitter")?;

        let rates_ordered = self.min_delivery_rate >= 0.0
            && self.min_delivery_rate <= self.max_delivery_rate
            && self.max_delivery_rate <= 1.0;
        if !rates_ordered {
            return Err(failure(format!(
                "delivery rate clamp [{}, {}] must lie within [0, 1]",
                self.min_delivery_rate, self.max_delivery_rate
            )));
        }

        if self.min_packets == 0 {
            return Err(failure("minimum packet count must be positive"));
        }
        if self.min_packets >= self.max_packets {
            return Err(failure(format!(
                "packet range [{}, {}) is empty",
                self.min_packets, self.max_packets
            )));
        }

        if self.staleness_window_secs > MAX_STALENESS_WINDOW_SECS {
            return Err(failure(format!(
                "staleness window {}s exceeds the maximum of {}s",
                self.staleness_window_secs, MAX_STALENESS_WINDOW_SECS
            )));
        }

        Ok(())
    }

    /// Clamped delivery rate for satellite `id`. Consumes one draw.
    fn sample_delivery_rate<R: Rng + ?Sized>(&self, id: u32, rng: &mut R) -> f64 {
        let base = self.base_delivery_rate
            + (id as f64 / self.fleet_size as f64) * self.delivery_rate_spread;
        let jitter = rng.gen::<f64>() * 2.0 * self.delivery_jitter - self.delivery_jitter;
        (base + jitter).clamp(self.min_delivery_rate, self.max_delivery_rate)
    }
}

/// Generate one snapshot. Fails fast on an invalid config; never returns a
/// partial fleet.
pub fn generate_snapshot<R: Rng + ?Sized>(
    config: &SimulatorConfig,
    rng: &mut R,
    now: DateTime<Utc>,
    generation: u64,
) -> Result<FleetSnapshot> {
    config.validate()?;

    let templates = &config.orbital_paths;
    let staleness_ms = config.staleness_window_secs.saturating_mul(1000) as f64;
    let mut satellites = Vec::with_capacity(config.fleet_size as usize);

    for id in 1..=config.fleet_size {
        let path = &templates[(id as usize - 1) % templates.len()];

        let orbit_progress: f64 = rng.gen();
        let longitude = path.base_longitude
            + (rng.gen::<f64>() * path.longitude_range - path.longitude_range / 2.0);
        let latitude = path.base_latitude + (orbit_progress * TAU).sin() * path.latitude_range;
        let altitude = config.altitude_base_km + rng.gen::<f64>() * config.altitude_span_km;

        let delivery_rate = config.sample_delivery_rate(id, rng);
        let total_packets = rng.gen_range(config.min_packets..config.max_packets);
        let packets_delivered =
            ((total_packets as f64 * delivery_rate).floor() as u64).min(total_packets);
        let packets_lost = total_packets - packets_delivered;

        let age_ms = (rng.gen::<f64>() * staleness_ms) as i64;
        let last_updated = now
            .checked_sub_signed(Duration::milliseconds(age_ms))
            .ok_or_else(|| failure(format!("timestamp for satellite {} out of range", id)))?;

        satellites.push(SatelliteRecord {
            id,
            name: format!("{}-{}", config.name_prefix, id),
            latitude,
            longitude,
            altitude,
            packets_delivered,
            packets_lost,
            last_updated,
        });
    }

    Ok(FleetSnapshot {
        generation,
        generated_at: now,
        satellites,
    })
}

/// Stateful wrapper owning the RNG and numbering successive snapshots.
#[derive(Debug)]
pub struct TelemetrySimulator<R = ChaCha8Rng> {
    config: SimulatorConfig,
    rng: R,
    generation: u64,
}

impl<R: Rng> TelemetrySimulator<R> {
    pub fn new(config: SimulatorConfig, rng: R) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            rng,
            generation: 0,
        })
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Generation number of the last successful snapshot (0 before the first).
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn snapshot_at(&mut self, now: DateTime<Utc>) -> Result<FleetSnapshot> {
        let next = self.generation + 1;
        let snapshot = generate_snapshot(&self.config, &mut self.rng, now, next)?;
        self.generation = next;
        Ok(snapshot)
    }

    pub fn snapshot(&mut self) -> Result<FleetSnapshot> {
        self.snapshot_at(Utc::now())
    }
}

impl TelemetrySimulator<ChaCha8Rng> {
    pub fn seeded(config: SimulatorConfig, seed: u64) -> Result<Self> {
        Self::new(config, ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn from_entropy(config: SimulatorConfig) -> Result<Self> {
        Self::new(config, ChaCha8Rng::from_entropy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    fn seeded_snapshot(seed: u64) -> FleetSnapshot {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        generate_snapshot(&SimulatorConfig::default(), &mut rng, fixed_now(), 1).unwrap()
    }

    #[test]
    fn test_default_fleet_has_eight_ascending_ids() {
        let snapshot = seeded_snapshot(7);
        let ids: Vec<u32> = snapshot.satellites.iter().map(|s| s.id).collect();
        assert_eq!(ids, (1..=8).collect::<Vec<_>>());
        assert_eq!(snapshot.satellites[0].name, "BULAN-1");
        assert_eq!(snapshot.satellites[7].name, "BULAN-8");
    }

    #[test]
    fn test_same_seed_same_snapshot() {
        assert_eq!(seeded_snapshot(42), seeded_snapshot(42));
        assert_ne!(seeded_snapshot(42), seeded_snapshot(43));
    }

    #[test]
    fn test_positions_respect_templates() {
        let snapshot = seeded_snapshot(1);
        for sat in &snapshot.satellites {
            let path = BULAN_ORBITAL_PATHS[(sat.id as usize - 1) % BULAN_ORBITAL_PATHS.len()];
            assert!((sat.latitude - path.base_latitude).abs() <= path.latitude_range);
            assert!((sat.longitude - path.base_longitude).abs() <= path.longitude_range / 2.0);
            assert!(sat.altitude >= 500.0 && sat.altitude < 600.0);
        }
    }

    #[test]
    fn test_templates_cycle_when_fleet_exceeds_paths() {
        let config = SimulatorConfig {
            orbital_paths: vec![
                OrbitalPath::new(10.0, 100.0, 0.0, 0.0),
                OrbitalPath::new(-10.0, -100.0, 0.0, 0.0),
            ],
            ..SimulatorConfig::default()
        }
        .with_fleet_size(5);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let snapshot = generate_snapshot(&config, &mut rng, fixed_now(), 1).unwrap();

        let lons: Vec<f64> = snapshot.satellites.iter().map(|s| s.longitude).collect();
        assert_eq!(lons, vec![100.0, -100.0, 100.0, -100.0, 100.0]);
        let lats: Vec<f64> = snapshot.satellites.iter().map(|s| s.latitude).collect();
        assert_eq!(lats, vec![10.0, -10.0, 10.0, -10.0, 10.0]);
    }

    #[test]
    fn test_last_updated_within_the_hour() {
        let snapshot = seeded_snapshot(9);
        for sat in &snapshot.satellites {
            assert!(sat.last_updated <= fixed_now());
            assert!(sat.last_updated > fixed_now() - Duration::seconds(3600));
        }
        assert_eq!(snapshot.generated_at, fixed_now());
    }

    #[test]
    fn test_lower_clamp_holds_for_hostile_parameters() {
        let config = SimulatorConfig {
            base_delivery_rate: -2.0,
            ..SimulatorConfig::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let snapshot = generate_snapshot(&config, &mut rng, fixed_now(), 1).unwrap();
        for sat in &snapshot.satellites {
            assert_eq!(sat.packets_delivered, 0);
            assert!(sat.packets_lost >= 10_000);
        }
    }

    #[test]
    fn test_largest_allowed_window_still_generates() {
        let config = SimulatorConfig {
            staleness_window_secs: MAX_STALENESS_WINDOW_SECS,
            ..SimulatorConfig::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let snapshot = generate_snapshot(&config, &mut rng, fixed_now(), 1).unwrap();
        let oldest = fixed_now() - Duration::seconds(MAX_STALENESS_WINDOW_SECS as i64);
        assert!(snapshot.satellites.iter().all(|s| s.last_updated > oldest));
    }

    #[test]
    fn test_invalid_configs_fail_fast() {
        let cases = vec![
            SimulatorConfig::default().with_fleet_size(0),
            SimulatorConfig {
                orbital_paths: Vec::new(),
                ..SimulatorConfig::default()
            },
            SimulatorConfig {
                orbital_paths: vec![OrbitalPath::new(0.0, 0.0, -5.0, 10.0)],
                ..SimulatorConfig::default()
            },
            SimulatorConfig {
                altitude_span_km: -1.0,
                ..SimulatorConfig::default()
            },
            SimulatorConfig {
                delivery_jitter: f64::NAN,
                ..SimulatorConfig::default()
            },
            SimulatorConfig {
                min_delivery_rate: 0.5,
                max_delivery_rate: 0.4,
                ..SimulatorConfig::default()
            },
            SimulatorConfig {
                max_delivery_rate: 1.5,
                ..SimulatorConfig::default()
            },
            SimulatorConfig {
                min_packets: 0,
                ..SimulatorConfig::default()
            },
            SimulatorConfig {
                min_packets: 100,
                max_packets: 100,
                ..SimulatorConfig::default()
            },
            SimulatorConfig::default().with_fleet_size(4_000_000_000),
            SimulatorConfig {
                staleness_window_secs: u64::MAX,
                ..SimulatorConfig::default()
            },
        ];

        for config in cases {
            let mut rng = ChaCha8Rng::seed_from_u64(0);
            let result = generate_snapshot(&config, &mut rng, fixed_now(), 1);
            assert!(
                matches!(result, Err(TelemetryError::GenerationFailure(_))),
                "config should be rejected: {:?}",
                config
            );
            assert!(TelemetrySimulator::new(config, rng).is_err());
        }
    }

    #[test]
    fn test_simulator_numbers_generations() {
        let mut sim = TelemetrySimulator::seeded(SimulatorConfig::default(), 5).unwrap();
        assert_eq!(sim.generation(), 0);

        let first = sim.snapshot_at(fixed_now()).unwrap();
        let second = sim.snapshot_at(fixed_now()).unwrap();
        assert_eq!(first.generation, 1);
        assert_eq!(second.generation, 2);
        assert_eq!(sim.generation(), 2);
        // Fresh values each call, same ids
        assert_ne!(first.satellites, second.satellites);
        assert!(first
            .satellites
            .iter()
            .zip(&second.satellites)
            .all(|(a, b)| a.id == b.id));
    }

    #[test]
    fn test_seeded_simulators_agree() {
        let mut a = TelemetrySimulator::seeded(SimulatorConfig::default(), 99).unwrap();
        let mut b = TelemetrySimulator::seeded(SimulatorConfig::default(), 99).unwrap();
        for _ in 0..3 {
            assert_eq!(a.snapshot_at(fixed_now()).unwrap(), b.snapshot_at(fixed_now()).unwrap());
        }
    }

    proptest! {
        #[test]
        fn prop_packets_are_conserved_and_positive(seed in any::<u64>()) {
            let snapshot = seeded_snapshot(seed);
            prop_assert_eq!(snapshot.satellites.len(), 8);
            for sat in &snapshot.satellites {
                let total = sat.packets_delivered + sat.packets_lost;
                prop_assert!(total >= 10_000 && total < 100_000);
                prop_assert!(total > 0);
            }
        }

        #[test]
        fn prop_delivery_rate_is_bounded(seed in any::<u64>()) {
            let snapshot = seeded_snapshot(seed);
            for sat in &snapshot.satellites {
                let rate = sat.packets_delivered as f64
                    / (sat.packets_delivered + sat.packets_lost) as f64;
                prop_assert!(rate > 0.0, "rate {} for {}", rate, sat.name);
                prop_assert!(rate <= 0.99, "rate {} for {}", rate, sat.name);
            }
        }

        #[test]
        fn prop_fleet_size_controls_ids(fleet_size in 1u32..64, seed in any::<u64>()) {
            let config = SimulatorConfig::default().with_fleet_size(fleet_size);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let snapshot = generate_snapshot(&config, &mut rng, fixed_now(), 1).unwrap();
            let ids: Vec<u32> = snapshot.satellites.iter().map(|s| s.id).collect();
            prop_assert_eq!(ids, (1..=fleet_size).collect::<Vec<_>>());
        }
    }
}
