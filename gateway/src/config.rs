//! Gateway configuration from the environment
//!
//! | Variable | Default |
//! |----------|---------|
//! | `BULAN_GATEWAY_PORT` / `PORT` | 18601 |
//! | `BULAN_POLL_INTERVAL_SECS` | 30 |
//! | `BULAN_FETCH_DELAY_MS` | 800 |
//! | `BULAN_FLEET_SIZE` | 8 |
//! | `BULAN_SEED` | unset (entropy) |

use bulan_telemetry::DEFAULT_FLEET_SIZE;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 18601;
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;
pub const DEFAULT_FETCH_DELAY_MS: u64 = 800;

#[derive(Debug, Clone, PartialEq)]
pub struct GatewayConfig {
    pub port: u16,
    pub poll_interval: Duration,
    pub fetch_delay: Duration,
    pub fleet_size: u32,
    pub seed: Option<u64>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            fetch_delay: Duration::from_millis(DEFAULT_FETCH_DELAY_MS),
            fleet_size: DEFAULT_FLEET_SIZE,
            seed: None,
        }
    }
}

/// Parse `raw` if present; warn and fall back on garbage.
fn parse_or<T: FromStr>(name: &str, raw: Option<String>, default: T) -> T {
    match raw {
        Some(value) => value.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("   Ignoring invalid {}={:?}", name, value);
            default
        }),
        None => default,
    }
}

impl GatewayConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let port = parse_or(
            "BULAN_GATEWAY_PORT",
            lookup("BULAN_GATEWAY_PORT").or_else(|| lookup("PORT")),
            defaults.port,
        );
        let poll_secs = parse_or(
            "BULAN_POLL_INTERVAL_SECS",
            lookup("BULAN_POLL_INTERVAL_SECS"),
            DEFAULT_POLL_INTERVAL_SECS,
        );
        let delay_ms = parse_or(
            "BULAN_FETCH_DELAY_MS",
            lookup("BULAN_FETCH_DELAY_MS"),
            DEFAULT_FETCH_DELAY_MS,
        );
        let fleet_size = parse_or("BULAN_FLEET_SIZE", lookup("BULAN_FLEET_SIZE"), defaults.fleet_size);
        let seed = lookup("BULAN_SEED").and_then(|raw| match raw.trim().parse() {
            Ok(seed) => Some(seed),
            Err(_) => {
                tracing::warn!("   Ignoring invalid BULAN_SEED={:?}", raw);
                None
            }
        });

        Self {
            port,
            // A zero period would make tokio's interval panic
            poll_interval: Duration::from_secs(poll_secs.max(1)),
            fetch_delay: Duration::from_millis(delay_ms),
            fleet_size,
            seed,
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}
