//! Derived metrics
//!
//! Delivery rate, link status classification and fleet-wide totals computed
//! from a snapshot. These formulas are shared by every consumer (map markers,
//! table rows, summary cards) so they live here rather than in the views.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::SatelliteRecord;

/// Fraction of packets delivered. Zero when no packets were sent.
pub fn delivery_rate(delivered: u64, lost: u64) -> f64 {
    let total = delivered + lost;
    if total == 0 {
        return 0.0;
    }
    delivered as f64 / total as f64
}

/// Round half away from zero to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStatus {
    Good,
    Warning,
    Poor,
}

impl LinkStatus {
    /// Rates strictly above this are `Good`
    pub const GOOD_ABOVE: f64 = 0.95;
    /// Rates strictly above this (and not `Good`) are `Warning`
    pub const WARNING_ABOVE: f64 = 0.80;

    pub fn from_rate(rate: f64) -> Self {
        if rate > Self::GOOD_ABOVE {
            LinkStatus::Good
        } else if rate > Self::WARNING_ABOVE {
            LinkStatus::Warning
        } else {
            LinkStatus::Poor
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LinkStatus::Good => "good",
            LinkStatus::Warning => "warning",
            LinkStatus::Poor => "poor",
        }
    }
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl SatelliteRecord {
    pub fn total_packets(&self) -> u64 {
        self.packets_delivered + self.packets_lost
    }

    pub fn delivery_rate(&self) -> f64 {
        delivery_rate(self.packets_delivered, self.packets_lost)
    }

    pub fn delivery_rate_percent(&self) -> f64 {
        round2(self.delivery_rate() * 100.0)
    }

    pub fn status(&self) -> LinkStatus {
        LinkStatus::from_rate(self.delivery_rate())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub good: usize,
    pub warning: usize,
    pub poor: usize,
}

impl StatusCounts {
    fn add(&mut self, status: LinkStatus) {
        match status {
            LinkStatus::Good => self.good += 1,
            LinkStatus::Warning => self.warning += 1,
            LinkStatus::Poor => self.poor += 1,
        }
    }
}

/// Fleet-wide packet totals for the dashboard summary cards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetSummary {
    pub satellite_count: usize,
    pub total_packets: u64,
    pub total_delivered: u64,
    pub total_lost: u64,
    /// `round2(100 · delivered / total)`, or 0.0 for an empty fleet
    pub delivery_rate_percent: f64,
    pub status_counts: StatusCounts,
}

impl FleetSummary {
    pub fn from_records(records: &[SatelliteRecord]) -> Self {
        let mut summary = FleetSummary {
            satellite_count: records.len(),
            ..FleetSummary::default()
        };

        for record in records {
            summary.total_delivered += record.packets_delivered;
            summary.total_lost += record.packets_lost;
            summary.total_packets += record.total_packets();
            summary.status_counts.add(record.status());
        }

        if summary.total_packets > 0 {
            summary.delivery_rate_percent =
                round2(100.0 * summary.total_delivered as f64 / summary.total_packets as f64);
        }

        summary
    }
}
