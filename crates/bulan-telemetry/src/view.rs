//! Dashboard view state
//!
//! Table sort/search and satellite selection as explicit state with pure
//! transitions. Nothing here touches the snapshot it is applied to.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

use crate::metrics::LinkStatus;
use crate::{FleetSnapshot, SatelliteRecord, TelemetryError};

/// Serializes as camelCase; parses the same lenient forms from any source
/// (query string, CLI flag, JSON).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "String")]
pub enum SortField {
    #[default]
    Id,
    PacketsDelivered,
    PacketsLost,
    DeliveryRate,
}

impl FromStr for SortField {
    type Err = TelemetryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "id" => Ok(SortField::Id),
            "packetsdelivered" | "delivered" => Ok(SortField::PacketsDelivered),
            "packetslost" | "lost" => Ok(SortField::PacketsLost),
            "deliveryrate" | "rate" => Ok(SortField::DeliveryRate),
            _ => Err(TelemetryError::UnknownSortField(s.to_string())),
        }
    }
}

impl TryFrom<String> for SortField {
    type Error = TelemetryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableAction {
    /// Same field flips direction; a new field starts ascending
    SortBy(SortField),
    Search(String),
    Reset,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableState {
    pub sort_field: SortField,
    pub direction: SortDirection,
    pub search: String,
}

/// Flattened row for the packet statistics table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    pub id: u32,
    pub name: String,
    pub packets_delivered: u64,
    pub packets_lost: u64,
    pub delivery_rate_percent: f64,
    pub status: LinkStatus,
}

impl From<&SatelliteRecord> for TableRow {
    fn from(record: &SatelliteRecord) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            packets_delivered: record.packets_delivered,
            packets_lost: record.packets_lost,
            delivery_rate_percent: record.delivery_rate_percent(),
            status: record.status(),
        }
    }
}

fn compare(field: SortField, a: &SatelliteRecord, b: &SatelliteRecord) -> Ordering {
    match field {
        SortField::Id => a.id.cmp(&b.id),
        SortField::PacketsDelivered => a.packets_delivered.cmp(&b.packets_delivered),
        SortField::PacketsLost => a.packets_lost.cmp(&b.packets_lost),
        SortField::DeliveryRate => a
            .delivery_rate()
            .partial_cmp(&b.delivery_rate())
            .unwrap_or(Ordering::Equal),
    }
}

impl TableState {
    pub fn reduce(self, action: TableAction) -> Self {
        match action {
            TableAction::SortBy(field) if field == self.sort_field => Self {
                direction: self.direction.flipped(),
                ..self
            },
            TableAction::SortBy(field) => Self {
                sort_field: field,
                direction: SortDirection::Asc,
                ..self
            },
            TableAction::Search(search) => Self { search, ..self },
            TableAction::Reset => Self::default(),
        }
    }

    pub fn matches(&self, record: &SatelliteRecord) -> bool {
        self.search.is_empty()
            || record
                .name
                .to_lowercase()
                .contains(&self.search.to_lowercase())
    }

    /// Filtered and sorted copy of `records`. Equal keys keep source order.
    pub fn apply(&self, records: &[SatelliteRecord]) -> Vec<SatelliteRecord> {
        let mut visible: Vec<SatelliteRecord> =
            records.iter().filter(|r| self.matches(r)).cloned().collect();

        visible.sort_by(|a, b| match self.direction {
            SortDirection::Asc => compare(self.sort_field, a, b),
            SortDirection::Desc => compare(self.sort_field, b, a),
        });

        visible
    }

    pub fn rows(&self, records: &[SatelliteRecord]) -> Vec<TableRow> {
        self.apply(records).iter().map(TableRow::from).collect()
    }
}

/// Which satellite, if any, the operator has selected on the map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    pub selected: Option<u32>,
}

impl SelectionState {
    pub fn select(self, id: u32) -> Self {
        Self { selected: Some(id) }
    }

    pub fn clear(self) -> Self {
        Self { selected: None }
    }

    /// Drops the selection if the satellite is absent from `snapshot`.
    pub fn retain_in(self, snapshot: &FleetSnapshot) -> Self {
        match self.selected {
            Some(id) if snapshot.find(id).is_ok() => self,
            _ => self.clear(),
        }
    }

    pub fn resolve<'a>(&self, snapshot: &'a FleetSnapshot) -> Option<&'a SatelliteRecord> {
        self.selected.and_then(|id| snapshot.find(id).ok())
    }
}
