use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use bulan_telemetry::{
    assign_links, DownlinkAssignment, FleetSnapshot, FleetSummary, SatelliteDetail,
    SortDirection, SortField, TableRow, TableState,
};
use ground_stations::{GroundStation, StationRegistry};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::feed::{SimulatedFeed, SnapshotStore};

#[derive(Clone)]
pub struct AppState {
    pub feed: Arc<SimulatedFeed>,
    pub store: Arc<SnapshotStore>,
    pub stations: Arc<StationRegistry>,
}

type ApiError = (StatusCode, String);

#[derive(Deserialize, Default)]
pub struct TableQuery {
    pub sort: Option<SortField>,
    pub direction: Option<SortDirection>,
    pub search: Option<String>,
}

impl From<TableQuery> for TableState {
    fn from(query: TableQuery) -> Self {
        TableState {
            sort_field: query.sort.unwrap_or_default(),
            direction: query.direction.unwrap_or_default(),
            search: query.search.unwrap_or_default(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub generation: u64,
    pub satellite_count: usize,
}

async fn current(state: &AppState) -> Result<Arc<FleetSnapshot>, ApiError> {
    state.store.current().await.ok_or((
        StatusCode::SERVICE_UNAVAILABLE,
        "No telemetry snapshot loaded yet".to_string(),
    ))
}

pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let status = state.store.status().await;

    Json(serde_json::json!({
        "status": if status.generation.is_some() { "healthy" } else { "loading" },
        "service": "bulan-gateway",
        "constellation": "BULAN",
        "version": env!("CARGO_PKG_VERSION"),
        "feed": status,
    }))
}

/// GET /snapshot - Current snapshot as generated
pub async fn get_snapshot(State(state): State<AppState>) -> Result<Json<FleetSnapshot>, ApiError> {
    let snapshot = current(&state).await?;
    Ok(Json(snapshot.as_ref().clone()))
}

/// GET /satellites - Filtered and sorted table rows
pub async fn list_satellites(
    State(state): State<AppState>,
    Query(query): Query<TableQuery>,
) -> Result<Json<Vec<TableRow>>, ApiError> {
    let snapshot = current(&state).await?;
    let table = TableState::from(query);
    Ok(Json(table.rows(&snapshot.satellites)))
}

/// GET /satellites/:id - Detail card for one satellite
pub async fn get_satellite(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<SatelliteDetail>, ApiError> {
    let snapshot = current(&state).await?;
    let record = snapshot
        .find(id)
        .map_err(|e| (StatusCode::NOT_FOUND, e.to_string()))?;

    Ok(Json(SatelliteDetail::from_record(record, &state.stations)))
}

pub async fn get_summary(State(state): State<AppState>) -> Result<Json<FleetSummary>, ApiError> {
    let snapshot = current(&state).await?;
    Ok(Json(snapshot.summary()))
}

pub async fn list_ground_stations(State(state): State<AppState>) -> Json<Vec<GroundStation>> {
    Json(state.stations.iter().cloned().collect())
}

/// GET /links - Nearest ground station per satellite
pub async fn list_links(
    State(state): State<AppState>,
) -> Result<Json<Vec<DownlinkAssignment>>, ApiError> {
    let snapshot = current(&state).await?;
    Ok(Json(assign_links(&snapshot.satellites, &state.stations)))
}

/// POST /refresh - Fetch a snapshot now instead of waiting for the poller
pub async fn refresh(State(state): State<AppState>) -> Result<Json<RefreshResponse>, ApiError> {
    let result = state.feed.fetch_snapshot().await;
    let satellite_count = result.as_ref().map(|s| s.len()).unwrap_or(0);

    let generation = state.store.record(result).await.map_err(|e| {
        tracing::error!("Manual refresh failed: {}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    Ok(Json(RefreshResponse {
        generation,
        satellite_count,
    }))
}

pub fn api_routes(state: AppState) -> Router {
    let telemetry_routes = Router::new()
        .route("/snapshot", get(get_snapshot))
        .route("/satellites", get(list_satellites))
        .route("/satellites/:id", get(get_satellite))
        .route("/summary", get(get_summary))
        .route("/ground-stations", get(list_ground_stations))
        .route("/links", get(list_links))
        .route("/refresh", post(refresh));

    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", telemetry_routes)
        .with_state(state)
}
