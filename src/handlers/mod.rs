/// HTTP request handlers
use crate::clients::FetchStates;
use crate::domain::{Health, PlaneDetail, PlaneList};
use crate::errors::ApiError;
use crate::services::TrackerService;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;

/// Application state shared across handlers
pub struct AppState<C: FetchStates> {
    pub tracker: Arc<TrackerService<C>>,
}

impl<C: FetchStates> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            tracker: Arc::clone(&self.tracker),
        }
    }
}

#[derive(Deserialize)]
pub struct TrackParams {
    pub icao24: Option<String>,
}

/// Health check handler
pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        now: Utc::now(),
    })
}

/// Candidate list of currently broadcasting, callsign-bearing aircraft
pub async fn list_planes<C: FetchStates>(
    State(state): State<AppState<C>>,
) -> Result<Json<PlaneList>, ApiError> {
    let list = state.tracker.plane_list().await?;
    Ok(Json(list))
}

/// Latest state for one aircraft, addressed by ICAO24 query parameter
pub async fn track_by_icao24<C: FetchStates>(
    Query(params): Query<TrackParams>,
    State(state): State<AppState<C>>,
) -> Result<Json<PlaneDetail>, ApiError> {
    let icao24 = params.icao24.ok_or_else(|| {
        ApiError::InvalidInput("icao24 is required. e.g. /track?icao24=4952ca".to_string())
    })?;

    match state.tracker.find_by_icao24(&icao24).await? {
        Some(detail) => Ok(Json(detail)),
        None => Err(ApiError::NotFound(icao24)),
    }
}

/// Latest state for one aircraft, addressed by callsign path segment
pub async fn track_by_callsign<C: FetchStates>(
    Path(callsign): Path<String>,
    State(state): State<AppState<C>>,
) -> Result<Json<PlaneDetail>, ApiError> {
    match state.tracker.find_by_callsign(&callsign).await? {
        Some(detail) => Ok(Json(detail)),
        None => Err(ApiError::NotFound(callsign)),
    }
}
