/// Domain models for the application
use crate::utils::{num, opt_bool, opt_i64, opt_str};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One row of the OpenSky /states/all feed.
///
/// The upstream payload is an array of positional arrays; all fields other
/// than the ICAO24 address may be null.
#[derive(Debug, Clone, PartialEq)]
pub struct StateVector {
    pub icao24: String,
    pub callsign: Option<String>,
    pub origin_country: Option<String>,
    pub time_position: Option<i64>,
    pub last_contact: Option<i64>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub baro_altitude: Option<f64>,
    pub on_ground: Option<bool>,
    pub velocity: Option<f64>,
    pub heading: Option<f64>,
    pub vertical_rate: Option<f64>,
    pub geo_altitude: Option<f64>,
}

impl StateVector {
    /// Decode one positional row. Index 13 is the geometric altitude.
    pub fn from_row(row: &[Value]) -> Option<Self> {
        let get = |i: usize| row.get(i).unwrap_or(&Value::Null);
        let icao24 = opt_str(get(0))?;

        Some(Self {
            icao24,
            callsign: opt_str(get(1)),
            origin_country: opt_str(get(2)),
            time_position: opt_i64(get(3)),
            last_contact: opt_i64(get(4)),
            longitude: num(get(5)),
            latitude: num(get(6)),
            baro_altitude: num(get(7)),
            on_ground: opt_bool(get(8)),
            velocity: num(get(9)),
            heading: num(get(10)),
            vertical_rate: num(get(11)),
            geo_altitude: num(get(13)),
        })
    }

    /// Trimmed, uppercased callsign; empty when the raw callsign is blank
    pub fn normalized_callsign(&self) -> String {
        self.callsign
            .as_deref()
            .map(|c| c.trim().to_uppercase())
            .unwrap_or_default()
    }

    /// Geometric altitude when present, barometric otherwise (meters)
    pub fn resolved_altitude(&self) -> Option<f64> {
        self.geo_altitude
            .filter(|a| !a.is_nan())
            .or(self.baro_altitude)
    }
}

/// Decode the raw feed payload into state vectors.
///
/// Rows that cannot be decoded (no ICAO24, not an array) are skipped.
pub fn parse_feed(payload: &Value) -> Vec<StateVector> {
    payload
        .get("states")
        .and_then(|s| s.as_array())
        .map(|rows| {
            rows.iter()
                .filter_map(|row| row.as_array())
                .filter_map(|row| StateVector::from_row(row))
                .collect()
        })
        .unwrap_or_default()
}

/// Origin of a returned data payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Live,
    Cache,
    Snapshot,
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provenance::Live => write!(f, "live"),
            Provenance::Cache => write!(f, "cache"),
            Provenance::Snapshot => write!(f, "snapshot"),
        }
    }
}

/// How to render an absent on_ground flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnGroundPolicy {
    /// Keep the unknown state as null
    #[default]
    Preserve,
    /// Coerce unknown to false
    AssumeAirborne,
}

impl OnGroundPolicy {
    pub fn apply(&self, on_ground: Option<bool>) -> Option<bool> {
        match self {
            OnGroundPolicy::Preserve => on_ground,
            OnGroundPolicy::AssumeAirborne => Some(on_ground.unwrap_or(false)),
        }
    }
}

/// Candidate list entry
#[derive(Debug, Clone, Serialize)]
pub struct PlaneSummary {
    pub callsign: String,
    pub icao24: String,
    pub origin_country: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub on_ground: Option<bool>,
    pub rough_location: String,
    pub last_contact: String,
}

/// Full single-aircraft projection
#[derive(Debug, Clone, Serialize)]
pub struct PlaneDetail {
    pub callsign: String,
    pub icao24: String,
    pub origin_country: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub baro_altitude: Option<f64>,
    pub geo_altitude: Option<f64>,
    pub velocity: Option<f64>,
    pub heading: Option<f64>,
    pub vertical_rate: Option<f64>,
    pub on_ground: Option<bool>,
    pub time_position: String,
    pub last_contact: String,
    pub rough_location: String,
    pub comment_text: String,
}

/// Candidate list response
#[derive(Debug, Serialize)]
pub struct PlaneList {
    pub source: Provenance,
    pub count: usize,
    pub planes: Vec<PlaneSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
}

/// Health check response
#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
    pub now: DateTime<Utc>,
}
