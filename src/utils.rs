/// Utility functions
use chrono::{TimeZone, Utc};
use serde_json::Value;

/// Meters to feet conversion factor
pub const METERS_TO_FEET: f64 = 3.28084;

/// Extract number from JSON value
pub fn num(v: &Value) -> Option<f64> {
    if let Some(x) = v.as_f64() {
        return Some(x);
    }
    if let Some(s) = v.as_str() {
        return s.parse::<f64>().ok();
    }
    None
}

/// Extract non-empty string from JSON value
pub fn opt_str(v: &Value) -> Option<String> {
    v.as_str()
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

/// Extract integer epoch from JSON value
pub fn opt_i64(v: &Value) -> Option<i64> {
    if let Some(n) = v.as_i64() {
        return Some(n);
    }
    // The feed occasionally delivers epochs as floats
    v.as_f64().map(|f| f as i64)
}

/// Extract boolean from JSON value
pub fn opt_bool(v: &Value) -> Option<bool> {
    v.as_bool()
}

/// Convert meters to feet
pub fn meters_to_feet(m: f64) -> f64 {
    m * METERS_TO_FEET
}

/// Format a Unix epoch as "YYYY-MM-DD HH:MM:SS UTC", or "N/A" when absent
pub fn format_epoch(ts: Option<i64>) -> String {
    match ts {
        Some(t) => match Utc.timestamp_opt(t, 0).single() {
            Some(dt) => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            None => t.to_string(),
        },
        None => "N/A".to_string(),
    }
}
