/// Cabin-view comment generation
///
/// Maps an altitude to a short guess at what the window view looks like.
/// The bands are data, scanned first-match, like the region table in `geo`.
use crate::utils::meters_to_feet;

const NO_ALTITUDE_COMMENT: &str =
    "Altitude is unavailable, so the view cannot be estimated.";

/// Upper bound in feet (exclusive) paired with the comment for that band
const VIEW_BANDS: &[(f64, &str)] = &[
    (
        1000.0,
        "Probably near the runway, just before or after takeoff or landing.",
    ),
    (
        10000.0,
        "Still climbing; terrain and streets should be clearly visible.",
    ),
    (
        25000.0,
        "Flying at a height where towns and mountains appear between the clouds.",
    ),
];

const CRUISE_COMMENT: &str =
    "Cruising above the clouds; the window likely shows blue sky over a carpet of clouds.";

/// Describe the likely window view for an altitude in meters
pub fn view_comment(altitude_m: Option<f64>) -> &'static str {
    let alt_m = match altitude_m {
        Some(a) if !a.is_nan() => a,
        _ => return NO_ALTITUDE_COMMENT,
    };

    let alt_ft = meters_to_feet(alt_m);
    VIEW_BANDS
        .iter()
        .find(|(upper, _)| alt_ft < *upper)
        .map(|(_, comment)| *comment)
        .unwrap_or(CRUISE_COMMENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    // 304.8 m, 3048 m and 7620 m convert to a hair over 1000 / 10000 /
    // 25000 ft, so they exercise the lower edge of each upper band.

    #[test]
    fn test_missing_altitude() {
        assert_eq!(view_comment(None), NO_ALTITUDE_COMMENT);
        assert_eq!(view_comment(Some(f64::NAN)), NO_ALTITUDE_COMMENT);
    }

    #[test]
    fn test_near_runway_band() {
        assert!(view_comment(Some(0.0)).contains("runway"));
        assert!(view_comment(Some(304.0)).contains("runway"));
    }

    #[test]
    fn test_climbing_band_from_1000ft() {
        assert!(view_comment(Some(304.8)).contains("climbing"));
        assert!(view_comment(Some(3040.0)).contains("climbing"));
    }

    #[test]
    fn test_between_clouds_band_from_10000ft() {
        assert!(view_comment(Some(3048.0)).contains("between the clouds"));
        assert!(view_comment(Some(7600.0)).contains("between the clouds"));
    }

    #[test]
    fn test_cruise_band_from_25000ft() {
        assert_eq!(view_comment(Some(7620.0)), CRUISE_COMMENT);
        assert_eq!(view_comment(Some(11000.0)), CRUISE_COMMENT);
    }
}
