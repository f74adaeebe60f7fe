/// Rough region classification from coordinates
///
/// A small ordered table of named bounding boxes, checked first-match, with
/// a longitude-banded ocean/continent fallback. Deliberately coarse: the
/// goal is a friendly label, not reverse geocoding.

/// Named closed-interval bounding box
#[derive(Debug, Clone, PartialEq)]
pub struct RegionBox {
    pub name: &'static str,
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl RegionBox {
    pub const fn new(
        name: &'static str,
        lat_min: f64,
        lat_max: f64,
        lon_min: f64,
        lon_max: f64,
    ) -> Self {
        Self {
            name,
            lat_min,
            lat_max,
            lon_min,
            lon_max,
        }
    }

    /// Closed-interval containment, latitude then longitude
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        self.lat_min <= lat && lat <= self.lat_max && self.lon_min <= lon && lon <= self.lon_max
    }
}

/// Ordered region table; overlaps are resolved by first match, so the more
/// specific boxes must stay ahead of the wider ones (e.g. Germany before
/// western Europe).
pub const REGION_BOXES: &[RegionBox] = &[
    // Japan and its neighbourhood
    RegionBox::new("near Japan", 20.0, 50.0, 120.0, 150.0),
    RegionBox::new("near South Korea", 33.0, 39.5, 124.0, 132.0),
    RegionBox::new("near eastern China", 20.0, 42.0, 105.0, 125.0),
    // Europe
    RegionBox::new("near Germany", 47.0, 56.0, 5.0, 16.0),
    RegionBox::new("near France", 42.0, 51.5, -5.0, 8.0),
    RegionBox::new("near the United Kingdom", 49.0, 61.0, -10.0, 2.0),
    RegionBox::new("western Europe", 35.0, 70.0, -10.0, 30.0),
    // North America
    RegionBox::new("North American west coast", 30.0, 55.0, -135.0, -110.0),
    RegionBox::new("central North America", 30.0, 55.0, -110.0, -85.0),
    RegionBox::new("North American east coast", 30.0, 50.0, -85.0, -60.0),
    // Elsewhere
    RegionBox::new("Middle East", 15.0, 40.0, 30.0, 60.0),
    RegionBox::new("Southeast Asia", -10.0, 25.0, 95.0, 130.0),
    RegionBox::new("near Australia", -45.0, -10.0, 110.0, 155.0),
];

/// First-match scan over an ordered box table
fn first_match(boxes: &[RegionBox], lat: f64, lon: f64) -> Option<&'static str> {
    boxes.iter().find(|b| b.contains(lat, lon)).map(|b| b.name)
}

/// Longitude-banded ocean/continent fallback, split by hemisphere.
///
/// The bands do not cover (150, 160]; coordinates there fall through to the
/// country / coordinate fallbacks.
fn band_fallback(lat: f64, lon: f64) -> Option<&'static str> {
    let northern = lat >= 0.0;

    if !(-140.0..=160.0).contains(&lon) {
        return Some(if northern {
            "over the North Pacific"
        } else {
            "over the South Pacific"
        });
    }
    if (-140.0..-30.0).contains(&lon) {
        return Some(if northern {
            "over North America"
        } else {
            "over South America"
        });
    }
    if (-30.0..60.0).contains(&lon) {
        return Some(if northern {
            "over Europe or North Africa"
        } else {
            "over southern Africa"
        });
    }
    if (60.0..=150.0).contains(&lon) {
        return Some(if northern {
            "over the Asian continent"
        } else {
            "over the Indian Ocean or Oceania"
        });
    }

    None
}

/// Map coordinates to a human-readable region label.
///
/// Fallback tiers: box table, longitude band, origin country, raw
/// coordinates. Pure function.
pub fn rough_location(lat: Option<f64>, lon: Option<f64>, origin_country: Option<&str>) -> String {
    let (lat, lon) = match (lat, lon) {
        (Some(lat), Some(lon)) if !lat.is_nan() && !lon.is_nan() => (lat, lon),
        _ => return "location unknown".to_string(),
    };

    if let Some(name) = first_match(REGION_BOXES, lat, lon) {
        return name.to_string();
    }

    if let Some(name) = band_fallback(lat, lon) {
        return name.to_string();
    }

    if let Some(country) = origin_country.filter(|c| !c.is_empty()) {
        return format!("near {country}");
    }

    format!("near latitude {lat:.1}°, longitude {lon:.1}°")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_match_japan() {
        assert_eq!(
            rough_location(Some(35.6), Some(139.7), None),
            "near Japan"
        );
    }

    #[test]
    fn test_box_order_specific_before_wide() {
        // Frankfurt sits inside both the Germany box and the western Europe
        // box; the earlier entry wins.
        assert_eq!(
            rough_location(Some(50.1), Some(8.7), None),
            "near Germany"
        );
        // Korea overlaps the Japan box entirely, so Japan wins there too.
        assert_eq!(
            rough_location(Some(37.5), Some(127.0), None),
            "near Japan"
        );
    }

    #[test]
    fn test_first_match_overlapping_fixture() {
        let boxes = [
            RegionBox::new("inner", 0.0, 10.0, 0.0, 10.0),
            RegionBox::new("outer", -5.0, 15.0, -5.0, 15.0),
        ];
        assert_eq!(first_match(&boxes, 5.0, 5.0), Some("inner"));
        assert_eq!(first_match(&boxes, 12.0, 12.0), Some("outer"));
        assert_eq!(first_match(&boxes, 20.0, 20.0), None);
    }

    #[test]
    fn test_band_fallback_all_eight() {
        assert_eq!(
            rough_location(Some(40.0), Some(175.0), None),
            "over the North Pacific"
        );
        assert_eq!(
            rough_location(Some(-20.0), Some(-150.0), None),
            "over the South Pacific"
        );
        assert_eq!(
            rough_location(Some(60.0), Some(-100.0), None),
            "over North America"
        );
        assert_eq!(
            rough_location(Some(-20.0), Some(-60.0), None),
            "over South America"
        );
        assert_eq!(
            rough_location(Some(75.0), Some(20.0), None),
            "over Europe or North Africa"
        );
        assert_eq!(
            rough_location(Some(-30.0), Some(25.0), None),
            "over southern Africa"
        );
        assert_eq!(
            rough_location(Some(55.0), Some(90.0), None),
            "over the Asian continent"
        );
        assert_eq!(
            rough_location(Some(-30.0), Some(80.0), None),
            "over the Indian Ocean or Oceania"
        );
    }

    #[test]
    fn test_band_gap_falls_through_to_country() {
        // (150, 160] matches neither a box (at this latitude) nor a band
        assert_eq!(
            rough_location(Some(55.0), Some(155.0), Some("Russia")),
            "near Russia"
        );
    }

    #[test]
    fn test_coordinate_fallback_one_decimal() {
        assert_eq!(
            rough_location(Some(55.04), Some(155.96), None),
            "near latitude 55.0°, longitude 156.0°"
        );
    }

    #[test]
    fn test_missing_coordinates() {
        assert_eq!(
            rough_location(None, Some(10.0), Some("France")),
            "location unknown"
        );
        assert_eq!(rough_location(Some(10.0), None, None), "location unknown");
        assert_eq!(
            rough_location(Some(f64::NAN), Some(10.0), None),
            "location unknown"
        );
    }

    #[test]
    fn test_classify_is_deterministic() {
        let a = rough_location(Some(35.6), Some(139.7), Some("Japan"));
        let b = rough_location(Some(35.6), Some(139.7), Some("Japan"));
        assert_eq!(a, b);
    }
}
