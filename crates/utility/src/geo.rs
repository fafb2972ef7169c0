pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

fn to_radians(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

/// Great-circle distance between two points in meters.
/// Accepts any finite coordinate pair; range checks happen upstream.
pub fn haversine_distance(
    latitude_1: f64,
    longitude_1: f64,
    latitude_2: f64,
    longitude_2: f64,
) -> f64 {
    let lat1_rad = to_radians(latitude_1);
    let lon1_rad = to_radians(longitude_1);
    let lat2_rad = to_radians(latitude_2);
    let lon2_rad = to_radians(longitude_2);

    let dlat = lat2_rad - lat1_rad;
    let dlon = lon2_rad - lon1_rad;

    let a = (dlat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

/// Rounds to the given number of decimal places.
pub fn round_decimals(value: f64, decimals: u32) -> f64 {
    let factor = 10.0_f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_between_identical_points_is_zero() {
        assert_eq!(haversine_distance(28.2134, 85.4293, 28.2134, 85.4293), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let there = haversine_distance(28.2134, 85.4293, 28.2140, 85.4305);
        let back = haversine_distance(28.2140, 85.4305, 28.2134, 85.4293);
        assert_eq!(there, back);
    }

    #[test]
    fn distance_between_nearby_langtang_points() {
        // Two consecutive trail points roughly 135 m apart.
        let distance = haversine_distance(28.2134, 85.4293, 28.2140, 85.4305);
        assert!((distance - 135.0).abs() < 2.0, "got {distance}");
    }

    #[test]
    fn rounding_keeps_requested_precision() {
        assert_eq!(round_decimals(0.1352, 2), 0.14);
        assert_eq!(round_decimals(12.3449, 1), 12.3);
        assert_eq!(round_decimals(0.0004, 3), 0.0);
    }
}
