use chrono::{DateTime, Local};
use model::{
    statistics::TrailStatistics,
    trail::{Polygon, Trail},
    DetectionMode,
};
use utility::geo::{haversine_distance, round_decimals};

/// Derives a full statistics snapshot from the current validated
/// trail/polygon state. Pure and deterministic for equal input, so a poll
/// tick can recompute everything instead of patching the previous value.
pub fn compute_statistics(
    trail: &Trail,
    polygons: &[Polygon],
    elapsed_seconds: i64,
    mode: DetectionMode,
    now: DateTime<Local>,
) -> TrailStatistics {
    let length_km = trail.length_km();

    let average_speed_kmh = if elapsed_seconds > 0 {
        let elapsed_hours = elapsed_seconds as f64 / 3600.0;
        round_decimals(length_km / elapsed_hours, 1)
    } else {
        0.0
    };

    let area_covered_km2 = if mode == DetectionMode::Trail {
        round_decimals(bounding_box_area_km2(trail), 3)
    } else {
        0.0
    };

    TrailStatistics {
        point_count: trail.len(),
        polygon_count: polygons.len(),
        trail_length_km: round_decimals(length_km, 2),
        average_speed_kmh,
        area_covered_km2,
        elapsed_seconds,
        last_update: Some(now),
    }
}

/// Planar bounding-box approximation of the covered area, 0 below 3 points.
/// Width and height are great-circle distances along the box edges. This is
/// a coarse stand-in for true polygon area and is kept as documented
/// behavior.
fn bounding_box_area_km2(trail: &Trail) -> f64 {
    if trail.len() < 3 {
        return 0.0;
    }
    let bounds = match trail.bounds() {
        Some(bounds) => bounds,
        None => return 0.0,
    };
    let width_m = haversine_distance(
        bounds.min_latitude,
        bounds.min_longitude,
        bounds.min_latitude,
        bounds.max_longitude,
    );
    let height_m = haversine_distance(
        bounds.min_latitude,
        bounds.min_longitude,
        bounds.max_latitude,
        bounds.min_longitude,
    );
    (width_m / 1000.0) * (height_m / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::coordinate::Coordinate;

    fn langtang_trail() -> Trail {
        Trail::new(vec![
            Coordinate::new(85.4293, 28.2134),
            Coordinate::new(85.4305, 28.2140),
        ])
    }

    #[test]
    fn empty_input_yields_all_zero_statistics() {
        let statistics = compute_statistics(
            &Trail::default(),
            &[],
            0,
            DetectionMode::Trail,
            Local::now(),
        );
        assert_eq!(statistics.point_count, 0);
        assert_eq!(statistics.polygon_count, 0);
        assert_eq!(statistics.trail_length_km, 0.0);
        assert_eq!(statistics.average_speed_kmh, 0.0);
        assert_eq!(statistics.area_covered_km2, 0.0);
    }

    #[test]
    fn langtang_pair_is_a_seventh_of_a_kilometer() {
        let statistics = compute_statistics(
            &langtang_trail(),
            &[],
            60,
            DetectionMode::Trail,
            Local::now(),
        );
        assert_eq!(statistics.point_count, 2);
        assert_eq!(statistics.trail_length_km, 0.14);
    }

    #[test]
    fn speed_is_zero_without_elapsed_time() {
        let statistics = compute_statistics(
            &langtang_trail(),
            &[],
            0,
            DetectionMode::Trail,
            Local::now(),
        );
        assert_eq!(statistics.average_speed_kmh, 0.0);
    }

    #[test]
    fn speed_is_length_over_elapsed_hours() {
        // 0.1352 km in 6 minutes is roughly 1.4 km/h
        let statistics = compute_statistics(
            &langtang_trail(),
            &[],
            360,
            DetectionMode::Trail,
            Local::now(),
        );
        assert!(
            (statistics.average_speed_kmh - 1.4).abs() < 0.2,
            "got {}",
            statistics.average_speed_kmh
        );
    }

    #[test]
    fn area_needs_trail_mode_and_three_points() {
        let mut points = langtang_trail().points;
        points.push(Coordinate::new(85.4310, 28.2150));
        let triangle = Trail::new(points);

        let trail_mode = compute_statistics(
            &triangle,
            &[],
            60,
            DetectionMode::Trail,
            Local::now(),
        );
        assert!(trail_mode.area_covered_km2 > 0.0);

        let combined = compute_statistics(
            &triangle,
            &[],
            60,
            DetectionMode::Combined,
            Local::now(),
        );
        assert_eq!(combined.area_covered_km2, 0.0);

        let two_points = compute_statistics(
            &langtang_trail(),
            &[],
            60,
            DetectionMode::Trail,
            Local::now(),
        );
        assert_eq!(two_points.area_covered_km2, 0.0);
    }

    #[test]
    fn polygons_only_affect_the_polygon_count() {
        let polygons = vec![Polygon::new(vec![
            Coordinate::new(85.0, 28.0),
            Coordinate::new(85.1, 28.0),
            Coordinate::new(85.0, 28.1),
        ])];
        let statistics = compute_statistics(
            &Trail::default(),
            &polygons,
            60,
            DetectionMode::Landslide,
            Local::now(),
        );
        assert_eq!(statistics.polygon_count, 1);
        assert_eq!(statistics.trail_length_km, 0.0);
    }

    #[test]
    fn recomputation_is_idempotent() {
        let now = Local::now();
        let first = compute_statistics(
            &langtang_trail(),
            &[],
            120,
            DetectionMode::Trail,
            now,
        );
        let second = compute_statistics(
            &langtang_trail(),
            &[],
            120,
            DetectionMode::Trail,
            now,
        );
        assert_eq!(first, second);
    }
}
