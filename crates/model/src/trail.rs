use itertools::Itertools;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::coordinate::Coordinate;

/// Ordered detection path, insertion order = temporal order along the trail.
/// Replaced wholesale on each poll with the server's current full trail.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct Trail {
    pub points: Vec<Coordinate>,
}

impl Trail {
    pub fn new(points: Vec<Coordinate>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Sum of consecutive pairwise great-circle distances in kilometers,
    /// unrounded. 0 for fewer than 2 points.
    pub fn length_km(&self) -> f64 {
        self.points
            .iter()
            .tuple_windows()
            .map(|(a, b)| a.distance_m(b))
            .sum::<f64>()
            / 1000.0
    }

    /// Bounding box of the trail. `None` below 2 points, which is also the
    /// renderer's cue that there is nothing to fit the view to.
    pub fn bounds(&self) -> Option<Bounds> {
        if self.points.len() < 2 {
            return None;
        }
        let mut bounds = Bounds::around(&self.points[0]);
        for point in &self.points[1..] {
            bounds.extend(point);
        }
        Some(bounds)
    }
}

/// Closed landslide boundary ring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct Polygon {
    pub ring: Vec<Coordinate>,
}

impl Polygon {
    pub fn new(ring: Vec<Coordinate>) -> Self {
        Self { ring }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub min_longitude: f64,
    pub min_latitude: f64,
    pub max_longitude: f64,
    pub max_latitude: f64,
}

impl Bounds {
    fn around(point: &Coordinate) -> Self {
        Self {
            min_longitude: point.longitude,
            min_latitude: point.latitude,
            max_longitude: point.longitude,
            max_latitude: point.latitude,
        }
    }

    fn extend(&mut self, point: &Coordinate) {
        self.min_longitude = self.min_longitude.min(point.longitude);
        self.min_latitude = self.min_latitude.min(point.latitude);
        self.max_longitude = self.max_longitude.max(point.longitude);
        self.max_latitude = self.max_latitude.max(point.latitude);
    }
}
